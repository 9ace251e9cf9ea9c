//! 药房 SaaS 前端的领域层
//!
//! 不依赖 DOM，可在原生目标上测试：
//! - `models` / `forms`: 与后端对应的数据结构与表单
//! - `protocol` / `client` / `envelope`: 端点定义与请求收发
//! - `cart` / `session` / `signup`: 收银与注册的状态机
//! - `pagination` / `inventory` / `format` / `sheet`: 展示辅助

pub mod cart;
pub mod client;
pub mod envelope;
pub mod error;
pub mod format;
pub mod forms;
pub mod inventory;
pub mod models;
pub mod pagination;
pub mod protocol;
pub mod session;
pub mod sheet;
pub mod signup;
pub mod validation;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// LocalStorage 中保存会话的键
pub const STORAGE_SESSION_KEY: &str = "pharmacy_session";

/// 收银台交易列表的轮询间隔
pub const POLL_INTERVAL_MS: u32 = 10_000;

pub use client::{ApiClient, HttpRequest, HttpResponse, Transport};
pub use error::{ApiError, ApiResult};
pub use models::*;
pub use protocol::{ApiRequest, HttpMethod};
