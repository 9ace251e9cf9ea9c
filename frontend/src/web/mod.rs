//! 原生 Web API 封装模块
//!
//! 对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，以减小 WASM 体积。

mod download;
mod http;
pub mod route;
pub mod router;
mod storage;
mod timer;

pub use download::{download_bytes, download_text, read_file_bytes};
pub use http::FetchTransport;
pub use storage::LocalStorage;
pub use timer::{Interval, today};
