//! 运行时配置
//!
//! API 地址的解析顺序：
//! 1. `index.html` 中的 `<meta name="api-base-url" content="...">`
//! 2. 编译期环境变量 `PHARMACY_API_URL`
//! 3. 默认值 `/api`（与前端同源部署）

use wasm_bindgen::JsCast;

const META_API_BASE_URL: &str = "api-base-url";
const DEFAULT_API_BASE_URL: &str = "/api";

/// 收银台交易列表的轮询间隔
pub const POLL_INTERVAL_MS: u32 = pharmacy_shared::POLL_INTERVAL_MS;

/// Toast 自动消失时间
pub const TOAST_LIFETIME_MS: u64 = 3_000;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
}

impl AppConfig {
    pub fn load() -> Self {
        let api_base_url = meta_content(META_API_BASE_URL)
            .or_else(|| option_env!("PHARMACY_API_URL").map(str::to_string))
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        log::info!("[Config] API base URL: {}", api_base_url);
        Self { api_base_url }
    }
}

fn meta_content(name: &str) -> Option<String> {
    let document = web_sys::window()?.document()?;
    let selector = format!("meta[name=\"{}\"]", name);
    let meta = document
        .query_selector(&selector)
        .ok()??
        .dyn_into::<web_sys::HtmlMetaElement>()
        .ok()?;
    Some(meta.content())
}
