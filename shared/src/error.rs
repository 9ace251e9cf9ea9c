//! API 错误类型
//!
//! 所有网络、HTTP 与信封层面的失败都归一为 [`ApiError`]，
//! 由界面层转成 toast 提示。

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 请求未能发出或连接失败
    #[error("network error: {0}")]
    Network(String),

    /// 会话失效 (HTTP 401)
    #[error("session expired, please sign in again")]
    Unauthorized,

    /// 非 2xx 响应
    #[error("request failed ({status}): {message}")]
    Http { status: u16, message: String },

    /// 后端返回 `success: false`
    #[error("{0}")]
    Rejected(String),

    /// `success: true` 但缺少 `data`
    #[error("response did not contain data")]
    MissingData,

    /// 响应体无法解析
    #[error("could not read response: {0}")]
    Decode(String),

    /// 请求体无法序列化
    #[error("could not encode request: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
