//! API 客户端
//!
//! 分两层：
//! - [`Transport`]: 最底层的 HTTP 收发抽象，浏览器中由 `fetch` 实现，测试中由 mock 实现
//! - [`ApiClient`]: 拼接 URL、附加 Bearer 令牌、序列化请求、解包响应信封

use crate::envelope::ApiEnvelope;
use crate::error::{ApiError, ApiResult};
use crate::protocol::{ApiRequest, HttpMethod};
use async_trait::async_trait;

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
const JSON_CONTENT_TYPE: &str = "application/json";

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 传输特性
///
/// (?Send) 是因为浏览器中的 JS Future 不是 Send 的
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

// =========================================================
// 客户端 (ApiClient)
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient<T> {
    base_url: String,
    token: Option<String>,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            token: None,
            transport,
        }
    }

    /// 附加访问令牌；空令牌视为未登录
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 构造底层请求（不发送）
    pub fn build<R: ApiRequest>(&self, req: &R) -> ApiResult<HttpRequest> {
        let mut http = HttpRequest::new(&self.url(&req.path()), R::METHOD);

        if let Some(token) = &self.token {
            http = http.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }
        if req.has_body() {
            let body = serde_json::to_string(req).map_err(|e| ApiError::Encode(e.to_string()))?;
            http = http
                .with_header(HEADER_CONTENT_TYPE, JSON_CONTENT_TYPE)
                .with_body(body);
        }
        Ok(http)
    }

    /// 发送请求并解包信封中的 `data`
    pub async fn send<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let http = self.build(req)?;
        let method = http.method.as_str();
        let url = http.url.clone();
        log::debug!("[Api] {} {}", method, url);

        let result = match self.transport.send(http).await {
            Ok(resp) => normalize(resp).and_then(ApiEnvelope::into_result),
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            log::warn!("[Api] {} {} failed: {}", method, url, e);
        }
        result
    }
}

/// 把 HTTP 层面的结果归一为信封
///
/// - 401 -> [`ApiError::Unauthorized`]
/// - 其他非 2xx -> [`ApiError::Http`]，尽量取信封中的 `message`
fn normalize(resp: HttpResponse) -> ApiResult<ApiEnvelope> {
    if resp.status == 401 {
        return Err(ApiError::Unauthorized);
    }
    if !resp.ok() {
        let message = ApiEnvelope::parse(&resp.body)
            .ok()
            .and_then(|env| env.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| status_text(resp.status).to_string());
        return Err(ApiError::Http {
            status: resp.status,
            message,
        });
    }
    ApiEnvelope::parse(&resp.body)
}

fn status_text(status: u16) -> &'static str {
    match status {
        400 => "Bad request",
        403 => "You do not have permission to do that",
        404 => "Not found",
        409 => "Conflict",
        422 => "Validation failed",
        500..=599 => "Server error, please try again later",
        _ => "Unexpected response",
    }
}

#[cfg(test)]
mod tests;
