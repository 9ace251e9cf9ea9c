//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现领域层的 [`Transport`]，不引入额外的 HTTP crate。

use async_trait::async_trait;
use pharmacy_shared::{ApiError, ApiResult, HttpRequest, HttpResponse, Transport};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

fn js_err(context: &str, e: JsValue) -> ApiError {
    let detail = e.as_string().unwrap_or_else(|| format!("{:?}", e));
    ApiError::Network(format!("{}: {}", context, detail))
}

/// 读取响应体文本
async fn read_text(response: &Response) -> ApiResult<String> {
    let promise = response
        .text()
        .map_err(|e| ApiError::Decode(format!("{:?}", e)))?;

    let text = JsFuture::from(promise)
        .await
        .map_err(|e| ApiError::Decode(format!("{:?}", e)))?;

    text.as_string()
        .ok_or_else(|| ApiError::Decode("response body is not text".to_string()))
}

/// 基于浏览器 `fetch` 的传输层
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let headers = Headers::new().map_err(|e| js_err("create headers", e))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| js_err("set header", e))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());
        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| js_err("build request", e))?;

        let window =
            web_sys::window().ok_or_else(|| ApiError::Network("window is unavailable".into()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_err("fetch", e))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| ApiError::Decode(format!("not a Response: {:?}", e)))?;

        Ok(HttpResponse {
            status: response.status(),
            body: read_text(&response).await?,
        })
    }
}
