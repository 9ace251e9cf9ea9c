//! 文件导入导出
//!
//! 导出：把内容包装为 Blob，生成临时 URL 并触发 `<a download>` 点击。
//! 导入：读取 `<input type="file">` 选中文件的原始字节。

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

fn describe(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

fn blob_options(mime: &str) -> BlobPropertyBag {
    let opts = BlobPropertyBag::new();
    opts.set_type(mime);
    opts
}

/// 触发浏览器下载文本
pub fn download_text(filename: &str, mime: &str, content: &str) -> Result<(), String> {
    let parts = js_sys::Array::of1(&JsValue::from_str(content));
    let blob = Blob::new_with_str_sequence_and_options(&parts, &blob_options(mime))
        .map_err(describe)?;
    save_blob(filename, &blob, content.len())
}

/// 触发浏览器下载二进制内容（如 `.xlsx`）
pub fn download_bytes(filename: &str, mime: &str, content: &[u8]) -> Result<(), String> {
    let bytes = js_sys::Uint8Array::from(content);
    let parts = js_sys::Array::of1(&bytes);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &blob_options(mime))
        .map_err(describe)?;
    save_blob(filename, &blob, content.len())
}

fn save_blob(filename: &str, blob: &Blob, size: usize) -> Result<(), String> {
    let url = Url::create_object_url_with_blob(blob).map_err(describe)?;
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("document is unavailable")?;

    let result = document
        .create_element("a")
        .map_err(describe)
        .and_then(|el| el.dyn_into::<HtmlAnchorElement>().map_err(|_| "not an anchor".into()))
        .map(|anchor| {
            anchor.set_href(&url);
            anchor.set_download(filename);
            anchor.click();
        });

    let _ = Url::revoke_object_url(&url);
    log::info!("[Download] {} ({} bytes)", filename, size);
    result
}

/// 读取文件全部字节
pub async fn read_file_bytes(file: &web_sys::File) -> Result<Vec<u8>, String> {
    let buffer = JsFuture::from(file.array_buffer()).await.map_err(describe)?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}
