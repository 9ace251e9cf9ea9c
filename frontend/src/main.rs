use leptos::prelude::*;
use pharmacy_frontend::App;

// Use lol_alloc as the global allocator for smaller WASM size
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

#[cfg(debug_assertions)]
const LOG_LEVEL: log::Level = log::Level::Debug;
#[cfg(not(debug_assertions))]
const LOG_LEVEL: log::Level = log::Level::Info;

pub fn main() {
    console_error_panic_hook::set_once();
    // 重复初始化时忽略错误
    let _ = console_log::init_with_level(LOG_LEVEL);
    log::info!("[App] starting PharmaCare frontend");
    mount_to_body(App);
}
