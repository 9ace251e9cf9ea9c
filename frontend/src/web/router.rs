//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 导航流程："监听 -> 守卫 -> 处理 -> 加载"，守卫规则见 [`AppRoute::guard`]。

use leptos::prelude::*;
use pharmacy_shared::Role;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn write_history(path: &str, use_push: bool) {
    if use_push {
        push_history_state(path);
    } else {
        replace_history_state(path);
    }
}

/// 路由器服务
///
/// 通过 Signal 驱动界面更新；当前角色以信号形式注入，与认证模块解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    /// 当前登录角色（注入的信号），`None` 表示未登录
    role: Signal<Option<Role>>,
    /// 会话恢复期间不做守卫，避免刷新页面时被踢回登录页
    is_loading: Signal<bool>,
}

impl RouterService {
    fn new(role: Signal<Option<Role>>, is_loading: Signal<bool>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            role,
            is_loading,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        self.navigate_to(AppRoute::from_path(path));
    }

    pub fn navigate_to(&self, target: AppRoute) {
        self.apply(target, true);
    }

    /// 守卫后写入 History 并更新 UI
    ///
    /// # Arguments
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn apply(&self, target: AppRoute, use_push: bool) {
        let landed = if self.is_loading.get_untracked() {
            target
        } else {
            target.guard(self.role.get_untracked())
        };

        if landed != target {
            log::info!("[Router] {} redirected to {}", target, landed);
            // 重定向不应留下被拒绝的历史记录
            write_history(landed.to_path(), false);
        } else {
            write_history(landed.to_path(), use_push);
        }
        self.set_route.set(landed);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            router.apply(target, false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 登录、登出或会话恢复完成时重新执行守卫
    fn setup_auth_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let role = router.role.get();
            if router.is_loading.get() {
                return;
            }
            let route = router.current_route.get_untracked();
            let landed = route.guard(role);
            if landed != route {
                log::info!(
                    "[Router] Auth state changed ({}), redirecting to {}",
                    role.map(|r| r.as_str()).unwrap_or("signed out"),
                    landed
                );
                replace_history_state(landed.to_path());
                router.set_route.set(landed);
            }
        });
    }
}

fn provide_router(role: Signal<Option<Role>>, is_loading: Signal<bool>) -> RouterService {
    let router = RouterService::new(role, is_loading);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 当前角色信号
    role: Signal<Option<Role>>,
    /// 会话是否仍在恢复中
    is_loading: Signal<bool>,
    children: Children,
) -> impl IntoView {
    provide_router(role, is_loading);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接，拦截点击改走路由服务
#[component]
pub fn Link(
    to: AppRoute,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate_to(to);
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
