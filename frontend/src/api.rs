use crate::auth::{AuthContext, use_auth};
use crate::toast::{ToastContext, use_toast};
use crate::web::FetchTransport;
use leptos::prelude::*;
use pharmacy_shared::{ApiClient, ApiError, ApiRequest};

/// 浏览器中使用的 API 客户端
pub type PharmacyApi = ApiClient<FetchTransport>;

pub fn new_client(base_url: &str, token: Option<String>) -> PharmacyApi {
    ApiClient::new(base_url, FetchTransport).with_token(token)
}

/// 页面使用的请求句柄
///
/// 在组件初始化时通过 [`use_api`] 获取（此时 Context 可用），
/// 之后可以复制进事件处理器和 `spawn_local` 中。
#[derive(Clone, Copy)]
pub struct Api {
    auth: AuthContext,
    toast: ToastContext,
}

pub fn use_api() -> Api {
    Api {
        auth: use_auth(),
        toast: use_toast(),
    }
}

impl Api {
    /// 发送请求；失败时记录日志并弹出错误 toast，返回 `None`
    pub async fn send<R: ApiRequest>(&self, req: &R, action: &str) -> Option<R::Response> {
        match self.auth.client().send(req).await {
            Ok(value) => Some(value),
            Err(e) => {
                self.report(action, &e);
                None
            }
        }
    }

    pub fn report(&self, action: &str, err: &ApiError) {
        log::error!("[Api] {} failed: {}", action, err);
        self.auth.on_api_error(err);
        if err.is_unauthorized() {
            self.toast.error("Your session has expired, please sign in again");
        } else {
            self.toast.error(format!("{}: {}", action, err));
        }
    }

    pub fn toast(&self) -> ToastContext {
        self.toast
    }

    pub fn auth(&self) -> AuthContext {
        self.auth
    }
}

/// 简单列表页的加载状态
pub struct ListState<T: Send + Sync + 'static> {
    pub items: RwSignal<Vec<T>>,
    pub loading: RwSignal<bool>,
}

impl<T: Send + Sync + 'static> Clone for ListState<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for ListState<T> {}

impl<T: Clone + Send + Sync + 'static> ListState<T> {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            loading: RwSignal::new(true),
        }
    }

    /// 拉取列表并替换当前内容
    pub fn load<R>(self, api: Api, req: R, action: &'static str)
    where
        R: ApiRequest<Response = Vec<T>> + 'static,
    {
        self.loading.set(true);
        leptos::task::spawn_local(async move {
            if let Some(items) = api.send(&req, action).await {
                self.items.set(items);
            }
            self.loading.set(false);
        });
    }
}

impl<T: Clone + Send + Sync + 'static> Default for ListState<T> {
    fn default() -> Self {
        Self::new()
    }
}
