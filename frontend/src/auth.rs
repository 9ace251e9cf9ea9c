//! 认证模块
//!
//! 管理用户会话，与路由系统解耦：路由服务只读取注入的角色信号。
//!
//! 生命周期：`Loading -> Anonymous | Authenticated`
//! - 启动时从 LocalStorage 恢复会话，并用 `/auth/me` 校验令牌
//! - 登录成功后持久化会话
//! - 注销或任何请求返回 401 时清除会话

use crate::api::{PharmacyApi, new_client};
use crate::config::AppConfig;
use crate::web::LocalStorage;
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmacy_shared::protocol::{LoginRequest, LogoutRequest, MeRequest};
use pharmacy_shared::{ApiError, ApiResult, Role, STORAGE_SESSION_KEY, Session, User};

/// 认证状态
#[derive(Clone, Debug, Default)]
pub struct AuthState {
    /// 当前会话（恢复期间为待校验的已保存会话）
    pub session: Option<Session>,
    /// 是否正在恢复会话
    pub is_loading: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(Session::role)
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// 启动时的状态：已保存的会话立即生效（请求可带令牌），校验完成前保持加载中
    pub fn restoring(saved: Option<Session>) -> Self {
        let is_loading = saved.is_some();
        Self {
            session: saved,
            is_loading,
        }
    }

    /// `/auth/me` 校验结果 -> 最终状态
    ///
    /// 401 丢弃会话；其他失败（离线等）保留已保存的会话。
    pub fn verified(saved: Session, result: ApiResult<User>) -> Self {
        let session = match result {
            Ok(user) => Some(Session { user, ..saved }),
            Err(ApiError::Unauthorized) => None,
            Err(_) => Some(saved),
        };
        Self {
            session,
            is_loading: false,
        }
    }
}

/// 认证上下文
///
/// 只有本模块写入 `set_state`，其余组件只读。
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: ReadSignal<AuthState>,
    set_state: WriteSignal<AuthState>,
    config: StoredValue<AppConfig>,
}

impl AuthContext {
    pub fn new(config: AppConfig) -> Self {
        let (state, set_state) = signal(AuthState {
            session: None,
            is_loading: true,
        });
        Self {
            state,
            set_state,
            config: StoredValue::new(config),
        }
    }

    /// 当前角色信号（用于路由服务注入）
    pub fn role_signal(&self) -> Signal<Option<Role>> {
        let state = self.state;
        Signal::derive(move || state.with(AuthState::role))
    }

    pub fn is_loading_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.is_loading))
    }

    /// 携带当前令牌的 API 客户端
    pub fn client(&self) -> PharmacyApi {
        let token = self
            .state
            .with_untracked(|s| s.session.as_ref().map(|s| s.access_token.clone()));
        self.config
            .with_value(|config| new_client(&config.api_base_url, token))
    }

    fn anonymous_client(&self) -> PharmacyApi {
        self.config
            .with_value(|config| new_client(&config.api_base_url, None))
    }

    fn store(&self, session: Session) {
        LocalStorage::set_json(STORAGE_SESSION_KEY, &session);
        self.set_state.set(AuthState {
            session: Some(session),
            is_loading: false,
        });
    }

    /// 只清除本地状态，不通知后端
    pub fn clear(&self) {
        LocalStorage::delete(STORAGE_SESSION_KEY);
        self.set_state.set(AuthState::default());
    }

    /// 请求失败时调用：401 说明令牌已失效
    pub fn on_api_error(&self, err: &ApiError) {
        if err.is_unauthorized() && self.state.with_untracked(AuthState::is_authenticated) {
            log::warn!("[Auth] Session rejected by server, signing out");
            self.clear();
        }
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 有已保存的会话时先用它恢复界面，再后台校验令牌。
pub fn init_auth(ctx: &AuthContext) {
    let saved = LocalStorage::get_json::<Session>(STORAGE_SESSION_KEY);
    ctx.set_state.set(AuthState::restoring(saved.clone()));

    let Some(saved) = saved else {
        log::debug!("[Auth] No stored session");
        return;
    };

    let ctx = *ctx;
    let api = ctx.client();
    spawn_local(async move {
        let result = api.send(&MeRequest).await;
        match &result {
            Ok(user) => log::info!("[Auth] Session restored for {} ({})", user.email, user.role),
            Err(ApiError::Unauthorized) => log::info!("[Auth] Stored token expired"),
            Err(e) => log::warn!("[Auth] Could not verify session, keeping it: {}", e),
        }

        // 校验期间已注销或重新登录时放弃结果
        let unchanged = ctx.state.with_untracked(|s| {
            s.session.as_ref().map(|s| s.access_token.as_str()) == Some(saved.access_token.as_str())
        });
        if !unchanged {
            return;
        }

        let next = AuthState::verified(saved, result);
        match &next.session {
            Some(session) => LocalStorage::set_json(STORAGE_SESSION_KEY, session),
            None => LocalStorage::delete(STORAGE_SESSION_KEY),
        };
        ctx.set_state.set(next);
    });
}

/// 登录并保存会话
///
/// 导航由路由服务监听角色变化自动完成。
pub async fn login(ctx: &AuthContext, email: String, password: String) -> ApiResult<Role> {
    let request = LoginRequest {
        email: email.trim().to_string(),
        password,
    };
    let session = ctx.anonymous_client().send(&request).await?;
    let role = session.role();
    log::info!("[Auth] Signed in as {} ({})", session.user.email, role);
    ctx.store(session);
    Ok(role)
}

/// 注销：本地立即清除，后端通知失败只记录日志
pub fn logout(ctx: &AuthContext) {
    let api = ctx.client();
    ctx.clear();
    log::info!("[Auth] Signed out");

    if api.token().is_some() {
        spawn_local(async move {
            if let Err(e) = api.send(&LogoutRequest).await {
                log::debug!("[Auth] Logout notification failed: {}", e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(token: &str, role: Role) -> Session {
        Session {
            user: User {
                id: "u1".into(),
                name: "Hana".into(),
                email: "hana@selam.et".into(),
                phone: None,
                role,
                pharmacy_id: Some("ph-1".into()),
                branch_id: Some("br-1".into()),
                is_active: true,
            },
            access_token: token.into(),
            refresh_token: None,
        }
    }

    #[test]
    fn stored_session_is_usable_while_verifying() {
        let state = AuthState::restoring(Some(session("tok-1", Role::Cashier)));
        assert!(state.is_loading);
        assert!(state.is_authenticated());
        assert_eq!(state.role(), Some(Role::Cashier));
        assert_eq!(
            state.session.as_ref().map(|s| s.access_token.as_str()),
            Some("tok-1")
        );
    }

    #[test]
    fn nothing_stored_means_anonymous_and_settled() {
        let state = AuthState::restoring(None);
        assert!(!state.is_loading);
        assert!(!state.is_authenticated());
        assert_eq!(state.role(), None);
    }

    #[test]
    fn verified_user_replaces_stored_profile() {
        let saved = session("tok-1", Role::Cashier);
        let mut fresh = saved.user.clone();
        fresh.role = Role::Pharmacist;
        fresh.name = "Hana T.".into();

        let state = AuthState::verified(saved, Ok(fresh));
        assert!(!state.is_loading);
        assert_eq!(state.role(), Some(Role::Pharmacist));
        assert_eq!(state.user().map(|u| u.name.as_str()), Some("Hana T."));
        assert_eq!(
            state.session.as_ref().map(|s| s.access_token.as_str()),
            Some("tok-1")
        );
    }

    #[test]
    fn rejected_token_signs_out_but_network_failure_keeps_session() {
        let expired = AuthState::verified(session("old", Role::Manager), Err(ApiError::Unauthorized));
        assert!(!expired.is_loading);
        assert!(!expired.is_authenticated());

        let offline = AuthState::verified(
            session("tok-2", Role::Manager),
            Err(ApiError::Network("offline".into())),
        );
        assert!(!offline.is_loading);
        assert_eq!(offline.role(), Some(Role::Manager));
    }
}
