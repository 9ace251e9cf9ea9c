//! 收银员页面：POS 与收银班次

mod pos;
mod session;

pub use pos::PosPage;
pub use session::CashSessionPage;

use crate::api::Api;
use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmacy_shared::protocol::CurrentSessionRequest;
use pharmacy_shared::session::CashSessionState;

/// 拉取当前收银班次
fn load_session(api: Api, state: RwSignal<CashSessionState>, loading: RwSignal<bool>) {
    loading.set(true);
    spawn_local(async move {
        if let Some(current) = api.send(&CurrentSessionRequest, "Loading cash session").await {
            state.set(CashSessionState::from_current(current));
        }
        loading.set(false);
    });
}
