use crate::auth::{logout, use_auth};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;

/// 登录后页面的外壳：顶部导航栏 + 角色菜单
#[component]
pub fn AppShell(children: Children) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let user_name = move || {
        auth.state
            .with(|s| s.user().map(|u| u.name.clone()))
            .unwrap_or_default()
    };
    let role_label = move || auth.state.with(|s| s.role().map(|r| r.label()).unwrap_or(""));

    let nav = move || {
        let current = router.current_route().get();
        auth.state
            .with(|s| s.role())
            .map(|role| {
                AppRoute::nav_for(role)
                    .iter()
                    .map(|route| {
                        let class = if *route == current { "active" } else { "" };
                        view! {
                            <li>
                                <Link to=*route class=class>{route.title()}</Link>
                            </li>
                        }
                    })
                    .collect_view()
            })
    };

    let on_logout = move |_| logout(&auth);

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-6">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <span class="btn btn-ghost text-xl">"PharmaCare"</span>
                        <ul class="menu menu-horizontal px-1 hidden md:flex">{nav}</ul>
                    </div>
                    <div class="flex-none gap-2">
                        <div class="hidden md:flex flex-col items-end leading-tight">
                            <span class="font-semibold">{user_name}</span>
                            <span class="badge badge-neutral badge-sm">{role_label}</span>
                        </div>
                        <button on:click=on_logout class="btn btn-outline btn-error btn-sm">
                            "Sign out"
                        </button>
                    </div>
                </div>
                <ul class="menu menu-horizontal bg-base-100 rounded-box md:hidden">{nav}</ul>
                {children()}
            </div>
        </div>
    }
}
