//! PharmaCare 前端应用
//!
//! Context-Driven 架构：
//! - `web::route`: 路由表与角色守卫（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth` / `toast`: 全局状态，经 Context 注入
//! - `api`: 带错误上报的请求句柄
//! - `components`: 按角色划分的页面

mod api;
mod auth;
mod config;
mod toast;
mod components {
    pub mod admin;
    pub mod cashier;
    pub mod layout;
    pub mod login;
    pub mod manager;
    pub mod pharmacist;
    pub mod sheet;
    pub mod signup;
    pub mod ui;
}
pub(crate) mod web;

use crate::auth::{AuthContext, init_auth};
use crate::components::admin::{
    AdminDashboardPage, BillingPage, PharmaciesPage, SupportTicketsPage,
};
use crate::components::cashier::{CashSessionPage, PosPage};
use crate::components::login::LoginPage;
use crate::components::manager::{BranchesPage, ManagerDashboardPage, ManagerSupportPage, StaffPage};
use crate::components::pharmacist::{InventoryPage, PharmacistDashboardPage, PrescriptionsPage};
use crate::components::signup::SignupPage;
use crate::config::AppConfig;
use crate::toast::{ToastContext, ToastHost};

use leptos::prelude::*;
use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Signup => view! { <SignupPage /> }.into_any(),
        AppRoute::AdminDashboard => view! { <AdminDashboardPage /> }.into_any(),
        AppRoute::AdminPharmacies => view! { <PharmaciesPage /> }.into_any(),
        AppRoute::AdminBilling => view! { <BillingPage /> }.into_any(),
        AppRoute::AdminSupport => view! { <SupportTicketsPage /> }.into_any(),
        AppRoute::ManagerDashboard => view! { <ManagerDashboardPage /> }.into_any(),
        AppRoute::ManagerBranches => view! { <BranchesPage /> }.into_any(),
        AppRoute::ManagerStaff => view! { <StaffPage /> }.into_any(),
        AppRoute::ManagerSupport => view! { <ManagerSupportPage /> }.into_any(),
        AppRoute::PharmacistDashboard => view! { <PharmacistDashboardPage /> }.into_any(),
        AppRoute::PharmacistInventory => view! { <InventoryPage /> }.into_any(),
        AppRoute::PharmacistPrescriptions => view! { <PrescriptionsPage /> }.into_any(),
        AppRoute::CashierPos => view! { <PosPage /> }.into_any(),
        AppRoute::CashierSession => view! { <CashSessionPage /> }.into_any(),
        AppRoute::NotFound => view! { <NotFoundPage /> }.into_any(),
    }
}

#[component]
fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center space-y-4">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl">"Page not found"</p>
                <Link to=AppRoute::Login class="btn btn-primary">"Back to sign in"</Link>
            </div>
        </div>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 运行时配置与全局上下文
    let auth_ctx = AuthContext::new(AppConfig::load());
    provide_context(auth_ctx);
    provide_context(ToastContext::new());

    // 2. 从 LocalStorage 恢复会话并向后端校验
    init_auth(&auth_ctx);

    // 3. 角色信号注入路由服务，由路由负责守卫与重定向
    let role = auth_ctx.role_signal();
    let is_loading = auth_ctx.is_loading_signal();

    view! {
        <Router role=role is_loading=is_loading>
            <RouterOutlet matcher=route_matcher />
        </Router>
        <ToastHost />
    }
}
