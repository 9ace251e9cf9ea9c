//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑层，不依赖 DOM 或 web_sys。
//! 每个受保护的路由都绑定一个角色，守卫逻辑只看 `Option<Role>`。

use pharmacy_shared::Role;
use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 药房自助注册向导
    Signup,

    AdminDashboard,
    AdminPharmacies,
    AdminBilling,
    AdminSupport,

    ManagerDashboard,
    ManagerBranches,
    ManagerStaff,
    ManagerSupport,

    PharmacistDashboard,
    PharmacistInventory,
    PharmacistPrescriptions,

    CashierPos,
    CashierSession,

    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        match path {
            "" | "/login" => Self::Login,
            "/signup" => Self::Signup,
            "/admin" | "/admin/dashboard" => Self::AdminDashboard,
            "/admin/pharmacies" => Self::AdminPharmacies,
            "/admin/billing" => Self::AdminBilling,
            "/admin/support" => Self::AdminSupport,
            "/manager" | "/manager/dashboard" => Self::ManagerDashboard,
            "/manager/branches" => Self::ManagerBranches,
            "/manager/staff" => Self::ManagerStaff,
            "/manager/support" => Self::ManagerSupport,
            "/pharmacist" | "/pharmacist/dashboard" => Self::PharmacistDashboard,
            "/pharmacist/inventory" => Self::PharmacistInventory,
            "/pharmacist/prescriptions" => Self::PharmacistPrescriptions,
            "/cashier" | "/cashier/pos" => Self::CashierPos,
            "/cashier/session" => Self::CashierSession,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Signup => "/signup",
            Self::AdminDashboard => "/admin/dashboard",
            Self::AdminPharmacies => "/admin/pharmacies",
            Self::AdminBilling => "/admin/billing",
            Self::AdminSupport => "/admin/support",
            Self::ManagerDashboard => "/manager/dashboard",
            Self::ManagerBranches => "/manager/branches",
            Self::ManagerStaff => "/manager/staff",
            Self::ManagerSupport => "/manager/support",
            Self::PharmacistDashboard => "/pharmacist/dashboard",
            Self::PharmacistInventory => "/pharmacist/inventory",
            Self::PharmacistPrescriptions => "/pharmacist/prescriptions",
            Self::CashierPos => "/cashier/pos",
            Self::CashierSession => "/cashier/session",
            Self::NotFound => "/404",
        }
    }

    /// 访问该路由所需的角色；`None` 表示公开页面
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Self::AdminDashboard | Self::AdminPharmacies | Self::AdminBilling | Self::AdminSupport => {
                Some(Role::Admin)
            }
            Self::ManagerDashboard
            | Self::ManagerBranches
            | Self::ManagerStaff
            | Self::ManagerSupport => Some(Role::Manager),
            Self::PharmacistDashboard
            | Self::PharmacistInventory
            | Self::PharmacistPrescriptions => Some(Role::Pharmacist),
            Self::CashierPos | Self::CashierSession => Some(Role::Cashier),
            Self::Login | Self::Signup | Self::NotFound => None,
        }
    }

    /// 定义该路由是否需要认证
    pub fn requires_auth(&self) -> bool {
        self.required_role().is_some()
    }

    /// 定义已认证用户是否应该离开此路由（登录、注册）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Signup)
    }

    /// 认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 各角色登录后的首页
    pub fn home_for(role: Role) -> Self {
        match role {
            Role::Admin => Self::AdminDashboard,
            Role::Manager => Self::ManagerDashboard,
            Role::Pharmacist => Self::PharmacistDashboard,
            Role::Cashier => Self::CashierPos,
        }
    }

    /// **核心守卫逻辑**
    ///
    /// 返回实际应落地的路由：
    /// - 未登录访问受保护页面 -> 登录页
    /// - 已登录访问登录/注册页 -> 角色首页
    /// - 角色不符 -> 自己的首页
    pub fn guard(self, role: Option<Role>) -> Self {
        match (self.required_role(), role) {
            (Some(_), None) => Self::auth_failure_redirect(),
            (Some(required), Some(current)) if required != current => Self::home_for(current),
            (None, Some(current)) if self.should_redirect_when_authenticated() => {
                Self::home_for(current)
            }
            _ => self,
        }
    }

    /// 导航栏中显示的名称
    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Signup => "Register pharmacy",
            Self::AdminDashboard
            | Self::ManagerDashboard
            | Self::PharmacistDashboard => "Dashboard",
            Self::AdminPharmacies => "Pharmacies",
            Self::AdminBilling => "Billing",
            Self::AdminSupport | Self::ManagerSupport => "Support",
            Self::ManagerBranches => "Branches",
            Self::ManagerStaff => "Staff",
            Self::PharmacistInventory => "Inventory",
            Self::PharmacistPrescriptions => "Prescriptions",
            Self::CashierPos => "Point of sale",
            Self::CashierSession => "Cash session",
            Self::NotFound => "Not found",
        }
    }

    /// 角色侧边导航的条目
    pub fn nav_for(role: Role) -> &'static [AppRoute] {
        match role {
            Role::Admin => &[
                Self::AdminDashboard,
                Self::AdminPharmacies,
                Self::AdminBilling,
                Self::AdminSupport,
            ],
            Role::Manager => &[
                Self::ManagerDashboard,
                Self::ManagerBranches,
                Self::ManagerStaff,
                Self::ManagerSupport,
            ],
            Role::Pharmacist => &[
                Self::PharmacistDashboard,
                Self::PharmacistInventory,
                Self::PharmacistPrescriptions,
            ],
            Role::Cashier => &[Self::CashierPos, Self::CashierSession],
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [AppRoute; 16] = [
        AppRoute::Login,
        AppRoute::Signup,
        AppRoute::AdminDashboard,
        AppRoute::AdminPharmacies,
        AppRoute::AdminBilling,
        AppRoute::AdminSupport,
        AppRoute::ManagerDashboard,
        AppRoute::ManagerBranches,
        AppRoute::ManagerStaff,
        AppRoute::ManagerSupport,
        AppRoute::PharmacistDashboard,
        AppRoute::PharmacistInventory,
        AppRoute::PharmacistPrescriptions,
        AppRoute::CashierPos,
        AppRoute::CashierSession,
        AppRoute::NotFound,
    ];

    #[test]
    fn paths_resolve_back_to_their_route() {
        for route in ALL.into_iter().filter(|r| *r != AppRoute::NotFound) {
            assert_eq!(AppRoute::from_path(route.to_path()), route, "{}", route);
        }
        assert_eq!(AppRoute::from_path("/admin/"), AppRoute::AdminDashboard);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn anonymous_user_is_sent_to_login() {
        assert_eq!(AppRoute::CashierPos.guard(None), AppRoute::Login);
        assert_eq!(AppRoute::AdminBilling.guard(None), AppRoute::Login);
        assert_eq!(AppRoute::Signup.guard(None), AppRoute::Signup);
        assert_eq!(AppRoute::NotFound.guard(None), AppRoute::NotFound);
    }

    #[test]
    fn wrong_role_lands_on_own_home() {
        assert_eq!(
            AppRoute::AdminPharmacies.guard(Some(Role::Cashier)),
            AppRoute::CashierPos
        );
        assert_eq!(
            AppRoute::CashierSession.guard(Some(Role::Pharmacist)),
            AppRoute::PharmacistDashboard
        );
        assert_eq!(
            AppRoute::ManagerStaff.guard(Some(Role::Manager)),
            AppRoute::ManagerStaff
        );
    }

    #[test]
    fn signed_in_user_skips_login_pages() {
        assert_eq!(
            AppRoute::Login.guard(Some(Role::Admin)),
            AppRoute::AdminDashboard
        );
        assert_eq!(
            AppRoute::Signup.guard(Some(Role::Manager)),
            AppRoute::ManagerDashboard
        );
    }

    #[test]
    fn every_nav_entry_belongs_to_its_role() {
        for role in [Role::Admin, Role::Manager, Role::Pharmacist, Role::Cashier] {
            assert!(AppRoute::nav_for(role).contains(&AppRoute::home_for(role)));
            for route in AppRoute::nav_for(role) {
                assert_eq!(route.required_role(), Some(role));
            }
        }
    }
}
