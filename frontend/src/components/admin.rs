//! 平台管理员页面

mod billing;
mod dashboard;
mod pharmacies;
mod support;

pub use billing::BillingPage;
pub use dashboard::AdminDashboardPage;
pub use pharmacies::PharmaciesPage;
pub use support::SupportTicketsPage;
