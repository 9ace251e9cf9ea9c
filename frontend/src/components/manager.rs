//! 药房经理页面

mod branches;
mod dashboard;
mod staff;
mod support;

pub use branches::BranchesPage;
pub use dashboard::ManagerDashboardPage;
pub use staff::StaffPage;
pub use support::ManagerSupportPage;
