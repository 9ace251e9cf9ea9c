//! 领域模型
//!
//! 与后端 JSON 一一对应的视图模型。所有实体都是临时的：
//! 拉取、展示、可能回写，然后在页面切换时丢弃。

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// =========================================================
// 身份与权限 (Identity)
// =========================================================

/// 用户角色，决定可访问的仪表盘
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Pharmacist,
    Cashier,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Pharmacist => "pharmacist",
            Role::Cashier => "cashier",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Manager => "Manager",
            Role::Pharmacist => "Pharmacist",
            Role::Cashier => "Cashier",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub pharmacy_id: Option<String>,
    #[serde(default)]
    pub branch_id: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// 登录后的会话：用户 + 令牌
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl Session {
    pub fn role(&self) -> Role {
        self.user.role
    }
}

// =========================================================
// 租户 (Tenancy)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PharmacyStatus {
    Active,
    #[default]
    Pending,
    Suspended,
}

impl PharmacyStatus {
    pub const ALL: [PharmacyStatus; 3] = [
        PharmacyStatus::Active,
        PharmacyStatus::Pending,
        PharmacyStatus::Suspended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PharmacyStatus::Active => "active",
            PharmacyStatus::Pending => "pending",
            PharmacyStatus::Suspended => "suspended",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PharmacyStatus::Active => "Active",
            PharmacyStatus::Pending => "Pending",
            PharmacyStatus::Suspended => "Suspended",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pharmacy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner_name: Option<String>,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status: PharmacyStatus,
    #[serde(default)]
    pub subscription_plan: Option<String>,
    #[serde(default)]
    pub branch_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub pharmacy_id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub manager_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =========================================================
// 库存与销售 (Inventory & Sales)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub price: Decimal,
    pub stock_quantity: u32,
    #[serde(default)]
    pub reorder_level: Option<u32>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub requires_prescription: bool,
    #[serde(default)]
    pub barcode: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    MobileMoney,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::MobileMoney,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::MobileMoney => "mobile_money",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::MobileMoney => "Mobile Money",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    #[serde(default)]
    pub items: Vec<SaleItem>,
    pub subtotal: Decimal,
    #[serde(default)]
    pub discount_percent: Decimal,
    pub total: Decimal,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub cashier_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =========================================================
// 处方 (Prescriptions)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrescriptionStatus {
    #[default]
    Pending,
    Dispensed,
    Rejected,
}

impl PrescriptionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PrescriptionStatus::Pending => "Pending",
            PrescriptionStatus::Dispensed => "Dispensed",
            PrescriptionStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: String,
    pub patient_name: String,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub status: PrescriptionStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =========================================================
// 支持与账单 (Support & Billing)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TicketPriority {
    pub const ALL: [TicketPriority; 3] = [
        TicketPriority::Low,
        TicketPriority::Medium,
        TicketPriority::High,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Medium => "medium",
            TicketPriority::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TicketPriority::Low => "Low",
            TicketPriority::Medium => "Medium",
            TicketPriority::High => "High",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In progress",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub priority: TicketPriority,
    #[serde(default)]
    pub status: TicketStatus,
    #[serde(default)]
    pub pharmacy_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingStatus {
    #[default]
    Open,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingIssue {
    pub id: String,
    pub pharmacy_id: String,
    #[serde(default)]
    pub pharmacy_name: Option<String>,
    pub amount: Decimal,
    pub description: String,
    #[serde(default)]
    pub status: BillingStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

// =========================================================
// 收银班次 (Cash Session)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashSessionStatus {
    #[default]
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashSession {
    pub id: String,
    #[serde(default)]
    pub cashier_id: Option<String>,
    pub opening_balance: Decimal,
    #[serde(default)]
    pub closing_balance: Option<Decimal>,
    #[serde(default)]
    pub expected_balance: Option<Decimal>,
    #[serde(default)]
    pub status: CashSessionStatus,
    pub opened_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

// =========================================================
// 仪表盘汇总 (Dashboard summaries)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminStats {
    pub total_pharmacies: u32,
    pub active_pharmacies: u32,
    pub pending_pharmacies: u32,
    pub total_branches: u32,
    pub open_tickets: u32,
    pub open_billing_issues: u32,
    pub monthly_revenue: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerStats {
    pub total_branches: u32,
    pub total_staff: u32,
    pub today_sales: Decimal,
    pub monthly_sales: Decimal,
    pub low_stock_items: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PharmacistStats {
    pub total_products: u32,
    pub low_stock_items: u32,
    pub expiring_soon: u32,
    pub pending_prescriptions: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CashierStats {
    pub today_sales: Decimal,
    pub today_transactions: u32,
    pub average_ticket: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_deserializes_numeric_price_and_ignores_unknown_fields() {
        let json = r#"{
            "id": "p1",
            "name": "Paracetamol 500mg",
            "price": 12.5,
            "stock_quantity": 40,
            "expiry_date": "2027-03-01",
            "supplier": "ignored"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Decimal::new(125, 1));
        assert_eq!(product.stock_quantity, 40);
        assert_eq!(product.expiry_date, NaiveDate::from_ymd_opt(2027, 3, 1));
        assert!(!product.requires_prescription);
    }

    #[test]
    fn role_uses_snake_case_on_the_wire() {
        let user: User = serde_json::from_str(
            r#"{"id":"u1","name":"Abebe","email":"a@b.et","role":"pharmacist"}"#,
        )
        .unwrap();
        assert_eq!(user.role, Role::Pharmacist);
        assert!(user.is_active);
        assert_eq!(
            serde_json::to_string(&PaymentMethod::MobileMoney).unwrap(),
            "\"mobile_money\""
        );
    }

    #[test]
    fn stats_default_missing_fields() {
        let stats: AdminStats = serde_json::from_str(r#"{"total_pharmacies": 4}"#).unwrap();
        assert_eq!(stats.total_pharmacies, 4);
        assert_eq!(stats.monthly_revenue, Decimal::ZERO);
    }
}
