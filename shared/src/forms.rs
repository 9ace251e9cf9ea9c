//! CRUD 表单
//!
//! 每个表单分两层：
//! - `*Draft`: 输入框里的原始字符串，界面直接绑定
//! - `*Form`: 校验通过后的强类型请求体
//!
//! `Draft::validate` 是两者之间唯一的入口。

use crate::models::{Branch, Pharmacy, Product, Role, TicketPriority};
use crate::validation::{
    FieldErrors, optional_phone, parse_count, parse_decimal_in_range, require,
    require_email, require_password, require_phone,
};
use crate::sheet::{Record, cell};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// =========================================================
// Pharmacy (admin)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PharmacyForm {
    pub name: String,
    pub owner_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub subscription_plan: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PharmacyDraft {
    pub name: String,
    pub owner_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub subscription_plan: String,
}

impl PharmacyDraft {
    pub fn validate(&self) -> Result<PharmacyForm, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", "Pharmacy name", &self.name);
        require_email(&mut errors, "email", &self.email);
        require_phone(&mut errors, "phone", &self.phone);
        errors.into_result()?;

        Ok(PharmacyForm {
            name: self.name.trim().to_string(),
            owner_name: non_empty(&self.owner_name),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: non_empty(&self.address),
            subscription_plan: non_empty(&self.subscription_plan),
        })
    }
}

impl From<&Pharmacy> for PharmacyDraft {
    fn from(p: &Pharmacy) -> Self {
        Self {
            name: p.name.clone(),
            owner_name: p.owner_name.clone().unwrap_or_default(),
            email: p.email.clone(),
            phone: p.phone.clone(),
            address: p.address.clone().unwrap_or_default(),
            subscription_plan: p.subscription_plan.clone().unwrap_or_default(),
        }
    }
}

// =========================================================
// Branch (manager)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchForm {
    pub name: String,
    pub location: String,
    pub phone: Option<String>,
    pub manager_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchDraft {
    pub name: String,
    pub location: String,
    pub phone: String,
    pub manager_name: String,
}

impl BranchDraft {
    pub fn validate(&self) -> Result<BranchForm, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", "Branch name", &self.name);
        require(&mut errors, "location", "Location", &self.location);
        optional_phone(&mut errors, "phone", &self.phone);
        errors.into_result()?;

        Ok(BranchForm {
            name: self.name.trim().to_string(),
            location: self.location.trim().to_string(),
            phone: non_empty(&self.phone),
            manager_name: non_empty(&self.manager_name),
        })
    }
}

impl From<&Branch> for BranchDraft {
    fn from(b: &Branch) -> Self {
        Self {
            name: b.name.clone(),
            location: b.location.clone(),
            phone: b.phone.clone().unwrap_or_default(),
            manager_name: b.manager_name.clone().unwrap_or_default(),
        }
    }
}

// =========================================================
// Staff (manager)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub branch_id: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaffDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub branch_id: String,
    pub password: String,
}

impl Default for StaffDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            role: Role::Cashier,
            branch_id: String::new(),
            password: String::new(),
        }
    }
}

impl StaffDraft {
    /// 经理只能创建药剂师和收银员
    pub const ASSIGNABLE_ROLES: [Role; 2] = [Role::Pharmacist, Role::Cashier];

    pub fn validate(&self) -> Result<StaffForm, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", "Full name", &self.name);
        require_email(&mut errors, "email", &self.email);
        optional_phone(&mut errors, "phone", &self.phone);
        require_password(&mut errors, "password", &self.password);
        if !Self::ASSIGNABLE_ROLES.contains(&self.role) {
            errors.add("role", "Staff must be a pharmacist or a cashier");
        }
        errors.into_result()?;

        Ok(StaffForm {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: non_empty(&self.phone),
            role: self.role,
            branch_id: non_empty(&self.branch_id),
            password: self.password.clone(),
        })
    }
}

// =========================================================
// Product (pharmacist)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub category: Option<String>,
    pub price: Decimal,
    pub stock_quantity: u32,
    pub reorder_level: Option<u32>,
    pub expiry_date: Option<NaiveDate>,
    pub requires_prescription: bool,
    pub barcode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub price: String,
    pub stock_quantity: String,
    pub reorder_level: String,
    /// `YYYY-MM-DD`，来自 `<input type="date">`
    pub expiry_date: String,
    pub requires_prescription: bool,
    pub barcode: String,
}

impl ProductDraft {
    pub fn validate(&self) -> Result<ProductForm, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", "Product name", &self.name);
        let price = if require(&mut errors, "price", "Price", &self.price) {
            parse_decimal_in_range(&mut errors, "price", "Price", &self.price, Decimal::ZERO, None)
        } else {
            None
        };
        let stock = if require(&mut errors, "stock_quantity", "Stock", &self.stock_quantity) {
            parse_count(&mut errors, "stock_quantity", "Stock", &self.stock_quantity)
        } else {
            None
        };
        let reorder_level = if self.reorder_level.trim().is_empty() {
            None
        } else {
            parse_count(&mut errors, "reorder_level", "Reorder level", &self.reorder_level)
        };
        let expiry_date = match self.expiry_date.trim() {
            "" => None,
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(d) => Some(d),
                Err(_) => {
                    errors.add("expiry_date", "Expiry date must be YYYY-MM-DD");
                    None
                }
            },
        };
        if !errors.is_empty() {
            return Err(errors);
        }
        let (Some(price), Some(stock_quantity)) = (price, stock) else {
            return Err(errors);
        };

        Ok(ProductForm {
            name: self.name.trim().to_string(),
            category: non_empty(&self.category),
            price,
            stock_quantity,
            reorder_level,
            expiry_date,
            requires_prescription: self.requires_prescription,
            barcode: non_empty(&self.barcode),
        })
    }
}

impl ProductDraft {
    /// 由导入表格中的一行构造，表头与字段名对应（`stock` 亦可）
    pub fn from_record(record: &Record) -> Self {
        let stock = match cell(record, "stock_quantity") {
            "" => cell(record, "stock"),
            v => v,
        };
        Self {
            name: cell(record, "name").to_string(),
            category: cell(record, "category").to_string(),
            price: cell(record, "price").to_string(),
            stock_quantity: stock.to_string(),
            reorder_level: cell(record, "reorder_level").to_string(),
            expiry_date: cell(record, "expiry_date").to_string(),
            requires_prescription: matches!(
                cell(record, "requires_prescription").to_ascii_lowercase().as_str(),
                "yes" | "true" | "1" | "y"
            ),
            barcode: cell(record, "barcode").to_string(),
        }
    }
}

impl From<&Product> for ProductDraft {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            category: p.category.clone().unwrap_or_default(),
            price: p.price.to_string(),
            stock_quantity: p.stock_quantity.to_string(),
            reorder_level: p.reorder_level.map(|r| r.to_string()).unwrap_or_default(),
            expiry_date: p
                .expiry_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            requires_prescription: p.requires_prescription,
            barcode: p.barcode.clone().unwrap_or_default(),
        }
    }
}

// =========================================================
// Support ticket (manager)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketForm {
    pub subject: String,
    pub message: String,
    pub priority: TicketPriority,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketDraft {
    pub subject: String,
    pub message: String,
    pub priority: TicketPriority,
}

impl TicketDraft {
    pub const MIN_MESSAGE_LEN: usize = 10;

    pub fn validate(&self) -> Result<TicketForm, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "subject", "Subject", &self.subject);
        if require(&mut errors, "message", "Message", &self.message)
            && self.message.trim().chars().count() < Self::MIN_MESSAGE_LEN
        {
            errors.add("message", "Please describe the issue in at least 10 characters");
        }
        errors.into_result()?;

        Ok(TicketForm {
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
            priority: self.priority,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pharmacy_draft_requires_contact_fields() {
        let draft = PharmacyDraft {
            name: " ".into(),
            email: "nope".into(),
            phone: "123".into(),
            ..Default::default()
        };
        let errors = draft.validate().unwrap_err();
        assert!(errors.contains("name"));
        assert!(errors.contains("email"));
        assert!(errors.contains("phone"));
    }

    #[test]
    fn pharmacy_draft_trims_and_drops_blank_optionals() {
        let draft = PharmacyDraft {
            name: " Selam Pharmacy ".into(),
            email: "info@selam.et".into(),
            phone: "0911234567".into(),
            address: "   ".into(),
            ..Default::default()
        };
        let form = draft.validate().unwrap();
        assert_eq!(form.name, "Selam Pharmacy");
        assert_eq!(form.address, None);
    }

    #[test]
    fn product_draft_rejects_negative_price_and_stock() {
        let draft = ProductDraft {
            name: "Amoxicillin".into(),
            price: "-5".into(),
            stock_quantity: "-1".into(),
            ..Default::default()
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.get("price"), Some("Price must be at least 0"));
        assert!(errors.contains("stock_quantity"));
    }

    #[test]
    fn product_draft_parses_fields() {
        let draft = ProductDraft {
            name: "Amoxicillin 250mg".into(),
            category: "Antibiotics".into(),
            price: "45.75".into(),
            stock_quantity: "120".into(),
            reorder_level: "20".into(),
            expiry_date: "2027-01-31".into(),
            requires_prescription: true,
            barcode: String::new(),
        };
        let form = draft.validate().unwrap();
        assert_eq!(form.price, Decimal::new(4575, 2));
        assert_eq!(form.stock_quantity, 120);
        assert_eq!(form.reorder_level, Some(20));
        assert_eq!(form.expiry_date, NaiveDate::from_ymd_opt(2027, 1, 31));
        assert_eq!(form.barcode, None);
    }

    #[test]
    fn product_draft_rejects_malformed_expiry() {
        let draft = ProductDraft {
            name: "ORS".into(),
            price: "3.50".into(),
            stock_quantity: "8".into(),
            expiry_date: "31/01/2027".into(),
            ..Default::default()
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.get("expiry_date"), Some("Expiry date must be YYYY-MM-DD"));
    }

    #[test]
    fn product_draft_from_imported_row() {
        let rows = vec![
            vec!["Name".to_string(), "Price".into(), "Stock".into(), "Requires_Prescription".into()],
            vec!["Insulin".to_string(), "320".into(), "12".into(), "Yes".into()],
        ];
        let records = crate::sheet::records_from_rows(&rows);
        let draft = ProductDraft::from_record(&records[0]);
        assert_eq!(draft.stock_quantity, "12");
        assert!(draft.requires_prescription);
        let form = draft.validate().unwrap();
        assert_eq!(form.price, Decimal::from(320));
    }

    #[test]
    fn staff_draft_rejects_privileged_roles() {
        let draft = StaffDraft {
            name: "Hana".into(),
            email: "hana@selam.et".into(),
            password: "Secret1".into(),
            role: Role::Admin,
            ..Default::default()
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("role"));
    }

    #[test]
    fn ticket_needs_a_real_message() {
        let draft = TicketDraft {
            subject: "Printer".into(),
            message: "broken".into(),
            priority: TicketPriority::High,
        };
        assert!(draft.validate().unwrap_err().contains("message"));
    }
}
