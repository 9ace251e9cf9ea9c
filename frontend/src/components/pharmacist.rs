//! 药剂师页面

mod dashboard;
mod inventory;
mod prescriptions;

pub use dashboard::PharmacistDashboardPage;
pub use inventory::InventoryPage;
pub use prescriptions::PrescriptionsPage;

use pharmacy_shared::Product;
use pharmacy_shared::inventory::{EXPIRY_WARNING_DAYS, is_expired, is_expiring, is_low_stock};

/// 商品的库存/效期标签，`(文字, daisyUI 样式)`；用于表格行，均为小号徽章
pub(crate) fn stock_badges(
    product: &Product,
    today: Option<chrono::NaiveDate>,
) -> Vec<(&'static str, &'static str)> {
    let mut badges = Vec::new();
    if product.stock_quantity == 0 {
        badges.push(("Out of stock", "badge-error badge-sm"));
    } else if is_low_stock(product) {
        badges.push(("Low stock", "badge-warning badge-sm"));
    }
    if let Some(today) = today {
        if is_expired(product, today) {
            badges.push(("Expired", "badge-error badge-sm"));
        } else if is_expiring(product, today, EXPIRY_WARNING_DAYS) {
            badges.push(("Expiring soon", "badge-warning badge-sm"));
        }
    }
    badges
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn product(stock: u32, expiry: Option<NaiveDate>) -> Product {
        Product {
            id: "p1".into(),
            name: "Amoxicillin".into(),
            category: None,
            price: Decimal::from(80),
            stock_quantity: stock,
            reorder_level: Some(5),
            expiry_date: expiry,
            requires_prescription: true,
            barcode: None,
        }
    }

    #[test]
    fn badges_are_small_and_flag_stock_and_expiry() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19);
        let expired = NaiveDate::from_ymd_opt(2026, 9, 1);

        assert_eq!(
            stock_badges(&product(0, expired), today),
            vec![("Out of stock", "badge-error badge-sm"), ("Expired", "badge-error badge-sm")]
        );
        assert_eq!(
            stock_badges(&product(3, NaiveDate::from_ymd_opt(2026, 11, 1)), today),
            vec![("Low stock", "badge-warning badge-sm"), ("Expiring soon", "badge-warning badge-sm")]
        );
        assert!(stock_badges(&product(50, expired), None).is_empty());
    }
}
