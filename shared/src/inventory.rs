//! 库存辅助函数：低库存、临期判断与商品搜索

use crate::models::Product;
use chrono::NaiveDate;

/// 商品未设置补货线时使用
pub const DEFAULT_REORDER_LEVEL: u32 = 10;

/// 默认临期预警天数
pub const EXPIRY_WARNING_DAYS: i64 = 30;

pub fn is_low_stock(product: &Product) -> bool {
    product.stock_quantity <= product.reorder_level.unwrap_or(DEFAULT_REORDER_LEVEL)
}

pub fn is_expired(product: &Product, today: NaiveDate) -> bool {
    product.expiry_date.is_some_and(|d| d < today)
}

/// 未过期但将在 `within_days` 天内过期
pub fn is_expiring(product: &Product, today: NaiveDate, within_days: i64) -> bool {
    product.expiry_date.is_some_and(|d| {
        let days_left = (d - today).num_days();
        (0..=within_days).contains(&days_left)
    })
}

/// 按名称、分类、条码做不区分大小写的匹配；空查询返回全部
pub fn search<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.iter().collect();
    }
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.category
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(&needle))
                || p.barcode.as_deref().is_some_and(|b| b.to_lowercase() == needle)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StockSummary {
    pub total: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub expiring: usize,
    pub expired: usize,
}

pub fn summarize(products: &[Product], today: NaiveDate) -> StockSummary {
    products.iter().fold(StockSummary::default(), |mut s, p| {
        s.total += 1;
        if p.stock_quantity == 0 {
            s.out_of_stock += 1;
        } else if is_low_stock(p) {
            s.low_stock += 1;
        }
        if is_expired(p, today) {
            s.expired += 1;
        } else if is_expiring(p, today, EXPIRY_WARNING_DAYS) {
            s.expiring += 1;
        }
        s
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(name: &str, stock: u32, expiry: Option<NaiveDate>) -> Product {
        Product {
            id: name.to_lowercase(),
            name: name.into(),
            category: Some("Analgesics".into()),
            price: Decimal::ONE,
            stock_quantity: stock,
            reorder_level: None,
            expiry_date: expiry,
            requires_prescription: false,
            barcode: Some("6291041500213".into()),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn low_stock_uses_reorder_level() {
        let mut p = product("Ibuprofen", 10, None);
        assert!(is_low_stock(&p));
        p.stock_quantity = 11;
        assert!(!is_low_stock(&p));
        p.reorder_level = Some(20);
        assert!(is_low_stock(&p));
    }

    #[test]
    fn expiry_windows() {
        let today = day(2026, 10, 19);
        let soon = product("A", 5, Some(day(2026, 11, 1)));
        let later = product("B", 5, Some(day(2027, 6, 1)));
        let past = product("C", 5, Some(day(2026, 10, 18)));

        assert!(is_expiring(&soon, today, 30));
        assert!(!is_expiring(&later, today, 30));
        assert!(!is_expiring(&past, today, 30));
        assert!(is_expired(&past, today));
        assert!(!is_expired(&soon, today));
    }

    #[test]
    fn search_matches_name_category_and_barcode() {
        let items = vec![product("Paracetamol", 3, None), product("Vitamin C", 3, None)];
        assert_eq!(search(&items, "PARA").len(), 1);
        assert_eq!(search(&items, "analg").len(), 2);
        assert_eq!(search(&items, "6291041500213").len(), 2);
        assert_eq!(search(&items, "  ").len(), 2);
        assert!(search(&items, "insulin").is_empty());
    }

    #[test]
    fn search_matches_barcode_regardless_of_case() {
        let mut amox = product("Amoxicillin", 20, None);
        amox.barcode = Some("AMX-500".into());
        let items = vec![amox, product("Vitamin C", 3, None)];
        let hits = search(&items, "AMX-500");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Amoxicillin");
        assert_eq!(search(&items, " amx-500 ").len(), 1);
        assert!(search(&items, "AMX-50").is_empty());
    }

    #[test]
    fn summary_counts() {
        let today = day(2026, 10, 19);
        let items = vec![
            product("A", 0, None),
            product("B", 4, Some(day(2026, 10, 25))),
            product("C", 50, Some(day(2025, 1, 1))),
        ];
        let s = summarize(&items, today);
        assert_eq!(
            s,
            StockSummary {
                total: 3,
                low_stock: 1,
                out_of_stock: 1,
                expiring: 1,
                expired: 1,
            }
        );
    }
}
