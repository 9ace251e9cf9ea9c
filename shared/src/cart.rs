//! POS 购物车
//!
//! 有序的 `{product, quantity}` 列表，以及小计/折扣/总价的十进制计算。
//! 所有数量变更都受商品库存 `stock_quantity` 约束。

use crate::models::{PaymentMethod, Product};
use crate::protocol::CreateSaleRequest;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Only {available} unit(s) of {product} in stock")]
    InsufficientStock { product: String, available: u32 },

    #[error("Discount must be between 0 and 100")]
    InvalidDiscount,

    #[error("Cart is empty")]
    Empty,
}

/// 百分比折扣，只能在 `[0, 100]` 区间内构造
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Discount(Decimal);

impl Discount {
    pub const NONE: Discount = Discount(Decimal::ZERO);

    pub fn new(percent: Decimal) -> Result<Self, CartError> {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(CartError::InvalidDiscount);
        }
        Ok(Self(percent))
    }

    /// 解析输入框中的折扣，空串视为 0
    pub fn parse(raw: &str) -> Result<Self, CartError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::NONE);
        }
        let value = raw
            .parse::<Decimal>()
            .map_err(|_| CartError::InvalidDiscount)?;
        Self::new(value)
    }

    pub fn percent(&self) -> Decimal {
        self.0
    }

    /// `1 - percent / 100`
    fn multiplier(&self) -> Decimal {
        Decimal::ONE - self.0 / Decimal::ONE_HUNDRED
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// 提交给后端的销售明细行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl From<&CartLine> for SaleLine {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id.clone(),
            product_name: line.product.name.clone(),
            quantity: line.quantity,
            unit_price: line.product.price,
            line_total: line.line_total(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 所有行的件数之和
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.position(product_id)
            .map(|i| self.lines[i].quantity)
            .unwrap_or(0)
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.product.id == product_id)
    }

    /// 加入一件商品
    ///
    /// 已在购物车中则数量 +1，否则追加新行。超出库存时拒绝且购物车不变。
    pub fn add_to_cart(&mut self, product: &Product) -> Result<(), CartError> {
        match self.position(&product.id) {
            Some(i) => {
                let line = &mut self.lines[i];
                if line.quantity >= product.stock_quantity {
                    return Err(insufficient(product));
                }
                line.quantity += 1;
                // 刷新快照，价格与库存以最新拉取的为准
                line.product = product.clone();
            }
            None => {
                if product.stock_quantity == 0 {
                    return Err(insufficient(product));
                }
                self.lines.push(CartLine {
                    product: product.clone(),
                    quantity: 1,
                });
            }
        }
        Ok(())
    }

    /// 设置某行数量，`quantity <= 0` 时移除该行
    ///
    /// 不在购物车中的商品忽略。
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> Result<(), CartError> {
        let Some(i) = self.position(product_id) else {
            return Ok(());
        };
        if quantity <= 0 {
            self.lines.remove(i);
            return Ok(());
        }

        let line = &mut self.lines[i];
        let available = line.product.stock_quantity;
        if quantity > i64::from(available) {
            return Err(insufficient(&line.product));
        }
        line.quantity = quantity as u32;
        Ok(())
    }

    pub fn remove(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product.id != product_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Σ price × quantity
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// subtotal × (1 − discount / 100)
    pub fn total(&self, discount: Discount) -> Decimal {
        self.subtotal() * discount.multiplier()
    }

    pub fn discount_amount(&self, discount: Discount) -> Decimal {
        self.subtotal() - self.total(discount)
    }

    /// 打包为销售请求，金额保留两位小数
    pub fn to_sale_request(
        &self,
        discount: Discount,
        payment_method: PaymentMethod,
    ) -> Result<CreateSaleRequest, CartError> {
        if self.is_empty() {
            return Err(CartError::Empty);
        }
        Ok(CreateSaleRequest {
            items: self.lines.iter().map(SaleLine::from).collect(),
            subtotal: self.subtotal().round_dp(2),
            discount_percent: discount.percent(),
            total: self.total(discount).round_dp(2),
            payment_method,
        })
    }
}

fn insufficient(product: &Product) -> CartError {
    CartError::InsufficientStock {
        product: product.name.clone(),
        available: product.stock_quantity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn product(id: &str, price: &str, stock: u32) -> Product {
        Product {
            id: id.into(),
            name: format!("Product {}", id),
            category: None,
            price: dec(price),
            stock_quantity: stock,
            reorder_level: None,
            expiry_date: None,
            requires_prescription: false,
            barcode: None,
        }
    }

    #[test]
    fn add_inserts_then_increments() {
        let mut cart = Cart::new();
        let a = product("a", "10.00", 5);
        let b = product("b", "2.50", 5);

        cart.add_to_cart(&a).unwrap();
        cart.add_to_cart(&b).unwrap();
        cart.add_to_cart(&a).unwrap();

        let ids: Vec<_> = cart.lines().iter().map(|l| l.product.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(cart.quantity_of("a"), 2);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn add_beyond_stock_is_rejected() {
        let mut cart = Cart::new();
        let a = product("a", "1", 2);
        cart.add_to_cart(&a).unwrap();
        cart.add_to_cart(&a).unwrap();

        let err = cart.add_to_cart(&a).unwrap_err();
        assert_eq!(
            err,
            CartError::InsufficientStock {
                product: "Product a".into(),
                available: 2
            }
        );
        assert_eq!(cart.quantity_of("a"), 2);
    }

    #[test]
    fn out_of_stock_product_cannot_be_added() {
        let mut cart = Cart::new();
        assert!(cart.add_to_cart(&product("z", "1", 0)).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn update_quantity_removes_at_zero_or_below() {
        let mut cart = Cart::new();
        cart.add_to_cart(&product("a", "1", 9)).unwrap();
        cart.add_to_cart(&product("b", "1", 9)).unwrap();

        cart.update_quantity("a", 0).unwrap();
        cart.update_quantity("b", -4).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn update_quantity_is_bounded_by_stock() {
        let mut cart = Cart::new();
        cart.add_to_cart(&product("a", "1", 3)).unwrap();

        cart.update_quantity("a", 3).unwrap();
        assert_eq!(cart.quantity_of("a"), 3);
        assert!(cart.update_quantity("a", 4).is_err());
        assert_eq!(cart.quantity_of("a"), 3);

        // unknown ids are ignored
        cart.update_quantity("missing", 2).unwrap();
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn subtotal_and_total() {
        let mut cart = Cart::new();
        let a = product("a", "12.50", 10);
        let b = product("b", "3.20", 10);
        cart.add_to_cart(&a).unwrap();
        cart.add_to_cart(&a).unwrap();
        cart.add_to_cart(&b).unwrap();

        assert_eq!(cart.subtotal(), dec("28.20"));
        assert_eq!(cart.total(Discount::NONE), dec("28.20"));
        assert_eq!(cart.total(Discount::new(dec("10")).unwrap()), dec("25.38"));
        assert_eq!(cart.total(Discount::new(Decimal::ONE_HUNDRED).unwrap()), Decimal::ZERO);
        assert_eq!(
            cart.discount_amount(Discount::new(dec("25")).unwrap()),
            dec("7.05")
        );
    }

    #[test]
    fn total_holds_for_every_whole_percent() {
        let mut cart = Cart::new();
        cart.add_to_cart(&product("a", "19.99", 4)).unwrap();
        cart.update_quantity("a", 3).unwrap();
        let subtotal = cart.subtotal();

        for pct in 0..=100u32 {
            let d = Discount::new(Decimal::from(pct)).unwrap();
            let total = cart.total(d);
            let expected = subtotal - subtotal * Decimal::from(pct) / Decimal::ONE_HUNDRED;
            assert_eq!(total, expected, "discount {}%", pct);
            assert!(total >= Decimal::ZERO && total <= subtotal);
        }
    }

    #[test]
    fn discount_range_is_enforced() {
        assert_eq!(Discount::new(dec("-0.01")), Err(CartError::InvalidDiscount));
        assert_eq!(Discount::new(dec("100.01")), Err(CartError::InvalidDiscount));
        assert_eq!(Discount::parse("abc"), Err(CartError::InvalidDiscount));
        assert_eq!(Discount::parse("  "), Ok(Discount::NONE));
        assert_eq!(Discount::parse("7.5").unwrap().percent(), dec("7.5"));
    }

    #[test]
    fn sale_request_packages_lines() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.to_sale_request(Discount::NONE, PaymentMethod::Cash),
            Err(CartError::Empty)
        );

        cart.add_to_cart(&product("a", "10", 5)).unwrap();
        cart.update_quantity("a", 3).unwrap();
        let req = cart
            .to_sale_request(Discount::new(dec("15")).unwrap(), PaymentMethod::MobileMoney)
            .unwrap();

        assert_eq!(req.items.len(), 1);
        assert_eq!(req.items[0].quantity, 3);
        assert_eq!(req.items[0].line_total, dec("30"));
        assert_eq!(req.subtotal, dec("30"));
        assert_eq!(req.total, dec("25.50"));
        assert_eq!(req.payment_method, PaymentMethod::MobileMoney);
    }

    #[test]
    fn sale_request_sends_money_as_numbers() {
        let mut cart = Cart::new();
        cart.add_to_cart(&product("a", "12.50", 5)).unwrap();
        let req = cart.to_sale_request(Discount::NONE, PaymentMethod::Cash).unwrap();

        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["subtotal"], 12.5);
        assert_eq!(v["discount_percent"], 0.0);
        assert_eq!(v["total"], 12.5);
        assert_eq!(v["items"][0]["unit_price"], 12.5);
        assert_eq!(v["items"][0]["line_total"], 12.5);
        assert_eq!(v["items"][0]["quantity"], 1);
    }
}
