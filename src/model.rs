//! Records the generator synthesizes, and the money math behind them.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use strum::{AsRefStr, Display, EnumIter};

/// Every generated customer lives here
pub const COUNTRY: &str = "USA";

/// Round to cents
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One weighted draw per loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Action {
    CreateCustomer,
    CreateOrder,
    CreateReview,
}

impl Action {
    pub fn weight(self) -> f64 {
        match self {
            Action::CreateCustomer => 0.15,
            Action::CreateOrder => 0.55,
            Action::CreateReview => 0.30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    Placed,
    Paid,
    Packed,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    ApplePay,
    BankTransfer,
}

/// Tone requested from the text synthesizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostalAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl std::fmt::Display for PostalAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {} {}",
            self.street, self.city, self.state, self.postal_code
        )
    }
}

/// A synthesized person, before the store hands out an id
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub address: PostalAddress,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub person: Person,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub product_id: i64,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    pub discount: f64,
}

impl LineItem {
    /// `price * quantity - discount`, floored at zero. The discount itself is never clamped.
    pub fn total(&self) -> f64 {
        (self.price * self.quantity as f64 - self.discount).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub placed_at: NaiveDateTime,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub shipping_address: String,
    pub items: Vec<LineItem>,
}

impl Order {
    /// Sum of the line totals, rounded once at the end
    pub fn total_amount(&self) -> f64 {
        round2(self.items.iter().map(LineItem::total).sum())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub user_id: i64,
    pub product_id: i64,
    pub rating: i64,
    pub text: String,
    pub reviewed_at: NaiveDateTime,
}

/// Product ids and names as read at the start of an iteration
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    ids: Vec<i64>,
    names: HashMap<i64, String>,
}

impl Catalog {
    pub fn new(products: Vec<(i64, String)>) -> Self {
        let ids = products.iter().map(|(id, _)| *id).collect();
        let names = products.into_iter().collect();
        Self { ids, names }
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn name(&self, product_id: i64) -> Option<&str> {
        self.names.get(&product_id).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn item(quantity: i64, price: f64, discount: f64) -> LineItem {
        LineItem {
            product_id: 1,
            name: "Widget".to_string(),
            quantity,
            price,
            discount,
        }
    }

    fn order(items: Vec<LineItem>) -> Order {
        Order {
            id: 1,
            customer_id: 100,
            placed_at: NaiveDate::from_ymd_opt(2026, 3, 4)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            status: OrderStatus::Placed,
            payment_method: PaymentMethod::Paypal,
            shipping_address: "1 Main St, Springfield, IL 62701".to_string(),
            items,
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(10.004), 10.0);
        assert_eq!(round2(10.006), 10.01);
        assert_eq!(round2(149.999), 150.0);
    }

    #[test]
    fn test_line_total_applies_discount() {
        assert_eq!(item(3, 20.0, 5.5).total(), 54.5);
    }

    #[test]
    fn test_line_total_floors_at_zero() {
        // low price, high discount
        assert_eq!(item(1, 5.0, 9.99).total(), 0.0);
    }

    #[test]
    fn test_order_total_sums_line_totals() {
        let order = order(vec![item(2, 10.0, 0.0), item(3, 20.0, 0.0)]);
        assert_eq!(order.total_amount(), 80.0);
    }

    #[test]
    fn test_order_total_rounds_once() {
        let order = order(vec![item(3, 33.33, 0.0), item(1, 5.0, 9.0), item(2, 12.35, 1.07)]);
        assert_eq!(order.total_amount(), 123.62);
    }

    #[test]
    fn test_action_weights_sum_to_one() {
        let sum: f64 = Action::iter().map(Action::weight).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_enum_labels() {
        let statuses: Vec<String> = OrderStatus::iter().map(|s| s.to_string()).collect();
        assert_eq!(
            statuses,
            ["placed", "paid", "packed", "shipped", "delivered", "cancelled"]
        );
        let methods: Vec<String> = PaymentMethod::iter().map(|m| m.as_ref().to_string()).collect();
        assert_eq!(
            methods,
            ["credit_card", "debit_card", "paypal", "apple_pay", "bank_transfer"]
        );
        assert_eq!(Sentiment::Negative.to_string(), "negative");
    }

    #[test]
    fn test_postal_address_display() {
        let address = PostalAddress {
            street: "12 Oak Ave".to_string(),
            city: "Dayton".to_string(),
            state: "OH".to_string(),
            postal_code: "45402".to_string(),
        };
        assert_eq!(address.to_string(), "12 Oak Ave, Dayton, OH 45402");
    }

    #[test]
    fn test_catalog() {
        let catalog = Catalog::new(vec![(1, "Widget".to_string()), (2, "Gadget".to_string())]);
        assert_eq!(catalog.ids(), &[1, 2]);
        assert_eq!(catalog.name(2), Some("Gadget"));
        assert_eq!(catalog.name(3), None);
        assert!(Catalog::default().is_empty());
    }
}
