//! Table definitions for the `retail` schema

use super::types::*;

pub static CUSTOMERS: TableSchema = TableSchema {
    name: "customers",
    primary_key: "customer_id",
    key_strategy: KeyStrategy::NextMax,
    columns: &[
        Column::required("customer_id", ColumnType::Integer),
        Column::required("first_name", ColumnType::Text),
        Column::required("last_name", ColumnType::Text),
        Column::required("email", ColumnType::Text).unique(),
        Column::new("phone_number", ColumnType::Text),
        Column::new("date_of_birth", ColumnType::Date),
        Column::new("address", ColumnType::Text),
        Column::new("city", ColumnType::Text),
        Column::new("state", ColumnType::Text),
        Column::new("postal_code", ColumnType::Text),
        Column::new("country", ColumnType::Text),
    ],
    foreign_keys: &[],
};

pub static PRODUCTS: TableSchema = TableSchema {
    name: "products",
    primary_key: "product_id",
    key_strategy: KeyStrategy::External,
    columns: &[
        Column::required("product_id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
    ],
    foreign_keys: &[],
};

pub static ORDERS: TableSchema = TableSchema {
    name: "orders",
    primary_key: "order_id",
    key_strategy: KeyStrategy::NextMax,
    columns: &[
        Column::required("order_id", ColumnType::Integer),
        // Legacy column, always written as NULL
        Column::new("order_detail_id", ColumnType::Integer),
        Column::required("customer_id", ColumnType::Integer),
        Column::required("total_amount", ColumnType::Real),
        Column::required("order_ts", ColumnType::Timestamp),
        Column::required("status", ColumnType::Text),
        Column::required("payment_method", ColumnType::Text),
        Column::new("shipping_address", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::new("customer_id", "customers", "customer_id")],
};

pub static ORDER_DETAIL: TableSchema = TableSchema {
    name: "order_detail",
    primary_key: "order_detail_id",
    key_strategy: KeyStrategy::StoreAssigned,
    columns: &[
        Column::required("order_detail_id", ColumnType::Integer),
        Column::required("order_id", ColumnType::Integer),
        Column::required("product_id", ColumnType::Integer),
        Column::new("name", ColumnType::Text),
        Column::required("quantity", ColumnType::Integer),
        Column::required("price", ColumnType::Real),
        Column::required("discount_amount", ColumnType::Real),
    ],
    foreign_keys: &[
        ForeignKey::new("order_id", "orders", "order_id"),
        ForeignKey::new("product_id", "products", "product_id"),
    ],
};

pub static REVIEWS: TableSchema = TableSchema {
    name: "reviews",
    primary_key: "review_id",
    key_strategy: KeyStrategy::StoreAssigned,
    columns: &[
        Column::required("review_id", ColumnType::Integer),
        Column::required("user_id", ColumnType::Integer),
        Column::required("product_id", ColumnType::Integer),
        Column::required("rating", ColumnType::Integer),
        Column::required("review_text", ColumnType::Text),
        Column::required("review_time", ColumnType::Timestamp),
    ],
    foreign_keys: &[
        ForeignKey::new("user_id", "customers", "customer_id"),
        ForeignKey::new("product_id", "products", "product_id"),
    ],
};

/// All tables, parents before children
pub static ALL_TABLES: &[&TableSchema] = &[&CUSTOMERS, &PRODUCTS, &ORDERS, &ORDER_DETAIL, &REVIEWS];
