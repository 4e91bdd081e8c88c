use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection};
use std::time::Duration;

use crate::model::{Catalog, Customer, Order, Review, COUNTRY};
use crate::schema::{
    generate_create_table, generate_indexes, generate_insert, generate_next_id, TableSchema,
    ALL_TABLES, CUSTOMERS, NAMESPACE, ORDERS, ORDER_DETAIL, PRODUCTS, REVIEWS,
};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Reject PostgreSQL connection strings rather than treating them as file names.
///
/// Both the URL form (`postgres://...`, `postgresql://...`) and the libpq
/// keyword form (`host=... dbname=...`) are refused.
pub fn sqlite_path(dsn: &str) -> Result<&str> {
    let lower = dsn.to_ascii_lowercase();
    if lower.starts_with("postgres://") || lower.starts_with("postgresql://") {
        bail!(
            "PG_DSN is a PostgreSQL URL; this generator writes to an SQLite database file, \
             set PG_DSN to a file path"
        );
    }
    if dsn.contains('=') && !dsn.contains(['/', '\\']) {
        bail!(
            "PG_DSN looks like a libpq key=value connection string; this generator writes \
             to an SQLite database file, set PG_DSN to a file path"
        );
    }

    Ok(dsn)
}

/// The one connection the generator writes through.
///
/// The connection string names an SQLite database that gets attached as the
/// `retail` schema, so statements address tables as `retail.<table>`.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(dsn: &str) -> Result<Self> {
        let dsn = sqlite_path(dsn)?;
        let conn = Connection::open_in_memory().context("Failed to open SQLite session")?;

        conn.execute(&format!("ATTACH DATABASE ?1 AS {}", NAMESPACE), [dsn])
            .with_context(|| format!("Failed to attach database: {}", dsn))?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        Ok(Self { conn })
    }

    /// Create any missing tables (and their foreign key indexes)
    pub fn bootstrap_schema(&self) -> Result<()> {
        for schema in ALL_TABLES {
            self.conn
                .execute(&generate_create_table(schema), [])
                .with_context(|| format!("Failed to create table: {}", schema.name))?;

            for index_sql in generate_indexes(schema) {
                self.conn
                    .execute(&index_sql, [])
                    .with_context(|| format!("Failed to create index for: {}", schema.name))?;
            }
        }

        Ok(())
    }

    pub fn product_catalog(&self) -> Result<Catalog> {
        let sql = format!(
            "SELECT product_id, name FROM {} ORDER BY product_id",
            PRODUCTS.qualified_name()
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let products = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<(i64, String)>>>()
            .context("Failed to read products")?;

        Ok(Catalog::new(products))
    }

    pub fn customer_ids(&self) -> Result<Vec<i64>> {
        let sql = format!(
            "SELECT customer_id FROM {} ORDER BY customer_id",
            CUSTOMERS.qualified_name()
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()
            .context("Failed to read customer ids")?;

        Ok(ids)
    }

    /// `MAX(key) + 1`. Racy if more than one generator writes the same store.
    pub fn next_id(&self, schema: &TableSchema) -> Result<i64> {
        self.conn
            .query_row(&generate_next_id(schema), [], |row| row.get(0))
            .with_context(|| format!("Failed to read next id for: {}", schema.name))
    }

    pub fn insert_customer(&self, customer: &Customer) -> Result<()> {
        let person = &customer.person;
        let mut stmt = self.conn.prepare_cached(&generate_insert(&CUSTOMERS))?;
        stmt.execute(params![
            customer.id,
            person.first_name,
            person.last_name,
            person.email,
            person.phone_number,
            person.date_of_birth,
            person.address.street,
            person.address.city,
            person.address.state,
            person.address.postal_code,
            COUNTRY,
        ])
        .with_context(|| format!("Failed to insert customer {}", customer.id))?;

        Ok(())
    }

    /// Insert the order, then its line items, and commit once.
    /// Nothing is kept if any statement fails.
    pub fn insert_order(&mut self, order: &Order) -> Result<()> {
        let tx = self.conn.transaction()?;

        {
            let mut order_stmt = tx.prepare_cached(&generate_insert(&ORDERS))?;
            order_stmt
                .execute(params![
                    order.id,
                    Option::<i64>::None,
                    order.customer_id,
                    order.total_amount(),
                    order.placed_at,
                    order.status.as_ref(),
                    order.payment_method.as_ref(),
                    order.shipping_address,
                ])
                .with_context(|| format!("Failed to insert order {}", order.id))?;

            let mut item_stmt = tx.prepare_cached(&generate_insert(&ORDER_DETAIL))?;
            for item in &order.items {
                item_stmt
                    .execute(params![
                        order.id,
                        item.product_id,
                        item.name,
                        item.quantity,
                        item.price,
                        item.discount,
                    ])
                    .with_context(|| {
                        format!("Failed to insert line item for order {}", order.id)
                    })?;
            }
        }

        tx.commit().context("Failed to commit order")?;
        Ok(())
    }

    pub fn insert_review(&self, review: &Review) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(&generate_insert(&REVIEWS))?;
        stmt.execute(params![
            review.user_id,
            review.product_id,
            review.rating,
            review.text,
            review.reviewed_at,
        ])
        .with_context(|| {
            format!(
                "Failed to insert review for product {} by user {}",
                review.product_id, review.user_id
            )
        })?;

        Ok(())
    }

    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, err)| err)
            .context("Failed to close connection")
    }
}
