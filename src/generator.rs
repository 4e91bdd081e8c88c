//! The generator loop: read reference ids, draw an action, insert, pause.

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use crate::model::{Action, Catalog, Customer, LineItem, Order, Review};
use crate::sampler::Sampler;
use crate::schema::{CUSTOMERS, ORDERS};
use crate::store::Store;
use crate::synth::{review_text, TextSynthesizer};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Longest stretch a pause goes without checking for a stop request
const STOP_POLL: Duration = Duration::from_millis(100);

/// Shared flag raised by the Ctrl-C handler
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Sleep for `duration`, returning early once the flag goes up
    pub fn wait(&self, duration: Duration) {
        let deadline = Instant::now() + duration;
        while !self.is_raised() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            std::thread::sleep((deadline - now).min(STOP_POLL));
        }
    }
}

/// What one iteration did
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Customer(Customer),
    Order(Order),
    Review(Review),
    /// Order or review drawn while customers or products were missing
    Skipped(Action),
}

/// Everything a run needs, built once at startup
pub struct Generator<S: Sampler> {
    store: Store,
    sampler: S,
    synth: Box<dyn TextSynthesizer>,
    interval: Duration,
    stop: StopSignal,
}

impl<S: Sampler> Generator<S> {
    pub fn new(store: Store, sampler: S, synth: Box<dyn TextSynthesizer>) -> Self {
        Self {
            store,
            sampler,
            synth,
            interval: DEFAULT_INTERVAL,
            stop: StopSignal::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// Loop until stopped, until `max_iterations` have run, or until an
    /// insert fails. Returns the number of completed iterations.
    pub fn run(&mut self, max_iterations: Option<u64>) -> Result<u64> {
        let mut iterations = 0;

        while !self.stop.is_raised() {
            self.step()?;
            iterations += 1;

            if max_iterations.map_or(false, |max| iterations >= max) {
                break;
            }
            self.stop.wait(self.interval);
        }

        Ok(iterations)
    }

    /// One iteration without the pause
    pub fn step(&mut self) -> Result<Outcome> {
        let catalog = self.store.product_catalog()?;
        let customer_ids = self.store.customer_ids()?;

        match self.sampler.action() {
            Action::CreateCustomer => self.create_customer().map(Outcome::Customer),
            Action::CreateOrder => Ok(self
                .create_order(&customer_ids, &catalog)?
                .map_or(Outcome::Skipped(Action::CreateOrder), Outcome::Order)),
            Action::CreateReview => Ok(self
                .create_review(&customer_ids, &catalog)?
                .map_or(Outcome::Skipped(Action::CreateReview), Outcome::Review)),
        }
    }

    pub fn create_customer(&mut self) -> Result<Customer> {
        let person = self.sampler.person();
        let id = self.store.next_id(&CUSTOMERS)?;
        let customer = Customer { id, person };

        self.store.insert_customer(&customer)?;
        info!(
            "Inserted customer {} ({} {})",
            customer.id, customer.person.first_name, customer.person.last_name
        );

        Ok(customer)
    }

    /// `None` when there are no customers or no products to reference
    pub fn create_order(&mut self, customer_ids: &[i64], catalog: &Catalog) -> Result<Option<Order>> {
        if customer_ids.is_empty() || catalog.is_empty() {
            return Ok(None);
        }

        let id = self.store.next_id(&ORDERS)?;
        let Some(customer_id) = self.sampler.pick_id(customer_ids) else {
            return Ok(None);
        };
        let placed_at = self.sampler.timestamp_this_year();
        let status = self.sampler.order_status();
        let payment_method = self.sampler.payment_method();
        let shipping_address = self.sampler.shipping_address();

        let count = self.sampler.item_count();
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(product_id) = self.sampler.pick_id(catalog.ids()) else {
                return Ok(None);
            };
            let name = catalog
                .name(product_id)
                .with_context(|| format!("Product {} missing from catalog", product_id))?
                .to_string();

            items.push(LineItem {
                product_id,
                name,
                quantity: self.sampler.quantity(),
                price: self.sampler.unit_price(),
                discount: self.sampler.discount(),
            });
        }

        let order = Order {
            id,
            customer_id,
            placed_at,
            status,
            payment_method,
            shipping_address,
            items,
        };

        self.store.insert_order(&order)?;
        info!(
            "Inserted order {} with {} item(s) for customer {}",
            order.id,
            order.items.len(),
            order.customer_id
        );

        Ok(Some(order))
    }

    /// `None` when there are no customers or no products to reference
    pub fn create_review(&mut self, customer_ids: &[i64], catalog: &Catalog) -> Result<Option<Review>> {
        if customer_ids.is_empty() || catalog.is_empty() {
            return Ok(None);
        }

        let (Some(user_id), Some(product_id)) = (
            self.sampler.pick_id(customer_ids),
            self.sampler.pick_id(catalog.ids()),
        ) else {
            return Ok(None);
        };
        let rating = self.sampler.rating();
        let reviewed_at = self.sampler.timestamp_this_year();
        let product_name = catalog
            .name(product_id)
            .with_context(|| format!("Product {} missing from catalog", product_id))?;
        let sentiment = self.sampler.sentiment();
        let text = review_text(self.synth.as_ref(), product_name, sentiment);

        let review = Review {
            user_id,
            product_id,
            rating,
            text,
            reviewed_at,
        };

        self.store.insert_review(&review)?;
        info!(
            "Inserted review for product {} by user {} (rating {})",
            review.product_id, review.user_id, review.rating
        );

        Ok(Some(review))
    }

    /// Hand the connection back so the caller can close it
    pub fn into_store(self) -> Store {
        self.store
    }
}
