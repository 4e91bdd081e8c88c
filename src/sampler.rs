//! Random draws behind the generator.
//!
//! Every choice the generator makes goes through [`Sampler`], so a run can be
//! driven by [`RandomSampler`] in production and by a scripted sampler in tests.

use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Timelike, Utc};
use fake::faker::address::en::{BuildingNumber, CityName, StateAbbr, StreetName, ZipCode};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use std::collections::HashSet;
use strum::IntoEnumIterator;

use crate::model::{round2, Action, OrderStatus, PaymentMethod, Person, PostalAddress, Sentiment};

pub const MIN_ITEMS: usize = 1;
pub const MAX_ITEMS: usize = 4;
pub const MIN_QUANTITY: i64 = 1;
pub const MAX_QUANTITY: i64 = 4;
pub const MIN_PRICE: f64 = 5.0;
pub const MAX_PRICE: f64 = 150.0;
pub const MAX_DISCOUNT: f64 = 10.0;
pub const DISCOUNT_PROBABILITY: f64 = 0.25;
pub const POSITIVE_PROBABILITY: f64 = 0.8;
pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;
pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 85;

/// Redraws before a duplicate email gets a disambiguating tag
const EMAIL_ATTEMPTS: usize = 1000;

/// Source of every random value the generator needs
pub trait Sampler {
    fn action(&mut self) -> Action;
    /// Uniform pick; `None` only for an empty slice
    fn pick_id(&mut self, ids: &[i64]) -> Option<i64>;
    fn person(&mut self) -> Person;
    fn shipping_address(&mut self) -> String;
    /// Somewhere between January 1st of the current year and now
    fn timestamp_this_year(&mut self) -> NaiveDateTime;
    fn order_status(&mut self) -> OrderStatus;
    fn payment_method(&mut self) -> PaymentMethod;
    fn item_count(&mut self) -> usize;
    fn quantity(&mut self) -> i64;
    fn unit_price(&mut self) -> f64;
    fn discount(&mut self) -> f64;
    fn rating(&mut self) -> i64;
    fn sentiment(&mut self) -> Sentiment;
}

/// [`Sampler`] backed by a `rand` generator and `fake` locale data
pub struct RandomSampler<R: Rng> {
    rng: R,
    actions: Vec<Action>,
    action_weights: WeightedIndex<f64>,
    seen_emails: HashSet<String>,
}

impl<R: Rng> RandomSampler<R> {
    pub fn new(rng: R) -> Result<Self> {
        let actions: Vec<Action> = Action::iter().collect();
        let action_weights = WeightedIndex::new(actions.iter().map(|a| a.weight()))
            .map_err(|err| anyhow!("Invalid action weights: {}", err))?;

        Ok(Self {
            rng,
            actions,
            action_weights,
            seen_emails: HashSet::new(),
        })
    }

    fn postal_address(&mut self) -> PostalAddress {
        let number: String = BuildingNumber().fake_with_rng(&mut self.rng);
        let street: String = StreetName().fake_with_rng(&mut self.rng);
        PostalAddress {
            street: format!("{} {}", number, street),
            city: CityName().fake_with_rng(&mut self.rng),
            state: StateAbbr().fake_with_rng(&mut self.rng),
            postal_code: ZipCode().fake_with_rng(&mut self.rng),
        }
    }

    /// Email not handed out earlier in this run
    fn unique_email(&mut self) -> String {
        for _ in 0..EMAIL_ATTEMPTS {
            let email: String = SafeEmail().fake_with_rng(&mut self.rng);
            if self.seen_emails.insert(email.clone()) {
                return email;
            }
        }

        let email: String = SafeEmail().fake_with_rng(&mut self.rng);
        let tagged = match email.split_once('@') {
            Some((local, domain)) => format!("{}+{}@{}", local, self.seen_emails.len(), domain),
            None => format!("{}+{}", email, self.seen_emails.len()),
        };
        self.seen_emails.insert(tagged.clone());
        tagged
    }
}

impl RandomSampler<StdRng> {
    /// Seeded for reproducible runs, or from OS entropy
    pub fn from_seed(seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(rng)
    }
}

impl<R: Rng> Sampler for RandomSampler<R> {
    fn action(&mut self) -> Action {
        self.actions[self.action_weights.sample(&mut self.rng)]
    }

    fn pick_id(&mut self, ids: &[i64]) -> Option<i64> {
        ids.choose(&mut self.rng).copied()
    }

    fn person(&mut self) -> Person {
        let today = Utc::now().date_naive();
        Person {
            first_name: FirstName().fake_with_rng(&mut self.rng),
            last_name: LastName().fake_with_rng(&mut self.rng),
            email: self.unique_email(),
            phone_number: PhoneNumber().fake_with_rng(&mut self.rng),
            date_of_birth: birth_date_for_age(&mut self.rng, today, MIN_AGE, MAX_AGE),
            address: self.postal_address(),
        }
    }

    fn shipping_address(&mut self) -> String {
        self.postal_address().to_string()
    }

    fn timestamp_this_year(&mut self) -> NaiveDateTime {
        timestamp_within_year(&mut self.rng, Utc::now().naive_utc())
    }

    fn order_status(&mut self) -> OrderStatus {
        let statuses: Vec<OrderStatus> = OrderStatus::iter().collect();
        statuses[self.rng.gen_range(0..statuses.len())]
    }

    fn payment_method(&mut self) -> PaymentMethod {
        let methods: Vec<PaymentMethod> = PaymentMethod::iter().collect();
        methods[self.rng.gen_range(0..methods.len())]
    }

    fn item_count(&mut self) -> usize {
        self.rng.gen_range(MIN_ITEMS..=MAX_ITEMS)
    }

    fn quantity(&mut self) -> i64 {
        self.rng.gen_range(MIN_QUANTITY..=MAX_QUANTITY)
    }

    fn unit_price(&mut self) -> f64 {
        round2(self.rng.gen_range(MIN_PRICE..=MAX_PRICE))
    }

    fn discount(&mut self) -> f64 {
        if self.rng.gen::<f64>() < DISCOUNT_PROBABILITY {
            round2(self.rng.gen_range(0.0..=MAX_DISCOUNT))
        } else {
            0.0
        }
    }

    fn rating(&mut self) -> i64 {
        self.rng.gen_range(MIN_RATING..=MAX_RATING)
    }

    fn sentiment(&mut self) -> Sentiment {
        if self.rng.gen_bool(POSITIVE_PROBABILITY) {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }
}

/// Uniform timestamp in `[Jan 1 00:00:00, now]` of `now`'s year, to the second
pub fn timestamp_within_year<R: Rng + ?Sized>(rng: &mut R, now: NaiveDateTime) -> NaiveDateTime {
    let now = now.with_nanosecond(0).unwrap_or(now);
    let start = NaiveDate::from_yo_opt(now.year(), 1)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .unwrap_or(now);
    let span = (now - start).num_seconds().max(0);
    start + Duration::seconds(rng.gen_range(0..=span))
}

/// Uniform birth date for someone aged `min_age..=max_age` on `today`
pub fn birth_date_for_age<R: Rng + ?Sized>(
    rng: &mut R,
    today: NaiveDate,
    min_age: u32,
    max_age: u32,
) -> NaiveDate {
    let latest = years_before(today, min_age);
    // Born any earlier and they turn max_age + 1 today
    let earliest = years_before(today, max_age + 1)
        .succ_opt()
        .unwrap_or(latest);
    let span = (latest - earliest).num_days().max(0);
    earliest + Duration::days(rng.gen_range(0..=span))
}

fn years_before(day: NaiveDate, years: u32) -> NaiveDate {
    day.checked_sub_months(Months::new(years * 12))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampler() -> RandomSampler<StdRng> {
        RandomSampler::from_seed(Some(42)).unwrap()
    }

    fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
        let mut age = today.year() - birth.year();
        if (today.month(), today.day()) < (birth.month(), birth.day()) {
            age -= 1;
        }
        age as u32
    }

    #[test]
    fn test_numeric_draws_stay_in_range() {
        let mut s = sampler();
        for _ in 0..2000 {
            let count = s.item_count();
            assert!((MIN_ITEMS..=MAX_ITEMS).contains(&count));

            let quantity = s.quantity();
            assert!((MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity));

            let price = s.unit_price();
            assert!((MIN_PRICE..=MAX_PRICE).contains(&price));
            assert_eq!(price, round2(price));

            let discount = s.discount();
            assert!((0.0..=MAX_DISCOUNT).contains(&discount));

            let rating = s.rating();
            assert!((MIN_RATING..=MAX_RATING).contains(&rating));
        }
    }

    #[test]
    fn test_discount_is_mostly_zero() {
        let mut s = sampler();
        let discounted = (0..10_000).filter(|_| s.discount() > 0.0).count();
        // ~25% with some slack
        assert!((2000..3000).contains(&discounted), "discounted {}", discounted);
    }

    #[test]
    fn test_action_frequencies_follow_weights() {
        let mut s = sampler();
        let draws = 20_000;
        let orders = (0..draws)
            .filter(|_| s.action() == Action::CreateOrder)
            .count();
        let share = orders as f64 / draws as f64;
        assert!((0.52..0.58).contains(&share), "order share {}", share);
    }

    #[test]
    fn test_sentiment_leans_positive() {
        let mut s = sampler();
        let positive = (0..10_000)
            .filter(|_| s.sentiment() == Sentiment::Positive)
            .count();
        assert!((7500..8500).contains(&positive), "positive {}", positive);
    }

    #[test]
    fn test_pick_id() {
        let mut s = sampler();
        assert_eq!(s.pick_id(&[]), None);
        assert_eq!(s.pick_id(&[7]), Some(7));
        for _ in 0..100 {
            let id = s.pick_id(&[1, 2, 3]).unwrap();
            assert!([1, 2, 3].contains(&id));
        }
    }

    #[test]
    fn test_emails_unique_within_run() {
        let mut s = sampler();
        let mut emails = HashSet::new();
        for _ in 0..500 {
            let person = s.person();
            assert!(person.email.contains('@'));
            assert!(emails.insert(person.email));
        }
    }

    #[test]
    fn test_person_is_fully_populated() {
        let mut s = sampler();
        let person = s.person();
        assert!(!person.first_name.is_empty());
        assert!(!person.last_name.is_empty());
        assert!(!person.phone_number.is_empty());
        assert!(!person.address.street.is_empty());
        assert!(!person.address.city.is_empty());
        assert_eq!(person.address.state.len(), 2);
        assert!(!person.address.postal_code.is_empty());
    }

    #[test]
    fn test_birth_date_age_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        for _ in 0..2000 {
            let birth = birth_date_for_age(&mut rng, today, MIN_AGE, MAX_AGE);
            let age = age_on(birth, today);
            assert!((MIN_AGE..=MAX_AGE).contains(&age), "age {} for {}", age, birth);
        }
    }

    #[test]
    fn test_birth_date_edges() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(years_before(today, 18), NaiveDate::from_ymd_opt(2008, 10, 19).unwrap());
        // leap day clamps to the end of February
        let leap = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(years_before(leap, 1), NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
    }

    #[test]
    fn test_timestamp_within_year() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_milli_opt(14, 30, 5, 250)
            .unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        for _ in 0..2000 {
            let ts = timestamp_within_year(&mut rng, now);
            assert!(ts >= start && ts <= now, "{} out of range", ts);
            assert_eq!(ts.nanosecond(), 0);
        }
    }

    #[test]
    fn test_timestamp_at_new_year() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = NaiveDate::from_ymd_opt(2027, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(timestamp_within_year(&mut rng, now), now);
    }

    #[test]
    fn test_seeded_samplers_agree() {
        let mut a = sampler();
        let mut b = sampler();
        for _ in 0..50 {
            assert_eq!(a.unit_price(), b.unit_price());
            assert_eq!(a.action(), b.action());
        }
        assert_eq!(a.person().last_name, b.person().last_name);
    }
}
