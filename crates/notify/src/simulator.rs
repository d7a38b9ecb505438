//! Synthetic leads for demos and load checks.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::desk::NewLeadInput;

const NAMES: &[(&str, &str)] = &[
    ("María G.", "maria_g"),
    ("Carlos L.", "carlos_l"),
    ("Ana M.", "ana_m"),
    ("José R.", "jose_r"),
    ("Laura S.", "laura_s"),
];

const PRODUCTS: &[&str] = &[
    "Collar Premium",
    "Juguete Interactivo",
    "Pienso Premium",
    "Cama Ortopédica",
];

const SOURCES: &[&str] = &["web_visit", "product_view", "cart_abandon", "search", "telegram"];

/// Chance that one monitoring tick yields a lead.
pub const DETECTION_PROBABILITY: f64 = 0.15;

/// Random lead generator. The same seed yields the same sequence.
#[derive(Debug, Clone)]
pub struct LeadSimulator {
    rng: StdRng,
}

impl LeadSimulator {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    fn pick<'a, T>(&mut self, pool: &'a [T]) -> &'a T {
        &pool[self.rng.random_range(0..pool.len())]
    }

    pub fn next_lead(&mut self) -> NewLeadInput {
        let (name, username) = *self.pick(NAMES);
        let product = *self.pick(PRODUCTS);
        let source = *self.pick(SOURCES);
        NewLeadInput {
            name: name.into(),
            chat_id: self.rng.random_range(0..1_000_000_000_u32).to_string(),
            username: Some(username.into()),
            message: "Visitor detected automatically".into(),
            product: Some(product.into()),
            source: source.into(),
        }
    }

    /// One monitoring tick: a lead with [`DETECTION_PROBABILITY`], else `None`.
    pub fn tick(&mut self) -> Option<NewLeadInput> {
        self.rng
            .random_bool(DETECTION_PROBABILITY)
            .then(|| self.next_lead())
    }

    /// Sale amount between €20 and €70, rounded to cents.
    pub fn revenue(&mut self) -> f64 {
        (self.rng.random_range(20.0..70.0_f64) * 100.0).round() / 100.0
    }
}
