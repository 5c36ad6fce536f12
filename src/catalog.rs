//! Prize catalog
//!
//! Static, ordered list of wheel outcomes. Order matters: it defines segment
//! placement on the wheel.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::WheelError;

/// A single wheel outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prize {
    /// Stable identity within a session
    pub id: String,
    /// Translation key for the display label (not interpreted here)
    pub label: String,
    /// Monetary value, used to pick the grand prize
    pub value: f32,
    /// Redemption code reference handed to checkout
    pub code: String,
    /// Legacy weight. Carried for compatibility; the scripted engine ignores it.
    #[serde(default)]
    pub probability: f32,
    /// Whether landing here is a win
    pub is_winning: bool,
}

impl Prize {
    pub fn new(id: &str, label: &str, value: f32, code: &str, is_winning: bool) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            value,
            code: code.to_string(),
            probability: 0.0,
            is_winning,
        }
    }

    pub fn with_probability(mut self, probability: f32) -> Self {
        self.probability = probability;
        self
    }
}

/// Ordered prize list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrizeCatalog {
    prizes: Vec<Prize>,
}

impl PrizeCatalog {
    pub fn new(prizes: Vec<Prize>) -> Self {
        Self { prizes }
    }

    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    pub fn len(&self) -> usize {
        self.prizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prizes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Prize> {
        self.prizes.iter().find(|p| p.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.prizes.iter().position(|p| p.id == id)
    }

    pub fn losers(&self) -> impl Iterator<Item = &Prize> {
        self.prizes.iter().filter(|p| !p.is_winning)
    }

    /// Highest-value winning prize; ties go to the earliest entry
    pub fn grand_prize(&self) -> Option<&Prize> {
        self.prizes
            .iter()
            .filter(|p| p.is_winning)
            .fold(None, |best: Option<&Prize>, p| match best {
                Some(b) if b.value >= p.value => Some(b),
                _ => Some(p),
            })
    }

    /// Check the catalog can drive both scripted spins
    pub fn validate(&self) -> Result<(), WheelError> {
        if self.prizes.is_empty() {
            return Err(WheelError::EmptyCatalog);
        }
        // Segments are looked up by id
        let mut seen = HashSet::new();
        if let Some(dup) = self.prizes.iter().find(|p| !seen.insert(p.id.as_str())) {
            return Err(WheelError::DuplicatePrize { id: dup.id.clone() });
        }
        if self.losers().next().is_none() {
            return Err(WheelError::NoLosingPrize);
        }
        if self.grand_prize().is_none() {
            return Err(WheelError::NoWinningPrize);
        }
        Ok(())
    }
}

impl Default for PrizeCatalog {
    /// Seven slices: six discounts and one "try again"
    fn default() -> Self {
        Self::new(vec![
            Prize::new("discount_10", "wheel.prizes.discount_10", 10.0, "SPIN10", true)
                .with_probability(0.2),
            Prize::new("free_shipping", "wheel.prizes.free_shipping", 5.0, "SPINSHIP", true)
                .with_probability(0.2),
            Prize::new("discount_15", "wheel.prizes.discount_15", 15.0, "SPIN15", true)
                .with_probability(0.15),
            Prize::new("try_again", "wheel.prizes.try_again", 0.0, "", false)
                .with_probability(0.25),
            Prize::new("discount_20", "wheel.prizes.discount_20", 20.0, "SPIN20", true)
                .with_probability(0.1),
            Prize::new("gift", "wheel.prizes.gift", 25.0, "SPINGIFT", true).with_probability(0.07),
            Prize::new("discount_50", "wheel.prizes.discount_50", 50.0, "SPIN50", true)
                .with_probability(0.03),
        ])
    }
}
