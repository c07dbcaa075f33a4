//! Single-position account state and closed trade records.

use chrono::NaiveDate;
use serde::Serialize;

/// An open long position. Existence implies shares > 0 and a known entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenPosition {
    pub shares: u64,
    pub entry_price: f64,
    pub entry_date: NaiveDate,
}

impl OpenPosition {
    pub fn market_value(&self, price: f64) -> f64 {
        self.shares as f64 * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.shares as f64 * (price - self.entry_price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub shares: u64,
    pub pnl: f64,
}

impl Trade {
    pub fn duration_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}

/// Cash plus at most one open long position.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub cash: f64,
    pub position: Option<OpenPosition>,
}

impl Account {
    pub fn new(cash: f64) -> Self {
        Account {
            cash,
            position: None,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.position.is_none()
    }

    pub fn shares(&self) -> u64 {
        self.position.map_or(0, |p| p.shares)
    }

    pub fn entry_price(&self) -> Option<f64> {
        self.position.map(|p| p.entry_price)
    }

    pub fn equity(&self, price: f64) -> f64 {
        self.cash + self.position.map_or(0.0, |p| p.market_value(price))
    }
}
