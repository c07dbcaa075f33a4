//! Backtest simulator: an all-or-nothing, single-position state machine.
//!
//! The account is either Flat or Long. A Buy while Flat spends as many whole
//! shares as cash allows at the close; a Sell while Long liquidates at the
//! close and records a [`Trade`]. Every other (state, signal) pair is a no-op.
//! Bars are processed strictly in date order, one at a time.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use super::error::BandcrossError;
use super::ohlcv::{Bar, PriceSeries};
use super::position::{Account, OpenPosition, Trade};
use super::signal::{Signal, SignalPoint};

pub const DEFAULT_STARTING_CASH: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub starting_cash: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            starting_cash: DEFAULT_STARTING_CASH,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// What a single step did to the account.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Entered { shares: u64, price: f64 },
    Exited(Trade),
    /// Buy while Flat, but cash does not cover one share.
    InsufficientCash,
    NoOp,
}

#[derive(Debug, Clone)]
pub struct Simulator {
    starting_cash: f64,
    account: Account,
    trades: Vec<Trade>,
    equity_curve: Vec<EquityPoint>,
    last_date: Option<NaiveDate>,
}

impl Simulator {
    pub fn new(starting_cash: f64) -> Self {
        Simulator {
            starting_cash,
            account: Account::new(starting_cash),
            trades: Vec::new(),
            equity_curve: Vec::new(),
            last_date: None,
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Apply one bar and its signal. Bars must arrive in ascending date order.
    pub fn step(&mut self, bar: &Bar, signal: Signal) -> Result<StepOutcome, BandcrossError> {
        if let Some(prev) = self.last_date {
            if bar.date <= prev {
                return Err(BandcrossError::OutOfOrder {
                    date: bar.date,
                    previous: prev,
                });
            }
        }
        self.last_date = Some(bar.date);

        let outcome = match (self.account.position, signal) {
            (None, Signal::Buy) => self.enter(bar),
            (Some(position), Signal::Sell) => self.exit(bar, position),
            _ => StepOutcome::NoOp,
        };

        self.equity_curve.push(EquityPoint {
            date: bar.date,
            equity: self.account.equity(bar.close),
        });

        Ok(outcome)
    }

    fn enter(&mut self, bar: &Bar) -> StepOutcome {
        let price = bar.close;
        let mut shares = (self.account.cash / price).floor() as u64;
        // Division may round up to the next whole share.
        if shares > 0 && shares as f64 * price > self.account.cash {
            shares -= 1;
        }

        if shares == 0 {
            debug!(date = %bar.date, cash = self.account.cash, price, "buy skipped: insufficient cash");
            return StepOutcome::InsufficientCash;
        }

        self.account.cash -= shares as f64 * price;
        self.account.position = Some(OpenPosition {
            shares,
            entry_price: price,
            entry_date: bar.date,
        });
        debug!(date = %bar.date, shares, price, cash = self.account.cash, "entered long");

        StepOutcome::Entered { shares, price }
    }

    fn exit(&mut self, bar: &Bar, position: OpenPosition) -> StepOutcome {
        let price = bar.close;
        self.account.cash += position.market_value(price);
        self.account.position = None;

        let trade = Trade {
            entry_date: position.entry_date,
            exit_date: bar.date,
            entry_price: position.entry_price,
            exit_price: price,
            shares: position.shares,
            pnl: position.unrealized_pnl(price),
        };
        debug!(date = %bar.date, shares = trade.shares, price, pnl = trade.pnl, "exited long");

        self.trades.push(trade.clone());
        StepOutcome::Exited(trade)
    }

    /// Close the books. An open position is marked to `last_close` but no
    /// trade is synthesized for it.
    pub fn finish(self, last_close: f64) -> BacktestResult {
        let final_equity = self.account.equity(last_close);
        BacktestResult {
            starting_cash: self.starting_cash,
            cash: self.account.cash,
            open_position: self.account.position,
            last_close,
            final_equity,
            trades: self.trades,
            equity_curve: self.equity_curve,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub starting_cash: f64,
    pub cash: f64,
    pub open_position: Option<OpenPosition>,
    pub last_close: f64,
    pub final_equity: f64,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub cash: f64,
    pub shares: u64,
    pub equity: f64,
}

impl BacktestResult {
    pub fn summary(&self) -> Summary {
        Summary {
            cash: self.cash,
            shares: self.open_position.map_or(0, |p| p.shares),
            equity: self.final_equity,
        }
    }

    pub fn realized_pnl(&self) -> f64 {
        self.trades.iter().map(|t| t.pnl).sum()
    }
}

/// Replay `signals` over `series`. Bars without a signal (warmup dates) are
/// treated as Hold.
pub fn run_backtest(
    series: &PriceSeries,
    signals: &[SignalPoint],
    config: &BacktestConfig,
) -> Result<BacktestResult, BandcrossError> {
    let mut by_date: HashMap<NaiveDate, Signal> = HashMap::with_capacity(signals.len());
    for point in signals {
        if series.get_bar_index(point.date).is_none() {
            return Err(BandcrossError::InvalidSeries {
                symbol: series.symbol().to_string(),
                reason: format!("signal dated {} has no matching bar", point.date),
            });
        }
        if by_date.insert(point.date, point.signal).is_some() {
            return Err(BandcrossError::InvalidSeries {
                symbol: series.symbol().to_string(),
                reason: format!("more than one signal dated {}", point.date),
            });
        }
    }

    let mut sim = Simulator::new(config.starting_cash);
    for bar in series.bars() {
        let signal = by_date.get(&bar.date).copied().unwrap_or(Signal::Hold);
        sim.step(bar, signal)?;
    }

    Ok(sim.finish(series.last_bar().close))
}
