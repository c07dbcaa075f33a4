//! Performance statistics for a finished backtest.

use super::backtest::{BacktestResult, EquityPoint};
use super::position::Trade;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    pub max_drawdown: f64,
    pub max_drawdown_duration: i64,
    pub total_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub avg_trade_duration: f64,
}

impl Metrics {
    pub fn compute(result: &BacktestResult) -> Self {
        let starting_cash = result.starting_cash;
        let total_return = if starting_cash > 0.0 {
            (result.final_equity - starting_cash) / starting_cash
        } else {
            0.0
        };

        let (max_drawdown, max_drawdown_duration) = compute_drawdown(&result.equity_curve);
        let stats = TradeStats::from_trades(&result.trades);

        let total_trades = stats.won + stats.lost + stats.breakeven;
        let win_rate = if total_trades > 0 {
            stats.won as f64 / total_trades as f64
        } else {
            0.0
        };

        let profit_factor = if stats.total_losses > 0.0 {
            stats.total_wins / stats.total_losses
        } else if stats.total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let avg_win = if stats.won > 0 {
            stats.total_wins / stats.won as f64
        } else {
            0.0
        };

        let avg_loss = if stats.lost > 0 {
            stats.total_losses / stats.lost as f64
        } else {
            0.0
        };

        let avg_trade_duration = if total_trades > 0 {
            stats.total_duration_days as f64 / total_trades as f64
        } else {
            0.0
        };

        Metrics {
            total_return,
            max_drawdown,
            max_drawdown_duration,
            total_trades,
            trades_won: stats.won,
            trades_lost: stats.lost,
            trades_breakeven: stats.breakeven,
            win_rate,
            profit_factor,
            avg_win,
            avg_loss,
            largest_win: stats.largest_win,
            largest_loss: stats.largest_loss,
            avg_trade_duration,
        }
    }
}

#[derive(Default)]
struct TradeStats {
    won: usize,
    lost: usize,
    breakeven: usize,
    total_wins: f64,
    total_losses: f64,
    largest_win: f64,
    largest_loss: f64,
    total_duration_days: i64,
}

impl TradeStats {
    fn from_trades(trades: &[Trade]) -> Self {
        let mut stats = TradeStats::default();
        for trade in trades {
            let pnl = trade.pnl;
            if pnl > 0.0 {
                stats.won += 1;
                stats.total_wins += pnl;
                stats.largest_win = stats.largest_win.max(pnl);
            } else if pnl < 0.0 {
                stats.lost += 1;
                stats.total_losses += pnl.abs();
                stats.largest_loss = stats.largest_loss.max(pnl.abs());
            } else {
                stats.breakeven += 1;
            }
            stats.total_duration_days += trade.duration_days();
        }
        stats
    }
}

/// Largest peak-to-trough decline as a fraction of the peak, and the longest
/// run of bars spent below a prior peak.
fn compute_drawdown(equity_curve: &[EquityPoint]) -> (f64, i64) {
    let Some(first) = equity_curve.first() else {
        return (0.0, 0);
    };

    let mut peak = first.equity;
    let mut max_dd = 0.0_f64;
    let mut max_dd_duration = 0i64;
    let mut current_dd_duration = 0i64;

    for point in equity_curve {
        if point.equity >= peak {
            peak = point.equity;
            current_dd_duration = 0;
        } else if peak > 0.0 {
            let dd = (peak - point.equity) / peak;
            max_dd = max_dd.max(dd);
            current_dd_duration += 1;
            max_dd_duration = max_dd_duration.max(current_dd_duration);
        }
    }

    (max_dd, max_dd_duration)
}
