//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::warn;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::chart::build_chart_rows;
use crate::domain::error::BandcrossError;
use crate::domain::metrics::Metrics;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::pipeline::{run_pipeline, RunOutput};
use crate::domain::run_config::RunConfig;
use crate::domain::signal::Signal;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(
    name = "bandcross",
    about = "Bollinger band and moving-average crossover backtester"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by commands that load price data.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct RunArgs {
    #[arg(short, long)]
    pub config: PathBuf,
    /// Override [data] symbol
    #[arg(long)]
    pub symbol: Option<String>,
    /// Override [strategy] rule (band, crossover, combined)
    #[arg(long)]
    pub rule: Option<String>,
    /// Override [data] dir
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[command(flatten)]
        run: RunArgs,
        /// Write the trade log as CSV
        #[arg(long)]
        trades_out: Option<PathBuf>,
        /// Write per-date close, indicators and signal as CSV
        #[arg(long)]
        chart_out: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the Buy and Sell signals as CSV on stdout
    Signals {
        #[command(flatten)]
        run: RunArgs,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            run,
            trades_out,
            chart_out,
        } => run_backtest(&run, trades_out.as_deref(), chart_out.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Signals { run } => run_signals(&run),
    }
}

fn fail(err: BandcrossError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        fail(BandcrossError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })
    })
}

/// Command-line values take precedence over the file.
pub fn apply_overrides(adapter: &mut FileConfigAdapter, args: &RunArgs) {
    if let Some(symbol) = &args.symbol {
        adapter.set("data", "symbol", symbol);
    }
    if let Some(rule) = &args.rule {
        adapter.set("strategy", "rule", rule);
    }
    if let Some(dir) = &args.data_dir {
        adapter.set("data", "dir", &dir.display().to_string());
    }
}

pub fn resolve_data_dir(config: &dyn ConfigPort) -> PathBuf {
    config
        .get_string("data", "dir")
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Load, override and validate. On failure the error is already reported.
fn prepare(args: &RunArgs) -> Result<(RunConfig, CsvAdapter), ExitCode> {
    eprintln!("Loading config from {}", args.config.display());
    let mut adapter = load_config(&args.config)?;
    apply_overrides(&mut adapter, args);

    let config = RunConfig::from_config(&adapter).map_err(fail)?;
    let data_dir = resolve_data_dir(&adapter);
    eprintln!(
        "Loading {} from {} ({} to {})",
        config.symbol,
        data_dir.display(),
        config.start_date,
        config.end_date
    );
    Ok((config, CsvAdapter::new(data_dir)))
}

pub fn load_series(
    data_port: &dyn DataPort,
    config: &RunConfig,
) -> Result<PriceSeries, BandcrossError> {
    let bars = data_port.fetch_bars(&config.symbol, config.start_date, config.end_date)?;
    if bars.is_empty() {
        return Err(BandcrossError::NoData {
            symbol: config.symbol.clone(),
        });
    }
    PriceSeries::new(config.symbol.clone(), bars)
}

fn run_backtest(args: &RunArgs, trades_out: Option<&Path>, chart_out: Option<&Path>) -> ExitCode {
    let (config, data_port) = match prepare(args) {
        Ok(p) => p,
        Err(code) => return code,
    };
    run_backtest_pipeline(
        &data_port,
        &CsvReportAdapter::new(),
        &config,
        trades_out,
        chart_out,
    )
}

/// Fetch, simulate, summarize and optionally write reports.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    config: &RunConfig,
    trades_out: Option<&Path>,
    chart_out: Option<&Path>,
) -> ExitCode {
    let series = match load_series(data_port, config) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    eprintln!(
        "Running {} backtest on {}: {} bars",
        config.rule,
        series.symbol(),
        series.len()
    );
    let output = match run_pipeline(&series, config) {
        Ok(o) => o,
        Err(e) => return fail(e),
    };

    print_summary(&output);

    if let Some(path) = trades_out {
        if let Err(e) = report_port.write_trades(&output.result, path) {
            return fail(e);
        }
        eprintln!("Trade log written to: {}", path.display());
    }
    if let Some(path) = chart_out {
        let rows = build_chart_rows(&output.indicators, &output.signals);
        if let Err(e) = report_port.write_chart(&rows, path) {
            return fail(e);
        }
        eprintln!("Chart data written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn print_summary(output: &RunOutput) {
    for warning in &output.warnings {
        eprintln!("warning: {warning}");
    }
    if !output.has_eligible_dates() {
        eprintln!("warning: no eligible dates; every bar was treated as Hold");
    }

    let result = &output.result;
    let summary = result.summary();
    let metrics = Metrics::compute(result);

    eprintln!("\n=== Results ===");
    eprintln!("Starting Cash:    {:.2}", result.starting_cash);
    eprintln!("Final Cash:       {:.2}", summary.cash);
    eprintln!("Shares Held:      {}", summary.shares);
    eprintln!("Final Equity:     {:.2}", summary.equity);
    eprintln!("Total Return:     {:.2}%", metrics.total_return * 100.0);
    eprintln!("Max Drawdown:     -{:.1}%", metrics.max_drawdown * 100.0);
    eprintln!("Total Trades:     {}", metrics.total_trades);
    eprintln!("Win Rate:         {:.1}%", metrics.win_rate * 100.0);
    eprintln!("Profit Factor:    {:.2}", metrics.profit_factor);

    if let Some(open) = result.open_position {
        eprintln!(
            "Open Position:    {} shares since {} at {:.2} (unrealized {:+.2})",
            open.shares,
            open.entry_date,
            open.entry_price,
            open.unrealized_pnl(result.last_close)
        );
    }

    if !result.trades.is_empty() {
        eprintln!("\n=== Trades ===");
        for t in &result.trades {
            eprintln!(
                "  {} -> {}  {} @ {:.2} -> {:.2}  pnl {:+.2}",
                t.entry_date, t.exit_date, t.shares, t.entry_price, t.exit_price, t.pnl
            );
        }
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let config = match RunConfig::from_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    eprintln!("\nSymbol: {}", config.symbol);
    eprintln!("Range:  {} to {}", config.start_date, config.end_date);
    eprintln!("Rule:   {}", config.rule);
    eprintln!("\nIndicators to compute:");
    for indicator in config.indicator_params().indicator_types() {
        eprintln!("  {}", indicator);
    }
    if let Some(bands) = config.bands.filter(|_| config.rule.needs_bands()) {
        eprintln!("  deviation: {}", bands.deviation);
    }
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_signals(args: &RunArgs) -> ExitCode {
    let (config, data_port) = match prepare(args) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let stdout = std::io::stdout();
    match write_signals(&data_port, &config, stdout.lock()) {
        Ok(count) => {
            eprintln!("{count} signals");
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

/// Write every non-Hold signal as `date,close,signal` CSV. Returns the count.
pub fn write_signals<W: Write>(
    data_port: &dyn DataPort,
    config: &RunConfig,
    out: W,
) -> Result<usize, BandcrossError> {
    let series = load_series(data_port, config)?;
    let output = run_pipeline(&series, config)?;
    if !output.has_eligible_dates() {
        warn!(symbol = %config.symbol, "no eligible dates");
    }

    let mut wtr = csv::Writer::from_writer(out);
    let mut count = 0;
    for point in output.signals.iter().filter(|p| p.signal != Signal::Hold) {
        wtr.serialize(point).map_err(|e| BandcrossError::Report {
            reason: format!("failed to write signal: {e}"),
        })?;
        count += 1;
    }
    wtr.flush()?;
    Ok(count)
}
