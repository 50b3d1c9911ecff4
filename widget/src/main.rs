//! Exchanger Demo Binary
//!
//! Mounts the widget against a simulated rate feed and replays a short
//! session: enter an amount, switch currency, swap, exchange.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use exchanger_common::{Currency, FieldSide};
use exchanger_ledger::{FundsPolicy, TracingSink};
use exchanger_widget::{mount, ExchangeView, ExchangerConfig, SimulatedRateProvider};
use rust_decimal::Decimal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Exchanger CLI
#[derive(Parser, Debug)]
#[command(name = "exchanger")]
#[command(about = "Currency exchange widget demo")]
struct Args {
    /// Amount typed into the source field
    #[arg(short, long, default_value = "100")]
    amount: Decimal,

    /// Source currency
    #[arg(long)]
    from: Option<Currency>,

    /// Destination currency
    #[arg(long)]
    to: Option<Currency>,

    /// Rate refreshes to watch after the exchange
    #[arg(long, default_value = "3")]
    ticks: u32,

    /// Refresh interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Random seed for reproducible rates
    #[arg(long)]
    seed: Option<u64>,

    /// Print views and logs as JSON
    #[arg(long)]
    json: bool,

    /// Allow exchanges larger than the source balance
    #[arg(long)]
    permissive: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ExchangerConfig::from_env();
    if let Some(from) = args.from {
        config.source_currency = from;
    }
    if let Some(to) = args.to {
        config.destination_currency = to;
    }
    if let Some(ms) = args.interval_ms {
        config.refresh_interval = Duration::from_millis(ms);
    }
    if args.permissive {
        config.funds_policy = FundsPolicy::Permissive;
    }

    // Initialize logging
    let fmt_layer = if args.json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
        ))
        .with(fmt_layer)
        .init();

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    info!(
        source = %config.source_currency,
        destination = %config.destination_currency,
        policy = ?config.funds_policy,
        "Starting Exchanger"
    );

    let interval = config.refresh_interval;
    let target = config.destination_currency;
    let provider = Arc::new(SimulatedRateProvider::new(args.seed));
    let mut widget = mount(config, provider, Arc::new(TracingSink))?;

    print_view(&widget.wait_until_ready().await?, args.json)?;

    widget.set_amount(FieldSide::Source, args.amount).await?;
    print_view(&widget.view(), args.json)?;

    // Round trip through another currency and back
    let detour = Currency::ALL
        .into_iter()
        .find(|c| *c != target && *c != widget.view().source.currency())
        .unwrap_or(target);
    widget.set_currency(FieldSide::Destination, detour).await?;
    print_view(&widget.view(), args.json)?;
    widget.set_currency(FieldSide::Destination, target).await?;

    widget.swap().await?;
    print_view(&widget.view(), args.json)?;
    widget.swap().await?;

    match widget.exchange().await {
        Ok(receipt) => info!(
            exchange_id = %receipt.id,
            debit = %receipt.debit.amount,
            credit = %receipt.credit.amount,
            "Exchange complete"
        ),
        Err(e) => warn!(error = %e, "Exchange refused"),
    }
    print_view(&widget.view(), args.json)?;

    let mut views = widget.subscribe();
    for _ in 0..args.ticks {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::time::sleep(interval * 2) => {
                warn!("No rate refresh within two intervals");
            }
        }
        let view = views.borrow_and_update().clone();
        print_view(&view, args.json)?;
    }

    let last = widget.unmount().await?;
    info!(balances = ?last.balances, "Exchanger stopped");
    Ok(())
}

fn print_view(view: &ExchangeView, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(view)?);
    } else {
        println!("{}", view);
    }
    Ok(())
}
