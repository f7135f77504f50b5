//! Options Desk CLI
//!
//! Look up a ticker, print its chain, one contract's analytics and the IV
//! term structure, and optionally place a paper order.

use clap::{Parser, ValueEnum};
use options_desk::prelude::*;

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    Call,
    Put,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderAction {
    Buy,
    Sell,
}

#[derive(Parser)]
#[command(name = "options-desk")]
#[command(about = "Stock and options analytics with synthetic or live data")]
struct Cli {
    /// Ticker symbol
    symbol: String,

    /// Seed for reproducible synthetic data
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config file
    #[arg(long)]
    config: Option<String>,

    /// Fetch live data from Yahoo Finance
    #[arg(long)]
    live: bool,

    /// Contract side
    #[arg(long = "type", value_enum, default_value = "call")]
    option_type: Side,

    /// Index into the populated expirations
    #[arg(long, default_value_t = 0)]
    expiry_index: usize,

    /// Strike steps away from ATM
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    strike_offset: i32,

    /// Contracts for cost and orders
    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// Place a paper order for the selected contract
    #[arg(long, value_enum)]
    order: Option<OrderAction>,

    /// Limit price per share; market order when absent
    #[arg(long)]
    limit: Option<f64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match (&cli.config, cli.live) {
        (Some(path), _) => DeskConfig::from_json_file(path)?,
        (None, true) => DeskConfig::live(),
        (None, false) => DeskConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.live {
        config.data_source = DataSource::Live;
    }

    let mut desk = OptionsDesk::new(config)?;
    let snapshot = desk.lookup(&cli.symbol)?;
    let stock = &snapshot.quote;

    println!("{} ({} data)", stock.symbol, snapshot.source.label());
    println!("==========================\n");
    println!("  Price: ${:.2}", stock.current_price);
    println!("  Previous close: ${:.2}", stock.previous_close);
    println!("  Change: {:+.2}%", stock.price_change_pct());
    println!("  History: {} days\n", stock.history.len());

    let chain = &snapshot.chain;
    println!("Options Chain:");
    for expiry in &chain.expirations {
        let strikes = chain.strikes_for_expiry(*expiry);
        match (strikes.first(), strikes.last()) {
            (Some(lo), Some(hi)) => println!(
                "  {}  {} strikes ({:.2} - {:.2})",
                expiry,
                strikes.len(),
                lo,
                hi
            ),
            _ => println!("  {}  (no contracts)", expiry),
        }
    }

    let option_type = match cli.option_type {
        Side::Call => OptionType::Call,
        Side::Put => OptionType::Put,
    };
    let populated = chain.populated_expirations();
    let Some(&expiry) = populated.get(cli.expiry_index) else {
        return Err(format!(
            "expiry index {} out of range ({} populated)",
            cli.expiry_index,
            populated.len()
        )
        .into());
    };
    let quote = desk
        .pick_quote(chain, option_type, expiry, cli.strike_offset)
        .ok_or_else(|| DeskError::data(format!("no {} quotes for {}", option_type.label(), expiry)))?
        .clone();
    let view = desk.select(&snapshot, option_type, expiry, quote.strike())?;

    println!("\nSelected Contract:");
    println!("  {}", quote.contract.occ_symbol()?);
    println!("  Premium: ${:.2} (bid {:.2} / ask {:.2})", quote.premium, quote.bid, quote.ask);
    println!("  IV: {:.1}%", quote.implied_volatility);
    println!("  Days to expiry: {}", view.days_to_expiration);
    println!("  Moneyness: {:+.2}%", view.moneyness);
    println!("  Break-even: ${:.2} ({:+.2}% away)", view.break_even_price, view.price_to_break_even_pct);
    println!("  Intrinsic: ${:.2}  Time value: ${:.2}", view.intrinsic_value, view.time_value);
    println!("  In the money: {}", if view.in_the_money { "yes" } else { "no" });
    println!(
        "  Cost: ${:.2}/contract, ${:.2} for {}",
        view.cost_per_contract,
        view.total_cost(cli.quantity),
        cli.quantity
    );

    println!("\nGreeks (approximate):");
    println!("  Delta: {:.4}", quote.greeks.delta);
    println!("  Gamma: {:.4}", quote.greeks.gamma);
    println!("  Theta: {:.4}", quote.greeks.theta);
    println!("  Vega: {:.4}", quote.greeks.vega);

    println!("\nExpiry P&L per contract:");
    for s in desk.scenarios(&view)? {
        println!(
            "  ${:>9.2} ({:+.0}%): {:+.2}",
            s.hypothetical_price, s.pct_change, s.profit_per_contract
        );
    }

    println!("\nIV Term Structure:");
    for (point, insight) in desk.horizon_insights(chain) {
        match point.expiry {
            Some(e) => println!("  {:>3}d  {:5.1}%  ({})  {}", point.days, point.average_iv, e, insight.rationale),
            None => println!("  {:>3}d  n/a", point.days),
        }
    }
    if let Some(summary) = desk.iv_summary(chain) {
        println!("\n  {}: {}", summary.display_label, summary.strategy.label());
        println!("  {}", summary.rationale);
    }

    if let Some(action) = cli.order {
        let side = match action {
            OrderAction::Buy => OrderSide::Buy,
            OrderAction::Sell => OrderSide::Sell,
        };
        let order = match cli.limit {
            Some(limit) => OrderRequest::limit(&quote, side, cli.quantity, limit)?,
            None => OrderRequest::market(&quote, side, cli.quantity)?,
        };

        println!("\n--- Paper Order ---");
        match desk.place_order(&order, &quote) {
            Ok(conf) => {
                println!("  {} {:?}: {}", conf.id, conf.status, conf.message);
                if let Some(price) = conf.filled_avg_price {
                    println!("  Filled {} @ ${:.2}", conf.filled_quantity, price);
                }
            }
            Err(e) => println!("  Order failed: {}", e),
        }
        let account = desk.account()?;
        println!("  Cash: ${:.2}  Buying power: ${:.2}", account.cash, account.buying_power);
    }

    Ok(())
}
