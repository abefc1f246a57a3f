//! # Invalend Console
//!
//! Interactive console binary. Commands are read from stdin; the main loop
//! also drains transaction outcomes from the background receipt watchers, so
//! a confirmation lands on screen even while the prompt is idle.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, TxHash};
use lib_lisk::{explorer, format_units, USDC_DECIMALS};
use lib_utils::time::{format_relative, from_unix, now_utc};
use lib_utils::validation::validate_address;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::io::AsyncBufReadExt;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use console::app::handlers::{borrow, pool, repay, swap, wallet};
use console::app::{AppEvent, ReadKey, TxAction};
use console::core::LedgerService;
use console::services::ChainLedger;
use console::trading::calc::{self, ApprovalPhase};
use console::trading::tokens;
use console::{AppError, Config, Dashboard};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    init_tracing(&config);
    banner(&config);

    let ledger = Arc::new(ChainLedger::connect(&config)?);
    let dashboard = Dashboard::new(config, ledger);
    dashboard.connect().await?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut prune = tokio::time::interval(Duration::from_secs(1));
    prompt();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    prompt();
                    continue;
                }
                if matches!(line, "quit" | "exit") {
                    break;
                }
                if let Err(e) = dispatch(&dashboard, line).await {
                    println!("ERROR: {}", e);
                }
                drain_events(&dashboard).await;
                prompt();
            }
            event = dashboard.event_rx.recv() => {
                if let Ok(event) = event {
                    announce(&event);
                    dashboard.apply(event).await;
                    prompt();
                }
            }
            _ = prune.tick() => {
                dashboard.notifications.prune_expired(now_utc());
            }
        }
    }

    dashboard.disconnect();
    println!("bye");
    Ok(())
}

/// File-only logging so the log stream never garbles the prompt.
fn init_tracing(config: &Config) {
    if let Err(e) = std::fs::create_dir_all(&config.log_dir) {
        eprintln!("Warning: failed to create log directory: {}", e);
        return;
    }

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "console.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("console=info,lib_lisk=info,warn"));

    let file_layer = fmt::layer()
        .json()
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    // Keep the non-blocking writer's guard alive for the whole program.
    std::mem::forget(guard);

    info!(network = config.network.label(), "console logging initialized");
}

fn banner(config: &Config) {
    println!("============================================");
    println!("  Invalend Console - {}", config.network.label());
    println!("============================================");
    if config.is_read_only() {
        println!("  read-only mode (set INVALEND_PRIVATE_KEY to trade)");
    }
    println!("  type `help` for commands");
    println!();
}

fn prompt() {
    print!("invalend> ");
    let _ = std::io::stdout().flush();
}

fn announce(event: &AppEvent) {
    match event {
        AppEvent::TxConfirmed { action, outcome, .. } => {
            let block = outcome
                .block_number
                .map(|b| b.to_string())
                .unwrap_or_else(|| "?".to_string());
            println!();
            println!("✓ {} confirmed in block {}: {}", action.label(), block, outcome.hash);
        }
        AppEvent::TxFailed { action, reason, .. } => {
            println!();
            println!("✗ {} failed: {}", action.label(), reason);
        }
    }
}

/// Apply outcomes that arrived while a command was running.
async fn drain_events(dash: &Dashboard) {
    while let Ok(event) = dash.event_rx.try_recv() {
        announce(&event);
        dash.apply(event).await;
    }
}

async fn dispatch(dash: &Dashboard, line: &str) -> console::Result<()> {
    let mut parts = line.split_whitespace();
    let cmd = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match (cmd, args.as_slice()) {
        ("help", _) => print_help(),
        ("status", _) => print_status(dash),
        ("tokens", _) => print_tokens(),
        ("preview", [amount]) => {
            let quote = borrow::preview(dash, amount).await?;
            print_preview(&quote);
        }
        ("quote", [token_in, token_out, amount]) => {
            print_plan(&swap::quote(token_in, token_out, amount, dec!(0.5))?);
        }
        ("quote", [token_in, token_out, amount, slip]) => {
            print_plan(&swap::quote(token_in, token_out, amount, parse_slippage(slip)?)?);
        }
        ("approve", ["loan"]) => submitted(borrow::approve_margin(dash).await?),
        ("approve", ["pool"]) => submitted(pool::approve_pool(dash).await?),
        ("borrow", [amount]) => submitted(borrow::open_loan(dash, amount).await?),
        ("repay", []) => submitted(repay::repay(dash).await?),
        ("deposit", [amount]) => submitted(pool::deposit(dash, amount).await?),
        ("redeem", [amount]) => submitted(pool::withdraw(dash, amount).await?),
        ("swap", [token_in, token_out, amount]) => {
            submitted(swap::swap(dash, token_in, token_out, amount, dec!(0.5)).await?)
        }
        ("swap", [token_in, token_out, amount, slip]) => {
            submitted(swap::swap(dash, token_in, token_out, amount, parse_slippage(slip)?).await?)
        }
        ("withdraw", [token, "all"]) => submitted(wallet::withdraw_all(dash, token).await?),
        ("withdraw", [token, amount]) => submitted(wallet::withdraw(dash, token, amount).await?),
        ("exec", [target, data]) => submitted(wallet::execute_call(dash, target, data).await?),
        ("tx", _) => print_tx_table(dash),
        ("notices", _) => print_notices(dash),
        ("reset", []) => {
            dash.actions.write().reset_all();
            println!("action states cleared");
        }
        ("reset", rest) => reset_action(dash, &rest.join(" "))?,
        ("refresh", _) => {
            let keys = dash.reads.tracked_keys();
            dash.reads.refetch_many(&keys).await;
            println!("refreshed {} reads", keys.len());
        }
        ("snapshot", _) => {
            let json = serde_json::to_string_pretty(&dash.snapshot())
                .map_err(|e| AppError::Ledger(e.to_string()))?;
            println!("{}", json);
        }
        ("explorer", [target]) => open_explorer(dash, target)?,
        _ => println!("unknown command; try `help`"),
    }
    Ok(())
}

fn parse_slippage(text: &str) -> console::Result<Decimal> {
    text.parse::<Decimal>()
        .map_err(|_| AppError::Validation(format!("invalid slippage: {}", text)))
}

fn submitted(hash: TxHash) {
    println!("submitted {}; waiting for confirmation...", hash);
}

fn print_help() {
    println!();
    println!("  status                          session, balances and loan");
    println!("  tokens                          tradeable token registry");
    println!("  preview <usdc>                  quote margin for a position");
    println!("  quote <in> <out> <amt> [slip%]  quote a swap without sending");
    println!("  approve loan|pool               grant a USDC allowance");
    println!("  borrow <usdc>                   open a leveraged position");
    println!("  repay                           repay the active loan");
    println!("  deposit <usdc>                  lend into the pool");
    println!("  redeem <usdc>                   withdraw lent USDC");
    println!("  swap <in> <out> <amt> [slip%]   swap inside the restricted wallet");
    println!("  withdraw <token> <amt>|all      move funds out of the restricted wallet");
    println!("  exec <target> <calldata>        proxy a raw call (allowlisted only)");
    println!("  tx                              per-action transaction states");
    println!("  reset [action]                  clear transaction states");
    println!("  notices                         active notifications");
    println!("  refresh                         refetch every tracked read");
    println!("  snapshot                        dump the session as JSON");
    println!("  explorer <tx|address|token>     open on Blockscout");
    println!("  quit                            leave");
    println!();
}

fn print_status(dash: &Dashboard) {
    println!();
    println!("network   : {}", dash.network().label());
    match dash.wallet.read().address() {
        Some(addr) => println!("wallet    : {}", addr),
        None => println!("wallet    : read-only (no signing key)"),
    }
    if let Some(total) = dash.reads.amount(ReadKey::PoolTotalDeposits) {
        println!("pool TVL  : {} USDC", format_units(total, USDC_DECIMALS));
    }
    if let Some(balance) = dash.reads.amount(ReadKey::UsdcBalance) {
        println!("balance   : {} USDC", format_units(balance, USDC_DECIMALS));
    }
    if let Some(deposited) = dash.reads.amount(ReadKey::PoolBalance) {
        println!("deposited : {} USDC", format_units(deposited, USDC_DECIMALS));
    }
    match dash.reads.loan() {
        Some(loan) if loan.is_active => {
            let age = from_unix(loan.start_time)
                .map(|t| format_relative(t, now_utc()))
                .unwrap_or_else(|_| "?".to_string());
            println!(
                "loan      : {} USDC position, {} USDC margin, opened {}",
                format_units(loan.position_size(), USDC_DECIMALS),
                format_units(loan.margin_amount, USDC_DECIMALS),
                age
            );
            if let Some(w) = loan.bound_wallet() {
                println!("restricted: {} (locked until repay)", explorer::short_address(w));
            }
        }
        Some(loan) if loan.has_restricted_wallet() => {
            let wallet = loan.restricted_wallet;
            println!("loan      : repaid (restricted wallet {})", explorer::short_address(wallet));
            let usdc = dash.ledger.deployment().usdc;
            if let Some(held) = dash.reads.amount(ReadKey::RestrictedBalance { wallet, token: usdc }) {
                println!("restricted: {} USDC withdrawable", format_units(held, USDC_DECIMALS));
            }
        }
        _ => println!("loan      : none"),
    }
    println!();
}

fn print_tokens() {
    println!();
    println!("{:<7} {:<18} {:<12} address", "symbol", "name", "price");
    for token in tokens::all() {
        println!(
            "{:<7} {:<18} {:<12} {}",
            token.symbol,
            token.name,
            calc::format_usd(token.price().unwrap_or_default()),
            token.address
        );
    }
    println!();
}

fn print_preview(quote: &borrow::BorrowPreview) {
    println!();
    println!("position     : {} USDC", quote.amount);
    println!("margin (20%) : {} USDC", quote.margin);
    if let Some(required) = quote.required_margin {
        println!("quoted margin: {} USDC", format_units(required, USDC_DECIMALS));
    }
    if let Some(funding) = quote.pool_funding {
        println!("pool funding : {} USDC", format_units(funding, USDC_DECIMALS));
    }
    match quote.phase {
        ApprovalPhase::NeedsApproval => println!("next step    : approve loan"),
        ApprovalPhase::ReadyToAct => println!("next step    : borrow"),
    }
    println!();
}

fn print_plan(plan: &swap::SwapPlan) {
    println!();
    println!(
        "swap {} {} (~{}) for at least {} {}",
        calc::format_token_amount(plan.amount_in, plan.token_in.decimals),
        plan.token_in.symbol,
        calc::format_usd(calc::usd_value(plan.amount_in, plan.token_in.price())),
        calc::format_token_amount(plan.min_out, plan.token_out.decimals),
        plan.token_out.symbol,
    );
    println!("fee tier {}, valid for 20 minutes", plan.fee.label());
    println!();
}

fn print_tx_table(dash: &Dashboard) {
    let slots = dash.actions.read();
    println!();
    println!("{:<14} {:<8} detail", "action", "status");
    for action in TxAction::ALL {
        let state = slots.get(action);
        let detail = match (&state.hash, &state.error) {
            (_, Some(err)) => err.clone(),
            (Some(hash), None) => hash.to_string(),
            (None, None) => "-".to_string(),
        };
        println!("{:<14} {:<8} {}", action.label(), state.status.label(), detail);
    }
    println!();
}

fn print_notices(dash: &Dashboard) {
    let items = dash.notifications.active();
    if items.is_empty() {
        println!("no active notices");
        return;
    }
    let now = now_utc();
    for n in items {
        println!("[{:?}] {} ({})", n.kind, n.message, format_relative(n.created_at, now));
    }
}

fn reset_action(dash: &Dashboard, name: &str) -> console::Result<()> {
    let action = TxAction::ALL
        .iter()
        .copied()
        .find(|a| a.label() == name)
        .ok_or_else(|| AppError::Validation(format!("unknown action: {}", name)))?;
    dash.actions.write().reset(action);
    println!("{} reset", action.label());
    Ok(())
}

fn open_explorer(dash: &Dashboard, target: &str) -> console::Result<()> {
    let network = dash.network();
    let url = if let Some(token) = tokens::find(target) {
        explorer::token_url(network, token.address)
    } else if validate_address(target).is_ok() {
        let address: Address = target
            .parse()
            .map_err(|_| AppError::Validation(format!("invalid address: {}", target)))?;
        explorer::address_url(network, address)
    } else {
        let hash: TxHash = target.parse().map_err(|_| {
            AppError::Validation(format!(
                "`{}` is not a token, address or transaction hash",
                target
            ))
        })?;
        explorer::tx_url(network, hash)
    };
    println!("opening {}", url);
    if let Err(e) = open::that(&url) {
        println!("could not launch a browser ({}); open the URL manually", e);
    }
    Ok(())
}
