use std::collections::HashMap;
use std::sync::Arc;

use eyre::{Result, WrapErr};

use crate::arb::driver::{self, Borrowable, SearchOutcome, TradeSize};
use crate::arb::pool::Pool;
use crate::arb::types::{Token, TokenAddress};
use crate::config::Config;
use crate::models::snapshot::{
    borrowables_from_records, pools_from_records, tokens_from_records, trade_sizes_from_records,
};
use crate::notify::slack::SlackNotifier;

/// Start the scan loop
///
/// Scans run until ctrl-c; a failing pass is logged and the loop keeps
/// going with the next snapshot.
///
/// # Arguments
///
/// * `config` - The runtime configuration
///
/// # Errors
/// * If the shutdown signal cannot be installed
pub async fn start(config: Config) -> Result<()> {
    let config = Arc::new(config);
    let notifier = SlackNotifier::new()
        .map_err(|e| log::info!("slack notification disabled: {e}"))
        .ok();

    let scan_config = Arc::clone(&config);
    tokio::spawn(async move {
        loop {
            match scan(&scan_config).await {
                Ok(outcome) => {
                    if let (Some(plan), Some(best)) = (&outcome.plan, outcome.routes.first()) {
                        if let Some(notifier) = &notifier {
                            if let Err(e) = notifier.send_plan(plan, best).await {
                                log::error!("slack notification failed: {e}");
                            }
                        }
                    }
                }
                Err(e) => log::error!("scan failed: {e}"),
            }
            tokio::time::sleep(std::time::Duration::from_secs(
                scan_config.scan_interval_secs,
            ))
            .await;
        }
    });

    tokio::signal::ctrl_c().await?;
    log::info!("Received shutdown signal, stopping scans");
    Ok(())
}

/// Load the snapshot files and run one search pass
///
/// # Errors
/// * If a snapshot file cannot be read or parsed
pub async fn scan(config: &Config) -> Result<SearchOutcome> {
    let (pools, tokens, borrowables, trade_sizes) = load_snapshot(config).await?;

    let outcome = driver::search(
        &borrowables,
        &trade_sizes,
        &pools,
        &tokens,
        &config.gas_multipliers,
        config.max_hops,
        config.minimum_profit,
    )
    .wrap_err("snapshot rejected")?;

    log::info!(
        "scan: {} pools, {} borrowables, {} profitable routes",
        pools.len(),
        borrowables.len(),
        outcome.routes.len()
    );
    for route in outcome.routes.iter().take(5) {
        log::info!(
            "  {} -> {} via {:?} (profit {}, impact {}, gas {})",
            route.input_amount,
            route.quote_output_amount,
            route.path,
            route.profit().unwrap_or_default(),
            route.price_impact,
            route.gas_multiplier
        );
    }
    if let Some(plan) = &outcome.plan {
        log::info!(
            "plan: borrow {} {} and repay {}",
            plan.borrow_amount,
            plan.borrow_token,
            plan.expected_return
        );
    }

    Ok(outcome)
}

#[allow(clippy::type_complexity)]
async fn load_snapshot(
    config: &Config,
) -> Result<(
    Vec<Pool>,
    Vec<Token>,
    Vec<Borrowable>,
    HashMap<TokenAddress, TradeSize>,
)> {
    let pools = read_json(&config.pools_path)
        .await
        .and_then(pools_from_records)
        .wrap_err("loading pool snapshot")?;
    let tokens = read_json(&config.tokens_path)
        .await
        .map(tokens_from_records)
        .wrap_err("loading token config")?;
    let borrowables = read_json(&config.borrowables_path)
        .await
        .map(borrowables_from_records)
        .wrap_err("loading borrowables")?;
    let trade_sizes = read_json(&config.trade_sizes_path)
        .await
        .and_then(trade_sizes_from_records)
        .wrap_err("loading trade sizes")?;
    Ok((pools, tokens, borrowables, trade_sizes))
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("reading {path}"))?;
    serde_json::from_str(&contents).wrap_err_with(|| format!("parsing {path}"))
}
