/*!
 * # Gyre - Cyclical Arbitrage Search for a DEX Ecosystem
 *
 * Gyre searches snapshots of constant-product and stable liquidity pools
 * for multi-hop trading cycles that return more of a borrowable token than
 * they take in, and turns the best cycle into a borrow → route-swap → repay
 * plan.
 *
 * ## Core Features
 *
 * - **Path Enumeration**: every pool-acyclic route back to the input token
 * - **Pool-exact Simulation**: stable-curve invariant solving and
 *   constant-product math with fee and price-impact accounting
 * - **Optimal Sizing**: closed-form borrow size for three-pool cycles
 * - **Plan Emission**: three-step trade plans for the transaction layer
 *
 * ## Module Structure
 *
 * - `arb`: the pure route-valuation engine
 * - `bot`: the scan loop tying snapshots to the engine
 * - `config`: environment-based configuration
 * - `models`: indexer snapshot records and their conversions
 * - `notify`: Slack notification for found opportunities
 * - `utils`: logging and shared constants
 */

/// The pure route-valuation engine
pub mod arb;
/// The scan loop
pub mod bot;
/// Environment-based configuration
pub mod config;
/// Indexer snapshot records
pub mod models;
/// Opportunity notification
pub mod notify;
/// Utility functions and helpers
pub mod utils;
