/*!
 * # Arbitrage Module
 *
 * The core route-valuation engine: given an immutable snapshot of pools and
 * tokens it enumerates cyclical trading routes, simulates every hop with
 * pool-specific math, and ranks the results. Everything here is pure and
 * synchronous; the adapters around it do the I/O.
 *
 * ## Key Components
 *
 * - `decimal`: arbitrary-precision decimal facade (30 fractional digits)
 * - `roots`: hybrid Newton/bisection root finder
 * - `stable`: stable-curve pool engine with a numerically solved invariant
 * - `constant_product`: `x·y = k` swap simulation
 * - `paths`: depth-first path enumeration over the pool graph
 * - `route`: per-hop route evaluation and ranking
 * - `optimal`: closed-form optimal borrow for three-pool cycles
 * - `driver`: borrowable iteration and trade-plan emission
 */

/// Swap simulation for constant-product pools
pub mod constant_product;
/// Arbitrary-precision decimal arithmetic
pub mod decimal;
/// Borrowable iteration and trade-plan emission
pub mod driver;
/// Error taxonomy of the engine
pub mod error;
/// Closed-form optimal borrow sizing
pub mod optimal;
/// Path enumeration over the pool graph
pub mod paths;
/// Pool and parameter records
pub mod pool;
/// Newton and bisection root finding
pub mod roots;
/// Route evaluation and ranking
pub mod route;
/// Swap simulation for stable pools
pub mod stable;
/// Helpers for testing
mod test_helpers;
/// Common types used across the arbitrage module
pub mod types;
