use crate::arb::decimal::Dec;
use thiserror::Error;

/// Failures raised by the decimal facade and the numeric root finder.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Newton hit an iterate where the derivative is zero
    #[error("newton: zero slope at current iterate")]
    NewtonSlopeZero,

    /// Newton did not converge within the iteration budget
    #[error("newton: no convergence after {0} iterations")]
    NewtonMaxIterations(usize),

    /// Bisection requires endpoints with opposite signs
    #[error("bisect: f(a) and f(b) have the same sign")]
    BisectSameSignEndpoints,

    /// Bisection did not converge within the iteration budget
    #[error("bisect: no convergence after {0} iterations")]
    BisectMaxIterations(usize),

    /// Newton failed and no lower bound was supplied for bisection
    #[error("no lower bound available for bisection fallback")]
    NoBisectBounds,

    /// Division by zero in decimal arithmetic
    #[error("decimal division by zero")]
    DivisionByZero,

    /// Square root of a negative decimal
    #[error("square root of a negative value")]
    NegativeSqrt,

    /// Exponent was not an integer
    #[error("exponent must be an integer")]
    NonIntegerExponent,

    /// A decimal could not be represented as a raw (unsigned 256-bit) amount
    #[error("decimal is out of range for a raw amount")]
    RawOutOfRange,
}

/// Failures raised by a single swap simulation, stable or constant-product.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SwapError {
    /// Trade input at or below the pool's minimum trade size
    #[error("trade of {amount} is at or below the minimum trade size {minimum}")]
    TradeTooSmall { amount: Dec, minimum: Dec },

    /// Price impact negative or above the pool's limit
    #[error("price impact {impact} is outside [0, {limit}]")]
    PriceImpactExceeded { impact: Dec, limit: Dec },

    /// The invariant solver gave up; the trade cannot be priced
    #[error("swap could not be priced: {0}")]
    Nonconvergent(#[from] MathError),

    /// Stable pool has no oracle price ratio
    #[error("stable pool has no oracle price ratio")]
    OracleUnavailable,

    /// Requested output meets or exceeds the pool's liquidity
    #[error("insufficient liquidity: need {requested}, pool holds {available}")]
    InsufficientLiquidity { requested: Dec, available: Dec },
}

/// Failures raised while evaluating a route against the snapshot.
///
/// Swap failures abort the route they occur in; the remaining variants are
/// snapshot-level problems and indicate bad input for the whole call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    /// Path references a pool address missing from the snapshot
    #[error("pool {0} not found in the snapshot")]
    UnknownPool(String),

    /// Snapshot carries more than one pool with the same address
    #[error("pool {0} appears more than once in the snapshot")]
    DuplicatePool(String),

    /// Pool references a token address missing from the token config
    #[error("token {0} not found in the token config")]
    UnknownToken(String),

    /// Token config carries more than one entry for the same address
    #[error("token {0} appears more than once in the token config")]
    DuplicateToken(String),

    /// The token being carried into a hop is not a side of that hop's pool
    #[error("token {token} is not a side of pool {pool}")]
    TokenMismatch { token: String, pool: String },

    /// A hop simulation failed
    #[error(transparent)]
    Swap(#[from] SwapError),
}

impl RouteError {
    /// Whether the error condemns the snapshot rather than one route.
    /// Duplicate entries mean every lookup is suspect, so enumeration
    /// stops instead of skipping.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::DuplicatePool(_) | Self::DuplicateToken(_))
    }
}
