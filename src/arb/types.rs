/// Type alias for a pool address, represented as a string.
pub type PoolAddress = String;

/// Type alias for a token address, represented as a string.
pub type TokenAddress = String;

/// Token as it comes from the token config
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    /// The address of the token
    pub address: TokenAddress,
    /// The number of decimals, converting raw amounts to human-readable ones
    pub decimals: u8,
}

impl Token {
    /// Create a new token
    #[must_use]
    pub const fn new(address: TokenAddress, decimals: u8) -> Self {
        Self { address, decimals }
    }
}
