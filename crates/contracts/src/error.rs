#[derive(Debug, Error)]
pub enum Error {
    #[error("abi error: {0}")]
    AbiError(#[from] drtabi::Error),

    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Missing {0}")]
    Missing(&'static str),

    #[error("Hex Error")]
    HexError(#[from] hex::FromHexError),

    #[error("JSON Error: {0}")]
    JsonError(#[from] serde_json::Error),
}
