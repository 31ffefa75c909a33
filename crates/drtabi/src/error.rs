#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Insufficient bytes: needed {needed}, {available} available")]
    InsufficientBytes { needed: usize, available: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Input data is invalid: {0}")]
    InvalidData(String),

    #[error("Missing argument for type {0}")]
    MissingArgument(String),

    #[error("Hex decoding error : {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Base64 decoding error : {0}")]
    Base64(#[from] base64::DecodeError),
}
