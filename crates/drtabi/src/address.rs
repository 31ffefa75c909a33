use std::fmt;
use crate::Error;

pub const ADDRESS_LENGTH: usize = 32;

/// Public key of an account or contract.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    pub fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn zero() -> Self {
        Self([0u8; ADDRESS_LENGTH])
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let bytes: [u8; ADDRESS_LENGTH] = bytes.try_into().map_err(|_| {
            Error::InvalidValue(format!("address must have {} bytes, got {}", ADDRESS_LENGTH, bytes.len()))
        })?;
        Ok(Self(bytes))
    }

    pub fn from_hex(hex_address: &str) -> Result<Self, Error> {
        let bytes = hex::decode(hex_address.trim_start_matches("0x"))?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
