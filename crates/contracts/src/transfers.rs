use num_bigint::BigUint;
use drtabi::{Address, Value};
use crate::{Error, TransactionPayload};

const DCDT_TRANSFER: &str = "DCDTTransfer";
const DCDT_NFT_TRANSFER: &str = "DCDTNFTTransfer";
const MULTI_DCDT_NFT_TRANSFER: &str = "MultiDCDTNFTTransfer";

/// An amount of a token, held in its smallest unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenTransfer {
    pub token_identifier: String,
    pub nonce: u64,
    pub amount: BigUint,
    pub num_decimals: u32,
}

impl TokenTransfer {
    pub fn fungible(token_identifier: &str, amount: BigUint, num_decimals: u32) -> Self {
        Self { token_identifier: token_identifier.to_string(), nonce: 0, amount, num_decimals }
    }

    /// Parses a decimal amount such as `"100.00"` and scales it by `num_decimals`.
    pub fn fungible_from_amount(token_identifier: &str, amount: &str, num_decimals: u32) -> Result<Self, Error> {
        Ok(Self::fungible(token_identifier, parse_amount(amount, num_decimals)?, num_decimals))
    }

    pub fn non_fungible(token_identifier: &str, nonce: u64) -> Self {
        Self { token_identifier: token_identifier.to_string(), nonce, amount: BigUint::from(1_u8), num_decimals: 0 }
    }

    pub fn semi_fungible(token_identifier: &str, nonce: u64, quantity: u64) -> Self {
        Self { token_identifier: token_identifier.to_string(), nonce, amount: BigUint::from(quantity), num_decimals: 0 }
    }

    fn identifier_value(&self) -> Value {
        Value::bytes_from_utf8(&self.token_identifier)
    }
}

fn parse_amount(amount: &str, num_decimals: u32) -> Result<BigUint, Error> {
    let invalid = || Error::InvalidAmount(format!("'{}' with {} decimals", amount, num_decimals));

    let (integer, fraction) = match amount.trim().split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (amount.trim(), ""),
    };
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if integer.is_empty() || !digits(integer) || !digits(fraction) {
        return Err(invalid());
    }

    // Extra fractional digits are accepted only when they are zeros.
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > num_decimals as usize {
        return Err(invalid());
    }

    let scaled = format!("{}{}{}", integer, fraction, "0".repeat(num_decimals as usize - fraction.len()));
    BigUint::parse_bytes(scaled.as_bytes(), 10).ok_or_else(invalid)
}

/// `DCDTTransfer@<token>@<amount>`
#[derive(Clone, Debug)]
pub struct DcdtTransferPayloadBuilder {
    payment: TokenTransfer,
}

impl Default for DcdtTransferPayloadBuilder {
    fn default() -> Self {
        Self { payment: TokenTransfer::fungible("", BigUint::default(), 0) }
    }
}

impl DcdtTransferPayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_payment(mut self, payment: TokenTransfer) -> Self {
        self.payment = payment;
        self
    }

    pub fn build(&self) -> Result<TransactionPayload, Error> {
        let args = vec![
            self.payment.identifier_value(),
            Value::BigUint(self.payment.amount.clone()),
        ];
        TransactionPayload::with_arguments(DCDT_TRANSFER, &args)
    }
}

/// `DCDTNFTTransfer@<token>@<nonce>@<quantity>@<destination>`
#[derive(Clone, Debug)]
pub struct DcdtNftTransferPayloadBuilder {
    payment: TokenTransfer,
    destination: Address,
}

impl Default for DcdtNftTransferPayloadBuilder {
    fn default() -> Self {
        Self { payment: TokenTransfer::non_fungible("", 0), destination: Address::zero() }
    }
}

impl DcdtNftTransferPayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_payment(mut self, payment: TokenTransfer) -> Self {
        self.payment = payment;
        self
    }

    pub fn set_destination(mut self, destination: Address) -> Self {
        self.destination = destination;
        self
    }

    pub fn build(&self) -> Result<TransactionPayload, Error> {
        let args = vec![
            self.payment.identifier_value(),
            Value::U64(self.payment.nonce),
            Value::BigUint(self.payment.amount.clone()),
            Value::Address(self.destination),
        ];
        TransactionPayload::with_arguments(DCDT_NFT_TRANSFER, &args)
    }
}

/// `MultiDCDTNFTTransfer@<destination>@<count>` followed by `<token>@<nonce>@<amount>` per payment.
#[derive(Clone, Debug, Default)]
pub struct MultiDcdtNftTransferPayloadBuilder {
    payments: Vec<TokenTransfer>,
    destination: Address,
}

impl MultiDcdtNftTransferPayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_payments(mut self, payments: Vec<TokenTransfer>) -> Self {
        self.payments = payments;
        self
    }

    pub fn set_destination(mut self, destination: Address) -> Self {
        self.destination = destination;
        self
    }

    pub fn build(&self) -> Result<TransactionPayload, Error> {
        let count = u16::try_from(self.payments.len())
            .map_err(|_| Error::InvalidAmount(format!("{} payments in one transfer", self.payments.len())))?;

        let mut args = vec![Value::Address(self.destination), Value::U16(count)];
        for payment in &self.payments {
            args.push(payment.identifier_value());
            args.push(Value::U64(payment.nonce));
            args.push(Value::BigUint(payment.amount.clone()));
        }
        TransactionPayload::with_arguments(MULTI_DCDT_NFT_TRANSFER, &args)
    }
}
