use std::fmt;
use drtabi::{ArgSerializer, Value, ARGUMENTS_SEPARATOR};
use crate::Error;

/// Virtual machine identifier written into deploy payloads and contract addresses.
pub const VM_TYPE: [u8; 2] = [0x05, 0x00];

const UPGRADE_FUNCTION: &str = "upgradeContract";

/// The data field of a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionPayload(String);

impl TransactionPayload {
    pub fn new(data: &str) -> Self {
        Self(data.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds `head@arg1@arg2...`, or just `head` when there are no arguments.
    pub(crate) fn with_arguments(head: &str, args: &[Value]) -> Result<Self, Error> {
        let encoded = ArgSerializer::new().values_to_string(args)?;
        let data = if encoded.count == 0 {
            head.to_string()
        } else {
            format!("{}{}{}", head, ARGUMENTS_SEPARATOR, encoded.arguments_string)
        };
        log::debug!("Built payload '{}' with {} arguments", head, encoded.count);
        Ok(Self(data))
    }
}

impl fmt::Display for TransactionPayload {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Flags stored along with the contract code.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CodeMetadata {
    pub upgradeable: bool,
    pub readable: bool,
    pub payable: bool,
    pub payable_by_sc: bool,
}

impl Default for CodeMetadata {
    fn default() -> Self {
        Self { upgradeable: true, readable: false, payable: false, payable_by_sc: false }
    }
}

impl CodeMetadata {
    const UPGRADEABLE: u8 = 0x01;
    const READABLE: u8 = 0x04;
    const PAYABLE: u8 = 0x02;
    const PAYABLE_BY_SC: u8 = 0x04;

    pub fn new(upgradeable: bool, readable: bool, payable: bool, payable_by_sc: bool) -> Self {
        Self { upgradeable, readable, payable, payable_by_sc }
    }

    pub fn to_bytes(&self) -> [u8; 2] {
        let flag = |set: bool, bit: u8| if set { bit } else { 0 };
        [
            flag(self.upgradeable, Self::UPGRADEABLE) | flag(self.readable, Self::READABLE),
            flag(self.payable, Self::PAYABLE) | flag(self.payable_by_sc, Self::PAYABLE_BY_SC),
        ]
    }

    pub fn from_bytes(bytes: [u8; 2]) -> Self {
        Self {
            upgradeable: bytes[0] & Self::UPGRADEABLE != 0,
            readable: bytes[0] & Self::READABLE != 0,
            payable: bytes[1] & Self::PAYABLE != 0,
            payable_by_sc: bytes[1] & Self::PAYABLE_BY_SC != 0,
        }
    }

    fn to_value(self) -> Value {
        Value::Bytes(self.to_bytes().to_vec())
    }
}

#[derive(Clone, Debug, Default)]
pub struct ContractCallPayloadBuilder {
    function: Option<String>,
    args: Vec<Value>,
}

impl ContractCallPayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_function(mut self, function: &str) -> Self {
        self.function = Some(function.to_string());
        self
    }

    pub fn add_arg(mut self, arg: Value) -> Self {
        self.args.push(arg);
        self
    }

    pub fn set_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    pub fn build(&self) -> Result<TransactionPayload, Error> {
        let function = self.function.as_deref().ok_or(Error::Missing("function"))?;
        TransactionPayload::with_arguments(function, &self.args)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ContractDeployPayloadBuilder {
    code: Option<Vec<u8>>,
    code_metadata: CodeMetadata,
    args: Vec<Value>,
}

impl ContractDeployPayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_code(mut self, code: &[u8]) -> Self {
        self.code = Some(code.to_vec());
        self
    }

    pub fn set_code_metadata(mut self, code_metadata: CodeMetadata) -> Self {
        self.code_metadata = code_metadata;
        self
    }

    pub fn add_init_arg(mut self, arg: Value) -> Self {
        self.args.push(arg);
        self
    }

    pub fn set_init_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    pub fn build(&self) -> Result<TransactionPayload, Error> {
        let code = self.code.as_ref().ok_or(Error::Missing("code"))?;

        let mut args = vec![
            Value::Bytes(VM_TYPE.to_vec()),
            self.code_metadata.to_value(),
        ];
        args.extend(self.args.iter().cloned());

        TransactionPayload::with_arguments(&hex::encode(code), &args)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ContractUpgradePayloadBuilder {
    code: Option<Vec<u8>>,
    code_metadata: CodeMetadata,
    args: Vec<Value>,
}

impl ContractUpgradePayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_code(mut self, code: &[u8]) -> Self {
        self.code = Some(code.to_vec());
        self
    }

    pub fn set_code_metadata(mut self, code_metadata: CodeMetadata) -> Self {
        self.code_metadata = code_metadata;
        self
    }

    pub fn add_init_arg(mut self, arg: Value) -> Self {
        self.args.push(arg);
        self
    }

    pub fn set_init_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    pub fn build(&self) -> Result<TransactionPayload, Error> {
        let code = self.code.as_ref().ok_or(Error::Missing("code"))?;

        let mut args = vec![
            Value::Bytes(code.clone()),
            self.code_metadata.to_value(),
        ];
        args.extend(self.args.iter().cloned());

        TransactionPayload::with_arguments(UPGRADE_FUNCTION, &args)
    }
}
