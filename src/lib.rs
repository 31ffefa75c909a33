pub extern crate contracts;
pub extern crate drtabi;

pub use contracts::{SmartContract, SmartContractAbi, TokenTransfer, TransactionPayload};
pub use drtabi::{parse, ArgSerializer, BinaryCodec, NativeArg, NativeSerializer, Type, Value};
