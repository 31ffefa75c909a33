extern crate drtabi;
extern crate hex;
extern crate log;
extern crate num_bigint;
extern crate serde;
extern crate serde_json;
extern crate tiny_keccak;
#[macro_use]
extern crate thiserror;

pub use abi::SmartContractAbi;
pub use contract::SmartContract;
pub use error::Error;
pub use payload::{
    CodeMetadata, ContractCallPayloadBuilder, ContractDeployPayloadBuilder, ContractUpgradePayloadBuilder,
    TransactionPayload, VM_TYPE,
};
pub use transfers::{
    DcdtNftTransferPayloadBuilder, DcdtTransferPayloadBuilder, MultiDcdtNftTransferPayloadBuilder, TokenTransfer,
};

mod abi;
mod contract;
mod error;
mod hash;
mod payload;
mod transfers;
