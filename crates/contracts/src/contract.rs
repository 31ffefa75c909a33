use drtabi::{Address, ArgSerializer, EndpointDefinition, NativeArg, NativeSerializer, Type, Value};
use crate::hash::keccak256;
use crate::payload::{ContractCallPayloadBuilder, TransactionPayload, VM_TYPE};
use crate::{Error, SmartContractAbi};

/// A deployed contract together with the interface used to talk to it.
#[derive(Clone, Debug)]
pub struct SmartContract {
    address: Address,
    abi: SmartContractAbi,
}

impl SmartContract {
    pub fn new(address: Address, abi: SmartContractAbi) -> Self {
        Self { address, abi }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn set_address(&mut self, address: Address) {
        self.address = address;
    }

    pub fn abi(&self) -> &SmartContractAbi {
        &self.abi
    }

    pub fn get_endpoint(&self, function: &str) -> Result<&EndpointDefinition, Error> {
        self.abi.get_endpoint(function)
    }

    /// Infers typed arguments from native ones, then builds `function@args`.
    pub fn call_data(&self, function: &str, args: &[NativeArg]) -> Result<TransactionPayload, Error> {
        let endpoint = self.get_endpoint(function)?;
        let values = NativeSerializer::new().native_to_typed_values(args, endpoint)?;
        self.build_call(function, values)
    }

    /// Builds `function@args` from values that must already match the endpoint inputs.
    pub fn call_data_typed(&self, function: &str, values: Vec<Value>) -> Result<TransactionPayload, Error> {
        let endpoint = self.get_endpoint(function)?;
        check_typed_arguments(endpoint, &values)?;
        self.build_call(function, values)
    }

    fn build_call(&self, function: &str, values: Vec<Value>) -> Result<TransactionPayload, Error> {
        ContractCallPayloadBuilder::new()
            .set_function(function)
            .set_args(values)
            .build()
    }

    /// Decodes the return data of a query against the endpoint outputs.
    pub fn decode_outputs(&self, function: &str, return_data_parts: &[Vec<u8>]) -> Result<Vec<Value>, Error> {
        let endpoint = self.get_endpoint(function)?;
        let values = ArgSerializer::new().buffers_to_values(return_data_parts, &endpoint.output_types())?;
        log::trace!("Decoded {} outputs of '{}'", values.len(), function);
        Ok(values)
    }

    /// Address of a contract deployed by `owner` with the given account nonce.
    pub fn compute_address(owner: &Address, nonce: u64) -> Address {
        let owner = owner.as_bytes();

        let mut data = owner.to_vec();
        data.extend_from_slice(&nonce.to_le_bytes());
        let hash = keccak256(&data);

        let mut address = [0u8; 32];
        address[8..10].copy_from_slice(&VM_TYPE);
        address[10..30].copy_from_slice(&hash[10..30]);
        address[30..].copy_from_slice(&owner[30..]);
        Address::new(address)
    }
}

fn check_typed_arguments(endpoint: &EndpointDefinition, values: &[Value]) -> Result<(), Error> {
    let invalid = |message: String| Error::from(drtabi::Error::InvalidArgument(message));

    if values.len() > endpoint.inputs.len() {
        return Err(invalid(format!(
            "endpoint '{}' takes {} arguments, got {}",
            endpoint.name,
            endpoint.inputs.len(),
            values.len()
        )));
    }

    for (index, input) in endpoint.inputs.iter().enumerate() {
        match values.get(index) {
            Some(value) if value.get_type() == input.ty => {}
            Some(value) => {
                return Err(invalid(format!(
                    "argument #{} ({}): expected {}, got {}",
                    index,
                    input.name,
                    input.ty,
                    value.get_type()
                )))
            }
            None if matches!(input.ty, Type::Optional(_) | Type::Variadic(_)) => {}
            None => {
                return Err(invalid(format!(
                    "endpoint '{}' is missing argument #{} ({})",
                    endpoint.name, index, input.name
                )))
            }
        }
    }
    Ok(())
}
