use crate::address::ADDRESS_LENGTH;
use crate::codec::{sealed, Reader};
use crate::value::H256_LENGTH;
use crate::{Address, Error, Type, Value};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AddressCodec;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct H256Codec;

impl sealed::AbiType for AddressCodec {
    fn abi_type(&self) -> Type {
        Type::Address
    }
}

impl sealed::Encoder for AddressCodec {
    fn encode_nested(&self, value: &Value) -> Result<Vec<u8>, Error> {
        Ok(value.as_address()?.as_bytes().to_vec())
    }
}

impl sealed::Decoder for AddressCodec {
    fn decode_nested(&self, reader: &mut Reader) -> Result<Value, Error> {
        let frame = reader.read(ADDRESS_LENGTH)?;
        Ok(Value::Address(Address::from_slice(frame)?))
    }
}

impl sealed::AbiType for H256Codec {
    fn abi_type(&self) -> Type {
        Type::H256
    }
}

impl sealed::Encoder for H256Codec {
    fn encode_nested(&self, value: &Value) -> Result<Vec<u8>, Error> {
        match value {
            Value::H256(hash) => Ok(hash.to_vec()),
            other => Err(Error::InvalidData(format!("expected H256, got {}", other.get_type()))),
        }
    }
}

impl sealed::Decoder for H256Codec {
    fn decode_nested(&self, reader: &mut Reader) -> Result<Value, Error> {
        Value::h256(reader.read(H256_LENGTH)?)
    }
}
