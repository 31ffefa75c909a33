use crate::codec::{sealed, Reader};
use crate::{Error, Type, Value};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NothingCodec;

impl sealed::AbiType for NothingCodec {
    fn abi_type(&self) -> Type {
        Type::Nothing
    }
}

impl sealed::Encoder for NothingCodec {
    fn encode_nested(&self, _value: &Value) -> Result<Vec<u8>, Error> {
        Ok(Vec::new())
    }
}

impl sealed::Decoder for NothingCodec {
    fn decode_nested(&self, _reader: &mut Reader) -> Result<Value, Error> {
        Ok(Value::Nothing)
    }
}
