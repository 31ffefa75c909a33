use crate::codec::{sealed, Reader};
use crate::{Error, Type, Value};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BooleanCodec;

fn from_byte(byte: u8) -> Result<Value, Error> {
    match byte {
        0x00 => Ok(Value::Boolean(false)),
        0x01 => Ok(Value::Boolean(true)),
        other => Err(Error::InvalidData(format!("{:#04x} is not a boolean", other))),
    }
}

impl sealed::AbiType for BooleanCodec {
    fn abi_type(&self) -> Type {
        Type::Bool
    }
}

impl sealed::Encoder for BooleanCodec {
    fn encode_nested(&self, value: &Value) -> Result<Vec<u8>, Error> {
        Ok(vec![value.as_boolean()? as u8])
    }

    fn encode_top(&self, value: &Value) -> Result<Vec<u8>, Error> {
        match value.as_boolean()? {
            true => Ok(vec![0x01]),
            false => Ok(Vec::new()),
        }
    }
}

impl sealed::Decoder for BooleanCodec {
    fn decode_nested(&self, reader: &mut Reader) -> Result<Value, Error> {
        from_byte(reader.read_u8()?)
    }

    fn decode_top(&self, bytes: &[u8]) -> Result<Value, Error> {
        match bytes {
            [] => Ok(Value::Boolean(false)),
            [byte] => from_byte(*byte),
            _ => Err(Error::InvalidData(format!("{} bytes are not a boolean", bytes.len()))),
        }
    }
}
