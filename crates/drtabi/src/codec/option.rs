use crate::codec::{sealed, Codec, Reader};
use crate::codec::sealed::{Decoder, Encoder};
use crate::value::OptionValue;
use crate::{Error, Type, Value};

const NONE: u8 = 0x00;
const SOME: u8 = 0x01;

pub struct OptionCodec {
    item_type: Type,
    codec: Box<dyn Codec>,
}

impl OptionCodec {
    pub fn new(item_type: Type, codec: Box<dyn Codec>) -> Self {
        Self { item_type, codec }
    }

    fn option<'a>(&self, value: &'a Value) -> Result<Option<&'a Value>, Error> {
        match value {
            Value::Option(option) => Ok(option.value()),
            other => Err(Error::InvalidData(format!("expected Option<{}>, got {}", self.item_type, other.get_type()))),
        }
    }

    fn decode_marker(&self, marker: u8, reader: &mut Reader) -> Result<Value, Error> {
        match marker {
            NONE => Ok(Value::Option(OptionValue::none(self.item_type.clone()))),
            SOME => {
                let inner = self.codec.decode_nested(reader)?;
                Ok(Value::Option(OptionValue::new(self.item_type.clone(), Some(inner))?))
            }
            other => Err(Error::InvalidData(format!("invalid Option marker {:#04x}", other))),
        }
    }
}

impl sealed::AbiType for OptionCodec {
    fn abi_type(&self) -> Type {
        Type::Option(Box::new(self.item_type.clone()))
    }
}

impl sealed::Encoder for OptionCodec {
    fn encode_nested(&self, value: &Value) -> Result<Vec<u8>, Error> {
        match self.option(value)? {
            None => Ok(vec![NONE]),
            Some(inner) => {
                let mut buff = vec![SOME];
                buff.extend(self.codec.encode_nested(inner)?);
                Ok(buff)
            }
        }
    }

    fn encode_top(&self, value: &Value) -> Result<Vec<u8>, Error> {
        match self.option(value)? {
            None => Ok(Vec::new()),
            Some(_) => self.encode_nested(value),
        }
    }
}

impl sealed::Decoder for OptionCodec {
    fn decode_nested(&self, reader: &mut Reader) -> Result<Value, Error> {
        let marker = reader.read_u8()?;
        self.decode_marker(marker, reader)
    }

    fn decode_top(&self, bytes: &[u8]) -> Result<Value, Error> {
        if bytes.is_empty() {
            return Ok(Value::Option(OptionValue::none(self.item_type.clone())));
        }
        let mut reader = Reader::new(bytes);
        let marker = reader.read_u8()?;
        if marker != SOME {
            return Err(Error::InvalidData(format!("invalid top-level Option marker {:#04x}", marker)));
        }
        let value = self.decode_marker(marker, &mut reader)?;
        reader.finish()?;
        Ok(value)
    }
}
