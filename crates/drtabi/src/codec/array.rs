use crate::codec::{sealed, length_prefix, Codec, Reader};
use crate::codec::sealed::{Decoder, Encoder};
use crate::value::{ArrayValue, ListValue};
use crate::{Error, Type, Value};

/// Variable-length homogeneous list.
///
/// Nested lists carry a 4-byte item count. At top level the count is left out
/// and items run to the end of the argument.
pub struct ListCodec {
    item_type: Type,
    codec: Box<dyn Codec>,
}

impl ListCodec {
    pub fn new(item_type: Type, codec: Box<dyn Codec>) -> Self {
        Self { item_type, codec }
    }

    fn items<'a>(&self, value: &'a Value) -> Result<&'a [Value], Error> {
        match value {
            Value::List(list) => Ok(list.items()),
            other => Err(Error::InvalidData(format!("expected List<{}>, got {}", self.item_type, other.get_type()))),
        }
    }

    fn encode_items(&self, items: &[Value], buff: &mut Vec<u8>) -> Result<(), Error> {
        for item in items {
            buff.extend(self.codec.encode_nested(item)?);
        }
        Ok(())
    }

    fn to_value(&self, items: Vec<Value>) -> Result<Value, Error> {
        Ok(Value::List(ListValue::new(self.item_type.clone(), items)?))
    }
}

impl sealed::AbiType for ListCodec {
    fn abi_type(&self) -> Type {
        Type::List(Box::new(self.item_type.clone()))
    }
}

impl sealed::Encoder for ListCodec {
    fn encode_nested(&self, value: &Value) -> Result<Vec<u8>, Error> {
        let items = self.items(value)?;
        let mut buff = length_prefix(items.len())?.to_vec();
        self.encode_items(items, &mut buff)?;
        Ok(buff)
    }

    fn encode_top(&self, value: &Value) -> Result<Vec<u8>, Error> {
        let mut buff = Vec::new();
        self.encode_items(self.items(value)?, &mut buff)?;
        Ok(buff)
    }
}

impl sealed::Decoder for ListCodec {
    fn decode_nested(&self, reader: &mut Reader) -> Result<Value, Error> {
        let count = reader.read_length()?;
        let mut items = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            let position = reader.position();
            items.push(self.codec.decode_nested(reader)?);
            if reader.position() == position && count > reader.remaining() {
                return Err(Error::InvalidData(format!(
                    "list claims {} items of type {} that occupy no bytes",
                    count, self.item_type
                )));
            }
        }
        self.to_value(items)
    }

    fn decode_top(&self, bytes: &[u8]) -> Result<Value, Error> {
        let mut reader = Reader::new(bytes);
        let mut items = Vec::new();
        while !reader.is_exhausted() {
            let position = reader.position();
            items.push(self.codec.decode_nested(&mut reader)?);
            if reader.position() == position {
                return Err(Error::InvalidData(format!(
                    "items of type {} occupy no bytes, list length is unknown",
                    self.item_type
                )));
            }
        }
        self.to_value(items)
    }
}

/// Fixed-length array, encoded as its items back to back in both forms.
pub struct FixedArrayCodec {
    item_type: Type,
    size: usize,
    codec: Box<dyn Codec>,
}

impl FixedArrayCodec {
    pub fn new(item_type: Type, size: usize, codec: Box<dyn Codec>) -> Self {
        Self { item_type, size, codec }
    }
}

impl sealed::AbiType for FixedArrayCodec {
    fn abi_type(&self) -> Type {
        Type::FixedArray(Box::new(self.item_type.clone()), self.size)
    }
}

impl sealed::Encoder for FixedArrayCodec {
    fn encode_nested(&self, value: &Value) -> Result<Vec<u8>, Error> {
        let items = match value {
            Value::FixedArray(array) if array.len() == self.size => array.items(),
            other => {
                return Err(Error::InvalidData(format!(
                    "expected {}, got {}",
                    sealed::AbiType::abi_type(self),
                    other.get_type()
                )))
            }
        };

        let mut buff = Vec::new();
        for item in items {
            buff.extend(self.codec.encode_nested(item)?);
        }
        Ok(buff)
    }
}

impl sealed::Decoder for FixedArrayCodec {
    fn decode_nested(&self, reader: &mut Reader) -> Result<Value, Error> {
        let items = (0..self.size)
            .map(|_| self.codec.decode_nested(reader))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::FixedArray(ArrayValue::new(self.item_type.clone(), self.size, items)?))
    }
}
