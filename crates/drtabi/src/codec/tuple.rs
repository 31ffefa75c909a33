use std::sync::Arc;
use crate::codec::{sealed, Codec, CodecOptions, Reader};
use crate::codec::sealed::AbiType;
use crate::types::StructDefinition;
use crate::value::StructValue;
use crate::{Error, Type, Value};

/// Encodes fields back to back in their nested form.
///
/// With a greedy trailing list policy, a top-level sequence whose last field is
/// a `List` writes that list without its item count.
struct Fields {
    codecs: Vec<Box<dyn Codec>>,
    options: CodecOptions,
}

impl Fields {
    fn greedy_tail(&self) -> bool {
        self.options.greedy_trailing_list()
            && matches!(self.codecs.last().map(|codec| codec.abi_type()), Some(Type::List(_)))
    }

    fn check_count(&self, owner: &Type, values: &[&Value]) -> Result<(), Error> {
        if values.len() != self.codecs.len() {
            return Err(Error::InvalidData(format!(
                "{} expects {} fields, got {}",
                owner,
                self.codecs.len(),
                values.len()
            )));
        }
        Ok(())
    }

    fn encode(&self, values: &[&Value], top: bool) -> Result<Vec<u8>, Error> {
        let greedy_tail = top && self.greedy_tail();
        let last = self.codecs.len().saturating_sub(1);

        let mut buff = Vec::new();
        for (index, (codec, value)) in self.codecs.iter().zip(values).enumerate() {
            if greedy_tail && index == last {
                buff.extend(codec.encode_top(value)?);
            } else {
                buff.extend(codec.encode_nested(value)?);
            }
        }
        Ok(buff)
    }

    fn decode_nested(&self, reader: &mut Reader) -> Result<Vec<Value>, Error> {
        self.codecs.iter().map(|codec| codec.decode_nested(reader)).collect()
    }

    fn decode_top(&self, bytes: &[u8]) -> Result<Vec<Value>, Error> {
        if !self.greedy_tail() {
            let mut reader = Reader::new(bytes);
            let values = self.decode_nested(&mut reader)?;
            reader.finish()?;
            return Ok(values);
        }

        let (tail, head) = match self.codecs.split_last() {
            Some(split) => split,
            None => return Ok(Vec::new()),
        };
        let mut reader = Reader::new(bytes);
        let mut values = head.iter()
            .map(|codec| codec.decode_nested(&mut reader))
            .collect::<Result<Vec<_>, _>>()?;
        values.push(tail.decode_top(reader.read_to_end())?);
        Ok(values)
    }
}

pub struct TupleCodec {
    fields: Fields,
}

impl TupleCodec {
    pub fn new(codecs: Vec<Box<dyn Codec>>, options: CodecOptions) -> Self {
        Self { fields: Fields { codecs, options } }
    }

    fn items<'a>(&self, value: &'a Value) -> Result<Vec<&'a Value>, Error> {
        match value {
            Value::Tuple(items) => {
                let items = items.iter().collect::<Vec<_>>();
                self.fields.check_count(&self.abi_type(), &items)?;
                Ok(items)
            }
            other => Err(Error::InvalidData(format!("expected {}, got {}", self.abi_type(), other.get_type()))),
        }
    }
}

impl sealed::AbiType for TupleCodec {
    fn abi_type(&self) -> Type {
        Type::Tuple(self.fields.codecs.iter().map(|codec| codec.abi_type()).collect())
    }
}

impl sealed::Encoder for TupleCodec {
    fn encode_nested(&self, value: &Value) -> Result<Vec<u8>, Error> {
        self.fields.encode(&self.items(value)?, false)
    }

    fn encode_top(&self, value: &Value) -> Result<Vec<u8>, Error> {
        self.fields.encode(&self.items(value)?, true)
    }
}

impl sealed::Decoder for TupleCodec {
    fn decode_nested(&self, reader: &mut Reader) -> Result<Value, Error> {
        Ok(Value::Tuple(self.fields.decode_nested(reader)?))
    }

    fn decode_top(&self, bytes: &[u8]) -> Result<Value, Error> {
        Ok(Value::Tuple(self.fields.decode_top(bytes)?))
    }
}

pub struct StructCodec {
    definition: Arc<StructDefinition>,
    fields: Fields,
}

impl StructCodec {
    pub fn new(definition: Arc<StructDefinition>, codecs: Vec<Box<dyn Codec>>, options: CodecOptions) -> Self {
        Self { definition, fields: Fields { codecs, options } }
    }

    fn items<'a>(&self, value: &'a Value) -> Result<Vec<&'a Value>, Error> {
        match value {
            Value::Struct(value) if value.definition() == &self.definition => {
                let items = value.fields().iter().map(|field| &field.value).collect::<Vec<_>>();
                self.fields.check_count(&self.abi_type(), &items)?;
                Ok(items)
            }
            other => Err(Error::InvalidData(format!("expected {}, got {}", self.definition.name, other.get_type()))),
        }
    }

    fn to_value(&self, values: Vec<Value>) -> Result<Value, Error> {
        Ok(Value::Struct(StructValue::from_values(self.definition.clone(), values)?))
    }
}

impl sealed::AbiType for StructCodec {
    fn abi_type(&self) -> Type {
        Type::Struct(self.definition.clone())
    }
}

impl sealed::Encoder for StructCodec {
    fn encode_nested(&self, value: &Value) -> Result<Vec<u8>, Error> {
        self.fields.encode(&self.items(value)?, false)
    }

    fn encode_top(&self, value: &Value) -> Result<Vec<u8>, Error> {
        self.fields.encode(&self.items(value)?, true)
    }
}

impl sealed::Decoder for StructCodec {
    fn decode_nested(&self, reader: &mut Reader) -> Result<Value, Error> {
        let values = self.fields.decode_nested(reader)?;
        self.to_value(values)
    }

    fn decode_top(&self, bytes: &[u8]) -> Result<Value, Error> {
        let values = self.fields.decode_top(bytes)?;
        self.to_value(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{codec_for, ListLengthPolicy};
    use crate::types::FieldDefinition;
    use num_bigint::BigUint;

    fn auction() -> Arc<StructDefinition> {
        Arc::new(StructDefinition::new("Auction", vec![
            FieldDefinition::new("token", "", Type::TokenIdentifier),
            FieldDefinition::new("min_bid", "", Type::BigUint),
            FieldDefinition::new("deadline", "", Type::U64),
            FieldDefinition::new("bids", "", Type::List(Box::new(Type::U8))),
        ]))
    }

    fn auction_value() -> Value {
        Value::Struct(StructValue::from_values(auction(), vec![
            Value::TokenIdentifier("FOO".to_string()),
            Value::BigUint(BigUint::from(0x1234_u32)),
            Value::U64(5),
            Value::list(Type::U8, vec![Value::U8(1), Value::U8(2)]).unwrap(),
        ]).unwrap())
    }

    #[test]
    fn test_struct_codec() {
        let codec = codec_for(&Type::Struct(auction()), &CodecOptions::default()).unwrap();
        let expected = "00000003464f4f\
                        000000021234\
                        0000000000000005\
                        000000020102";

        let encoded = codec.encode_top(&auction_value()).unwrap();
        assert_eq!(hex::encode(&encoded), expected);
        assert_eq!(codec.encode_nested(&auction_value()).unwrap(), encoded);
        assert_eq!(codec.decode_top(&encoded).unwrap(), auction_value());
    }

    #[test]
    fn test_struct_greedy_trailing_list() {
        let options = CodecOptions { trailing_list: ListLengthPolicy::Greedy };
        let codec = codec_for(&Type::Struct(auction()), &options).unwrap();
        let expected = "00000003464f4f\
                        000000021234\
                        0000000000000005\
                        0102";

        let encoded = codec.encode_top(&auction_value()).unwrap();
        assert_eq!(hex::encode(&encoded), expected);
        assert_eq!(codec.decode_top(&encoded).unwrap(), auction_value());

        // Nested form keeps the count.
        assert_eq!(hex::encode(codec.encode_nested(&auction_value()).unwrap()).len(), expected.len() + 8);
    }

    #[test]
    fn test_tuple_codec() {
        let ty = Type::Tuple(vec![Type::U8, Type::Bool, Type::Bytes]);
        let codec = codec_for(&ty, &CodecOptions::default()).unwrap();
        let value = Value::Tuple(vec![Value::U8(3), Value::Boolean(true), Value::Bytes(vec![0xff])]);

        let encoded = codec.encode_top(&value).unwrap();
        assert_eq!(encoded, hex::decode("030100000001ff").unwrap());
        assert_eq!(codec.decode_top(&encoded).unwrap(), value);

        assert!(matches!(codec.decode_top(&hex::decode("030100000001ff00").unwrap()), Err(Error::InvalidData(_))));
        assert!(matches!(
            codec.encode_top(&Value::Tuple(vec![Value::U8(3)])),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_struct_definition_mismatch() {
        let other = Arc::new(StructDefinition::new("Other", vec![FieldDefinition::new("a", "", Type::U8)]));
        let value = Value::Struct(StructValue::from_values(other, vec![Value::U8(1)]).unwrap());
        let codec = codec_for(&Type::Struct(auction()), &CodecOptions::default()).unwrap();
        assert!(matches!(codec.encode_top(&value), Err(Error::InvalidData(_))));
    }
}
