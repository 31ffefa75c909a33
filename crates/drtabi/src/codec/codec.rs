use crate::codec::*;
use crate::{Error, Type, Value};

pub(crate) mod sealed {
    use crate::codec::Reader;
    use crate::{Error, Type, Value};

    pub trait AbiType {
        fn abi_type(&self) -> Type;
    }

    pub trait Encoder: AbiType {
        /// Encoding of a value embedded in a composite.
        fn encode_nested(&self, value: &Value) -> Result<Vec<u8>, Error>;

        /// Encoding of a value occupying its own argument.
        fn encode_top(&self, value: &Value) -> Result<Vec<u8>, Error> {
            self.encode_nested(value)
        }
    }

    pub trait Decoder: AbiType {
        fn decode_nested(&self, reader: &mut Reader) -> Result<Value, Error>;

        fn decode_top(&self, bytes: &[u8]) -> Result<Value, Error> {
            let mut reader = Reader::new(bytes);
            let value = self.decode_nested(&mut reader)?;
            reader.finish()?;
            Ok(value)
        }
    }
}

pub(crate) trait Codec: sealed::Encoder + sealed::Decoder + Send + Sync {}

impl<T: sealed::Encoder + sealed::Decoder + Send + Sync> Codec for T {}

pub(crate) fn length_prefix(length: usize) -> Result<[u8; 4], Error> {
    let length = u32::try_from(length)
        .map_err(|_| Error::InvalidValue(format!("length {} does not fit in 4 bytes", length)))?;
    Ok(length.to_be_bytes())
}

pub(crate) fn codec_for(ty: &Type, options: &CodecOptions) -> Result<Box<dyn Codec>, Error> {
    let codec: Box<dyn Codec> = match ty {
        Type::U8 => Box::new(UIntCodec::new(1)),
        Type::U16 => Box::new(UIntCodec::new(2)),
        Type::U32 => Box::new(UIntCodec::new(4)),
        Type::U64 => Box::new(UIntCodec::new(8)),
        Type::I8 => Box::new(IntCodec::new(1)),
        Type::I16 => Box::new(IntCodec::new(2)),
        Type::I32 => Box::new(IntCodec::new(4)),
        Type::I64 => Box::new(IntCodec::new(8)),
        Type::BigUint => Box::new(BigUintCodec),
        Type::BigInt => Box::new(BigIntCodec),
        Type::Bool => Box::new(BooleanCodec),
        Type::Bytes => Box::new(BytesCodec::new(BytesKind::Bytes)),
        Type::String => Box::new(BytesCodec::new(BytesKind::String)),
        Type::TokenIdentifier => Box::new(BytesCodec::new(BytesKind::TokenIdentifier)),
        Type::Address => Box::new(AddressCodec),
        Type::H256 => Box::new(H256Codec),
        Type::Nothing => Box::new(NothingCodec),
        Type::List(item) => Box::new(ListCodec::new(item.as_ref().clone(), codec_for(item, options)?)),
        Type::Option(item) => Box::new(OptionCodec::new(item.as_ref().clone(), codec_for(item, options)?)),
        Type::FixedArray(item, size) => {
            Box::new(FixedArrayCodec::new(item.as_ref().clone(), *size, codec_for(item, options)?))
        }
        Type::Tuple(items) => {
            let codecs = items.iter().map(|item| codec_for(item, options)).collect::<Result<Vec<_>, _>>()?;
            Box::new(TupleCodec::new(codecs, *options))
        }
        Type::Struct(definition) => {
            let codecs = definition.fields.iter()
                .map(|field| codec_for(&field.ty, options))
                .collect::<Result<Vec<_>, _>>()?;
            Box::new(StructCodec::new(definition.clone(), codecs, *options))
        }
        Type::Enum(definition) => {
            let variants = definition.variants.iter()
                .map(|variant| {
                    variant.fields.iter().map(|field| codec_for(&field.ty, options)).collect::<Result<Vec<_>, _>>()
                })
                .collect::<Result<Vec<_>, _>>()?;
            Box::new(EnumCodec::new(definition.clone(), variants))
        }
        Type::Optional(_) | Type::MultiValue(_) | Type::Variadic(_) => {
            return Err(Error::UnsupportedOperation(format!(
                "{} spans several arguments and has no binary form",
                ty
            )))
        }
        Type::Custom(name) => {
            return Err(Error::UnsupportedOperation(format!("type '{}' is not resolved", name)))
        }
    };
    Ok(codec)
}

/// Encodes and decodes values in top-level and nested form.
#[derive(Copy, Clone, Debug, Default)]
pub struct BinaryCodec {
    options: CodecOptions,
}

impl BinaryCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    pub fn encode_nested(&self, value: &Value) -> Result<Vec<u8>, Error> {
        codec_for(&value.get_type(), &self.options)?.encode_nested(value)
    }

    pub fn encode_top(&self, value: &Value) -> Result<Vec<u8>, Error> {
        codec_for(&value.get_type(), &self.options)?.encode_top(value)
    }

    /// Decodes one nested value from the start of `bytes`, returning it with the
    /// number of bytes consumed.
    pub fn decode_nested(&self, bytes: &[u8], ty: &Type) -> Result<(Value, usize), Error> {
        let codec = codec_for(ty, &self.options)?;
        let mut reader = Reader::new(bytes);
        let value = codec.decode_nested(&mut reader)?;
        Ok((value, reader.position()))
    }

    pub fn decode_top(&self, bytes: &[u8], ty: &Type) -> Result<Value, Error> {
        codec_for(ty, &self.options)?.decode_top(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::{BigInt, BigUint};

    #[test]
    fn test_zero_values_encode_to_empty_top() {
        let codec = BinaryCodec::new();
        assert_eq!(codec.encode_top(&Value::U32(0)).unwrap(), Vec::<u8>::new());
        assert_eq!(codec.encode_top(&Value::Boolean(false)).unwrap(), Vec::<u8>::new());
        assert_eq!(codec.encode_top(&Value::Bytes(vec![])).unwrap(), Vec::<u8>::new());
        assert_eq!(codec.encode_top(&Value::String(String::new())).unwrap(), Vec::<u8>::new());
        assert_eq!(codec.encode_top(&Value::BigUint(BigUint::from(0_u8))).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_empty_top_needs_expected_type() {
        let codec = BinaryCodec::new();
        assert_eq!(codec.decode_top(&[], &Type::U32).unwrap(), Value::U32(0));
        assert_eq!(codec.decode_top(&[], &Type::Bool).unwrap(), Value::Boolean(false));
        assert_eq!(codec.decode_top(&[], &Type::Bytes).unwrap(), Value::Bytes(vec![]));
        assert_eq!(codec.decode_top(&[], &Type::BigInt).unwrap(), Value::BigInt(BigInt::from(0)));
    }

    #[test]
    fn test_option_nested() {
        let codec = BinaryCodec::new();
        assert_eq!(codec.encode_nested(&Value::option_none(Type::U32)).unwrap(), vec![0x00]);
        assert_eq!(
            codec.encode_nested(&Value::option_some(Value::U32(5))).unwrap(),
            vec![0x01, 0x00, 0x00, 0x00, 0x05]
        );
    }

    #[test]
    fn test_decode_nested_reports_consumed() {
        let codec = BinaryCodec::new();
        let bytes = hex::decode("0000000a0000000b").unwrap();
        let (value, consumed) = codec.decode_nested(&bytes, &Type::U32).unwrap();
        assert_eq!(value, Value::U32(10));
        assert_eq!(consumed, 4);
    }

    #[test]
    fn test_nested_round_trip_of_every_type() {
        use std::sync::Arc;
        use crate::types::{EnumDefinition, EnumVariantDefinition, FieldDefinition, StructDefinition};
        use crate::value::{EnumValue, Field, StructValue};
        use crate::Address;

        let status = Arc::new(EnumDefinition::new("Status", vec![
            EnumVariantDefinition::new("Idle", 0, vec![]),
            EnumVariantDefinition::new("Bid", 1, vec![
                FieldDefinition::new("amount", "", Type::BigInt),
                FieldDefinition::new("bidder", "", Type::Address),
            ]),
        ]));
        let bid = |amount: i64| {
            Value::Enum(EnumValue::new(status.clone(), "Bid", vec![
                Field::new("amount", Value::BigInt(BigInt::from(amount))),
                Field::new("bidder", Value::Address(Address::new([7; 32]))),
            ]).unwrap())
        };
        let idle = Value::Enum(EnumValue::new(status.clone(), "Idle", vec![]).unwrap());
        let status_type = Type::Enum(status.clone());

        let point = Arc::new(StructDefinition::new("Point", vec![
            FieldDefinition::new("x", "", Type::I16),
            FieldDefinition::new("label", "", Type::String),
            FieldDefinition::new("tags", "", Type::List(Box::new(Type::U8))),
        ]));
        let point_value = Value::Struct(StructValue::from_values(point.clone(), vec![
            Value::I16(-3),
            Value::String("origin".to_string()),
            Value::list(Type::U8, vec![Value::U8(1), Value::U8(0)]).unwrap(),
        ]).unwrap());

        let values = vec![
            Value::U8(0xff),
            Value::U16(0),
            Value::U32(70_000),
            Value::U64(u64::MAX),
            Value::I8(-128),
            Value::I16(-1),
            Value::I32(-70_000),
            Value::I64(i64::MIN),
            Value::BigUint(BigUint::from(10_000_000_000_000_000_000_u64)),
            Value::BigInt(BigInt::from(-129)),
            Value::BigInt(BigInt::from(-10_000_000_000_i64)),
            Value::Boolean(true),
            Value::Bytes(vec![0, 1, 2]),
            Value::String("héllo".to_string()),
            Value::TokenIdentifier("FOO-abcdef".to_string()),
            Value::Address(Address::new([1; 32])),
            Value::h256(&[0xab; 32]).unwrap(),
            Value::Nothing,
            Value::list(Type::BigInt, vec![
                Value::BigInt(BigInt::from(-1)),
                Value::BigInt(BigInt::from(0)),
            ]).unwrap(),
            Value::fixed_array(Type::I8, 2, vec![Value::I8(-5), Value::I8(5)]).unwrap(),
            Value::option_some(Value::BigInt(BigInt::from(-256))),
            Value::option_none(Type::Bytes),
            Value::Tuple(vec![Value::U8(1), Value::list(Type::U16, vec![Value::U16(2)]).unwrap()]),
            point_value,
            idle.clone(),
            bid(-42),
            Value::list(status_type.clone(), vec![bid(-1), idle, bid(1_000_000)]).unwrap(),
            Value::option_some(bid(-7)),
            Value::option_none(status_type),
        ];

        let codec = BinaryCodec::new();
        for value in values {
            let ty = value.get_type();
            let mut encoded = codec.encode_nested(&value).unwrap();
            encoded.push(0xee);
            let (decoded, consumed) = codec.decode_nested(&encoded, &ty).unwrap();
            assert_eq!(decoded, value, "nested round trip of {}", ty);
            assert_eq!(consumed, encoded.len() - 1, "bytes consumed by {}", ty);
        }
    }

    #[test]
    fn test_multi_value_types_have_no_binary_form() {
        let codec = BinaryCodec::new();
        let variadic = Type::Variadic(Box::new(Type::U8));
        assert!(matches!(codec.decode_top(&[1], &variadic), Err(Error::UnsupportedOperation(_))));
        assert!(matches!(
            codec.decode_nested(&[1], &Type::Custom("Unknown".to_string())),
            Err(Error::UnsupportedOperation(_))
        ));
        assert!(matches!(
            codec.encode_nested(&Value::optional_some(Value::U8(1))),
            Err(Error::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_insufficient_bytes() {
        let codec = BinaryCodec::new();
        assert_eq!(
            codec.decode_nested(&[0, 0, 1], &Type::U32).err(),
            Some(Error::InsufficientBytes { needed: 4, available: 3 })
        );
        assert_eq!(
            codec.decode_nested(&hex::decode("0000000501").unwrap(), &Type::Bytes).err(),
            Some(Error::InsufficientBytes { needed: 5, available: 1 })
        );
    }
}
