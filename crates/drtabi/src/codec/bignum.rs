use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use crate::codec::{sealed, length_prefix, Reader};
use crate::codec::integer::trim_signed;
use crate::{Error, Type, Value};

fn unsigned_payload(value: &BigUint) -> Vec<u8> {
    if value.is_zero() {
        return Vec::new();
    }
    value.to_bytes_be()
}

fn signed_payload(value: &BigInt) -> Vec<u8> {
    trim_signed(&value.to_signed_bytes_be()).to_vec()
}

fn signed_from_payload(payload: &[u8]) -> BigInt {
    if payload.is_empty() {
        return BigInt::zero();
    }
    BigInt::from_signed_bytes_be(payload)
}

fn with_length(payload: Vec<u8>) -> Result<Vec<u8>, Error> {
    let mut buff = Vec::with_capacity(4 + payload.len());
    buff.extend_from_slice(&length_prefix(payload.len())?);
    buff.extend(payload);
    Ok(buff)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BigUintCodec;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BigIntCodec;

impl sealed::AbiType for BigUintCodec {
    fn abi_type(&self) -> Type {
        Type::BigUint
    }
}

impl sealed::AbiType for BigIntCodec {
    fn abi_type(&self) -> Type {
        Type::BigInt
    }
}

impl sealed::Encoder for BigUintCodec {
    fn encode_nested(&self, value: &Value) -> Result<Vec<u8>, Error> {
        with_length(unsigned_payload(&value.as_biguint()?))
    }

    fn encode_top(&self, value: &Value) -> Result<Vec<u8>, Error> {
        Ok(unsigned_payload(&value.as_biguint()?))
    }
}

impl sealed::Decoder for BigUintCodec {
    fn decode_nested(&self, reader: &mut Reader) -> Result<Value, Error> {
        let length = reader.read_length()?;
        let payload = reader.read(length)?;
        Ok(Value::BigUint(BigUint::from_bytes_be(payload)))
    }

    fn decode_top(&self, bytes: &[u8]) -> Result<Value, Error> {
        Ok(Value::BigUint(BigUint::from_bytes_be(bytes)))
    }
}

impl sealed::Encoder for BigIntCodec {
    fn encode_nested(&self, value: &Value) -> Result<Vec<u8>, Error> {
        with_length(signed_payload(&value.as_bigint()?))
    }

    fn encode_top(&self, value: &Value) -> Result<Vec<u8>, Error> {
        Ok(signed_payload(&value.as_bigint()?))
    }
}

impl sealed::Decoder for BigIntCodec {
    fn decode_nested(&self, reader: &mut Reader) -> Result<Value, Error> {
        let length = reader.read_length()?;
        let payload = reader.read(length)?;
        Ok(Value::BigInt(signed_from_payload(payload)))
    }

    fn decode_top(&self, bytes: &[u8]) -> Result<Value, Error> {
        Ok(Value::BigInt(signed_from_payload(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::sealed::{Decoder, Encoder};

    #[test]
    fn test_biguint_encoder() {
        let value = Value::BigUint(BigUint::from(0xFEEDFACE_u32));
        assert_eq!(BigUintCodec.encode_top(&value).unwrap(), hex::decode("FEEDFACE").unwrap());
        assert_eq!(BigUintCodec.encode_nested(&value).unwrap(), hex::decode("00000004FEEDFACE").unwrap());

        let zero = Value::BigUint(BigUint::zero());
        assert_eq!(BigUintCodec.encode_top(&zero).unwrap(), Vec::<u8>::new());
        assert_eq!(BigUintCodec.encode_nested(&zero).unwrap(), hex::decode("00000000").unwrap());
    }

    #[test]
    fn test_biguint_decoder() {
        let bytes = hex::decode("000000020100FF").unwrap();
        let mut reader = Reader::new(&bytes);
        assert_eq!(BigUintCodec.decode_nested(&mut reader).unwrap(), Value::BigUint(BigUint::from(256_u32)));
        assert_eq!(reader.remaining(), 1);

        assert_eq!(
            BigUintCodec.decode_top(&hex::decode("8ac7230489e80000").unwrap()).unwrap(),
            Value::BigUint(BigUint::from(10_000_000_000_000_000_000_u64))
        );
    }

    #[test]
    fn test_bigint_encoder() {
        let cases: &[(i64, &str)] = &[
            (0, ""),
            (1, "01"),
            (-1, "ff"),
            (127, "7f"),
            (128, "0080"),
            (-128, "80"),
            (-129, "ff7f"),
            (255, "00ff"),
            (-256, "ff00"),
        ];

        for (number, expected) in cases {
            let value = Value::BigInt(BigInt::from(*number));
            assert_eq!(hex::encode(BigIntCodec.encode_top(&value).unwrap()), *expected, "top of {}", number);

            let nested = hex::encode(BigIntCodec.encode_nested(&value).unwrap());
            assert_eq!(nested, format!("{:08x}{}", expected.len() / 2, expected), "nested of {}", number);

            assert_eq!(BigIntCodec.decode_top(&hex::decode(expected).unwrap()).unwrap(), value);

            let nested = hex::decode(nested).unwrap();
            let mut reader = Reader::new(&nested);
            assert_eq!(BigIntCodec.decode_nested(&mut reader).unwrap(), value, "nested decode of {}", number);
            assert!(reader.is_exhausted());
        }
    }

    #[test]
    fn test_bigint_decoder_short_payload() {
        let bytes = hex::decode("00000003FF").unwrap();
        assert_eq!(
            BigIntCodec.decode_nested(&mut Reader::new(&bytes)),
            Err(Error::InsufficientBytes { needed: 3, available: 1 })
        );
    }
}
