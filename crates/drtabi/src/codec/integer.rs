use crate::codec::{sealed, Reader};
use crate::codec::sealed::AbiType;
use crate::{Error, Type, Value};

/// Strips leading zero bytes, leaving the shortest big-endian form.
pub(crate) fn trim_unsigned(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

/// Strips redundant sign bytes from a two's complement big-endian number.
/// Zero becomes the empty sequence.
pub(crate) fn trim_signed(bytes: &[u8]) -> &[u8] {
    let mut start = 0;
    while start < bytes.len() {
        let next_negative = bytes.get(start + 1).map(|next| next & 0x80 != 0);
        match (bytes[start], next_negative) {
            (0x00, None) | (0x00, Some(false)) | (0xff, Some(true)) => start += 1,
            _ => break,
        }
    }
    &bytes[start..]
}

fn sign_extend(bytes: &[u8]) -> i64 {
    let fill = match bytes.first() {
        Some(&first) if first & 0x80 != 0 => 0xff,
        _ => 0x00,
    };
    let mut buff = [fill; 8];
    buff[8 - bytes.len()..].copy_from_slice(bytes);
    i64::from_be_bytes(buff)
}

fn zero_extend(bytes: &[u8]) -> u64 {
    let mut buff = [0u8; 8];
    buff[8 - bytes.len()..].copy_from_slice(bytes);
    u64::from_be_bytes(buff)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UIntCodec {
    width: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IntCodec {
    width: usize,
}

impl UIntCodec {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    fn to_value(&self, value: u64) -> Value {
        match self.width {
            1 => Value::U8(value as u8),
            2 => Value::U16(value as u16),
            4 => Value::U32(value as u32),
            _ => Value::U64(value),
        }
    }
}

impl IntCodec {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    fn to_value(&self, value: i64) -> Value {
        match self.width {
            1 => Value::I8(value as i8),
            2 => Value::I16(value as i16),
            4 => Value::I32(value as i32),
            _ => Value::I64(value),
        }
    }
}

impl sealed::AbiType for UIntCodec {
    fn abi_type(&self) -> Type {
        self.to_value(0).get_type()
    }
}

impl sealed::AbiType for IntCodec {
    fn abi_type(&self) -> Type {
        self.to_value(0).get_type()
    }
}

impl sealed::Encoder for UIntCodec {
    fn encode_nested(&self, value: &Value) -> Result<Vec<u8>, Error> {
        let bytes = value.as_u64()?.to_be_bytes();
        Ok(bytes[8 - self.width..].to_vec())
    }

    fn encode_top(&self, value: &Value) -> Result<Vec<u8>, Error> {
        let bytes = value.as_u64()?.to_be_bytes();
        Ok(trim_unsigned(&bytes).to_vec())
    }
}

impl sealed::Decoder for UIntCodec {
    fn decode_nested(&self, reader: &mut Reader) -> Result<Value, Error> {
        let frame = reader.read(self.width)?;
        Ok(self.to_value(zero_extend(frame)))
    }

    fn decode_top(&self, bytes: &[u8]) -> Result<Value, Error> {
        let bytes = trim_unsigned(bytes);
        if bytes.len() > self.width {
            return Err(Error::InvalidData(format!("{} bytes do not fit in {}", bytes.len(), self.abi_type())));
        }
        Ok(self.to_value(zero_extend(bytes)))
    }
}

impl sealed::Encoder for IntCodec {
    fn encode_nested(&self, value: &Value) -> Result<Vec<u8>, Error> {
        let bytes = value.as_i64()?.to_be_bytes();
        Ok(bytes[8 - self.width..].to_vec())
    }

    fn encode_top(&self, value: &Value) -> Result<Vec<u8>, Error> {
        let bytes = value.as_i64()?.to_be_bytes();
        Ok(trim_signed(&bytes).to_vec())
    }
}

impl sealed::Decoder for IntCodec {
    fn decode_nested(&self, reader: &mut Reader) -> Result<Value, Error> {
        let frame = reader.read(self.width)?;
        Ok(self.to_value(sign_extend(frame)))
    }

    fn decode_top(&self, bytes: &[u8]) -> Result<Value, Error> {
        let bytes = trim_signed(bytes);
        if bytes.len() > self.width {
            return Err(Error::InvalidData(format!("{} bytes do not fit in {}", bytes.len(), self.abi_type())));
        }
        Ok(self.to_value(sign_extend(bytes)))
    }
}
