use crate::codec::{sealed, length_prefix, Reader};
use crate::{Error, Type, Value};

/// Length-prefixed byte sequences differ only by how the payload is interpreted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BytesKind {
    Bytes,
    String,
    TokenIdentifier,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BytesCodec {
    kind: BytesKind,
}

impl BytesCodec {
    pub fn new(kind: BytesKind) -> Self {
        Self { kind }
    }

    fn payload<'a>(&self, value: &'a Value) -> Result<&'a [u8], Error> {
        match (self.kind, value) {
            (BytesKind::Bytes, Value::Bytes(bytes)) => Ok(bytes),
            (BytesKind::String, Value::String(text)) => Ok(text.as_bytes()),
            (BytesKind::TokenIdentifier, Value::TokenIdentifier(identifier)) => Ok(identifier.as_bytes()),
            (_, other) => Err(Error::InvalidData(format!(
                "expected {}, got {}",
                sealed::AbiType::abi_type(self),
                other.get_type()
            ))),
        }
    }

    fn to_value(&self, payload: &[u8]) -> Result<Value, Error> {
        let text = || {
            String::from_utf8(payload.to_vec())
                .map_err(|e| Error::InvalidData(format!("payload is not UTF-8: {}", e)))
        };
        match self.kind {
            BytesKind::Bytes => Ok(Value::Bytes(payload.to_vec())),
            BytesKind::String => Ok(Value::String(text()?)),
            BytesKind::TokenIdentifier => Ok(Value::TokenIdentifier(text()?)),
        }
    }
}

impl sealed::AbiType for BytesCodec {
    fn abi_type(&self) -> Type {
        match self.kind {
            BytesKind::Bytes => Type::Bytes,
            BytesKind::String => Type::String,
            BytesKind::TokenIdentifier => Type::TokenIdentifier,
        }
    }
}

impl sealed::Encoder for BytesCodec {
    fn encode_nested(&self, value: &Value) -> Result<Vec<u8>, Error> {
        let payload = self.payload(value)?;
        let mut buff = Vec::with_capacity(4 + payload.len());
        buff.extend_from_slice(&length_prefix(payload.len())?);
        buff.extend_from_slice(payload);
        Ok(buff)
    }

    fn encode_top(&self, value: &Value) -> Result<Vec<u8>, Error> {
        Ok(self.payload(value)?.to_vec())
    }
}

impl sealed::Decoder for BytesCodec {
    fn decode_nested(&self, reader: &mut Reader) -> Result<Value, Error> {
        let length = reader.read_length()?;
        self.to_value(reader.read(length)?)
    }

    fn decode_top(&self, bytes: &[u8]) -> Result<Value, Error> {
        self.to_value(bytes)
    }
}
