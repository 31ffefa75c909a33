use std::sync::Arc;
use crate::codec::{sealed, Codec, Reader};
use crate::types::EnumDefinition;
use crate::value::EnumValue;
use crate::{Error, Type, Value};

/// Enums are a one-byte discriminant followed by the variant's fields.
///
/// At top level a field-less variant is written as a bare integer, so
/// discriminant zero becomes the empty argument.
pub struct EnumCodec {
    definition: Arc<EnumDefinition>,
    variants: Vec<Vec<Box<dyn Codec>>>,
}

impl EnumCodec {
    pub fn new(definition: Arc<EnumDefinition>, variants: Vec<Vec<Box<dyn Codec>>>) -> Self {
        Self { definition, variants }
    }

    fn enum_value<'a>(&self, value: &'a Value) -> Result<&'a EnumValue, Error> {
        match value {
            Value::Enum(value) if value.definition() == &self.definition => Ok(value),
            other => Err(Error::InvalidData(format!("expected {}, got {}", self.definition.name, other.get_type()))),
        }
    }

    fn position(&self, discriminant: u8) -> Result<usize, Error> {
        self.definition.variants.iter()
            .position(|variant| variant.discriminant == discriminant)
            .ok_or_else(|| {
                Error::InvalidData(format!("{} has no variant with discriminant {}", self.definition.name, discriminant))
            })
    }
}

impl sealed::AbiType for EnumCodec {
    fn abi_type(&self) -> Type {
        Type::Enum(self.definition.clone())
    }
}

impl sealed::Encoder for EnumCodec {
    fn encode_nested(&self, value: &Value) -> Result<Vec<u8>, Error> {
        let value = self.enum_value(value)?;
        let codecs = &self.variants[self.position(value.discriminant())?];

        let mut buff = vec![value.discriminant()];
        for (codec, field) in codecs.iter().zip(value.fields()) {
            buff.extend(codec.encode_nested(&field.value)?);
        }
        Ok(buff)
    }

    fn encode_top(&self, value: &Value) -> Result<Vec<u8>, Error> {
        let enum_value = self.enum_value(value)?;
        if enum_value.fields().is_empty() && enum_value.discriminant() == 0 {
            return Ok(Vec::new());
        }
        self.encode_nested(value)
    }
}

impl sealed::Decoder for EnumCodec {
    fn decode_nested(&self, reader: &mut Reader) -> Result<Value, Error> {
        let discriminant = reader.read_u8()?;
        let codecs = &self.variants[self.position(discriminant)?];
        let values = codecs.iter()
            .map(|codec| codec.decode_nested(reader))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Enum(EnumValue::from_discriminant(self.definition.clone(), discriminant, values)?))
    }

    fn decode_top(&self, bytes: &[u8]) -> Result<Value, Error> {
        if bytes.is_empty() {
            return self.decode_nested(&mut Reader::new(&[0]));
        }
        let mut reader = Reader::new(bytes);
        let value = self.decode_nested(&mut reader)?;
        reader.finish()?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{codec_for, CodecOptions};
    use crate::types::{EnumVariantDefinition, FieldDefinition};
    use crate::value::Field;

    fn status() -> Arc<EnumDefinition> {
        Arc::new(EnumDefinition::new("Status", vec![
            EnumVariantDefinition::new("Inactive", 0, vec![]),
            EnumVariantDefinition::new("Running", 1, vec![FieldDefinition::new("0", "", Type::U32)]),
            EnumVariantDefinition::new("Finished", 5, vec![]),
        ]))
    }

    fn codec() -> Box<dyn Codec> {
        codec_for(&Type::Enum(status()), &CodecOptions::default()).unwrap()
    }

    #[test]
    fn test_enum_encoder() {
        let inactive = Value::Enum(EnumValue::new(status(), "Inactive", vec![]).unwrap());
        let running = Value::Enum(EnumValue::new(status(), "Running", vec![Field::new("0", Value::U32(9))]).unwrap());
        let finished = Value::Enum(EnumValue::new(status(), "Finished", vec![]).unwrap());

        assert_eq!(codec().encode_top(&inactive).unwrap(), Vec::<u8>::new());
        assert_eq!(codec().encode_nested(&inactive).unwrap(), vec![0x00]);
        assert_eq!(codec().encode_top(&running).unwrap(), hex::decode("0100000009").unwrap());
        assert_eq!(codec().encode_top(&finished).unwrap(), vec![0x05]);
    }

    #[test]
    fn test_enum_decoder() {
        let inactive = Value::Enum(EnumValue::new(status(), "Inactive", vec![]).unwrap());
        assert_eq!(codec().decode_top(&[]).unwrap(), inactive);

        let running = codec().decode_top(&hex::decode("0100000009").unwrap()).unwrap();
        assert_eq!(running.as_enum().unwrap().name(), "Running");
        assert_eq!(running.as_enum().unwrap().fields()[0].value, Value::U32(9));

        assert!(matches!(codec().decode_top(&[0x02]), Err(Error::InvalidData(_))));
        assert_eq!(
            codec().decode_top(&[0x01, 0x00]).err(),
            Some(Error::InsufficientBytes { needed: 4, available: 1 })
        );
    }
}
