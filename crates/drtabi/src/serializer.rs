use crate::codec::BinaryCodec;
use crate::value::{ListValue, OptionValue};
use crate::{CodecOptions, Error, Type, Value};

pub const ARGUMENTS_SEPARATOR: &str = "@";

/// Arguments joined into a single wire string, e.g. `0400@@01`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncodedArguments {
    pub arguments_string: String,
    pub count: usize,
}

/// Converts between typed values and `@`-separated hex argument lists.
///
/// Multi-argument values (`MultiValue`, `Variadic`, `Optional`) are flattened
/// into one wire argument per member. Every other value is encoded top-level
/// into exactly one argument.
#[derive(Copy, Clone, Debug, Default)]
pub struct ArgSerializer {
    codec: BinaryCodec,
}

impl ArgSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CodecOptions) -> Self {
        Self { codec: BinaryCodec::with_options(options) }
    }

    pub fn values_to_buffers(&self, values: &[Value]) -> Result<Vec<Vec<u8>>, Error> {
        let mut buffers = Vec::new();
        for value in values {
            self.flatten(value, &mut buffers)?;
        }
        Ok(buffers)
    }

    fn flatten(&self, value: &Value, buffers: &mut Vec<Vec<u8>>) -> Result<(), Error> {
        match value {
            Value::Optional(option) => {
                if let Some(inner) = option.value() {
                    self.flatten(inner, buffers)?;
                }
            }
            Value::MultiValue(items) => {
                for item in items {
                    self.flatten(item, buffers)?;
                }
            }
            Value::Variadic(list) => {
                for item in list.items() {
                    self.flatten(item, buffers)?;
                }
            }
            other => buffers.push(self.codec.encode_top(other)?),
        }
        Ok(())
    }

    pub fn values_to_strings(&self, values: &[Value]) -> Result<Vec<String>, Error> {
        Ok(self.values_to_buffers(values)?.iter().map(hex::encode).collect())
    }

    pub fn values_to_string(&self, values: &[Value]) -> Result<EncodedArguments, Error> {
        let strings = self.values_to_strings(values)?;
        let encoded = EncodedArguments {
            arguments_string: strings.join(ARGUMENTS_SEPARATOR),
            count: strings.len(),
        };
        log::debug!("Encoded {} values into {} arguments", values.len(), encoded.count);
        Ok(encoded)
    }

    /// Splits a wire string into raw arguments. The empty string is a single
    /// empty argument.
    pub fn string_to_buffers(&self, arguments_string: &str) -> Result<Vec<Vec<u8>>, Error> {
        arguments_string
            .split(ARGUMENTS_SEPARATOR)
            .map(|segment| hex::decode(segment).map_err(Error::from))
            .collect()
    }

    pub fn buffers_to_values(&self, buffers: &[Vec<u8>], types: &[Type]) -> Result<Vec<Value>, Error> {
        self.decode_arguments(Arguments::new(buffers), types)
    }

    fn decode_arguments(&self, mut arguments: Arguments, types: &[Type]) -> Result<Vec<Value>, Error> {
        let values = types.iter()
            .map(|ty| self.decode_argument(&mut arguments, ty))
            .collect::<Result<Vec<_>, _>>()?;

        let leftover = arguments.remaining();
        let lone_empty = types.is_empty() && leftover.len() == 1 && leftover[0].is_empty();
        if !leftover.is_empty() && !lone_empty {
            return Err(Error::InvalidData(format!(
                "{} arguments left over after decoding {} values",
                leftover.len(),
                values.len()
            )));
        }

        log::trace!("Decoded {} arguments into {} values", arguments.position, values.len());
        Ok(values)
    }

    fn decode_argument(&self, arguments: &mut Arguments, ty: &Type) -> Result<Value, Error> {
        match ty {
            Type::Optional(item) => {
                if !arguments.has_more() {
                    return Ok(Value::Optional(OptionValue::none(item.as_ref().clone())));
                }
                let inner = self.decode_argument(arguments, item)?;
                Ok(Value::Optional(OptionValue::new(item.as_ref().clone(), Some(inner))?))
            }
            Type::MultiValue(items) => {
                let values = items.iter()
                    .map(|item| self.decode_argument(arguments, item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::MultiValue(values))
            }
            Type::Variadic(item) => {
                let mut values = Vec::new();
                while arguments.has_more() {
                    values.push(self.decode_argument(arguments, item)?);
                }
                Ok(Value::Variadic(ListValue::new(item.as_ref().clone(), values)?))
            }
            other => {
                let buffer = arguments.next_buffer().ok_or_else(|| Error::MissingArgument(other.to_string()))?;
                self.codec.decode_top(buffer, other)
            }
        }
    }

    /// Decodes a wire string. The empty string carries no arguments for
    /// `Optional` and `Variadic` types, while a single-argument type still
    /// reads it as one empty argument.
    pub fn string_to_values(&self, arguments_string: &str, types: &[Type]) -> Result<Vec<Value>, Error> {
        if arguments_string.is_empty() {
            return self.decode_arguments(Arguments::empty_string(), types);
        }
        let buffers = self.string_to_buffers(arguments_string)?;
        self.buffers_to_values(&buffers, types)
    }
}

/// Cursor over raw arguments.
struct Arguments<'a> {
    buffers: &'a [Vec<u8>],
    position: usize,
    // Set for the empty wire string: one empty argument, handed out only on demand.
    implicit_empty: bool,
}

impl<'a> Arguments<'a> {
    fn new(buffers: &'a [Vec<u8>]) -> Self {
        Self { buffers, position: 0, implicit_empty: false }
    }

    fn empty_string() -> Self {
        Self { buffers: &[], position: 0, implicit_empty: true }
    }

    fn has_more(&self) -> bool {
        self.position < self.buffers.len()
    }

    fn next_buffer(&mut self) -> Option<&'a [u8]> {
        if let Some(buffer) = self.buffers.get(self.position) {
            self.position += 1;
            return Some(buffer.as_slice());
        }
        if self.implicit_empty {
            self.implicit_empty = false;
            self.position += 1;
            return Some(&[]);
        }
        None
    }

    fn remaining(&self) -> &'a [Vec<u8>] {
        self.buffers.get(self.position..).unwrap_or(&[])
    }
}
