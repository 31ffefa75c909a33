use std::str::FromStr;
use std::sync::Arc;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use num_bigint::{BigInt, BigUint};
use crate::address::ADDRESS_LENGTH;
use crate::types::{EnumDefinition, FieldDefinition, StructDefinition};
use crate::value::{EnumValue, OptionValue, StructValue};
use crate::{Address, EndpointDefinition, Error, Type, Value};

const NO_FIELDS: &NativeArg = &NativeArg::Null;

/// A loosely typed argument, as handed over by the caller before inference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NativeArg {
    Null,
    Bool(bool),
    Number(BigInt),
    Text(String),
    Bytes(Vec<u8>),
    Address(Address),
    List(Vec<NativeArg>),
    /// Named entries, in the order given.
    Object(Vec<(String, NativeArg)>),
    /// An already typed value, passed through when its type matches.
    Typed(Value),
}

impl NativeArg {
    pub fn from_json(json: &serde_json::Value) -> Result<Self, Error> {
        let arg = match json {
            serde_json::Value::Null => NativeArg::Null,
            serde_json::Value::Bool(boolean) => NativeArg::Bool(*boolean),
            serde_json::Value::Number(number) => {
                // Integers only; other numbers keep their literal form and fail inference.
                match (number.as_i64(), number.as_u64()) {
                    (Some(value), _) => NativeArg::Number(BigInt::from(value)),
                    (_, Some(value)) => NativeArg::Number(BigInt::from(value)),
                    _ => NativeArg::Text(number.to_string()),
                }
            }
            serde_json::Value::String(text) => NativeArg::Text(text.clone()),
            serde_json::Value::Array(items) => {
                NativeArg::List(items.iter().map(NativeArg::from_json).collect::<Result<Vec<_>, _>>()?)
            }
            serde_json::Value::Object(entries) => NativeArg::Object(
                entries.iter()
                    .map(|(key, value)| Ok((key.clone(), NativeArg::from_json(value)?)))
                    .collect::<Result<Vec<_>, Error>>()?,
            ),
        };
        Ok(arg)
    }

    pub fn from_hex(data: &str) -> Result<Self, Error> {
        Ok(NativeArg::Bytes(hex::decode(data.trim_start_matches("0x"))?))
    }

    pub fn from_base64(data: &str) -> Result<Self, Error> {
        Ok(NativeArg::Bytes(STANDARD.decode(data)?))
    }

    fn describe(&self) -> &'static str {
        match self {
            NativeArg::Null => "null",
            NativeArg::Bool(_) => "bool",
            NativeArg::Number(_) => "number",
            NativeArg::Text(_) => "text",
            NativeArg::Bytes(_) => "bytes",
            NativeArg::Address(_) => "address",
            NativeArg::List(_) => "list",
            NativeArg::Object(_) => "object",
            NativeArg::Typed(_) => "typed value",
        }
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for NativeArg {
                fn from(value: $ty) -> Self {
                    NativeArg::Number(BigInt::from(value))
                }
            }
        )*
    };
}

impl_from_number!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, BigInt, BigUint);

impl From<bool> for NativeArg {
    fn from(value: bool) -> Self {
        NativeArg::Bool(value)
    }
}

impl From<&str> for NativeArg {
    fn from(value: &str) -> Self {
        NativeArg::Text(value.to_string())
    }
}

impl From<String> for NativeArg {
    fn from(value: String) -> Self {
        NativeArg::Text(value)
    }
}

impl From<Vec<u8>> for NativeArg {
    fn from(value: Vec<u8>) -> Self {
        NativeArg::Bytes(value)
    }
}

impl From<Address> for NativeArg {
    fn from(value: Address) -> Self {
        NativeArg::Address(value)
    }
}

impl From<Value> for NativeArg {
    fn from(value: Value) -> Self {
        NativeArg::Typed(value)
    }
}

impl From<Vec<NativeArg>> for NativeArg {
    fn from(value: Vec<NativeArg>) -> Self {
        NativeArg::List(value)
    }
}

impl<T: Into<NativeArg>> From<Option<T>> for NativeArg {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(NativeArg::Null)
    }
}

/// Position of the argument being converted, for error messages.
struct Parameter<'a> {
    index: usize,
    name: &'a str,
}

impl Parameter<'_> {
    fn mismatch(&self, ty: &Type, arg: &NativeArg) -> Error {
        Error::InvalidArgument(format!(
            "argument #{} ({}): expected {}, got {}",
            self.index,
            self.name,
            ty,
            arg.describe()
        ))
    }

    fn invalid(&self, reason: impl std::fmt::Display) -> Error {
        Error::InvalidArgument(format!("argument #{} ({}): {}", self.index, self.name, reason))
    }
}

/// Infers typed values from native arguments using the endpoint's declared inputs.
#[derive(Copy, Clone, Debug, Default)]
pub struct NativeSerializer;

impl NativeSerializer {
    pub fn new() -> Self {
        Self
    }

    pub fn native_to_typed_values(&self, args: &[NativeArg], endpoint: &EndpointDefinition) -> Result<Vec<Value>, Error> {
        let inputs = &endpoint.inputs;
        let variadic_last = matches!(inputs.last().map(|input| &input.ty), Some(Type::Variadic(_)));

        if !variadic_last && args.len() > inputs.len() {
            return Err(Error::InvalidArgument(format!(
                "endpoint '{}' takes {} arguments, got {}",
                endpoint.name,
                inputs.len(),
                args.len()
            )));
        }

        log::debug!("Inferring {} arguments for endpoint '{}'", args.len(), endpoint.name);

        let mut values = Vec::with_capacity(inputs.len());
        for (index, input) in inputs.iter().enumerate() {
            let parameter = Parameter { index, name: &input.name };

            let value = match (&input.ty, args.get(index)) {
                (Type::Variadic(item), _) if index + 1 == inputs.len() => {
                    let rest = args.get(index..).unwrap_or_default();
                    let items = rest.iter()
                        .map(|arg| self.convert(arg, item, &parameter))
                        .collect::<Result<Vec<_>, _>>()?;
                    Value::variadic(item.as_ref().clone(), items).map_err(|e| parameter.invalid(e))?
                }
                (ty, Some(arg)) => self.convert(arg, ty, &parameter)?,
                (Type::Option(item), None) => Value::option_none(item.as_ref().clone()),
                (Type::Optional(item), None) => Value::optional_none(item.as_ref().clone()),
                (ty, None) => {
                    return Err(Error::InvalidArgument(format!(
                        "endpoint '{}' is missing argument #{} ({}: {})",
                        endpoint.name, index, input.name, ty
                    )))
                }
            };
            values.push(value);
        }

        Ok(values)
    }

    fn convert(&self, arg: &NativeArg, ty: &Type, parameter: &Parameter) -> Result<Value, Error> {
        if let NativeArg::Typed(value) = arg {
            if &value.get_type() == ty {
                return Ok(value.clone());
            }
            return Err(parameter.invalid(format!("expected {}, got typed {}", ty, value.get_type())));
        }

        match ty {
            Type::U8 | Type::U16 | Type::U32 | Type::U64
            | Type::I8 | Type::I16 | Type::I32 | Type::I64
            | Type::BigUint | Type::BigInt => self.convert_number(arg, ty, parameter),
            Type::Bool => match arg {
                NativeArg::Bool(boolean) => Ok(Value::Boolean(*boolean)),
                other => Err(parameter.mismatch(ty, other)),
            },
            Type::Bytes => match arg {
                NativeArg::Text(text) => Ok(Value::bytes_from_utf8(text)),
                NativeArg::Bytes(bytes) => Ok(Value::Bytes(bytes.clone())),
                other => Err(parameter.mismatch(ty, other)),
            },
            Type::String => Ok(Value::String(self.convert_text(arg, ty, parameter)?)),
            Type::TokenIdentifier => Ok(Value::TokenIdentifier(self.convert_text(arg, ty, parameter)?)),
            Type::Address => Ok(Value::Address(self.convert_address(arg, ty, parameter)?)),
            Type::H256 => Ok(Value::H256(*self.convert_address(arg, ty, parameter)?.as_bytes())),
            Type::Nothing => match arg {
                NativeArg::Null => Ok(Value::Nothing),
                other => Err(parameter.mismatch(ty, other)),
            },
            Type::List(item) => {
                let items = self.convert_items(arg, item, None, ty, parameter)?;
                Value::list(item.as_ref().clone(), items).map_err(|e| parameter.invalid(e))
            }
            Type::Variadic(item) => {
                let items = self.convert_items(arg, item, None, ty, parameter)?;
                Value::variadic(item.as_ref().clone(), items).map_err(|e| parameter.invalid(e))
            }
            Type::FixedArray(item, size) => {
                let items = self.convert_items(arg, item, Some(*size), ty, parameter)?;
                Value::fixed_array(item.as_ref().clone(), *size, items).map_err(|e| parameter.invalid(e))
            }
            Type::Tuple(items) => Ok(Value::Tuple(self.convert_sequence(arg, items, ty, parameter)?)),
            Type::MultiValue(items) => Ok(Value::MultiValue(self.convert_sequence(arg, items, ty, parameter)?)),
            Type::Option(item) => Ok(Value::Option(self.convert_option(arg, item, parameter)?)),
            Type::Optional(item) => Ok(Value::Optional(self.convert_option(arg, item, parameter)?)),
            Type::Struct(definition) => self.convert_struct(arg, definition, ty, parameter),
            Type::Enum(definition) => self.convert_enum(arg, definition, ty, parameter),
            Type::Custom(name) => Err(Error::UnsupportedOperation(format!("type '{}' is not resolved", name))),
        }
    }

    fn convert_number(&self, arg: &NativeArg, ty: &Type, parameter: &Parameter) -> Result<Value, Error> {
        let number = match arg {
            NativeArg::Number(number) => number.clone(),
            NativeArg::Text(text) => BigInt::from_str(text.trim())
                .map_err(|_| parameter.invalid(format!("'{}' is not a decimal integer", text)))?,
            other => return Err(parameter.mismatch(ty, other)),
        };
        Value::from_bigint(ty, &number).map_err(|e| parameter.invalid(e))
    }

    fn convert_text(&self, arg: &NativeArg, ty: &Type, parameter: &Parameter) -> Result<String, Error> {
        match arg {
            NativeArg::Text(text) => Ok(text.clone()),
            NativeArg::Bytes(bytes) => String::from_utf8(bytes.clone())
                .map_err(|_| parameter.invalid("bytes are not UTF-8")),
            other => Err(parameter.mismatch(ty, other)),
        }
    }

    fn convert_address(&self, arg: &NativeArg, ty: &Type, parameter: &Parameter) -> Result<Address, Error> {
        match arg {
            NativeArg::Address(address) => Ok(*address),
            NativeArg::Bytes(bytes) if bytes.len() == ADDRESS_LENGTH => {
                Address::from_slice(bytes).map_err(|e| parameter.invalid(e))
            }
            NativeArg::Text(text) if text.trim_start_matches("0x").len() == ADDRESS_LENGTH * 2 => {
                Address::from_hex(text).map_err(|e| parameter.invalid(e))
            }
            other => Err(parameter.mismatch(ty, other)),
        }
    }

    fn convert_items(
        &self,
        arg: &NativeArg,
        item: &Type,
        size: Option<usize>,
        ty: &Type,
        parameter: &Parameter,
    ) -> Result<Vec<Value>, Error> {
        let args = match arg {
            NativeArg::List(args) => args,
            other => return Err(parameter.mismatch(ty, other)),
        };
        if let Some(size) = size {
            if args.len() != size {
                return Err(parameter.invalid(format!("{} expects {} items, got {}", ty, size, args.len())));
            }
        }
        args.iter().map(|arg| self.convert(arg, item, parameter)).collect()
    }

    fn convert_sequence(&self, arg: &NativeArg, items: &[Type], ty: &Type, parameter: &Parameter) -> Result<Vec<Value>, Error> {
        let args = match arg {
            NativeArg::List(args) if args.len() == items.len() => args,
            NativeArg::List(args) => {
                return Err(parameter.invalid(format!("{} expects {} members, got {}", ty, items.len(), args.len())))
            }
            other => return Err(parameter.mismatch(ty, other)),
        };
        args.iter().zip(items).map(|(arg, item)| self.convert(arg, item, parameter)).collect()
    }

    fn convert_option(&self, arg: &NativeArg, item: &Type, parameter: &Parameter) -> Result<OptionValue, Error> {
        match arg {
            NativeArg::Null => Ok(OptionValue::none(item.clone())),
            other => {
                let value = self.convert(other, item, parameter)?;
                OptionValue::new(item.clone(), Some(value)).map_err(|e| parameter.invalid(e))
            }
        }
    }

    /// Field values from an object keyed by field name, or from a positional list.
    fn convert_fields(
        &self,
        arg: &NativeArg,
        owner: &str,
        fields: &[FieldDefinition],
        parameter: &Parameter,
    ) -> Result<Vec<Value>, Error> {
        match arg {
            NativeArg::Object(entries) => {
                if let Some((unknown, _)) = entries.iter().find(|(key, _)| !fields.iter().any(|f| &f.name == key)) {
                    return Err(parameter.invalid(format!("{} has no field '{}'", owner, unknown)));
                }
                fields.iter()
                    .map(|field| {
                        let (_, value) = entries.iter().find(|(key, _)| key == &field.name)
                            .ok_or_else(|| parameter.invalid(format!("missing field '{}' of {}", field.name, owner)))?;
                        self.convert(value, &field.ty, parameter)
                    })
                    .collect()
            }
            NativeArg::List(args) if args.len() == fields.len() => {
                args.iter().zip(fields).map(|(arg, field)| self.convert(arg, &field.ty, parameter)).collect()
            }
            NativeArg::Null if fields.is_empty() => Ok(Vec::new()),
            other => Err(parameter.invalid(format!("expected fields of {}, got {}", owner, other.describe()))),
        }
    }

    fn convert_struct(&self, arg: &NativeArg, definition: &Arc<StructDefinition>, ty: &Type, parameter: &Parameter) -> Result<Value, Error> {
        if !matches!(arg, NativeArg::Object(_) | NativeArg::List(_)) {
            return Err(parameter.mismatch(ty, arg));
        }
        let values = self.convert_fields(arg, &definition.name, &definition.fields, parameter)?;
        let value = StructValue::from_values(definition.clone(), values).map_err(|e| parameter.invalid(e))?;
        Ok(Value::Struct(value))
    }

    fn convert_enum(&self, arg: &NativeArg, definition: &Arc<EnumDefinition>, ty: &Type, parameter: &Parameter) -> Result<Value, Error> {
        let (variant, fields) = match arg {
            NativeArg::Text(name) => (definition.variant_by_name(name), NO_FIELDS),
            NativeArg::Number(number) => {
                let discriminant = u8::try_from(number)
                    .map_err(|_| parameter.invalid(format!("{} is not a discriminant of {}", number, definition.name)))?;
                (definition.variant_by_discriminant(discriminant), NO_FIELDS)
            }
            NativeArg::Object(entries) if entries.len() == 1 => {
                let (name, fields) = &entries[0];
                (definition.variant_by_name(name), fields)
            }
            other => return Err(parameter.mismatch(ty, other)),
        };

        let variant = variant.ok_or_else(|| parameter.invalid(format!("no such variant of {}", definition.name)))?;
        let owner = format!("{}::{}", definition.name, variant.name);
        let values = self.convert_fields(fields, &owner, &variant.fields, parameter)?;
        let value = EnumValue::from_discriminant(definition.clone(), variant.discriminant, values)
            .map_err(|e| parameter.invalid(e))?;
        Ok(Value::Enum(value))
    }
}
