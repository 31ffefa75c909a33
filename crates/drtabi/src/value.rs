use std::sync::Arc;
use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;
use crate::types::{EnumDefinition, EnumVariantDefinition, FieldDefinition, StructDefinition};
use crate::{Address, Error, Type};

pub const H256_LENGTH: usize = 32;

/// A concrete value paired with its ABI type.
///
/// Primitive variants can not hold a value outside their type's range. Composite
/// payloads keep their fields private and validate element types when built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    BigUint(BigUint),
    BigInt(BigInt),
    Boolean(bool),
    Address(Address),
    Bytes(Vec<u8>),
    String(String),
    TokenIdentifier(String),
    H256([u8; H256_LENGTH]),
    Nothing,
    List(ListValue),
    FixedArray(ArrayValue),
    Option(OptionValue),
    Optional(OptionValue),
    Tuple(Vec<Value>),
    MultiValue(Vec<Value>),
    Variadic(ListValue),
    Struct(StructValue),
    Enum(EnumValue),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListValue {
    item_type: Type,
    items: Vec<Value>,
}

impl ListValue {
    pub fn new(item_type: Type, items: Vec<Value>) -> Result<Self, Error> {
        check_items(&item_type, &items)?;
        Ok(Self { item_type, items })
    }

    pub fn item_type(&self) -> &Type {
        &self.item_type
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayValue {
    item_type: Type,
    items: Vec<Value>,
}

impl ArrayValue {
    pub fn new(item_type: Type, length: usize, items: Vec<Value>) -> Result<Self, Error> {
        if items.len() != length {
            return Err(Error::InvalidValue(format!(
                "array{}<{}> can not hold {} items",
                length,
                item_type,
                items.len()
            )));
        }
        check_items(&item_type, &items)?;
        Ok(Self { item_type, items })
    }

    pub fn item_type(&self) -> &Type {
        &self.item_type
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn check_items(item_type: &Type, items: &[Value]) -> Result<(), Error> {
    for (index, item) in items.iter().enumerate() {
        let actual = item.get_type();
        if &actual != item_type {
            return Err(Error::InvalidValue(format!(
                "item #{} has type {}, expected {}",
                index, actual, item_type
            )));
        }
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionValue {
    item_type: Type,
    value: Option<Box<Value>>,
}

impl OptionValue {
    pub fn new(item_type: Type, value: Option<Value>) -> Result<Self, Error> {
        if let Some(value) = &value {
            check_items(&item_type, std::slice::from_ref(value))?;
        }
        Ok(Self { item_type, value: value.map(Box::new) })
    }

    pub fn some(value: Value) -> Self {
        Self { item_type: value.get_type(), value: Some(Box::new(value)) }
    }

    pub fn none(item_type: Type) -> Self {
        Self { item_type, value: None }
    }

    pub fn item_type(&self) -> &Type {
        &self.item_type
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

impl Field {
    pub fn new(name: &str, value: Value) -> Self {
        Self { name: name.to_string(), value }
    }
}

fn check_fields(owner: &str, expected: &[FieldDefinition], fields: &[Field]) -> Result<(), Error> {
    if expected.len() != fields.len() {
        return Err(Error::InvalidValue(format!(
            "{} expects {} fields, got {}",
            owner,
            expected.len(),
            fields.len()
        )));
    }

    for (definition, field) in expected.iter().zip(fields) {
        if definition.name != field.name {
            return Err(Error::InvalidValue(format!(
                "{} expects field '{}', got '{}'",
                owner, definition.name, field.name
            )));
        }
        let actual = field.value.get_type();
        if actual != definition.ty {
            return Err(Error::InvalidValue(format!(
                "field '{}' of {} has type {}, expected {}",
                field.name, owner, actual, definition.ty
            )));
        }
    }
    Ok(())
}

fn zip_fields(expected: &[FieldDefinition], values: Vec<Value>) -> Vec<Field> {
    expected.iter().zip(values).map(|(definition, value)| Field::new(&definition.name, value)).collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructValue {
    definition: Arc<StructDefinition>,
    fields: Vec<Field>,
}

impl StructValue {
    pub fn new(definition: Arc<StructDefinition>, fields: Vec<Field>) -> Result<Self, Error> {
        check_fields(&definition.name, &definition.fields, &fields)?;
        Ok(Self { definition, fields })
    }

    /// Builds a struct from field values given in declaration order.
    pub fn from_values(definition: Arc<StructDefinition>, values: Vec<Value>) -> Result<Self, Error> {
        if values.len() != definition.fields.len() {
            return Err(Error::InvalidValue(format!(
                "{} expects {} fields, got {}",
                definition.name,
                definition.fields.len(),
                values.len()
            )));
        }
        let fields = zip_fields(&definition.fields, values);
        Self::new(definition, fields)
    }

    pub fn definition(&self) -> &Arc<StructDefinition> {
        &self.definition
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|field| field.name == name).map(|field| &field.value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValue {
    definition: Arc<EnumDefinition>,
    variant: usize,
    fields: Vec<Field>,
}

impl EnumValue {
    pub fn new(definition: Arc<EnumDefinition>, variant_name: &str, fields: Vec<Field>) -> Result<Self, Error> {
        let variant = definition.variants.iter().position(|variant| variant.name == variant_name)
            .ok_or_else(|| Error::InvalidValue(format!("{} has no variant '{}'", definition.name, variant_name)))?;
        Self::with_variant(definition, variant, fields)
    }

    pub fn from_discriminant(definition: Arc<EnumDefinition>, discriminant: u8, values: Vec<Value>) -> Result<Self, Error> {
        let variant = definition.variants.iter().position(|variant| variant.discriminant == discriminant)
            .ok_or_else(|| Error::InvalidValue(format!("{} has no discriminant {}", definition.name, discriminant)))?;
        let expected = &definition.variants[variant].fields;
        if values.len() != expected.len() {
            return Err(Error::InvalidValue(format!(
                "variant #{} of {} expects {} fields, got {}",
                discriminant,
                definition.name,
                expected.len(),
                values.len()
            )));
        }
        let fields = zip_fields(expected, values);
        Self::with_variant(definition, variant, fields)
    }

    fn with_variant(definition: Arc<EnumDefinition>, variant: usize, fields: Vec<Field>) -> Result<Self, Error> {
        let owner = format!("{}::{}", definition.name, definition.variants[variant].name);
        check_fields(&owner, &definition.variants[variant].fields, &fields)?;
        Ok(Self { definition, variant, fields })
    }

    pub fn definition(&self) -> &Arc<EnumDefinition> {
        &self.definition
    }

    pub fn variant(&self) -> &EnumVariantDefinition {
        &self.definition.variants[self.variant]
    }

    pub fn name(&self) -> &str {
        &self.variant().name
    }

    pub fn discriminant(&self) -> u8 {
        self.variant().discriminant
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

impl Value {
    pub fn get_type(&self) -> Type {
        match self {
            Value::U8(_) => Type::U8,
            Value::U16(_) => Type::U16,
            Value::U32(_) => Type::U32,
            Value::U64(_) => Type::U64,
            Value::I8(_) => Type::I8,
            Value::I16(_) => Type::I16,
            Value::I32(_) => Type::I32,
            Value::I64(_) => Type::I64,
            Value::BigUint(_) => Type::BigUint,
            Value::BigInt(_) => Type::BigInt,
            Value::Boolean(_) => Type::Bool,
            Value::Address(_) => Type::Address,
            Value::Bytes(_) => Type::Bytes,
            Value::String(_) => Type::String,
            Value::TokenIdentifier(_) => Type::TokenIdentifier,
            Value::H256(_) => Type::H256,
            Value::Nothing => Type::Nothing,
            Value::List(list) => Type::List(Box::new(list.item_type.clone())),
            Value::FixedArray(array) => Type::FixedArray(Box::new(array.item_type.clone()), array.len()),
            Value::Option(option) => Type::Option(Box::new(option.item_type.clone())),
            Value::Optional(option) => Type::Optional(Box::new(option.item_type.clone())),
            Value::Tuple(items) => Type::Tuple(items.iter().map(Value::get_type).collect()),
            Value::MultiValue(items) => Type::MultiValue(items.iter().map(Value::get_type).collect()),
            Value::Variadic(list) => Type::Variadic(Box::new(list.item_type.clone())),
            Value::Struct(value) => Type::Struct(value.definition.clone()),
            Value::Enum(value) => Type::Enum(value.definition.clone()),
        }
    }

    /// Builds an unsigned value of the given integer type, rejecting magnitudes
    /// that do not fit.
    pub fn from_biguint(ty: &Type, value: &BigUint) -> Result<Value, Error> {
        Value::from_bigint(ty, &BigInt::from(value.clone()))
    }

    /// Builds a value of the given integer type, rejecting magnitudes that do not fit.
    pub fn from_bigint(ty: &Type, value: &BigInt) -> Result<Value, Error> {
        let out_of_range = || Error::InvalidValue(format!("{} is out of range for {}", value, ty));
        let converted = match ty {
            Type::U8 => Value::U8(value.to_u8().ok_or_else(out_of_range)?),
            Type::U16 => Value::U16(value.to_u16().ok_or_else(out_of_range)?),
            Type::U32 => Value::U32(value.to_u32().ok_or_else(out_of_range)?),
            Type::U64 => Value::U64(value.to_u64().ok_or_else(out_of_range)?),
            Type::I8 => Value::I8(value.to_i8().ok_or_else(out_of_range)?),
            Type::I16 => Value::I16(value.to_i16().ok_or_else(out_of_range)?),
            Type::I32 => Value::I32(value.to_i32().ok_or_else(out_of_range)?),
            Type::I64 => Value::I64(value.to_i64().ok_or_else(out_of_range)?),
            Type::BigUint => Value::BigUint(value.to_biguint().ok_or_else(out_of_range)?),
            Type::BigInt => Value::BigInt(value.clone()),
            other => return Err(Error::InvalidValue(format!("{} is not an integer type", other))),
        };
        Ok(converted)
    }

    pub fn bytes_from_utf8(text: &str) -> Value {
        Value::Bytes(text.as_bytes().to_vec())
    }

    pub fn h256(bytes: &[u8]) -> Result<Value, Error> {
        let hash: [u8; H256_LENGTH] = bytes.try_into().map_err(|_| {
            Error::InvalidValue(format!("H256 must have {} bytes, got {}", H256_LENGTH, bytes.len()))
        })?;
        Ok(Value::H256(hash))
    }

    pub fn list(item_type: Type, items: Vec<Value>) -> Result<Value, Error> {
        Ok(Value::List(ListValue::new(item_type, items)?))
    }

    pub fn variadic(item_type: Type, items: Vec<Value>) -> Result<Value, Error> {
        Ok(Value::Variadic(ListValue::new(item_type, items)?))
    }

    pub fn fixed_array(item_type: Type, length: usize, items: Vec<Value>) -> Result<Value, Error> {
        Ok(Value::FixedArray(ArrayValue::new(item_type, length, items)?))
    }

    pub fn option_some(value: Value) -> Value {
        Value::Option(OptionValue::some(value))
    }

    pub fn option_none(item_type: Type) -> Value {
        Value::Option(OptionValue::none(item_type))
    }

    pub fn optional_some(value: Value) -> Value {
        Value::Optional(OptionValue::some(value))
    }

    pub fn optional_none(item_type: Type) -> Value {
        Value::Optional(OptionValue::none(item_type))
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::InvalidData(format!("expected {}, got {}", expected, self.get_type()))
    }

    pub fn as_u64(&self) -> Result<u64, Error> {
        match self {
            Value::U8(value) => Ok(*value as u64),
            Value::U16(value) => Ok(*value as u64),
            Value::U32(value) => Ok(*value as u64),
            Value::U64(value) => Ok(*value),
            _ => Err(self.mismatch("unsigned integer")),
        }
    }

    pub fn as_i64(&self) -> Result<i64, Error> {
        match self {
            Value::I8(value) => Ok(*value as i64),
            Value::I16(value) => Ok(*value as i64),
            Value::I32(value) => Ok(*value as i64),
            Value::I64(value) => Ok(*value),
            _ => Err(self.mismatch("signed integer")),
        }
    }

    pub fn as_biguint(&self) -> Result<BigUint, Error> {
        match self {
            Value::BigUint(value) => Ok(value.clone()),
            other => other.as_u64().map(BigUint::from).map_err(|_| other.mismatch("BigUint")),
        }
    }

    pub fn as_bigint(&self) -> Result<BigInt, Error> {
        match self {
            Value::BigInt(value) => Ok(value.clone()),
            Value::BigUint(value) => Ok(BigInt::from(value.clone())),
            other => other.as_i64().map(BigInt::from)
                .or_else(|_| other.as_u64().map(BigInt::from))
                .map_err(|_| other.mismatch("BigInt")),
        }
    }

    pub fn as_boolean(&self) -> Result<bool, Error> {
        match self {
            Value::Boolean(boolean) => Ok(*boolean),
            _ => Err(self.mismatch("bool")),
        }
    }

    pub fn as_address(&self) -> Result<&Address, Error> {
        match self {
            Value::Address(address) => Ok(address),
            _ => Err(self.mismatch("Address")),
        }
    }

    pub fn as_bytes(&self) -> Result<&[u8], Error> {
        match self {
            Value::Bytes(bytes) => Ok(bytes),
            Value::String(string) | Value::TokenIdentifier(string) => Ok(string.as_bytes()),
            Value::Address(address) => Ok(address.as_bytes()),
            Value::H256(hash) => Ok(hash),
            _ => Err(self.mismatch("bytes")),
        }
    }

    pub fn as_str(&self) -> Result<&str, Error> {
        match self {
            Value::String(string) | Value::TokenIdentifier(string) => Ok(string),
            _ => Err(self.mismatch("string")),
        }
    }

    pub fn as_list(&self) -> Result<&[Value], Error> {
        match self {
            Value::List(list) | Value::Variadic(list) => Ok(list.items()),
            Value::FixedArray(array) => Ok(array.items()),
            _ => Err(self.mismatch("List")),
        }
    }

    pub fn as_option(&self) -> Result<Option<&Value>, Error> {
        match self {
            Value::Option(option) | Value::Optional(option) => Ok(option.value()),
            _ => Err(self.mismatch("Option")),
        }
    }

    pub fn as_tuple(&self) -> Result<&[Value], Error> {
        match self {
            Value::Tuple(items) | Value::MultiValue(items) => Ok(items),
            _ => Err(self.mismatch("tuple")),
        }
    }

    pub fn as_struct(&self) -> Result<&StructValue, Error> {
        match self {
            Value::Struct(value) => Ok(value),
            _ => Err(self.mismatch("struct")),
        }
    }

    pub fn as_enum(&self) -> Result<&EnumValue, Error> {
        match self {
            Value::Enum(value) => Ok(value),
            _ => Err(self.mismatch("enum")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldDefinition;

    fn point() -> Arc<StructDefinition> {
        Arc::new(StructDefinition::new("Point", vec![
            FieldDefinition::new("x", "", Type::I32),
            FieldDefinition::new("y", "", Type::I32),
        ]))
    }

    #[test]
    fn test_fixed_width_range() {
        assert_eq!(Value::from_biguint(&Type::U8, &255_u32.into()).unwrap(), Value::U8(255));
        assert!(matches!(Value::from_biguint(&Type::U8, &256_u32.into()), Err(Error::InvalidValue(_))));
        assert!(matches!(Value::from_bigint(&Type::U64, &BigInt::from(-1)), Err(Error::InvalidValue(_))));
        assert!(matches!(Value::from_bigint(&Type::BigUint, &BigInt::from(-1)), Err(Error::InvalidValue(_))));
        assert_eq!(Value::from_bigint(&Type::I16, &BigInt::from(-32768)).unwrap(), Value::I16(-32768));
        assert!(matches!(Value::from_bigint(&Type::I16, &BigInt::from(32768)), Err(Error::InvalidValue(_))));
        assert!(matches!(Value::from_bigint(&Type::Bool, &BigInt::from(1)), Err(Error::InvalidValue(_))));
    }

    #[test]
    fn test_fixed_length_bytes() {
        assert!(Value::h256(&[0u8; 32]).is_ok());
        assert!(matches!(Value::h256(&[0u8; 31]), Err(Error::InvalidValue(_))));
        assert!(matches!(
            Value::fixed_array(Type::U8, 4, vec![Value::U8(1), Value::U8(2)]),
            Err(Error::InvalidValue(_))
        ));
        let array = Value::fixed_array(Type::U8, 2, vec![Value::U8(1), Value::U8(2)]).unwrap();
        assert_eq!(array.get_type(), Type::FixedArray(Box::new(Type::U8), 2));
    }

    #[test]
    fn test_list_is_homogeneous() {
        let list = Value::list(Type::U32, vec![Value::U32(1), Value::U32(2)]).unwrap();
        assert_eq!(list.get_type(), Type::List(Box::new(Type::U32)));
        assert_eq!(list.as_list().unwrap().len(), 2);

        assert!(matches!(
            Value::list(Type::U32, vec![Value::U32(1), Value::U64(2)]),
            Err(Error::InvalidValue(_))
        ));
    }

    #[test]
    fn test_option_type() {
        let some = Value::option_some(Value::Boolean(true));
        assert_eq!(some.get_type(), Type::Option(Box::new(Type::Bool)));
        assert_eq!(some.as_option().unwrap(), Some(&Value::Boolean(true)));

        let none = Value::option_none(Type::Address);
        assert_eq!(none.get_type(), Type::Option(Box::new(Type::Address)));
        assert_eq!(none.as_option().unwrap(), None);

        assert!(OptionValue::new(Type::U8, Some(Value::U16(1))).is_err());
    }

    #[test]
    fn test_struct_fields_follow_definition() {
        let value = StructValue::from_values(point(), vec![Value::I32(1), Value::I32(-1)]).unwrap();
        assert_eq!(value.get_field("y"), Some(&Value::I32(-1)));

        let swapped = StructValue::new(point(), vec![Field::new("y", Value::I32(1)), Field::new("x", Value::I32(2))]);
        assert!(matches!(swapped, Err(Error::InvalidValue(_))));

        let wrong_type = StructValue::from_values(point(), vec![Value::I32(1), Value::U32(1)]);
        assert!(matches!(wrong_type, Err(Error::InvalidValue(_))));
    }

    #[test]
    fn test_enum_variants() {
        let status = Arc::new(EnumDefinition::new("Status", vec![
            EnumVariantDefinition::new("Inactive", 0, vec![]),
            EnumVariantDefinition::new("Running", 1, vec![FieldDefinition::new("0", "", Type::U64)]),
        ]));

        let running = EnumValue::from_discriminant(status.clone(), 1, vec![Value::U64(7)]).unwrap();
        assert_eq!(running.name(), "Running");
        assert_eq!(running.fields()[0].value, Value::U64(7));

        assert!(EnumValue::new(status.clone(), "Stopped", vec![]).is_err());
        assert!(EnumValue::new(status, "Running", vec![]).is_err());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::U16(0x0400).as_u64().unwrap(), 1024);
        assert_eq!(Value::U8(7).as_biguint().unwrap(), BigUint::from(7_u8));
        assert_eq!(Value::I8(-3).as_bigint().unwrap(), BigInt::from(-3));
        assert_eq!(Value::bytes_from_utf8("abc").as_bytes().unwrap(), b"abc");
        assert!(matches!(Value::Boolean(true).as_u64(), Err(Error::InvalidData(_))));
    }
}
