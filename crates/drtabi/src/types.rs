use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use crate::Error;

/// Table of user-defined types, keyed by the name used in type expressions.
pub type CustomTypes = HashMap<String, Type>;

/// A type declared by a contract ABI.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    BigUint,
    BigInt,
    Bool,
    Bytes,
    String,
    TokenIdentifier,
    Address,
    H256,
    Nothing,
    List(Box<Type>),
    Option(Box<Type>),
    /// Top-level optional argument, may be left out of the argument list.
    Optional(Box<Type>),
    FixedArray(Box<Type>, usize),
    Tuple(Vec<Type>),
    /// Heterogeneous sequence spanning one wire argument per member.
    MultiValue(Vec<Type>),
    /// Open-ended sequence, only allowed as the last parameter.
    Variadic(Box<Type>),
    Struct(Arc<StructDefinition>),
    Enum(Arc<EnumDefinition>),
    /// Reference to a user-defined type not resolved yet.
    Custom(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    List,
    Option,
    Optional,
    FixedArray(usize),
    Tuple,
    MultiValue,
    Variadic,
    Struct,
    Enum,
    Custom,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDefinition {
    pub name: String,
    pub description: String,
    pub ty: Type,
}

impl FieldDefinition {
    pub fn new(name: &str, description: &str, ty: Type) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            ty,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructDefinition {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
}

impl StructDefinition {
    pub fn new(name: &str, fields: Vec<FieldDefinition>) -> Self {
        Self { name: name.to_string(), fields }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumVariantDefinition {
    pub name: String,
    pub discriminant: u8,
    pub fields: Vec<FieldDefinition>,
}

impl EnumVariantDefinition {
    pub fn new(name: &str, discriminant: u8, fields: Vec<FieldDefinition>) -> Self {
        Self { name: name.to_string(), discriminant, fields }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumDefinition {
    pub name: String,
    pub variants: Vec<EnumVariantDefinition>,
}

impl EnumDefinition {
    pub fn new(name: &str, variants: Vec<EnumVariantDefinition>) -> Self {
        Self { name: name.to_string(), variants }
    }

    pub fn variant_by_name(&self, name: &str) -> Option<&EnumVariantDefinition> {
        self.variants.iter().find(|variant| variant.name == name)
    }

    pub fn variant_by_discriminant(&self, discriminant: u8) -> Option<&EnumVariantDefinition> {
        self.variants.iter().find(|variant| variant.discriminant == discriminant)
    }
}

impl Type {
    pub fn name(&self) -> &str {
        match self {
            Type::U8 => "u8",
            Type::U16 => "u16",
            Type::U32 => "u32",
            Type::U64 => "u64",
            Type::I8 => "i8",
            Type::I16 => "i16",
            Type::I32 => "i32",
            Type::I64 => "i64",
            Type::BigUint => "BigUint",
            Type::BigInt => "BigInt",
            Type::Bool => "bool",
            Type::Bytes => "bytes",
            Type::String => "utf-8 string",
            Type::TokenIdentifier => "TokenIdentifier",
            Type::Address => "Address",
            Type::H256 => "H256",
            Type::Nothing => "nothing",
            Type::List(_) => "List",
            Type::Option(_) => "Option",
            Type::Optional(_) => "optional",
            Type::FixedArray(..) => "array",
            Type::Tuple(_) => "tuple",
            Type::MultiValue(_) => "multi",
            Type::Variadic(_) => "variadic",
            Type::Struct(definition) => &definition.name,
            Type::Enum(definition) => &definition.name,
            Type::Custom(name) => name,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Type::List(_) => TypeKind::List,
            Type::Option(_) => TypeKind::Option,
            Type::Optional(_) => TypeKind::Optional,
            Type::FixedArray(_, size) => TypeKind::FixedArray(*size),
            Type::Tuple(_) => TypeKind::Tuple,
            Type::MultiValue(_) => TypeKind::MultiValue,
            Type::Variadic(_) => TypeKind::Variadic,
            Type::Struct(_) => TypeKind::Struct,
            Type::Enum(_) => TypeKind::Enum,
            Type::Custom(_) => TypeKind::Custom,
            _ => TypeKind::Primitive,
        }
    }

    pub fn type_parameters(&self) -> Vec<&Type> {
        match self {
            Type::List(item)
            | Type::Option(item)
            | Type::Optional(item)
            | Type::FixedArray(item, _)
            | Type::Variadic(item) => vec![item.as_ref()],
            Type::Tuple(items) | Type::MultiValue(items) => items.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Width in bytes of fixed-width integers.
    pub fn integer_width(&self) -> Option<usize> {
        match self {
            Type::U8 | Type::I8 => Some(1),
            Type::U16 | Type::I16 => Some(2),
            Type::U32 | Type::I32 => Some(4),
            Type::U64 | Type::I64 => Some(8),
            _ => None,
        }
    }

    pub fn is_multi_value(&self) -> bool {
        matches!(self, Type::Optional(_) | Type::MultiValue(_) | Type::Variadic(_))
    }

    /// Number of wire arguments a value of this type spans.
    ///
    /// `Variadic` spans an open-ended number of arguments; its arity is the arity
    /// of one item, which is the chunk size consumed per item.
    pub fn arity(&self) -> usize {
        match self {
            Type::MultiValue(items) => items.iter().map(Type::arity).sum(),
            Type::Optional(item) | Type::Variadic(item) => item.arity(),
            _ => 1,
        }
    }

    /// Replaces every `Custom` reference by its definition from `types`.
    pub fn resolve(&self, types: &CustomTypes) -> Result<Type, Error> {
        let resolved = match self {
            Type::Custom(name) => types
                .get(name)
                .cloned()
                .ok_or_else(|| Error::Parse(format!("unknown type '{}'", name)))?,
            Type::List(item) => Type::List(Box::new(item.resolve(types)?)),
            Type::Option(item) => Type::Option(Box::new(item.resolve(types)?)),
            Type::Optional(item) => Type::Optional(Box::new(item.resolve(types)?)),
            Type::Variadic(item) => Type::Variadic(Box::new(item.resolve(types)?)),
            Type::FixedArray(item, size) => Type::FixedArray(Box::new(item.resolve(types)?), *size),
            Type::Tuple(items) => Type::Tuple(resolve_all(items, types)?),
            Type::MultiValue(items) => Type::MultiValue(resolve_all(items, types)?),
            other => other.clone(),
        };
        Ok(resolved)
    }

    pub fn is_resolved(&self) -> bool {
        match self {
            Type::Custom(_) => false,
            other => other.type_parameters().into_iter().all(Type::is_resolved),
        }
    }
}

fn resolve_all(items: &[Type], types: &CustomTypes) -> Result<Vec<Type>, Error> {
    items.iter().map(|item| item.resolve(types)).collect()
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::FixedArray(item, size) => write!(f, "array{}<{}>", size, item),
            other => {
                write!(f, "{}", other.name())?;
                let parameters = other.type_parameters();
                if !parameters.is_empty() {
                    let parameters = parameters.iter().map(|ty| ty.to_string()).collect::<Vec<_>>();
                    write!(f, "<{}>", parameters.join(", "))?;
                }
                Ok(())
            }
        }
    }
}
