use pest::Parser;
use pest::iterators::Pair;
use crate::grammar::{TypeGrammar, Rule};
use crate::{Error, Type};

/// Parses type expressions such as `List<Option<u64>>` into a [`Type`].
///
/// Identifiers outside the built-in table become [`Type::Custom`] references,
/// to be resolved by the caller against the ABI custom types.
#[derive(Copy, Clone, Debug, Default)]
pub struct TypeExpressionParser;

impl TypeExpressionParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, expression: &str) -> Result<Type, Error> {
        let mut pairs = TypeGrammar::parse(Rule::Expression, expression)
            .map_err(|error| Error::Parse(format!("'{}': {}", expression, error.variant.message())))?;

        let expression_pair = pairs.next().expect("Rule::Expression should match once");
        let ty = expression_pair.into_inner().next()
            .expect("Rule::Expression should have an inner: Rule::Type");

        self.accept_type(ty)
    }

    fn accept_type(&self, pair: Pair<Rule>) -> Result<Type, Error> {
        let mut inner = pair.into_inner();

        let identifier = inner.next().expect("Rule::Type should have an inner: Rule::Identifier");
        let parameters = match inner.next() {
            Some(parameters) => parameters.into_inner()
                .map(|pair| self.accept_type(pair))
                .collect::<Result<Vec<_>, Error>>()?,
            None => Vec::new(),
        };

        let name = identifier.as_str();
        if parameters.is_empty() {
            self.accept_simple(name)
        } else {
            self.accept_generic(name, parameters)
        }
    }

    fn accept_simple(&self, name: &str) -> Result<Type, Error> {
        let ty = match name {
            "u8" => Type::U8,
            "u16" => Type::U16,
            "u32" | "usize" => Type::U32,
            "u64" => Type::U64,
            "i8" => Type::I8,
            "i16" => Type::I16,
            "i32" | "isize" => Type::I32,
            "i64" => Type::I64,
            "BigUint" | "BigUInt" | "biguint" => Type::BigUint,
            "BigInt" | "bigint" => Type::BigInt,
            "bool" => Type::Bool,
            "bytes" | "string" => Type::Bytes,
            "utf-8 string" => Type::String,
            "TokenIdentifier" | "RewaOrDcdtTokenIdentifier" => Type::TokenIdentifier,
            "Address" | "address" => Type::Address,
            "H256" | "hash" => Type::H256,
            "nothing" => Type::Nothing,
            _ if is_generic(name) => {
                return Err(Error::Parse(format!("'{}' requires type parameters", name)))
            }
            _ => Type::Custom(name.to_string()),
        };
        Ok(ty)
    }

    fn accept_generic(&self, name: &str, parameters: Vec<Type>) -> Result<Type, Error> {
        let ty = match name {
            "List" | "Vec" | "vec" => Type::List(Box::new(single(name, parameters)?)),
            "Option" => Type::Option(Box::new(single(name, parameters)?)),
            "optional" | "OptionalValue" | "OptionalResult" => Type::Optional(Box::new(single(name, parameters)?)),
            "variadic" | "VarArgs" | "MultiValueVec" | "MultiResultVec" => {
                Type::Variadic(Box::new(single(name, parameters)?))
            }
            "tuple" => Type::Tuple(parameters),
            "multi" => Type::MultiValue(parameters),
            _ => {
                if let Some(size) = numbered(name, "array") {
                    return Ok(Type::FixedArray(Box::new(single(name, parameters)?), size));
                }
                if let Some(count) = numbered(name, "tuple") {
                    expect_count(name, &parameters, count)?;
                    return Ok(Type::Tuple(parameters));
                }
                if let Some(count) = numbered(name, "MultiValue").or_else(|| numbered(name, "MultiResult")) {
                    expect_count(name, &parameters, count)?;
                    return Ok(Type::MultiValue(parameters));
                }

                return Err(Error::Parse(format!("'{}' does not take type parameters", name)));
            }
        };
        Ok(ty)
    }
}

fn is_generic(name: &str) -> bool {
    matches!(
        name,
        "List" | "Vec" | "vec" | "Option" | "optional" | "OptionalValue" | "OptionalResult"
            | "variadic" | "VarArgs" | "MultiValueVec" | "MultiResultVec" | "tuple" | "multi"
    ) || ["array", "tuple", "MultiValue", "MultiResult"].iter().any(|prefix| numbered(name, prefix).is_some())
}

/// Matches names like `array32` or `tuple2`, returning the trailing number.
fn numbered(name: &str, prefix: &str) -> Option<usize> {
    let digits = name.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn single(name: &str, parameters: Vec<Type>) -> Result<Type, Error> {
    expect_count(name, &parameters, 1)?;
    Ok(parameters.into_iter().next().expect("exactly one parameter"))
}

fn expect_count(name: &str, parameters: &[Type], count: usize) -> Result<(), Error> {
    if parameters.len() != count {
        return Err(Error::Parse(format!(
            "'{}' expects {} type parameter(s), got {}",
            name,
            count,
            parameters.len()
        )));
    }
    Ok(())
}

/// Parses a single type expression.
pub fn parse(expression: &str) -> Result<Type, Error> {
    TypeExpressionParser.parse(expression)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_list() {
        let ty = parse("List<List<u32>>").unwrap();
        assert_eq!(ty, Type::List(Box::new(Type::List(Box::new(Type::U32)))));
    }

    #[test]
    fn test_option_address() {
        let ty = parse("Option<Address>").unwrap();
        assert_eq!(ty, Type::Option(Box::new(Type::Address)));
    }

    #[test]
    fn test_unbalanced_generics() {
        assert!(matches!(parse("List<u32"), Err(Error::Parse(_))));
        assert!(matches!(parse("List<u32>>"), Err(Error::Parse(_))));
        assert!(matches!(parse("List<>"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_trailing_and_malformed() {
        assert!(matches!(parse("u32 u64"), Err(Error::Parse(_))));
        assert!(matches!(parse("u32,"), Err(Error::Parse(_))));
        assert!(matches!(parse(""), Err(Error::Parse(_))));
        assert!(matches!(parse("List<u32; u8>"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_whitespace_is_insignificant() {
        let ty = parse("  multi < u8 ,BigUint , List< bytes > > ").unwrap();
        assert_eq!(
            ty,
            Type::MultiValue(vec![Type::U8, Type::BigUint, Type::List(Box::new(Type::Bytes))])
        );
    }

    #[test]
    fn test_generic_arity() {
        assert!(matches!(parse("Option<u8, u16>"), Err(Error::Parse(_))));
        assert!(matches!(parse("tuple2<u8>"), Err(Error::Parse(_))));
        assert!(matches!(parse("List"), Err(Error::Parse(_))));
        assert!(matches!(parse("u32<u8>"), Err(Error::Parse(_))));
        assert_eq!(
            parse("tuple2<u8, i64>").unwrap(),
            Type::Tuple(vec![Type::U8, Type::I64])
        );
        assert_eq!(
            parse("MultiResult3<u8, bool, Address>").unwrap(),
            Type::MultiValue(vec![Type::U8, Type::Bool, Type::Address])
        );
    }

    #[test]
    fn test_fixed_array() {
        assert_eq!(parse("array32<u8>").unwrap(), Type::FixedArray(Box::new(Type::U8), 32));
        assert_eq!(
            parse("array2<List<u16>>").unwrap(),
            Type::FixedArray(Box::new(Type::List(Box::new(Type::U16))), 2)
        );
    }

    #[test]
    fn test_primitive_table() {
        assert_eq!(parse("usize").unwrap(), Type::U32);
        assert_eq!(parse("isize").unwrap(), Type::I32);
        assert_eq!(parse("biguint").unwrap(), Type::BigUint);
        assert_eq!(parse("string").unwrap(), Type::Bytes);
        assert_eq!(parse("utf-8 string").unwrap(), Type::String);
        assert_eq!(parse("RewaOrDcdtTokenIdentifier").unwrap(), Type::TokenIdentifier);
        assert_eq!(
            parse("variadic<multi<TokenIdentifier,u64,BigUint>>").unwrap(),
            Type::Variadic(Box::new(Type::MultiValue(vec![Type::TokenIdentifier, Type::U64, Type::BigUint])))
        );
    }

    #[test]
    fn test_custom_types_are_references() {
        assert_eq!(parse("Auction").unwrap(), Type::Custom("Auction".to_string()));
        assert_eq!(
            parse("List<module::Status>").unwrap(),
            Type::List(Box::new(Type::Custom("module::Status".to_string())))
        );
        assert!(matches!(parse("Auction<u8>"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_display_round_trip() {
        for expression in ["List<Option<u64>>", "multi<Address, BigUint>", "array4<i16>", "optional<utf-8 string>"] {
            let ty = parse(expression).unwrap();
            assert_eq!(parse(&ty.to_string()).unwrap(), ty);
        }
    }
}
