use serde::Deserialize;
use crate::{parse, CustomTypes, Error, Type};

const NAME_PLACEHOLDER: &str = "?";
const DESCRIPTION_PLACEHOLDER: &str = "N / A";
const NATIVE_TOKEN: &str = "REWA";
const ANY_TOKEN: &str = "*";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointParameterDefinition {
    pub name: String,
    pub description: String,
    pub ty: Type,
}

impl EndpointParameterDefinition {
    pub fn new(name: &str, description: &str, ty: Type) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            ty,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndpointModifiers {
    pub mutability: String,
    pub payable_in_tokens: Vec<String>,
    pub owner_only: bool,
}

impl EndpointModifiers {
    pub fn new(mutability: &str, payable_in_tokens: &[&str], owner_only: bool) -> Self {
        Self {
            mutability: mutability.to_string(),
            payable_in_tokens: payable_in_tokens.iter().map(|token| token.to_string()).collect(),
            owner_only,
        }
    }

    /// An explicit `!TOKEN` entry wins over the `*` wildcard.
    pub fn is_payable_in_token(&self, token: &str) -> bool {
        let listed = |entry: &str| self.payable_in_tokens.iter().any(|t| t == entry);

        if listed(token) {
            return true;
        }
        if listed(&format!("!{}", token)) {
            return false;
        }
        listed(ANY_TOKEN)
    }

    pub fn is_payable_in_native(&self) -> bool {
        self.is_payable_in_token(NATIVE_TOKEN)
    }

    pub fn is_payable(&self) -> bool {
        !self.payable_in_tokens.is_empty()
    }

    pub fn is_readonly(&self) -> bool {
        self.mutability == "readonly"
    }

    pub fn is_owner_only(&self) -> bool {
        self.owner_only
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointDefinition {
    pub name: String,
    pub inputs: Vec<EndpointParameterDefinition>,
    pub outputs: Vec<EndpointParameterDefinition>,
    pub modifiers: EndpointModifiers,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EndpointJson {
    name: Option<String>,
    #[serde(default)]
    mutability: String,
    #[serde(default)]
    payable_in_tokens: Vec<String>,
    #[serde(default)]
    only_owner: bool,
    #[serde(default)]
    owner_only: bool,
    #[serde(default)]
    inputs: Vec<ParameterJson>,
    #[serde(default)]
    outputs: Vec<ParameterJson>,
}

#[derive(Deserialize)]
struct ParameterJson {
    name: Option<String>,
    description: Option<String>,
    #[serde(rename = "type")]
    ty: String,
}

impl ParameterJson {
    fn into_definition(self) -> Result<EndpointParameterDefinition, Error> {
        Ok(EndpointParameterDefinition {
            ty: parse(&self.ty)?,
            name: self.name.unwrap_or_else(|| NAME_PLACEHOLDER.to_string()),
            description: self.description.unwrap_or_else(|| DESCRIPTION_PLACEHOLDER.to_string()),
        })
    }
}

impl EndpointDefinition {
    pub fn new(
        name: &str,
        inputs: Vec<EndpointParameterDefinition>,
        outputs: Vec<EndpointParameterDefinition>,
        modifiers: EndpointModifiers,
    ) -> Result<Self, Error> {
        let variadic = inputs.iter().position(|input| matches!(input.ty, Type::Variadic(_)));
        if let Some(index) = variadic {
            if index + 1 != inputs.len() {
                return Err(Error::Parse(format!(
                    "variadic parameter '{}' of endpoint '{}' must be the last one",
                    inputs[index].name, name
                )));
            }
        }

        Ok(Self { name: name.to_string(), inputs, outputs, modifiers })
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        let json: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| Error::Parse(format!("endpoint JSON: {}", e)))?;
        Self::from_json_value(json)
    }

    pub fn from_json_value(json: serde_json::Value) -> Result<Self, Error> {
        let raw: EndpointJson = serde_json::from_value(json)
            .map_err(|e| Error::Parse(format!("endpoint JSON: {}", e)))?;

        let inputs = raw.inputs.into_iter()
            .map(ParameterJson::into_definition)
            .collect::<Result<Vec<_>, _>>()?;
        let outputs = raw.outputs.into_iter()
            .map(ParameterJson::into_definition)
            .collect::<Result<Vec<_>, _>>()?;
        let modifiers = EndpointModifiers {
            mutability: raw.mutability,
            payable_in_tokens: raw.payable_in_tokens,
            owner_only: raw.owner_only || raw.only_owner,
        };

        let name = raw.name.unwrap_or_else(|| NAME_PLACEHOLDER.to_string());
        Self::new(&name, inputs, outputs, modifiers)
    }

    pub fn is_constructor(&self) -> bool {
        self.name == "constructor"
    }

    pub fn input_types(&self) -> Vec<Type> {
        self.inputs.iter().map(|input| input.ty.clone()).collect()
    }

    pub fn output_types(&self) -> Vec<Type> {
        self.outputs.iter().map(|output| output.ty.clone()).collect()
    }

    /// Replaces custom type references in every parameter.
    pub fn resolve(&self, types: &CustomTypes) -> Result<Self, Error> {
        let resolve_all = |parameters: &[EndpointParameterDefinition]| {
            parameters.iter()
                .map(|parameter| {
                    let ty = parameter.ty.resolve(types)?;
                    Ok(EndpointParameterDefinition { ty, ..parameter.clone() })
                })
                .collect::<Result<Vec<_>, Error>>()
        };

        Ok(Self {
            name: self.name.clone(),
            inputs: resolve_all(&self.inputs)?,
            outputs: resolve_all(&self.outputs)?,
            modifiers: self.modifiers.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISSUE: &str = r#"{
        "name": "issue",
        "mutability": "mutable",
        "payableInTokens": ["REWA"],
        "inputs": [
            { "name": "tokenName", "type": "string" },
            { "name": "initialSupply", "type": "biguint" },
            { "name": "numDecimals", "type": "u8", "description": "decimals" }
        ],
        "outputs": []
    }"#;

    #[test]
    fn test_endpoint_from_json() {
        let endpoint = EndpointDefinition::from_json(ISSUE).unwrap();
        assert_eq!(endpoint.name, "issue");
        assert_eq!(endpoint.input_types(), vec![Type::Bytes, Type::BigUint, Type::U8]);
        assert_eq!(endpoint.inputs[0].description, "N / A");
        assert_eq!(endpoint.inputs[2].description, "decimals");
        assert!(endpoint.outputs.is_empty());
        assert!(endpoint.modifiers.is_payable_in_native());
        assert!(!endpoint.modifiers.is_readonly());
        assert!(!endpoint.is_constructor());
    }

    #[test]
    fn test_placeholders() {
        let endpoint = EndpointDefinition::from_json(r#"{ "inputs": [{ "type": "u32" }] }"#).unwrap();
        assert_eq!(endpoint.name, "?");
        assert_eq!(endpoint.inputs[0].name, "?");
        assert!(!endpoint.modifiers.is_payable());
    }

    #[test]
    fn test_payable_in_token() {
        let modifiers = EndpointModifiers::new("readonly", &["*", "!REWA"], true);
        assert!(modifiers.is_payable_in_token("FOO-abcdef"));
        assert!(!modifiers.is_payable_in_native());
        assert!(modifiers.is_readonly());
        assert!(modifiers.is_owner_only());

        let modifiers = EndpointModifiers::new("mutable", &["FOO-abcdef"], false);
        assert!(modifiers.is_payable());
        assert!(modifiers.is_payable_in_token("FOO-abcdef"));
        assert!(!modifiers.is_payable_in_token("BAR-abcdef"));
    }

    #[test]
    fn test_variadic_must_be_last() {
        let json = r#"{
            "name": "claim",
            "inputs": [
                { "name": "tokens", "type": "variadic<TokenIdentifier>" },
                { "name": "to", "type": "Address" }
            ]
        }"#;
        assert!(matches!(EndpointDefinition::from_json(json), Err(Error::Parse(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(EndpointDefinition::from_json("{"), Err(Error::Parse(_))));
        assert!(matches!(
            EndpointDefinition::from_json(r#"{ "inputs": [{ "type": "List<u8" }] }"#),
            Err(Error::Parse(_))
        ));
    }
}
