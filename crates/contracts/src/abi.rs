use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use serde::Deserialize;
use drtabi::{
    CustomTypes, EndpointDefinition, EnumDefinition, EnumVariantDefinition, FieldDefinition, StructDefinition,
    Type,
};
use crate::Error;

const CONSTRUCTOR: &str = "constructor";

#[derive(Deserialize)]
struct AbiJson {
    #[serde(default)]
    name: String,
    constructor: Option<serde_json::Value>,
    #[serde(default)]
    endpoints: Vec<serde_json::Value>,
    #[serde(default)]
    types: BTreeMap<String, TypeJson>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum TypeJson {
    Struct {
        #[serde(default)]
        fields: Vec<FieldJson>,
    },
    Enum {
        #[serde(default)]
        variants: Vec<VariantJson>,
    },
}

#[derive(Deserialize)]
struct FieldJson {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "type")]
    ty: String,
}

#[derive(Deserialize)]
struct VariantJson {
    name: String,
    discriminant: u8,
    #[serde(default)]
    fields: Vec<FieldJson>,
}

/// Builds custom type definitions on demand, following references between them.
struct TypeResolver<'a> {
    declared: &'a BTreeMap<String, TypeJson>,
    resolved: CustomTypes,
    visiting: Vec<String>,
}

impl<'a> TypeResolver<'a> {
    fn new(declared: &'a BTreeMap<String, TypeJson>) -> Self {
        Self { declared, resolved: CustomTypes::new(), visiting: Vec::new() }
    }

    fn resolve_all(mut self) -> Result<CustomTypes, drtabi::Error> {
        let declared = self.declared;
        for name in declared.keys() {
            self.resolve_name(name)?;
        }
        Ok(self.resolved)
    }

    fn resolve_name(&mut self, name: &str) -> Result<Type, drtabi::Error> {
        if let Some(ty) = self.resolved.get(name) {
            return Ok(ty.clone());
        }
        if self.visiting.iter().any(|visiting| visiting == name) {
            return Err(drtabi::Error::Parse(format!(
                "type '{}' refers to itself through {}",
                name,
                self.visiting.join(" -> ")
            )));
        }
        let declared_types = self.declared;
        let declared = declared_types.get(name)
            .ok_or_else(|| drtabi::Error::Parse(format!("unknown type '{}'", name)))?;

        self.visiting.push(name.to_string());
        let ty = match declared {
            TypeJson::Struct { fields } => {
                let fields = self.fields(fields)?;
                Type::Struct(Arc::new(StructDefinition::new(name, fields)))
            }
            TypeJson::Enum { variants } => {
                let variants = variants.iter()
                    .map(|variant| {
                        let fields = self.fields(&variant.fields)?;
                        Ok(EnumVariantDefinition::new(&variant.name, variant.discriminant, fields))
                    })
                    .collect::<Result<Vec<_>, drtabi::Error>>()?;
                Type::Enum(Arc::new(EnumDefinition::new(name, variants)))
            }
        };
        self.visiting.pop();

        self.resolved.insert(name.to_string(), ty.clone());
        Ok(ty)
    }

    fn fields(&mut self, fields: &[FieldJson]) -> Result<Vec<FieldDefinition>, drtabi::Error> {
        fields.iter()
            .map(|field| {
                let ty = self.resolve_expression(&field.ty)?;
                Ok(FieldDefinition::new(&field.name, &field.description, ty))
            })
            .collect()
    }

    fn resolve_expression(&mut self, expression: &str) -> Result<Type, drtabi::Error> {
        let ty = drtabi::parse(expression)?;
        for name in custom_names(&ty) {
            self.resolve_name(&name)?;
        }
        ty.resolve(&self.resolved)
    }
}

fn custom_names(ty: &Type) -> Vec<String> {
    match ty {
        Type::Custom(name) => vec![name.clone()],
        other => other.type_parameters().into_iter().flat_map(custom_names).collect(),
    }
}

/// A contract interface: endpoints plus the custom types they use, with every
/// type reference resolved.
#[derive(Clone, Debug)]
pub struct SmartContractAbi {
    name: String,
    constructor: Option<EndpointDefinition>,
    endpoints: Vec<EndpointDefinition>,
    types: CustomTypes,
    index: HashMap<String, usize>,
}

impl SmartContractAbi {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let raw: AbiJson = serde_json::from_str(json)?;
        let types = TypeResolver::new(&raw.types).resolve_all()?;

        let constructor = match raw.constructor {
            Some(mut constructor) => {
                if let Some(object) = constructor.as_object_mut() {
                    object.insert("name".to_string(), CONSTRUCTOR.into());
                }
                Some(EndpointDefinition::from_json_value(constructor)?.resolve(&types)?)
            }
            None => None,
        };

        let endpoints = raw.endpoints.into_iter()
            .map(|endpoint| Ok(EndpointDefinition::from_json_value(endpoint)?.resolve(&types)?))
            .collect::<Result<Vec<_>, Error>>()?;

        let index = endpoints.iter()
            .enumerate()
            .map(|(position, endpoint)| (endpoint.name.clone(), position))
            .collect();

        log::debug!("Loaded ABI '{}': {} endpoints, {} custom types", raw.name, endpoints.len(), types.len());

        Ok(Self { name: raw.name, constructor, endpoints, types, index })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constructor(&self) -> Option<&EndpointDefinition> {
        self.constructor.as_ref()
    }

    pub fn endpoints(&self) -> &[EndpointDefinition] {
        &self.endpoints
    }

    pub fn get_endpoint(&self, name: &str) -> Result<&EndpointDefinition, Error> {
        if name == CONSTRUCTOR {
            if let Some(constructor) = &self.constructor {
                return Ok(constructor);
            }
        }
        self.index.get(name)
            .map(|&position| &self.endpoints[position])
            .ok_or_else(|| Error::UnknownEndpoint(name.to_string()))
    }

    pub fn custom_type(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    pub fn custom_types(&self) -> &CustomTypes {
        &self.types
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const AUCTION_ABI: &str = r#"{
        "name": "Auction",
        "constructor": {
            "inputs": [{ "name": "fee", "type": "BigUint" }],
            "outputs": []
        },
        "endpoints": [
            {
                "name": "issue",
                "mutability": "mutable",
                "payableInTokens": ["REWA"],
                "inputs": [
                    { "name": "tokenName", "type": "string" },
                    { "name": "initialSupply", "type": "biguint" },
                    { "name": "numDecimals", "type": "u8" }
                ],
                "outputs": []
            },
            {
                "name": "getAuction",
                "mutability": "readonly",
                "inputs": [{ "name": "id", "type": "u64" }],
                "outputs": [{ "type": "Option<Auction>" }]
            },
            {
                "name": "bid",
                "mutability": "mutable",
                "payableInTokens": ["*"],
                "inputs": [
                    { "name": "id", "type": "u64" },
                    { "name": "status", "type": "optional<Status>" }
                ],
                "outputs": [{ "type": "variadic<multi<Address,BigUint>>" }]
            }
        ],
        "types": {
            "Auction": {
                "type": "struct",
                "fields": [
                    { "name": "token", "type": "TokenIdentifier" },
                    { "name": "min_bid", "type": "BigUint" },
                    { "name": "status", "type": "Status" },
                    { "name": "bids", "type": "List<Bid>" }
                ]
            },
            "Bid": {
                "type": "struct",
                "fields": [
                    { "name": "bidder", "type": "Address" },
                    { "name": "amount", "type": "BigUint" }
                ]
            },
            "Status": {
                "type": "enum",
                "variants": [
                    { "name": "Open", "discriminant": 0 },
                    { "name": "Closed", "discriminant": 1, "fields": [{ "name": "0", "type": "u64" }] }
                ]
            }
        }
    }"#;

    #[test]
    fn test_load_abi() {
        let abi = SmartContractAbi::from_json(AUCTION_ABI).unwrap();
        assert_eq!(abi.name(), "Auction");
        assert_eq!(abi.endpoints().len(), 3);
        assert!(abi.constructor().unwrap().is_constructor());
        assert_eq!(abi.get_endpoint("constructor").unwrap().input_types(), vec![Type::BigUint]);
        assert!(abi.get_endpoint("getAuction").unwrap().modifiers.is_readonly());
        assert!(matches!(abi.get_endpoint("missing"), Err(Error::UnknownEndpoint(_))));
    }

    #[test]
    fn test_custom_types_are_resolved() {
        let abi = SmartContractAbi::from_json(AUCTION_ABI).unwrap();

        let auction = match abi.custom_type("Auction").unwrap() {
            Type::Struct(definition) => definition.clone(),
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(auction.fields[2].ty, abi.custom_type("Status").unwrap().clone());
        assert_eq!(auction.fields[3].ty, Type::List(Box::new(abi.custom_type("Bid").unwrap().clone())));

        let output = &abi.get_endpoint("getAuction").unwrap().outputs[0].ty;
        assert_eq!(output, &Type::Option(Box::new(Type::Struct(auction))));
        assert!(abi.endpoints().iter().all(|e| e.input_types().iter().all(Type::is_resolved)));
    }

    #[test]
    fn test_unknown_and_cyclic_types() {
        let unknown = r#"{ "endpoints": [{ "name": "f", "inputs": [{ "type": "Missing" }] }] }"#;
        assert!(matches!(
            SmartContractAbi::from_json(unknown),
            Err(Error::AbiError(drtabi::Error::Parse(_)))
        ));

        let cyclic = r#"{
            "types": {
                "A": { "type": "struct", "fields": [{ "name": "b", "type": "Option<B>" }] },
                "B": { "type": "struct", "fields": [{ "name": "a", "type": "List<A>" }] }
            }
        }"#;
        assert!(matches!(
            SmartContractAbi::from_json(cyclic),
            Err(Error::AbiError(drtabi::Error::Parse(_)))
        ));

        assert!(matches!(SmartContractAbi::from_json("42"), Err(Error::JsonError(_))));
    }
}
