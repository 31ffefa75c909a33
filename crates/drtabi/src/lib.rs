extern crate base64;
extern crate hex;
extern crate log;
extern crate num_bigint;
extern crate num_traits;
extern crate pest;
#[macro_use]
extern crate pest_derive;
extern crate serde;
extern crate serde_json;
#[macro_use]
extern crate thiserror;

pub use address::{Address, ADDRESS_LENGTH};
pub use codec::{BinaryCodec, CodecOptions, ListLengthPolicy};
pub use endpoint::{EndpointDefinition, EndpointModifiers, EndpointParameterDefinition};
pub use error::Error;
pub use native::{NativeArg, NativeSerializer};
pub use parser::{parse, TypeExpressionParser};
pub use serializer::{ArgSerializer, EncodedArguments, ARGUMENTS_SEPARATOR};
pub use types::{
    CustomTypes, EnumDefinition, EnumVariantDefinition, FieldDefinition, StructDefinition, Type, TypeKind,
};
pub use value::{ArrayValue, EnumValue, Field, ListValue, OptionValue, StructValue, Value, H256_LENGTH};

mod address;
mod codec;
mod endpoint;
mod error;
mod grammar;
mod native;
mod parser;
mod serializer;
mod types;
mod value;
