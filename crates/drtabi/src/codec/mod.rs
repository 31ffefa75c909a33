pub(crate) use codec::{sealed, Codec, codec_for, length_prefix};

pub use codec::BinaryCodec;
pub use options::{CodecOptions, ListLengthPolicy};
pub use reader::Reader;

pub(crate) use address::{AddressCodec, H256Codec};
pub(crate) use array::{FixedArrayCodec, ListCodec};
pub(crate) use bignum::{BigIntCodec, BigUintCodec};
pub(crate) use boolean::BooleanCodec;
pub(crate) use bytes::{BytesCodec, BytesKind};
pub(crate) use enumeration::EnumCodec;
pub(crate) use integer::{IntCodec, UIntCodec};
pub(crate) use nothing::NothingCodec;
pub(crate) use option::OptionCodec;
pub(crate) use tuple::{StructCodec, TupleCodec};

mod codec;
mod options;
mod reader;
mod address;
mod array;
mod bignum;
mod boolean;
mod bytes;
mod enumeration;
mod integer;
mod nothing;
mod option;
mod tuple;
