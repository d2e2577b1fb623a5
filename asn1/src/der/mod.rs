//! X.690 strict DER: definite lengths only, minimal length encoding,
//! sorted SET/SET OF (spec.md §6).

mod decode;
mod encode;
mod primitives;

pub use decode::{decode, Decoder};
pub use encode::{encode, encode_integer_i128, encode_unsigned_integer, Encoder};
pub use primitives::{decode_length, decode_tag, encode_length, encode_tag};
