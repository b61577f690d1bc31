use crate::prelude::*;
use ark_std::fmt;
use serde::de::{SeqAccess, Visitor};

/// Objects that have a canonical byte encoding, used by the serde bridge.
pub trait EmberFromToBytes: Sized {
    /// Convert to the canonical bytes
    fn ember_to_bytes(&self) -> Vec<u8>;
    /// Reconstruct from the canonical bytes
    fn ember_from_bytes(bytes: &[u8]) -> Result<Self>;
}

/// Serde visitor that accepts either a byte string or a sequence of bytes.
pub struct BytesVisitor;

impl<'de> Visitor<'de> for BytesVisitor {
    type Value = Vec<u8>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a canonical byte encoding")
    }

    fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> core::result::Result<Vec<u8>, E> {
        Ok(v.to_vec())
    }

    fn visit_byte_buf<E: serde::de::Error>(self, v: Vec<u8>) -> core::result::Result<Vec<u8>, E> {
        Ok(v)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> core::result::Result<Vec<u8>, A::Error> {
        let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(b) = seq.next_element::<u8>()? {
            bytes.push(b);
        }
        Ok(bytes)
    }
}

/// Implement `serde::Serialize` and `serde::Deserialize` through `EmberFromToBytes`.
#[macro_export]
macro_rules! serialize_deserialize {
    ($t:ident) => {
        impl serde::Serialize for $t {
            fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_bytes(&self.ember_to_bytes())
            }
        }

        impl<'de> serde::Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let bytes = deserializer.deserialize_bytes($crate::serialization::BytesVisitor)?;
                $t::ember_from_bytes(bytes.as_slice()).map_err(serde::de::Error::custom)
            }
        }
    };
}
