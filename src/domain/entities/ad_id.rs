//! Advertisement identifier.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Identifier of a single advertisement.
///
/// Front-ends historically submitted ids either as JSON strings or as JSON
/// numbers, so both forms are accepted on input. The id is always stored and
/// serialized as a string, which also makes it usable as a JSON object key in
/// the stats collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AdId(String);

impl AdId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric value of the id, if it is a plain unsigned integer.
    ///
    /// Used by sequential id assignment; textual ids are ignored there.
    pub fn as_number(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for AdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AdId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AdId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for AdId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for AdId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AdId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AdIdVisitor)
    }
}

struct AdIdVisitor;

impl Visitor<'_> for AdIdVisitor {
    type Value = AdId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or a non-negative integer ad id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<AdId, E> {
        Ok(AdId::new(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<AdId, E> {
        Ok(AdId(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<AdId, E> {
        Ok(AdId::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<AdId, E> {
        u64::try_from(v)
            .map(AdId::from)
            .map_err(|_| E::custom(format!("ad id must not be negative, got {v}")))
    }
}
