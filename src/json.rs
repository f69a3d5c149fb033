//! Navigation over the node's untyped JSON that remembers where it is, so every failure can name
//! the offending path (`result.deploy.header.gas_price`, `…args[0][1].cl_type`, …).

use serde_json::{Map, Value};

use crate::{
    digest::Digest,
    error::{Error, Result},
    key::{AccountHash, Key, URef},
    public_key::PublicKey,
    uint::U512,
};

/// A borrowed position inside a JSON tree.
#[derive(Clone, Debug)]
pub struct JsonNode<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> JsonNode<'a> {
    /// Start navigating `value`, naming the root `root`.
    pub fn root(value: &'a Value, root: &str) -> Self {
        JsonNode {
            value,
            path: root.to_string(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    fn child(&self, value: &'a Value, segment: &str) -> JsonNode<'a> {
        JsonNode {
            value,
            path: format!("{}.{}", self.path, segment),
        }
    }

    fn element(&self, value: &'a Value, index: usize) -> JsonNode<'a> {
        JsonNode {
            value,
            path: format!("{}[{}]", self.path, index),
        }
    }

    pub fn malformed(&self, reason: impl Into<String>) -> Error {
        Error::malformed(self.path.clone(), reason)
    }

    /// Re-home decoding errors at this node's path. Key prefix errors stay as they are.
    pub fn at_path<T>(&self, result: Result<T>) -> Result<T> {
        result.map_err(|e| match e {
            Error::Hex(_)
            | Error::Formatting(_)
            | Error::EarlyEndOfStream
            | Error::LeftOverBytes(_)
            | Error::UnsupportedKind(_)
            | Error::TypeMismatch { .. } => self.malformed(e.to_string()),
            other => other,
        })
    }

    fn as_object(&self) -> Result<&'a Map<String, Value>> {
        self.value
            .as_object()
            .ok_or_else(|| self.malformed("expected an object"))
    }

    /// A required member. `null` counts as missing.
    pub fn field(&self, name: &str) -> Result<JsonNode<'a>> {
        self.optional_field(name)?
            .ok_or_else(|| Error::malformed(format!("{}.{}", self.path, name), "missing field"))
    }

    pub fn optional_field(&self, name: &str) -> Result<Option<JsonNode<'a>>> {
        let object = self.as_object()?;
        Ok(object
            .get(name)
            .filter(|value| !value.is_null())
            .map(|value| self.child(value, name)))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.value
            .as_object()
            .map_or(false, |object| object.contains_key(name))
    }

    pub fn elements(&self) -> Result<Vec<JsonNode<'a>>> {
        let array = self
            .value
            .as_array()
            .ok_or_else(|| self.malformed("expected an array"))?;
        Ok(array
            .iter()
            .enumerate()
            .map(|(index, value)| self.element(value, index))
            .collect())
    }

    /// Split a tag-keyed union `{"Tag": payload}` into its tag and payload.
    pub fn single_tag(&self) -> Result<(&'a str, JsonNode<'a>)> {
        let object = self.as_object()?;
        let mut entries = object.iter();
        match (entries.next(), entries.next()) {
            (Some((tag, payload)), None) => Ok((tag.as_str(), self.child(payload, tag))),
            (None, _) => Err(self.malformed("expected a single variant tag, found none")),
            (Some(_), Some(_)) => Err(self.malformed(format!(
                "expected a single variant tag, found {}",
                object.len()
            ))),
        }
    }

    pub fn as_str(&self) -> Result<&'a str> {
        self.value
            .as_str()
            .ok_or_else(|| self.malformed("expected a string"))
    }

    pub fn as_string(&self) -> Result<String> {
        self.as_str().map(str::to_string)
    }

    pub fn as_u64(&self) -> Result<u64> {
        self.value
            .as_u64()
            .ok_or_else(|| self.malformed("expected an unsigned integer"))
    }

    pub fn as_i64(&self) -> Result<i64> {
        self.value
            .as_i64()
            .ok_or_else(|| self.malformed("expected an integer"))
    }

    pub fn as_u32(&self) -> Result<u32> {
        let value = self.as_u64()?;
        u32::try_from(value).map_err(|_| self.malformed(format!("{} does not fit in u32", value)))
    }

    pub fn as_u8(&self) -> Result<u8> {
        let value = self.as_u64()?;
        u8::try_from(value).map_err(|_| self.malformed(format!("{} does not fit in u8", value)))
    }

    pub fn as_i32(&self) -> Result<i32> {
        let value = self.as_i64()?;
        i32::try_from(value).map_err(|_| self.malformed(format!("{} does not fit in i32", value)))
    }

    pub fn hex_bytes(&self) -> Result<Vec<u8>> {
        let text = self.as_str()?;
        self.at_path(hex::decode(text).map_err(Error::from))
    }

    pub fn digest(&self) -> Result<Digest> {
        let text = self.as_str()?;
        self.at_path(Digest::from_hex(text))
    }

    pub fn key(&self) -> Result<Key> {
        let text = self.as_str()?;
        self.at_path(Key::from_formatted_str(text))
    }

    pub fn account_hash(&self) -> Result<AccountHash> {
        let text = self.as_str()?;
        self.at_path(AccountHash::from_formatted_str(text))
    }

    pub fn uref(&self) -> Result<URef> {
        let text = self.as_str()?;
        self.at_path(URef::from_formatted_str(text))
    }

    pub fn public_key(&self) -> Result<PublicKey> {
        let text = self.as_str()?;
        self.at_path(PublicKey::from_hex(text))
    }

    /// Motes and gas amounts arrive as decimal strings.
    pub fn u512(&self) -> Result<U512> {
        let text = self.as_str()?;
        self.at_path(U512::from_decimal(text))
    }
}
