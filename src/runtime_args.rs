use serde_json::{json, Value};

use crate::{
    bytesrepr,
    cl_value::CLValue,
    error::Result,
    json::JsonNode,
};

/// A named argument passed to a contract entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployArgument {
    name: String,
    value: CLValue,
}

impl DeployArgument {
    pub fn new(name: impl Into<String>, value: impl Into<CLValue>) -> Self {
        DeployArgument {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &CLValue {
        &self.value
    }

    /// Name string followed by the value in its argument form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = bytesrepr::encode_string(&self.name)?;
        bytes.extend(self.value.to_argument_bytes()?);
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8])> {
        let (name, rem) = bytesrepr::decode_string(bytes)?;
        let (value, rem) = CLValue::from_argument_bytes(rem)?;
        Ok((DeployArgument { name, value }, rem))
    }

    /// `[name, {bytes, cl_type, parsed}]`
    pub fn to_json(&self) -> Result<Value> {
        Ok(json!([self.name, self.value.to_json()?]))
    }

    pub fn from_json(node: &JsonNode) -> Result<Self> {
        let pair = node.elements()?;
        match pair.as_slice() {
            [name, value] => Ok(DeployArgument {
                name: name.as_string()?,
                value: CLValue::from_json(value)?,
            }),
            _ => Err(node.malformed(format!(
                "expected a [name, value] pair, found {} elements",
                pair.len()
            ))),
        }
    }
}

/// Arguments in the order they are encoded.
///
/// Both a list of [`DeployArgument`]s and a name to value mapping normalize to this list. A
/// mapping keeps its own iteration order, so callers that need a stable encoding should build
/// from an ordered source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuntimeArgs(Vec<DeployArgument>);

impl RuntimeArgs {
    pub fn new() -> Self {
        RuntimeArgs::default()
    }

    /// Build from `(name, value)` pairs in iteration order.
    pub fn from_named<I, K, V>(named: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CLValue>,
    {
        named
            .into_iter()
            .map(|(name, value)| DeployArgument::new(name, value))
            .collect()
    }

    /// Append an argument. Names are not deduplicated.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<CLValue>) {
        self.0.push(DeployArgument::new(name, value));
    }

    /// The first argument called `name`.
    pub fn get(&self, name: &str) -> Option<&CLValue> {
        self.0
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| &arg.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeployArgument> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let args = self
            .0
            .iter()
            .map(DeployArgument::to_bytes)
            .collect::<Result<Vec<_>>>()?;
        bytesrepr::encode_vector(args)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8])> {
        let (count, mut rem) = bytesrepr::decode_len(bytes)?;
        let mut args = Vec::new();
        for _ in 0..count {
            let (arg, next) = DeployArgument::from_bytes(rem)?;
            args.push(arg);
            rem = next;
        }
        Ok((RuntimeArgs(args), rem))
    }

    pub fn to_json(&self) -> Result<Value> {
        let args = self
            .0
            .iter()
            .map(DeployArgument::to_json)
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Array(args))
    }

    /// Any argument that fails to parse fails the whole list.
    pub fn from_json(node: &JsonNode) -> Result<Self> {
        node.elements()?
            .iter()
            .map(DeployArgument::from_json)
            .collect::<Result<Vec<_>>>()
            .map(RuntimeArgs)
    }
}

impl From<Vec<DeployArgument>> for RuntimeArgs {
    fn from(args: Vec<DeployArgument>) -> Self {
        RuntimeArgs(args)
    }
}

impl FromIterator<DeployArgument> for RuntimeArgs {
    fn from_iter<I: IntoIterator<Item = DeployArgument>>(iter: I) -> Self {
        RuntimeArgs(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RuntimeArgs {
    type Item = &'a DeployArgument;
    type IntoIter = std::slice::Iter<'a, DeployArgument>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, uint::U512};

    #[test]
    fn named_pairs_keep_their_order() {
        let args = RuntimeArgs::from_named(vec![
            ("target", CLValue::from("abc")),
            ("amount", CLValue::U512(U512::from(10u64))),
        ]);
        let names: Vec<&str> = args.iter().map(DeployArgument::name).collect();
        assert_eq!(vec!["target", "amount"], names);
        assert_eq!(Some(&CLValue::U512(U512::from(10u64))), args.get("amount"));
    }

    #[test]
    fn list_and_mapping_forms_agree() {
        let listed: RuntimeArgs = vec![DeployArgument::new("id", 7u64)].into();
        let named = RuntimeArgs::from_named([("id", 7u64)]);
        assert_eq!(listed, named);
    }

    #[test]
    fn argument_bytes() {
        let arg = DeployArgument::new("x", 1u8);
        assert_eq!(
            vec![1, 0, 0, 0, b'x', 1, 0, 0, 0, 1, 3],
            arg.to_bytes().unwrap()
        );
        let args: RuntimeArgs = vec![arg.clone()].into();
        let bytes = args.to_bytes().unwrap();
        assert_eq!(vec![1, 0, 0, 0], bytes[..4].to_vec());
        let (decoded, rem) = RuntimeArgs::from_bytes(&bytes).unwrap();
        assert!(rem.is_empty());
        assert_eq!(args, decoded);
    }

    #[test]
    fn one_bad_argument_fails_the_list() {
        let value = json!([
            ["amount", {"bytes": "e8030000", "cl_type": "I32"}],
            ["target", {"bytes": "e8030000", "cl_type": "Nope"}]
        ]);
        let err = RuntimeArgs::from_json(&JsonNode::root(&value, "args")).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownVariantTag { path, .. } if path == "args[1][1].cl_type"
        ));
    }

    #[test]
    fn pair_shape_is_checked() {
        let value = json!([["amount"]]);
        let err = RuntimeArgs::from_json(&JsonNode::root(&value, "args")).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { path, .. } if path == "args[0]"));
    }
}
