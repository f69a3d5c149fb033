//! Typed on-chain values and their canonical byte encoding.
//!
//! A [`CLValue`] always knows its own [`CLType`]; composite values carry the types of their
//! members so that empty containers (`None`, `[]`, `{}`) still describe themselves.

use std::fmt::{self, Display, Formatter};

use serde_json::{json, Value};

use crate::{
    bytesrepr::{
        self, I32_SERIALIZED_LENGTH, I64_SERIALIZED_LENGTH, U32_SERIALIZED_LENGTH,
        U64_SERIALIZED_LENGTH, U8_SERIALIZED_LENGTH,
    },
    cl_type::{CLType, CLTypeTag},
    error::{Error, Result},
    json::JsonNode,
    key::{Key, URef},
    public_key::PublicKey,
    uint::{U128, U256, U512},
};

#[cfg(test)]
mod tests;

const OPTION_NONE_TAG: u8 = 0;
const OPTION_SOME_TAG: u8 = 1;
const RESULT_ERR_TAG: u8 = 0;
const RESULT_OK_TAG: u8 = 1;

/// Upper bound on the element count of a list or map whose elements encode to no bytes.
pub const MAX_ZERO_SIZED_ELEMENTS: usize = 1024;

#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CLValue {
    Bool(bool),
    I32(i32),
    I64(i64),
    U8(u8),
    U32(u32),
    U64(u64),
    U128(U128),
    U256(U256),
    U512(U512),
    Unit,
    String(String),
    Key(Key),
    URef(URef),
    PublicKey(PublicKey),
    Option {
        inner_type: CLType,
        value: Option<Box<CLValue>>,
    },
    List {
        element_type: CLType,
        values: Vec<CLValue>,
    },
    ByteArray(Vec<u8>),
    Result {
        ok_type: CLType,
        err_type: CLType,
        value: std::result::Result<Box<CLValue>, Box<CLValue>>,
    },
    Map {
        key_type: CLType,
        value_type: CLType,
        entries: Vec<(CLValue, CLValue)>,
    },
    Tuple1([Box<CLValue>; 1]),
    Tuple2([Box<CLValue>; 2]),
    Tuple3([Box<CLValue>; 3]),
    /// Bytes whose type the chain does not describe.
    Any(Vec<u8>),
}

impl CLValue {
    pub fn some(value: CLValue) -> Self {
        CLValue::Option {
            inner_type: value.cl_type(),
            value: Some(Box::new(value)),
        }
    }

    pub fn none(inner_type: CLType) -> Self {
        CLValue::Option {
            inner_type,
            value: None,
        }
    }

    /// A homogeneous list. Every element must be of `element_type`.
    pub fn list(element_type: CLType, values: Vec<CLValue>) -> Result<Self> {
        for value in &values {
            expect_type(&element_type, value)?;
        }
        Ok(CLValue::List {
            element_type,
            values,
        })
    }

    /// Entries keep the order given.
    pub fn map(
        key_type: CLType,
        value_type: CLType,
        entries: Vec<(CLValue, CLValue)>,
    ) -> Result<Self> {
        for (key, value) in &entries {
            expect_type(&key_type, key)?;
            expect_type(&value_type, value)?;
        }
        Ok(CLValue::Map {
            key_type,
            value_type,
            entries,
        })
    }

    pub fn ok(value: CLValue, err_type: CLType) -> Self {
        CLValue::Result {
            ok_type: value.cl_type(),
            err_type,
            value: Ok(Box::new(value)),
        }
    }

    pub fn err(ok_type: CLType, value: CLValue) -> Self {
        CLValue::Result {
            ok_type,
            err_type: value.cl_type(),
            value: Err(Box::new(value)),
        }
    }

    pub fn tuple1(t0: CLValue) -> Self {
        CLValue::Tuple1([Box::new(t0)])
    }

    pub fn tuple2(t0: CLValue, t1: CLValue) -> Self {
        CLValue::Tuple2([Box::new(t0), Box::new(t1)])
    }

    pub fn tuple3(t0: CLValue, t1: CLValue, t2: CLValue) -> Self {
        CLValue::Tuple3([Box::new(t0), Box::new(t1), Box::new(t2)])
    }

    /// The type this value encodes as.
    pub fn cl_type(&self) -> CLType {
        match self {
            CLValue::Bool(_) => CLType::Bool,
            CLValue::I32(_) => CLType::I32,
            CLValue::I64(_) => CLType::I64,
            CLValue::U8(_) => CLType::U8,
            CLValue::U32(_) => CLType::U32,
            CLValue::U64(_) => CLType::U64,
            CLValue::U128(_) => CLType::U128,
            CLValue::U256(_) => CLType::U256,
            CLValue::U512(_) => CLType::U512,
            CLValue::Unit => CLType::Unit,
            CLValue::String(_) => CLType::String,
            CLValue::Key(_) => CLType::Key,
            CLValue::URef(_) => CLType::URef,
            CLValue::PublicKey(_) => CLType::PublicKey,
            CLValue::Option { inner_type, .. } => CLType::Option(Box::new(inner_type.clone())),
            CLValue::List { element_type, .. } => CLType::List(Box::new(element_type.clone())),
            CLValue::ByteArray(bytes) => CLType::ByteArray(bytes.len() as u32),
            CLValue::Result {
                ok_type, err_type, ..
            } => CLType::Result {
                ok: Box::new(ok_type.clone()),
                err: Box::new(err_type.clone()),
            },
            CLValue::Map {
                key_type,
                value_type,
                ..
            } => CLType::Map {
                key: Box::new(key_type.clone()),
                value: Box::new(value_type.clone()),
            },
            CLValue::Tuple1([t0]) => CLType::Tuple1([Box::new(t0.cl_type())]),
            CLValue::Tuple2([t0, t1]) => {
                CLType::Tuple2([Box::new(t0.cl_type()), Box::new(t1.cl_type())])
            }
            CLValue::Tuple3([t0, t1, t2]) => CLType::Tuple3([
                Box::new(t0.cl_type()),
                Box::new(t1.cl_type()),
                Box::new(t2.cl_type()),
            ]),
            CLValue::Any(_) => CLType::Any,
        }
    }

    pub fn type_tag(&self) -> CLTypeTag {
        self.cl_type().tag()
    }

    /// The value's canonical bytes, without any type information.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let bytes = match self {
            CLValue::Bool(value) => vec![u8::from(*value)],
            CLValue::I32(value) => bytesrepr::encode_int(value, &[I32_SERIALIZED_LENGTH], false)?,
            CLValue::I64(value) => bytesrepr::encode_int(value, &[I64_SERIALIZED_LENGTH], false)?,
            CLValue::U8(value) => bytesrepr::encode_int(value, &[U8_SERIALIZED_LENGTH], false)?,
            CLValue::U32(value) => bytesrepr::encode_int(value, &[U32_SERIALIZED_LENGTH], false)?,
            CLValue::U64(value) => bytesrepr::encode_int(value, &[U64_SERIALIZED_LENGTH], false)?,
            CLValue::U128(value) => value.to_compact_bytes()?,
            CLValue::U256(value) => value.to_compact_bytes()?,
            CLValue::U512(value) => value.to_compact_bytes()?,
            CLValue::Unit => Vec::new(),
            CLValue::String(value) => bytesrepr::encode_string(value)?,
            CLValue::Key(key) => key.to_bytes(),
            CLValue::URef(uref) => uref.to_bytes(),
            CLValue::PublicKey(public_key) => public_key.to_bytes(),
            CLValue::Option { inner_type, value } => match value {
                None => vec![OPTION_NONE_TAG],
                Some(inner) => {
                    expect_type(inner_type, inner)?;
                    tagged(OPTION_SOME_TAG, inner.encode()?)
                }
            },
            CLValue::List {
                element_type,
                values,
            } => {
                let elements = values
                    .iter()
                    .map(|value| {
                        expect_type(element_type, value)?;
                        value.encode()
                    })
                    .collect::<Result<Vec<_>>>()?;
                bytesrepr::encode_vector(elements)?
            }
            CLValue::ByteArray(bytes) => bytes.clone(),
            CLValue::Result {
                ok_type,
                err_type,
                value,
            } => match value {
                Ok(ok) => {
                    expect_type(ok_type, ok)?;
                    tagged(RESULT_OK_TAG, ok.encode()?)
                }
                Err(err) => {
                    expect_type(err_type, err)?;
                    tagged(RESULT_ERR_TAG, err.encode()?)
                }
            },
            CLValue::Map {
                key_type,
                value_type,
                entries,
            } => {
                let mut bytes = bytesrepr::encode_len(entries.len())?;
                for (key, value) in entries {
                    expect_type(key_type, key)?;
                    expect_type(value_type, value)?;
                    bytes.extend(key.encode()?);
                    bytes.extend(value.encode()?);
                }
                bytes
            }
            CLValue::Tuple1(values) => encode_all(values)?,
            CLValue::Tuple2(values) => encode_all(values)?,
            CLValue::Tuple3(values) => encode_all(values)?,
            CLValue::Any(bytes) => bytes.clone(),
        };
        Ok(bytes)
    }

    /// The form embedded in deploy arguments: length-prefixed value bytes followed by the type.
    pub fn to_argument_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = bytesrepr::encode_bytes(&self.encode()?)?;
        bytes.extend(self.cl_type().to_bytes());
        Ok(bytes)
    }

    pub fn from_argument_bytes(bytes: &[u8]) -> Result<(Self, &[u8])> {
        let (value_bytes, rem) = bytesrepr::decode_bytes(bytes)?;
        let (cl_type, rem) = CLType::from_bytes(rem)?;
        Ok((CLValue::decode(&value_bytes, &cl_type)?, rem))
    }

    /// Decode a complete value of type `cl_type`. Every byte must be consumed.
    pub fn decode(bytes: &[u8], cl_type: &CLType) -> Result<Self> {
        if let CLType::Any = cl_type {
            return Ok(CLValue::Any(bytes.to_vec()));
        }
        let (value, rem) = CLValue::from_bytes(bytes, cl_type)?;
        bytesrepr::ensure_consumed(rem)?;
        Ok(value)
    }

    /// Decode one value of type `cl_type` from the front of `bytes`.
    ///
    /// `Any` carries no length, so it can only be decoded as a whole value through [`decode`].
    ///
    /// [`decode`]: CLValue::decode
    pub fn from_bytes<'a>(bytes: &'a [u8], cl_type: &CLType) -> Result<(Self, &'a [u8])> {
        let decoded = match cl_type {
            CLType::Bool => {
                let (value, rem) = bytesrepr::decode_bool(bytes)?;
                (CLValue::Bool(value), rem)
            }
            CLType::I32 => {
                let (value, rem) = bytesrepr::decode_i32(bytes)?;
                (CLValue::I32(value), rem)
            }
            CLType::I64 => {
                let (value, rem) = bytesrepr::decode_i64(bytes)?;
                (CLValue::I64(value), rem)
            }
            CLType::U8 => {
                let (value, rem) = bytesrepr::decode_u8(bytes)?;
                (CLValue::U8(value), rem)
            }
            CLType::U32 => {
                let (value, rem) = bytesrepr::decode_u32(bytes)?;
                (CLValue::U32(value), rem)
            }
            CLType::U64 => {
                let (value, rem) = bytesrepr::decode_u64(bytes)?;
                (CLValue::U64(value), rem)
            }
            CLType::U128 => {
                let (value, rem) = U128::from_compact_bytes(bytes)?;
                (CLValue::U128(value), rem)
            }
            CLType::U256 => {
                let (value, rem) = U256::from_compact_bytes(bytes)?;
                (CLValue::U256(value), rem)
            }
            CLType::U512 => {
                let (value, rem) = U512::from_compact_bytes(bytes)?;
                (CLValue::U512(value), rem)
            }
            CLType::Unit => (CLValue::Unit, bytes),
            CLType::String => {
                let (value, rem) = bytesrepr::decode_string(bytes)?;
                (CLValue::String(value), rem)
            }
            CLType::Key => {
                let (key, rem) = Key::from_bytes(bytes)?;
                (CLValue::Key(key), rem)
            }
            CLType::URef => {
                let (uref, rem) = URef::from_bytes(bytes)?;
                (CLValue::URef(uref), rem)
            }
            CLType::PublicKey => {
                let (public_key, rem) = PublicKey::from_bytes(bytes)?;
                (CLValue::PublicKey(public_key), rem)
            }
            CLType::Option(inner_type) => {
                let (tag, rem) = bytesrepr::decode_u8(bytes)?;
                match tag {
                    OPTION_NONE_TAG => (CLValue::none(*inner_type.clone()), rem),
                    OPTION_SOME_TAG => {
                        let (inner, rem) = CLValue::from_bytes(rem, inner_type)?;
                        let value = CLValue::Option {
                            inner_type: *inner_type.clone(),
                            value: Some(Box::new(inner)),
                        };
                        (value, rem)
                    }
                    other => {
                        return Err(Error::Formatting(format!("invalid option tag {}", other)))
                    }
                }
            }
            CLType::List(element_type) => {
                let (count, mut rem) = bytesrepr::decode_len(bytes)?;
                check_count(count, element_type.min_serialized_len(), rem.len())?;
                let mut values = Vec::new();
                for _ in 0..count {
                    let (value, next) = CLValue::from_bytes(rem, element_type)?;
                    values.push(value);
                    rem = next;
                }
                let list = CLValue::List {
                    element_type: *element_type.clone(),
                    values,
                };
                (list, rem)
            }
            CLType::ByteArray(len) => {
                let (value, rem) = bytesrepr::safe_split_at(bytes, *len as usize)?;
                (CLValue::ByteArray(value.to_vec()), rem)
            }
            CLType::Result { ok, err } => {
                let (tag, rem) = bytesrepr::decode_u8(bytes)?;
                let (value, rem) = match tag {
                    RESULT_OK_TAG => {
                        let (value, rem) = CLValue::from_bytes(rem, ok)?;
                        (Ok(Box::new(value)), rem)
                    }
                    RESULT_ERR_TAG => {
                        let (value, rem) = CLValue::from_bytes(rem, err)?;
                        (Err(Box::new(value)), rem)
                    }
                    other => {
                        return Err(Error::Formatting(format!("invalid result tag {}", other)))
                    }
                };
                let result = CLValue::Result {
                    ok_type: *ok.clone(),
                    err_type: *err.clone(),
                    value,
                };
                (result, rem)
            }
            CLType::Map { key, value } => {
                let (count, mut rem) = bytesrepr::decode_len(bytes)?;
                check_count(
                    count,
                    key.min_serialized_len() + value.min_serialized_len(),
                    rem.len(),
                )?;
                let mut entries = Vec::new();
                for _ in 0..count {
                    let (k, next) = CLValue::from_bytes(rem, key)?;
                    let (v, next) = CLValue::from_bytes(next, value)?;
                    entries.push((k, v));
                    rem = next;
                }
                let map = CLValue::Map {
                    key_type: *key.clone(),
                    value_type: *value.clone(),
                    entries,
                };
                (map, rem)
            }
            CLType::Tuple1([t0]) => {
                let (v0, rem) = CLValue::from_bytes(bytes, t0)?;
                (CLValue::tuple1(v0), rem)
            }
            CLType::Tuple2([t0, t1]) => {
                let (v0, rem) = CLValue::from_bytes(bytes, t0)?;
                let (v1, rem) = CLValue::from_bytes(rem, t1)?;
                (CLValue::tuple2(v0, v1), rem)
            }
            CLType::Tuple3([t0, t1, t2]) => {
                let (v0, rem) = CLValue::from_bytes(bytes, t0)?;
                let (v1, rem) = CLValue::from_bytes(rem, t1)?;
                let (v2, rem) = CLValue::from_bytes(rem, t2)?;
                (CLValue::tuple3(v0, v1, v2), rem)
            }
            CLType::Any => {
                return Err(Error::UnsupportedKind(
                    "Any is not self-delimiting and cannot be nested".to_string(),
                ))
            }
        };
        Ok(decoded)
    }

    /// A JSON preview of scalar values, `null` for composites.
    pub fn parsed(&self) -> Value {
        match self {
            CLValue::Bool(value) => json!(value),
            CLValue::I32(value) => json!(value),
            CLValue::I64(value) => json!(value),
            CLValue::U8(value) => json!(value),
            CLValue::U32(value) => json!(value),
            CLValue::U64(value) => json!(value),
            CLValue::U128(value) => json!(value.to_string()),
            CLValue::U256(value) => json!(value.to_string()),
            CLValue::U512(value) => json!(value.to_string()),
            CLValue::String(value) => json!(value),
            CLValue::Key(key) => json!(key.to_formatted_string()),
            CLValue::URef(uref) => json!(uref.to_formatted_string()),
            CLValue::PublicKey(public_key) => json!(public_key.to_hex()),
            _ => Value::Null,
        }
    }

    /// The node's `{bytes, cl_type, parsed}` object.
    pub fn to_json(&self) -> Result<Value> {
        Ok(json!({
            "bytes": hex::encode(self.encode()?),
            "cl_type": self.cl_type().to_json(),
            "parsed": self.parsed(),
        }))
    }

    /// Reads `bytes` and `cl_type`; `parsed` is advisory and ignored.
    pub fn from_json(node: &JsonNode) -> Result<Self> {
        let bytes_node = node.field("bytes")?;
        let bytes = bytes_node.hex_bytes()?;
        let cl_type = CLType::from_json(&node.field("cl_type")?)?;
        bytes_node.at_path(CLValue::decode(&bytes, &cl_type))
    }
}

fn expect_type(expected: &CLType, value: &CLValue) -> Result<()> {
    let found = value.cl_type();
    if &found == expected {
        Ok(())
    } else {
        Err(Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        })
    }
}

/// Reject element counts the remaining input cannot possibly hold.
fn check_count(count: usize, element_len: usize, remaining: usize) -> Result<()> {
    if element_len == 0 {
        if count > MAX_ZERO_SIZED_ELEMENTS {
            return Err(Error::Formatting(format!(
                "{} zero-sized elements exceed the limit of {}",
                count, MAX_ZERO_SIZED_ELEMENTS
            )));
        }
    } else if count.saturating_mul(element_len) > remaining {
        return Err(Error::EarlyEndOfStream);
    }
    Ok(())
}

fn tagged(tag: u8, payload: Vec<u8>) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(payload.len() + 1);
    bytes.push(tag);
    bytes.extend(payload);
    bytes
}

fn encode_all(values: &[Box<CLValue>]) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    for value in values {
        bytes.extend(value.encode()?);
    }
    Ok(bytes)
}

fn write_joined<'a, I>(f: &mut Formatter, values: I) -> fmt::Result
where
    I: IntoIterator<Item = &'a CLValue>,
{
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", value)?;
    }
    Ok(())
}

impl Display for CLValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            CLValue::Bool(value) => write!(f, "{}", value),
            CLValue::I32(value) => write!(f, "{}", value),
            CLValue::I64(value) => write!(f, "{}", value),
            CLValue::U8(value) => write!(f, "{}", value),
            CLValue::U32(value) => write!(f, "{}", value),
            CLValue::U64(value) => write!(f, "{}", value),
            CLValue::U128(value) => write!(f, "{}", value),
            CLValue::U256(value) => write!(f, "{}", value),
            CLValue::U512(value) => write!(f, "{}", value),
            CLValue::Unit => write!(f, "()"),
            CLValue::String(value) => write!(f, "{:?}", value),
            CLValue::Key(key) => write!(f, "{}", key),
            CLValue::URef(uref) => write!(f, "{}", uref),
            CLValue::PublicKey(public_key) => write!(f, "{}", public_key),
            CLValue::Option { value: None, .. } => write!(f, "None"),
            CLValue::Option {
                value: Some(inner), ..
            } => write!(f, "Some({})", inner),
            CLValue::List { values, .. } => {
                write!(f, "[")?;
                write_joined(f, values)?;
                write!(f, "]")
            }
            CLValue::ByteArray(bytes) => write!(f, "0x{}", hex::encode(bytes)),
            CLValue::Result { value: Ok(ok), .. } => write!(f, "Ok({})", ok),
            CLValue::Result { value: Err(err), .. } => write!(f, "Err({})", err),
            CLValue::Map { entries, .. } => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            CLValue::Tuple1(values) => {
                write!(f, "(")?;
                write_joined(f, values.iter().map(|v| &**v))?;
                write!(f, ",)")
            }
            CLValue::Tuple2(values) => {
                write!(f, "(")?;
                write_joined(f, values.iter().map(|v| &**v))?;
                write!(f, ")")
            }
            CLValue::Tuple3(values) => {
                write!(f, "(")?;
                write_joined(f, values.iter().map(|v| &**v))?;
                write!(f, ")")
            }
            CLValue::Any(bytes) => write!(f, "Any({} bytes)", bytes.len()),
        }
    }
}

macro_rules! impl_from_for_cl_value {
    ($type:ty, $variant:ident) => {
        impl From<$type> for CLValue {
            fn from(value: $type) -> Self {
                CLValue::$variant(value)
            }
        }
    };
}

impl_from_for_cl_value!(bool, Bool);
impl_from_for_cl_value!(i32, I32);
impl_from_for_cl_value!(i64, I64);
impl_from_for_cl_value!(u8, U8);
impl_from_for_cl_value!(u32, U32);
impl_from_for_cl_value!(u64, U64);
impl_from_for_cl_value!(U128, U128);
impl_from_for_cl_value!(U256, U256);
impl_from_for_cl_value!(U512, U512);
impl_from_for_cl_value!(String, String);
impl_from_for_cl_value!(Key, Key);
impl_from_for_cl_value!(URef, URef);
impl_from_for_cl_value!(PublicKey, PublicKey);

impl From<&str> for CLValue {
    fn from(value: &str) -> Self {
        CLValue::String(value.to_string())
    }
}

impl From<()> for CLValue {
    fn from(_: ()) -> Self {
        CLValue::Unit
    }
}
