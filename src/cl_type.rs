use std::fmt::{self, Display, Formatter};

use serde_json::{json, Value};

use crate::{
    bytesrepr,
    error::{Error, Result},
    json::JsonNode,
    key::KEY_HASH_LENGTH,
};

/// Deepest nesting of composite types accepted when decoding.
pub const MAX_TYPE_DEPTH: usize = 50;

/// On-chain type tags. The discriminant is the byte written on the wire.
#[allow(missing_docs)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CLTypeTag {
    Bool = 0,
    I32 = 1,
    I64 = 2,
    U8 = 3,
    U32 = 4,
    U64 = 5,
    U128 = 6,
    U256 = 7,
    U512 = 8,
    Unit = 9,
    String = 10,
    Key = 11,
    URef = 12,
    Option = 13,
    List = 14,
    ByteArray = 15,
    Result = 16,
    Map = 17,
    Tuple1 = 18,
    Tuple2 = 19,
    Tuple3 = 20,
    Any = 21,
    PublicKey = 22,
}

impl CLTypeTag {
    pub fn from_u8(tag: u8) -> Result<Self> {
        let tag = match tag {
            0 => CLTypeTag::Bool,
            1 => CLTypeTag::I32,
            2 => CLTypeTag::I64,
            3 => CLTypeTag::U8,
            4 => CLTypeTag::U32,
            5 => CLTypeTag::U64,
            6 => CLTypeTag::U128,
            7 => CLTypeTag::U256,
            8 => CLTypeTag::U512,
            9 => CLTypeTag::Unit,
            10 => CLTypeTag::String,
            11 => CLTypeTag::Key,
            12 => CLTypeTag::URef,
            13 => CLTypeTag::Option,
            14 => CLTypeTag::List,
            15 => CLTypeTag::ByteArray,
            16 => CLTypeTag::Result,
            17 => CLTypeTag::Map,
            18 => CLTypeTag::Tuple1,
            19 => CLTypeTag::Tuple2,
            20 => CLTypeTag::Tuple3,
            21 => CLTypeTag::Any,
            22 => CLTypeTag::PublicKey,
            other => return Err(Error::Formatting(format!("invalid cl type tag {}", other))),
        };
        Ok(tag)
    }
}

/// Describes the kind of a [`CLValue`](crate::cl_value::CLValue), including nested types.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CLType {
    Bool,
    I32,
    I64,
    U8,
    U32,
    U64,
    U128,
    U256,
    U512,
    Unit,
    String,
    Key,
    URef,
    PublicKey,
    Option(Box<CLType>),
    List(Box<CLType>),
    /// Fixed-length byte array; the length is part of the type.
    ByteArray(u32),
    Result {
        ok: Box<CLType>,
        err: Box<CLType>,
    },
    Map {
        key: Box<CLType>,
        value: Box<CLType>,
    },
    Tuple1([Box<CLType>; 1]),
    Tuple2([Box<CLType>; 2]),
    Tuple3([Box<CLType>; 3]),
    Any,
}

impl CLType {
    pub fn tag(&self) -> CLTypeTag {
        match self {
            CLType::Bool => CLTypeTag::Bool,
            CLType::I32 => CLTypeTag::I32,
            CLType::I64 => CLTypeTag::I64,
            CLType::U8 => CLTypeTag::U8,
            CLType::U32 => CLTypeTag::U32,
            CLType::U64 => CLTypeTag::U64,
            CLType::U128 => CLTypeTag::U128,
            CLType::U256 => CLTypeTag::U256,
            CLType::U512 => CLTypeTag::U512,
            CLType::Unit => CLTypeTag::Unit,
            CLType::String => CLTypeTag::String,
            CLType::Key => CLTypeTag::Key,
            CLType::URef => CLTypeTag::URef,
            CLType::PublicKey => CLTypeTag::PublicKey,
            CLType::Option(_) => CLTypeTag::Option,
            CLType::List(_) => CLTypeTag::List,
            CLType::ByteArray(_) => CLTypeTag::ByteArray,
            CLType::Result { .. } => CLTypeTag::Result,
            CLType::Map { .. } => CLTypeTag::Map,
            CLType::Tuple1(_) => CLTypeTag::Tuple1,
            CLType::Tuple2(_) => CLTypeTag::Tuple2,
            CLType::Tuple3(_) => CLTypeTag::Tuple3,
            CLType::Any => CLTypeTag::Any,
        }
    }

    /// The fewest bytes any value of this type encodes to.
    pub fn min_serialized_len(&self) -> usize {
        match self {
            CLType::Bool | CLType::U8 => 1,
            CLType::I32 | CLType::U32 => 4,
            CLType::I64 | CLType::U64 => 8,
            CLType::U128 | CLType::U256 | CLType::U512 => 1,
            CLType::Unit | CLType::Any => 0,
            CLType::String | CLType::List(_) | CLType::Map { .. } => 4,
            CLType::Key => 1 + KEY_HASH_LENGTH,
            CLType::URef => KEY_HASH_LENGTH + 1,
            CLType::PublicKey | CLType::Option(_) | CLType::Result { .. } => 1,
            CLType::ByteArray(len) => *len as usize,
            CLType::Tuple1(types) => types.iter().map(|t| t.min_serialized_len()).sum(),
            CLType::Tuple2(types) => types.iter().map(|t| t.min_serialized_len()).sum(),
            CLType::Tuple3(types) => types.iter().map(|t| t.min_serialized_len()).sum(),
        }
    }

    /// Tag byte followed by nested types in declaration order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![self.tag() as u8];
        self.append_nested(&mut bytes);
        bytes
    }

    fn append_nested(&self, bytes: &mut Vec<u8>) {
        match self {
            CLType::Option(inner) | CLType::List(inner) => bytes.extend(inner.to_bytes()),
            CLType::ByteArray(len) => bytes.extend(bytesrepr::encode_u32(*len)),
            CLType::Result { ok, err } => {
                bytes.extend(ok.to_bytes());
                bytes.extend(err.to_bytes());
            }
            CLType::Map { key, value } => {
                bytes.extend(key.to_bytes());
                bytes.extend(value.to_bytes());
            }
            CLType::Tuple1(types) => types.iter().for_each(|t| bytes.extend(t.to_bytes())),
            CLType::Tuple2(types) => types.iter().for_each(|t| bytes.extend(t.to_bytes())),
            CLType::Tuple3(types) => types.iter().for_each(|t| bytes.extend(t.to_bytes())),
            _ => {}
        }
    }

    /// Decode a type, rejecting nesting deeper than [`MAX_TYPE_DEPTH`].
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8])> {
        CLType::from_bytes_at_depth(bytes, 0)
    }

    fn from_bytes_at_depth(bytes: &[u8], depth: usize) -> Result<(Self, &[u8])> {
        if depth > MAX_TYPE_DEPTH {
            return Err(Error::Formatting(format!(
                "cl type nested deeper than {} levels",
                MAX_TYPE_DEPTH
            )));
        }
        let depth = depth + 1;
        let (tag, rem) = bytesrepr::decode_u8(bytes)?;
        let cl_type = match CLTypeTag::from_u8(tag)? {
            CLTypeTag::Bool => (CLType::Bool, rem),
            CLTypeTag::I32 => (CLType::I32, rem),
            CLTypeTag::I64 => (CLType::I64, rem),
            CLTypeTag::U8 => (CLType::U8, rem),
            CLTypeTag::U32 => (CLType::U32, rem),
            CLTypeTag::U64 => (CLType::U64, rem),
            CLTypeTag::U128 => (CLType::U128, rem),
            CLTypeTag::U256 => (CLType::U256, rem),
            CLTypeTag::U512 => (CLType::U512, rem),
            CLTypeTag::Unit => (CLType::Unit, rem),
            CLTypeTag::String => (CLType::String, rem),
            CLTypeTag::Key => (CLType::Key, rem),
            CLTypeTag::URef => (CLType::URef, rem),
            CLTypeTag::PublicKey => (CLType::PublicKey, rem),
            CLTypeTag::Any => (CLType::Any, rem),
            CLTypeTag::Option => {
                let (inner, rem) = CLType::from_bytes_at_depth(rem, depth)?;
                (CLType::Option(Box::new(inner)), rem)
            }
            CLTypeTag::List => {
                let (inner, rem) = CLType::from_bytes_at_depth(rem, depth)?;
                (CLType::List(Box::new(inner)), rem)
            }
            CLTypeTag::ByteArray => {
                let (len, rem) = bytesrepr::decode_u32(rem)?;
                (CLType::ByteArray(len), rem)
            }
            CLTypeTag::Result => {
                let (ok, rem) = CLType::from_bytes_at_depth(rem, depth)?;
                let (err, rem) = CLType::from_bytes_at_depth(rem, depth)?;
                (
                    CLType::Result {
                        ok: Box::new(ok),
                        err: Box::new(err),
                    },
                    rem,
                )
            }
            CLTypeTag::Map => {
                let (key, rem) = CLType::from_bytes_at_depth(rem, depth)?;
                let (value, rem) = CLType::from_bytes_at_depth(rem, depth)?;
                (
                    CLType::Map {
                        key: Box::new(key),
                        value: Box::new(value),
                    },
                    rem,
                )
            }
            CLTypeTag::Tuple1 => {
                let (t0, rem) = CLType::from_bytes_at_depth(rem, depth)?;
                (CLType::Tuple1([Box::new(t0)]), rem)
            }
            CLTypeTag::Tuple2 => {
                let (t0, rem) = CLType::from_bytes_at_depth(rem, depth)?;
                let (t1, rem) = CLType::from_bytes_at_depth(rem, depth)?;
                (CLType::Tuple2([Box::new(t0), Box::new(t1)]), rem)
            }
            CLTypeTag::Tuple3 => {
                let (t0, rem) = CLType::from_bytes_at_depth(rem, depth)?;
                let (t1, rem) = CLType::from_bytes_at_depth(rem, depth)?;
                let (t2, rem) = CLType::from_bytes_at_depth(rem, depth)?;
                (
                    CLType::Tuple3([Box::new(t0), Box::new(t1), Box::new(t2)]),
                    rem,
                )
            }
        };
        Ok(cl_type)
    }

    /// The node's JSON form: scalar kinds are strings, composite kinds single-key objects.
    pub fn to_json(&self) -> Value {
        match self {
            CLType::Option(inner) => json!({ "Option": inner.to_json() }),
            CLType::List(inner) => json!({ "List": inner.to_json() }),
            CLType::ByteArray(len) => json!({ "ByteArray": len }),
            CLType::Result { ok, err } => {
                json!({ "Result": { "ok": ok.to_json(), "err": err.to_json() } })
            }
            CLType::Map { key, value } => {
                json!({ "Map": { "key": key.to_json(), "value": value.to_json() } })
            }
            CLType::Tuple1(types) => json!({ "Tuple1": types_to_json(types) }),
            CLType::Tuple2(types) => json!({ "Tuple2": types_to_json(types) }),
            CLType::Tuple3(types) => json!({ "Tuple3": types_to_json(types) }),
            scalar => Value::String(scalar.to_string()),
        }
    }

    pub fn from_json(node: &JsonNode) -> Result<Self> {
        if let Value::String(name) = node.value() {
            return scalar_from_name(name).ok_or_else(|| Error::unknown_tag(node.path(), name));
        }

        let (tag, payload) = node.single_tag()?;
        let cl_type = match tag {
            "Option" => CLType::Option(Box::new(CLType::from_json(&payload)?)),
            "List" => CLType::List(Box::new(CLType::from_json(&payload)?)),
            "ByteArray" => CLType::ByteArray(payload.as_u32()?),
            "Result" => CLType::Result {
                ok: Box::new(CLType::from_json(&payload.field("ok")?)?),
                err: Box::new(CLType::from_json(&payload.field("err")?)?),
            },
            "Map" => CLType::Map {
                key: Box::new(CLType::from_json(&payload.field("key")?)?),
                value: Box::new(CLType::from_json(&payload.field("value")?)?),
            },
            "Tuple1" => {
                let [t0] = tuple_from_json::<1>(&payload)?;
                CLType::Tuple1([t0])
            }
            "Tuple2" => {
                let [t0, t1] = tuple_from_json::<2>(&payload)?;
                CLType::Tuple2([t0, t1])
            }
            "Tuple3" => {
                let [t0, t1, t2] = tuple_from_json::<3>(&payload)?;
                CLType::Tuple3([t0, t1, t2])
            }
            other => return Err(Error::unknown_tag(node.path(), other)),
        };
        Ok(cl_type)
    }
}

fn types_to_json(types: &[Box<CLType>]) -> Value {
    Value::Array(types.iter().map(|t| t.to_json()).collect())
}

fn tuple_from_json<const N: usize>(node: &JsonNode) -> Result<[Box<CLType>; N]> {
    let elements = node.elements()?;
    if elements.len() != N {
        return Err(node.malformed(format!(
            "expected {} tuple element types, found {}",
            N,
            elements.len()
        )));
    }
    let types = elements
        .iter()
        .map(|element| CLType::from_json(element).map(Box::new))
        .collect::<Result<Vec<_>>>()?;
    types
        .try_into()
        .map_err(|_| node.malformed("tuple arity changed while parsing"))
}

fn scalar_from_name(name: &str) -> Option<CLType> {
    let cl_type = match name {
        "Bool" => CLType::Bool,
        "I32" => CLType::I32,
        "I64" => CLType::I64,
        "U8" => CLType::U8,
        "U32" => CLType::U32,
        "U64" => CLType::U64,
        "U128" => CLType::U128,
        "U256" => CLType::U256,
        "U512" => CLType::U512,
        "Unit" => CLType::Unit,
        "String" => CLType::String,
        "Key" => CLType::Key,
        "URef" => CLType::URef,
        "PublicKey" => CLType::PublicKey,
        "Any" => CLType::Any,
        _ => return None,
    };
    Some(cl_type)
}

impl Display for CLType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            CLType::Bool => write!(f, "Bool"),
            CLType::I32 => write!(f, "I32"),
            CLType::I64 => write!(f, "I64"),
            CLType::U8 => write!(f, "U8"),
            CLType::U32 => write!(f, "U32"),
            CLType::U64 => write!(f, "U64"),
            CLType::U128 => write!(f, "U128"),
            CLType::U256 => write!(f, "U256"),
            CLType::U512 => write!(f, "U512"),
            CLType::Unit => write!(f, "Unit"),
            CLType::String => write!(f, "String"),
            CLType::Key => write!(f, "Key"),
            CLType::URef => write!(f, "URef"),
            CLType::PublicKey => write!(f, "PublicKey"),
            CLType::Any => write!(f, "Any"),
            CLType::Option(inner) => write!(f, "Option<{}>", inner),
            CLType::List(inner) => write!(f, "List<{}>", inner),
            CLType::ByteArray(len) => write!(f, "ByteArray[{}]", len),
            CLType::Result { ok, err } => write!(f, "Result<{}, {}>", ok, err),
            CLType::Map { key, value } => write!(f, "Map<{}, {}>", key, value),
            CLType::Tuple1([t0]) => write!(f, "({},)", t0),
            CLType::Tuple2([t0, t1]) => write!(f, "({}, {})", t0, t1),
            CLType::Tuple3([t0, t1, t2]) => write!(f, "({}, {}, {})", t0, t1, t2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: Value) -> Result<CLType> {
        CLType::from_json(&JsonNode::root(&value, "cl_type"))
    }

    #[test]
    fn tags_follow_the_chain_enumeration() {
        assert_eq!(CLType::Bool.tag() as u8, 0);
        assert_eq!(CLType::U512.tag() as u8, 8);
        assert_eq!(CLType::ByteArray(32).tag() as u8, 15);
        assert_eq!(CLType::Any.tag() as u8, 21);
        assert_eq!(CLType::PublicKey.tag() as u8, 22);
    }

    #[test]
    fn nested_types_are_encoded_after_the_tag() {
        let cl_type = CLType::Map {
            key: Box::new(CLType::String),
            value: Box::new(CLType::Option(Box::new(CLType::U64))),
        };
        assert_eq!(cl_type.to_bytes(), vec![17, 10, 13, 5]);
        assert_eq!(CLType::ByteArray(32).to_bytes(), vec![15, 32, 0, 0, 0]);
    }

    #[test]
    fn type_bytes_decode_back() {
        let cl_type = CLType::Tuple3([
            Box::new(CLType::Key),
            Box::new(CLType::List(Box::new(CLType::U8))),
            Box::new(CLType::Result {
                ok: Box::new(CLType::Unit),
                err: Box::new(CLType::String),
            }),
        ]);
        let bytes = cl_type.to_bytes();
        let (decoded, rem) = CLType::from_bytes(&bytes).unwrap();
        assert!(rem.is_empty());
        assert_eq!(decoded, cl_type);
    }

    #[test]
    fn parses_scalar_and_composite_json() {
        assert_eq!(parse(json!("I32")).unwrap(), CLType::I32);
        assert_eq!(
            parse(json!({"List": "U8"})).unwrap(),
            CLType::List(Box::new(CLType::U8))
        );
        assert_eq!(parse(json!({"ByteArray": 32})).unwrap(), CLType::ByteArray(32));
        assert_eq!(
            parse(json!({"Map": {"key": "String", "value": "U512"}})).unwrap(),
            CLType::Map {
                key: Box::new(CLType::String),
                value: Box::new(CLType::U512)
            }
        );
    }

    #[test]
    fn json_form_parses_back() {
        let cl_type = CLType::Result {
            ok: Box::new(CLType::Tuple2([Box::new(CLType::U8), Box::new(CLType::URef)])),
            err: Box::new(CLType::PublicKey),
        };
        assert_eq!(parse(cl_type.to_json()).unwrap(), cl_type);
    }

    #[test]
    fn unknown_type_name_is_an_unknown_tag() {
        let err = parse(json!("U16")).unwrap_err();
        assert!(matches!(err, Error::UnknownVariantTag { tag, .. } if tag == "U16"));
        let err = parse(json!({"Tuple4": []})).unwrap_err();
        assert!(matches!(err, Error::UnknownVariantTag { tag, .. } if tag == "Tuple4"));
    }

    #[test]
    fn deeply_nested_type_bytes_are_rejected() {
        let err = CLType::from_bytes(&vec![13u8; 1_000_000]).unwrap_err();
        assert!(matches!(err, Error::Formatting(_)));
    }

    #[test]
    fn nesting_up_to_the_limit_decodes() {
        let mut bytes = vec![13u8; MAX_TYPE_DEPTH];
        bytes.push(3);
        let (decoded, rem) = CLType::from_bytes(&bytes).unwrap();
        assert!(rem.is_empty());
        assert_eq!(bytes, decoded.to_bytes());
    }

    #[test]
    fn zero_sized_types() {
        assert_eq!(0, CLType::Unit.min_serialized_len());
        assert_eq!(0, CLType::Tuple2([Box::new(CLType::Unit), Box::new(CLType::Unit)]).min_serialized_len());
        assert_eq!(33, CLType::Key.min_serialized_len());
        assert_eq!(4, CLType::List(Box::new(CLType::Unit)).min_serialized_len());
    }

    #[test]
    fn tuple_arity_is_checked() {
        let err = parse(json!({"Tuple2": ["U8"]})).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }
}
