use super::*;
use crate::key::AccessRights;

fn from_json(value: Value) -> Result<CLValue> {
    CLValue::from_json(&JsonNode::root(&value, "value"))
}

#[test]
fn i32_from_node_json() {
    let value = from_json(json!({"bytes": "e8030000", "cl_type": "I32", "parsed": 1000})).unwrap();
    assert_eq!(CLValue::I32(1000), value);
}

#[test]
fn parsed_is_ignored_on_input() {
    let value = from_json(json!({"bytes": "e8030000", "cl_type": "I32", "parsed": "garbage"}));
    assert_eq!(CLValue::I32(1000), value.unwrap());
}

#[test]
fn fixed_width_kinds_have_no_prefix() {
    assert_eq!(vec![0xe8, 0x03, 0, 0], CLValue::U32(1000).encode().unwrap());
    assert_eq!(vec![7, 0, 0, 0, 0, 0, 0, 0], CLValue::U64(7).encode().unwrap());
    assert_eq!(vec![0xff, 0xff, 0xff, 0xff], CLValue::I32(-1).encode().unwrap());
    assert_eq!(vec![1], CLValue::Bool(true).encode().unwrap());
    assert!(CLValue::Unit.encode().unwrap().is_empty());
}

#[test]
fn u512_amount_argument_bytes() {
    let amount = CLValue::U512(U512::from(1_000_000u64));
    assert_eq!(vec![3, 0x40, 0x42, 0x0f], amount.encode().unwrap());
    assert_eq!(
        vec![4, 0, 0, 0, 3, 0x40, 0x42, 0x0f, 8],
        amount.to_argument_bytes().unwrap()
    );
}

#[test]
fn string_value_is_length_prefixed() {
    let value = CLValue::from("amount");
    let mut expected = vec![6, 0, 0, 0];
    expected.extend_from_slice(b"amount");
    assert_eq!(expected, value.encode().unwrap());
}

#[test]
fn list_elements_carry_no_type_tags() {
    let list = CLValue::list(CLType::U8, vec![CLValue::U8(1), CLValue::U8(2), CLValue::U8(3)])
        .unwrap();
    assert_eq!(vec![3, 0, 0, 0, 1, 2, 3], list.encode().unwrap());
    assert_eq!(vec![14, 3], list.cl_type().to_bytes());
}

#[test]
fn list_rejects_mixed_kinds() {
    let err = CLValue::list(CLType::U8, vec![CLValue::U8(1), CLValue::U32(2)]).unwrap_err();
    match err {
        Error::TypeMismatch { expected, found } => {
            assert_eq!("U8", expected);
            assert_eq!("U32", found);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn option_and_result_tags() {
    assert_eq!(vec![0], CLValue::none(CLType::U8).encode().unwrap());
    assert_eq!(vec![1, 9], CLValue::some(CLValue::U8(9)).encode().unwrap());
    assert_eq!(
        vec![1, 9],
        CLValue::ok(CLValue::U8(9), CLType::String).encode().unwrap()
    );
    assert_eq!(
        vec![0, 1, 0, 0, 0, b'x'],
        CLValue::err(CLType::U8, CLValue::from("x")).encode().unwrap()
    );
}

#[test]
fn byte_array_is_raw() {
    let value = CLValue::ByteArray(vec![0xaa; 32]);
    assert_eq!(vec![0xaa; 32], value.encode().unwrap());
    assert_eq!(CLType::ByteArray(32), value.cl_type());
}

#[test]
fn composite_values_decode_back() {
    let uref = URef::new([3; 32], AccessRights::ReadAddWrite);
    let value = CLValue::tuple3(
        CLValue::map(
            CLType::String,
            CLType::U512,
            vec![
                (CLValue::from("a"), CLValue::U512(U512::from(1u64))),
                (CLValue::from("b"), CLValue::U512(U512::zero())),
            ],
        )
        .unwrap(),
        CLValue::some(CLValue::Key(Key::from(uref))),
        CLValue::ok(CLValue::I64(-5), CLType::Unit),
    );
    let bytes = value.encode().unwrap();
    let decoded = CLValue::decode(&bytes, &value.cl_type()).unwrap();
    assert_eq!(value, decoded);
}

#[test]
fn json_form_reads_back() {
    let value = CLValue::list(
        CLType::PublicKey,
        vec![CLValue::PublicKey(
            PublicKey::from_hex(
                "01d9bf2148748a85c89da5aad8ee0b0fc2d105fd39d41a4c796536354f0ae2900c",
            )
            .unwrap(),
        )],
    )
    .unwrap();
    let json = value.to_json().unwrap();
    assert_eq!(json!({"List": "PublicKey"}), json["cl_type"]);
    assert_eq!(Value::Null, json["parsed"]);
    assert_eq!(value, from_json(json).unwrap());
}

#[test]
fn scalar_parsed_preview() {
    let json = CLValue::U512(U512::from(2_500_000_000u64)).to_json().unwrap();
    assert_eq!(json!("2500000000"), json["parsed"]);
    assert_eq!(json!("U512"), json["cl_type"]);
}

#[test]
fn trailing_bytes_are_reported_at_bytes_path() {
    let err = from_json(json!({"bytes": "e803000000", "cl_type": "I32"})).unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { path, .. } if path == "value.bytes"));
}

#[test]
fn top_level_any_keeps_raw_bytes() {
    let value = CLValue::decode(&[1, 2, 3], &CLType::Any).unwrap();
    assert_eq!(CLValue::Any(vec![1, 2, 3]), value);
}

#[test]
fn nested_any_is_unsupported() {
    let err = CLValue::decode(&[1, 0], &CLType::Option(Box::new(CLType::Any))).unwrap_err();
    assert!(matches!(err, Error::UnsupportedKind(_)));
}

#[test]
fn nested_any_in_json_is_reported_at_bytes_path() {
    let err = from_json(json!({"bytes": "01000000", "cl_type": {"List": "Any"}})).unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { path, .. } if path == "value.bytes"));
}

#[test]
fn huge_list_of_units_is_rejected() {
    let list_of_units = CLType::List(Box::new(CLType::Unit));
    let err = CLValue::decode(&[0xff; 4], &list_of_units).unwrap_err();
    assert!(matches!(err, Error::Formatting(_)));

    let err = from_json(json!({"bytes": "ffffffff", "cl_type": {"List": "Unit"}})).unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { path, .. } if path == "value.bytes"));
}

#[test]
fn list_count_is_bounded_by_remaining_bytes() {
    let err = CLValue::decode(&[0xff; 4], &CLType::List(Box::new(CLType::U32))).unwrap_err();
    assert!(matches!(err, Error::EarlyEndOfStream));

    let map_type = CLType::Map {
        key: Box::new(CLType::U8),
        value: Box::new(CLType::Unit),
    };
    let err = CLValue::decode(&[2, 0, 0, 0, 7], &map_type).unwrap_err();
    assert!(matches!(err, Error::EarlyEndOfStream));
}

#[test]
fn short_list_of_units_decodes() {
    let list_of_units = CLType::List(Box::new(CLType::Unit));
    let value = CLValue::decode(&[3, 0, 0, 0], &list_of_units).unwrap();
    match value {
        CLValue::List { values, .. } => assert_eq!(vec![CLValue::Unit; 3], values),
        other => panic!("unexpected value: {:?}", other),
    }
}

#[test]
fn encode_checks_member_types() {
    let list = CLValue::List {
        element_type: CLType::U8,
        values: vec![CLValue::from("abc")],
    };
    assert!(matches!(list.encode(), Err(Error::TypeMismatch { .. })));
    assert!(list.to_argument_bytes().is_err());

    let option = CLValue::Option {
        inner_type: CLType::U64,
        value: Some(Box::new(CLValue::Bool(true))),
    };
    assert!(matches!(option.encode(), Err(Error::TypeMismatch { .. })));

    let result = CLValue::Result {
        ok_type: CLType::Unit,
        err_type: CLType::String,
        value: Err(Box::new(CLValue::U32(1))),
    };
    assert!(matches!(result.encode(), Err(Error::TypeMismatch { .. })));

    let map = CLValue::Map {
        key_type: CLType::String,
        value_type: CLType::U8,
        entries: vec![(CLValue::from("k"), CLValue::I32(1))],
    };
    assert!(matches!(map.encode(), Err(Error::TypeMismatch { .. })));
}

#[test]
fn display_previews_nested_values() {
    let value = CLValue::tuple2(CLValue::from("a"), CLValue::some(CLValue::U8(1)));
    assert_eq!("(\"a\", Some(1))", value.to_string());
}
