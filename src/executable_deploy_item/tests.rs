use super::*;
use crate::{cl_value::CLValue, runtime_args::DeployArgument, uint::U512};

fn parse(value: Value) -> Result<ExecutableDeployItem> {
    ExecutableDeployItem::from_json(&JsonNode::root(&value, "session"))
}

fn amount_arg() -> Value {
    json!(["amount", {"bytes": "e8030000", "cl_type": "I32", "parsed": 1000}])
}

#[test]
fn transfer_with_i32_amount() {
    let item = parse(json!({"Transfer": {"args": [amount_arg()]}})).unwrap();
    let expected = ExecutableDeployItem::Transfer {
        args: vec![DeployArgument::new("amount", CLValue::I32(1000))].into(),
    };
    assert_eq!(expected, item);
    assert_eq!("transfer", item.get_type());
}

#[test]
fn stored_contract_by_name() {
    let item = parse(json!({
        "StoredContractByName": {
            "args": [amount_arg()],
            "entry_point": "example-entry-point",
            "name": "casper-example"
        }
    }))
    .unwrap();
    match &item {
        ExecutableDeployItem::StoredContractByName {
            name, entry_point, ..
        } => {
            assert_eq!("casper-example", name);
            assert_eq!("example-entry-point", entry_point);
        }
        other => panic!("unexpected variant: {:?}", other),
    }
    assert_eq!(Some(&CLValue::I32(1000)), item.args().get("amount"));
}

#[test]
fn versioned_by_hash_version_is_optional() {
    let hash = "01".repeat(32);
    let latest = parse(json!({
        "StoredVersionedContractByHash": {
            "hash": hash, "entry_point": "call", "args": []
        }
    }))
    .unwrap();
    let pinned = parse(json!({
        "StoredVersionedContractByHash": {
            "hash": hash, "entry_point": "call", "version": 2, "args": []
        }
    }))
    .unwrap();
    assert!(matches!(
        latest,
        ExecutableDeployItem::StoredVersionedContractByHash { version: None, .. }
    ));
    assert!(matches!(
        pinned,
        ExecutableDeployItem::StoredVersionedContractByHash {
            version: Some(2),
            ..
        }
    ));
}

#[test]
fn module_bytes_from_hex() {
    let item = parse(json!({
        "ModuleBytes": { "module_bytes": "0061736d", "args": [amount_arg()] }
    }))
    .unwrap();
    match &item {
        ExecutableDeployItem::ModuleBytes { module_bytes, .. } => {
            assert_eq!(&vec![0x00, 0x61, 0x73, 0x6d], module_bytes)
        }
        other => panic!("unexpected variant: {:?}", other),
    }
    assert_eq!("module_bytes", item.get_type());
    assert_eq!(Some(&CLValue::I32(1000)), item.args().get("amount"));
}

#[test]
fn module_bytes_missing_is_reported_at_its_path() {
    let err = parse(json!({"ModuleBytes": {"args": []}})).unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedResponse { path, .. } if path == "session.ModuleBytes.module_bytes"
    ));
}

#[test]
fn stored_contract_by_hash() {
    let item = parse(json!({
        "StoredContractByHash": {
            "hash": "ab".repeat(32), "entry_point": "call", "args": []
        }
    }))
    .unwrap();
    match item {
        ExecutableDeployItem::StoredContractByHash {
            hash, entry_point, ..
        } => {
            assert_eq!(Digest::from([0xab; 32]), hash);
            assert_eq!("call", entry_point);
        }
        other => panic!("unexpected variant: {:?}", other),
    }
}

#[test]
fn stored_contract_by_hash_rejects_bad_hex() {
    let err = parse(json!({
        "StoredContractByHash": { "hash": "zz", "entry_point": "call", "args": [] }
    }))
    .unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedResponse { path, .. } if path == "session.StoredContractByHash.hash"
    ));
}

#[test]
fn unknown_tag_is_rejected() {
    let err = parse(json!({"Bogus": {"args": []}})).unwrap_err();
    match err {
        Error::UnknownVariantTag { path, tag } => {
            assert_eq!("session", path);
            assert_eq!("Bogus", tag);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn missing_entry_point_names_its_path() {
    let err = parse(json!({"StoredContractByName": {"name": "x", "args": []}})).unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedResponse { path, .. } if path == "session.StoredContractByName.entry_point"
    ));
}

#[test]
fn json_form_parses_back() {
    let item = ExecutableDeployItem::StoredVersionedContractByName {
        name: "faucet".to_string(),
        version: Some(1),
        entry_point: "call_faucet".to_string(),
        args: RuntimeArgs::from_named([("amount", CLValue::U512(U512::from(5u64)))]),
    };
    assert_eq!(item, parse(item.to_json().unwrap()).unwrap());
}

#[test]
fn transfer_bytes() {
    let item = ExecutableDeployItem::Transfer {
        args: vec![DeployArgument::new("id", 1u8)].into(),
    };
    let bytes = item.to_bytes().unwrap();
    assert_eq!(
        vec![5, 1, 0, 0, 0, 2, 0, 0, 0, b'i', b'd', 1, 0, 0, 0, 1, 3],
        bytes
    );
    let (decoded, rem) = ExecutableDeployItem::from_bytes(&bytes).unwrap();
    assert!(rem.is_empty());
    assert_eq!(item, decoded);
}

#[test]
fn versioned_by_hash_bytes() {
    let item = ExecutableDeployItem::StoredVersionedContractByHash {
        hash: Digest::from([7; 32]),
        version: Some(3),
        entry_point: "go".to_string(),
        args: RuntimeArgs::new(),
    };
    let bytes = item.to_bytes().unwrap();
    assert_eq!(3, bytes[0]);
    assert_eq!(vec![7; 32], bytes[1..33].to_vec());
    assert_eq!(vec![1, 3, 0, 0, 0], bytes[33..38].to_vec());
    let (decoded, _) = ExecutableDeployItem::from_bytes(&bytes).unwrap();
    assert_eq!(item, decoded);
}

#[test]
fn describe_is_bounded() {
    let item = ExecutableDeployItem::ModuleBytes {
        module_bytes: vec![0; 4096],
        args: RuntimeArgs::from_named([("blob", CLValue::ByteArray(vec![0xab; 1024]))]),
    };
    let description = item.describe();
    assert!(description.starts_with("ExecutableModuleBytes, args: [blob=0xabab"));
    assert!(description.ends_with("(4096 bytes)"));
    assert!(description.len() < 300);
}

#[test]
fn describe_shows_a_module_prefix() {
    let item = ExecutableDeployItem::ModuleBytes {
        module_bytes: vec![0xab; 4096],
        args: RuntimeArgs::default(),
    };
    assert_eq!(
        "ExecutableModuleBytes, args: [], module_bytes: abababababababababab... (4096 bytes)",
        item.describe()
    );
}

#[test]
fn describe_stops_after_the_args_preview() {
    let args: Vec<DeployArgument> = (0..10_000)
        .map(|i| DeployArgument::new(format!("arg{}", i), CLValue::U64(i)))
        .collect();
    let item = ExecutableDeployItem::Transfer { args: args.into() };
    let description = item.describe();
    assert!(description.starts_with("ExecutableTransfer, args: [arg0=0, arg1=1, "));
    assert!(description.ends_with("...]"));
    assert!(description.len() < 200);
}

#[test]
fn describe_transfer() {
    let item = ExecutableDeployItem::Transfer {
        args: vec![DeployArgument::new("amount", CLValue::I32(1000))].into(),
    };
    assert_eq!("ExecutableTransfer, args: [amount=1000]", item.describe());
}
