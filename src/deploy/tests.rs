use super::*;
use crate::{cl_value::CLValue, error::Error, runtime_args::DeployArgument};

const INFO_GET_DEPLOY: &str = include_str!("../../tests/fixtures/info_get_deploy.json");

fn fixture() -> Value {
    serde_json::from_str(INFO_GET_DEPLOY).unwrap()
}

fn parse(deploy: &Value) -> Result<Deploy> {
    Deploy::from_json(&JsonNode::root(deploy, "deploy"))
}

#[test]
fn parses_fixture_deploy() {
    let result = fixture();
    let deploy = parse(&result["deploy"]).unwrap();

    assert_eq!(
        "5c9b3b099c1378aa8e4a5f07f59ff1fcdc69a83179427c7e67ae0377d94d93fa",
        deploy.hash().to_hex()
    );
    let header = deploy.header();
    assert_eq!("casper-example", header.chain_name);
    assert_eq!(1, header.gas_price);
    assert_eq!("1h", header.ttl);
    assert_eq!(vec![Digest::from([1; 32])], header.dependencies);
    assert_eq!(KeyAlgorithm::Ed25519, header.account.algorithm());

    assert_eq!("stored_contract_by_name", deploy.payment().get_type());
    assert_eq!(
        ExecutableDeployItem::Transfer {
            args: vec![DeployArgument::new("amount", CLValue::I32(1000))].into()
        },
        *deploy.session()
    );
}

#[test]
fn approval_signature_keeps_its_tag() {
    let result = fixture();
    let deploy = parse(&result["deploy"]).unwrap();
    let approval = &deploy.approvals()[0];
    assert_eq!(KeyAlgorithm::Ed25519, approval.algorithm());
    assert_eq!(64, approval.signature().len());
    assert_eq!(
        result["deploy"]["approvals"][0]["signature"].as_str().unwrap(),
        hex::encode(approval.signature_with_type())
    );
}

#[test]
fn unknown_payment_tag_fails_the_deploy() {
    let mut result = fixture();
    result["deploy"]["payment"] = json!({"Bogus": {"args": []}});
    let err = parse(&result["deploy"]).unwrap_err();
    assert!(matches!(
        err,
        Error::UnknownVariantTag { path, tag } if path == "deploy.payment" && tag == "Bogus"
    ));
}

#[test]
fn missing_header_field_names_its_path() {
    let mut result = fixture();
    result["deploy"]["header"]
        .as_object_mut()
        .unwrap()
        .remove("gas_price");
    let err = parse(&result["deploy"]).unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedResponse { path, .. } if path == "deploy.header.gas_price"
    ));
}

#[test]
fn empty_signature_is_malformed() {
    let mut result = fixture();
    result["deploy"]["approvals"][0]["signature"] = json!("");
    let err = parse(&result["deploy"]).unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedResponse { path, .. } if path == "deploy.approvals[0].signature"
    ));
}

#[test]
fn json_form_parses_back() {
    let result = fixture();
    let deploy = parse(&result["deploy"]).unwrap();
    let json = deploy.to_json().unwrap();
    assert_eq!(deploy, parse(&json).unwrap());
}

#[test]
fn body_bytes_are_payment_then_session() {
    let result = fixture();
    let deploy = parse(&result["deploy"]).unwrap();
    let mut expected = deploy.payment().to_bytes().unwrap();
    expected.extend(deploy.session().to_bytes().unwrap());
    assert_eq!(expected, deploy.body_bytes().unwrap());
    assert_eq!(2, deploy.body_bytes().unwrap()[0]);
}

#[test]
fn locally_built_deploy_collects_approvals() {
    let result = fixture();
    let parsed = parse(&result["deploy"]).unwrap();
    let mut deploy = Deploy::new(
        *parsed.hash(),
        parsed.header().clone(),
        parsed.payment().clone(),
        parsed.session().clone(),
    );
    assert!(deploy.approvals().is_empty());
    deploy.add_approval(parsed.approvals()[0].clone());
    assert_eq!(parsed, deploy);
}
