use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
fn loads_config_with_default_path() {
    let file = write_config("host = \"127.0.0.1\"\nport = 7777\n");
    let config = load_config_from_file(file.path()).unwrap();
    assert_eq!(NodeConfig::new("127.0.0.1", 7777), config);
    assert_eq!(
        "http://127.0.0.1:7777/rpc",
        config.rpc_url().unwrap().as_str()
    );
}

#[test]
fn custom_path_is_used() {
    let file = write_config("host = \"node.example\"\nport = 11101\npath = \"/json-rpc\"\n");
    let config = load_config_from_file(file.path()).unwrap();
    assert_eq!(
        "http://node.example:11101/json-rpc",
        config.rpc_url().unwrap().as_str()
    );
}

#[test]
fn missing_port_is_a_toml_error() {
    let file = write_config("host = \"127.0.0.1\"\n");
    let err = load_config_from_file(file.path()).unwrap_err();
    assert!(matches!(err, Error::Toml(_)));
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config_from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::FileRead(_)));
}

#[test]
fn user_config_lives_in_home() {
    let path = path_to_user_config_file().unwrap();
    assert!(path.ends_with(CONFIG_FILE));
}

#[test]
fn request_envelope() {
    let request = build_jsonrpc_request(
        7,
        "info_get_deploy",
        json!({ "deploy_hash": "ab" }),
    );
    assert_eq!(
        json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "info_get_deploy",
            "params": { "deploy_hash": "ab" }
        }),
        request
    );
}

#[test]
fn result_is_extracted() {
    let response = json!({"jsonrpc": "2.0", "id": 1, "result": {"api_version": "1.4.6"}});
    assert_eq!(
        json!({"api_version": "1.4.6"}),
        extract_result(response).unwrap()
    );
}

#[test]
fn error_object_is_surfaced() {
    let response = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": {"code": -32602, "message": "invalid params"}
    });
    match extract_result(response).unwrap_err() {
        Error::Rpc { code, message } => {
            assert_eq!(-32602, code);
            assert_eq!("invalid params", message);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn empty_response_has_no_result() {
    let response = json!({"jsonrpc": "2.0", "id": 1, "result": null});
    assert!(matches!(extract_result(response), Err(Error::MissingResult)));
}

#[test]
fn request_ids_increase() {
    let client = JsonRpcHttp::from_config(&NodeConfig::new("127.0.0.1", 7777)).unwrap();
    let first = client.next_id.fetch_add(1, Ordering::Relaxed);
    let second = client.next_id.fetch_add(1, Ordering::Relaxed);
    assert_eq!(first + 1, second);
    assert_eq!("http://127.0.0.1:7777/rpc", client.url().as_str());
}

#[ignore]
#[tokio::test]
async fn state_root_hash() -> Result<()> {
    let client = get_node_http_client()?;
    let res = client.call("chain_get_state_root_hash", json!({})).await?;
    assert!(res.get("state_root_hash").is_some());
    Ok(())
}

#[ignore]
#[tokio::test]
async fn unknown_method_is_an_rpc_error() -> Result<()> {
    let client = get_node_http_client()?;
    let err = client.call("no_such_method", json!({})).await.unwrap_err();
    assert!(matches!(err, Error::Rpc { .. }));
    Ok(())
}
