use dirs::home_dir;
use serde::Deserialize;
use serde_json::{json, Value};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};

pub mod error;
#[cfg(test)]
mod tests;

// Looked up in the working directory first, then in the home directory:
//   host = "127.0.0.1"
//   port = 7777
//   path = "/rpc"       (optional)
pub const CONFIG_FILE: &str = ".casper-node.toml";
const DEFAULT_RPC_PATH: &str = "/rpc";
const JSONRPC_VERSION: &str = "2.0";

/// Where to reach a node's RPC endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub path: Option<String>,
}

impl NodeConfig {
    pub fn new(host: &str, port: u16) -> Self {
        NodeConfig {
            host: host.to_string(),
            port,
            path: None,
        }
    }

    /// `http://{host}:{port}{path}`, the path defaulting to `/rpc`.
    pub fn rpc_url(&self) -> Result<Url> {
        let path = self.path.as_deref().unwrap_or(DEFAULT_RPC_PATH);
        let url = Url::parse(&format!("http://{}:{}{}", self.host, self.port, path))?;
        Ok(url)
    }
}

pub fn load_config_from_file(config_path: impl AsRef<Path>) -> Result<NodeConfig> {
    let text = fs::read_to_string(config_path.as_ref()).map_err(Error::FileRead)?;
    let config = toml::from_str(&text).map_err(Error::Toml)?;
    Ok(config)
}

pub fn path_to_user_config_file() -> Result<PathBuf> {
    let mut path =
        home_dir().ok_or_else(|| Error::Config("Could not find home directory".to_string()))?;
    path.push(CONFIG_FILE);
    Ok(path)
}

/// Build a client from `./.casper-node.toml`, falling back to `~/.casper-node.toml`.
pub fn get_node_http_client() -> Result<JsonRpcHttp> {
    let local = Path::new(CONFIG_FILE);
    let config = if local.exists() {
        load_config_from_file(local)?
    } else {
        load_config_from_file(path_to_user_config_file()?)?
    };
    JsonRpcHttp::from_config(&config)
}

pub fn build_jsonrpc_request(id: u64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "method": method,
        "params": params
    })
}

/// Pull `result` out of a JSON-RPC response body. An `error` object wins over any result.
pub fn extract_result(mut response: Value) -> Result<Value> {
    if let Some(error) = response.get("error").filter(|error| !error.is_null()) {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        warn!(code, %message, "node returned a JSON-RPC error");
        return Err(Error::Rpc { code, message });
    }
    match response.get_mut("result") {
        Some(result) if !result.is_null() => Ok(result.take()),
        _ => Err(Error::MissingResult),
    }
}

/// JSON-RPC 2.0 over HTTP. One POST per call, no retries.
pub struct JsonRpcHttp {
    url: Url,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl JsonRpcHttp {
    pub fn new(url: Url) -> Self {
        JsonRpcHttp {
            url,
            client: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn from_config(config: &NodeConfig) -> Result<Self> {
        Ok(JsonRpcHttp::new(config.rpc_url()?))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = build_jsonrpc_request(id, method, params);
        debug!(id, method, url = %self.url, "sending JSON-RPC request");
        let res = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?;
        debug!(id, status = %res.status(), "received JSON-RPC response");
        let text = res.error_for_status()?.text().await?;
        let response: Value = serde_json::from_str(&text)?;
        extract_result(response)
    }
}
