use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    digest::Digest,
    error::{Error, Result},
    public_key::PublicKey,
    responses::{
        ChainGetStateRootHashResponse, InfoGetDeployResponse, StateGetAccountInfoResponse,
    },
};

/// RPC method returning the current global state root hash.
pub const CHAIN_GET_STATE_ROOT_HASH: &str = "chain_get_state_root_hash";
/// RPC method returning an account by its public key.
pub const STATE_GET_ACCOUNT_INFO: &str = "state_get_account_info";
/// RPC method returning a deploy and its execution results.
pub const INFO_GET_DEPLOY: &str = "info_get_deploy";

/// Carries one RPC call to a node and hands back the raw `result` tree.
///
/// Implementations report any network, HTTP or JSON-RPC failure as [`Error::Transport`] and do
/// not retry.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Send `method` with `params`, returning the untyped result.
    async fn send(&self, method: &str, params: Value) -> Result<Value>;
}

#[async_trait]
impl RpcTransport for casper_node_http_client::JsonRpcHttp {
    async fn send(&self, method: &str, params: Value) -> Result<Value> {
        self.call(method, params)
            .await
            .map_err(|e| Error::Transport(Box::new(e)))
    }
}

/// Typed access to a node over any [`RpcTransport`].
pub struct CasperClient<T> {
    transport: T,
}

impl<T: RpcTransport> CasperClient<T> {
    pub fn new(transport: T) -> Self {
        CasperClient { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn chain_get_state_root_hash(&self) -> Result<ChainGetStateRootHashResponse> {
        let result = self.request(CHAIN_GET_STATE_ROOT_HASH, json!({})).await?;
        ChainGetStateRootHashResponse::from_rpc(&result)
    }

    pub async fn state_get_account_info(
        &self,
        public_key: &PublicKey,
    ) -> Result<StateGetAccountInfoResponse> {
        let params = json!({ "public_key": public_key.to_hex() });
        let result = self.request(STATE_GET_ACCOUNT_INFO, params).await?;
        StateGetAccountInfoResponse::from_rpc(&result)
    }

    pub async fn info_get_deploy(&self, deploy_hash: &Digest) -> Result<InfoGetDeployResponse> {
        let params = json!({ "deploy_hash": deploy_hash.to_hex() });
        let result = self.request(INFO_GET_DEPLOY, params).await?;
        InfoGetDeployResponse::from_rpc(&result)
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        debug!(method, %params, "calling node");
        let result = self.transport.send(method, params).await;
        if let Err(e) = &result {
            debug!(method, error = %e, "node call failed");
        }
        result
    }
}
