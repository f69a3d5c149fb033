//! Typed results of the supported RPC methods.

use serde_json::Value;

use crate::{
    account::Account,
    deploy::Deploy,
    digest::Digest,
    error::Result,
    execution_result::ExecutionResult,
    json::JsonNode,
};

const RESULT: &str = "result";

/// Result of `chain_get_state_root_hash`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainGetStateRootHashResponse {
    pub api_version: String,
    pub state_root_hash: Digest,
}

impl ChainGetStateRootHashResponse {
    pub fn from_rpc(result: &Value) -> Result<Self> {
        let node = JsonNode::root(result, RESULT);
        Ok(ChainGetStateRootHashResponse {
            api_version: node.field("api_version")?.as_string()?,
            state_root_hash: node.field("state_root_hash")?.digest()?,
        })
    }
}

/// Result of `state_get_account_info`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateGetAccountInfoResponse {
    pub api_version: String,
    pub account: Account,
    /// Hex encoded proof, passed through untouched.
    pub merkle_proof: String,
}

impl StateGetAccountInfoResponse {
    pub fn from_rpc(result: &Value) -> Result<Self> {
        let node = JsonNode::root(result, RESULT);
        Ok(StateGetAccountInfoResponse {
            api_version: node.field("api_version")?.as_string()?,
            account: Account::from_json(&node.field("account")?)?,
            merkle_proof: node.field("merkle_proof")?.as_string()?,
        })
    }
}

/// Result of `info_get_deploy`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfoGetDeployResponse {
    pub api_version: String,
    pub deploy: Deploy,
    /// One entry per block the deploy was executed in. Empty while the deploy is pending.
    pub execution_results: Vec<ExecutionResult>,
}

impl InfoGetDeployResponse {
    pub fn from_rpc(result: &Value) -> Result<Self> {
        let node = JsonNode::root(result, RESULT);
        let execution_results = node
            .field("execution_results")?
            .elements()?
            .iter()
            .map(ExecutionResult::from_json)
            .collect::<Result<Vec<_>>>()?;
        Ok(InfoGetDeployResponse {
            api_version: node.field("api_version")?.as_string()?,
            deploy: Deploy::from_json(&node.field("deploy")?)?,
            execution_results,
        })
    }
}
