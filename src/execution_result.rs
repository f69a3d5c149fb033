//! The outcome of executing a deploy in a block, as reported by `info_get_deploy`.

use serde_json::{json, Map, Value};

use crate::{
    account::NamedKey,
    cl_value::CLValue,
    digest::Digest,
    error::{Error, Result},
    json::JsonNode,
    key::{AccountHash, URef},
    uint::{U128, U256, U512},
};


#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutionResult {
    Success {
        block_hash: Digest,
        cost: U512,
        effect: ExecutionEffect,
        transfers: Vec<String>,
    },
    Failure {
        block_hash: Digest,
        cost: U512,
        effect: ExecutionEffect,
        transfers: Vec<String>,
        error_message: String,
    },
}

impl ExecutionResult {
    pub fn block_hash(&self) -> &Digest {
        match self {
            ExecutionResult::Success { block_hash, .. }
            | ExecutionResult::Failure { block_hash, .. } => block_hash,
        }
    }

    /// Gas cost in motes.
    pub fn cost(&self) -> U512 {
        match self {
            ExecutionResult::Success { cost, .. } | ExecutionResult::Failure { cost, .. } => *cost,
        }
    }

    pub fn effect(&self) -> &ExecutionEffect {
        match self {
            ExecutionResult::Success { effect, .. } | ExecutionResult::Failure { effect, .. } => {
                effect
            }
        }
    }

    /// Transfer identifiers (`transfer-<hex>`) in the order the node listed them.
    pub fn transfers(&self) -> &[String] {
        match self {
            ExecutionResult::Success { transfers, .. }
            | ExecutionResult::Failure { transfers, .. } => transfers,
        }
    }

    /// Present only for failed executions.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            ExecutionResult::Success { .. } => None,
            ExecutionResult::Failure { error_message, .. } => Some(error_message),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success { .. })
    }

    /// Parse `{block_hash, result: {Success | Failure: {...}}}`.
    pub fn from_json(node: &JsonNode) -> Result<Self> {
        let block_hash = node.field("block_hash")?.digest()?;
        let result = node.field("result")?;
        let (tag, outcome) = result.single_tag()?;
        let succeeded = match tag {
            "Success" => true,
            "Failure" => false,
            other => return Err(Error::unknown_tag(result.path(), other)),
        };

        let cost = outcome.field("cost")?.u512()?;
        let effect = ExecutionEffect::from_json(&outcome.field("effect")?)?;
        let transfers = outcome
            .field("transfers")?
            .elements()?
            .iter()
            .map(JsonNode::as_string)
            .collect::<Result<Vec<_>>>()?;

        if succeeded {
            if outcome.optional_field("error_message")?.is_some() {
                return Err(outcome.malformed("successful result carries an error_message"));
            }
            Ok(ExecutionResult::Success {
                block_hash,
                cost,
                effect,
                transfers,
            })
        } else {
            Ok(ExecutionResult::Failure {
                block_hash,
                cost,
                effect,
                transfers,
                error_message: outcome.field("error_message")?.as_string()?,
            })
        }
    }

    pub fn to_json(&self) -> Result<Value> {
        let mut outcome = json!({
            "cost": self.cost().to_string(),
            "effect": self.effect().to_json()?,
            "transfers": self.transfers(),
        });
        let tag = match self {
            ExecutionResult::Success { .. } => "Success",
            ExecutionResult::Failure { error_message, .. } => {
                outcome["error_message"] = json!(error_message);
                "Failure"
            }
        };
        let mut result = Map::new();
        result.insert(tag.to_string(), outcome);
        Ok(json!({
            "block_hash": self.block_hash().to_hex(),
            "result": result,
        }))
    }
}

/// Global state reads and writes performed by an execution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionEffect {
    pub operations: Vec<Operation>,
    pub transforms: Vec<TransformEntry>,
}

impl ExecutionEffect {
    pub fn from_json(node: &JsonNode) -> Result<Self> {
        let operations = node
            .field("operations")?
            .elements()?
            .iter()
            .map(Operation::from_json)
            .collect::<Result<Vec<_>>>()?;
        let transforms = node
            .field("transforms")?
            .elements()?
            .iter()
            .map(TransformEntry::from_json)
            .collect::<Result<Vec<_>>>()?;
        Ok(ExecutionEffect {
            operations,
            transforms,
        })
    }

    pub fn to_json(&self) -> Result<Value> {
        let operations: Vec<Value> = self.operations.iter().map(Operation::to_json).collect();
        let transforms = self
            .transforms
            .iter()
            .map(TransformEntry::to_json)
            .collect::<Result<Vec<_>>>()?;
        Ok(json!({ "operations": operations, "transforms": transforms }))
    }
}

#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
    Read,
    Write,
    Add,
    NoOp,
}

impl OpKind {
    pub fn name(self) -> &'static str {
        match self {
            OpKind::Read => "Read",
            OpKind::Write => "Write",
            OpKind::Add => "Add",
            OpKind::NoOp => "NoOp",
        }
    }

    pub fn from_json(node: &JsonNode) -> Result<Self> {
        match node.as_str()? {
            "Read" => Ok(OpKind::Read),
            "Write" => Ok(OpKind::Write),
            "Add" => Ok(OpKind::Add),
            "NoOp" => Ok(OpKind::NoOp),
            other => Err(Error::unknown_tag(node.path(), other)),
        }
    }
}

/// An operation on the global state entry at `key`.
///
/// Keys stay strings: besides accounts, hashes and urefs the node reports deploy, transfer and
/// era keys here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    pub key: String,
    pub kind: OpKind,
}

impl Operation {
    pub fn from_json(node: &JsonNode) -> Result<Self> {
        Ok(Operation {
            key: node.field("key")?.as_string()?,
            kind: OpKind::from_json(&node.field("kind")?)?,
        })
    }

    pub fn to_json(&self) -> Value {
        json!({ "key": self.key, "kind": self.kind.name() })
    }
}

/// A [`Transform`] applied to the entry at `key`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformEntry {
    pub key: String,
    pub transform: Transform,
}

impl TransformEntry {
    pub fn from_json(node: &JsonNode) -> Result<Self> {
        Ok(TransformEntry {
            key: node.field("key")?.as_string()?,
            transform: Transform::from_json(&node.field("transform")?)?,
        })
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(json!({ "key": self.key, "transform": self.transform.to_json()? }))
    }
}

/// A change to one global state entry.
///
/// Stored values without a model in this crate are kept as the node's JSON.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transform {
    Identity,
    WriteCLValue(CLValue),
    WriteAccount(AccountHash),
    WriteContractWasm,
    WriteContract,
    WriteContractPackage,
    WriteDeployInfo(Value),
    WriteEraInfo(Value),
    WriteTransfer(Transfer),
    WriteBid(Value),
    WriteWithdraw(Value),
    AddInt32(i32),
    AddUInt64(u64),
    AddUInt128(U128),
    AddUInt256(U256),
    AddUInt512(U512),
    AddKeys(Vec<NamedKey>),
    Failure(String),
}

impl Transform {
    pub fn from_json(node: &JsonNode) -> Result<Self> {
        if let Value::String(name) = node.value() {
            return match name.as_str() {
                "Identity" => Ok(Transform::Identity),
                "WriteContractWasm" => Ok(Transform::WriteContractWasm),
                "WriteContract" => Ok(Transform::WriteContract),
                "WriteContractPackage" => Ok(Transform::WriteContractPackage),
                other => Err(Error::unknown_tag(node.path(), other)),
            };
        }

        let (tag, payload) = node.single_tag()?;
        let transform = match tag {
            "WriteCLValue" => Transform::WriteCLValue(CLValue::from_json(&payload)?),
            "WriteAccount" => Transform::WriteAccount(payload.account_hash()?),
            "WriteDeployInfo" => Transform::WriteDeployInfo(payload.value().clone()),
            "WriteEraInfo" => Transform::WriteEraInfo(payload.value().clone()),
            "WriteTransfer" => Transform::WriteTransfer(Transfer::from_json(&payload)?),
            "WriteBid" => Transform::WriteBid(payload.value().clone()),
            "WriteWithdraw" => Transform::WriteWithdraw(payload.value().clone()),
            "AddInt32" => Transform::AddInt32(payload.as_i32()?),
            "AddUInt64" => Transform::AddUInt64(payload.as_u64()?),
            "AddUInt128" => {
                Transform::AddUInt128(payload.at_path(U128::from_decimal(payload.as_str()?))?)
            }
            "AddUInt256" => {
                Transform::AddUInt256(payload.at_path(U256::from_decimal(payload.as_str()?))?)
            }
            "AddUInt512" => Transform::AddUInt512(payload.u512()?),
            "AddKeys" => Transform::AddKeys(
                payload
                    .elements()?
                    .iter()
                    .map(NamedKey::from_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            "Failure" => Transform::Failure(payload.as_string()?),
            other => return Err(Error::unknown_tag(node.path(), other)),
        };
        Ok(transform)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transform::Identity => "Identity",
            Transform::WriteCLValue(_) => "WriteCLValue",
            Transform::WriteAccount(_) => "WriteAccount",
            Transform::WriteContractWasm => "WriteContractWasm",
            Transform::WriteContract => "WriteContract",
            Transform::WriteContractPackage => "WriteContractPackage",
            Transform::WriteDeployInfo(_) => "WriteDeployInfo",
            Transform::WriteEraInfo(_) => "WriteEraInfo",
            Transform::WriteTransfer(_) => "WriteTransfer",
            Transform::WriteBid(_) => "WriteBid",
            Transform::WriteWithdraw(_) => "WriteWithdraw",
            Transform::AddInt32(_) => "AddInt32",
            Transform::AddUInt64(_) => "AddUInt64",
            Transform::AddUInt128(_) => "AddUInt128",
            Transform::AddUInt256(_) => "AddUInt256",
            Transform::AddUInt512(_) => "AddUInt512",
            Transform::AddKeys(_) => "AddKeys",
            Transform::Failure(_) => "Failure",
        }
    }

    pub fn to_json(&self) -> Result<Value> {
        let payload = match self {
            Transform::Identity
            | Transform::WriteContractWasm
            | Transform::WriteContract
            | Transform::WriteContractPackage => return Ok(json!(self.name())),
            Transform::WriteCLValue(value) => value.to_json()?,
            Transform::WriteAccount(account_hash) => json!(account_hash.to_formatted_string()),
            Transform::WriteDeployInfo(raw)
            | Transform::WriteEraInfo(raw)
            | Transform::WriteBid(raw)
            | Transform::WriteWithdraw(raw) => raw.clone(),
            Transform::WriteTransfer(transfer) => transfer.to_json(),
            Transform::AddInt32(value) => json!(value),
            Transform::AddUInt64(value) => json!(value),
            Transform::AddUInt128(value) => json!(value.to_string()),
            Transform::AddUInt256(value) => json!(value.to_string()),
            Transform::AddUInt512(value) => json!(value.to_string()),
            Transform::AddKeys(keys) => {
                Value::Array(keys.iter().map(NamedKey::to_json).collect())
            }
            Transform::Failure(message) => json!(message),
        };
        let mut tagged = Map::new();
        tagged.insert(self.name().to_string(), payload);
        Ok(Value::Object(tagged))
    }
}

/// A record of a transfer of motes between purses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub deploy_hash: Digest,
    pub from: AccountHash,
    pub to: Option<AccountHash>,
    pub source: URef,
    pub target: URef,
    pub amount: U512,
    pub gas: U512,
    pub id: Option<u64>,
}

impl Transfer {
    pub fn from_json(node: &JsonNode) -> Result<Self> {
        Ok(Transfer {
            deploy_hash: node.field("deploy_hash")?.digest()?,
            from: node.field("from")?.account_hash()?,
            to: node
                .optional_field("to")?
                .map(|to| to.account_hash())
                .transpose()?,
            source: node.field("source")?.uref()?,
            target: node.field("target")?.uref()?,
            amount: node.field("amount")?.u512()?,
            gas: node.field("gas")?.u512()?,
            id: node.optional_field("id")?.map(|id| id.as_u64()).transpose()?,
        })
    }

    pub fn to_json(&self) -> Value {
        json!({
            "deploy_hash": self.deploy_hash.to_hex(),
            "from": self.from.to_formatted_string(),
            "to": self.to.map(|to| to.to_formatted_string()),
            "source": self.source.to_formatted_string(),
            "target": self.target.to_formatted_string(),
            "amount": self.amount.to_string(),
            "gas": self.gas.to_string(),
            "id": self.id,
        })
    }
}
