use serde_json::{json, Value};

use crate::{
    error::Result,
    json::JsonNode,
    key::{AccountHash, Key, URef},
};

/// A key stored under a name in an account's or contract's context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedKey {
    pub name: String,
    pub key: Key,
}

impl NamedKey {
    pub fn from_json(node: &JsonNode) -> Result<Self> {
        Ok(NamedKey {
            name: node.field("name")?.as_string()?,
            key: node.field("key")?.key()?,
        })
    }

    pub fn to_json(&self) -> Value {
        json!({ "name": self.name, "key": self.key.to_formatted_string() })
    }
}

/// An account allowed to sign for another, with its signing weight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssociatedKey {
    pub account_hash: AccountHash,
    pub weight: u8,
}

/// Weights that signatures must reach before the account can act.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ActionThresholds {
    pub deployment: u8,
    pub key_management: u8,
}

#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub account_hash: AccountHash,
    pub named_keys: Vec<NamedKey>,
    pub main_purse: URef,
    pub associated_keys: Vec<AssociatedKey>,
    pub action_thresholds: ActionThresholds,
}

impl Account {
    pub fn from_json(node: &JsonNode) -> Result<Self> {
        let named_keys = node
            .field("named_keys")?
            .elements()?
            .iter()
            .map(NamedKey::from_json)
            .collect::<Result<Vec<_>>>()?;
        let associated_keys = node
            .field("associated_keys")?
            .elements()?
            .iter()
            .map(|associated| -> Result<AssociatedKey> {
                Ok(AssociatedKey {
                    account_hash: associated.field("account_hash")?.account_hash()?,
                    weight: associated.field("weight")?.as_u8()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let thresholds = node.field("action_thresholds")?;

        Ok(Account {
            account_hash: node.field("account_hash")?.account_hash()?,
            named_keys,
            main_purse: node.field("main_purse")?.uref()?,
            associated_keys,
            action_thresholds: ActionThresholds {
                deployment: thresholds.field("deployment")?.as_u8()?,
                key_management: thresholds.field("key_management")?.as_u8()?,
            },
        })
    }

    pub fn to_json(&self) -> Value {
        let named_keys: Vec<Value> = self.named_keys.iter().map(NamedKey::to_json).collect();
        let associated_keys: Vec<Value> = self
            .associated_keys
            .iter()
            .map(|associated| {
                json!({
                    "account_hash": associated.account_hash.to_formatted_string(),
                    "weight": associated.weight,
                })
            })
            .collect();
        json!({
            "account_hash": self.account_hash.to_formatted_string(),
            "named_keys": named_keys,
            "main_purse": self.main_purse.to_formatted_string(),
            "associated_keys": associated_keys,
            "action_thresholds": {
                "deployment": self.action_thresholds.deployment,
                "key_management": self.action_thresholds.key_management,
            },
        })
    }

    /// The key stored under `name`, if any.
    pub fn named_key(&self, name: &str) -> Option<&Key> {
        self.named_keys
            .iter()
            .find(|named| named.name == name)
            .map(|named| &named.key)
    }
}
