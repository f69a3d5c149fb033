#![warn(missing_docs)]

//! Client library for Casper nodes.
//!
//! Values passed to contracts are modelled as [`CLValue`]s with their canonical byte encoding,
//! deploys and execution results are parsed from the node's tag-keyed JSON into closed enums,
//! and [`CasperClient`] ties the typed responses to an [`RpcTransport`].

pub use client::{CasperClient, RpcTransport};
pub use cl_type::CLType;
pub use cl_value::CLValue;
pub use deploy::{Deploy, DeployApproval, DeployHeader};
pub use digest::Digest;
pub use error::{Error, Result};
pub use executable_deploy_item::ExecutableDeployItem;
pub use execution_result::ExecutionResult;
pub use key::{AccessRights, AccountHash, Key, URef};
pub use public_key::{KeyAlgorithm, PublicKey};
pub use runtime_args::{DeployArgument, RuntimeArgs};
pub use uint::{U128, U256, U512};

/// Account records returned by `state_get_account_info`
pub mod account;
/// Canonical little-endian byte format primitives
pub mod bytesrepr;
pub mod cl_type;
pub mod cl_value;
/// Async client facade and transport trait
pub mod client;
pub mod deploy;
pub mod digest;
pub mod error;
pub mod executable_deploy_item;
pub mod execution_result;
/// Path-tracking navigation over untyped JSON
pub mod json;
pub mod key;
pub mod public_key;
pub mod responses;
pub mod runtime_args;
pub mod uint;
