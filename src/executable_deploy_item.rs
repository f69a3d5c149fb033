use std::fmt::{self, Display, Formatter, Write};

use serde_json::{json, Map, Value};

use crate::{
    bytesrepr,
    digest::Digest,
    error::{Error, Result},
    json::JsonNode,
    runtime_args::RuntimeArgs,
};

#[cfg(test)]
mod tests;

const MODULE_BYTES_TAG: u8 = 0;
const STORED_CONTRACT_BY_HASH_TAG: u8 = 1;
const STORED_CONTRACT_BY_NAME_TAG: u8 = 2;
const STORED_VERSIONED_CONTRACT_BY_HASH_TAG: u8 = 3;
const STORED_VERSIONED_CONTRACT_BY_NAME_TAG: u8 = 4;
const TRANSFER_TAG: u8 = 5;

const MODULE_BYTES_PREVIEW_LEN: usize = 20;
const ARGS_PREVIEW_LEN: usize = 120;

/// The payment or session code of a [`Deploy`](crate::deploy::Deploy).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutableDeployItem {
    /// Raw Wasm bytes and the arguments to call them with.
    ModuleBytes {
        module_bytes: Vec<u8>,
        args: RuntimeArgs,
    },
    /// A contract stored in global state, referenced by its hash.
    StoredContractByHash {
        hash: Digest,
        entry_point: String,
        args: RuntimeArgs,
    },
    /// A contract stored under a named key of the deploy's account.
    StoredContractByName {
        name: String,
        entry_point: String,
        args: RuntimeArgs,
    },
    /// A contract package referenced by its hash. `None` picks the highest enabled version.
    StoredVersionedContractByHash {
        hash: Digest,
        version: Option<u32>,
        entry_point: String,
        args: RuntimeArgs,
    },
    /// A contract package stored under a named key. `None` picks the highest enabled version.
    StoredVersionedContractByName {
        name: String,
        version: Option<u32>,
        entry_point: String,
        args: RuntimeArgs,
    },
    /// A native transfer.
    Transfer { args: RuntimeArgs },
}

impl ExecutableDeployItem {
    pub fn args(&self) -> &RuntimeArgs {
        match self {
            ExecutableDeployItem::ModuleBytes { args, .. }
            | ExecutableDeployItem::StoredContractByHash { args, .. }
            | ExecutableDeployItem::StoredContractByName { args, .. }
            | ExecutableDeployItem::StoredVersionedContractByHash { args, .. }
            | ExecutableDeployItem::StoredVersionedContractByName { args, .. }
            | ExecutableDeployItem::Transfer { args } => args,
        }
    }

    /// The JSON tag naming this variant.
    pub fn tag_name(&self) -> &'static str {
        match self {
            ExecutableDeployItem::ModuleBytes { .. } => "ModuleBytes",
            ExecutableDeployItem::StoredContractByHash { .. } => "StoredContractByHash",
            ExecutableDeployItem::StoredContractByName { .. } => "StoredContractByName",
            ExecutableDeployItem::StoredVersionedContractByHash { .. } => {
                "StoredVersionedContractByHash"
            }
            ExecutableDeployItem::StoredVersionedContractByName { .. } => {
                "StoredVersionedContractByName"
            }
            ExecutableDeployItem::Transfer { .. } => "Transfer",
        }
    }

    pub fn get_type(&self) -> &'static str {
        match self {
            ExecutableDeployItem::ModuleBytes { .. } => "module_bytes",
            ExecutableDeployItem::StoredContractByHash { .. } => "stored_contract_by_hash",
            ExecutableDeployItem::StoredContractByName { .. } => "stored_contract_by_name",
            ExecutableDeployItem::StoredVersionedContractByHash { .. } => {
                "stored_versioned_contract_by_hash"
            }
            ExecutableDeployItem::StoredVersionedContractByName { .. } => {
                "stored_versioned_contract_by_name"
            }
            ExecutableDeployItem::Transfer { .. } => "transfer",
        }
    }

    /// A one-line summary for diagnostics. Long argument lists and Wasm payloads are cut short.
    pub fn describe(&self) -> String {
        let args = preview_args(self.args());
        match self {
            ExecutableDeployItem::ModuleBytes { module_bytes, .. } => {
                let prefix_len = module_bytes.len().min(MODULE_BYTES_PREVIEW_LEN / 2);
                let shown = hex::encode(&module_bytes[..prefix_len]);
                format!(
                    "ExecutableModuleBytes, args: {}, module_bytes: {}... ({} bytes)",
                    args,
                    shown,
                    module_bytes.len()
                )
            }
            ExecutableDeployItem::StoredContractByHash {
                hash, entry_point, ..
            } => format!(
                "ExecutableStoredContractByHash, args: {}, hash: {}, entry_point: {}",
                args,
                hash.to_hex(),
                entry_point
            ),
            ExecutableDeployItem::StoredContractByName {
                name, entry_point, ..
            } => format!(
                "ExecutableStoredContractByName, args: {}, name: {}, entry_point: {}",
                args, name, entry_point
            ),
            ExecutableDeployItem::StoredVersionedContractByHash {
                hash,
                version,
                entry_point,
                ..
            } => format!(
                "ExecutableStoredVersionedContractByHash, args: {}, hash: {}, entry_point: {}, version: {}",
                args,
                hash.to_hex(),
                entry_point,
                preview_version(version)
            ),
            ExecutableDeployItem::StoredVersionedContractByName {
                name,
                version,
                entry_point,
                ..
            } => format!(
                "ExecutableStoredVersionedContractByName, args: {}, name: {}, entry_point: {}, version: {}",
                args,
                name,
                entry_point,
                preview_version(version)
            ),
            ExecutableDeployItem::Transfer { .. } => format!("ExecutableTransfer, args: {}", args),
        }
    }

    /// Dispatch on the single tag key of `node`.
    pub fn from_json(node: &JsonNode) -> Result<Self> {
        let (tag, item) = node.single_tag()?;
        let args = || -> Result<RuntimeArgs> { RuntimeArgs::from_json(&item.field("args")?) };
        let version = || -> Result<Option<u32>> {
            item.optional_field("version")?
                .map(|version| version.as_u32())
                .transpose()
        };

        let deploy_item = match tag {
            "ModuleBytes" => ExecutableDeployItem::ModuleBytes {
                module_bytes: item.field("module_bytes")?.hex_bytes()?,
                args: args()?,
            },
            "StoredContractByHash" => ExecutableDeployItem::StoredContractByHash {
                hash: item.field("hash")?.digest()?,
                entry_point: item.field("entry_point")?.as_string()?,
                args: args()?,
            },
            "StoredContractByName" => ExecutableDeployItem::StoredContractByName {
                name: item.field("name")?.as_string()?,
                entry_point: item.field("entry_point")?.as_string()?,
                args: args()?,
            },
            "StoredVersionedContractByHash" => {
                ExecutableDeployItem::StoredVersionedContractByHash {
                    hash: item.field("hash")?.digest()?,
                    version: version()?,
                    entry_point: item.field("entry_point")?.as_string()?,
                    args: args()?,
                }
            }
            "StoredVersionedContractByName" => {
                ExecutableDeployItem::StoredVersionedContractByName {
                    name: item.field("name")?.as_string()?,
                    version: version()?,
                    entry_point: item.field("entry_point")?.as_string()?,
                    args: args()?,
                }
            }
            "Transfer" => ExecutableDeployItem::Transfer { args: args()? },
            other => return Err(Error::unknown_tag(node.path(), other)),
        };
        Ok(deploy_item)
    }

    pub fn to_json(&self) -> Result<Value> {
        let args = self.args().to_json()?;
        let body = match self {
            ExecutableDeployItem::ModuleBytes { module_bytes, .. } => json!({
                "module_bytes": hex::encode(module_bytes),
                "args": args,
            }),
            ExecutableDeployItem::StoredContractByHash {
                hash, entry_point, ..
            } => json!({
                "hash": hash.to_hex(),
                "entry_point": entry_point,
                "args": args,
            }),
            ExecutableDeployItem::StoredContractByName {
                name, entry_point, ..
            } => json!({
                "name": name,
                "entry_point": entry_point,
                "args": args,
            }),
            ExecutableDeployItem::StoredVersionedContractByHash {
                hash,
                version,
                entry_point,
                ..
            } => json!({
                "hash": hash.to_hex(),
                "version": version,
                "entry_point": entry_point,
                "args": args,
            }),
            ExecutableDeployItem::StoredVersionedContractByName {
                name,
                version,
                entry_point,
                ..
            } => json!({
                "name": name,
                "version": version,
                "entry_point": entry_point,
                "args": args,
            }),
            ExecutableDeployItem::Transfer { .. } => json!({ "args": args }),
        };
        let mut tagged = Map::new();
        tagged.insert(self.tag_name().to_string(), body);
        Ok(Value::Object(tagged))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        match self {
            ExecutableDeployItem::ModuleBytes { module_bytes, args } => {
                buffer.push(MODULE_BYTES_TAG);
                buffer.extend(bytesrepr::encode_bytes(module_bytes)?);
                buffer.extend(args.to_bytes()?);
            }
            ExecutableDeployItem::StoredContractByHash {
                hash,
                entry_point,
                args,
            } => {
                buffer.push(STORED_CONTRACT_BY_HASH_TAG);
                buffer.extend_from_slice(hash.as_ref());
                buffer.extend(bytesrepr::encode_string(entry_point)?);
                buffer.extend(args.to_bytes()?);
            }
            ExecutableDeployItem::StoredContractByName {
                name,
                entry_point,
                args,
            } => {
                buffer.push(STORED_CONTRACT_BY_NAME_TAG);
                buffer.extend(bytesrepr::encode_string(name)?);
                buffer.extend(bytesrepr::encode_string(entry_point)?);
                buffer.extend(args.to_bytes()?);
            }
            ExecutableDeployItem::StoredVersionedContractByHash {
                hash,
                version,
                entry_point,
                args,
            } => {
                buffer.push(STORED_VERSIONED_CONTRACT_BY_HASH_TAG);
                buffer.extend_from_slice(hash.as_ref());
                buffer.extend(encode_version(version));
                buffer.extend(bytesrepr::encode_string(entry_point)?);
                buffer.extend(args.to_bytes()?);
            }
            ExecutableDeployItem::StoredVersionedContractByName {
                name,
                version,
                entry_point,
                args,
            } => {
                buffer.push(STORED_VERSIONED_CONTRACT_BY_NAME_TAG);
                buffer.extend(bytesrepr::encode_string(name)?);
                buffer.extend(encode_version(version));
                buffer.extend(bytesrepr::encode_string(entry_point)?);
                buffer.extend(args.to_bytes()?);
            }
            ExecutableDeployItem::Transfer { args } => {
                buffer.push(TRANSFER_TAG);
                buffer.extend(args.to_bytes()?);
            }
        }
        Ok(buffer)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8])> {
        let (tag, rem) = bytesrepr::decode_u8(bytes)?;
        match tag {
            MODULE_BYTES_TAG => {
                let (module_bytes, rem) = bytesrepr::decode_bytes(rem)?;
                let (args, rem) = RuntimeArgs::from_bytes(rem)?;
                Ok((ExecutableDeployItem::ModuleBytes { module_bytes, args }, rem))
            }
            STORED_CONTRACT_BY_HASH_TAG => {
                let (hash, rem) = Digest::from_bytes(rem)?;
                let (entry_point, rem) = bytesrepr::decode_string(rem)?;
                let (args, rem) = RuntimeArgs::from_bytes(rem)?;
                Ok((
                    ExecutableDeployItem::StoredContractByHash {
                        hash,
                        entry_point,
                        args,
                    },
                    rem,
                ))
            }
            STORED_CONTRACT_BY_NAME_TAG => {
                let (name, rem) = bytesrepr::decode_string(rem)?;
                let (entry_point, rem) = bytesrepr::decode_string(rem)?;
                let (args, rem) = RuntimeArgs::from_bytes(rem)?;
                Ok((
                    ExecutableDeployItem::StoredContractByName {
                        name,
                        entry_point,
                        args,
                    },
                    rem,
                ))
            }
            STORED_VERSIONED_CONTRACT_BY_HASH_TAG => {
                let (hash, rem) = Digest::from_bytes(rem)?;
                let (version, rem) = decode_version(rem)?;
                let (entry_point, rem) = bytesrepr::decode_string(rem)?;
                let (args, rem) = RuntimeArgs::from_bytes(rem)?;
                Ok((
                    ExecutableDeployItem::StoredVersionedContractByHash {
                        hash,
                        version,
                        entry_point,
                        args,
                    },
                    rem,
                ))
            }
            STORED_VERSIONED_CONTRACT_BY_NAME_TAG => {
                let (name, rem) = bytesrepr::decode_string(rem)?;
                let (version, rem) = decode_version(rem)?;
                let (entry_point, rem) = bytesrepr::decode_string(rem)?;
                let (args, rem) = RuntimeArgs::from_bytes(rem)?;
                Ok((
                    ExecutableDeployItem::StoredVersionedContractByName {
                        name,
                        version,
                        entry_point,
                        args,
                    },
                    rem,
                ))
            }
            TRANSFER_TAG => {
                let (args, rem) = RuntimeArgs::from_bytes(rem)?;
                Ok((ExecutableDeployItem::Transfer { args }, rem))
            }
            other => Err(Error::Formatting(format!(
                "invalid executable deploy item tag {}",
                other
            ))),
        }
    }
}

impl Display for ExecutableDeployItem {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

fn encode_version(version: &Option<u32>) -> Vec<u8> {
    match version {
        None => vec![0],
        Some(version) => {
            let mut bytes = vec![1];
            bytes.extend(bytesrepr::encode_u32(*version));
            bytes
        }
    }
}

fn decode_version(bytes: &[u8]) -> Result<(Option<u32>, &[u8])> {
    match bytesrepr::decode_u8(bytes)? {
        (0, rem) => Ok((None, rem)),
        (1, rem) => {
            let (version, rem) = bytesrepr::decode_u32(rem)?;
            Ok((Some(version), rem))
        }
        (other, _) => Err(Error::Formatting(format!("invalid option tag {}", other))),
    }
}

fn preview_version(version: &Option<u32>) -> String {
    version.map_or_else(|| "latest".to_string(), |v| v.to_string())
}

/// Collects at most `limit` characters and fails the write once more arrive.
struct BoundedWriter {
    text: String,
    remaining: usize,
}

impl Write for BoundedWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.remaining == 0 {
                return Err(fmt::Error);
            }
            self.text.push(c);
            self.remaining -= 1;
        }
        Ok(())
    }
}

fn preview_args(args: &RuntimeArgs) -> String {
    let mut writer = BoundedWriter {
        text: String::new(),
        remaining: ARGS_PREVIEW_LEN,
    };
    let complete = args.iter().enumerate().try_for_each(|(i, arg)| {
        if i > 0 {
            writer.write_str(", ")?;
        }
        write!(writer, "{}={}", arg.name(), arg.value())
    });
    match complete {
        Ok(()) => format!("[{}]", writer.text),
        Err(_) => format!("[{}...]", writer.text),
    }
}
