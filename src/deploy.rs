use serde_json::{json, Value};

use crate::{
    digest::Digest,
    error::Result,
    executable_deploy_item::ExecutableDeployItem,
    json::JsonNode,
    public_key::{KeyAlgorithm, PublicKey},
};

#[cfg(test)]
mod tests;

/// A signature over a deploy hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployApproval {
    signer: PublicKey,
    signature: Vec<u8>,
    algorithm: KeyAlgorithm,
}

impl DeployApproval {
    pub fn new(signer: PublicKey, algorithm: KeyAlgorithm, signature: Vec<u8>) -> Self {
        DeployApproval {
            signer,
            signature,
            algorithm,
        }
    }

    pub fn signer(&self) -> &PublicKey {
        &self.signer
    }

    /// The raw signature, without its algorithm tag.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// The algorithm tag byte followed by the raw signature, as the chain expects it.
    pub fn signature_with_type(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + self.signature.len());
        bytes.push(self.algorithm.tag());
        bytes.extend_from_slice(&self.signature);
        bytes
    }

    pub fn from_json(node: &JsonNode) -> Result<Self> {
        let signer = node.field("signer")?.public_key()?;
        let signature_node = node.field("signature")?;
        let tagged = signature_node.hex_bytes()?;
        let (tag, signature) = tagged
            .split_first()
            .ok_or_else(|| signature_node.malformed("empty signature"))?;
        let algorithm = signature_node.at_path(KeyAlgorithm::from_tag(*tag))?;
        Ok(DeployApproval {
            signer,
            signature: signature.to_vec(),
            algorithm,
        })
    }

    pub fn to_json(&self) -> Value {
        json!({
            "signer": self.signer.to_hex(),
            "signature": hex::encode(self.signature_with_type()),
        })
    }
}

#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployHeader {
    pub account: PublicKey,
    pub body_hash: Digest,
    pub chain_name: String,
    pub dependencies: Vec<Digest>,
    pub gas_price: u64,
    /// RFC 3339 timestamp, kept as the node formats it.
    pub timestamp: String,
    /// Human readable duration such as `1h` or `30m`.
    pub ttl: String,
}

impl DeployHeader {
    pub fn from_json(node: &JsonNode) -> Result<Self> {
        let dependencies = node
            .field("dependencies")?
            .elements()?
            .iter()
            .map(JsonNode::digest)
            .collect::<Result<Vec<_>>>()?;
        Ok(DeployHeader {
            account: node.field("account")?.public_key()?,
            body_hash: node.field("body_hash")?.digest()?,
            chain_name: node.field("chain_name")?.as_string()?,
            dependencies,
            gas_price: node.field("gas_price")?.as_u64()?,
            timestamp: node.field("timestamp")?.as_string()?,
            ttl: node.field("ttl")?.as_string()?,
        })
    }

    pub fn to_json(&self) -> Value {
        let dependencies: Vec<String> = self.dependencies.iter().map(Digest::to_hex).collect();
        json!({
            "account": self.account.to_hex(),
            "body_hash": self.body_hash.to_hex(),
            "chain_name": self.chain_name,
            "dependencies": dependencies,
            "gas_price": self.gas_price,
            "timestamp": self.timestamp,
            "ttl": self.ttl,
        })
    }
}

/// A transaction: header, payment and session code, and the approvals signing its hash.
///
/// `hash` and the header's `body_hash` are never computed here. When read from a node they are
/// taken as given; when building a deploy the caller supplies them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deploy {
    hash: Digest,
    header: DeployHeader,
    payment: ExecutableDeployItem,
    session: ExecutableDeployItem,
    approvals: Vec<DeployApproval>,
}

impl Deploy {
    pub fn new(
        hash: Digest,
        header: DeployHeader,
        payment: ExecutableDeployItem,
        session: ExecutableDeployItem,
    ) -> Self {
        Deploy {
            hash,
            header,
            payment,
            session,
            approvals: Vec::new(),
        }
    }

    pub fn hash(&self) -> &Digest {
        &self.hash
    }

    pub fn header(&self) -> &DeployHeader {
        &self.header
    }

    pub fn payment(&self) -> &ExecutableDeployItem {
        &self.payment
    }

    pub fn session(&self) -> &ExecutableDeployItem {
        &self.session
    }

    pub fn approvals(&self) -> &[DeployApproval] {
        &self.approvals
    }

    pub fn add_approval(&mut self, approval: DeployApproval) {
        self.approvals.push(approval);
    }

    /// Payment bytes followed by session bytes, the input of the body hash.
    pub fn body_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = self.payment.to_bytes()?;
        bytes.extend(self.session.to_bytes()?);
        Ok(bytes)
    }

    pub fn from_json(node: &JsonNode) -> Result<Self> {
        let approvals = node
            .field("approvals")?
            .elements()?
            .iter()
            .map(DeployApproval::from_json)
            .collect::<Result<Vec<_>>>()?;
        Ok(Deploy {
            hash: node.field("hash")?.digest()?,
            header: DeployHeader::from_json(&node.field("header")?)?,
            payment: ExecutableDeployItem::from_json(&node.field("payment")?)?,
            session: ExecutableDeployItem::from_json(&node.field("session")?)?,
            approvals,
        })
    }

    pub fn to_json(&self) -> Result<Value> {
        let approvals: Vec<Value> = self.approvals.iter().map(DeployApproval::to_json).collect();
        Ok(json!({
            "approvals": approvals,
            "hash": self.hash.to_hex(),
            "header": self.header.to_json(),
            "payment": self.payment.to_json()?,
            "session": self.session.to_json()?,
        }))
    }
}
