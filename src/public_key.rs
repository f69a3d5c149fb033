use std::fmt::{self, Debug, Display, Formatter};

use crate::{
    bytesrepr,
    error::{Error, Result},
};

const ED25519_PUBLIC_KEY_LENGTH: usize = 32;
const SECP256K1_PUBLIC_KEY_LENGTH: usize = 33;

/// Signature scheme of a key or signature. The discriminant is the on-chain tag byte.
#[allow(missing_docs)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyAlgorithm {
    System = 0,
    Ed25519 = 1,
    Secp256k1 = 2,
}

impl KeyAlgorithm {
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(KeyAlgorithm::System),
            1 => Ok(KeyAlgorithm::Ed25519),
            2 => Ok(KeyAlgorithm::Secp256k1),
            other => Err(Error::Formatting(format!("invalid key algorithm tag {}", other))),
        }
    }

    /// Length of a raw public key of this algorithm.
    pub fn public_key_length(self) -> usize {
        match self {
            KeyAlgorithm::System => 0,
            KeyAlgorithm::Ed25519 => ED25519_PUBLIC_KEY_LENGTH,
            KeyAlgorithm::Secp256k1 => SECP256K1_PUBLIC_KEY_LENGTH,
        }
    }
}

impl Display for KeyAlgorithm {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let name = match self {
            KeyAlgorithm::System => "system",
            KeyAlgorithm::Ed25519 => "ed25519",
            KeyAlgorithm::Secp256k1 => "secp256k1",
        };
        write!(f, "{}", name)
    }
}

/// Raw public key bytes together with their algorithm.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicKey {
    algorithm: KeyAlgorithm,
    bytes: Vec<u8>,
}

impl PublicKey {
    /// Fails if `bytes` does not have the algorithm's key length.
    pub fn new(algorithm: KeyAlgorithm, bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() != algorithm.public_key_length() {
            return Err(Error::Formatting(format!(
                "{} public key must be {} bytes, found {}",
                algorithm,
                algorithm.public_key_length(),
                bytes.len()
            )));
        }
        Ok(PublicKey { algorithm, bytes })
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub fn raw_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Tag byte followed by the raw key.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + self.bytes.len());
        bytes.push(self.algorithm.tag());
        bytes.extend_from_slice(&self.bytes);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8])> {
        let (tag, rem) = bytesrepr::decode_u8(bytes)?;
        let algorithm = KeyAlgorithm::from_tag(tag)?;
        let (raw, rem) = bytesrepr::safe_split_at(rem, algorithm.public_key_length())?;
        Ok((PublicKey::new(algorithm, raw.to_vec())?, rem))
    }

    /// The node's hex form, e.g. `01d9bf21…`.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_hex(input: &str) -> Result<Self> {
        let bytes = hex::decode(input)?;
        let (key, rem) = PublicKey::from_bytes(&bytes)?;
        bytesrepr::ensure_consumed(rem)?;
        Ok(key)
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "PublicKey::{}({})", self.algorithm, hex::encode(&self.bytes))
    }
}
