use std::{
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
};

use crate::{
    bytesrepr,
    error::{Error, Result},
};

/// Prefix of the formatted string of a [`Key::Account`].
pub const ACCOUNT_HASH_PREFIX: &str = "account-hash-";
/// Prefix of the formatted string of a [`Key::Hash`].
pub const HASH_PREFIX: &str = "hash-";
/// Prefix of the formatted string of a [`URef`] and a [`Key::URef`].
pub const UREF_PREFIX: &str = "uref-";

/// The number of bytes in every key address.
pub const KEY_HASH_LENGTH: usize = 32;

const ACCOUNT_TAG: u8 = 0;
const HASH_TAG: u8 = 1;
const UREF_TAG: u8 = 2;

#[cfg(test)]
mod tests;

/// Permissions carried by a [`URef`]. The discriminant is the on-chain bitmask.
#[allow(missing_docs)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessRights {
    None = 0,
    Read = 1,
    Write = 2,
    ReadWrite = 3,
    Add = 4,
    ReadAdd = 5,
    AddWrite = 6,
    ReadAddWrite = 7,
}

impl AccessRights {
    /// The raw bitmask.
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Build from a bitmask, rejecting bits outside `READ | WRITE | ADD`.
    pub fn from_bits(bits: u8) -> Result<Self> {
        let rights = match bits {
            0 => AccessRights::None,
            1 => AccessRights::Read,
            2 => AccessRights::Write,
            3 => AccessRights::ReadWrite,
            4 => AccessRights::Add,
            5 => AccessRights::ReadAdd,
            6 => AccessRights::AddWrite,
            7 => AccessRights::ReadAddWrite,
            other => {
                return Err(Error::Formatting(format!(
                    "invalid access rights bits {}",
                    other
                )))
            }
        };
        Ok(rights)
    }

    pub fn is_readable(self) -> bool {
        self.bits() & AccessRights::Read.bits() != 0
    }

    pub fn is_writeable(self) -> bool {
        self.bits() & AccessRights::Write.bits() != 0
    }

    pub fn is_addable(self) -> bool {
        self.bits() & AccessRights::Add.bits() != 0
    }
}

/// An unforgeable reference: a global-state address plus the holder's [`AccessRights`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct URef {
    addr: [u8; KEY_HASH_LENGTH],
    access_rights: AccessRights,
}

impl URef {
    pub fn new(addr: [u8; KEY_HASH_LENGTH], access_rights: AccessRights) -> Self {
        URef {
            addr,
            access_rights,
        }
    }

    pub fn addr(&self) -> [u8; KEY_HASH_LENGTH] {
        self.addr
    }

    pub fn access_rights(&self) -> AccessRights {
        self.access_rights
    }

    /// `uref-<hex>-<rights>`, rights as three octal digits the way the node prints them.
    pub fn to_formatted_string(&self) -> String {
        format!(
            "{}{}-{:03o}",
            UREF_PREFIX,
            hex::encode(self.addr),
            self.access_rights.bits()
        )
    }

    /// Parse `uref-<hex>-<rights>`.
    pub fn from_formatted_str(input: &str) -> Result<Self> {
        let remainder = input
            .strip_prefix(UREF_PREFIX)
            .ok_or_else(|| Error::InvalidKeyPrefix(input.to_string()))?;
        let (addr_hex, rights) = remainder.rsplit_once('-').ok_or_else(|| {
            Error::Formatting(format!("uref {:?} has no access rights suffix", input))
        })?;
        let addr = decode_addr(addr_hex)?;
        let bits = u8::from_str_radix(rights, 8)
            .map_err(|e| Error::Formatting(format!("access rights {:?}: {}", rights, e)))?;
        Ok(URef::new(addr, AccessRights::from_bits(bits)?))
    }

    /// Address followed by the access rights byte.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.addr.to_vec();
        bytes.push(self.access_rights.bits());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8])> {
        let (addr, rem) = bytesrepr::decode_array::<KEY_HASH_LENGTH>(bytes)?;
        let (bits, rem) = bytesrepr::decode_u8(rem)?;
        Ok((URef::new(addr, AccessRights::from_bits(bits)?), rem))
    }
}

impl Display for URef {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.to_formatted_string())
    }
}

impl Debug for URef {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "URef({})", self.to_formatted_string())
    }
}

impl FromStr for URef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        URef::from_formatted_str(s)
    }
}

/// The hash identifying an account, printed as `account-hash-<hex>`.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountHash([u8; KEY_HASH_LENGTH]);

impl AccountHash {
    pub fn new(value: [u8; KEY_HASH_LENGTH]) -> Self {
        AccountHash(value)
    }

    pub fn value(&self) -> [u8; KEY_HASH_LENGTH] {
        self.0
    }

    pub fn to_formatted_string(&self) -> String {
        format!("{}{}", ACCOUNT_HASH_PREFIX, hex::encode(self.0))
    }

    pub fn from_formatted_str(input: &str) -> Result<Self> {
        let hex = input
            .strip_prefix(ACCOUNT_HASH_PREFIX)
            .ok_or_else(|| Error::InvalidKeyPrefix(input.to_string()))?;
        Ok(AccountHash(decode_addr(hex)?))
    }
}

impl Display for AccountHash {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.to_formatted_string())
    }
}

impl Debug for AccountHash {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "AccountHash({})", hex::encode(self.0))
    }
}

impl FromStr for AccountHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AccountHash::from_formatted_str(s)
    }
}

/// A chain-wide addressable identifier.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// Where a user account lives, addressed by its account hash.
    Account([u8; KEY_HASH_LENGTH]),
    /// Where a contract (or other hash-addressed entity) lives.
    Hash([u8; KEY_HASH_LENGTH]),
    /// A [`URef`] used as a key.
    URef(URef),
}

impl Key {
    /// The 32-byte address regardless of variant.
    pub fn addr(&self) -> [u8; KEY_HASH_LENGTH] {
        match self {
            Key::Account(addr) | Key::Hash(addr) => *addr,
            Key::URef(uref) => uref.addr(),
        }
    }

    /// The variant's human readable name.
    pub fn type_string(&self) -> &'static str {
        match self {
            Key::Account(_) => "Key::Account",
            Key::Hash(_) => "Key::Hash",
            Key::URef(_) => "Key::URef",
        }
    }

    /// Variant-appropriate prefixed string.
    pub fn to_formatted_string(&self) -> String {
        match self {
            Key::Account(addr) => format!("{}{}", ACCOUNT_HASH_PREFIX, hex::encode(addr)),
            Key::Hash(addr) => format!("{}{}", HASH_PREFIX, hex::encode(addr)),
            Key::URef(uref) => uref.to_formatted_string(),
        }
    }

    /// Parse `account-hash-<hex>`, `hash-<hex>` or `uref-<hex>-<rights>`.
    pub fn from_formatted_str(input: &str) -> Result<Self> {
        if let Some(hex) = input.strip_prefix(ACCOUNT_HASH_PREFIX) {
            Ok(Key::Account(decode_addr(hex)?))
        } else if let Some(hex) = input.strip_prefix(HASH_PREFIX) {
            Ok(Key::Hash(decode_addr(hex)?))
        } else if input.starts_with(UREF_PREFIX) {
            Ok(Key::URef(URef::from_formatted_str(input)?))
        } else {
            Err(Error::InvalidKeyPrefix(input.to_string()))
        }
    }

    /// Variant tag byte followed by the variant's payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + KEY_HASH_LENGTH + 1);
        match self {
            Key::Account(addr) => {
                bytes.push(ACCOUNT_TAG);
                bytes.extend_from_slice(addr);
            }
            Key::Hash(addr) => {
                bytes.push(HASH_TAG);
                bytes.extend_from_slice(addr);
            }
            Key::URef(uref) => {
                bytes.push(UREF_TAG);
                bytes.extend(uref.to_bytes());
            }
        }
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8])> {
        let (tag, rem) = bytesrepr::decode_u8(bytes)?;
        match tag {
            ACCOUNT_TAG => {
                let (addr, rem) = bytesrepr::decode_array::<KEY_HASH_LENGTH>(rem)?;
                Ok((Key::Account(addr), rem))
            }
            HASH_TAG => {
                let (addr, rem) = bytesrepr::decode_array::<KEY_HASH_LENGTH>(rem)?;
                Ok((Key::Hash(addr), rem))
            }
            UREF_TAG => {
                let (uref, rem) = URef::from_bytes(rem)?;
                Ok((Key::URef(uref), rem))
            }
            other => Err(Error::Formatting(format!("invalid key tag {}", other))),
        }
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.to_formatted_string())
    }
}

impl Debug for Key {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}({})", self.type_string(), self.to_formatted_string())
    }
}

impl FromStr for Key {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Key::from_formatted_str(s)
    }
}

impl From<URef> for Key {
    fn from(uref: URef) -> Key {
        Key::URef(uref)
    }
}

impl From<AccountHash> for Key {
    fn from(account_hash: AccountHash) -> Key {
        Key::Account(account_hash.value())
    }
}

pub(crate) fn decode_addr(input: &str) -> Result<[u8; KEY_HASH_LENGTH]> {
    let bytes = hex::decode(input)?;
    <[u8; KEY_HASH_LENGTH]>::try_from(bytes.as_slice()).map_err(|_| {
        Error::Formatting(format!(
            "expected {} bytes, found {}",
            KEY_HASH_LENGTH,
            bytes.len()
        ))
    })
}
