use std::fmt::{self, Debug, Display, Formatter};

use crate::{
    bytesrepr,
    error::{Error, Result},
};

/// A 32-byte hash as carried by deploys and blocks. Never computed here, only transported.
#[derive(Copy, Clone, Default, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct Digest([u8; Digest::LENGTH]);

impl Digest {
    /// The number of bytes in a `Digest`.
    pub const LENGTH: usize = 32;

    pub fn value(&self) -> [u8; Digest::LENGTH] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(input: &str) -> Result<Self> {
        let bytes = hex::decode(input)?;
        Digest::try_from(bytes.as_slice())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8])> {
        let (array, rem) = bytesrepr::decode_array::<{ Digest::LENGTH }>(bytes)?;
        Ok((Digest(array), rem))
    }
}

impl From<[u8; Digest::LENGTH]> for Digest {
    fn from(arr: [u8; Digest::LENGTH]) -> Self {
        Digest(arr)
    }
}

impl<'a> TryFrom<&'a [u8]> for Digest {
    type Error = Error;

    fn try_from(slice: &[u8]) -> Result<Digest> {
        <[u8; Digest::LENGTH]>::try_from(slice)
            .map(Digest)
            .map_err(|_| {
                Error::Formatting(format!(
                    "digest must be {} bytes, found {}",
                    Digest::LENGTH,
                    slice.len()
                ))
            })
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl Debug for Digest {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:.10}", self.to_hex())
    }
}
