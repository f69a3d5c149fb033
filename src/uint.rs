//! Wide unsigned integers used by the `U128`, `U256` and `U512` CL kinds.

use crate::{
    bytesrepr::{self, LittleEndian},
    error::{Error, Result},
};

#[allow(
    clippy::assign_op_pattern,
    clippy::ptr_offset_with_cast,
    clippy::range_plus_one,
    clippy::manual_range_contains
)]
mod macro_code {
    use uint::construct_uint;

    construct_uint! {
        pub struct U512(8);
    }
    construct_uint! {
        pub struct U256(4);
    }
    construct_uint! {
        pub struct U128(2);
    }
}

pub use self::macro_code::{U128, U256, U512};

macro_rules! wide_uint_impls {
    ($type:ident, $total_bytes:expr, $widths:expr) => {
        impl LittleEndian for $type {
            const SIGNED: bool = false;

            fn to_le_vec(&self) -> Vec<u8> {
                let mut buf = [0u8; $total_bytes];
                self.to_little_endian(&mut buf);
                buf.to_vec()
            }
        }

        impl $type {
            /// Canonical compact encoding: length byte followed by the trimmed value.
            pub fn to_compact_bytes(&self) -> Result<Vec<u8>> {
                bytesrepr::encode_int(self, $widths, true)
            }

            /// Inverse of [`Self::to_compact_bytes`], returning the unread remainder.
            pub fn from_compact_bytes(bytes: &[u8]) -> Result<(Self, &[u8])> {
                let (le, rem) = bytesrepr::decode_compact(bytes, $total_bytes)?;
                Ok(($type::from_little_endian(&le), rem))
            }

            /// Parse a base-10 string as emitted by the node for motes and gas costs.
            pub fn from_decimal(value: &str) -> Result<Self> {
                $type::from_dec_str(value)
                    .map_err(|e| Error::Formatting(format!("{:?} parsing {:?}", e, value)))
            }
        }
    };
}

wide_uint_impls!(U128, 16, bytesrepr::U128_WIDTHS);
wide_uint_impls!(U256, 32, bytesrepr::U256_WIDTHS);
wide_uint_impls!(U512, 64, bytesrepr::U512_WIDTHS);
