//! Primitive encoders and decoders for the chain's canonical little-endian byte format.
//!
//! Every integer kind goes through [`encode_int`]: a value is tried against an ordered list of
//! candidate widths and the first width that holds it wins. Kinds with a single candidate width
//! are "fixed" and carry no length prefix; kinds with several are "compact", get trimmed and are
//! prefixed by a single length byte.

use std::{fmt::Display, mem::size_of};

use crate::error::{Error, Result};

pub const BOOL_SERIALIZED_LENGTH: usize = size_of::<bool>();
pub const U8_SERIALIZED_LENGTH: usize = size_of::<u8>();
pub const I32_SERIALIZED_LENGTH: usize = size_of::<i32>();
pub const I64_SERIALIZED_LENGTH: usize = size_of::<i64>();
pub const U32_SERIALIZED_LENGTH: usize = size_of::<u32>();
pub const U64_SERIALIZED_LENGTH: usize = size_of::<u64>();

/// Candidate widths of `U128`.
pub const U128_WIDTHS: &[usize] = &[1, 4, 8, 16];
/// Candidate widths of `U256`.
pub const U256_WIDTHS: &[usize] = &[1, 4, 8, 16, 32];
/// Candidate widths of `U512`.
pub const U512_WIDTHS: &[usize] = &[1, 4, 8, 16, 32, 64];


/// An integer that can expose its full-width two's complement little-endian representation.
pub trait LittleEndian: Display {
    /// Whether the representation is two's complement signed.
    const SIGNED: bool;

    /// The value's little-endian bytes at the type's native width.
    fn to_le_vec(&self) -> Vec<u8>;
}

macro_rules! impl_little_endian_for_primitive {
    ($type:ty, $signed:expr) => {
        impl LittleEndian for $type {
            const SIGNED: bool = $signed;

            fn to_le_vec(&self) -> Vec<u8> {
                self.to_le_bytes().to_vec()
            }
        }
    };
}

impl_little_endian_for_primitive!(u8, false);
impl_little_endian_for_primitive!(u32, false);
impl_little_endian_for_primitive!(u64, false);
impl_little_endian_for_primitive!(u128, false);
impl_little_endian_for_primitive!(usize, false);
impl_little_endian_for_primitive!(i32, true);
impl_little_endian_for_primitive!(i64, true);

/// Encode `value` at the first of `widths` that can hold it.
///
/// With `trim`, the most significant zero bytes are stripped, keeping at least one byte. A
/// length byte is prepended whenever more than one width was offered.
pub fn encode_int<T: LittleEndian>(value: &T, widths: &[usize], trim: bool) -> Result<Vec<u8>> {
    let full = value.to_le_vec();
    let mut encoded = widths
        .iter()
        .find_map(|width| fit_to_width(&full, *width, T::SIGNED))
        .ok_or_else(|| Error::IntegerRangeExceeded {
            value: value.to_string(),
            widths: widths.to_vec(),
        })?;

    if trim {
        while encoded.len() > 1 && encoded.last() == Some(&0) {
            encoded.pop();
        }
    }

    if widths.len() == 1 {
        Ok(encoded)
    } else {
        let mut prefixed = Vec::with_capacity(encoded.len() + 1);
        prefixed.push(encoded.len() as u8);
        prefixed.extend(encoded);
        Ok(prefixed)
    }
}

fn fit_to_width(full: &[u8], width: usize, signed: bool) -> Option<Vec<u8>> {
    if width == 0 {
        return None;
    }
    let negative = signed && full.last().map_or(false, |b| b & 0x80 != 0);
    let fill = if negative { 0xff } else { 0x00 };

    if width >= full.len() {
        let mut widened = full.to_vec();
        widened.resize(width, fill);
        return Some(widened);
    }

    let (low, high) = full.split_at(width);
    let high_ok = high.iter().all(|b| *b == fill);
    // The sign bit of the truncated value must still agree with the original sign.
    let sign_ok = !signed || (low[width - 1] & 0x80 != 0) == negative;
    if high_ok && sign_ok {
        Some(low.to_vec())
    } else {
        None
    }
}

/// Encode a collection length as the canonical 4-byte little-endian count.
pub fn encode_len(len: usize) -> Result<Vec<u8>> {
    encode_int(&len, &[U32_SERIALIZED_LENGTH], false)
}

pub fn encode_u32(value: u32) -> Vec<u8> {
    value.to_le_bytes().to_vec()
}

/// UTF-8 bytes prefixed by their length as a fixed 4-byte u32.
pub fn encode_string(value: &str) -> Result<Vec<u8>> {
    encode_bytes(value.as_bytes())
}

/// Raw bytes prefixed by their count as a fixed 4-byte u32.
pub fn encode_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoded = encode_len(bytes.len())?;
    encoded.extend_from_slice(bytes);
    Ok(encoded)
}

/// Element count followed by the already-encoded elements.
pub fn encode_vector<I>(elements: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = Vec<u8>>,
{
    let elements: Vec<Vec<u8>> = elements.into_iter().collect();
    let mut encoded = encode_len(elements.len())?;
    for element in elements {
        encoded.extend(element);
    }
    Ok(encoded)
}

pub fn safe_split_at(bytes: &[u8], n: usize) -> Result<(&[u8], &[u8])> {
    if n > bytes.len() {
        Err(Error::EarlyEndOfStream)
    } else {
        Ok(bytes.split_at(n))
    }
}

pub fn decode_array<const N: usize>(bytes: &[u8]) -> Result<([u8; N], &[u8])> {
    let (head, rem) = safe_split_at(bytes, N)?;
    let mut array = [0u8; N];
    array.copy_from_slice(head);
    Ok((array, rem))
}

pub fn decode_u8(bytes: &[u8]) -> Result<(u8, &[u8])> {
    match bytes.split_first() {
        None => Err(Error::EarlyEndOfStream),
        Some((byte, rem)) => Ok((*byte, rem)),
    }
}

pub fn decode_bool(bytes: &[u8]) -> Result<(bool, &[u8])> {
    match decode_u8(bytes)? {
        (0, rem) => Ok((false, rem)),
        (1, rem) => Ok((true, rem)),
        (other, _) => Err(Error::Formatting(format!("invalid bool byte {}", other))),
    }
}

pub fn decode_u32(bytes: &[u8]) -> Result<(u32, &[u8])> {
    let (array, rem) = decode_array::<U32_SERIALIZED_LENGTH>(bytes)?;
    Ok((u32::from_le_bytes(array), rem))
}

pub fn decode_u64(bytes: &[u8]) -> Result<(u64, &[u8])> {
    let (array, rem) = decode_array::<U64_SERIALIZED_LENGTH>(bytes)?;
    Ok((u64::from_le_bytes(array), rem))
}

pub fn decode_i32(bytes: &[u8]) -> Result<(i32, &[u8])> {
    let (array, rem) = decode_array::<I32_SERIALIZED_LENGTH>(bytes)?;
    Ok((i32::from_le_bytes(array), rem))
}

pub fn decode_i64(bytes: &[u8]) -> Result<(i64, &[u8])> {
    let (array, rem) = decode_array::<I64_SERIALIZED_LENGTH>(bytes)?;
    Ok((i64::from_le_bytes(array), rem))
}

pub fn decode_len(bytes: &[u8]) -> Result<(usize, &[u8])> {
    let (len, rem) = decode_u32(bytes)?;
    Ok((len as usize, rem))
}

pub fn decode_bytes(bytes: &[u8]) -> Result<(Vec<u8>, &[u8])> {
    let (len, rem) = decode_len(bytes)?;
    let (value, rem) = safe_split_at(rem, len)?;
    Ok((value.to_vec(), rem))
}

pub fn decode_string(bytes: &[u8]) -> Result<(String, &[u8])> {
    let (raw, rem) = decode_bytes(bytes)?;
    let value = String::from_utf8(raw).map_err(|e| Error::Formatting(e.to_string()))?;
    Ok((value, rem))
}

/// Read a compact integer: a length byte then that many little-endian bytes.
///
/// Returns the bytes zero-extended to `max_width`.
pub fn decode_compact(bytes: &[u8], max_width: usize) -> Result<(Vec<u8>, &[u8])> {
    let (len, rem) = decode_u8(bytes)?;
    let len = len as usize;
    if len > max_width {
        return Err(Error::Formatting(format!(
            "compact integer of {} bytes exceeds {} bytes",
            len, max_width
        )));
    }
    let (value, rem) = safe_split_at(rem, len)?;
    let mut padded = value.to_vec();
    padded.resize(max_width, 0);
    Ok((padded, rem))
}

/// Fail if anything is left after a complete decode.
pub fn ensure_consumed(rem: &[u8]) -> Result<()> {
    if rem.is_empty() {
        Ok(())
    } else {
        Err(Error::LeftOverBytes(rem.len()))
    }
}
