// src/crypto/padding.rs
//! PKCS7 padding
//!
//! `pad` always appends at least one byte, so block-aligned input grows by a
//! whole block. Ciphertext from every variant in this crate depends on that.
//!
//! `unpad` scans a fixed window at the end of the buffer no matter what the
//! pad byte says, so the time it takes does not depend on the padding length.

use crate::consts::BLOCK_SIZE;
use crate::error::PaddingError;

/// Length of `pad(block_size, src)` for a source of `src_len` bytes
#[inline]
pub(crate) fn padded_len(block_size: usize, src_len: usize) -> usize {
    (src_len / block_size + 1) * block_size
}

/// Append PKCS7 padding, returning a new buffer.
///
/// `block_size` must be in `1..=255` so the pad byte can encode it.
pub fn pad(block_size: usize, src: &[u8]) -> Result<Vec<u8>, PaddingError> {
    check_block_size(block_size)?;
    Ok(pad_unchecked(block_size, src))
}

/// [`pad`] to the AES block size
pub(crate) fn pad_block(src: &[u8]) -> Vec<u8> {
    pad_unchecked(BLOCK_SIZE, src)
}

fn pad_unchecked(block_size: usize, src: &[u8]) -> Vec<u8> {
    let total = padded_len(block_size, src.len());
    let fill = (total - src.len()) as u8;

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(src);
    out.resize(total, fill);
    out
}

fn check_block_size(block_size: usize) -> Result<(), PaddingError> {
    if (1..=usize::from(u8::MAX)).contains(&block_size) {
        Ok(())
    } else {
        Err(PaddingError::InvalidBlockSize(block_size))
    }
}

/// Validate PKCS7 padding and return the unpadded prefix.
///
/// Checks run in this order, each with its own error: `block_size` is in
/// `1..=255`, length is a nonzero multiple of `block_size`, the last byte `p` is in
/// `1..=len`, and the last `p` bytes all equal `p`.
pub fn unpad(block_size: usize, src: &[u8]) -> Result<&[u8], PaddingError> {
    let len = unpadded_len(block_size, src)?;
    Ok(&src[..len])
}

/// Same checks as [`unpad`], returning only the plaintext length
pub fn unpadded_len(block_size: usize, src: &[u8]) -> Result<usize, PaddingError> {
    check_block_size(block_size)?;
    let len = src.len();
    if len == 0 || len % block_size != 0 {
        return Err(PaddingError::InvalidLength { len, block_size });
    }

    let p = src[len - 1];
    let p_wide = p as usize;

    // 0 < p <= len, without branching on p
    let value_bad = ct_is_zero(p) | ct_lt(len, p_wide);

    // A pad byte can't describe more than 255 bytes, so that window covers
    // every valid p. Positions past p are masked out instead of skipped.
    let window = len.min(u8::MAX as usize);
    let mut diff = 0u8;
    for i in 0..window {
        let b = src[len - 1 - i];
        let in_pad = ct_mask(ct_lt(i, p_wide));
        diff |= in_pad & (b ^ p);
    }
    let bytes_bad = 1 ^ ct_is_zero(diff);

    if value_bad != 0 {
        return Err(PaddingError::InvalidPaddingValue);
    }
    if bytes_bad != 0 {
        return Err(PaddingError::InvalidPaddingBytes);
    }
    Ok(len - p_wide)
}

/// 1 if `a < b`, else 0 (both well below `usize::MAX / 2`)
#[inline]
fn ct_lt(a: usize, b: usize) -> u8 {
    (a.wrapping_sub(b) >> (usize::BITS - 1)) as u8
}

/// 1 if `x == 0`, else 0
#[inline]
fn ct_is_zero(x: u8) -> u8 {
    let x = x as u16;
    (x.wrapping_sub(1) >> 15) as u8 & 1
}

/// 0xFF for 1, 0x00 for 0
#[inline]
fn ct_mask(bit: u8) -> u8 {
    0u8.wrapping_sub(bit)
}
