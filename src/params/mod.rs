// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidemark-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidemark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Filter/pagination parameter sets and the shareable query-string codec.
//!
//! `decode(&encode(&p)) == p` holds for any set without empty values; an empty value marks a
//! clear (see [`Params::merge`]) and is omitted by the codec in both directions.

use std::fmt;

use memchr::{memchr, memchr_iter};
use smallvec::SmallVec;
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParamEntry {
    key: SmolStr,
    value: SmolStr,
}

/// An ordered mapping from unique string keys to string values.
///
/// Insertion order is preserved and significant for equality; replacing a value keeps the key's
/// original position. Values are opaque to everything but the controller's cursor bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: SmallVec<[ParamEntry; 8]>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|entry| entry.key == key).map(|entry| entry.value.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Sets `key` to `value`, replacing in place if the key already exists.
    pub fn set(&mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.key == key) {
            entry.value = value;
            return;
        }
        self.entries.push(ParamEntry { key, value });
    }

    /// Sets `key` to the canonical decimal rendering of `value`.
    pub fn set_number(&mut self, key: impl Into<SmolStr>, value: i64) {
        let mut buffer = itoa::Buffer::new();
        self.set(key, buffer.format(value));
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.key != key);
        before != self.entries.len()
    }

    /// Merges `partial` into `self`: a non-empty value overwrites (or appends) the key, an empty
    /// value clears it. Keys absent from `partial` are left untouched.
    pub fn merge(&mut self, partial: &Params) {
        for (key, value) in partial.pairs() {
            if value.is_empty() {
                self.remove(key);
            } else {
                self.set(key, value);
            }
        }
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|entry| (entry.key.as_str(), entry.value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<SmolStr>,
    V: Into<SmolStr>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

/// Serializes `params` to a canonical query string in insertion order.
///
/// Keys with empty values are omitted. Bytes outside `[A-Za-z0-9._~-]` are percent-encoded as
/// UTF-8 with uppercase hex digits; space encodes as `%20`.
pub fn encode(params: &Params) -> String {
    let mut out = String::new();
    for (key, value) in params.pairs() {
        if value.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('&');
        }
        percent_encode_into(&mut out, key);
        out.push('=');
        percent_encode_into(&mut out, value);
    }
    out
}

/// Parses a query string back into a parameter set.
///
/// A leading `?` is tolerated and `+` decodes to a space. Segments without a value are skipped
/// (absence and emptiness are the same thing on the wire); a later duplicate of a key overwrites
/// the earlier one. Keys this module knows nothing about are kept as opaque pass-through values.
pub fn decode(query: &str) -> Result<Params, ParamsDecodeError> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut params = Params::new();
    if query.is_empty() {
        return Ok(params);
    }

    let bytes = query.as_bytes();
    let mut start = 0usize;
    let mut boundaries: SmallVec<[usize; 8]> = memchr_iter(b'&', bytes).collect();
    boundaries.push(bytes.len());

    for boundary in boundaries {
        let segment = &query[start..boundary];
        let segment_start = start;
        start = boundary + 1;

        if segment.is_empty() {
            continue;
        }
        let Some(eq) = memchr(b'=', segment.as_bytes()) else {
            continue;
        };
        let key = percent_decode(&segment[..eq], segment_start)?;
        if key.is_empty() {
            return Err(ParamsDecodeError::EmptyKey { position: segment_start });
        }
        let value = percent_decode(&segment[eq + 1..], segment_start + eq + 1)?;
        if value.is_empty() {
            continue;
        }
        params.set(key.as_str(), value.as_str());
    }

    Ok(params)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamsDecodeError {
    InvalidPercentEscape { position: usize },
    InvalidUtf8 { position: usize },
    EmptyKey { position: usize },
}

impl fmt::Display for ParamsDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPercentEscape { position } => {
                write!(f, "invalid percent escape at byte {position}")
            }
            Self::InvalidUtf8 { position } => {
                write!(f, "percent-decoded bytes are not valid UTF-8 (segment at byte {position})")
            }
            Self::EmptyKey { position } => write!(f, "empty parameter key at byte {position}"),
        }
    }
}

impl std::error::Error for ParamsDecodeError {}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~')
}

fn percent_encode_into(out: &mut String, raw: &str) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    for byte in raw.bytes() {
        if is_unreserved(byte) {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push(HEX[usize::from(byte >> 4)] as char);
            out.push(HEX[usize::from(byte & 0x0f)] as char);
        }
    }
}

fn percent_decode(raw: &str, position: usize) -> Result<String, ParamsDecodeError> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut index = 0usize;

    while index < bytes.len() {
        match bytes[index] {
            b'%' => {
                let escape_at = position + index;
                let (Some(high), Some(low)) = (
                    bytes.get(index + 1).copied().and_then(hex_value),
                    bytes.get(index + 2).copied().and_then(hex_value),
                ) else {
                    return Err(ParamsDecodeError::InvalidPercentEscape { position: escape_at });
                };
                out.push((high << 4) | low);
                index += 3;
            }
            b'+' => {
                out.push(b' ');
                index += 1;
            }
            byte => {
                out.push(byte);
                index += 1;
            }
        }
    }

    String::from_utf8(out).map_err(|_| ParamsDecodeError::InvalidUtf8 { position })
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
