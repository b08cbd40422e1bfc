// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Document identifiers.
//!
//! IDs are 12 bytes rendered as 24 lowercase hex characters: a 4-byte
//! big-endian Unix timestamp followed by 8 random bytes. Lexical order
//! therefore follows creation time to the second.

use crate::error::AppError;
use ring::rand::{SecureRandom, SystemRandom};
use std::fmt;
use std::str::FromStr;

const ID_BYTES: usize = 12;
const TIMESTAMP_BYTES: usize = 4;

/// Validated document ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generate a fresh ID.
    pub fn generate() -> Result<Self, AppError> {
        let mut bytes = [0u8; ID_BYTES];

        let secs = u32::try_from(crate::time_utils::unix_now()).unwrap_or(u32::MAX);
        bytes[..TIMESTAMP_BYTES].copy_from_slice(&secs.to_be_bytes());

        SystemRandom::new()
            .fill(&mut bytes[TIMESTAMP_BYTES..])
            .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG failure")))?;

        Ok(Self(hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for DocumentId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| AppError::InvalidId(s.to_string()))?;
        if bytes.len() != ID_BYTES {
            return Err(AppError::InvalidId(s.to_string()));
        }
        // Normalize so "ABC..." and "abc..." name the same document.
        Ok(Self(hex::encode(bytes)))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
