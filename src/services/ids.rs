// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Random identifiers and bearer tokens.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};

const ID_BYTES: usize = 16;
const TOKEN_BYTES: usize = 32;

fn random_bytes<const N: usize>() -> anyhow::Result<[u8; N]> {
    let mut bytes = [0u8; N];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| anyhow::anyhow!("System RNG failure"))?;
    Ok(bytes)
}

/// New opaque entity ID (32 hex chars).
pub fn new_id() -> anyhow::Result<String> {
    Ok(hex::encode(random_bytes::<ID_BYTES>()?))
}

/// New unguessable bearer token (URL-safe base64).
pub fn new_token() -> anyhow::Result<String> {
    Ok(URL_SAFE_NO_PAD.encode(random_bytes::<TOKEN_BYTES>()?))
}

/// Storage key for a token. Raw tokens are never persisted.
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
