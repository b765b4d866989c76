// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM seal/open over opaque byte payloads.
//!
//! Every [`seal`] draws a fresh 96-bit nonce from the system CSPRNG and
//! prepends it to the ciphertext. Nonce reuse under one key breaks GCM.

use keyward_core::KeywardError;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN as RING_NONCE_LEN, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

use crate::kdf::{KEY_LEN, VaultKey};

/// Nonce length in bytes.
pub const NONCE_LEN: usize = RING_NONCE_LEN;

/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

fn cipher(key: &[u8; KEY_LEN]) -> Result<LessSafeKey, KeywardError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| KeywardError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext`, authenticating `aad` alongside it.
///
/// Returns `nonce ‖ ciphertext ‖ tag`.
pub fn seal(key: &VaultKey, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, KeywardError> {
    let cipher = cipher(key.material())?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce_bytes)
        .map_err(|_| KeywardError::Crypto("failed to generate random nonce".to_string()))?;

    let mut in_out = plaintext.to_vec();
    cipher
        .seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::from(aad),
            &mut in_out,
        )
        .map_err(|_| KeywardError::Crypto("AES-256-GCM encryption failed".to_string()))?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + in_out.len());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&in_out);
    Ok(sealed)
}

/// Decrypt the output of [`seal`].
///
/// Input shorter than a nonce is [`KeywardError::MalformedInput`]. A wrong
/// key, tampering, and truncation past the nonce all surface as
/// [`KeywardError::AuthenticationFailed`] and cannot be told apart.
pub fn open(
    key: &VaultKey,
    sealed: &[u8],
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>, KeywardError> {
    if sealed.len() < NONCE_LEN {
        return Err(KeywardError::MalformedInput(format!(
            "sealed payload is {} bytes, shorter than the {NONCE_LEN}-byte nonce",
            sealed.len()
        )));
    }
    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
        .map_err(|_| KeywardError::MalformedInput("invalid nonce".to_string()))?;

    let cipher = cipher(key.material())?;
    let mut in_out = Zeroizing::new(ciphertext.to_vec());
    let plaintext_len = cipher
        .open_in_place(nonce, Aad::from(aad), &mut in_out)
        .map_err(|_| KeywardError::AuthenticationFailed)?
        .len();
    in_out.truncate(plaintext_len);
    Ok(in_out)
}
