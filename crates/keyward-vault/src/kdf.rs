// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id key derivation from a passphrase.
//!
//! The salt and cost parameters travel with the vault file header, so the
//! same passphrase always re-derives the same key for a given vault.

use std::fmt;

use keyward_config::VaultConfig;
use keyward_core::KeywardError;
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Argon2id cost parameters plus the per-vault salt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    pub iterations: u32,
    pub parallelism: u32,
    pub salt: [u8; SALT_LEN],
}

impl KdfParams {
    /// Parameters for a new vault or a passphrase change: configured cost, fresh salt.
    pub fn generate(config: &VaultConfig) -> Result<Self, KeywardError> {
        Ok(Self {
            memory_cost: config.kdf_memory_cost,
            iterations: config.kdf_iterations,
            parallelism: config.kdf_parallelism,
            salt: generate_salt()?,
        })
    }
}

/// A 256-bit vault key and the parameters it was derived with.
///
/// Key material is wiped on drop and never printed.
pub struct VaultKey {
    material: Zeroizing<[u8; KEY_LEN]>,
    params: KdfParams,
}

impl VaultKey {
    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    pub(crate) fn material(&self) -> &[u8; KEY_LEN] {
        &self.material
    }
}

impl fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultKey")
            .field("material", &"[REDACTED]")
            .field("params", &self.params)
            .finish()
    }
}

/// Derive the vault key for `passphrase` under `params`.
pub fn derive_key(passphrase: &SecretString, params: KdfParams) -> Result<VaultKey, KeywardError> {
    let argon_params = argon2::Params::new(
        params.memory_cost,
        params.iterations,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| KeywardError::Crypto(format!("invalid Argon2id parameters: {e}")))?;

    let argon2 = argon2::Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon_params,
    );

    let mut material = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(
            passphrase.expose_secret().as_bytes(),
            &params.salt,
            material.as_mut(),
        )
        .map_err(|e| KeywardError::Crypto(format!("Argon2id key derivation failed: {e}")))?;

    Ok(VaultKey { material, params })
}

/// Generate a random salt from the system CSPRNG.
pub fn generate_salt() -> Result<[u8; SALT_LEN], KeywardError> {
    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| KeywardError::Crypto("failed to generate random salt".to_string()))?;
    Ok(salt)
}
