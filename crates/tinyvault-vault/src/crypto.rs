// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM encryption of individual record passwords.
//!
//! Every call to [`encrypt`] draws a fresh random 96-bit nonce from the
//! system CSPRNG. Nonce reuse under one key would be catastrophic for GCM.

use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use tinyvault_core::{Ciphertext, VaultError};
use zeroize::Zeroizing;

use crate::kdf::DerivedKey;

fn aead_key(key: &DerivedKey) -> Result<LessSafeKey, VaultError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key.as_bytes())
        .map_err(|_| VaultError::Internal("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext` under `key` with a random nonce and no associated data.
///
/// The returned `data` is the ciphertext with the 16-byte tag appended.
pub fn encrypt(key: &DerivedKey, plaintext: &str) -> Result<Ciphertext, VaultError> {
    let sealing_key = aead_key(key)?;

    let rng = SystemRandom::new();
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill(&mut nonce_bytes)
        .map_err(|_| VaultError::Internal("failed to generate random nonce".to_string()))?;

    let mut in_out = plaintext.as_bytes().to_vec();
    sealing_key
        .seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::empty(),
            &mut in_out,
        )
        .map_err(|_| VaultError::Internal("AES-256-GCM encryption failed".to_string()))?;

    Ok(Ciphertext {
        nonce: nonce_bytes.to_vec(),
        data: in_out,
    })
}

/// Decrypt a [`Ciphertext`] produced by [`encrypt`].
///
/// Every failure (wrong key, tampered data, malformed nonce, non-UTF-8
/// plaintext) is [`VaultError::DecryptionFailed`]. No partial plaintext is
/// ever returned.
pub fn decrypt(key: &DerivedKey, ciphertext: &Ciphertext) -> Result<String, VaultError> {
    let nonce_bytes: [u8; NONCE_LEN] = ciphertext
        .nonce
        .as_slice()
        .try_into()
        .map_err(|_| VaultError::DecryptionFailed)?;
    let opening_key = aead_key(key)?;

    let mut in_out = Zeroizing::new(ciphertext.data.clone());
    let plaintext = opening_key
        .open_in_place(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::empty(),
            in_out.as_mut_slice(),
        )
        .map_err(|_| VaultError::DecryptionFailed)?;

    std::str::from_utf8(plaintext)
        .map(str::to_owned)
        .map_err(|_| VaultError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf::derive_key;
    use proptest::prelude::*;

    fn key(seed: u8) -> DerivedKey {
        derive_key(b"test master", &[seed; 16], 10).unwrap()
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let k = key(1);
        let ct = encrypt(&k, "p@ss1").unwrap();
        assert_eq!(decrypt(&k, &ct).unwrap(), "p@ss1");
    }

    #[test]
    fn ciphertext_carries_nonce_and_tag() {
        let ct = encrypt(&key(1), "hello").unwrap();
        assert_eq!(ct.nonce.len(), 12);
        assert_eq!(ct.data.len(), "hello".len() + 16);
    }

    #[test]
    fn same_plaintext_encrypts_differently() {
        let k = key(1);
        let ct1 = encrypt(&k, "same input twice").unwrap();
        let ct2 = encrypt(&k, "same input twice").unwrap();

        assert_ne!(ct1.nonce, ct2.nonce);
        assert_ne!(ct1.data, ct2.data);
    }

    #[test]
    fn nonces_do_not_repeat_across_many_encryptions() {
        let k = key(1);
        let mut nonces = std::collections::HashSet::new();
        for _ in 0..1000 {
            let ct = encrypt(&k, "same input").unwrap();
            assert_eq!(ct.nonce.len(), 12);
            assert!(nonces.insert(ct.nonce), "nonce reused");
        }
        assert_eq!(nonces.len(), 1000);
    }

    #[test]
    fn wrong_key_fails() {
        let ct = encrypt(&key(1), "secret").unwrap();
        assert!(matches!(
            decrypt(&key(2), &ct),
            Err(VaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn tampered_data_or_nonce_fails() {
        let k = key(1);
        let ct = encrypt(&k, "do not tamper").unwrap();

        let mut bad_data = ct.clone();
        bad_data.data[0] ^= 0x01;
        assert!(matches!(decrypt(&k, &bad_data), Err(VaultError::DecryptionFailed)));

        let mut bad_nonce = ct.clone();
        bad_nonce.nonce[11] ^= 0x80;
        assert!(matches!(decrypt(&k, &bad_nonce), Err(VaultError::DecryptionFailed)));
    }

    #[test]
    fn malformed_nonce_length_fails() {
        let k = key(1);
        let mut ct = encrypt(&k, "x").unwrap();
        ct.nonce.pop();
        assert!(matches!(decrypt(&k, &ct), Err(VaultError::DecryptionFailed)));

        let empty = Ciphertext {
            nonce: Vec::new(),
            data: Vec::new(),
        };
        assert!(matches!(decrypt(&k, &empty), Err(VaultError::DecryptionFailed)));
    }

    #[test]
    fn truncated_tag_fails() {
        let k = key(1);
        let mut ct = encrypt(&k, "abc").unwrap();
        ct.data.truncate(10);
        assert!(matches!(decrypt(&k, &ct), Err(VaultError::DecryptionFailed)));
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let k = key(3);
        let ct = encrypt(&k, "").unwrap();
        assert_eq!(ct.data.len(), 16);
        assert_eq!(decrypt(&k, &ct).unwrap(), "");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn any_utf8_plaintext_roundtrips(plaintext in "\\PC{0,64}") {
            let k = key(4);
            let ct = encrypt(&k, &plaintext).unwrap();
            prop_assert_eq!(decrypt(&k, &ct).unwrap(), plaintext);
        }

        #[test]
        fn any_single_bit_flip_is_detected(byte in 0usize..21, bit in 0u8..8) {
            let k = key(5);
            let mut ct = encrypt(&k, "hunter2").unwrap();
            let idx = byte % ct.data.len();
            ct.data[idx] ^= 1 << bit;
            prop_assert!(decrypt(&k, &ct).is_err());
        }
    }
}
