// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random password generation.

use ring::rand::{SecureRandom, SystemRandom};
use secrecy::SecretString;
use tinyvault_config::model::GeneratorConfig;
use tinyvault_core::VaultError;
use zeroize::Zeroizing;

pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &str = "0123456789";
pub const SYMBOLS: &str = "!@#$%^&*()_+[]{}|;:,.<>?";

/// The alphabet selected by `config`. Lowercase letters are always included.
pub fn alphabet(config: &GeneratorConfig) -> String {
    let mut chars = String::from(LOWERCASE);
    if config.uppercase {
        chars.push_str(UPPERCASE);
    }
    if config.digits {
        chars.push_str(DIGITS);
    }
    if config.symbols {
        chars.push_str(SYMBOLS);
    }
    chars
}

/// Generate a password of `config.length` characters drawn uniformly from
/// [`alphabet`].
///
/// Random bytes at or above the largest multiple of the alphabet size are
/// discarded, so every character is equally likely.
pub fn generate_password(config: &GeneratorConfig) -> Result<SecretString, VaultError> {
    if config.length == 0 {
        return Err(VaultError::InvalidInput(
            "password length must be greater than zero".to_string(),
        ));
    }

    let alphabet = alphabet(config).into_bytes();
    let n = alphabet.len();
    let limit = 256 - (256 % n);

    let rng = SystemRandom::new();
    let mut buf = Zeroizing::new([0u8; 64]);
    let mut password = String::with_capacity(config.length);

    while password.len() < config.length {
        rng.fill(&mut buf[..])
            .map_err(|_| VaultError::Internal("failed to generate random bytes".to_string()))?;
        for &byte in buf.iter() {
            let byte = usize::from(byte);
            if byte >= limit {
                continue;
            }
            password.push(char::from(alphabet[byte % n]));
            if password.len() == config.length {
                break;
            }
        }
    }

    Ok(SecretString::from(password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn config(length: usize, uppercase: bool, digits: bool, symbols: bool) -> GeneratorConfig {
        GeneratorConfig {
            length,
            uppercase,
            digits,
            symbols,
        }
    }

    #[test]
    fn default_config_yields_sixteen_chars_from_full_alphabet() {
        let cfg = GeneratorConfig::default();
        let full = alphabet(&cfg);
        assert_eq!(full.len(), 26 + 26 + 10 + 24);

        let password = generate_password(&cfg).unwrap();
        let password = password.expose_secret();
        assert_eq!(password.len(), 16);
        assert!(password.chars().all(|c| full.contains(c)));
    }

    #[test]
    fn lowercase_only_when_all_classes_disabled() {
        let cfg = config(64, false, false, false);
        let password = generate_password(&cfg).unwrap();
        assert!(password.expose_secret().chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn digits_without_symbols() {
        let cfg = config(128, false, true, false);
        let password = generate_password(&cfg).unwrap();
        assert!(
            password
                .expose_secret()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn zero_length_is_invalid() {
        let err = generate_password(&config(0, true, true, true)).unwrap_err();
        assert!(matches!(err, VaultError::InvalidInput(_)));
    }

    #[test]
    fn consecutive_passwords_differ() {
        let cfg = config(32, true, true, true);
        let a = generate_password(&cfg).unwrap();
        let b = generate_password(&cfg).unwrap();
        assert_ne!(a.expose_secret(), b.expose_secret());
    }

    #[test]
    fn long_passwords_fill_past_one_buffer() {
        let password = generate_password(&config(500, true, true, true)).unwrap();
        assert_eq!(password.expose_secret().len(), 500);
    }
}
