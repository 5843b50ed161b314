// ops/secrets.rs
use anyhow::{bail, Result};
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use rand::{rngs::OsRng, seq::SliceRandom, RngCore};

pub const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &str = "0123456789";
pub const SPECIAL_CHARS: &str = "!@#%^&*()";

/// Générer un secret aléatoire à partir des familles de caractères choisies
pub fn generate_secret(len: usize, letters: bool, digits: bool, specials: bool) -> Result<String> {
    let mut charset = String::new();
    if digits {
        charset.push_str(DIGITS);
    }
    if letters {
        charset.push_str(LETTERS);
    }
    if specials {
        charset.push_str(SPECIAL_CHARS);
    }

    let chars: Vec<char> = charset.chars().collect();
    if chars.is_empty() {
        bail!("at least one character family is required");
    }

    let mut rng = OsRng;
    Ok((0..len)
        .filter_map(|_| chars.choose(&mut rng).copied())
        .collect())
}

/// Clé de 32 octets encodée en base64 url-safe (format Fernet)
pub fn generate_fernet_key() -> String {
    let mut key = [0u8; 32];
    OsRng.fill_bytes(&mut key);
    URL_SAFE.encode(key)
}
