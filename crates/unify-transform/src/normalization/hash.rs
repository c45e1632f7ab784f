//! One-way hashing of credentials.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the exact input bytes.
pub fn hash_password(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex() {
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
        assert_eq!(hash_password("password").len(), 64);
        assert_ne!(hash_password("password"), hash_password("password "));
    }
}
