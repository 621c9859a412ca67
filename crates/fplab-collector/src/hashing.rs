use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `bytes` (64 characters).
#[must_use]
pub fn sha256_hex(bytes: impl AsRef<[u8]>) -> String {
    format!("{:x}", Sha256::digest(bytes.as_ref()))
}

/// Hash of rendered audio samples, taken over their little-endian `f32` bytes.
#[must_use]
pub fn sha256_hex_f32(samples: &[f32]) -> String {
    let mut hasher = Sha256::new();
    for sample in samples {
        hasher.update(sample.to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_is_stable_and_distinguishing() {
        let a = sha256_hex("canvas");
        assert_eq!(a, sha256_hex("canvas"));
        assert_ne!(a, sha256_hex("canvas "));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn f32_digest_matches_byte_digest() {
        let samples = [0.0_f32, 0.5, -1.0];
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        assert_eq!(sha256_hex_f32(&samples), sha256_hex(bytes));
    }
}
