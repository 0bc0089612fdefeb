/// Number of digest bytes kept; the rest of the BLAKE3 output is dropped.
const FINGERPRINT_BYTES: usize = 16;

/// Derive a rule id from arbitrary content.
///
/// The id is the BLAKE3 hash of `content`, truncated to 128 bits and rendered
/// as 32 lowercase hex characters.
#[must_use]
pub fn fingerprint(content: &str) -> String {
    let hash = blake3::hash(content.as_bytes());
    hash.to_hex().as_str()[..FINGERPRINT_BYTES * 2].to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_32_hex_chars() {
        let id = fingerprint("mpu test/ 1d");
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn fingerprint_is_deterministic() {
        assert_eq!(fingerprint("expire * 1d"), fingerprint("expire * 1d"));
    }

    #[test]
    fn fingerprint_distinguishes_inputs() {
        assert_ne!(fingerprint("expire * 1d"), fingerprint("expire * 2d"));
        assert_ne!(fingerprint(""), fingerprint(" "));
    }

    #[test]
    fn fingerprint_is_blake3_prefix() {
        let full = blake3::hash(b"abc").to_hex();
        assert!(full.starts_with(&fingerprint("abc")));
    }
}
