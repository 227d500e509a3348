use sha2::{Digest, Sha256};

/// Digest over several byte slices in order. Each part is length-prefixed.
pub fn sha256_hex_parts<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_digest() {
        assert_eq!(
            sha256_hex_parts(std::iter::empty()),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn part_boundaries_change_digest() {
        let joined = sha256_hex_parts([b"ab".as_slice(), b"c".as_slice()]);
        let split = sha256_hex_parts([b"a".as_slice(), b"bc".as_slice()]);
        assert_ne!(joined, split);
    }
}
