use sha1::{Digest, Sha1};

pub fn sha1_hex(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// First 8 hex chars of the SHA1 of `value`, for generated file names
pub fn short_sha1(value: &str) -> String {
    let mut digest = sha1_hex(value.as_bytes());
    digest.truncate(8);
    digest
}
