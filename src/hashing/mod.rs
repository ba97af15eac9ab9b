use blake3::Hasher;

/// Canonical form of query text used for cache keys.
///
/// Trims, collapses internal whitespace runs to a single space and lowercases, so
/// `"  우울증   상담 "` and `"우울증 상담"` share an entry.
pub fn normalize_query(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Cache key for an embedding: BLAKE3 over the provider version and the normalized text.
///
/// The provider version is part of the key so that switching models never serves vectors
/// from another embedding space.
pub fn embedding_cache_key(text: &str, provider_version: &str) -> String {
    let normalized = normalize_query(text);

    let mut hasher = Hasher::new();
    hasher.update(provider_version.as_bytes());
    hasher.update(b"|");
    hasher.update(normalized.as_bytes());

    format!("emb:{}", hasher.finalize().to_hex())
}

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// Seeds the deterministic stub embedder. Too narrow to serve as a cache key.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}
