//! Cache key derivation.
//!
//! Keys are a pure function of (method, url, normalized params), so
//! identical requests collapse to one slot and any parameter change
//! produces a different key.

use super::RequestDescriptor;
use crate::cache::CACHE_PREFIX;

/// Longest URL slug carried into a derived key.
const MAX_SLUG_LEN: usize = 40;

/// Derives the cache key for a request: the cache prefix, a slug of the
/// URL path's trailing segments, and a folded hash of the full request
/// shape.
///
/// The slug keeps derived keys pattern-matchable (category invalidation
/// matches on it); the hash keeps them collision-resistant across
/// parameter combinations. Not cryptographic, and does not need to be:
/// the input domain is a few hundred endpoint+parameter combinations.
pub fn derive_key(req: &RequestDescriptor) -> String {
    let canonical = format!("{}|{}|{}", req.method, req.url, req.canonical_params());
    format!(
        "{}{}_{}",
        CACHE_PREFIX,
        url_slug(&req.url),
        fold_hash(&canonical)
    )
}

/// Polynomial rolling hash (djb2 xor variant) over the canonical string.
fn fold_hash(input: &str) -> String {
    let mut h: u64 = 5381;
    for b in input.bytes() {
        h = h.wrapping_mul(33) ^ u64::from(b);
    }
    to_radix_36(h)
}

/// Folds a u64 to a lowercase base-36 string.
fn to_radix_36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("radix digits are ascii")
}

/// Sanitized fragment of the URL path's last segments.
fn url_slug(url: &str) -> String {
    // Strip scheme and host, then any query string
    let after_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = after_scheme.split_once('/').map_or("", |(_, p)| p);
    let path = path.split('?').next().unwrap_or("");

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let tail = if segments.len() > 2 {
        &segments[segments.len() - 2..]
    } else {
        &segments[..]
    };

    let mut slug: String = tail
        .join("_")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    slug.truncate(MAX_SLUG_LEN);
    if slug.is_empty() {
        slug.push_str("root");
    }
    slug
}
