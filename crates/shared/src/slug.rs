//! Public slug generation for shareable invitation pages.

use rand::Rng;

/// Length of the random suffix appended to every invitation slug.
pub const SLUG_SUFFIX_LEN: usize = 6;

/// Longest slug stem kept before the suffix.
const MAX_STEM_LEN: usize = 60;

// Avoiding confusing chars: 0, o, 1, l
const SUFFIX_CHARS: &[u8] = b"abcdefghijkmnpqrstuvwxyz23456789";

/// Lowercases `input` and joins its ASCII alphanumeric runs with single dashes.
///
/// Apostrophes are dropped rather than split on, so `Bog'i` becomes `bogi`.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars() {
        if c == '\'' || c == '\u{2019}' || c == '`' {
            continue;
        }
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if out.len() > MAX_STEM_LEN {
        out.truncate(MAX_STEM_LEN);
        while out.ends_with('-') {
            out.pop();
        }
    }
    out
}

/// Generates a random lowercase suffix.
pub fn random_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| SUFFIX_CHARS[rng.gen_range(0..SUFFIX_CHARS.len())] as char)
        .collect()
}

/// Builds an invitation slug such as `jahongir-sarvinoz-k3x9qa`.
pub fn invitation_slug(groom_name: &str, bride_name: &str) -> String {
    let stem = slugify(&format!("{} {}", groom_name, bride_name));
    let stem = if stem.is_empty() {
        "wedding".to_string()
    } else {
        stem
    };
    format!("{}-{}", stem, random_suffix(SLUG_SUFFIX_LEN))
}
