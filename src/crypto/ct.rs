use subtle::ConstantTimeEq;

/// Compare two byte strings without short-circuiting on the first mismatch.
///
/// Lengths are not secret; unequal lengths return `false` immediately.
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}
