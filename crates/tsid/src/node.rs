use md5::{Digest, Md5};

/// Largest value the 6-bit node ID field can hold.
pub const MAX_NODE_ID: u8 = 0b0011_1111;

/// Derives the default node ID for this host from its machine name.
///
/// Used when a generator is constructed without an explicit node ID. The
/// result is deterministic per machine name, which gives independently
/// started generators on different hosts a best-effort chance of picking
/// different node IDs. It offers no uniformity or uniqueness guarantee.
pub fn derive_node_id() -> u8 {
    let host = gethostname::gethostname();
    node_id_for_name(&host.to_string_lossy())
}

/// Derives a node ID from an arbitrary machine name.
///
/// The derivation hashes the name with MD5 (128 bits), folds the digest
/// into a single non-zero `u64`, scales it into the node ID range via its
/// leading decimal fraction, and truncates.
///
/// Note the final multiplier is the maximum node ID value (63) rather than
/// the field cardinality (64), so the achievable range is effectively
/// `0..=62`. This bias is preserved for compatibility with existing
/// deployments.
pub fn node_id_for_name(name: &str) -> u8 {
    let digest = Md5::digest(name.as_bytes());

    let mut lo = [0_u8; 8];
    let mut hi = [0_u8; 8];
    lo.copy_from_slice(&digest[..8]);
    hi.copy_from_slice(&digest[8..]);

    // Fold the two digest halves into one value
    let mixed = !(u64::from_le_bytes(lo) ^ u64::from_le_bytes(hi));

    // Control for the degenerate zero value
    let mixed = if mixed == 0 { 1 } else { mixed };

    // Move all decimal digits behind the point, yielding a fraction in
    // [0.1, 1), then scale into the node ID range.
    let digits = mixed.ilog10() + 1;
    let frac = mixed as f64 / 10_f64.powi(digits as i32);
    (frac * f64::from(MAX_NODE_ID)) as u8
}
