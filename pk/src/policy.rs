//! Runtime policy (`SPEC_FULL.md` §4.0.3): parameterization of PK dispatch
//! as a plain constructor argument rather than a global config file,
//! matching the teacher's `Config` struct pattern scaled to what this
//! crate needs.

/// Governs nonce selection for DSA/ECDSA signing and whether FIPS-only
/// restrictions apply (spec.md §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// FIPS 140 mode: deterministic (RFC 6979) signing is disallowed
    /// outside self-test, and DH peer validation requires the subgroup
    /// check whenever `q` is known.
    pub fips: bool,
    /// Caller requested deterministic (RFC 6979) nonce derivation for
    /// DSA/ECDSA signing. Honored unless `fips` is set and the current
    /// call is not a self-test.
    pub reproducible: bool,
}

impl Policy {
    /// The library's default posture: no FIPS restriction, randomized
    /// nonces.
    pub const fn new() -> Self {
        Policy {
            fips: false,
            reproducible: false,
        }
    }

    /// Whether a deterministic nonce is actually allowed right now, given
    /// `self_test` (the global lib-state is "self-test", spec.md §4.4).
    pub(crate) fn allow_deterministic_nonce(&self, self_test: bool) -> bool {
        if self.fips && !self_test {
            return false;
        }
        self.reproducible || self_test
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::new()
    }
}
