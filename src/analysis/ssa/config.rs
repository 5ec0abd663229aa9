//! Configuration for SSA construction.

/// Options for [`function_to_ssa_form`](super::function_to_ssa_form).
///
/// # Examples
///
/// ```rust
/// use ssagraph::analysis::ssa::SsaConfig;
///
/// let config = SsaConfig::pruned();
/// assert!(config.prune_unused_phis);
/// assert!(config.verify);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SsaConfig {
    /// Run [`verify_ssa`](super::verify_ssa) on the converted function and fail the
    /// conversion if it reports a problem
    pub verify: bool,
    /// Remove phi instructions whose result never reaches a non-phi instruction,
    /// together with their target registers
    pub prune_unused_phis: bool,
}

impl Default for SsaConfig {
    fn default() -> Self {
        Self {
            verify: true,
            prune_unused_phis: false,
        }
    }
}

impl SsaConfig {
    /// Creates a configuration that only converts: no verification, no pruning.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            verify: false,
            prune_unused_phis: false,
        }
    }

    /// Creates a configuration that verifies the result. Same as the default.
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Creates a configuration producing pruned SSA form, verified.
    #[must_use]
    pub fn pruned() -> Self {
        Self {
            verify: true,
            prune_unused_phis: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssa_config_presets() {
        let minimal = SsaConfig::minimal();
        assert!(!minimal.verify);
        assert!(!minimal.prune_unused_phis);

        let strict = SsaConfig::strict();
        assert!(strict.verify);
        assert!(!strict.prune_unused_phis);
        assert_eq!(strict, SsaConfig::default());

        let pruned = SsaConfig::pruned();
        assert!(pruned.verify);
        assert!(pruned.prune_unused_phis);
    }
}
