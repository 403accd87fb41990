//! TTL Module
//!
//! How long an entry stays readable after it is written.

// == Ttl ==
/// Lifetime requested for a single `set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ttl {
    /// Use the store's default TTL
    #[default]
    Default,
    /// Expire this many milliseconds after the write; `After(0)` means `Default`
    After(u64),
    /// Never expire, whatever the default is
    Never,
}

impl Ttl {
    // == Resolve ==
    /// Resolves to an effective TTL in milliseconds, or `None` for no expiry.
    ///
    /// A zero default disables expiry for `Default` and `After(0)`.
    pub fn resolve(self, default_ttl_ms: u64) -> Option<u64> {
        let ttl_ms = match self {
            Ttl::Never => return None,
            Ttl::Default | Ttl::After(0) => default_ttl_ms,
            Ttl::After(ms) => ms,
        };

        (ttl_ms > 0).then_some(ttl_ms)
    }
}

impl From<Option<u64>> for Ttl {
    fn from(ttl_ms: Option<u64>) -> Self {
        ttl_ms.map_or(Ttl::Default, Ttl::After)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_store_default() {
        assert_eq!(Ttl::Default.resolve(300), Some(300));
    }

    #[test]
    fn test_zero_falls_back_to_default() {
        assert_eq!(Ttl::After(0).resolve(300), Some(300));
    }

    #[test]
    fn test_explicit_ttl_wins() {
        assert_eq!(Ttl::After(10).resolve(300), Some(10));
    }

    #[test]
    fn test_never_ignores_default() {
        assert_eq!(Ttl::Never.resolve(300), None);
    }

    #[test]
    fn test_zero_default_disables_expiry() {
        assert_eq!(Ttl::Default.resolve(0), None);
        assert_eq!(Ttl::After(0).resolve(0), None);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Ttl::from(None), Ttl::Default);
        assert_eq!(Ttl::from(Some(5)), Ttl::After(5));
    }
}
