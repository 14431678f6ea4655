//! Per-call options and builder

use std::time::Duration;

/// TTL applied to every entry unless a call overrides it
pub const DEFAULT_TTL: Duration = Duration::from_secs(10);

/// Options for a single write or populate call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheOptions {
    /// Time-to-live override; `None` uses the cache-wide TTL
    pub ttl: Option<Duration>,
}

/// Builder for CacheOptions with fluent API
#[derive(Debug, Clone, Default)]
pub struct CacheOpts(CacheOptions);

impl CacheOpts {
    /// Create new options builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set TTL
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.0.ttl = Some(duration);
        self
    }

    /// Set TTL in seconds
    pub fn ttl_secs(self, seconds: u64) -> Self {
        self.ttl(Duration::from_secs(seconds))
    }

    /// Set TTL in milliseconds
    pub fn ttl_millis(self, millis: u64) -> Self {
        self.ttl(Duration::from_millis(millis))
    }

    /// Build the options
    pub fn build(self) -> CacheOptions {
        self.0
    }
}

impl From<CacheOpts> for CacheOptions {
    fn from(opts: CacheOpts) -> Self {
        opts.0
    }
}

impl From<Duration> for CacheOptions {
    fn from(ttl: Duration) -> Self {
        CacheOptions { ttl: Some(ttl) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_default() {
        let opts = CacheOpts::new().build();
        assert!(opts.ttl.is_none());
    }

    #[test]
    fn test_builder_ttl() {
        assert_eq!(
            CacheOpts::new().ttl_secs(60).build().ttl,
            Some(Duration::from_secs(60))
        );
        assert_eq!(
            CacheOpts::new().ttl_millis(1500).build().ttl,
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_from_duration() {
        let opts: CacheOptions = Duration::from_secs(300).into();
        assert_eq!(opts.ttl, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_default_ttl_is_ten_seconds() {
        assert_eq!(DEFAULT_TTL, Duration::from_secs(10));
    }
}
