//! Configuration for an [`IntensityStore`](super::IntensityStore).

/// Tuning knobs for canonicalization.
///
/// The default keeps the representation exactly as the range mutations leave
/// it: leading zeros are dropped and the trailing zero run is collapsed to a
/// single edge marker, but adjacent interior breakpoints that happen to carry
/// the same value are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StoreConfig {
    /// Remove every breakpoint whose value equals the one before it, so that
    /// the map is the strictly minimal encoding of the step function.
    pub coalesce_interior: bool,
}

impl StoreConfig {
    /// Config with interior coalescing switched on.
    pub const fn coalescing() -> Self {
        Self {
            coalesce_interior: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_keeps_interior_breakpoints() {
        let cfg = StoreConfig::default();
        assert!(!cfg.coalesce_interior);
    }

    #[test]
    fn coalescing_config() {
        assert!(StoreConfig::coalescing().coalesce_interior);
        assert_ne!(StoreConfig::coalescing(), StoreConfig::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: StoreConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, StoreConfig::default());

        let cfg: StoreConfig = serde_json::from_str(r#"{"coalesce_interior": true}"#).unwrap();
        assert_eq!(cfg, StoreConfig::coalescing());
    }
}
