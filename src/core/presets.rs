//! Preset to compression parameter mapping.
//!
//! | preset | max size (MB) | initial quality      |
//! |--------|---------------|----------------------|
//! | low    | 1.0           | 0.8                  |
//! | medium | 0.5           | 0.6                  |
//! | high   | 0.1           | 0.4                  |
//! | custom | 2.0           | custom percent / 100 |

use crate::core::{CompressionParams, Preset, QualityPercent};

const LOW: CompressionParams = CompressionParams { max_size_mb: 1.0, initial_quality: 0.8 };
const MEDIUM: CompressionParams = CompressionParams { max_size_mb: 0.5, initial_quality: 0.6 };
const HIGH: CompressionParams = CompressionParams { max_size_mb: 0.1, initial_quality: 0.4 };
const CUSTOM_MAX_SIZE_MB: f64 = 2.0;

/// Maps a preset to concrete parameters. `custom_quality` is only read for
/// [`Preset::Custom`].
pub fn params_for(preset: Preset, custom_quality: QualityPercent) -> CompressionParams {
    match preset {
        Preset::Low => LOW,
        Preset::Medium => MEDIUM,
        Preset::High => HIGH,
        Preset::Custom => CompressionParams {
            max_size_mb: CUSTOM_MAX_SIZE_MB,
            initial_quality: custom_quality.as_factor(),
        },
    }
}

/// Maps a preset by name; unrecognized names get the medium mapping.
pub fn params_for_name(name: &str, custom_quality: QualityPercent) -> CompressionParams {
    params_for(Preset::from_name(name), custom_quality)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(params: CompressionParams) -> (f64, f64) {
        (params.max_size_mb, params.initial_quality)
    }

    #[test]
    fn fixed_presets_ignore_custom_quality() {
        for q in [1, 35, 100] {
            let q = QualityPercent::clamped(q);
            assert_eq!(pair(params_for(Preset::Low, q)), (1.0, 0.8));
            assert_eq!(pair(params_for(Preset::Medium, q)), (0.5, 0.6));
            assert_eq!(pair(params_for(Preset::High, q)), (0.1, 0.4));
        }
    }

    #[test]
    fn custom_uses_percent() {
        assert_eq!(pair(params_for(Preset::Custom, QualityPercent::clamped(35))), (2.0, 0.35));
        assert_eq!(pair(params_for(Preset::Custom, QualityPercent::clamped(100))), (2.0, 1.0));
        assert_eq!(pair(params_for(Preset::Custom, QualityPercent::default())), (2.0, 0.7));
    }

    #[test]
    fn unknown_name_maps_like_medium() {
        let q = QualityPercent::clamped(20);
        assert_eq!(params_for_name("extreme", q), params_for(Preset::Medium, q));
        assert_eq!(params_for_name("High", q), params_for(Preset::High, q));
    }

    #[test]
    fn ceiling_in_bytes() {
        assert_eq!(params_for(Preset::Medium, QualityPercent::default()).max_size_bytes(), 524_288);
        assert_eq!(params_for(Preset::High, QualityPercent::default()).max_size_bytes(), 104_857);
    }
}
