//! # Axis Transform Module
//!
//! Turns relative mouse motion into right-stick deflection.
//!
//! ## Pipeline
//!
//! Each axis goes through the same stages, independently:
//!
//! 1. **Normalize**: `n = delta / 32767`
//! 2. **Dead zone**: `|n| < dead_zone / 100` becomes `0.0`
//! 3. **Sensitivity**: multiply by the horizontal or vertical sensitivity
//! 4. **Exponential curve** (optional): `sign(v) * v²`
//! 5. **Clamp** to `-1.0..=1.0`
//! 6. **Noise filter**: `v * (1 - w) + previous * w` with `w = noise_filter / 100`
//! 7. **Scale** to `-32767..=32767`, vertical axis inverted (mouse down is
//!    positive, stick down is negative). Reverse mode inverts it back.
//!
//! A dead-zoned axis still passes through the noise filter as `0.0`, so the
//! stick glides back toward center instead of snapping.
//!
//! ## Usage
//!
//! ```
//! use gamepad_bridge::mapping::transform::{AxisState, AxisTransform};
//!
//! let transform = AxisTransform::linear();
//! let (stick, _state) = transform.apply(16384, 0, AxisState::default());
//!
//! assert!((stick.x as i32 - 16384).abs() <= 1);
//! assert_eq!(stick.y, 0);
//! ```

/// Full-scale raw delta and full-scale stick value.
pub const AXIS_SCALE: f64 = 32767.0;

/// A stick position in output units (-32767..=32767).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StickPosition {
    pub x: i16,
    pub y: i16,
}

impl StickPosition {
    pub const CENTER: StickPosition = StickPosition { x: 0, y: 0 };

    #[must_use]
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// Noise-filter memory: the last filtered value of each axis (-1.0..=1.0).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisState {
    pub previous_x: f64,
    pub previous_y: f64,
}

/// Mouse-to-stick response settings.
///
/// Fields may be changed at any time; the next [`apply`](Self::apply) uses
/// the new values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTransform {
    /// Dead zone in percent of full range (0-100).
    pub dead_zone: f64,
    /// Multiplier for horizontal motion.
    pub horizontal_sensitivity: f64,
    /// Multiplier for vertical motion.
    pub vertical_sensitivity: f64,
    /// Square the response, preserving sign.
    pub exponential_curve: bool,
    /// Weight of the previous value in percent (0-100).
    pub noise_filter: f64,
    /// Cancels the default vertical inversion.
    pub reverse_mode: bool,
}

impl Default for AxisTransform {
    fn default() -> Self {
        Self {
            dead_zone: 5.0,
            horizontal_sensitivity: 1.0,
            vertical_sensitivity: 1.0,
            exponential_curve: true,
            noise_filter: 15.0,
            reverse_mode: false,
        }
    }
}

impl AxisTransform {
    /// No dead zone, unit sensitivity, no curve, no filtering.
    #[must_use]
    pub fn linear() -> Self {
        Self {
            dead_zone: 0.0,
            horizontal_sensitivity: 1.0,
            vertical_sensitivity: 1.0,
            exponential_curve: false,
            noise_filter: 0.0,
            reverse_mode: false,
        }
    }

    /// Maps one mouse delta to a stick position.
    ///
    /// # Arguments
    ///
    /// * `dx`, `dy` - Relative motion from the mouse
    /// * `previous` - Filter state returned by the previous call
    ///
    /// # Returns
    ///
    /// The stick position and the filter state for the next call.
    ///
    /// # Examples
    ///
    /// ```
    /// use gamepad_bridge::mapping::transform::{AxisState, AxisTransform};
    ///
    /// let mut transform = AxisTransform::linear();
    /// transform.dead_zone = 10.0;
    ///
    /// // 5% of full range is inside a 10% dead zone
    /// let (stick, _) = transform.apply(1638, 0, AxisState::default());
    /// assert_eq!(stick.x, 0);
    /// ```
    #[must_use]
    pub fn apply(&self, dx: i32, dy: i32, previous: AxisState) -> (StickPosition, AxisState) {
        let x = self.shape(f64::from(dx), self.horizontal_sensitivity);
        let y = self.shape(f64::from(dy), self.vertical_sensitivity);

        let weight = self.noise_filter / 100.0;
        let filtered_x = x * (1.0 - weight) + previous.previous_x * weight;
        let filtered_y = y * (1.0 - weight) + previous.previous_y * weight;

        let stick_y = if self.reverse_mode {
            to_stick(filtered_y)
        } else {
            to_stick(-filtered_y)
        };

        (
            StickPosition::new(to_stick(filtered_x), stick_y),
            AxisState {
                previous_x: filtered_x,
                previous_y: filtered_y,
            },
        )
    }

    /// Stages 1-5 for one axis.
    #[inline]
    fn shape(&self, delta: f64, sensitivity: f64) -> f64 {
        let mut value = delta / AXIS_SCALE;

        if value.abs() < self.dead_zone / 100.0 {
            value = 0.0;
        }

        value *= sensitivity;

        if self.exponential_curve {
            value = value.signum() * value * value;
        }

        value.clamp(-1.0, 1.0)
    }
}

/// Converts a normalized value to stick units, rounding to nearest.
#[must_use]
pub fn to_stick(normalized: f64) -> i16 {
    // Clamped to ±32767, so the cast cannot saturate.
    (normalized.clamp(-1.0, 1.0) * AXIS_SCALE).round() as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_once(transform: &AxisTransform, dx: i32, dy: i32) -> StickPosition {
        transform.apply(dx, dy, AxisState::default()).0
    }

    // ==================== Normalization Tests ====================

    #[test]
    fn test_half_deflection_linear() {
        let stick = apply_once(&AxisTransform::linear(), 16384, 0);
        assert!((i32::from(stick.x) - 16384).abs() <= 1, "got {}", stick.x);
        assert_eq!(stick.y, 0);
    }

    #[test]
    fn test_full_deflection() {
        let stick = apply_once(&AxisTransform::linear(), 32767, -32767);
        assert_eq!(stick.x, 32767);
        assert_eq!(stick.y, 32767); // mouse up -> stick up
    }

    #[test]
    fn test_out_of_range_delta_is_clamped() {
        let stick = apply_once(&AxisTransform::linear(), 100_000, 100_000);
        assert_eq!(stick.x, 32767);
        assert_eq!(stick.y, -32767);
    }

    #[test]
    fn test_to_stick_rounds() {
        assert_eq!(to_stick(0.0), 0);
        assert_eq!(to_stick(1.0), 32767);
        assert_eq!(to_stick(-1.0), -32767);
        assert_eq!(to_stick(2.0), 32767);
        assert_eq!(to_stick(0.5), 16384); // 16383.5 rounds away from zero
    }

    // ==================== Dead Zone Tests ====================

    #[test]
    fn test_dead_zone_zeroes_small_motion() {
        let mut transform = AxisTransform::linear();
        for dead_zone in [1.0, 5.0, 25.0, 50.0] {
            transform.dead_zone = dead_zone;
            let limit = (dead_zone / 100.0 * AXIS_SCALE) as i32 - 1;
            for delta in [1, limit / 2, limit] {
                let stick = apply_once(&transform, delta, -delta);
                assert_eq!(stick, StickPosition::CENTER, "dead zone {} delta {}", dead_zone, delta);
            }
        }
    }

    #[test]
    fn test_dead_zone_is_per_axis() {
        let mut transform = AxisTransform::linear();
        transform.dead_zone = 10.0;
        let stick = apply_once(&transform, 16384, 100);
        assert!(stick.x > 16000);
        assert_eq!(stick.y, 0);
    }

    #[test]
    fn test_motion_at_dead_zone_edge_passes() {
        let mut transform = AxisTransform::linear();
        transform.dead_zone = 10.0;
        let stick = apply_once(&transform, 3277, 0);
        assert!(stick.x > 0);
    }

    // ==================== Sensitivity & Curve Tests ====================

    #[test]
    fn test_sensitivity_per_axis() {
        let mut transform = AxisTransform::linear();
        transform.horizontal_sensitivity = 2.0;
        transform.vertical_sensitivity = 0.5;
        let stick = apply_once(&transform, 8192, 8192);
        assert!((i32::from(stick.x) - 16384).abs() <= 1);
        assert!((i32::from(stick.y) + 4096).abs() <= 1);
    }

    #[test]
    fn test_exponential_curve_preserves_sign() {
        let mut transform = AxisTransform::linear();
        transform.exponential_curve = true;
        let stick = apply_once(&transform, 16384, 16384);
        // 0.5² = 0.25
        assert!((i32::from(stick.x) - 8192).abs() <= 2);
        assert!((i32::from(stick.y) + 8192).abs() <= 2);

        let stick = apply_once(&transform, -16384, 0);
        assert!(stick.x < 0);
    }

    #[test]
    fn test_curve_applies_after_sensitivity_and_before_clamp() {
        let mut transform = AxisTransform::linear();
        transform.exponential_curve = true;
        transform.horizontal_sensitivity = 4.0;
        let stick = apply_once(&transform, 16384, 0);
        assert_eq!(stick.x, 32767);
    }

    // ==================== Noise Filter Tests ====================

    #[test]
    fn test_noise_filter_blends_previous_value() {
        let mut transform = AxisTransform::linear();
        transform.noise_filter = 50.0;

        let previous = AxisState {
            previous_x: 1.0,
            previous_y: 0.0,
        };
        let (stick, state) = transform.apply(0, 0, previous);
        assert!((i32::from(stick.x) - 16384).abs() <= 1);
        assert!((state.previous_x - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_dead_zoned_axis_decays_gradually() {
        let mut transform = AxisTransform::linear();
        transform.dead_zone = 10.0;
        transform.noise_filter = 50.0;

        let (first, state) = transform.apply(32767, 0, AxisState::default());
        let (second, state) = transform.apply(10, 0, state);
        let (third, _) = transform.apply(10, 0, state);

        assert!(first.x > second.x);
        assert!(second.x > third.x);
        assert!(third.x > 0, "filter must not snap to center");
    }

    #[test]
    fn test_filter_state_tracks_unreversed_value() {
        let mut transform = AxisTransform::linear();
        let (_, plain) = transform.apply(0, 16384, AxisState::default());
        transform.reverse_mode = true;
        let (_, reversed) = transform.apply(0, 16384, AxisState::default());
        assert_eq!(plain, reversed);
    }

    // ==================== Reverse Mode Tests ====================

    #[test]
    fn test_vertical_axis_inverted_by_default() {
        let stick = apply_once(&AxisTransform::linear(), 0, 16384);
        assert!(stick.y < 0);
    }

    #[test]
    fn test_reverse_mode_cancels_inversion() {
        let mut transform = AxisTransform::linear();
        transform.reverse_mode = true;
        let stick = apply_once(&transform, 0, 16384);
        assert!(stick.y > 0);
        assert!((i32::from(stick.y) - 16384).abs() <= 1);
    }

    #[test]
    fn test_reverse_mode_is_an_involution() {
        let mut transform = AxisTransform::linear();
        let original = apply_once(&transform, 1200, -9000);

        transform.reverse_mode = !transform.reverse_mode;
        let flipped = apply_once(&transform, 1200, -9000);
        transform.reverse_mode = !transform.reverse_mode;
        let restored = apply_once(&transform, 1200, -9000);

        assert_eq!(flipped.y, -original.y);
        assert_eq!(restored, original);
    }

    #[test]
    fn test_reverse_mode_leaves_horizontal_axis() {
        let mut transform = AxisTransform::linear();
        let plain = apply_once(&transform, 5000, 0);
        transform.reverse_mode = true;
        let reversed = apply_once(&transform, 5000, 0);
        assert_eq!(plain.x, reversed.x);
    }

    #[test]
    fn test_default_settings() {
        let transform = AxisTransform::default();
        assert_eq!(transform.dead_zone, 5.0);
        assert_eq!(transform.noise_filter, 15.0);
        assert!(transform.exponential_curve);
        assert!(!transform.reverse_mode);
    }
}
