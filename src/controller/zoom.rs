//! Clamped zoom accumulator

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 3.0;
pub const DEFAULT_SCALE: f64 = 1.0;
pub const ZOOM_STEP: f64 = 0.1;

/// Round to two decimals so repeated steps land on exact grid values
fn snap(scale: f64) -> f64 {
    ((scale * 100.0).round() / 100.0).clamp(MIN_SCALE, MAX_SCALE)
}

/// Viewer zoom factor, always within `[MIN_SCALE, MAX_SCALE]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomScale(f64);

impl Default for ZoomScale {
    fn default() -> Self {
        Self(DEFAULT_SCALE)
    }
}

impl ZoomScale {
    /// Create a scale, clamping out-of-range values
    pub fn new(scale: f64) -> Self {
        if scale.is_nan() {
            return Self::default();
        }
        Self(snap(scale))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn zoom_in(&mut self) {
        self.0 = snap(self.0 + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.0 = snap(self.0 - ZOOM_STEP);
    }

    pub fn reset(&mut self) {
        self.0 = DEFAULT_SCALE;
    }

    /// Zoom as a whole percentage, for display
    pub fn percent(&self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_zoom_in_never_exceeds_max() {
        let mut zoom = ZoomScale::default();
        for _ in 0..100 {
            zoom.zoom_in();
            assert!(zoom.value() <= MAX_SCALE);
        }
        assert_eq!(zoom.value(), MAX_SCALE);
    }

    #[test]
    fn test_zoom_out_never_below_min() {
        let mut zoom = ZoomScale::default();
        for _ in 0..100 {
            zoom.zoom_out();
            assert!(zoom.value() >= MIN_SCALE);
        }
        assert_eq!(zoom.value(), MIN_SCALE);
    }

    #[test]
    fn test_reset_returns_exact_default() {
        let mut zoom = ZoomScale::default();
        for _ in 0..7 {
            zoom.zoom_in();
        }
        zoom.zoom_out();
        zoom.reset();
        assert_eq!(zoom.value(), DEFAULT_SCALE);

        for _ in 0..50 {
            zoom.zoom_out();
        }
        zoom.reset();
        assert_eq!(zoom.value(), DEFAULT_SCALE);
    }

    #[test]
    fn test_steps_do_not_drift() {
        let mut zoom = ZoomScale::default();
        for _ in 0..3 {
            zoom.zoom_in();
        }
        assert_eq!(zoom.value(), 1.3);
        assert_eq!(zoom.percent(), 130);
        for _ in 0..3 {
            zoom.zoom_out();
        }
        assert_eq!(zoom.value(), 1.0);
    }

    #[rstest]
    #[case(0.1, MIN_SCALE)]
    #[case(10.0, MAX_SCALE)]
    #[case(1.25, 1.25)]
    #[case(f64::NAN, DEFAULT_SCALE)]
    fn test_new_clamps(#[case] input: f64, #[case] expected: f64) {
        assert_eq!(ZoomScale::new(input).value(), expected);
    }
}
