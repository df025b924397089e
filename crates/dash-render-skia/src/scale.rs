// File: crates/dash-render-skia/src/scale.rs
// Summary: Date (X) and value (Y) scale transforms from data space to pixels.

use chrono::NaiveDate;

/// Horizontal date scale mapping `[start, end]` to `[left_px, right_px]`.
#[derive(Clone, Copy, Debug)]
pub struct DateScale {
    pub left_px: f32,
    pub right_px: f32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateScale {
    pub fn new(left_px: f32, right_px: f32, start: NaiveDate, end: NaiveDate) -> Self {
        let end = if end <= start { start.succ_opt().unwrap_or(start) } else { end };
        Self { left_px, right_px, start, end }
    }

    fn span_days(&self) -> f64 {
        ((self.end - self.start).num_days() as f64).max(1.0)
    }

    /// Days since `start`, the logical x used for downsampling.
    #[inline]
    pub fn logical(&self, d: NaiveDate) -> f64 {
        (d - self.start).num_days() as f64
    }

    #[inline]
    pub fn to_px(&self, d: NaiveDate) -> f32 {
        self.logical_to_px(self.logical(d))
    }

    #[inline]
    pub fn logical_to_px(&self, x: f64) -> f32 {
        self.left_px + (x / self.span_days()) as f32 * (self.right_px - self.left_px)
    }

    /// Pixel width of one calendar day.
    pub fn day_px(&self) -> f32 {
        (self.right_px - self.left_px) / self.span_days() as f32
    }
}

/// Vertical value scale mapping data range to [top, bottom] pixels.
#[derive(Clone, Copy, Debug)]
pub struct ValueScale {
    pub top_px: f32,
    pub bottom_px: f32,
    pub vmin: f64,
    pub vmax: f64,
}

impl ValueScale {
    pub fn new_linear(top_px: f32, bottom_px: f32, vmin: f64, vmax: f64) -> Self {
        let mut s = Self { top_px, bottom_px, vmin, vmax };
        if (s.vmax - s.vmin).abs() < 1e-12 { s.vmax = s.vmin + 1.0; }
        s
    }

    #[inline]
    pub fn to_px(&self, y: f64) -> f32 {
        let span = (self.vmax - self.vmin).max(1e-12);
        self.bottom_px - ((y - self.vmin) / span) as f32 * (self.bottom_px - self.top_px)
    }

    /// Pixel row of `y` clamped into the plot.
    pub fn to_px_clamped(&self, y: f64) -> f32 {
        self.to_px(y).clamp(self.top_px, self.bottom_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_scale_round_trips_ends() {
        let s = ValueScale::new_linear(10.0, 110.0, 0.0, 50.0);
        assert_eq!(s.to_px(0.0), 110.0);
        assert_eq!(s.to_px(50.0), 10.0);
        assert_eq!(s.to_px(25.0), 60.0);
        // Degenerate range is widened rather than dividing by zero.
        let flat = ValueScale::new_linear(0.0, 100.0, 3.0, 3.0);
        assert_eq!(flat.vmax, 4.0);
    }

    #[test]
    fn date_scale_maps_days_linearly() {
        let a = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 1, 11).unwrap();
        let s = DateScale::new(0.0, 100.0, a, b);
        assert_eq!(s.to_px(a), 0.0);
        assert_eq!(s.to_px(b), 100.0);
        assert_eq!(s.to_px(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()), 50.0);
        assert_eq!(s.day_px(), 10.0);
    }
}
