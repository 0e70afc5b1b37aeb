/// Linear map from a data interval onto a pixel interval.
///
/// The range may be inverted (`range.0 > range.1`), which is how the y axis
/// puts larger values nearer the top of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    #[inline]
    pub fn to_px(&self, v: f64) -> f32 {
        let (d0, d1) = self.domain;
        let span = d1 - d0;
        // A degenerate domain (single-year dataset) maps to the range start.
        let t = if span.abs() < 1e-12 { 0.0 } else { (v - d0) / span };
        self.range.0 + (t as f32) * (self.range.1 - self.range.0)
    }

    /// Evenly spaced "nice" values covering the domain, roughly `count` of
    /// them. Steps are 1, 2 or 5 times a power of ten.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain);
        let step = tick_step(lo, hi, count);
        if step <= 0.0 || !step.is_finite() {
            return vec![lo];
        }
        let first = (lo / step - 1e-9).ceil() as i64;
        let last = (hi / step + 1e-9).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }

    /// Decimal places needed to print this scale's ticks without noise.
    pub fn tick_precision(&self, count: usize) -> usize {
        let (lo, hi) = ordered(self.domain);
        let step = tick_step(lo, hi, count);
        if step <= 0.0 || !step.is_finite() {
            return 0;
        }
        (-step.log10().floor()).max(0.0) as usize
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Step between ticks for `count` ticks across `[lo, hi]`.
pub fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let count = count.max(1) as f64;
    let raw = (hi - lo).abs() / count;
    if raw == 0.0 {
        return 0.0;
    }
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    power * factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn maps_domain_ends_onto_range_ends() {
        let x = LinearScale::new((1950.0, 2020.0), (80.0, 840.0));
        assert_abs_diff_eq!(x.to_px(1950.0), 80.0);
        assert_abs_diff_eq!(x.to_px(2020.0), 840.0);
        assert_abs_diff_eq!(x.to_px(1985.0), 460.0);
    }

    #[test]
    fn inverted_range_puts_large_values_on_top() {
        let y = LinearScale::new((288.0, 290.0), (440.0, 50.0));
        assert!(y.to_px(290.0) < y.to_px(288.0));
        assert_abs_diff_eq!(y.to_px(289.0), 245.0);
    }

    #[test]
    fn single_point_domain_does_not_divide_by_zero() {
        let x = LinearScale::new((2015.0, 2015.0), (80.0, 840.0));
        assert_abs_diff_eq!(x.to_px(2015.0), 80.0);
    }

    #[test]
    fn ticks_are_round_numbers_inside_domain() {
        let x = LinearScale::new((1950.0, 2023.0), (0.0, 1.0));
        let ticks = x.ticks(10);
        assert_eq!(ticks.first().copied(), Some(1950.0));
        assert_eq!(ticks.last().copied(), Some(2020.0));
        assert!(ticks.windows(2).all(|w| (w[1] - w[0] - 10.0).abs() < 1e-9));
        assert_eq!(x.tick_precision(10), 0);
    }

    #[test]
    fn fractional_ticks_report_precision() {
        let y = LinearScale::new((287.2, 289.4), (0.0, 1.0));
        let ticks = y.ticks(10);
        assert!(ticks.len() >= 5);
        assert!(ticks.iter().all(|&t| (287.2 - 1e-9..=289.4 + 1e-9).contains(&t)));
        assert_eq!(y.tick_precision(10), 1);
    }

    #[test]
    fn tick_step_picks_1_2_5() {
        assert_abs_diff_eq!(tick_step(0.0, 10.0, 10), 1.0);
        assert_abs_diff_eq!(tick_step(0.0, 20.0, 10), 2.0);
        assert_abs_diff_eq!(tick_step(0.0, 45.0, 10), 5.0);
        assert_abs_diff_eq!(tick_step(0.0, 1.0, 10), 0.1, epsilon = 1e-12);
    }
}
