use eframe::egui::{Pos2, pos2};

/// One cubic Bézier piece of the smoothed line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub from: Pos2,
    pub ctrl1: Pos2,
    pub ctrl2: Pos2,
    pub to: Pos2,
}

impl CubicSegment {
    pub fn point_at(&self, t: f32) -> Pos2 {
        let u = 1.0 - t;
        let a = u * u * u;
        let b = 3.0 * u * u * t;
        let c = 3.0 * u * t * t;
        let d = t * t * t;
        pos2(
            a * self.from.x + b * self.ctrl1.x + c * self.ctrl2.x + d * self.to.x,
            a * self.from.y + b * self.ctrl1.y + c * self.ctrl2.y + d * self.to.y,
        )
    }
}

/// Monotone cubic interpolation in x (Steffen's method).
///
/// `points` must be sorted by x. The curve never overshoots between two
/// neighbouring samples, so a local maximum in the data stays the maximum on
/// screen. Fewer than two points produce no segments.
pub fn monotone_x(points: &[Pos2]) -> Vec<CubicSegment> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }

    let slope = |i: usize| {
        let h = points[i + 1].x - points[i].x;
        if h == 0.0 { 0.0 } else { (points[i + 1].y - points[i].y) / h }
    };

    let mut tangents = vec![0.0f32; n];
    for i in 1..n - 1 {
        let h0 = points[i].x - points[i - 1].x;
        let h1 = points[i + 1].x - points[i].x;
        let s0 = slope(i - 1);
        let s1 = slope(i);
        let p = if h0 + h1 == 0.0 { 0.0 } else { (s0 * h1 + s1 * h0) / (h0 + h1) };
        tangents[i] = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    }

    if n == 2 {
        let s = slope(0);
        tangents[0] = s;
        tangents[1] = s;
    } else {
        // One-sided end tangents.
        tangents[0] = (3.0 * slope(0) - tangents[1]) / 2.0;
        tangents[n - 1] = (3.0 * slope(n - 2) - tangents[n - 2]) / 2.0;
    }

    points
        .windows(2)
        .zip(tangents.windows(2))
        .map(|(p, t)| {
            let dx = (p[1].x - p[0].x) / 3.0;
            CubicSegment {
                from: p[0],
                ctrl1: pos2(p[0].x + dx, p[0].y + dx * t[0]),
                ctrl2: pos2(p[1].x - dx, p[1].y - dx * t[1]),
                to: p[1],
            }
        })
        .collect()
}

/// Flatten segments into a polyline with `steps` samples per segment.
pub fn flatten(segments: &[CubicSegment], steps: usize) -> Vec<Pos2> {
    let steps = steps.max(1);
    let mut out = Vec::with_capacity(segments.len() * steps + 1);
    if let Some(first) = segments.first() {
        out.push(first.from);
    }
    for seg in segments {
        for k in 1..=steps {
            out.push(seg.point_at(k as f32 / steps as f32));
        }
    }
    out
}

fn sign(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}
