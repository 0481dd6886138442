//! The glass wall, as geometry and as a lookup table.
//!
//! The outline is two cubic Bézier curves per side joined by a short
//! straight neck. `ContainerBoundary` samples that curve once at setup
//! and records the half-width of the glass for every pixel row, which
//! is what the particle wall constraint consults each frame.

use crate::config::SimConfig;
use crate::math::{Vec2, vec2};

/// Vertical drop of the rim-side control point below the rim.
const UPPER_CONTROL_DROP: f32 = 100.0;
/// Vertical rise of the neck-side control point above the neck.
const UPPER_NECK_LEAD: f32 = 20.0;
/// Straight neck length below the midline.
const NECK_LENGTH: f32 = 20.0;
/// Control offsets shaping the lower bulb.
const LOWER_NECK_TRAIL: f32 = 50.0;
const LOWER_CONTROL_RISE: f32 = 100.0;

/// Right-hand half of the hourglass outline, rim to floor. The left
/// half is this mirrored across the centerline.
#[derive(Clone, Copy, Debug)]
pub struct GlassOutline {
    /// Rim down to the top of the neck.
    pub upper: [Vec2; 4],
    /// Straight neck segment.
    pub neck: (Vec2, Vec2),
    /// Bottom of the neck down to the floor.
    pub lower: [Vec2; 4],
}

impl GlassOutline {
    pub fn from_config(cfg: &SimConfig) -> GlassOutline {
        let cx = cfg.center_x();
        let w = cfg.glass_width / 2.0;
        let nw = cfg.neck_width / 2.0;
        let top = cfg.top_y();
        let mid = cfg.mid_y();
        let bottom = cfg.bottom_y();
        GlassOutline {
            upper: [
                vec2(cx + w, top),
                vec2(cx + w, top + UPPER_CONTROL_DROP),
                vec2(cx + nw, mid - UPPER_NECK_LEAD),
                vec2(cx + nw, mid),
            ],
            neck: (vec2(cx + nw, mid), vec2(cx + nw, mid + NECK_LENGTH)),
            lower: [
                vec2(cx + nw, mid + NECK_LENGTH),
                vec2(cx + nw, mid + LOWER_NECK_TRAIL),
                vec2(cx + w, bottom - LOWER_CONTROL_RISE),
                vec2(cx + w, bottom),
            ],
        }
    }

    /// The same outline reflected to the left of the centerline.
    pub fn mirrored(&self, center_x: f32) -> GlassOutline {
        let flip = |p: Vec2| vec2(2.0 * center_x - p.x, p.y);
        GlassOutline {
            upper: self.upper.map(flip),
            neck: (flip(self.neck.0), flip(self.neck.1)),
            lower: self.lower.map(flip),
        }
    }
}

fn cubic_point(p: &[Vec2; 4], t: f32) -> Vec2 {
    let u = 1.0 - t;
    p[0] * (u * u * u) + p[1] * (3.0 * u * u * t) + p[2] * (3.0 * u * t * t) + p[3] * (t * t * t)
}

/// Per-row half-width of the glass interior, indexed by integer y.
#[derive(Clone, Debug)]
pub struct ContainerBoundary {
    top: i32,
    half_widths: Vec<f32>,
}

/// Parametric steps when rasterizing one Bézier into table rows. Well
/// over one sample per row for a 250-pixel-tall bulb.
const CURVE_SAMPLES: usize = 2048;

impl ContainerBoundary {
    pub fn build(cfg: &SimConfig) -> ContainerBoundary {
        let outline = GlassOutline::from_config(cfg);
        let cx = cfg.center_x();
        let top = cfg.top_y() as i32;
        let rows = (cfg.bottom_y() as i32 - top + 1).max(0) as usize;
        let mut half_widths = vec![0.0f32; rows];

        let mut rasterize = |curve: &[Vec2; 4]| {
            for i in 0..=CURVE_SAMPLES {
                let t = i as f32 / CURVE_SAMPLES as f32;
                let p = cubic_point(curve, t);
                let row = p.y.round() as i32 - top;
                if row >= 0 && (row as usize) < rows {
                    half_widths[row as usize] = p.x - cx;
                }
            }
        };
        rasterize(&outline.upper);
        rasterize(&outline.lower);

        // The straight neck produces no curve samples of its own.
        let nw = cfg.neck_width / 2.0;
        let neck_top = outline.neck.0.y.round() as i32 - top;
        let neck_bottom = outline.neck.1.y.round() as i32 - top;
        for row in neck_top..=neck_bottom {
            if row >= 0 && (row as usize) < rows {
                half_widths[row as usize] = nw;
            }
        }

        // Any row the sampling skipped inherits its neighbor so the
        // table has no spurious zero (= undefined) rows inside the
        // glass.
        for i in 1..rows {
            if half_widths[i] <= 0.0 {
                half_widths[i] = half_widths[i - 1];
            }
        }
        for i in (0..rows.saturating_sub(1)).rev() {
            if half_widths[i] <= 0.0 {
                half_widths[i] = half_widths[i + 1];
            }
        }

        ContainerBoundary { top, half_widths }
    }

    /// Allowed distance from the centerline at row `y`, or `None` above
    /// the rim or below the floor (the wall does not constrain there).
    pub fn half_width_at(&self, y: f32) -> Option<f32> {
        if !y.is_finite() {
            return None;
        }
        let row = y.floor() as i32 - self.top;
        if row >= 0 && (row as usize) < self.half_widths.len() {
            let hw = self.half_widths[row as usize];
            (hw > 0.0).then_some(hw)
        } else {
            None
        }
    }
}
