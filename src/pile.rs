//! The growing sand pile, tracked as one top-surface y coordinate per
//! horizontal pixel column. Smaller values sit higher on screen, so the
//! pile grows by *decreasing* heights and a column's value is
//! monotonically non-increasing for the lifetime of the simulation.

use crate::config::SimConfig;

/// Which way a particle resolves contact with the pile surface, as a
/// pure function of the local height profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slide {
    /// Both neighbors are lower: sitting on a spike, kick randomly.
    Peak,
    /// Only the left neighbor is lower.
    Left,
    /// Only the right neighbor is lower.
    Right,
    /// Stable: freeze here.
    Rest,
}

/// Angle-of-repose rule. A neighbor counts as lower when its surface
/// coordinate exceeds `ground` by more than `threshold`.
pub fn repose(ground: f32, left: f32, right: f32, threshold: f32) -> Slide {
    let left_lower = ground < left - threshold;
    let right_lower = ground < right - threshold;
    match (left_lower, right_lower) {
        (true, true) => Slide::Peak,
        (true, false) => Slide::Left,
        (false, true) => Slide::Right,
        (false, false) => Slide::Rest,
    }
}

#[derive(Clone, Debug)]
pub struct PileHeightField {
    heights: Vec<f32>,
    /// Sentinel for columns outside the glass footprint. A column at or
    /// beyond this value has no floor; particles over it are escaping,
    /// not landing.
    bottomless: f32,
}

impl PileHeightField {
    pub fn new(cfg: &SimConfig) -> PileHeightField {
        let width = cfg.width as usize;
        let cx = cfg.center_x();
        let half = cfg.glass_width / 2.0;
        let heights = (0..width)
            .map(|i| {
                let dist = (i as f32 - cx).abs();
                if dist < half { cfg.bottom_y() } else { cfg.height }
            })
            .collect();
        PileHeightField {
            heights,
            bottomless: cfg.height,
        }
    }

    pub fn width(&self) -> usize {
        self.heights.len()
    }

    /// Column under an x coordinate, or `None` when off the canvas.
    pub fn column_of(&self, x: f32) -> Option<usize> {
        let ix = x.floor();
        if ix >= 0.0 && (ix as usize) < self.heights.len() {
            Some(ix as usize)
        } else {
            None
        }
    }

    /// Top surface coordinate at a column. Columns off either edge read
    /// as bottomless.
    pub fn height_at(&self, col: isize) -> f32 {
        if col >= 0 && (col as usize) < self.heights.len() {
            self.heights[col as usize]
        } else {
            self.bottomless
        }
    }

    pub fn is_bottomless(&self, col: usize) -> bool {
        self.height_at(col as isize) >= self.bottomless
    }

    /// Raise the pile at `col` by `amount`, spreading a triangular
    /// falloff over `radius` columns each side. The center column takes
    /// the full amount; a neighbor at offset `k` takes
    /// `amount * (1 - k / (radius + 1))`. Bottomless and out-of-range
    /// columns are never touched.
    pub fn settle(&mut self, col: usize, amount: f32, radius: usize) {
        let r = radius as isize;
        for offset in -r..=r {
            let idx = col as isize + offset;
            if idx < 0 || idx as usize >= self.heights.len() {
                continue;
            }
            let idx = idx as usize;
            if self.heights[idx] >= self.bottomless {
                continue;
            }
            let weight = 1.0 - offset.abs() as f32 / (r + 1) as f32;
            self.heights[idx] -= amount * weight;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_cfg() -> SimConfig {
        SimConfig {
            width: 40.0,
            height: 60.0,
            glass_width: 20.0,
            rim_margin: 5.0,
            ..SimConfig::default()
        }
    }

    #[test]
    fn footprint_columns_start_at_floor() {
        let cfg = small_cfg();
        let pile = PileHeightField::new(&cfg);
        assert_eq!(pile.width(), 40);
        // Center column is on the floor, edge columns are bottomless.
        assert_eq!(pile.height_at(20), 55.0);
        assert!(pile.is_bottomless(0));
        assert!(pile.is_bottomless(39));
        assert!(!pile.is_bottomless(20));
    }

    #[test]
    fn column_lookup_guards_range() {
        let pile = PileHeightField::new(&small_cfg());
        assert_eq!(pile.column_of(0.0), Some(0));
        assert_eq!(pile.column_of(39.9), Some(39));
        assert_eq!(pile.column_of(-0.1), None);
        assert_eq!(pile.column_of(40.0), None);
        assert_eq!(pile.column_of(-1e9), None);
        assert_eq!(pile.column_of(1e9), None);
        assert_eq!(pile.column_of(f32::NAN), None);
    }

    #[test]
    fn off_edge_heights_read_bottomless() {
        let pile = PileHeightField::new(&small_cfg());
        assert_eq!(pile.height_at(-1), 60.0);
        assert_eq!(pile.height_at(1000), 60.0);
    }

    #[test]
    fn settle_is_monotonic_and_triangular() {
        let cfg = small_cfg();
        let mut pile = PileHeightField::new(&cfg);
        let before = pile.height_at(20);
        pile.settle(20, 1.0, 2);
        assert_eq!(pile.height_at(20), before - 1.0);
        assert!((pile.height_at(21) - (before - 2.0 / 3.0)).abs() < 1e-6);
        assert!((pile.height_at(19) - (before - 2.0 / 3.0)).abs() < 1e-6);
        assert!((pile.height_at(22) - (before - 1.0 / 3.0)).abs() < 1e-6);
        assert_eq!(pile.height_at(23), before);

        // Heights only ever decrease.
        for _ in 0..100 {
            pile.settle(20, 1.0, 2);
        }
        assert!(pile.height_at(20) < before - 100.0);
    }

    #[test]
    fn settle_never_raises_bottomless_columns() {
        let cfg = small_cfg();
        let mut pile = PileHeightField::new(&cfg);
        // Footprint spans columns 11..=29; settle right at the edge.
        pile.settle(29, 1.0, 2);
        assert!(pile.is_bottomless(30));
        assert!(pile.is_bottomless(31));
        // Clamped writes at the array edge must not panic.
        pile.settle(0, 1.0, 2);
        pile.settle(39, 1.0, 2);
    }

    #[test]
    fn repose_picks_exactly_one_branch() {
        let t = 3.0;
        // Flat floor: rest.
        assert_eq!(repose(550.0, 550.0, 550.0, t), Slide::Rest);
        // Both neighbors lower by more than the threshold: peak.
        assert_eq!(repose(540.0, 550.0, 550.0, t), Slide::Peak);
        // Only one side lower: slide toward it.
        assert_eq!(repose(540.0, 550.0, 541.0, t), Slide::Left);
        assert_eq!(repose(540.0, 541.0, 550.0, t), Slide::Right);
        // Exactly at the threshold is still stable.
        assert_eq!(repose(547.0, 550.0, 550.0, t), Slide::Rest);
    }

    #[test]
    fn repose_is_pure() {
        for _ in 0..3 {
            assert_eq!(repose(540.0, 550.0, 541.0, 3.0), Slide::Left);
        }
    }
}
