//! Cell classification and edge interpolation.
//!
//! Corners are classified against one level (lines) or a pair of levels
//! (fills). A corner exactly equal to a level counts as "above" that level,
//! so a constant field equal to the query level produces no crossings and
//! duplicate or zero-length segments are never emitted.
//!
//! Edge crossings are always evaluated in a canonical direction per grid
//! edge, so the two cells sharing an edge (and the two triangles sharing a
//! spoke) obtain bit-identical crossing coordinates.

use crate::grid::{Coord, GridField};

/// Interpolation mode for edge-crossing coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interp {
    /// Linear interpolation in z.
    #[default]
    Linear,
    /// Linear interpolation in ln(z), for strictly positive fields.
    Log,
}

impl Interp {
    /// Parametric position of `level` on an edge from value `za` to `zb`.
    ///
    /// Callers only interpolate straddling edges, so `za != zb`.
    #[inline]
    pub fn fraction(self, level: f64, za: f64, zb: f64) -> f64 {
        match self {
            Interp::Linear => (level - za) / (zb - za),
            Interp::Log => (level.ln() - za.ln()) / (zb.ln() - za.ln()),
        }
    }

    /// Representative center value for a set of corner values; arithmetic
    /// mean for linear interpolation, geometric mean for log.
    pub fn center(self, values: &[f64]) -> f64 {
        let n = values.len() as f64;
        match self {
            Interp::Linear => values.iter().sum::<f64>() / n,
            Interp::Log => (values.iter().map(|v| v.ln()).sum::<f64>() / n).exp(),
        }
    }
}

/// Three-way classification of a corner against a fill level pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandClass {
    Below,
    Within,
    Above,
}

impl BandClass {
    /// Classify a value against `(lower, upper)`. Equality with a level
    /// puts the value on or above that level.
    #[inline]
    pub fn classify(z: f64, lower: f64, upper: f64) -> Self {
        if z < lower {
            BandClass::Below
        } else if z >= upper {
            BandClass::Above
        } else {
            BandClass::Within
        }
    }
}

/// Binary classification for line levels: above means `z >= level`.
#[inline]
pub fn is_above(z: f64, level: f64) -> bool {
    z >= level
}

/// Cell corner, named in the frame where columns grow east and rows grow
/// north. Corner order SW, SE, NE, NW is counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerId {
    Sw,
    Se,
    Ne,
    Nw,
}

impl CornerId {
    pub const ALL: [CornerId; 4] = [CornerId::Sw, CornerId::Se, CornerId::Ne, CornerId::Nw];

    /// Grid point `(r, c)` of this corner of cell `(r, c)`.
    #[inline]
    pub fn point_of(self, r: usize, c: usize) -> (usize, usize) {
        match self {
            CornerId::Sw => (r, c),
            CornerId::Se => (r, c + 1),
            CornerId::Ne => (r + 1, c + 1),
            CornerId::Nw => (r + 1, c),
        }
    }
}

/// How a cell participates in tracing, given the mask and the corner-mask
/// setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellDomain {
    /// All four corners valid: standard quad tracing.
    Full,
    /// Exactly one invalid corner with corner-masking enabled: trace the
    /// two center-split triangles that do not touch it.
    Corner(CornerId),
    /// Excluded from tracing entirely.
    Excluded,
}

/// Resolve the tracing domain of cell `(r, c)`.
pub fn cell_domain(grid: &GridField, r: usize, c: usize, corner_mask: bool) -> CellDomain {
    if !grid.has_mask() {
        return CellDomain::Full;
    }
    let mut invalid: Option<CornerId> = None;
    let mut count = 0;
    for corner in CornerId::ALL {
        let (pr, pc) = corner.point_of(r, c);
        if grid.is_masked(pr, pc) {
            invalid = Some(corner);
            count += 1;
        }
    }
    match (count, invalid) {
        (0, _) => CellDomain::Full,
        (1, Some(corner)) if corner_mask => CellDomain::Corner(corner),
        _ => CellDomain::Excluded,
    }
}

/// Crossing coordinate on the horizontal grid edge from point `(r, c)` to
/// `(r, c + 1)`, evaluated in that canonical direction.
#[inline]
pub fn cross_h(grid: &GridField, r: usize, c: usize, level: f64, interp: Interp) -> Coord {
    let a = grid.point(r, c);
    let b = grid.point(r, c + 1);
    let t = interp.fraction(level, grid.value(r, c), grid.value(r, c + 1));
    lerp(a, b, t)
}

/// Crossing coordinate on the vertical grid edge from point `(r, c)` to
/// `(r + 1, c)`, evaluated in that canonical direction.
#[inline]
pub fn cross_v(grid: &GridField, r: usize, c: usize, level: f64, interp: Interp) -> Coord {
    let a = grid.point(r, c);
    let b = grid.point(r + 1, c);
    let t = interp.fraction(level, grid.value(r, c), grid.value(r + 1, c));
    lerp(a, b, t)
}

/// Crossing coordinate on the spoke from a corner of cell `(r, c)` to the
/// cell center, evaluated corner-to-center.
#[inline]
pub fn cross_spoke(
    grid: &GridField,
    r: usize,
    c: usize,
    corner: CornerId,
    center: Coord,
    center_value: f64,
    level: f64,
    interp: Interp,
) -> Coord {
    let (pr, pc) = corner.point_of(r, c);
    let a = grid.point(pr, pc);
    let t = interp.fraction(level, grid.value(pr, pc), center_value);
    lerp(a, center, t)
}

/// Cell center coordinate: mean of the four corner coordinates, summed in
/// fixed corner order so every caller gets identical bits.
#[inline]
pub fn cell_center(grid: &GridField, r: usize, c: usize) -> Coord {
    let sw = grid.point(r, c);
    let se = grid.point(r, c + 1);
    let ne = grid.point(r + 1, c + 1);
    let nw = grid.point(r + 1, c);
    [
        (sw[0] + se[0] + ne[0] + nw[0]) * 0.25,
        (sw[1] + se[1] + ne[1] + nw[1]) * 0.25,
    ]
}

#[inline]
fn lerp(a: Coord, b: Coord, t: f64) -> Coord {
    [a[0] + t * (b[0] - a[0]), a[1] + t * (b[1] - a[1])]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_grid(z: Vec<f64>, mask: Option<Vec<bool>>) -> GridField {
        let x = vec![0.0, 1.0, 0.0, 1.0];
        let y = vec![0.0, 0.0, 1.0, 1.0];
        match mask {
            Some(m) => GridField::with_mask((2, 2), x, y, z, m).unwrap(),
            None => GridField::new((2, 2), x, y, z).unwrap(),
        }
    }

    #[test]
    fn test_equal_to_level_is_above() {
        assert!(is_above(10.0, 10.0));
        assert!(!is_above(9.999, 10.0));
        assert_eq!(BandClass::classify(5.0, 5.0, 10.0), BandClass::Within);
        assert_eq!(BandClass::classify(10.0, 5.0, 10.0), BandClass::Above);
        assert_eq!(BandClass::classify(4.9, 5.0, 10.0), BandClass::Below);
    }

    #[test]
    fn test_unbounded_band() {
        assert_eq!(
            BandClass::classify(1e300, 5.0, f64::INFINITY),
            BandClass::Within
        );
        assert_eq!(
            BandClass::classify(-1e300, f64::NEG_INFINITY, 10.0),
            BandClass::Within
        );
    }

    #[test]
    fn test_linear_fraction() {
        assert_eq!(Interp::Linear.fraction(5.0, 0.0, 10.0), 0.5);
        assert_eq!(Interp::Linear.fraction(2.5, 0.0, 10.0), 0.25);
        // Descending edge
        assert_eq!(Interp::Linear.fraction(5.0, 10.0, 0.0), 0.5);
    }

    #[test]
    fn test_log_fraction_midpoint_is_geometric_mean() {
        // level = sqrt(za * zb) sits at t = 0.5 in log space
        let t = Interp::Log.fraction(10.0, 1.0, 100.0);
        assert!((t - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_center_values() {
        assert_eq!(Interp::Linear.center(&[1.0, 2.0, 3.0, 6.0]), 3.0);
        let g = Interp::Log.center(&[1.0, 100.0]);
        assert!((g - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_cross_h_interpolates_coordinates() {
        let grid = unit_grid(vec![0.0, 10.0, 0.0, 0.0], None);
        let p = cross_h(&grid, 0, 0, 2.5, Interp::Linear);
        assert_eq!(p, [0.25, 0.0]);
    }

    #[test]
    fn test_cell_domain_no_mask() {
        let grid = unit_grid(vec![0.0; 4], None);
        assert_eq!(cell_domain(&grid, 0, 0, true), CellDomain::Full);
    }

    #[test]
    fn test_cell_domain_one_corner() {
        // Masked point (0, 1) is the SE corner of cell (0, 0).
        let grid = unit_grid(vec![0.0; 4], Some(vec![false, true, false, false]));
        assert_eq!(
            cell_domain(&grid, 0, 0, true),
            CellDomain::Corner(CornerId::Se)
        );
        assert_eq!(cell_domain(&grid, 0, 0, false), CellDomain::Excluded);
    }

    #[test]
    fn test_cell_domain_two_corners_always_excluded() {
        let grid = unit_grid(vec![0.0; 4], Some(vec![true, true, false, false]));
        assert_eq!(cell_domain(&grid, 0, 0, true), CellDomain::Excluded);
    }

    #[test]
    fn test_cell_center() {
        let grid = unit_grid(vec![0.0; 4], None);
        assert_eq!(cell_center(&grid, 0, 0), [0.5, 0.5]);
    }
}
