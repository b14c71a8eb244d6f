//! Tracer: per-chunk marching-squares piece generation.
//!
//! Each chunk worker walks its cells and emits directed straight pieces of
//! contour geometry. For line contours a cell contributes the interior
//! crossing segments of its 16-pattern configuration, directed with the
//! higher-valued side on the left. For filled contours a cell contributes
//! the boundary pieces of its in-band region: interior crossing chords at
//! each level plus the in-band sub-arcs of the cell boundary, all directed
//! with the in-band region on the left.
//!
//! Pieces are pure functions of corner values and level, and every edge
//! crossing is evaluated in a canonical per-grid-edge direction, so the two
//! cells sharing an edge emit bit-identical coordinates there. Fill pieces
//! on interior shared edges therefore cancel pairwise during assembly,
//! leaving exactly the region boundary, and chaining across chunk
//! boundaries is indistinguishable from chaining within one chunk.
//!
//! Corner-masked cells (exactly one invalid corner) are traced through the
//! two center-split triangles that do not touch the invalid corner; the
//! center vertex takes the mean coordinate of the four corners and the mean
//! value of the three valid ones.

use arrayvec::ArrayVec;

use crate::cell::{
    cell_center, cell_domain, cross_h, cross_spoke, cross_v, is_above, BandClass, CellDomain,
    CornerId, Interp,
};
use crate::chunk::Chunk;
use crate::grid::{Coord, GridField};

/// A directed straight piece of contour geometry.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Piece {
    pub start: Coord,
    pub end: Coord,
}

/// Cell side, in the frame where columns grow east and rows grow north.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    South,
    East,
    North,
    West,
}

/// One of the four center-split triangles of a cell, named by the cell side
/// forming its outer edge. Vertices are (A, B, center) with A and B in
/// counter-clockwise order along the cell boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriId {
    South,
    East,
    North,
    West,
}

impl TriId {
    #[inline]
    fn corners(self) -> (CornerId, CornerId) {
        match self {
            TriId::South => (CornerId::Sw, CornerId::Se),
            TriId::East => (CornerId::Se, CornerId::Ne),
            TriId::North => (CornerId::Ne, CornerId::Nw),
            TriId::West => (CornerId::Nw, CornerId::Sw),
        }
    }

    #[inline]
    fn side(self) -> Side {
        match self {
            TriId::South => Side::South,
            TriId::East => Side::East,
            TriId::North => Side::North,
            TriId::West => Side::West,
        }
    }
}

/// The two triangles that do not touch an invalid corner.
#[inline]
fn valid_triangles(bad: CornerId) -> [TriId; 2] {
    match bad {
        CornerId::Sw => [TriId::East, TriId::North],
        CornerId::Se => [TriId::North, TriId::West],
        CornerId::Ne => [TriId::West, TriId::South],
        CornerId::Nw => [TriId::South, TriId::East],
    }
}

/// Edge of a triangle: AB is the cell side, BC and CA are center spokes.
#[derive(Debug, Clone, Copy)]
enum TriEdge {
    Ab,
    Bc,
    Ca,
}

/// Crossing segments for a quad configuration, directed with the "above"
/// side on the left. Bits: SW = 1, SE = 2, NE = 4, NW = 8.
///
/// The two saddle patterns (5 and 10) are disambiguated by classifying the
/// cell-center value: an "above" center joins the two above corners into
/// one region. The choice affects topology only, never point coordinates.
fn quad_segments(cfg: u8, center_above: impl FnOnce() -> bool) -> ArrayVec<(Side, Side), 2> {
    use Side::{East, North, South, West};
    let mut segs: ArrayVec<(Side, Side), 2> = ArrayVec::new();
    match cfg {
        1 => segs.push((South, West)),
        2 => segs.push((East, South)),
        3 => segs.push((East, West)),
        4 => segs.push((North, East)),
        5 => {
            if center_above() {
                segs.push((South, East));
                segs.push((North, West));
            } else {
                segs.push((South, West));
                segs.push((North, East));
            }
        }
        6 => segs.push((North, South)),
        7 => segs.push((North, West)),
        8 => segs.push((West, North)),
        9 => segs.push((South, North)),
        10 => {
            if center_above() {
                segs.push((West, South));
                segs.push((East, North));
            } else {
                segs.push((East, South));
                segs.push((West, North));
            }
        }
        11 => segs.push((East, North)),
        12 => segs.push((West, East)),
        13 => segs.push((South, East)),
        14 => segs.push((West, South)),
        _ => {}
    }
    segs
}

/// Crossing segment for a triangle configuration, directed with the
/// "above" side on the left. Bits: A = 1, B = 2, center = 4. Triangles
/// have no ambiguous pattern.
#[inline]
fn tri_segments(cfg: u8) -> Option<(TriEdge, TriEdge)> {
    use TriEdge::{Ab, Bc, Ca};
    match cfg {
        1 => Some((Ab, Ca)),
        2 => Some((Bc, Ab)),
        3 => Some((Bc, Ca)),
        4 => Some((Ca, Bc)),
        5 => Some((Ab, Bc)),
        6 => Some((Ca, Ab)),
        _ => None,
    }
}

#[inline]
fn corner_value(grid: &GridField, r: usize, c: usize, corner: CornerId) -> f64 {
    let (pr, pc) = corner.point_of(r, c);
    grid.value(pr, pc)
}

#[inline]
fn corner_point(grid: &GridField, r: usize, c: usize, corner: CornerId) -> Coord {
    let (pr, pc) = corner.point_of(r, c);
    grid.point(pr, pc)
}

/// Corner values in CCW order SW, SE, NE, NW.
#[inline]
fn cell_values(grid: &GridField, r: usize, c: usize) -> [f64; 4] {
    [
        grid.value(r, c),
        grid.value(r, c + 1),
        grid.value(r + 1, c + 1),
        grid.value(r + 1, c),
    ]
}

/// Canonical crossing coordinate on one side of cell `(r, c)`.
#[inline]
fn side_cross(grid: &GridField, r: usize, c: usize, side: Side, level: f64, interp: Interp) -> Coord {
    match side {
        Side::South => cross_h(grid, r, c, level, interp),
        Side::East => cross_v(grid, r, c + 1, level, interp),
        Side::North => cross_h(grid, r + 1, c, level, interp),
        Side::West => cross_v(grid, r, c, level, interp),
    }
}

/// Push a piece, dropping zero-length ones (bit-identical endpoints).
#[inline]
fn push_piece(out: &mut Vec<Piece>, start: Coord, end: Coord) {
    if start[0].to_bits() != end[0].to_bits() || start[1].to_bits() != end[1].to_bits() {
        out.push(Piece { start, end });
    }
}

/// Mean value of the three valid corners, in the interpolation mode's
/// sense; shared by both triangles of a corner-masked cell.
fn masked_center_value(grid: &GridField, r: usize, c: usize, bad: CornerId, interp: Interp) -> f64 {
    let mut values: ArrayVec<f64, 4> = ArrayVec::new();
    for corner in CornerId::ALL {
        if corner != bad {
            values.push(corner_value(grid, r, c, corner));
        }
    }
    interp.center(&values)
}

/// Interior crossing chords of one level through a quad cell.
fn quad_level_chords(
    grid: &GridField,
    r: usize,
    c: usize,
    zs: &[f64; 4],
    level: f64,
    reversed: bool,
    interp: Interp,
    out: &mut Vec<Piece>,
) {
    let cfg = is_above(zs[0], level) as u8
        | (is_above(zs[1], level) as u8) << 1
        | (is_above(zs[2], level) as u8) << 2
        | (is_above(zs[3], level) as u8) << 3;
    if cfg == 0 || cfg == 15 {
        return;
    }
    for (from, to) in quad_segments(cfg, || is_above(interp.center(zs), level)) {
        let (from, to) = if reversed { (to, from) } else { (from, to) };
        let p = side_cross(grid, r, c, from, level, interp);
        let q = side_cross(grid, r, c, to, level, interp);
        push_piece(out, p, q);
    }
}

/// Crossing coordinate on one triangle edge.
#[inline]
fn tri_edge_cross(
    grid: &GridField,
    r: usize,
    c: usize,
    tri: TriId,
    edge: TriEdge,
    center: Coord,
    zc: f64,
    level: f64,
    interp: Interp,
) -> Coord {
    let (a, b) = tri.corners();
    match edge {
        TriEdge::Ab => side_cross(grid, r, c, tri.side(), level, interp),
        TriEdge::Bc => cross_spoke(grid, r, c, b, center, zc, level, interp),
        TriEdge::Ca => cross_spoke(grid, r, c, a, center, zc, level, interp),
    }
}

/// Interior crossing chord of one level through a triangle.
#[allow(clippy::too_many_arguments)]
fn tri_level_chords(
    grid: &GridField,
    r: usize,
    c: usize,
    tri: TriId,
    za: f64,
    zb: f64,
    zc: f64,
    center: Coord,
    level: f64,
    reversed: bool,
    interp: Interp,
    out: &mut Vec<Piece>,
) {
    let cfg = is_above(za, level) as u8
        | (is_above(zb, level) as u8) << 1
        | (is_above(zc, level) as u8) << 2;
    let Some((from, to)) = tri_segments(cfg) else {
        return;
    };
    let (from, to) = if reversed { (to, from) } else { (from, to) };
    let p = tri_edge_cross(grid, r, c, tri, from, center, zc, level, interp);
    let q = tri_edge_cross(grid, r, c, tri, to, center, zc, level, interp);
    push_piece(out, p, q);
}

/// Which fill level a boundary crossing belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lv {
    Lower,
    Upper,
}

/// Emit the in-band sub-arcs of one boundary edge, walked from `pa` to
/// `pb`. The edge is cut at its level crossings; the sub-intervals whose
/// values lie in the band contribute directed pieces (in-band on the left,
/// the walk being counter-clockwise around the cell or triangle).
fn emit_edge_arcs(
    out: &mut Vec<Piece>,
    pa: Coord,
    za: f64,
    pb: Coord,
    zb: f64,
    lower: f64,
    upper: f64,
    cross: impl Fn(f64) -> Coord,
) {
    let crosses_lower = (za < lower) != (zb < lower);
    let crosses_upper = (za >= upper) != (zb >= upper);

    let mut crossings: ArrayVec<(Coord, Lv), 2> = ArrayVec::new();
    if crosses_lower && crosses_upper {
        // Monotone along the edge: ascending hits lower first.
        if za < zb {
            crossings.push((cross(lower), Lv::Lower));
            crossings.push((cross(upper), Lv::Upper));
        } else {
            crossings.push((cross(upper), Lv::Upper));
            crossings.push((cross(lower), Lv::Lower));
        }
    } else if crosses_lower {
        crossings.push((cross(lower), Lv::Lower));
    } else if crosses_upper {
        crossings.push((cross(upper), Lv::Upper));
    }

    let mut state = BandClass::classify(za, lower, upper);
    let mut prev = pa;
    for (p, lv) in crossings {
        if state == BandClass::Within {
            push_piece(out, prev, p);
        }
        state = match lv {
            Lv::Lower => {
                if state == BandClass::Below {
                    BandClass::Within
                } else {
                    BandClass::Below
                }
            }
            Lv::Upper => {
                if state == BandClass::Above {
                    BandClass::Within
                } else {
                    BandClass::Above
                }
            }
        };
        prev = p;
    }
    if state == BandClass::Within {
        push_piece(out, prev, pb);
    }
}

/// Fill pieces of a full quad cell.
fn quad_fill(
    grid: &GridField,
    r: usize,
    c: usize,
    lower: f64,
    upper: f64,
    interp: Interp,
    out: &mut Vec<Piece>,
) {
    let zs = cell_values(grid, r, c);
    let all_below = zs.iter().all(|&z| z < lower);
    let all_above = zs.iter().all(|&z| z >= upper);
    if all_below || all_above {
        return;
    }

    quad_level_chords(grid, r, c, &zs, lower, false, interp, out);
    quad_level_chords(grid, r, c, &zs, upper, true, interp, out);

    let sw = grid.point(r, c);
    let se = grid.point(r, c + 1);
    let ne = grid.point(r + 1, c + 1);
    let nw = grid.point(r + 1, c);

    emit_edge_arcs(out, sw, zs[0], se, zs[1], lower, upper, |lv| {
        cross_h(grid, r, c, lv, interp)
    });
    emit_edge_arcs(out, se, zs[1], ne, zs[2], lower, upper, |lv| {
        cross_v(grid, r, c + 1, lv, interp)
    });
    emit_edge_arcs(out, ne, zs[2], nw, zs[3], lower, upper, |lv| {
        cross_h(grid, r + 1, c, lv, interp)
    });
    emit_edge_arcs(out, nw, zs[3], sw, zs[0], lower, upper, |lv| {
        cross_v(grid, r, c, lv, interp)
    });
}

/// Fill pieces of one valid triangle of a corner-masked cell.
#[allow(clippy::too_many_arguments)]
fn tri_fill(
    grid: &GridField,
    r: usize,
    c: usize,
    tri: TriId,
    center: Coord,
    zc: f64,
    lower: f64,
    upper: f64,
    interp: Interp,
    out: &mut Vec<Piece>,
) {
    let (a, b) = tri.corners();
    let za = corner_value(grid, r, c, a);
    let zb = corner_value(grid, r, c, b);

    tri_level_chords(grid, r, c, tri, za, zb, zc, center, lower, false, interp, out);
    tri_level_chords(grid, r, c, tri, za, zb, zc, center, upper, true, interp, out);

    let pa = corner_point(grid, r, c, a);
    let pb = corner_point(grid, r, c, b);

    emit_edge_arcs(out, pa, za, pb, zb, lower, upper, |lv| {
        side_cross(grid, r, c, tri.side(), lv, interp)
    });
    emit_edge_arcs(out, pb, zb, center, zc, lower, upper, |lv| {
        cross_spoke(grid, r, c, b, center, zc, lv, interp)
    });
    emit_edge_arcs(out, center, zc, pa, za, lower, upper, |lv| {
        cross_spoke(grid, r, c, a, center, zc, lv, interp)
    });
}

/// Trace the line-contour pieces of one chunk.
pub(crate) fn trace_line_chunk(
    grid: &GridField,
    chunk: &Chunk,
    level: f64,
    corner_mask: bool,
    interp: Interp,
) -> Vec<Piece> {
    let mut out = Vec::new();
    for r in chunk.rows.clone() {
        for c in chunk.cols.clone() {
            match cell_domain(grid, r, c, corner_mask) {
                CellDomain::Excluded => {}
                CellDomain::Full => {
                    let zs = cell_values(grid, r, c);
                    quad_level_chords(grid, r, c, &zs, level, false, interp, &mut out);
                }
                CellDomain::Corner(bad) => {
                    let center = cell_center(grid, r, c);
                    let zc = masked_center_value(grid, r, c, bad, interp);
                    for tri in valid_triangles(bad) {
                        let (a, b) = tri.corners();
                        let za = corner_value(grid, r, c, a);
                        let zb = corner_value(grid, r, c, b);
                        tri_level_chords(
                            grid, r, c, tri, za, zb, zc, center, level, false, interp, &mut out,
                        );
                    }
                }
            }
        }
    }
    out
}

/// Trace the filled-contour pieces of one chunk.
pub(crate) fn trace_fill_chunk(
    grid: &GridField,
    chunk: &Chunk,
    lower: f64,
    upper: f64,
    corner_mask: bool,
    interp: Interp,
) -> Vec<Piece> {
    let mut out = Vec::new();
    for r in chunk.rows.clone() {
        for c in chunk.cols.clone() {
            match cell_domain(grid, r, c, corner_mask) {
                CellDomain::Excluded => {}
                CellDomain::Full => quad_fill(grid, r, c, lower, upper, interp, &mut out),
                CellDomain::Corner(bad) => {
                    let center = cell_center(grid, r, c);
                    let zc = masked_center_value(grid, r, c, bad, interp);
                    for tri in valid_triangles(bad) {
                        tri_fill(
                            grid, r, c, tri, center, zc, lower, upper, interp, &mut out,
                        );
                    }
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cell(zs: [f64; 4]) -> GridField {
        // zs in SW, SE, NE, NW order; grid points row-major from the south
        GridField::new(
            (2, 2),
            vec![0.0, 1.0, 0.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
            vec![zs[0], zs[1], zs[3], zs[2]],
        )
        .unwrap()
    }

    fn whole(grid: &GridField) -> Chunk {
        let (rows, cols) = grid.cell_shape();
        Chunk {
            index: 0,
            rows: 0..rows,
            cols: 0..cols,
        }
    }

    #[test]
    fn test_horizontal_gradient_line() {
        // North row above, south row below: one west-to-east segment with
        // the high (north) side on the left.
        let grid = unit_cell([0.0, 0.0, 1.0, 1.0]);
        let pieces = trace_line_chunk(&grid, &whole(&grid), 0.5, false, Interp::Linear);
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].start, [0.0, 0.5]);
        assert_eq!(pieces[0].end, [1.0, 0.5]);
    }

    #[test]
    fn test_empty_and_full_cells_emit_nothing() {
        let grid = unit_cell([0.0, 0.0, 0.0, 0.0]);
        assert!(trace_line_chunk(&grid, &whole(&grid), 0.5, false, Interp::Linear).is_empty());

        let grid = unit_cell([1.0, 1.0, 1.0, 1.0]);
        assert!(trace_line_chunk(&grid, &whole(&grid), 0.5, false, Interp::Linear).is_empty());
    }

    #[test]
    fn test_constant_field_equal_to_level_is_empty() {
        let grid = unit_cell([0.5, 0.5, 0.5, 0.5]);
        assert!(trace_line_chunk(&grid, &whole(&grid), 0.5, false, Interp::Linear).is_empty());
    }

    #[test]
    fn test_saddle_center_above() {
        // SW and NE high, center value 0.5 classified above at level 0.5:
        // the high corners join, segments cut off the low SE and NW corners.
        let grid = unit_cell([1.0, 0.0, 1.0, 0.0]);
        let pieces = trace_line_chunk(&grid, &whole(&grid), 0.5, false, Interp::Linear);
        assert_eq!(pieces.len(), 2);
        // (S -> E) and (N -> W)
        assert_eq!(pieces[0].start, [0.5, 0.0]);
        assert_eq!(pieces[0].end, [1.0, 0.5]);
        assert_eq!(pieces[1].start, [0.5, 1.0]);
        assert_eq!(pieces[1].end, [0.0, 0.5]);
    }

    #[test]
    fn test_saddle_center_below() {
        // Same pattern but at level 0.6 the center (0.5) is below: the high
        // corners stay separate.
        let grid = unit_cell([1.0, 0.0, 1.0, 0.0]);
        let pieces = trace_line_chunk(&grid, &whole(&grid), 0.6, false, Interp::Linear);
        assert_eq!(pieces.len(), 2);
        // (S -> W) and (N -> E)
        assert_eq!(pieces[0].end[0], 0.0);
        assert_eq!(pieces[1].end[0], 1.0);
    }

    #[test]
    fn test_fill_all_within_emits_cell_boundary() {
        let grid = unit_cell([0.5, 0.5, 0.5, 0.5]);
        let pieces = trace_fill_chunk(&grid, &whole(&grid), 0.0, 1.0, false, Interp::Linear);
        assert_eq!(pieces.len(), 4);
        // Counter-clockwise around the cell
        assert_eq!(pieces[0].start, [0.0, 0.0]);
        assert_eq!(pieces[0].end, [1.0, 0.0]);
        assert_eq!(pieces[3].end, [0.0, 0.0]);
    }

    #[test]
    fn test_fill_all_below_or_above_emits_nothing() {
        let grid = unit_cell([0.0; 4]);
        assert!(trace_fill_chunk(&grid, &whole(&grid), 1.0, 2.0, false, Interp::Linear).is_empty());
        let grid = unit_cell([5.0; 4]);
        assert!(trace_fill_chunk(&grid, &whole(&grid), 1.0, 2.0, false, Interp::Linear).is_empty());
    }

    #[test]
    fn test_fill_edge_crossing_both_levels() {
        // South edge runs 0 -> 10 west to east; band [2, 4) occupies the
        // middle of the cell.
        let grid = GridField::new(
            (2, 2),
            vec![0.0, 1.0, 0.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
            vec![0.0, 10.0, 0.0, 10.0],
        )
        .unwrap();
        let pieces = trace_fill_chunk(&grid, &whole(&grid), 2.0, 4.0, false, Interp::Linear);
        // South arc between the two crossings, north arc, and two vertical
        // chords (lower and upper).
        assert_eq!(pieces.len(), 4);
        for p in &pieces {
            let on_lower = p.start[0] == 0.2 || p.end[0] == 0.2;
            let on_upper = p.start[0] == 0.4 || p.end[0] == 0.4;
            assert!(on_lower || on_upper);
        }
    }

    #[test]
    fn test_masked_cell_excluded_without_corner_mask() {
        let grid = GridField::with_mask(
            (2, 2),
            vec![0.0, 1.0, 0.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
            vec![true, false, false, false],
        )
        .unwrap();
        assert!(trace_line_chunk(&grid, &whole(&grid), 0.5, false, Interp::Linear).is_empty());
    }

    #[test]
    fn test_corner_masked_cell_traces_valid_triangles() {
        // SW corner masked; gradient from south (0) to north (1). The
        // contour at 0.5 should still cross the two valid triangles.
        let grid = GridField::with_mask(
            (2, 2),
            vec![0.0, 1.0, 0.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
            vec![true, false, false, false],
        )
        .unwrap();
        let pieces = trace_line_chunk(&grid, &whole(&grid), 0.5, true, Interp::Linear);
        assert!(!pieces.is_empty());
        // All crossings stay inside the unit cell.
        for p in &pieces {
            for coord in [p.start, p.end] {
                assert!((0.0..=1.0).contains(&coord[0]));
                assert!((0.0..=1.0).contains(&coord[1]));
            }
        }
    }
}
