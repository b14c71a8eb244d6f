//! Output assembly: chaining traced pieces into lines and rings, and
//! packaging them into the requested representation.
//!
//! Pieces from all chunks are merged in chunk-index order and chained by
//! exact match of their endpoint coordinate bit patterns; the tracer
//! guarantees shared crossings are bit-identical, so no tolerance is
//! involved. Fill pieces on interior shared edges arrive once from each
//! side in opposite directions and cancel pairwise before chaining,
//! leaving exactly the region boundary.

use std::collections::HashMap;
use std::fmt;

use crate::grid::Coord;
use crate::trace::Piece;

/// Path code: start of a new line or ring.
pub const MOVE_TO: u8 = 1;
/// Path code: draw to this point.
pub const LINE_TO: u8 = 2;
/// Path code: final point of a closed ring (equal to its first point).
pub const CLOSE_POLY: u8 = 79;

/// Representation of line-contour results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// Each line as an independently stored point sequence.
    Separate,
    /// Each line with a matching path-code array.
    SeparateCode,
    /// One combined point and code buffer per chunk.
    ChunkCombinedCode,
    /// One combined point buffer per chunk with line-start offsets.
    ChunkCombinedOffset,
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LineType::Separate => "Separate",
            LineType::SeparateCode => "SeparateCode",
            LineType::ChunkCombinedCode => "ChunkCombinedCode",
            LineType::ChunkCombinedOffset => "ChunkCombinedOffset",
        })
    }
}

/// Representation of filled-contour results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillType {
    /// Each outer boundary with its holes, plus a path-code array.
    OuterCode,
    /// Each outer boundary with its holes, plus ring-start offsets.
    OuterOffset,
    /// One combined point and code buffer per chunk.
    ChunkCombinedCode,
    /// One combined point buffer per chunk with ring-start offsets.
    ChunkCombinedOffset,
}

impl fmt::Display for FillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FillType::OuterCode => "OuterCode",
            FillType::OuterOffset => "OuterOffset",
            FillType::ChunkCombinedCode => "ChunkCombinedCode",
            FillType::ChunkCombinedOffset => "ChunkCombinedOffset",
        })
    }
}

/// Line-contour result in the representation fixed at generator
/// construction.
///
/// Contract, for every representation: code arrays are exactly as long as
/// their point buffer, and offset arrays are ascending indices into it,
/// starting at 0 and ending at the point count. Chunk-combined variants
/// hold one entry per chunk, indexed by chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum ContourLines {
    Separate {
        lines: Vec<Vec<Coord>>,
    },
    SeparateCode {
        lines: Vec<(Vec<Coord>, Vec<u8>)>,
    },
    ChunkCombinedCode {
        chunks: Vec<(Vec<Coord>, Vec<u8>)>,
    },
    ChunkCombinedOffset {
        chunks: Vec<(Vec<Coord>, Vec<u32>)>,
    },
}

impl ContourLines {
    /// The representation this result is packaged in.
    pub fn line_type(&self) -> LineType {
        match self {
            ContourLines::Separate { .. } => LineType::Separate,
            ContourLines::SeparateCode { .. } => LineType::SeparateCode,
            ContourLines::ChunkCombinedCode { .. } => LineType::ChunkCombinedCode,
            ContourLines::ChunkCombinedOffset { .. } => LineType::ChunkCombinedOffset,
        }
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        match self {
            ContourLines::Separate { lines } => lines.len(),
            ContourLines::SeparateCode { lines } => lines.len(),
            ContourLines::ChunkCombinedCode { chunks } => chunks
                .iter()
                .map(|(_, codes)| codes.iter().filter(|&&code| code == MOVE_TO).count())
                .sum(),
            ContourLines::ChunkCombinedOffset { chunks } => chunks
                .iter()
                .map(|(_, offsets)| offsets.len().saturating_sub(1))
                .sum(),
        }
    }

    /// Whether the result holds no lines at all.
    pub fn is_empty(&self) -> bool {
        self.line_count() == 0
    }

    /// Decode into independently stored point sequences, in traced order.
    pub fn to_separate(&self) -> Vec<Vec<Coord>> {
        match self {
            ContourLines::Separate { lines } => lines.clone(),
            ContourLines::SeparateCode { lines } => {
                lines.iter().map(|(points, _)| points.clone()).collect()
            }
            ContourLines::ChunkCombinedCode { chunks } => {
                let mut out = Vec::new();
                for (points, codes) in chunks {
                    out.extend(split_by_codes(points, codes));
                }
                out
            }
            ContourLines::ChunkCombinedOffset { chunks } => {
                let mut out = Vec::new();
                for (points, offsets) in chunks {
                    out.extend(split_by_offsets(points, offsets));
                }
                out
            }
        }
    }
}

/// Filled-contour result in the representation fixed at generator
/// construction. Outer boundaries are counter-clockwise (positive signed
/// area) and holes clockwise; every ring is closed, its final point equal
/// to its first.
#[derive(Debug, Clone, PartialEq)]
pub enum ContourFills {
    OuterCode {
        polygons: Vec<(Vec<Coord>, Vec<u8>)>,
    },
    OuterOffset {
        polygons: Vec<(Vec<Coord>, Vec<u32>)>,
    },
    ChunkCombinedCode {
        chunks: Vec<(Vec<Coord>, Vec<u8>)>,
    },
    ChunkCombinedOffset {
        chunks: Vec<(Vec<Coord>, Vec<u32>)>,
    },
}

impl ContourFills {
    /// The representation this result is packaged in.
    pub fn fill_type(&self) -> FillType {
        match self {
            ContourFills::OuterCode { .. } => FillType::OuterCode,
            ContourFills::OuterOffset { .. } => FillType::OuterOffset,
            ContourFills::ChunkCombinedCode { .. } => FillType::ChunkCombinedCode,
            ContourFills::ChunkCombinedOffset { .. } => FillType::ChunkCombinedOffset,
        }
    }

    /// Number of boundary rings (outers plus holes).
    pub fn ring_count(&self) -> usize {
        match self {
            ContourFills::OuterCode { polygons } => polygons
                .iter()
                .map(|(_, codes)| codes.iter().filter(|&&code| code == MOVE_TO).count())
                .sum(),
            ContourFills::OuterOffset { polygons } => polygons
                .iter()
                .map(|(_, offsets)| offsets.len().saturating_sub(1))
                .sum(),
            ContourFills::ChunkCombinedCode { chunks } => chunks
                .iter()
                .map(|(_, codes)| codes.iter().filter(|&&code| code == MOVE_TO).count())
                .sum(),
            ContourFills::ChunkCombinedOffset { chunks } => chunks
                .iter()
                .map(|(_, offsets)| offsets.len().saturating_sub(1))
                .sum(),
        }
    }

    /// Whether the result holds no rings at all.
    pub fn is_empty(&self) -> bool {
        self.ring_count() == 0
    }

    /// Decode into flat closed rings, in stored order.
    pub fn to_rings(&self) -> Vec<Vec<Coord>> {
        let mut out = Vec::new();
        match self {
            ContourFills::OuterCode { polygons } => {
                for (points, codes) in polygons {
                    out.extend(split_by_codes(points, codes));
                }
            }
            ContourFills::OuterOffset { polygons } => {
                for (points, offsets) in polygons {
                    out.extend(split_by_offsets(points, offsets));
                }
            }
            ContourFills::ChunkCombinedCode { chunks } => {
                for (points, codes) in chunks {
                    out.extend(split_by_codes(points, codes));
                }
            }
            ContourFills::ChunkCombinedOffset { chunks } => {
                for (points, offsets) in chunks {
                    out.extend(split_by_offsets(points, offsets));
                }
            }
        }
        out
    }

    /// Decode into polygons, each a vector of rings with the outer boundary
    /// first and its holes after it.
    pub fn to_polygons(&self) -> Vec<Vec<Vec<Coord>>> {
        match self {
            ContourFills::OuterCode { polygons } => polygons
                .iter()
                .map(|(points, codes)| split_by_codes(points, codes))
                .collect(),
            ContourFills::OuterOffset { polygons } => polygons
                .iter()
                .map(|(points, offsets)| split_by_offsets(points, offsets))
                .collect(),
            // Chunk-combined variants keep no grouping; rebuild it from
            // ring orientation and containment.
            _ => {
                let rings = self.to_rings();
                let refs: Vec<&[Coord]> = rings.iter().map(|ring| ring.as_slice()).collect();
                group_ring_slices(&refs)
                    .into_iter()
                    .map(|(outer, holes)| {
                        let mut rings_out = vec![rings[outer].clone()];
                        rings_out.extend(holes.into_iter().map(|h| rings[h].clone()));
                        rings_out
                    })
                    .collect()
            }
        }
    }
}

fn split_by_codes(points: &[Coord], codes: &[u8]) -> Vec<Vec<Coord>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (point, &code) in points.iter().zip(codes) {
        if code == MOVE_TO && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        current.push(*point);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn split_by_offsets(points: &[Coord], offsets: &[u32]) -> Vec<Vec<Coord>> {
    offsets
        .windows(2)
        .map(|w| points[w[0] as usize..w[1] as usize].to_vec())
        .collect()
}

/// A chained open or closed line, still tagged with its seed chunk.
#[derive(Debug, Clone)]
pub(crate) struct TracedLine {
    pub points: Vec<Coord>,
    pub closed: bool,
    pub chunk: usize,
}

/// A chained closed fill ring.
#[derive(Debug, Clone)]
pub(crate) struct TracedRing {
    pub points: Vec<Coord>,
    pub chunk: usize,
}

type PointKey = (u64, u64);

#[inline]
fn point_key(p: Coord) -> PointKey {
    (p[0].to_bits(), p[1].to_bits())
}

fn take_unused(
    index: &HashMap<PointKey, Vec<usize>>,
    used: &mut [bool],
    key: PointKey,
) -> Option<usize> {
    for &i in index.get(&key)? {
        if !used[i] {
            used[i] = true;
            return Some(i);
        }
    }
    None
}

/// Chain line pieces into polylines by exact endpoint match.
///
/// Pieces are consistently directed (high side on the left), so a line
/// continues from a piece's end to the piece starting at the same
/// coordinate. Open lines are extended both forwards and backwards from
/// their seed piece so that the seed's position within the line never
/// fragments it; closed lines finish when they return to the seed's start,
/// repeating the first point last.
pub(crate) fn chain_lines(per_chunk: Vec<Vec<Piece>>) -> Vec<TracedLine> {
    let mut pieces: Vec<(Piece, usize)> = Vec::new();
    for (chunk, list) in per_chunk.into_iter().enumerate() {
        for piece in list {
            pieces.push((piece, chunk));
        }
    }

    let mut by_start: HashMap<PointKey, Vec<usize>> = HashMap::new();
    let mut by_end: HashMap<PointKey, Vec<usize>> = HashMap::new();
    for (i, (piece, _)) in pieces.iter().enumerate() {
        by_start.entry(point_key(piece.start)).or_default().push(i);
        by_end.entry(point_key(piece.end)).or_default().push(i);
    }

    let mut used = vec![false; pieces.len()];
    let mut lines = Vec::new();

    for seed in 0..pieces.len() {
        if used[seed] {
            continue;
        }
        used[seed] = true;
        let (piece, chunk) = pieces[seed];
        let start_key = point_key(piece.start);
        let mut points = vec![piece.start, piece.end];
        let mut closed = false;

        let mut cursor = point_key(piece.end);
        while cursor != start_key {
            match take_unused(&by_start, &mut used, cursor) {
                Some(next) => {
                    let end = pieces[next].0.end;
                    points.push(end);
                    cursor = point_key(end);
                }
                None => break,
            }
        }
        if cursor == start_key {
            closed = true;
        } else {
            let mut head: Vec<Coord> = Vec::new();
            let mut cursor = start_key;
            while let Some(prev) = take_unused(&by_end, &mut used, cursor) {
                let start = pieces[prev].0.start;
                head.push(start);
                cursor = point_key(start);
            }
            if !head.is_empty() {
                head.reverse();
                head.extend(points);
                points = head;
            }
        }

        lines.push(TracedLine {
            points,
            closed,
            chunk,
        });
    }
    lines
}

/// Cancel opposite fill pieces and chain the survivors into closed rings.
///
/// Every interior shared edge receives the same sub-arc once from each
/// adjacent cell in opposite directions; those pairs annihilate, leaving
/// the region boundary, which always chains into closed rings.
pub(crate) fn chain_rings(per_chunk: Vec<Vec<Piece>>) -> Vec<TracedRing> {
    let mut pieces: Vec<(Piece, usize)> = Vec::new();
    for (chunk, list) in per_chunk.into_iter().enumerate() {
        for piece in list {
            pieces.push((piece, chunk));
        }
    }

    // Pairwise cancellation of opposite pieces.
    let mut used = vec![false; pieces.len()];
    let mut open: HashMap<[u64; 4], Vec<usize>> = HashMap::new();
    for (i, (piece, _)) in pieces.iter().enumerate() {
        let (ks, ke) = (point_key(piece.start), point_key(piece.end));
        let reverse = [ke.0, ke.1, ks.0, ks.1];
        if let Some(bucket) = open.get_mut(&reverse) {
            if let Some(j) = bucket.pop() {
                used[i] = true;
                used[j] = true;
                continue;
            }
        }
        open.entry([ks.0, ks.1, ke.0, ke.1]).or_default().push(i);
    }

    let mut by_start: HashMap<PointKey, Vec<usize>> = HashMap::new();
    for (i, (piece, _)) in pieces.iter().enumerate() {
        if !used[i] {
            by_start.entry(point_key(piece.start)).or_default().push(i);
        }
    }

    let mut rings = Vec::new();
    for seed in 0..pieces.len() {
        if used[seed] {
            continue;
        }
        used[seed] = true;
        let (piece, chunk) = pieces[seed];
        let start_key = point_key(piece.start);
        let mut points = vec![piece.start, piece.end];

        let mut cursor = point_key(piece.end);
        while cursor != start_key {
            match take_unused(&by_start, &mut used, cursor) {
                Some(next) => {
                    let end = pieces[next].0.end;
                    points.push(end);
                    cursor = point_key(end);
                }
                None => break,
            }
        }
        if cursor == start_key {
            rings.push(TracedRing { points, chunk });
        }
    }
    rings
}

/// Signed area of a closed ring (last point equal to the first) by the
/// shoelace formula. Positive for counter-clockwise rings.
pub(crate) fn ring_area(points: &[Coord]) -> f64 {
    let mut sum = 0.0;
    for w in points.windows(2) {
        sum += w[0][0] * w[1][1] - w[1][0] * w[0][1];
    }
    sum * 0.5
}

/// Bounding box used to prune ring containment tests.
#[derive(Debug, Clone, Copy)]
struct BBox {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl BBox {
    fn from_ring(ring: &[Coord]) -> Self {
        let mut bbox = Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for p in ring {
            bbox.min_x = bbox.min_x.min(p[0]);
            bbox.max_x = bbox.max_x.max(p[0]);
            bbox.min_y = bbox.min_y.min(p[1]);
            bbox.max_y = bbox.max_y.max(p[1]);
        }
        bbox
    }

    #[inline]
    fn contains(&self, other: &BBox) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }
}

/// Ray-casting point-in-ring test.
fn point_in_ring(point: Coord, ring: &[Coord]) -> bool {
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let one = ring[i];
        let two = ring[j];
        if ((one[1] > point[1]) != (two[1] > point[1]))
            && (point[0] < (two[0] - one[0]) * (point[1] - one[1]) / (two[1] - one[1]) + one[0])
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Group rings into (outer, holes) index sets by containment parity.
///
/// A ring contained in an even number of other rings is an outer boundary;
/// odd-depth rings are holes, each attached to the smallest outer that
/// contains it.
pub(crate) fn group_ring_slices(rings: &[&[Coord]]) -> Vec<(usize, Vec<usize>)> {
    let bboxes: Vec<BBox> = rings.iter().map(|ring| BBox::from_ring(ring)).collect();
    let areas: Vec<f64> = rings.iter().map(|ring| ring_area(ring)).collect();

    let mut depth = vec![0usize; rings.len()];
    for i in 0..rings.len() {
        for j in 0..rings.len() {
            if i != j && bboxes[j].contains(&bboxes[i]) && point_in_ring(rings[i][0], rings[j]) {
                depth[i] += 1;
            }
        }
    }

    let mut groups: Vec<(usize, Vec<usize>)> = Vec::new();
    let mut group_of = vec![usize::MAX; rings.len()];
    for i in 0..rings.len() {
        if depth[i] % 2 == 0 {
            group_of[i] = groups.len();
            groups.push((i, Vec::new()));
        }
    }
    for i in 0..rings.len() {
        if depth[i] % 2 == 1 {
            let mut parent: Option<usize> = None;
            let mut parent_area = f64::INFINITY;
            for &(outer, _) in &groups {
                if bboxes[outer].contains(&bboxes[i])
                    && point_in_ring(rings[i][0], rings[outer])
                    && areas[outer].abs() < parent_area
                {
                    parent = Some(outer);
                    parent_area = areas[outer].abs();
                }
            }
            if let Some(outer) = parent {
                groups[group_of[outer]].1.push(i);
            }
        }
    }
    groups
}

/// Path codes for one line or ring.
fn path_codes(len: usize, closed: bool) -> Vec<u8> {
    let mut codes = vec![LINE_TO; len];
    if len > 0 {
        codes[0] = MOVE_TO;
        if closed {
            codes[len - 1] = CLOSE_POLY;
        }
    }
    codes
}

/// Package chained lines into the requested representation.
pub(crate) fn assemble_lines(
    traced: Vec<TracedLine>,
    line_type: LineType,
    chunk_count: usize,
) -> ContourLines {
    match line_type {
        LineType::Separate => ContourLines::Separate {
            lines: traced.into_iter().map(|line| line.points).collect(),
        },
        LineType::SeparateCode => ContourLines::SeparateCode {
            lines: traced
                .into_iter()
                .map(|line| {
                    let codes = path_codes(line.points.len(), line.closed);
                    (line.points, codes)
                })
                .collect(),
        },
        LineType::ChunkCombinedCode => {
            let mut chunks: Vec<(Vec<Coord>, Vec<u8>)> = vec![Default::default(); chunk_count];
            for line in traced {
                let entry = &mut chunks[line.chunk];
                entry.1.extend(path_codes(line.points.len(), line.closed));
                entry.0.extend(line.points);
            }
            ContourLines::ChunkCombinedCode { chunks }
        }
        LineType::ChunkCombinedOffset => {
            let mut chunks: Vec<(Vec<Coord>, Vec<u32>)> =
                vec![(Vec::new(), vec![0]); chunk_count];
            for line in traced {
                let entry = &mut chunks[line.chunk];
                entry.0.extend(line.points);
                entry.1.push(entry.0.len() as u32);
            }
            ContourLines::ChunkCombinedOffset { chunks }
        }
    }
}

/// Package chained rings into the requested representation.
pub(crate) fn assemble_fills(
    rings: Vec<TracedRing>,
    fill_type: FillType,
    chunk_count: usize,
) -> ContourFills {
    match fill_type {
        FillType::OuterCode | FillType::OuterOffset => {
            let refs: Vec<&[Coord]> = rings.iter().map(|ring| ring.points.as_slice()).collect();
            let groups = group_ring_slices(&refs);
            match fill_type {
                FillType::OuterCode => ContourFills::OuterCode {
                    polygons: groups
                        .into_iter()
                        .map(|(outer, holes)| {
                            let mut points = rings[outer].points.clone();
                            let mut codes = path_codes(points.len(), true);
                            for hole in holes {
                                codes.extend(path_codes(rings[hole].points.len(), true));
                                points.extend_from_slice(&rings[hole].points);
                            }
                            (points, codes)
                        })
                        .collect(),
                },
                _ => ContourFills::OuterOffset {
                    polygons: groups
                        .into_iter()
                        .map(|(outer, holes)| {
                            let mut points = rings[outer].points.clone();
                            let mut offsets = vec![0u32, points.len() as u32];
                            for hole in holes {
                                points.extend_from_slice(&rings[hole].points);
                                offsets.push(points.len() as u32);
                            }
                            (points, offsets)
                        })
                        .collect(),
                },
            }
        }
        FillType::ChunkCombinedCode => {
            let mut chunks: Vec<(Vec<Coord>, Vec<u8>)> = vec![Default::default(); chunk_count];
            for ring in rings {
                let entry = &mut chunks[ring.chunk];
                entry.1.extend(path_codes(ring.points.len(), true));
                entry.0.extend(ring.points);
            }
            ContourFills::ChunkCombinedCode { chunks }
        }
        FillType::ChunkCombinedOffset => {
            let mut chunks: Vec<(Vec<Coord>, Vec<u32>)> = vec![(Vec::new(), vec![0]); chunk_count];
            for ring in rings {
                let entry = &mut chunks[ring.chunk];
                entry.0.extend(ring.points);
                entry.1.push(entry.0.len() as u32);
            }
            ContourFills::ChunkCombinedOffset { chunks }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(start: Coord, end: Coord) -> Piece {
        Piece { start, end }
    }

    #[test]
    fn test_chain_open_line_across_chunks() {
        // Three collinear pieces split over two chunks, seeded mid-line.
        let per_chunk = vec![
            vec![piece([1.0, 0.5], [2.0, 0.5])],
            vec![
                piece([0.0, 0.5], [1.0, 0.5]),
                piece([2.0, 0.5], [3.0, 0.5]),
            ],
        ];
        let lines = chain_lines(per_chunk);
        assert_eq!(lines.len(), 1);
        assert!(!lines[0].closed);
        assert_eq!(
            lines[0].points,
            vec![[0.0, 0.5], [1.0, 0.5], [2.0, 0.5], [3.0, 0.5]]
        );
        assert_eq!(lines[0].chunk, 0);
    }

    #[test]
    fn test_chain_closed_loop() {
        let per_chunk = vec![vec![
            piece([0.0, 0.0], [1.0, 0.0]),
            piece([1.0, 0.0], [1.0, 1.0]),
            piece([1.0, 1.0], [0.0, 1.0]),
            piece([0.0, 1.0], [0.0, 0.0]),
        ]];
        let lines = chain_lines(per_chunk);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].closed);
        assert_eq!(lines[0].points.len(), 5);
        assert_eq!(lines[0].points[0], lines[0].points[4]);
    }

    #[test]
    fn test_cancel_and_chain_rings() {
        // Two unit cells side by side, each emitting its full boundary;
        // the shared edge cancels and one 2x1 ring remains.
        let cell_a = vec![
            piece([0.0, 0.0], [1.0, 0.0]),
            piece([1.0, 0.0], [1.0, 1.0]),
            piece([1.0, 1.0], [0.0, 1.0]),
            piece([0.0, 1.0], [0.0, 0.0]),
        ];
        let cell_b = vec![
            piece([1.0, 0.0], [2.0, 0.0]),
            piece([2.0, 0.0], [2.0, 1.0]),
            piece([2.0, 1.0], [1.0, 1.0]),
            piece([1.0, 1.0], [1.0, 0.0]),
        ];
        let rings = chain_rings(vec![cell_a, cell_b]);
        assert_eq!(rings.len(), 1);
        assert!((ring_area(&rings[0].points) - 2.0).abs() < 1e-12);
        assert_eq!(rings[0].points.first(), rings[0].points.last());
    }

    #[test]
    fn test_ring_area_orientation() {
        let ccw = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]];
        let cw: Vec<Coord> = ccw.iter().rev().copied().collect();
        assert_eq!(ring_area(&ccw), 1.0);
        assert_eq!(ring_area(&cw), -1.0);
    }

    #[test]
    fn test_group_rings_hole_assignment() {
        let outer: Vec<Coord> = vec![
            [0.0, 0.0],
            [10.0, 0.0],
            [10.0, 10.0],
            [0.0, 10.0],
            [0.0, 0.0],
        ];
        let hole: Vec<Coord> = vec![[2.0, 2.0], [2.0, 8.0], [8.0, 8.0], [8.0, 2.0], [2.0, 2.0]];
        let separate: Vec<Coord> = vec![
            [20.0, 20.0],
            [21.0, 20.0],
            [21.0, 21.0],
            [20.0, 21.0],
            [20.0, 20.0],
        ];
        let rings: Vec<&[Coord]> = vec![&outer, &hole, &separate];
        let groups = group_ring_slices(&rings);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], (0, vec![1]));
        assert_eq!(groups[1], (2, vec![]));
    }

    #[test]
    fn test_path_codes() {
        assert_eq!(path_codes(3, false), vec![MOVE_TO, LINE_TO, LINE_TO]);
        assert_eq!(path_codes(4, true), vec![MOVE_TO, LINE_TO, LINE_TO, CLOSE_POLY]);
    }

    #[test]
    fn test_assemble_lines_offsets_contract() {
        let traced = vec![
            TracedLine {
                points: vec![[0.0, 0.0], [1.0, 0.0]],
                closed: false,
                chunk: 0,
            },
            TracedLine {
                points: vec![[0.0, 1.0], [1.0, 1.0], [2.0, 1.0]],
                closed: false,
                chunk: 1,
            },
        ];
        let result = assemble_lines(traced, LineType::ChunkCombinedOffset, 2);
        let ContourLines::ChunkCombinedOffset { chunks } = &result else {
            panic!("wrong representation");
        };
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].1, vec![0, 2]);
        assert_eq!(chunks[1].1, vec![0, 3]);
        assert_eq!(chunks[0].0.len(), 2);
        assert_eq!(chunks[1].0.len(), 3);
        assert_eq!(result.line_count(), 2);
    }

    #[test]
    fn test_split_round_trip() {
        let traced = vec![
            TracedLine {
                points: vec![[0.0, 0.0], [1.0, 0.0]],
                closed: false,
                chunk: 0,
            },
            TracedLine {
                points: vec![[0.0, 1.0], [1.0, 1.0], [0.0, 1.0]],
                closed: true,
                chunk: 0,
            },
        ];
        let expected: Vec<Vec<Coord>> = traced.iter().map(|t| t.points.clone()).collect();
        for line_type in [
            LineType::Separate,
            LineType::SeparateCode,
            LineType::ChunkCombinedCode,
            LineType::ChunkCombinedOffset,
        ] {
            let result = assemble_lines(traced.clone(), line_type, 1);
            assert_eq!(result.to_separate(), expected, "{line_type}");
        }
    }
}
