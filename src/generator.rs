//! Contour generator: construction-time validation, capability
//! introspection and the per-query line/fill operations.

use std::time::Instant;

use tracing::debug;

use crate::assemble::{
    assemble_fills, assemble_lines, chain_lines, chain_rings, ContourFills, ContourLines,
    FillType, LineType,
};
use crate::cell::Interp;
use crate::chunk::{ChunkLayout, ChunkSpec};
use crate::error::ContourError;
use crate::executor::run_chunks;
use crate::grid::GridField;
use crate::trace::{trace_fill_chunk, trace_line_chunk};

/// Algorithm variant selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlgorithmVariant {
    /// Single-threaded tracing; accepts thread counts 0 and 1 only.
    #[default]
    Serial,
    /// Chunk tracing fanned out across a worker pool.
    Threaded,
}

impl AlgorithmVariant {
    /// The variant's immutable capability descriptor.
    pub fn capabilities(self) -> &'static Capabilities {
        match self {
            AlgorithmVariant::Serial => &SERIAL_CAPS,
            AlgorithmVariant::Threaded => &THREADED_CAPS,
        }
    }

    /// Short lowercase name used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            AlgorithmVariant::Serial => "serial",
            AlgorithmVariant::Threaded => "threaded",
        }
    }
}

/// What a generator variant supports, consulted at construction time.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    /// Accepted corner-mask settings.
    pub corner_mask: &'static [bool],
    /// Accepted line representations.
    pub line_types: &'static [LineType],
    /// Accepted fill representations.
    pub fill_types: &'static [FillType],
    /// Accepted interpolation modes.
    pub interp_modes: &'static [Interp],
    /// Whether thread counts other than 0 and 1 are accepted.
    pub threads: bool,
    /// Corner-mask setting used when none is requested.
    pub default_corner_mask: bool,
    /// Line representation used when none is requested.
    pub default_line_type: LineType,
    /// Fill representation used when none is requested.
    pub default_fill_type: FillType,
}

const ALL_LINE_TYPES: [LineType; 4] = [
    LineType::Separate,
    LineType::SeparateCode,
    LineType::ChunkCombinedCode,
    LineType::ChunkCombinedOffset,
];

const ALL_FILL_TYPES: [FillType; 4] = [
    FillType::OuterCode,
    FillType::OuterOffset,
    FillType::ChunkCombinedCode,
    FillType::ChunkCombinedOffset,
];

const ALL_INTERP_MODES: [Interp; 2] = [Interp::Linear, Interp::Log];

static SERIAL_CAPS: Capabilities = Capabilities {
    corner_mask: &[false, true],
    line_types: &ALL_LINE_TYPES,
    fill_types: &ALL_FILL_TYPES,
    interp_modes: &ALL_INTERP_MODES,
    threads: false,
    default_corner_mask: true,
    default_line_type: LineType::SeparateCode,
    default_fill_type: FillType::OuterCode,
};

static THREADED_CAPS: Capabilities = Capabilities {
    corner_mask: &[false, true],
    line_types: &ALL_LINE_TYPES,
    fill_types: &ALL_FILL_TYPES,
    interp_modes: &ALL_INTERP_MODES,
    threads: true,
    default_corner_mask: true,
    default_line_type: LineType::SeparateCode,
    default_fill_type: FillType::OuterCode,
};

/// Construction options for [`ContourGenerator`].
///
/// `None` selectors fall back to the variant's defaults. The chunk sizing
/// specifications are mutually exclusive by construction of [`ChunkSpec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratorOptions {
    pub variant: AlgorithmVariant,
    pub corner_mask: Option<bool>,
    pub chunks: ChunkSpec,
    pub line_type: Option<LineType>,
    pub fill_type: Option<FillType>,
    pub interp: Interp,
    /// Worker threads for the `Threaded` variant: 0 means available
    /// hardware concurrency, 1 is effectively serial.
    pub thread_count: usize,
}

/// Contour generator over one immutable grid.
///
/// All configuration is validated here; the per-query operations
/// [`lines`](Self::lines) and [`filled`](Self::filled) are stateless and
/// repeatable: identical arguments always return identical results, and
/// serial and threaded execution over the same chunking are byte-identical.
///
/// # Example
///
/// ```
/// use grid_contour::{ContourGenerator, GeneratorOptions, GridField};
///
/// let grid = GridField::from_axes(
///     &[0.0, 1.0, 2.0],
///     &[0.0, 1.0],
///     vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
/// )
/// .unwrap();
/// let generator = ContourGenerator::new(grid, GeneratorOptions::default()).unwrap();
/// let lines = generator.lines(0.5);
/// assert_eq!(lines.line_count(), 1);
/// ```
#[derive(Debug)]
pub struct ContourGenerator {
    grid: GridField,
    layout: ChunkLayout,
    variant: AlgorithmVariant,
    corner_mask: bool,
    line_type: LineType,
    fill_type: FillType,
    interp: Interp,
    thread_count: usize,
    pool: Option<rayon::ThreadPool>,
}

impl ContourGenerator {
    /// Validate the options against the variant's capabilities and build
    /// the generator. Every mismatch is rejected here, never deferred into
    /// a query.
    pub fn new(grid: GridField, options: GeneratorOptions) -> Result<Self, ContourError> {
        let variant = options.variant;
        let caps = variant.capabilities();

        let corner_mask = options.corner_mask.unwrap_or(caps.default_corner_mask);
        if !caps.corner_mask.contains(&corner_mask) {
            return Err(ContourError::configuration(format!(
                "{} contour generator does not support corner_mask={corner_mask}",
                variant.name()
            )));
        }

        let line_type = options.line_type.unwrap_or(caps.default_line_type);
        if !caps.line_types.contains(&line_type) {
            return Err(ContourError::configuration(format!(
                "{} contour generator does not support line_type {line_type}",
                variant.name()
            )));
        }

        let fill_type = options.fill_type.unwrap_or(caps.default_fill_type);
        if !caps.fill_types.contains(&fill_type) {
            return Err(ContourError::configuration(format!(
                "{} contour generator does not support fill_type {fill_type}",
                variant.name()
            )));
        }

        if !caps.interp_modes.contains(&options.interp) {
            return Err(ContourError::configuration(format!(
                "{} contour generator does not support interp {:?}",
                variant.name(),
                options.interp
            )));
        }

        if !caps.threads && options.thread_count > 1 {
            return Err(ContourError::configuration(format!(
                "{} contour generator does not support thread_count {}",
                variant.name(),
                options.thread_count
            )));
        }

        let (ny, nx) = grid.shape();
        let layout = ChunkLayout::plan(options.chunks, ny, nx)?;

        let thread_count = if caps.threads {
            match options.thread_count {
                0 => std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1),
                n => n,
            }
        } else {
            1
        };
        let pool = if thread_count > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(thread_count)
                .build()
                .map_err(|e| {
                    ContourError::configuration(format!("failed to build worker pool: {e}"))
                })?;
            Some(pool)
        } else {
            None
        };

        debug!(
            variant = variant.name(),
            ny,
            nx,
            chunks = layout.len(),
            threads = thread_count,
            corner_mask,
            "contour generator ready"
        );

        Ok(Self {
            grid,
            layout,
            variant,
            corner_mask,
            line_type,
            fill_type,
            interp: options.interp,
            thread_count,
            pool,
        })
    }

    /// Trace the contour lines of a single level.
    pub fn lines(&self, level: f64) -> ContourLines {
        let started = Instant::now();
        let grid = &self.grid;
        let chunks = self.layout.chunks();
        let corner_mask = self.corner_mask;
        let interp = self.interp;

        let pieces = run_chunks(self.pool.as_ref(), chunks.len(), |i| {
            trace_line_chunk(grid, &chunks[i], level, corner_mask, interp)
        });
        let traced = chain_lines(pieces);
        debug!(
            level,
            lines = traced.len(),
            elapsed = ?started.elapsed(),
            "line query complete"
        );
        assemble_lines(traced, self.line_type, chunks.len())
    }

    /// Trace the filled contours of the band `lower <= z < upper`. Either
    /// bound may be infinite; the bounds must be increasing.
    pub fn filled(&self, lower: f64, upper: f64) -> Result<ContourFills, ContourError> {
        if !(lower < upper) {
            return Err(ContourError::configuration(format!(
                "fill levels must be increasing, got ({lower}, {upper})"
            )));
        }
        let started = Instant::now();
        let grid = &self.grid;
        let chunks = self.layout.chunks();
        let corner_mask = self.corner_mask;
        let interp = self.interp;

        let pieces = run_chunks(self.pool.as_ref(), chunks.len(), |i| {
            trace_fill_chunk(grid, &chunks[i], lower, upper, corner_mask, interp)
        });
        let rings = chain_rings(pieces);
        debug!(
            lower,
            upper,
            rings = rings.len(),
            elapsed = ?started.elapsed(),
            "fill query complete"
        );
        Ok(assemble_fills(rings, self.fill_type, chunks.len()))
    }

    /// The algorithm variant this generator was built with.
    pub fn variant(&self) -> AlgorithmVariant {
        self.variant
    }

    /// The grid this generator traces.
    pub fn grid(&self) -> &GridField {
        &self.grid
    }

    /// Whether corner-masking is active.
    pub fn corner_mask(&self) -> bool {
        self.corner_mask
    }

    /// The line representation every line query returns.
    pub fn line_type(&self) -> LineType {
        self.line_type
    }

    /// The fill representation every fill query returns.
    pub fn fill_type(&self) -> FillType {
        self.fill_type
    }

    /// The interpolation mode.
    pub fn interp(&self) -> Interp {
        self.interp
    }

    /// Effective worker thread count (1 when serial).
    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Total number of chunks.
    pub fn chunk_count(&self) -> usize {
        self.layout.len()
    }

    /// Chunk counts along each dimension `(rows, cols)`.
    pub fn chunk_counts(&self) -> (usize, usize) {
        self.layout.counts()
    }

    /// Nominal chunk size in cells `(rows, cols)`.
    pub fn chunk_size(&self) -> (usize, usize) {
        self.layout.size()
    }
}
