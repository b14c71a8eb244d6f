//! Thread coordinator: fans chunk work out across a fixed worker pool.
//!
//! Each worker reads only the shared immutable grid and level parameters
//! and writes into the result slot for its chunk index, so no locking is
//! needed during tracing. Results come back strictly in chunk-index order
//! regardless of completion order, which keeps threaded output
//! byte-identical to a serial run over the same chunking. A panicking
//! worker propagates only after the parallel call has finished; no partial
//! result is ever returned.

use rayon::prelude::*;

/// Run `task` for every chunk index, in parallel on `pool` if one is
/// configured, collecting results in chunk-index order.
pub(crate) fn run_chunks<T, F>(pool: Option<&rayon::ThreadPool>, count: usize, task: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync,
{
    match pool {
        Some(pool) => pool.install(|| (0..count).into_par_iter().map(|i| task(i)).collect()),
        None => (0..count).map(task).collect(),
    }
}
