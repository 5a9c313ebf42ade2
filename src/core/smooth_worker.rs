//! core/smooth_worker.rs — fan-out of per-direction debinning.
//!
//! Every direction row is an independent solve over the shared grid, so the
//! loop parallelizes freely. Jobs are index-tagged and rows are reassembled
//! by index, so worker scheduling cannot change the output; on failure the
//! error of the lowest-indexed failing row is returned, which keeps failures
//! deterministic too.

use std::thread;

use crate::core::bins::FrequencyBins;
use crate::core::smooth::{debin, SolverParams};
use crate::core::DebinError;

/// Debin `rows` over a shared grid, using up to `workers` threads.
///
/// `workers <= 1` (or a single row) runs sequentially; the parallel path
/// returns bit-identical results.
pub fn debin_rows(
    bins: &FrequencyBins,
    rows: &[Vec<f64>],
    params: &SolverParams,
    workers: usize,
) -> Result<Vec<Vec<f64>>, DebinError> {
    if workers <= 1 || rows.len() <= 1 {
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(debin(bins, row, params)?.values);
        }
        return Ok(out);
    }

    let n_workers = workers.min(rows.len());
    let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, &[f64])>();
    let (result_tx, result_rx) =
        crossbeam_channel::unbounded::<(usize, Result<Vec<f64>, DebinError>)>();

    let mut out = vec![Vec::new(); rows.len()];
    let mut first_failure: Option<(usize, DebinError)> = None;

    thread::scope(|s| {
        for _ in 0..n_workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            s.spawn(move || {
                while let Ok((idx, row)) = job_rx.recv() {
                    let res = debin(bins, row, params).map(|c| c.values);
                    let _ = result_tx.send((idx, res));
                }
            });
        }
        drop(result_tx);

        for (idx, row) in rows.iter().enumerate() {
            let _ = job_tx.send((idx, row.as_slice()));
        }
        // Workers exit once the job channel is drained and closed.
        drop(job_tx);

        while let Ok((idx, res)) = result_rx.recv() {
            match res {
                Ok(values) => out[idx] = values,
                Err(err) => {
                    let keep = first_failure
                        .as_ref()
                        .map(|(i, _)| idx < *i)
                        .unwrap_or(true);
                    if keep {
                        first_failure = Some((idx, err));
                    }
                }
            }
        }
    });

    match first_failure {
        Some((_, err)) => Err(err),
        None => Ok(out),
    }
}
