//! Renders an animation in parallel, one disjoint share of the frames per worker.

pub mod blender;

pub use blender::{BlenderBackend, BlenderRender};

use scatter_core::validation::Validator;
use scatter_core::{BackendContext, BackendError, Capability};
use std::thread;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("failed to start '{executable}': {source}")]
    Spawn {
        executable: String,
        #[source]
        source: std::io::Error,
    },
    #[error("worker {rank} exited with {status}: {stderr}")]
    CommandFailed {
        rank: usize,
        status: String,
        stderr: String,
    },
    #[error("worker {rank} panicked")]
    Panicked { rank: usize },
    #[error("worker {rank} could not be started: {message}")]
    Thread { rank: usize, message: String },
    #[error("{} of {size} render workers failed: {details}", .ranks.len())]
    WorkersFailed {
        ranks: Vec<usize>,
        size: usize,
        details: String,
    },
}

/// One share of a render job. `rank` is in `0..size` and every rank renders a
/// disjoint part of the frame range.
pub trait RenderPortion: Sync {
    fn render_portion(&self, rank: usize, size: usize) -> Result<String, RenderError>;
}

/// Outcome of every worker, ordered by rank.
#[derive(Debug, Default)]
pub struct RenderReport {
    pub completed: Vec<(usize, String)>,
    pub failed: Vec<(usize, RenderError)>,
}

impl RenderReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn into_result(self) -> Result<Vec<(usize, String)>, RenderError> {
        if self.failed.is_empty() {
            return Ok(self.completed);
        }
        let size = self.completed.len() + self.failed.len();
        let ranks = self.failed.iter().map(|(rank, _)| *rank).collect();
        let details = self
            .failed
            .iter()
            .map(|(rank, err)| format!("[{rank}] {err}"))
            .collect::<Vec<_>>()
            .join("; ");
        Err(RenderError::WorkersFailed {
            ranks,
            size,
            details,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    workers: usize,
}

impl Renderer {
    /// Fails when the active backend cannot render.
    pub fn new(ctx: &BackendContext, workers: usize) -> Result<Self, RenderError> {
        ctx.require("renderer", &[Capability::Render])?;
        let mut workers = workers;
        Validator::normalize_workers(&mut workers);
        Ok(Self { workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs every rank on its own thread and waits for all of them. A failing
    /// worker never cancels its siblings.
    pub fn render_portions<P: RenderPortion + ?Sized>(&self, portion: &P) -> RenderReport {
        let size = self.workers;
        log::info!("rendering with {size} worker(s)");
        let mut report = RenderReport::default();
        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(size);
            for rank in 0..size {
                let spawned = thread::Builder::new()
                    .name(format!("render-{rank}"))
                    .spawn_scoped(scope, move || portion.render_portion(rank, size));
                match spawned {
                    Ok(handle) => handles.push((rank, handle)),
                    Err(err) => report.failed.push((
                        rank,
                        RenderError::Thread {
                            rank,
                            message: err.to_string(),
                        },
                    )),
                }
            }
            for (rank, handle) in handles {
                match handle.join() {
                    Ok(Ok(message)) => {
                        log::info!("worker {rank} finished: {message}");
                        report.completed.push((rank, message));
                    }
                    Ok(Err(err)) => {
                        log::error!("worker {rank} failed: {err}");
                        report.failed.push((rank, err));
                    }
                    Err(_) => {
                        log::error!("worker {rank} panicked");
                        report.failed.push((rank, RenderError::Panicked { rank }));
                    }
                }
            }
        });
        report.failed.sort_by_key(|(rank, _)| *rank);
        report
    }
}
