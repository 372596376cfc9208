//! The host application that turns plots and keyframes into a scene.
//!
//! A backend is chosen once, wrapped in a [`BackendContext`] and handed to every
//! component that talks to the host. Components declare the capabilities they
//! need up front and fail before touching the host when one is missing.

use crate::config::PlotConfig;
use crate::transitions::TransitionKeyframe;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    CreatePlot,
    CreateScatter,
    InsertKeyframe,
    Render,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::CreatePlot => "create_plot",
            Capability::CreateScatter => "create_scatter",
            Capability::InsertKeyframe => "insert_keyframe",
            Capability::Render => "render",
        };
        f.write_str(name)
    }
}

/// Interpolation the host applies between two keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    Linear,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("can't create {component} because backend '{backend}' misses {}", join(.missing))]
    MissingCapability {
        component: &'static str,
        backend: String,
        missing: Vec<Capability>,
    },
    #[error("{0} all claim priority as backend")]
    MultiplePriority(String),
    #[error("unknown backend '{name}', known backends: {known}")]
    UnknownBackend { name: String, known: String },
    #[error("the '{0}' backend is not available")]
    Unavailable(String),
    #[error("backend '{backend}' failed: {message}")]
    Host { backend: String, message: String },
}

fn join(capabilities: &[Capability]) -> String {
    capabilities
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub trait Backend: Send {
    fn name(&self) -> &str;

    fn capabilities(&self) -> &[Capability];

    fn available(&self) -> bool {
        true
    }

    /// A priority backend is selected automatically when it is the only one.
    fn priority(&self) -> bool {
        false
    }

    fn create_plot(&mut self, _id: u64, _config: &PlotConfig) -> Result<(), BackendError> {
        Err(self.unsupported(Capability::CreatePlot))
    }

    fn create_scatter(
        &mut self,
        _plot: u64,
        _trace: usize,
        _points: &[[f64; 3]],
    ) -> Result<(), BackendError> {
        Err(self.unsupported(Capability::CreateScatter))
    }

    fn insert_keyframe(
        &mut self,
        _plot: u64,
        _trace: usize,
        _keyframe: &TransitionKeyframe,
        _interpolation: Interpolation,
    ) -> Result<(), BackendError> {
        Err(self.unsupported(Capability::InsertKeyframe))
    }

    fn unsupported(&self, capability: Capability) -> BackendError {
        BackendError::Host {
            backend: self.name().to_string(),
            message: format!("{capability} is not supported"),
        }
    }
}

/// Used when no host is present; supports nothing.
#[derive(Debug, Default)]
pub struct FallbackBackend;

impl Backend for FallbackBackend {
    fn name(&self) -> &str {
        "fallback"
    }

    fn capabilities(&self) -> &[Capability] {
        &[]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterRecord {
    pub plot: u64,
    pub trace: usize,
    pub points: Vec<[f64; 3]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeRecord {
    pub plot: u64,
    pub trace: usize,
    pub keyframe: TransitionKeyframe,
    pub interpolation: Interpolation,
}

/// Everything a [`RecordingBackend`] was asked to create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
    pub plots: Vec<(u64, PlotConfig)>,
    pub scatters: Vec<ScatterRecord>,
    pub keyframes: Vec<KeyframeRecord>,
}

/// In-memory host. The recording stays reachable through [`RecordingBackend::recording`]
/// after the backend has been moved into a context.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    recording: Arc<Mutex<Recording>>,
}

const RECORDING_CAPABILITIES: [Capability; 3] = [
    Capability::CreatePlot,
    Capability::CreateScatter,
    Capability::InsertKeyframe,
];

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recording(&self) -> Arc<Mutex<Recording>> {
        Arc::clone(&self.recording)
    }

    fn record<F: FnOnce(&mut Recording)>(&self, f: F) {
        let mut recording = self.recording.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut recording);
    }
}

impl Backend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn capabilities(&self) -> &[Capability] {
        &RECORDING_CAPABILITIES
    }

    fn create_plot(&mut self, id: u64, config: &PlotConfig) -> Result<(), BackendError> {
        self.record(|r| r.plots.push((id, *config)));
        Ok(())
    }

    fn create_scatter(&mut self, plot: u64, trace: usize, points: &[[f64; 3]]) -> Result<(), BackendError> {
        self.record(|r| {
            r.scatters.push(ScatterRecord {
                plot,
                trace,
                points: points.to_vec(),
            })
        });
        Ok(())
    }

    fn insert_keyframe(
        &mut self,
        plot: u64,
        trace: usize,
        keyframe: &TransitionKeyframe,
        interpolation: Interpolation,
    ) -> Result<(), BackendError> {
        self.record(|r| {
            r.keyframes.push(KeyframeRecord {
                plot,
                trace,
                keyframe: *keyframe,
                interpolation,
            })
        });
        Ok(())
    }
}

/// The active backend, passed explicitly to whatever needs the host.
pub struct BackendContext {
    backend: Box<dyn Backend>,
}

impl BackendContext {
    pub fn new(backend: Box<dyn Backend>) -> Self {
        log::info!("using '{}' backend", backend.name());
        Self { backend }
    }

    pub fn name(&self) -> &str {
        self.backend.name()
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.backend.capabilities().contains(&capability)
    }

    pub fn require(&self, component: &'static str, needed: &[Capability]) -> Result<(), BackendError> {
        let missing: Vec<Capability> = needed
            .iter()
            .copied()
            .filter(|capability| !self.supports(*capability))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(BackendError::MissingCapability {
                component,
                backend: self.backend.name().to_string(),
                missing,
            })
        }
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> &mut dyn Backend {
        self.backend.as_mut()
    }
}

/// The backends a program knows about, from which one context is created.
pub struct BackendRegistry {
    backends: Vec<Box<dyn Backend>>,
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            backends: vec![Box::new(FallbackBackend)],
        }
    }

    pub fn register(&mut self, backend: Box<dyn Backend>) {
        self.backends.push(backend);
    }

    pub fn names(&self) -> Vec<String> {
        self.backends.iter().map(|b| b.name().to_string()).collect()
    }

    /// Picks the single priority backend, or the fallback when none claims priority.
    pub fn establish(self) -> Result<BackendContext, BackendError> {
        let priority: Vec<&str> = self
            .backends
            .iter()
            .filter(|b| b.priority())
            .map(|b| b.name())
            .collect();
        if priority.len() > 1 {
            let names = priority
                .iter()
                .map(|name| format!("'{name}'"))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(BackendError::MultiplePriority(names));
        }
        let chosen = priority.first().map(|name| name.to_string());
        match chosen {
            Some(name) => self.select(&name),
            None => Ok(BackendContext::new(Box::new(FallbackBackend))),
        }
    }

    pub fn select(self, name: &str) -> Result<BackendContext, BackendError> {
        let known = self
            .names()
            .iter()
            .map(|name| format!("'{name}'"))
            .collect::<Vec<_>>()
            .join(", ");
        let backend = self
            .backends
            .into_iter()
            .find(|b| b.name() == name)
            .ok_or_else(|| BackendError::UnknownBackend {
                name: name.to_string(),
                known,
            })?;
        if !backend.available() {
            return Err(BackendError::Unavailable(name.to_string()));
        }
        Ok(BackendContext::new(backend))
    }
}
