//! Registry of the plots created in the active backend.

use crate::backend::{BackendContext, Capability, Interpolation};
use crate::config::{ConfigError, PlotConfig};
use crate::projection::project_frame;
use crate::snapshot::{PlotSnapshot, SessionSnapshot, TraceSnapshot};
use crate::transitions::transition_keyframes;
use crate::ScatterError;
use encoding::Encoder;
use std::collections::{BTreeMap, BTreeSet};
use timeline::{time, KeyFrames, TimeAxis};

#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    signal: Vec<f64>,
    time: Vec<f64>,
    encoded: KeyFrames,
    keyframes: usize,
}

impl Trace {
    /// The values as they were added, before encoding.
    pub fn signal(&self) -> &[f64] {
        &self.signal
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn encoded(&self) -> &KeyFrames {
        &self.encoded
    }

    /// Number of transition keyframes sent to the backend.
    pub fn keyframe_count(&self) -> usize {
        self.keyframes
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    id: u64,
    config: PlotConfig,
    encoder: Option<Encoder>,
    traces: Vec<Trace>,
}

impl Plot {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn encoder(&self) -> Option<&Encoder> {
        self.encoder.as_ref()
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    /// Encodes the trace, places its scatter at the first frame of the window and
    /// keyframes every phase transition with linear interpolation. Returns the
    /// index of the new trace within the plot.
    pub fn add_trace<T: TimeAxis + ?Sized>(
        &mut self,
        ctx: &mut BackendContext,
        signal: Vec<f64>,
        time: &T,
    ) -> Result<usize, ScatterError> {
        ctx.require("trace", &[Capability::CreateScatter, Capability::InsertKeyframe])?;
        let raw = KeyFrames::from_axis(signal, time)?;
        let encoded = match &self.encoder {
            Some(encoder) => encoder.encode(raw.clone())?,
            None => raw.clone(),
        };
        let index = self.traces.len();
        let points = project_frame(
            &self.config,
            encoded.signal(),
            encoded.time(),
            self.config.window.f_start(),
        );
        ctx.backend_mut().create_scatter(self.id, index, &points)?;

        // kept even if a keyframe insert fails, so the index is never reused
        let keyframes = transition_keyframes(&self.config, encoded.signal(), encoded.time());
        let (signal, time) = raw.into_parts();
        self.traces.push(Trace {
            signal,
            time,
            encoded,
            keyframes: 0,
        });
        for keyframe in &keyframes {
            ctx.backend_mut()
                .insert_keyframe(self.id, index, keyframe, Interpolation::Linear)?;
            self.traces[index].keyframes += 1;
        }
        log::info!(
            "plot {} trace {index}: {} points, {} keyframes",
            self.id,
            points.len(),
            keyframes.len()
        );
        Ok(index)
    }
}

fn exhausted() -> ScatterError {
    ConfigError::Invalid(format!("object id {} leaves no room for another id", u64::MAX)).into()
}

/// Object ids handed out so far and the plots they belong to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    ids: BTreeSet<u64>,
    plots: BTreeMap<u64, Plot>,
    next_object_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `requested`, or the next free id when `None`.
    pub fn register(&mut self, requested: Option<u64>) -> Result<u64, ScatterError> {
        let id = match requested {
            Some(id) if self.ids.contains(&id) => return Err(ScatterError::IdTaken(id)),
            Some(id) => id,
            None => {
                let mut id = self.next_object_id;
                while self.ids.contains(&id) {
                    id = id.checked_add(1).ok_or_else(exhausted)?;
                }
                id
            }
        };
        let next = id.checked_add(1).ok_or_else(exhausted)?;
        self.ids.insert(id);
        self.next_object_id = self.next_object_id.max(next);
        Ok(id)
    }

    pub fn is_registered(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    pub fn next_object_id(&self) -> u64 {
        self.next_object_id
    }

    pub fn find(&self, id: u64) -> Result<&Plot, ScatterError> {
        self.plots.get(&id).ok_or(ScatterError::IdMissing(id))
    }

    pub fn find_mut(&mut self, id: u64) -> Result<&mut Plot, ScatterError> {
        self.plots.get_mut(&id).ok_or(ScatterError::IdMissing(id))
    }

    pub fn plots(&self) -> impl Iterator<Item = &Plot> {
        self.plots.values()
    }

    pub fn create_plot(
        &mut self,
        ctx: &mut BackendContext,
        config: PlotConfig,
        encoder: Option<Encoder>,
    ) -> Result<u64, ScatterError> {
        self.create_plot_with_id(ctx, None, config, encoder)
    }

    fn create_plot_with_id(
        &mut self,
        ctx: &mut BackendContext,
        requested: Option<u64>,
        config: PlotConfig,
        encoder: Option<Encoder>,
    ) -> Result<u64, ScatterError> {
        ctx.require("plot", &[Capability::CreatePlot])?;
        config.validate()?;
        if let Some(encoder) = &encoder {
            encoder.validate()?;
        }
        let id = self.register(requested)?;
        if let Err(err) = ctx.backend_mut().create_plot(id, &config) {
            self.ids.remove(&id);
            return Err(err.into());
        }
        self.plots.insert(
            id,
            Plot {
                id,
                config,
                encoder,
                traces: Vec::new(),
            },
        );
        log::debug!("created plot {id} in '{}'", ctx.name());
        Ok(id)
    }

    pub fn add_trace<T: TimeAxis + ?Sized>(
        &mut self,
        ctx: &mut BackendContext,
        plot: u64,
        signal: Vec<f64>,
        time: &T,
    ) -> Result<usize, ScatterError> {
        self.find_mut(plot)?.add_trace(ctx, signal, time)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let plots = self
            .plots
            .values()
            .map(|plot| PlotSnapshot {
                id: plot.id,
                config: plot.config,
                encoder: plot.encoder.clone(),
                traces: plot
                    .traces
                    .iter()
                    .map(|trace| TraceSnapshot {
                        signal: trace.signal.clone(),
                        time: trace.time.clone(),
                    })
                    .collect(),
            })
            .collect();
        SessionSnapshot {
            next_object_id: self.next_object_id,
            plots,
            ..SessionSnapshot::default()
        }
    }

    /// Rebuilds a scene in `ctx` by replaying every plot and trace of `snapshot`.
    pub fn restore(ctx: &mut BackendContext, snapshot: &SessionSnapshot) -> Result<Self, ScatterError> {
        snapshot.check_version()?;
        if !snapshot.plots.is_empty() {
            ctx.require(
                "scene",
                &[
                    Capability::CreatePlot,
                    Capability::CreateScatter,
                    Capability::InsertKeyframe,
                ],
            )?;
        }
        let mut scene = Scene::new();
        for plot in &snapshot.plots {
            let id = scene.create_plot_with_id(ctx, Some(plot.id), plot.config, plot.encoder.clone())?;
            for trace in &plot.traces {
                scene.add_trace(ctx, id, trace.signal.clone(), &time(trace.time.clone()))?;
            }
        }
        scene.next_object_id = scene.next_object_id.max(snapshot.next_object_id);
        log::info!(
            "restored {} plot(s) with {} trace(s)",
            snapshot.plots.len(),
            snapshot.trace_count()
        );
        Ok(scene)
    }
}
