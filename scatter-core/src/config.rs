use crate::validation::Validator;
use encoding::{pipe, Encoder, EncodingError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use timeline::FrameWindow;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("toml error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// How simulation time and values are stretched onto the plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageScale {
    /// Half of the simulation time visible in the plot at once.
    pub time_halfwidth: f64,
    /// Signal value that spans the full plot height.
    pub value_span: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    pub origin: [f64; 3],
    pub scale: [f64; 3],
    pub image_scale: ImageScale,
    pub window: FrameWindow,
}

impl PlotConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Validator::finite_all("origin", &self.origin)?;
        Validator::finite_all("scale", &self.scale)?;
        Validator::positive("image_scale.time_halfwidth", self.image_scale.time_halfwidth)?;
        Validator::nonzero("image_scale.value_span", self.image_scale.value_span)?;
        Ok(())
    }

    pub fn half_width(&self) -> f64 {
        self.image_scale.time_halfwidth
    }

    /// Width of the visible window measured in frames.
    pub fn window_frames(&self) -> f64 {
        self.image_scale.time_halfwidth * 2.0 * self.window.scale()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_executable")]
    pub executable: String,
    #[serde(default = "default_engine")]
    pub engine: String,
    #[serde(default = "default_output")]
    pub output: String,
}

fn default_workers() -> usize {
    1
}

fn default_executable() -> String {
    "blender".to_string()
}

fn default_engine() -> String {
    "BLENDER_EEVEE".to_string()
}

fn default_output() -> String {
    "//render/animation_####.png".to_string()
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            executable: default_executable(),
            engine: default_engine(),
            output: default_output(),
        }
    }
}

/// Everything needed to turn traces into scatter keyframes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub plot: PlotConfig,
    #[serde(default)]
    pub encoders: Vec<Encoder>,
    #[serde(default)]
    pub render: RenderSettings,
}

impl ProjectConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.plot.validate()?;
        for encoder in &self.encoders {
            encoder.validate()?;
        }
        Ok(())
    }

    /// The configured encoders as one pipeline, or `None` when there are none.
    pub fn pipeline(&self) -> Result<Option<Encoder>, ConfigError> {
        if self.encoders.is_empty() {
            return Ok(None);
        }
        Ok(Some(pipe(self.encoders.clone())?))
    }
}

/// A single recorded trace as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceInput {
    pub signal: Vec<f64>,
    pub time: Vec<f64>,
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}

pub fn load_project_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let data = fs::read_to_string(path)?;
    let mut config: ProjectConfig = if is_toml(path) {
        toml::from_str(&data)?
    } else {
        serde_json::from_str(&data)?
    };
    Validator::normalize_workers(&mut config.render.workers);
    config.validate()?;
    log::debug!(
        "loaded project '{}' with {} encoder(s)",
        path.display(),
        config.encoders.len()
    );
    Ok(config)
}

pub fn save_project_file(path: &Path, config: &ProjectConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = if is_toml(path) {
        toml::to_string_pretty(config)?
    } else {
        serde_json::to_string_pretty(config)?
    };
    fs::write(path, data)?;
    Ok(())
}

pub fn load_trace_file(path: &Path) -> Result<TraceInput, ConfigError> {
    let data = fs::read(path)?;
    let trace: TraceInput = serde_json::from_slice(&data)?;
    if trace.signal.len() != trace.time.len() {
        return Err(ConfigError::Invalid(format!(
            "trace '{}' has {} values but {} timestamps",
            path.display(),
            trace.signal.len(),
            trace.time.len()
        )));
    }
    Ok(trace)
}
