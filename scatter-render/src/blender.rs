use crate::{RenderError, RenderPortion};
use scatter_core::{Backend, Capability, RenderSettings};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Renders a share of a `.blend` file's animation with a headless Blender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlenderRender {
    file: PathBuf,
    settings: RenderSettings,
}

impl BlenderRender {
    pub fn new(file: impl Into<PathBuf>, settings: RenderSettings) -> Self {
        Self {
            file: file.into(),
            settings,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// `-s` and `-j` make rank `r` render frames `r + 1`, `r + 1 + size`, ...
    pub fn command(&self, rank: usize, size: usize) -> Command {
        let mut cmd = Command::new(&self.settings.executable);
        cmd.arg("-b")
            .arg(&self.file)
            .arg("-E")
            .arg(&self.settings.engine)
            .arg("-s")
            .arg((rank + 1).to_string())
            .arg("-j")
            .arg(size.to_string())
            .arg("-o")
            .arg(&self.settings.output)
            .arg("-a")
            .stdin(Stdio::null());
        cmd
    }
}

impl RenderPortion for BlenderRender {
    fn render_portion(&self, rank: usize, size: usize) -> Result<String, RenderError> {
        log::debug!("worker {rank}/{size}: {:?}", self.command(rank, size));
        let output = self
            .command(rank, size)
            .output()
            .map_err(|source| RenderError::Spawn {
                executable: self.settings.executable.clone(),
                source,
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(RenderError::CommandFailed {
                rank,
                status: output.status.to_string(),
                stderr,
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let last = stdout.lines().rev().find(|line| !line.trim().is_empty());
        Ok(last.unwrap_or("done").trim().to_string())
    }
}

/// Host backend for rendering only; scene editing happens inside Blender itself.
#[derive(Debug, Clone)]
pub struct BlenderBackend {
    executable: String,
}

impl BlenderBackend {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

impl Backend for BlenderBackend {
    fn name(&self) -> &str {
        "blender"
    }

    fn capabilities(&self) -> &[Capability] {
        &[Capability::Render]
    }

    fn available(&self) -> bool {
        Command::new(&self.executable)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}
