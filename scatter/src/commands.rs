use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scatter", version, about = "Sliding-window scatter keyframe encoder")]
pub struct Cli {
    /// Print debug logs
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the configured encoder pipeline over a trace
    Encode {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        input: PathBuf,
        /// Write the encoded trace here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the phase of every sample at one frame
    Phases {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        input: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        frame: i64,
    },
    /// Emit the transition keyframes of a trace as JSON
    Keyframes {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Render a .blend file with a pool of headless Blender workers
    Render {
        file: PathBuf,
        /// Project file whose [render] section provides the defaults
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        workers: Option<usize>,
        #[arg(long)]
        executable: Option<String>,
        #[arg(long)]
        engine: Option<String>,
        #[arg(long)]
        output: Option<String>,
    },
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
}

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Build a plot from traces and store the session
    Save {
        #[arg(long)]
        config: PathBuf,
        #[arg(long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,
        #[arg(long)]
        output: PathBuf,
    },
    /// Replay a stored session and summarize it
    Show { snapshot: PathBuf },
}
