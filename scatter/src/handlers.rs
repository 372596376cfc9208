use crate::commands::*;
use crate::output::*;
use encoding::encode_trace;
use scatter_core::{
    frame_phases, load_project_file, load_trace_file, transition_keyframes, BackendContext,
    BackendRegistry, ProjectConfig, RecordingBackend, RenderSettings, Scene, SessionSnapshot,
    TraceInput,
};
use scatter_render::{BlenderBackend, BlenderRender, Renderer};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use timeline::{time, KeyFrames};

type CommandResult = Result<(), Box<dyn Error>>;

pub fn handle_command(command: Commands) -> CommandResult {
    match command {
        Commands::Encode {
            config,
            input,
            output,
        } => handle_encode(&config, &input, output.as_deref()),
        Commands::Phases {
            config,
            input,
            frame,
        } => handle_phases(&config, &input, frame),
        Commands::Keyframes {
            config,
            input,
            output,
        } => handle_keyframes(&config, &input, output.as_deref()),
        Commands::Render {
            file,
            config,
            workers,
            executable,
            engine,
            output,
        } => {
            let mut settings = match config {
                Some(path) => load_project_file(&path)?.render,
                None => RenderSettings::default(),
            };
            if let Some(workers) = workers {
                settings.workers = workers;
            }
            if let Some(executable) = executable {
                settings.executable = executable;
            }
            if let Some(engine) = engine {
                settings.engine = engine;
            }
            if let Some(output) = output {
                settings.output = output;
            }
            handle_render(file, settings)
        }
        Commands::Session { command } => handle_session_command(command),
    }
}

/// Loads the project and runs its pipeline over the trace at `input`.
fn encoded_trace(config: &Path, input: &Path) -> Result<(ProjectConfig, KeyFrames), Box<dyn Error>> {
    let project = load_project_file(config)?;
    let trace = load_trace_file(input)?;
    let encoded = match project.pipeline()? {
        Some(pipeline) => encode_trace(&pipeline, trace.signal, trace.time)?,
        None => KeyFrames::new(trace.signal, trace.time)?,
    };
    Ok((project, encoded))
}

fn write_or_print(output: Option<&Path>, json: String, what: &str) -> CommandResult {
    match output {
        Some(path) => {
            fs::write(path, json)?;
            print_info(&format!("Wrote {what} to {}", path.display()));
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn handle_encode(config: &Path, input: &Path, output: Option<&Path>) -> CommandResult {
    let (_, encoded) = encoded_trace(config, input)?;
    let (signal, time) = encoded.into_parts();
    let json = serde_json::to_string_pretty(&TraceInput { signal, time })?;
    write_or_print(output, json, "encoded trace")
}

fn handle_phases(config: &Path, input: &Path, frame: i64) -> CommandResult {
    let (project, encoded) = encoded_trace(config, input)?;
    let phases = frame_phases(&project.plot, encoded.time(), frame);
    print_phases(frame, encoded.time(), &phases);
    Ok(())
}

fn handle_keyframes(config: &Path, input: &Path, output: Option<&Path>) -> CommandResult {
    let (project, encoded) = encoded_trace(config, input)?;
    let keyframes = transition_keyframes(&project.plot, encoded.signal(), encoded.time());
    let json = serde_json::to_string_pretty(&keyframes)?;
    write_or_print(output, json, &format!("{} keyframes", keyframes.len()))
}

fn handle_render(file: PathBuf, settings: RenderSettings) -> CommandResult {
    let mut registry = BackendRegistry::new();
    registry.register(Box::new(BlenderBackend::new(settings.executable.clone())));
    let ctx = registry.select("blender")?;
    let renderer = Renderer::new(&ctx, settings.workers)?;
    let render = BlenderRender::new(file, settings);
    let completed = renderer.render_portions(&render).into_result()?;
    print_info(&format!(
        "Rendered {} with {} worker(s)",
        render.file().display(),
        completed.len()
    ));
    Ok(())
}

fn recording_context() -> Result<BackendContext, Box<dyn Error>> {
    let mut registry = BackendRegistry::new();
    registry.register(Box::new(RecordingBackend::new()));
    Ok(registry.select("recording")?)
}

fn handle_session_command(command: SessionCommands) -> CommandResult {
    match command {
        SessionCommands::Save {
            config,
            input,
            output,
        } => {
            let project = load_project_file(&config)?;
            let mut ctx = recording_context()?;
            let mut scene = Scene::new();
            let plot = scene.create_plot(&mut ctx, project.plot, project.pipeline()?)?;
            for path in &input {
                let trace = load_trace_file(path)?;
                scene.add_trace(&mut ctx, plot, trace.signal, &time(trace.time))?;
            }
            scene.snapshot().save_to_file(&output)?;
            print_info(&format!(
                "Saved session with {} trace(s) to {}",
                input.len(),
                output.display()
            ));
        }
        SessionCommands::Show { snapshot } => {
            let snapshot = SessionSnapshot::load_from_file(&snapshot)?;
            let mut ctx = recording_context()?;
            let scene = Scene::restore(&mut ctx, &snapshot)?;
            print_scene_summary(&scene);
        }
    }
    Ok(())
}
