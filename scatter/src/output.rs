use env_logger::Target;
use log::LevelFilter;
use std::io::Write;
use scatter_core::{Phase, Scene};

pub fn print_info(message: &str) {
    println!("[Scatter][INFO] {message}");
}

pub fn print_error(message: &str) {
    eprintln!("[Scatter][ERROR]: {message}");
}

/// Library logs go to stderr so that JSON written to stdout stays parseable.
pub fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "[Scatter][{}] {}", record.level(), record.args()))
        .target(Target::Stderr)
        .try_init();
}

pub fn print_phases(frame: i64, times: &[f64], phases: &[Phase]) {
    print_info(&format!("Phases at frame {frame}:"));
    if phases.is_empty() {
        println!("\t(none)");
    }
    for (idx, (time, phase)) in times.iter().zip(phases).enumerate() {
        println!("{idx}\t{time}\t{}\t{phase:?}", phase.tag());
    }
}

pub fn print_scene_summary(scene: &Scene) {
    let plots: Vec<_> = scene.plots().collect();
    if plots.is_empty() {
        print_info("Session has no plots");
        return;
    }
    print_info("Session plots:");
    for plot in plots {
        let encoder = plot.encoder().map(|e| e.name()).unwrap_or("none");
        let window = &plot.config().window;
        println!(
            "plot {} - encoder {encoder}, frames {}..={}, {} trace(s)",
            plot.id(),
            window.f_start(),
            window.f_stop(),
            plot.traces().len()
        );
        for (idx, trace) in plot.traces().iter().enumerate() {
            println!(
                "\t[{idx}] {} samples, {} encoded, {} keyframes",
                trace.signal().len(),
                trace.encoded().len(),
                trace.keyframe_count()
            );
        }
    }
}
