use std::process;
use std::sync::Arc;

use clap::Parser;

use scalar_log::cli::{self, CliArgs, Commands, ACTIVITY_LOG};
use scalar_log::{Figure, LogError, Logger, Recorder, Renderer};

fn main() {
    let args = CliArgs::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<(), LogError> {
    // Activity trail (append-only) if the flag is set
    let logger = if args.log_activity {
        Logger::new(ACTIVITY_LOG).map(Arc::new).ok()
    } else {
        None
    };

    match &args.command {
        Commands::Record(record) => {
            let mut recorder = Recorder::new(&record.log).strict(record.strict);
            if let Some(logger) = logger {
                recorder = recorder.with_logger(logger);
            }
            recorder.record(&record.measurements(), record.iteration)?;
        }
        Commands::Plot(plot) => {
            let mut renderer = Renderer::new();
            if let Some(logger) = logger {
                renderer = renderer.with_logger(logger);
            }
            let mut figure = Figure::with_config(plot.figure_config());
            let series = renderer.render(&plot.log, &plot.render_options(), &mut figure)?;
            cli::write_series(&series, std::io::stdout())?;
        }
    }

    Ok(())
}
