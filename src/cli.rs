//! Command-line front end over the library. The library API is the contract; this module only
//! maps arguments onto [`Recorder`](crate::Recorder) and [`Renderer`](crate::Renderer) calls.

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::model::error::LogError;
use crate::model::measurements::Measurements;
use crate::renderer::{RenderOptions, SeriesSet};
use crate::surface::FigureConfig;

pub const ACTIVITY_LOG: &str = "scalar_log.log";

/// Record scalar measurements per iteration and plot them
#[derive(Parser, Debug)]
#[command(name = "scalar_log", version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        help = "Append activity lines to scalar_log.log in the working directory"
    )]
    pub log_activity: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Append one iteration of measurements to a log file")]
    Record(RecordArgs),

    #[command(about = "Plot a log file to an SVG figure and print the plotted series")]
    Plot(PlotArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    #[arg(value_name = "LOG", help = "Log file (truncated at iteration 0)")]
    pub log: PathBuf,

    #[arg(value_name = "ITERATION", help = "Zero-based iteration mark")]
    pub iteration: usize,

    #[arg(
        value_name = "NAME=VALUE",
        required = true,
        value_parser = parse_field,
        help = "Measurements, in column order"
    )]
    pub fields: Vec<(String, f64)>,

    #[arg(long, help = "Reject rows whose field names differ from the stored header")]
    pub strict: bool,
}

impl RecordArgs {
    pub fn measurements(&self) -> Measurements {
        self.fields
            .iter()
            .map(|(name, value)| (name.clone(), *value))
            .collect()
    }
}

#[derive(Args, Debug, Clone)]
pub struct PlotArgs {
    #[arg(value_name = "LOG", help = "Log file to read")]
    pub log: PathBuf,

    #[arg(value_name = "FIGURE", help = "SVG file to write")]
    pub figure: PathBuf,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Column positions to plot (takes precedence over --columns)"
    )]
    pub ids: Option<Vec<usize>>,

    #[arg(long, value_delimiter = ',', help = "Column names to plot")]
    pub columns: Option<Vec<String>>,

    #[arg(long, default_value_t = 5, help = "Smoothing window, 0 to disable")]
    pub smoothing: usize,

    #[arg(long)]
    pub xlabel: Option<String>,

    #[arg(long)]
    pub ylabel: Option<String>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(
        long,
        value_name = "WxH",
        default_value = "1024x768",
        value_parser = parse_size,
        help = "Figure size in pixels"
    )]
    pub size: (u32, u32),

    #[arg(long, help = "Compose the figure without writing it")]
    pub no_draw: bool,
}

impl PlotArgs {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            column_ids: self.ids.clone(),
            column_names: self.columns.clone(),
            smoothing_window: self.smoothing,
            x_label: self.xlabel.clone(),
            y_label: self.ylabel.clone(),
            title: self.title.clone(),
            draw: !self.no_draw,
        }
    }

    pub fn figure_config(&self) -> FigureConfig {
        let mut config = FigureConfig::new(&self.figure);
        config.size = self.size;
        config
    }
}

fn parse_field(raw: &str) -> Result<(String, f64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {}", raw))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("value of {} is not a number: {}", name, value))?;
    Ok((name.to_string(), value))
}

fn parse_size(raw: &str) -> Result<(u32, u32), String> {
    let parsed = raw
        .split_once('x')
        .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)));
    match parsed {
        Some((w, h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(format!("size must look like 1024x768, got {}", raw)),
    }
}

#[derive(Debug, Serialize)]
struct SeriesPoint<'a> {
    field: &'a str,
    iteration: usize,
    value: f64,
}

/// Writes rendered series as long-format CSV: one `field,iteration,value` row per point.
pub fn write_series<W: Write>(series: &SeriesSet, out: W) -> Result<(), LogError> {
    let mut writer = csv::Writer::from_writer(out);
    for s in series {
        for (iteration, &value) in s.values.iter().enumerate() {
            writer.serialize(SeriesPoint {
                field: &s.name,
                iteration,
                value,
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_record() {
        let args = CliArgs::try_parse_from([
            "scalar_log",
            "record",
            "log.csv",
            "3",
            "loss=0.5",
            "acc=1",
            "--strict",
        ])
        .unwrap();
        assert!(!args.log_activity);
        match args.command {
            Commands::Record(record) => {
                assert_eq!(record.log, PathBuf::from("log.csv"));
                assert_eq!(record.iteration, 3);
                assert!(record.strict);
                let measurements = record.measurements();
                assert_eq!(
                    measurements.names().collect::<Vec<_>>(),
                    vec!["loss", "acc"]
                );
                assert_eq!(measurements.values().collect::<Vec<_>>(), vec!["0.5", "1"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_record_rejects_bad_values() {
        let parse = |raw: &[&str]| {
            CliArgs::try_parse_from(["scalar_log", "record", "log.csv"].iter().chain(raw))
        };
        assert!(parse(&["-1", "a=1"]).is_err());
        assert!(parse(&["0", "a"]).is_err());
        assert!(parse(&["0", "a=x"]).is_err());
        assert!(parse(&["0"]).is_err());
    }

    #[test]
    fn test_parse_plot() {
        let args = CliArgs::try_parse_from([
            "scalar_log",
            "plot",
            "log.csv",
            "out.svg",
            "--columns",
            "loss,acc",
            "--smoothing",
            "0",
            "--size",
            "800x600",
            "--log-activity",
        ])
        .unwrap();
        assert!(args.log_activity);
        match args.command {
            Commands::Plot(plot) => {
                let figure = plot.figure_config();
                assert_eq!(figure.output, PathBuf::from("out.svg"));
                assert_eq!(figure.size, (800, 600));

                let options = plot.render_options();
                assert_eq!(plot.log, PathBuf::from("log.csv"));
                assert_eq!(
                    options.column_names,
                    Some(vec!["loss".to_string(), "acc".to_string()])
                );
                assert_eq!(options.column_ids, None);
                assert_eq!(options.smoothing_window, 0);
                assert!(options.draw);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_plot_defaults() {
        let args = CliArgs::try_parse_from(["scalar_log", "plot", "log.csv", "out.svg"]).unwrap();
        match args.command {
            Commands::Plot(plot) => {
                assert_eq!(plot.render_options(), RenderOptions::default());
                assert_eq!(plot.figure_config().size, (1024, 768));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_plot_errors() {
        let parse = |raw: &[&str]| CliArgs::try_parse_from(["scalar_log"].iter().chain(raw));
        assert!(parse(&["plot", "log.csv"]).is_err());
        assert!(parse(&["plot", "log.csv", "out.svg", "--ids", "a"]).is_err());
        assert!(parse(&["plot", "log.csv", "out.svg", "--size", "10"]).is_err());
        assert!(parse(&["plot", "log.csv", "out.svg", "--title"]).is_err());
        assert!(parse(&["draw"]).is_err());
    }

    #[test]
    fn test_write_series_long_format() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("log.csv");
        std::fs::write(&path, "a,b\n1.5,2.5\n3.5,4.25\n").unwrap();
        let mut figure = crate::surface::Figure::new(dir.path().join("fig.svg"));
        let options = RenderOptions::new().smoothing_window(0).draw(false);
        let series = crate::renderer::render(&path, &options, &mut figure).unwrap();

        let mut out = Vec::new();
        write_series(&series, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "field,iteration,value\na,0,1.5\na,1,3.5\nb,0,2.5\nb,1,4.25\n"
        );
    }
}
