use std::path::PathBuf;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::model::error::LogError;
use crate::style::{Dash, LineStyle, Marker};

/// Identifies a series drawn on a surface so a legend can refer to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesHandle(pub usize);

/// The drawing capabilities a renderer needs from a charting backend.
pub trait Surface {
    /// Adds a line whose x coordinates are the sample indices of `values`.
    fn draw_line(&mut self, values: &[f64], style: LineStyle, marker: Marker) -> SeriesHandle;
    fn legend(&mut self, handles: &[SeriesHandle], labels: &[String]);
    fn grid(&mut self);
    fn set_x_label(&mut self, label: &str);
    fn set_y_label(&mut self, label: &str);
    fn set_title(&mut self, title: &str);
    /// Renders everything composed so far.
    fn show(&mut self) -> Result<(), LogError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub values: Vec<f64>,
    pub style: LineStyle,
    pub marker: Marker,
    pub label: Option<String>,
}

/// One chart of a figure, as composed by calls on the surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Panel {
    pub lines: Vec<Line>,
    pub grid: bool,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FigureConfig {
    pub output: PathBuf,
    pub size: (u32, u32),
    pub rows: usize,
    pub cols: usize,
}

impl FigureConfig {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        FigureConfig {
            output: output.into(),
            size: (1024, 768),
            rows: 1,
            cols: 1,
        }
    }
}

/// A grid of panels rendered to an SVG file when shown.
pub struct Figure {
    config: FigureConfig,
    panels: Vec<Panel>,
    current: usize,
}

impl Figure {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self::with_config(FigureConfig::new(output))
    }

    pub fn grid(output: impl Into<PathBuf>, rows: usize, cols: usize) -> Self {
        let mut config = FigureConfig::new(output);
        config.rows = rows;
        config.cols = cols;
        Self::with_config(config)
    }

    pub fn with_config(mut config: FigureConfig) -> Self {
        config.rows = config.rows.max(1);
        config.cols = config.cols.max(1);
        let count = config.rows * config.cols;
        Figure {
            config,
            panels: vec![Panel::default(); count],
            current: 0,
        }
    }

    pub fn config(&self) -> &FigureConfig {
        &self.config
    }

    /// Directs subsequent drawing calls to the panel at `index` (row-major).
    pub fn select_panel(&mut self, index: usize) -> Result<(), LogError> {
        if index >= self.panels.len() {
            return Err(LogError::Render(format!(
                "panel {} does not exist in a {}x{} figure",
                index, self.config.rows, self.config.cols
            )));
        }
        self.current = index;
        Ok(())
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    fn panel(&mut self) -> &mut Panel {
        &mut self.panels[self.current]
    }

    fn draw_all(&self) -> Result<(), DrawingAreaErrorKind<std::io::Error>> {
        let root = SVGBackend::new(&self.config.output, self.config.size).into_drawing_area();
        root.fill(&WHITE)?;

        let areas = root.split_evenly((self.config.rows, self.config.cols));
        for (area, panel) in areas.iter().zip(&self.panels) {
            draw_panel(area, panel)?;
        }

        root.present()
    }
}

impl Surface for Figure {
    fn draw_line(&mut self, values: &[f64], style: LineStyle, marker: Marker) -> SeriesHandle {
        let panel = self.panel();
        panel.lines.push(Line {
            values: values.to_vec(),
            style,
            marker,
            label: None,
        });
        SeriesHandle(panel.lines.len() - 1)
    }

    fn legend(&mut self, handles: &[SeriesHandle], labels: &[String]) {
        let panel = self.panel();
        for (handle, label) in handles.iter().zip(labels) {
            if let Some(line) = panel.lines.get_mut(handle.0) {
                line.label = Some(label.clone());
            }
        }
    }

    fn grid(&mut self) {
        self.panel().grid = true;
    }

    fn set_x_label(&mut self, label: &str) {
        self.panel().x_label = Some(label.to_string());
    }

    fn set_y_label(&mut self, label: &str) {
        self.panel().y_label = Some(label.to_string());
    }

    fn set_title(&mut self, title: &str) {
        self.panel().title = Some(title.to_string());
    }

    fn show(&mut self) -> Result<(), LogError> {
        self.draw_all()
            .map_err(|e| LogError::Render(format!("{}: {}", self.config.output.display(), e)))?;

        for panel in &mut self.panels {
            *panel = Panel::default();
        }
        self.current = 0;
        Ok(())
    }
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (x_range, y_range) = panel_ranges(panel);
    let (y_lo, y_hi) = (y_range.start, y_range.end);

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40);
    if let Some(title) = &panel.title {
        builder.caption(title, ("sans-serif", 22));
    }
    let mut chart = builder.build_cartesian_2d(x_range, y_range)?;

    let mut mesh = chart.configure_mesh();
    if !panel.grid {
        mesh.disable_mesh();
    }
    if let Some(label) = &panel.x_label {
        mesh.x_desc(label.as_str());
    }
    if let Some(label) = &panel.y_label {
        mesh.y_desc(label.as_str());
    }
    mesh.draw()?;

    for line in &panel.lines {
        let points: Vec<(f64, f64)> = line
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, v)| (i as f64, v.clamp(y_lo, y_hi)))
            .collect();
        let shape = line.style.color.rgb().stroke_width(2);

        let anno = match line.style.dash {
            Dash::Solid => chart.draw_series(LineSeries::new(points.iter().copied(), shape))?,
            Dash::Dashed => {
                chart.draw_series(DashedLineSeries::new(points.iter().copied(), 12, 6, shape))?
            }
            Dash::DashDot => {
                chart.draw_series(DashedLineSeries::new(points.iter().copied(), 3, 4, shape))?
            }
        };
        if let Some(label) = &line.label {
            anno.label(label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], shape));
        }

        let fill = shape.filled();
        match line.marker {
            Marker::None => {}
            Marker::Circle => {
                chart.draw_series(points.iter().map(|&p| Circle::new(p, 3, fill)))?;
            }
            Marker::TriangleDown => {
                chart.draw_series(points.iter().map(|&p| {
                    EmptyElement::at(p) + Polygon::new(vec![(-4, -3), (4, -3), (0, 4)], fill)
                }))?;
            }
            Marker::Square => {
                chart.draw_series(
                    points
                        .iter()
                        .map(|&p| EmptyElement::at(p) + Rectangle::new([(-3, -3), (3, 3)], fill)),
                )?;
            }
            Marker::Cross => {
                chart.draw_series(points.iter().map(|&p| Cross::new(p, 4, shape)))?;
            }
        }
    }

    if panel.lines.iter().any(|line| line.label.is_some()) {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    Ok(())
}

/// Largest magnitude an axis bound may take; the chart mesh still needs a finite span.
const AXIS_LIMIT: f64 = f64::MAX / 4.0;

/// Axis ranges covering every finite value in the panel.
fn panel_ranges(panel: &Panel) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let longest = panel.lines.iter().map(|l| l.values.len()).max().unwrap_or(0);
    let x_max = (longest.saturating_sub(1) as f64).max(1.0);

    let finite = panel
        .lines
        .iter()
        .flat_map(|l| l.values.iter().copied())
        .filter(|v| v.is_finite());
    let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if lo > hi {
        return (0.0..x_max, 0.0..1.0);
    }

    // scale before subtracting so the span itself never overflows
    let pad = if lo == hi {
        if lo == 0.0 {
            1.0
        } else {
            lo.abs().min(AXIS_LIMIT) * 0.1
        }
    } else {
        hi * 0.05 - lo * 0.05
    };
    let lo = (lo - pad).clamp(-AXIS_LIMIT, AXIS_LIMIT);
    let hi = (hi + pad).clamp(-AXIS_LIMIT, AXIS_LIMIT);

    if lo < hi {
        (0.0..x_max, lo..hi)
    } else {
        (0.0..x_max, hi - hi.abs().max(1.0) * 0.1..hi)
    }
}
