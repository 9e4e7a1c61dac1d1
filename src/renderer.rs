use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::logger::Logger;
use crate::model::error::LogError;
use crate::model::table::SeriesTable;
use crate::smoother::smooth;
use crate::style::Palette;
use crate::surface::Surface;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub column_ids: Option<Vec<usize>>,
    pub column_names: Option<Vec<String>>,
    pub smoothing_window: usize,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub title: Option<String>,
    pub draw: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            column_ids: None,
            column_names: None,
            smoothing_window: 5,
            x_label: None,
            y_label: None,
            title: None,
            draw: true,
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column_ids(mut self, ids: impl IntoIterator<Item = usize>) -> Self {
        self.column_ids = Some(ids.into_iter().collect());
        self
    }

    pub fn column_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.column_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn smoothing_window(mut self, window: usize) -> Self {
        self.smoothing_window = window;
        self
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn draw(mut self, draw: bool) -> Self {
        self.draw = draw;
        self
    }
}

/// Which columns of a log to render. Positions take precedence over names.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<'a> {
    All,
    Ids(&'a [usize]),
    Names(&'a [String]),
}

impl<'a> Selection<'a> {
    pub fn from_options(options: &'a RenderOptions) -> Self {
        match (&options.column_ids, &options.column_names) {
            (Some(ids), _) => Selection::Ids(ids),
            (None, Some(names)) => Selection::Names(names),
            (None, None) => Selection::All,
        }
    }

    /// Column positions to render, in drawing order.
    ///
    /// Ids keep the caller's order and must all exist. Names follow header order and names
    /// missing from the header are ignored.
    pub fn resolve(&self, header: &[String]) -> Result<Vec<usize>, LogError> {
        match self {
            Selection::All => Ok((0..header.len()).collect()),
            Selection::Ids(ids) => {
                if let Some(&id) = ids.iter().find(|&&id| id >= header.len()) {
                    return Err(LogError::ColumnOutOfRange {
                        id,
                        width: header.len(),
                    });
                }
                Ok(ids.to_vec())
            }
            Selection::Names(names) => Ok(header
                .iter()
                .enumerate()
                .filter(|(_, name)| names.contains(name))
                .map(|(i, _)| i)
                .collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

/// Rendered series in selection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSet {
    series: Vec<Series>,
}

impl SeriesSet {
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.values.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Series> {
        self.series.iter()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Keyed by name; a name selected twice keeps its last series.
    pub fn into_map(self) -> BTreeMap<String, Vec<f64>> {
        self.series.into_iter().map(|s| (s.name, s.values)).collect()
    }
}

impl<'a> IntoIterator for &'a SeriesSet {
    type Item = &'a Series;
    type IntoIter = std::slice::Iter<'a, Series>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}

/// Loads a log file, smooths the selected columns and draws them on a surface.
pub struct Renderer {
    palette: Palette,
    logger: Option<Arc<Logger>>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            palette: Palette::standard(),
            logger: None,
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn render<S: Surface>(
        &self,
        path: impl AsRef<Path>,
        options: &RenderOptions,
        surface: &mut S,
    ) -> Result<SeriesSet, LogError> {
        let path = path.as_ref();
        let table = SeriesTable::load(path)?;
        let columns = Selection::from_options(options).resolve(&table.names)?;

        let mut series = Vec::with_capacity(columns.len());
        for index in columns {
            let mut values = table.column(index)?;
            if options.smoothing_window > 0 {
                values = smooth(&values, options.smoothing_window);
            }
            series.push(Series {
                name: table.names[index].clone(),
                values,
            });
        }

        let mut handles = Vec::with_capacity(series.len());
        for (position, s) in series.iter().enumerate() {
            let (line_style, marker) = self.palette.style_for(position);
            handles.push(surface.draw_line(&s.values, line_style, marker));
        }
        let labels: Vec<String> = series.iter().map(|s| s.name.clone()).collect();
        surface.legend(&handles, &labels);
        surface.grid();

        if let Some(label) = &options.x_label {
            surface.set_x_label(label);
        }
        if let Some(label) = &options.y_label {
            surface.set_y_label(label);
        }
        if let Some(title) = &options.title {
            surface.set_title(title);
        }

        if options.draw {
            surface.show()?;
        }

        self.log(&format!(
            "{}: {} iterations, rendered [{}], smoothing window {}",
            path.display(),
            table.len(),
            labels.join(","),
            options.smoothing_window
        ));

        Ok(SeriesSet { series })
    }

    fn log(&self, message: &str) {
        if let Some(logger) = &self.logger {
            logger.log("renderer", message);
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the log at `path` with the standard palette.
pub fn render<S: Surface>(
    path: impl AsRef<Path>,
    options: &RenderOptions,
    surface: &mut S,
) -> Result<SeriesSet, LogError> {
    Renderer::new().render(path, options, surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{LineStyle, Marker};
    use crate::surface::SeriesHandle;
    use std::fs;
    use tempfile::TempDir;

    /// Surface that only remembers what it was asked to do.
    #[derive(Default)]
    struct Capture {
        lines: Vec<(Vec<f64>, LineStyle, Marker)>,
        labels: Vec<String>,
        grid: bool,
        title: Option<String>,
        x_label: Option<String>,
        y_label: Option<String>,
        shown: usize,
    }

    impl Surface for Capture {
        fn draw_line(&mut self, values: &[f64], style: LineStyle, marker: Marker) -> SeriesHandle {
            self.lines.push((values.to_vec(), style, marker));
            SeriesHandle(self.lines.len() - 1)
        }

        fn legend(&mut self, _handles: &[SeriesHandle], labels: &[String]) {
            self.labels = labels.to_vec();
        }

        fn grid(&mut self) {
            self.grid = true;
        }

        fn set_x_label(&mut self, label: &str) {
            self.x_label = Some(label.to_string());
        }

        fn set_y_label(&mut self, label: &str) {
            self.y_label = Some(label.to_string());
        }

        fn set_title(&mut self, title: &str) {
            self.title = Some(title.to_string());
        }

        fn show(&mut self) -> Result<(), LogError> {
            self.shown += 1;
            Ok(())
        }
    }

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn write_log(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("log.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_ids_take_precedence_over_names() {
        let options = RenderOptions::new().column_ids([0]).column_names(["b"]);
        let selection = Selection::from_options(&options);
        assert_eq!(selection.resolve(&header(&["a", "b"])).unwrap(), vec![0]);
    }

    #[test]
    fn test_names_follow_header_order() {
        let options = RenderOptions::new().column_names(["c", "a", "zzz"]);
        let selection = Selection::from_options(&options);
        assert_eq!(
            selection.resolve(&header(&["a", "b", "c"])).unwrap(),
            vec![0, 2]
        );
    }

    #[test]
    fn test_unmatched_names_select_nothing() {
        let options = RenderOptions::new().column_names(["nope"]);
        let selection = Selection::from_options(&options);
        assert!(selection.resolve(&header(&["a"])).unwrap().is_empty());
    }

    #[test]
    fn test_ids_keep_caller_order() {
        let options = RenderOptions::new().column_ids([2, 0]);
        let selection = Selection::from_options(&options);
        assert_eq!(
            selection.resolve(&header(&["a", "b", "c"])).unwrap(),
            vec![2, 0]
        );
    }

    #[test]
    fn test_out_of_range_id() {
        let options = RenderOptions::new().column_ids([5]);
        let selection = Selection::from_options(&options);
        assert!(matches!(
            selection.resolve(&header(&["a", "b"])),
            Err(LogError::ColumnOutOfRange { id: 5, width: 2 })
        ));
    }

    #[test]
    fn test_render_without_smoothing_or_draw() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "loss,acc\n0.9,0.1\n0.5,0.4\n0.2,0.8\n");
        let mut surface = Capture::default();

        let options = RenderOptions::new().smoothing_window(0).draw(false);
        let result = render(&path, &options, &mut surface).unwrap();

        assert_eq!(result.names().collect::<Vec<_>>(), vec!["loss", "acc"]);
        assert_eq!(result.get("loss").unwrap(), &[0.9, 0.5, 0.2]);
        assert_eq!(result.get("acc").unwrap(), &[0.1, 0.4, 0.8]);
        assert_eq!(surface.lines.len(), 2);
        assert_eq!(surface.labels, vec!["loss", "acc"]);
        assert!(surface.grid);
        assert_eq!(surface.shown, 0);
    }

    #[test]
    fn test_render_smooths_selected_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "a,b,c\n1,10,0\n2,20,0\n3,30,0\n4,40,0\n");
        let mut surface = Capture::default();

        let options = RenderOptions::new().column_names(["b"]).smoothing_window(3);
        let result = render(&path, &options, &mut surface).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.get("b").unwrap(), &[15.0, 20.0, 30.0, 35.0]);
        assert_eq!(surface.shown, 1);
    }

    #[test]
    fn test_render_applies_labels_and_styles() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "a,b\n1,2\n");
        let mut surface = Capture::default();

        let options = RenderOptions::new()
            .x_label("iteration")
            .title("training")
            .draw(false);
        render(&path, &options, &mut surface).unwrap();

        assert_eq!(surface.x_label.as_deref(), Some("iteration"));
        assert_eq!(surface.y_label, None);
        assert_eq!(surface.title.as_deref(), Some("training"));
        let palette = Palette::standard();
        assert_eq!(surface.lines[1].1, palette.style_for(1).0);
    }

    #[test]
    fn test_out_of_range_id_draws_nothing() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "a,b\n1,2\n");
        let mut surface = Capture::default();

        let options = RenderOptions::new().column_ids([5]);
        assert!(render(&path, &options, &mut surface).is_err());
        assert!(surface.lines.is_empty());
        assert_eq!(surface.shown, 0);
    }

    #[test]
    fn test_into_map() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "a,b\n1,2\n");
        let mut surface = Capture::default();

        let map = render(&path, &RenderOptions::new().draw(false), &mut surface)
            .unwrap()
            .into_map();
        assert_eq!(map["a"], vec![1.0]);
        assert_eq!(map["b"], vec![2.0]);
    }
}
