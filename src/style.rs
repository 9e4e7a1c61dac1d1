use plotters::style::RGBColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Blue,
    Yellow,
    Green,
    Black,
}

impl Color {
    pub fn rgb(self) -> RGBColor {
        match self {
            Color::Red => RGBColor(255, 0, 0),
            Color::Blue => RGBColor(0, 0, 255),
            Color::Yellow => RGBColor(191, 191, 0),
            Color::Green => RGBColor(0, 128, 0),
            Color::Black => RGBColor(0, 0, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dash {
    Solid,
    DashDot,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStyle {
    pub color: Color,
    pub dash: Dash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    None,
    Circle,
    TriangleDown,
    Square,
    Cross,
}

const fn line(color: Color, dash: Dash) -> LineStyle {
    LineStyle { color, dash }
}

pub const LINE_STYLES: [LineStyle; 15] = [
    line(Color::Red, Dash::Solid),
    line(Color::Blue, Dash::Solid),
    line(Color::Yellow, Dash::Solid),
    line(Color::Green, Dash::Solid),
    line(Color::Black, Dash::Solid),
    line(Color::Red, Dash::DashDot),
    line(Color::Blue, Dash::DashDot),
    line(Color::Yellow, Dash::DashDot),
    line(Color::Green, Dash::DashDot),
    line(Color::Black, Dash::DashDot),
    line(Color::Red, Dash::Dashed),
    line(Color::Blue, Dash::Dashed),
    line(Color::Yellow, Dash::Dashed),
    line(Color::Green, Dash::Dashed),
    line(Color::Black, Dash::Dashed),
];

pub const MARKERS: [Marker; 5] = [
    Marker::None,
    Marker::Circle,
    Marker::TriangleDown,
    Marker::Square,
    Marker::Cross,
];

/// Read-only style tables handed to a renderer.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    line_styles: &'static [LineStyle],
    markers: &'static [Marker],
}

impl Palette {
    pub fn standard() -> Self {
        Palette {
            line_styles: &LINE_STYLES,
            markers: &MARKERS,
        }
    }

    /// Both tables must be non-empty.
    pub fn new(line_styles: &'static [LineStyle], markers: &'static [Marker]) -> Option<Self> {
        if line_styles.is_empty() || markers.is_empty() {
            return None;
        }
        Some(Palette {
            line_styles,
            markers,
        })
    }

    /// Style of the series drawn at `position`. The line style cycles every series, the marker
    /// advances once per `markers.len()` series and wraps around the marker table.
    pub fn style_for(&self, position: usize) -> (LineStyle, Marker) {
        let line_style = self.line_styles[position % self.line_styles.len()];
        let marker = self.markers[(position / self.markers.len()) % self.markers.len()];
        (line_style, marker)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard()
    }
}
