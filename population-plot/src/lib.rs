use anyhow::{anyhow, Result};
use log::{debug, info};
use plotters::prelude::*;
use std::path::Path;

/// Glyph used for each point of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// An upright `+`.
    Plus,
    /// A diagonal `x`.
    Cross,
}

impl MarkerStyle {
    /// Parses the single-character marker codes `+` and `x`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "+" => Some(MarkerStyle::Plus),
            "x" => Some(MarkerStyle::Cross),
            _ => None,
        }
    }
}

/// One labelled `(x, y)` series.
#[derive(Debug, Clone)]
pub struct PlotSeries {
    pub label: String,
    pub marker: MarkerStyle,
    pub points: Vec<(u32, u32)>,
}

/// A scatter chart of population trajectories.
#[derive(Debug, Clone)]
pub struct PopulationPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
    series: Vec<PlotSeries>,
}

// Series colours, in insertion order.
const SERIES_COLORS: &[RGBColor] = &[BLUE, RED, GREEN, MAGENTA, CYAN, BLACK];
const MARKER_SIZE: i32 = 4;

impl PopulationPlot {
    pub fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            width: 1024,
            height: 768,
            series: Vec::new(),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn add_series(&mut self, label: &str, marker: MarkerStyle, points: Vec<(u32, u32)>) {
        self.series.push(PlotSeries {
            label: label.to_string(),
            marker,
            points,
        });
    }

    pub fn series(&self) -> &[PlotSeries] {
        &self.series
    }

    /// Axis ranges covering every point, padded by one unit on x and 10% on y.
    pub fn axis_ranges(&self) -> (std::ops::Range<u32>, std::ops::Range<u32>) {
        let points = self.series.iter().flat_map(|s| s.points.iter());
        let (max_x, max_y) = points.fold((0, 0), |(mx, my), &(x, y)| (mx.max(x), my.max(y)));
        let y_top = max_y + max_y / 10 + 1;
        (0..max_x + 1, 0..y_top)
    }

    /// Renders the chart as a bitmap and writes it to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if self.series.is_empty() {
            anyhow::bail!("Refusing to plot '{}' with no series.", path.display());
        }
        let (x_range, y_range) = self.axis_ranges();
        debug!("Plot ranges: x={:?}, y={:?}", x_range, y_range);

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| anyhow!("Failed to clear plot area: {}", e))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 28))
            .margin(12)
            .x_label_area_size(44)
            .y_label_area_size(64)
            .build_cartesian_2d(x_range, y_range)
            .map_err(|e| anyhow!("Failed to build chart: {}", e))?;

        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .draw()
            .map_err(|e| anyhow!("Failed to draw mesh: {}", e))?;

        for (i, series) in self.series.iter().enumerate() {
            let color = SERIES_COLORS[i % SERIES_COLORS.len()];
            let style = ShapeStyle::from(&color).stroke_width(2);
            let s = MARKER_SIZE;

            let drawn = match series.marker {
                MarkerStyle::Plus => chart.draw_series(series.points.iter().map(move |&point| {
                    EmptyElement::at(point)
                        + PathElement::new(vec![(-s, 0), (s, 0)], style)
                        + PathElement::new(vec![(0, -s), (0, s)], style)
                })),
                MarkerStyle::Cross => chart.draw_series(
                    series
                        .points
                        .iter()
                        .map(move |&point| EmptyElement::at(point) + Cross::new((0, 0), s, style)),
                ),
            }
            .map_err(|e| anyhow!("Failed to draw series '{}': {}", series.label, e))?;

            let marker = series.marker;
            drawn.label(series.label.as_str()).legend(move |(x, y)| match marker {
                MarkerStyle::Plus => EmptyElement::at((x + 10, y))
                    + PathElement::new(vec![(-s, 0), (s, 0)], style)
                    + PathElement::new(vec![(0, -s), (0, s)], style),
                MarkerStyle::Cross => EmptyElement::at((x + 10, y))
                    + PathElement::new(vec![(-s, -s), (s, s)], style)
                    + PathElement::new(vec![(-s, s), (s, -s)], style),
            });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| anyhow!("Failed to draw legend: {}", e))?;

        root.present()
            .map_err(|e| anyhow!("Failed to write plot '{}': {}", path.display(), e))?;
        info!("Plot saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_codes() {
        assert_eq!(MarkerStyle::from_code("+"), Some(MarkerStyle::Plus));
        assert_eq!(MarkerStyle::from_code("x"), Some(MarkerStyle::Cross));
        assert_eq!(MarkerStyle::from_code("o"), None);
    }

    #[test]
    fn test_axis_ranges_cover_all_series() {
        let mut plot = PopulationPlot::new("Cell Population Growth", "Time", "Population");
        plot.add_series("Uncorrelated", MarkerStyle::Plus, vec![(1, 5), (2, 7), (3, 40)]);
        plot.add_series("Correlated", MarkerStyle::Cross, vec![(1, 5), (2, 100)]);
        let (x, y) = plot.axis_ranges();
        assert_eq!(x, 0..4);
        assert_eq!(y, 0..111);
        assert_eq!(plot.series().len(), 2);
    }

    #[test]
    fn test_save_without_series_fails() {
        let plot = PopulationPlot::new("Empty", "Time", "Population");
        let path = std::env::temp_dir().join("population_plot_empty.png");
        assert!(plot.save(&path).is_err());
    }
}
