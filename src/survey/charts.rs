//! SVG charts of the group statistics: histogram grids, grouped bar charts and pies.
//!
//! Charts are presentation only. Nothing computed here flows back into the report.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use plotters::prelude::*;

use crate::survey::*;

type DrawResult = Result<(), Box<dyn std::error::Error>>;

/// The default colors, one per series, in order.
const SERIES_COLORS: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

pub fn series_color(idx: usize) -> RGBColor {
    SERIES_COLORS[idx % SERIES_COLORS.len()]
}

/// Parses `#RRGGBB`. Anything else is drawn in the fallback gray.
pub fn parse_hex_color(s: &str) -> RGBColor {
    let hex = s.trim_start_matches('#');
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
    };
    match (hex.len(), channel(0), channel(2), channel(4)) {
        (6, Some(r), Some(g), Some(b)) => RGBColor(r, g, b),
        _ => RGBColor(0xcc, 0xcc, 0xcc),
    }
}

/// A file name for a chart title: lowercase ascii letters and digits separated by dashes.
pub fn slugify(title: &str) -> String {
    let mut res = String::new();
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            res.push(c.to_ascii_lowercase());
        } else if !res.is_empty() && !res.ends_with('-') {
            res.push('-');
        }
    }
    res.trim_end_matches('-').to_string()
}

/// The angular extent of each pie slice, in degrees. The first slice starts at
/// the top and slices go counterclockwise. Empty slices have no extent.
pub fn pie_angles(counts: &[usize]) -> Vec<(f64, f64)> {
    let total: usize = counts.iter().sum();
    let mut start = 90.0;
    counts
        .iter()
        .map(|c| {
            let span = if total == 0 {
                0.0
            } else {
                360.0 * (*c as f64) / (total as f64)
            };
            let res = (start, start + span);
            start += span;
            res
        })
        .collect()
}

/// One histogram of a grid.
#[derive(Debug, Clone)]
pub struct HistogramPanel {
    pub title: String,
    pub bins: [u64; stats::HISTOGRAM_BINS],
    pub color: RGBColor,
}

/// One series of a grouped bar chart. Each bar may have its own color.
#[derive(Debug, Clone)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<usize>,
    pub colors: Vec<RGBColor>,
}

impl BarSeries {
    /// A series drawn in a single color.
    pub fn plain(name: &str, values: Vec<usize>, color: RGBColor) -> BarSeries {
        let colors = vec![color; values.len()];
        BarSeries {
            name: name.to_string(),
            values,
            colors,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub color: RGBColor,
}

/// The kinds of charts. Each kind has its own file name prefix.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ChartKind {
    Histograms,
    Bars,
    Pie,
}

impl ChartKind {
    fn prefix(&self) -> &'static str {
        match self {
            ChartKind::Histograms => "histograms",
            ChartKind::Bars => "bars",
            ChartKind::Pie => "pie",
        }
    }
}

/// Where the charts go. A disabled sink draws nothing.
///
/// Files are named `{command}-{kind}-{title slug}.svg`.
#[derive(Debug, Clone)]
pub struct ChartSink {
    dir: Option<PathBuf>,
    command: String,
}

impl ChartSink {
    pub fn disabled() -> ChartSink {
        ChartSink {
            dir: None,
            command: String::new(),
        }
    }

    pub fn in_directory(dir: &str, command: &str) -> ChartSink {
        ChartSink {
            dir: Some(PathBuf::from(dir)),
            command: command.to_string(),
        }
    }

    /// The file name of a chart.
    pub fn file_name(&self, kind: ChartKind, title: &str) -> String {
        let name = format!("{} {} {}", self.command, kind.prefix(), title);
        format!("{}.svg", slugify(&name))
    }

    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    fn target(&self, kind: ChartKind, title: &str) -> SurveyResult<Option<PathBuf>> {
        match &self.dir {
            None => Ok(None),
            Some(dir) => {
                fs::create_dir_all(dir).context(WritingFileSnafu {
                    path: dir.display().to_string(),
                })?;
                Ok(Some(dir.join(self.file_name(kind, title))))
            }
        }
    }

    fn render<F>(&self, kind: ChartKind, title: &str, draw: F) -> SurveyResult<Option<PathBuf>>
    where
        F: FnOnce(&Path) -> DrawResult,
    {
        let path = match self.target(kind, title)? {
            Some(p) => p,
            None => return Ok(None),
        };
        draw(&path).map_err(|e| SurveyError::Drawing {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        info!("render: chart {:?} written to {}", title, path.display());
        Ok(Some(path))
    }

    /// A grid of histograms over the wordsum scale, `columns` panels per row.
    pub fn histogram_grid(
        &self,
        title: &str,
        panels: &[HistogramPanel],
        columns: usize,
    ) -> SurveyResult<Option<PathBuf>> {
        if panels.is_empty() {
            debug!("histogram_grid: nothing to draw for {}", title);
            return Ok(None);
        }
        self.render(ChartKind::Histograms, title, |p| {
            draw_histogram_grid(p, title, panels, columns)
        })
    }

    /// Bars grouped by category, one bar per series in each group.
    pub fn grouped_bars(
        &self,
        title: &str,
        y_desc: &str,
        categories: &[String],
        series: &[BarSeries],
    ) -> SurveyResult<Option<PathBuf>> {
        if categories.is_empty() || series.is_empty() {
            debug!("grouped_bars: nothing to draw for {}", title);
            return Ok(None);
        }
        self.render(ChartKind::Bars, title, |p| {
            draw_grouped_bars(p, title, y_desc, categories, series)
        })
    }

    /// A pie of the counts, or the text "No exceeders" when they are all zero.
    pub fn pie(&self, title: &str, slices: &[PieSlice]) -> SurveyResult<Option<PathBuf>> {
        self.render(ChartKind::Pie, title, |p| draw_pie(p, title, slices))
    }
}

fn draw_histogram_grid(
    path: &Path,
    title: &str,
    panels: &[HistogramPanel],
    columns: usize,
) -> DrawResult {
    let columns = columns.max(1).min(panels.len());
    let rows = (panels.len() + columns - 1) / columns;
    let size = (400 * columns as u32, 300 * rows as u32 + 50);
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, ("sans-serif", 24))?;
    // Shared y axis, as in a grid of small multiples.
    let y_max = panels
        .iter()
        .flat_map(|p| p.bins.iter())
        .cloned()
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    for (area, panel) in root.split_evenly((rows, columns)).iter().zip(panels) {
        let mut chart = ChartBuilder::on(area)
            .caption(&panel.title, ("sans-serif", 16))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(40)
            .build_cartesian_2d(1f64..10f64, 0f64..(y_max * 1.05))?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(10)
            .x_label_formatter(&|x| format!("{:.0}", x))
            .x_desc("wordsum")
            .y_desc("count")
            .draw()?;
        chart.draw_series(panel.bins.iter().enumerate().map(|(i, c)| {
            let x0 = 1.0 + i as f64;
            Rectangle::new([(x0, 0.0), (x0 + 1.0, *c as f64)], panel.color.filled())
        }))?;
        chart.draw_series(panel.bins.iter().enumerate().map(|(i, c)| {
            let x0 = 1.0 + i as f64;
            Rectangle::new([(x0, 0.0), (x0 + 1.0, *c as f64)], BLACK.stroke_width(1))
        }))?;
    }
    root.present()?;
    Ok(())
}

fn draw_grouped_bars(
    path: &Path,
    title: &str,
    y_desc: &str,
    categories: &[String],
    series: &[BarSeries],
) -> DrawResult {
    let n = categories.len();
    let width = (120 * n as u32).max(600);
    let root = SVGBackend::new(path, (width, 450)).into_drawing_area();
    root.fill(&WHITE)?;
    let y_max = series
        .iter()
        .flat_map(|s| s.values.iter())
        .cloned()
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..(y_max * 1.1))?;

    let category_label = |x: &f64| {
        let idx = x.round();
        if (x - idx).abs() < 1e-6 && idx >= 0.0 && (idx as usize) < n {
            categories[idx as usize].clone()
        } else {
            String::new()
        }
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&category_label)
        .y_desc(y_desc)
        .draw()?;

    let group_width = 0.7;
    let bar_width = group_width / series.len() as f64;
    for (s_idx, s) in series.iter().enumerate() {
        let offset = -group_width / 2.0 + bar_width * s_idx as f64;
        let legend_color = s.colors.first().cloned().unwrap_or_else(|| series_color(s_idx));
        chart
            .draw_series(s.values.iter().enumerate().map(|(i, v)| {
                let x0 = i as f64 + offset;
                let color = s.colors.get(i).cloned().unwrap_or(legend_color);
                Rectangle::new([(x0, 0.0), (x0 + bar_width, *v as f64)], color.filled())
            }))?
            .label(s.name.as_str())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], legend_color.filled())
            });
    }
    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .draw()?;
    root.present()?;
    Ok(())
}

fn draw_pie(path: &Path, title: &str, slices: &[PieSlice]) -> DrawResult {
    let (w, h) = (640u32, 400u32);
    let root = SVGBackend::new(path, (w, h)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, ("sans-serif", 22))?;
    let (aw, ah) = root.dim_in_pixel();
    let (cx, cy) = (aw as f64 / 2.0, ah as f64 / 2.0);

    let counts: Vec<usize> = slices.iter().map(|s| s.count).collect();
    let total: usize = counts.iter().sum();
    if total == 0 {
        root.draw(&Text::new(
            "No exceeders",
            (cx as i32 - 55, cy as i32 - 10),
            ("sans-serif", 20).into_font(),
        ))?;
        root.present()?;
        return Ok(());
    }

    let radius = (ah as f64 / 2.0 - 40.0).max(20.0);
    let point = |angle: f64, r: f64| {
        let a = angle.to_radians();
        ((cx + r * a.cos()) as i32, (cy - r * a.sin()) as i32)
    };
    for (slice, (a0, a1)) in slices.iter().zip(pie_angles(&counts)) {
        if slice.count == 0 {
            continue;
        }
        let steps = ((a1 - a0) / 2.0).ceil().max(1.0) as usize;
        let mut points = vec![(cx as i32, cy as i32)];
        for k in 0..=steps {
            points.push(point(a0 + (a1 - a0) * k as f64 / steps as f64, radius));
        }
        root.draw(&Polygon::new(points, slice.color.filled()))?;

        let mid = (a0 + a1) / 2.0;
        let share = 100.0 * slice.count as f64 / total as f64;
        let (lx, ly) = point(mid, radius * 1.12);
        root.draw(&Text::new(
            slice.label.clone(),
            (lx - 10, ly - 6),
            ("sans-serif", 14).into_font(),
        ))?;
        let (px, py) = point(mid, radius * 0.6);
        root.draw(&Text::new(
            format!("{:.1}%", share),
            (px - 16, py - 6),
            ("sans-serif", 13).into_font(),
        ))?;
    }
    root.present()?;
    Ok(())
}
