//! Minimal SVG bar charts and histograms

use std::fmt::Write as _;

const WIDTH: f64 = 480.0;
const HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 60.0;

const BAR_FILL: &str = "#1f77b4";

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn plot_width() -> f64 {
    WIDTH - MARGIN_LEFT - MARGIN_RIGHT
}

fn plot_height() -> f64 {
    HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
}

fn open_svg(out: &mut String, title: &str) {
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    );
    let _ = writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        out,
        r#"<text x="{}" y="24" text-anchor="middle" font-family="sans-serif" font-size="15">{}</text>"#,
        WIDTH / 2.0,
        escape(title)
    );
}

fn axes(out: &mut String, y_max: f64, y_label: &str, x_label: &str) {
    let x0 = MARGIN_LEFT;
    let y0 = MARGIN_TOP + plot_height();
    let _ = writeln!(
        out,
        r#"<line x1="{x0}" y1="{MARGIN_TOP}" x2="{x0}" y2="{y0}" stroke="black"/>"#
    );
    let _ = writeln!(
        out,
        r#"<line x1="{x0}" y1="{y0}" x2="{}" y2="{y0}" stroke="black"/>"#,
        WIDTH - MARGIN_RIGHT
    );
    for tick in 0..=4 {
        let value = y_max * tick as f64 / 4.0;
        let y = y0 - plot_height() * tick as f64 / 4.0;
        let _ = writeln!(
            out,
            r#"<text x="{}" y="{:.1}" text-anchor="end" font-family="sans-serif" font-size="10">{}</text>"#,
            x0 - 6.0,
            y + 3.0,
            tick_label(value)
        );
    }
    if !y_label.is_empty() {
        let _ = writeln!(
            out,
            r#"<text x="14" y="{:.1}" transform="rotate(-90 14 {:.1})" text-anchor="middle" font-family="sans-serif" font-size="11">{}</text>"#,
            MARGIN_TOP + plot_height() / 2.0,
            MARGIN_TOP + plot_height() / 2.0,
            escape(y_label)
        );
    }
    if !x_label.is_empty() {
        let _ = writeln!(
            out,
            r#"<text x="{:.1}" y="{}" text-anchor="middle" font-family="sans-serif" font-size="11">{}</text>"#,
            MARGIN_LEFT + plot_width() / 2.0,
            HEIGHT - 12.0,
            escape(x_label)
        );
    }
}

fn tick_label(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn rect(out: &mut String, x: f64, width: f64, value: f64, y_max: f64) {
    let h = if y_max > 0.0 {
        plot_height() * (value / y_max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let y = MARGIN_TOP + plot_height() - h;
    let _ = writeln!(
        out,
        r#"<rect x="{x:.1}" y="{y:.1}" width="{width:.1}" height="{h:.1}" fill="{BAR_FILL}"/>"#
    );
}

/// Axis ceiling a little above the data maximum
fn nice_max(max: f64) -> f64 {
    if max <= 0.0 {
        1.0
    } else {
        max * 1.1
    }
}

/// Labelled bars, one value each
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub y_label: String,
    pub bars: Vec<(String, f64)>,
    /// Fixed y-axis ceiling; derived from the data when `None`
    pub y_max: Option<f64>,
}

impl BarChart {
    pub fn new(title: &str, y_label: &str, bars: Vec<(String, f64)>) -> Self {
        Self {
            title: title.to_string(),
            y_label: y_label.to_string(),
            bars,
            y_max: None,
        }
    }

    pub fn with_y_max(mut self, y_max: f64) -> Self {
        self.y_max = Some(y_max);
        self
    }

    pub fn render(&self) -> String {
        let data_max = self.bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        let y_max = self.y_max.unwrap_or_else(|| nice_max(data_max));

        let mut out = String::new();
        open_svg(&mut out, &self.title);
        axes(&mut out, y_max, &self.y_label, "");

        let slot = plot_width() / self.bars.len().max(1) as f64;
        for (i, (label, value)) in self.bars.iter().enumerate() {
            let x = MARGIN_LEFT + slot * i as f64 + slot * 0.15;
            rect(&mut out, x, slot * 0.7, *value, y_max);
            let _ = writeln!(
                out,
                r#"<text x="{:.1}" y="{}" text-anchor="middle" font-family="sans-serif" font-size="11">{}</text>"#,
                x + slot * 0.35,
                MARGIN_TOP + plot_height() + 16.0,
                escape(label)
            );
        }
        out.push_str("</svg>\n");
        out
    }
}

/// Bin edges and counts of `values` over `bins` equal-width bins.
///
/// The last bin includes its upper edge. When every value is equal the range
/// is widened to ±0.5 around it.
pub fn histogram(values: &[f64], bins: usize) -> (Vec<f64>, Vec<usize>) {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return (Vec::new(), Vec::new());
    }
    let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for v in finite {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    (edges, counts)
}

/// Distribution of raw values
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub title: String,
    pub x_label: String,
    pub values: Vec<f64>,
    pub bins: usize,
}

impl Histogram {
    pub fn new(title: &str, x_label: &str, values: Vec<f64>, bins: usize) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            values,
            bins,
        }
    }

    pub fn render(&self) -> String {
        let (edges, counts) = histogram(&self.values, self.bins);
        let max_count = counts.iter().copied().max().unwrap_or(0) as f64;
        let y_max = nice_max(max_count).ceil();

        let mut out = String::new();
        open_svg(&mut out, &self.title);
        axes(&mut out, y_max, "count", &self.x_label);

        let slot = plot_width() / counts.len().max(1) as f64;
        for (i, &count) in counts.iter().enumerate() {
            let x = MARGIN_LEFT + slot * i as f64;
            rect(&mut out, x + 1.0, (slot - 2.0).max(1.0), count as f64, y_max);
        }
        if let (Some(first), Some(last)) = (edges.first(), edges.last()) {
            let y = MARGIN_TOP + plot_height() + 16.0;
            let _ = writeln!(
                out,
                r#"<text x="{MARGIN_LEFT}" y="{y}" text-anchor="middle" font-family="sans-serif" font-size="10">{}</text>"#,
                tick_label((first * 10.0).round() / 10.0)
            );
            let _ = writeln!(
                out,
                r#"<text x="{}" y="{y}" text-anchor="middle" font-family="sans-serif" font-size="10">{}</text>"#,
                WIDTH - MARGIN_RIGHT,
                tick_label((last * 10.0).round() / 10.0)
            );
        }
        out.push_str("</svg>\n");
        out
    }
}
