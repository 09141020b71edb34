//! Vocabulary-over-time trend chart, drawn as inline SVG.
//!
//! The chart holds no state between renders; every call builds the whole
//! SVG from the series it is given.

use crate::dates::short_date;
use crate::models::{DailyCount, Theme};
use chrono::NaiveDate;
use maud::{Markup, html};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 280.0;
const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 52.0;
const MAX_TICKS: u64 = 5;
const MAX_X_LABELS: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub date: NaiveDate,
    pub count: u64,
}

struct Palette {
    grid: &'static str,
    ticks: &'static str,
    title: &'static str,
    line: &'static str,
    fill: &'static str,
}

fn palette(theme: Theme) -> Palette {
    let (grid, ticks, title) = match theme {
        Theme::Light => ("rgba(0, 0, 0, 0.1)", "#666", "#333"),
        Theme::Dark => ("rgba(255, 255, 255, 0.1)", "#e0e0e0", "#e0e0e0"),
        Theme::Desert => ("rgba(122, 92, 58, 0.18)", "#7a5c3a", "#5a3e1b"),
    };
    Palette {
        grid,
        ticks,
        title,
        line: "rgba(52, 152, 219, 1)",
        fill: "rgba(52, 152, 219, 0.2)",
    }
}

fn plot_width() -> f64 {
    WIDTH - MARGIN_LEFT - MARGIN_RIGHT
}

fn plot_height() -> f64 {
    HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
}

fn baseline() -> f64 {
    MARGIN_TOP + plot_height()
}

/// Tick step and the top of the y axis. The axis always starts at zero.
fn y_axis(series: &[DailyCount]) -> (u64, u64) {
    let max = series.iter().map(|point| point.count).max().unwrap_or(0).max(1);
    let step = max.div_ceil(MAX_TICKS).max(1);
    (step, max.div_ceil(step) * step)
}

/// Maps the series onto the drawing area, left to right in the given order.
pub fn plot_points(series: &[DailyCount]) -> Vec<ChartPoint> {
    let (_, top) = y_axis(series);
    let last = series.len().saturating_sub(1);
    series
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let x = if last == 0 {
                MARGIN_LEFT + plot_width() / 2.0
            } else {
                MARGIN_LEFT + plot_width() * index as f64 / last as f64
            };
            let y = baseline() - plot_height() * point.count as f64 / top as f64;
            ChartPoint {
                x,
                y,
                date: point.date,
                count: point.count,
            }
        })
        .collect()
}

fn coord(value: f64) -> String {
    format!("{value:.1}")
}

pub fn render_trend_chart(series: &[DailyCount], theme: Theme) -> Markup {
    if series.is_empty() {
        return html! {
            p.chart-empty { "No vocabulary recorded yet." }
        };
    }

    let colors = palette(theme);
    let points = plot_points(series);
    let (step, top) = y_axis(series);
    let ticks: Vec<u64> = (0..=top / step).map(|i| i * step).collect();
    let label_every = points.len().div_ceil(MAX_X_LABELS).max(1);

    let line: Vec<String> = points
        .iter()
        .map(|p| format!("{},{}", coord(p.x), coord(p.y)))
        .collect();
    let line = line.join(" ");
    let area = match (points.first(), points.last()) {
        (Some(first), Some(last)) => format!(
            "{},{} {} {},{}",
            coord(first.x),
            coord(baseline()),
            line,
            coord(last.x),
            coord(baseline())
        ),
        _ => String::new(),
    };

    html! {
        svg.trend-chart xmlns="http://www.w3.org/2000/svg"
            viewBox=(format!("0 0 {WIDTH} {HEIGHT}"))
            role="img" aria-label="Vocabulary Learning Progress" {
            text x=(coord(WIDTH / 2.0)) y="22" text-anchor="middle" font-size="16"
                font-weight="600" fill=(colors.title) { "Vocabulary Learning Progress" }

            @for tick in &ticks {
                @let y = baseline() - plot_height() * *tick as f64 / top as f64;
                line x1=(coord(MARGIN_LEFT)) x2=(coord(WIDTH - MARGIN_RIGHT))
                    y1=(coord(y)) y2=(coord(y)) stroke=(colors.grid) {}
                text x=(coord(MARGIN_LEFT - 8.0)) y=(coord(y + 4.0)) text-anchor="end"
                    font-size="11" fill=(colors.ticks) { (tick) }
            }

            @for (index, point) in points.iter().enumerate() {
                line x1=(coord(point.x)) x2=(coord(point.x)) y1=(coord(MARGIN_TOP))
                    y2=(coord(baseline())) stroke=(colors.grid) {}
                @if index % label_every == 0 {
                    text x=(coord(point.x)) y=(coord(baseline() + 18.0)) text-anchor="middle"
                        font-size="11" fill=(colors.ticks) { (short_date(point.date)) }
                }
            }

            polygon points=(area) fill=(colors.fill) stroke="none" {}
            polyline points=(line) fill="none" stroke=(colors.line) stroke-width="2" {}
            @for point in &points {
                circle cx=(coord(point.x)) cy=(coord(point.y)) r="4" fill=(colors.line) {
                    title { "Words: " (point.count) }
                }
            }

            text x=(coord(MARGIN_LEFT + plot_width() / 2.0)) y=(coord(HEIGHT - 8.0))
                text-anchor="middle" font-size="12" fill=(colors.ticks) { "Date" }
            text x="14" y=(coord(MARGIN_TOP + plot_height() / 2.0)) text-anchor="middle"
                font-size="12" fill=(colors.ticks)
                transform=(format!("rotate(-90 14 {})", coord(MARGIN_TOP + plot_height() / 2.0))) {
                "Number of Words"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(d: u32, count: u64) -> DailyCount {
        DailyCount {
            date: NaiveDate::from_ymd_opt(2025, 7, d).unwrap(),
            count,
        }
    }

    #[test]
    fn single_point_sits_in_the_middle() {
        let points = plot_points(&[point(20, 3)]);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].x, MARGIN_LEFT + plot_width() / 2.0);
    }

    #[test]
    fn axis_starts_at_zero_and_covers_the_maximum() {
        let points = plot_points(&[point(18, 0), point(19, 5), point(20, 2)]);
        assert_eq!(points[0].y, baseline());
        assert_eq!(points[1].y, MARGIN_TOP);
        assert!(points[2].y > points[1].y && points[2].y < points[0].y);
        assert_eq!(points[0].x, MARGIN_LEFT);
        assert_eq!(points[2].x, WIDTH - MARGIN_RIGHT);
    }

    #[test]
    fn y_axis_uses_round_steps() {
        assert_eq!(y_axis(&[point(20, 0)]), (1, 1));
        assert_eq!(y_axis(&[point(20, 3)]), (1, 3));
        assert_eq!(y_axis(&[point(20, 12)]), (3, 12));
        assert_eq!(y_axis(&[point(20, 13)]), (3, 15));
    }

    #[test]
    fn rendered_chart_has_labels_and_tooltips() {
        let svg = render_trend_chart(&[point(19, 2), point(20, 3)], Theme::Light).into_string();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Jul 19"));
        assert!(svg.contains("Jul 20"));
        assert!(svg.contains("Words: 3"));
        assert!(svg.contains("Number of Words"));
        assert!(svg.contains("#666"));
    }

    #[test]
    fn palette_follows_theme() {
        let svg = render_trend_chart(&[point(20, 1)], Theme::Dark).into_string();
        assert!(svg.contains("#e0e0e0"));
        assert!(!svg.contains("#666"));
    }

    #[test]
    fn empty_series_renders_placeholder() {
        let html = render_trend_chart(&[], Theme::Light).into_string();
        assert!(html.contains("No vocabulary recorded yet."));
        assert!(!html.contains("<svg"));
    }
}
