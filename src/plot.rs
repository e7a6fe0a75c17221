//! Scatter chart rendering: TouchZ over time, one color per head, to PNG.

use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, Timelike};
use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::aggregate::HeadSeries;
use crate::state::BUCKET_HOURS;

/// Failure while rendering or writing the chart image.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("No points to plot")]
    NoPoints,
    #[error("Failed to write chart {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;
const MARGIN_LEFT: u32 = 70;
const MARGIN_RIGHT: u32 = 40;
const MARGIN_TOP: u32 = 50;
const MARGIN_BOTTOM: u32 = 60;

const BACKGROUND: Rgba<u8> = Rgba([30, 30, 30, 255]);
const CHART_BACKGROUND: Rgba<u8> = Rgba([40, 40, 40, 255]);
const FRAME: Rgba<u8> = Rgba([120, 120, 120, 255]);
const GRID: Rgba<u8> = Rgba([60, 60, 60, 255]);

/// Render one scatter chart for all head series and save it as PNG.
///
/// X axis is time with grid lines at 6-hour boundaries, Y axis is TouchZ.
/// Each head draws in its assigned color; a legend swatch per head sits in
/// the top margin.
pub fn render_scatter_png(series: &[HeadSeries], path: &Path) -> Result<(), PlotError> {
    let image = render_scatter(series)?;
    image.save(path).map_err(|source| PlotError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn render_scatter(series: &[HeadSeries]) -> Result<RgbaImage, PlotError> {
    let points: Vec<(f64, f64)> = series
        .iter()
        .flat_map(|s| {
            s.points
                .iter()
                .map(|&(timestamp, touch_z)| (to_seconds(timestamp), touch_z))
        })
        .collect();
    if points.is_empty() {
        return Err(PlotError::NoPoints);
    }

    let min_time = points.iter().map(|&(t, _)| t).fold(f64::MAX, f64::min);
    let max_time = points.iter().map(|&(t, _)| t).fold(f64::MIN, f64::max);
    let min_z = points.iter().map(|&(_, z)| z).fold(f64::MAX, f64::min);
    let max_z = points.iter().map(|&(_, z)| z).fold(f64::MIN, f64::max);

    let time_span = if (max_time - min_time).abs() < f64::EPSILON {
        1.0
    } else {
        max_time - min_time
    };
    let z_span = if (max_z - min_z).abs() < 0.0001 {
        1.0
    } else {
        max_z - min_z
    };

    let mut imgbuf = RgbaImage::new(WIDTH, HEIGHT);
    for pixel in imgbuf.pixels_mut() {
        *pixel = BACKGROUND;
    }

    let chart_left = MARGIN_LEFT;
    let chart_right = WIDTH - MARGIN_RIGHT;
    let chart_top = MARGIN_TOP;
    let chart_bottom = HEIGHT - MARGIN_BOTTOM;
    let chart_width = (chart_right - chart_left) as f64;
    let chart_height = (chart_bottom - chart_top) as f64;

    for y in chart_top..chart_bottom {
        for x in chart_left..chart_right {
            imgbuf.put_pixel(x, y, CHART_BACKGROUND);
        }
    }

    // Vertical grid lines at 6-hour boundaries across the time range.
    let bucket_secs = (BUCKET_HOURS as i64 * 3600) as f64;
    let mut tick = (min_time / bucket_secs).ceil() * bucket_secs;
    while tick <= max_time {
        let x = chart_left + ((tick - min_time) / time_span * chart_width) as u32;
        if x > chart_left && x < chart_right {
            draw_line(&mut imgbuf, x, chart_top, x, chart_bottom, GRID);
            // Tick mark below the axis
            draw_line(&mut imgbuf, x, chart_bottom, x, chart_bottom + 6, FRAME);
        }
        tick += bucket_secs;
    }

    // Chart frame
    draw_line(&mut imgbuf, chart_left, chart_top, chart_right, chart_top, FRAME);
    draw_line(&mut imgbuf, chart_left, chart_bottom, chart_right, chart_bottom, FRAME);
    draw_line(&mut imgbuf, chart_left, chart_top, chart_left, chart_bottom, FRAME);
    draw_line(&mut imgbuf, chart_right, chart_top, chart_right, chart_bottom, FRAME);

    // Data points, one color per head
    for head_series in series {
        let color = Rgba([
            head_series.color[0],
            head_series.color[1],
            head_series.color[2],
            255,
        ]);
        for &(timestamp, touch_z) in &head_series.points {
            let t = to_seconds(timestamp);
            let x_ratio = (t - min_time) / time_span;
            let y_ratio = (touch_z - min_z) / z_span;
            let x = chart_left + (x_ratio * chart_width) as u32;
            let y = chart_bottom - (y_ratio * chart_height) as u32;
            draw_point(&mut imgbuf, x, y, color);
        }
    }

    // Legend swatches in the top margin, one per head
    let mut swatch_x = chart_left;
    let swatch_y = MARGIN_TOP / 2;
    for head_series in series {
        let color = Rgba([
            head_series.color[0],
            head_series.color[1],
            head_series.color[2],
            255,
        ]);
        for dy in 0..12u32 {
            for dx in 0..24u32 {
                let x = swatch_x + dx;
                let y = swatch_y.saturating_sub(6) + dy;
                if x < WIDTH && y < HEIGHT {
                    imgbuf.put_pixel(x, y, color);
                }
            }
        }
        swatch_x += 40;
    }

    Ok(imgbuf)
}

fn to_seconds(timestamp: NaiveDateTime) -> f64 {
    timestamp.and_utc().timestamp() as f64 + timestamp.nanosecond() as f64 * 1e-9
}

/// Draw a filled 3x3 square centered on (x, y), clamped to the image.
fn draw_point(img: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>) {
    let (width, height) = img.dimensions();
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            let px = x as i32 + dx;
            let py = y as i32 + dy;
            if px >= 0 && px < width as i32 && py >= 0 && py < height as i32 {
                img.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

/// Bresenham line, clipped to the image bounds.
fn draw_line(img: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
    let dx = (x1 as i32 - x0 as i32).abs();
    let dy = -(y1 as i32 - y0 as i32).abs();
    let sx: i32 = if x0 < x1 { 1 } else { -1 };
    let sy: i32 = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0 as i32;
    let mut y = y0 as i32;

    let (width, height) = img.dimensions();

    loop {
        if x >= 0 && x < width as i32 && y >= 0 && y < height as i32 {
            img.put_pixel(x as u32, y as u32, color);
        }

        if x == x1 as i32 && y == y1 as i32 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::head_color;
    use chrono::NaiveDateTime;

    fn series(head: u32, points: &[(&str, f64)]) -> HeadSeries {
        HeadSeries {
            head,
            color: head_color(head),
            points: points
                .iter()
                .map(|&(time, z)| {
                    (
                        NaiveDateTime::parse_from_str(time, "%Y/%m/%d %H:%M:%S").unwrap(),
                        z,
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_render_empty_series_is_no_points() {
        assert!(matches!(render_scatter(&[]), Err(PlotError::NoPoints)));
    }

    #[test]
    fn test_render_draws_head_colors() {
        let all = vec![
            series(1, &[("2024/01/15 08:00:00", 0.1), ("2024/01/15 20:00:00", 0.3)]),
            series(2, &[("2024/01/15 12:00:00", 0.2)]),
        ];
        let image = render_scatter(&all).unwrap();
        assert_eq!(image.dimensions(), (WIDTH, HEIGHT));

        let red = Rgba([224, 49, 49, 255]);
        let orange = Rgba([255, 146, 43, 255]);
        assert!(image.pixels().any(|p| *p == red));
        assert!(image.pixels().any(|p| *p == orange));
    }

    #[test]
    fn test_render_single_point_does_not_panic() {
        let all = vec![series(5, &[("2024/01/15 08:00:00", 0.5)])];
        let image = render_scatter(&all).unwrap();
        let fallback = head_color(5);
        let fallback = Rgba([fallback[0], fallback[1], fallback[2], 255]);
        assert!(image.pixels().any(|p| *p == fallback));
    }

    #[test]
    fn test_render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let all = vec![series(1, &[("2024/01/15 08:00:00", 0.1)])];
        render_scatter_png(&all, &path).unwrap();
        assert!(path.exists());
    }
}
