//! Rendering of speedup comparison charts.
//!
//! A chart plots the observed speedup curve against the ideal linear reference line, annotates
//! every observed point with its speedup value, and is written to disk as a PNG sized for
//! 300 DPI output.

use std::fs::{self, File};
use std::path::Path;

use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;

use crate::{Error, Measurement, SpeedupPoint};

/// Output resolution, in dots per inch.
pub const DPI: u32 = 300;

/// Canvas width in pixels: a 10in-wide figure at [`DPI`].
pub const WIDTH: u32 = 10 * DPI;

/// Canvas height in pixels: a 6in-tall figure at [`DPI`].
pub const HEIGHT: u32 = 6 * DPI;

const TITLE: &str = "Wa-Tor Simulation Parallel Speedup";
const X_DESC: &str = "Number of Threads (Workers)";
const Y_DESC: &str = "Speedup Factor";
const SERIES_COLOR: RGBColor = RGBColor(0x00, 0x7a, 0xcc);

/// Render the observed speedup curve against the ideal linear reference and write the chart to
/// `output` as a PNG.
///
/// `points` must be the speedups derived from `measurements`, in the same order. The destination
/// is probed before any drawing happens, so an unwritable path fails with [`Error::Io`] without
/// touching the chart backend, and a failed render removes the file rather than leaving a
/// truncated image behind.
pub fn render(
    measurements: &[Measurement],
    points: &[SpeedupPoint],
    output: &Path,
) -> Result<(), Error> {
    if measurements.is_empty() {
        return Err(Error::EmptyDataset);
    }
    assert_eq!(measurements.len(), points.len(), "each measurement needs a speedup point");

    File::create(output).map_err(|source| Error::Io { path: output.into(), source })?;
    if let Err(e) = draw(measurements, points, output) {
        let _ = fs::remove_file(output);
        return Err(Error::Render(e.to_string()));
    }
    Ok(())
}

fn draw(
    measurements: &[Measurement],
    points: &[SpeedupPoint],
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let workers: Vec<f64> = measurements.iter().map(|m| f64::from(m.workers)).collect();
    let max_workers = workers.last().copied().unwrap_or(1.0);
    let max_speedup = points.iter().map(|p| p.speedup).fold(max_workers, f64::max);

    let root = BitMapBackend::new(output, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    // Tick marks land exactly on the measured worker counts, nowhere else.
    let x_range = (0.0..max_workers * 1.05).with_key_points(workers.clone());

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, ("sans-serif", 58).into_font())
        .margin(40)
        .x_label_area_size(140)
        .y_label_area_size(160)
        .build_cartesian_2d(x_range, 0.0..max_speedup * 1.1)?;

    chart
        .configure_mesh()
        .x_label_formatter(&|w| format!("{}", w.round() as u32))
        .x_desc(X_DESC)
        .y_desc(Y_DESC)
        .label_style(("sans-serif", 40))
        .axis_desc_style(("sans-serif", 50))
        .bold_line_style(&BLACK.mix(0.2))
        .light_line_style(&BLACK.mix(0.1))
        .draw()?;

    chart
        .draw_series(DashedLineSeries::new(
            workers.iter().map(|&w| (w, w)),
            24,
            16,
            BLACK.mix(0.5).stroke_width(4),
        ))?
        .label("Ideal Linear Speedup")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 60, y)], BLACK.mix(0.5).stroke_width(4))
        });

    let observed: Vec<(f64, f64)> =
        points.iter().map(|p| (f64::from(p.workers), p.speedup)).collect();
    chart
        .draw_series(LineSeries::new(observed.iter().copied(), SERIES_COLOR.stroke_width(8)))?
        .label("Actual Speedup")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 60, y)], SERIES_COLOR.stroke_width(8)));

    let annotation = TextStyle::from(("sans-serif", 42).into_font().style(FontStyle::Bold))
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(PointSeries::of_element(
        observed,
        16,
        SERIES_COLOR.filled(),
        &|coord, size, style| {
            EmptyElement::at(coord)
                + Circle::new((0, 0), size, style)
                + Text::new(format!("{:.2}x", coord.1), (0, -30), annotation.clone())
        },
    ))?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 44))
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;
    use crate::compute_speedups;

    #[test]
    fn renders_chart_file() {
        let measurements = measurements();
        let points = compute_speedups(&measurements).unwrap();
        let output = env::temp_dir().join(format!("speedup-full-{}.png", std::process::id()));

        render(&measurements, &points, &output).unwrap();

        let len = fs::metadata(&output).unwrap().len();
        fs::remove_file(&output).unwrap();
        assert!(len > 0);
    }

    #[test]
    fn renders_single_point_chart() {
        let measurements = vec![Measurement::workers_and_elapsed_secs(1, 32.83)];
        let points = compute_speedups(&measurements).unwrap();
        let output = env::temp_dir().join(format!("speedup-single-{}.png", std::process::id()));

        render(&measurements, &points, &output).unwrap();

        let len = fs::metadata(&output).unwrap().len();
        fs::remove_file(&output).unwrap();
        assert!(len > 0);
    }

    #[test]
    fn rejects_unwritable_output() {
        let measurements = measurements();
        let points = compute_speedups(&measurements).unwrap();
        let output = env::temp_dir()
            .join(format!("speedup-missing-dir-{}", std::process::id()))
            .join("out.png");

        let err = render(&measurements, &points, &output).unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn rejects_empty_dataset() {
        let output = env::temp_dir().join(format!("speedup-empty-{}.png", std::process::id()));

        let err = render(&[], &[], &output).unwrap_err();

        assert!(matches!(err, Error::EmptyDataset));
        assert!(!output.exists());
    }

    fn measurements() -> Vec<Measurement> {
        [(1, 32.83), (2, 15.95), (4, 9.56), (8, 6.31)]
            .iter()
            .map(|&(n, t)| Measurement::workers_and_elapsed_secs(n, t))
            .collect()
    }
}
