use crate::error::Error;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use trial::Metric;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const FONT_FAMILY: &str = "sans-serif";

pub const X_DESC: &str = "log10(Size of list)";
pub const Y_DESC: &str = "Runtime in microseconds";

/*
 * DejaVu Sans, used unless --font names another file. See
 * assets/DejaVuSans.LICENSE.
 */
const BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
const BUNDLED_FONT_NAME: &str = "DejaVuSans.ttf (bundled)";

/// x coordinates for a size list.
pub fn log_sizes(sizes: &[u64]) -> Vec<f64> {
    sizes.iter().map(|&size| (size as f64).log10()).collect()
}

/// `(log10(size), value)` pairs in size order.
pub fn points(sizes: &[u64], values: &[f64]) -> Vec<(f64, f64)> {
    log_sizes(sizes)
        .into_iter()
        .zip(values.iter().copied())
        .collect()
}

fn padded(lo: f64, hi: f64) -> Range<f64> {
    if hi - lo < f64::EPSILON {
        return (lo - 0.5)..(hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

fn ranges(points: &[(f64, f64)]) -> (Range<f64>, Range<f64>) {
    let x_lo = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let x_hi = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let y_hi = points.iter().map(|p| p.1).fold(0.0, f64::max);
    let y_hi = if y_hi > 0.0 { y_hi * 1.1 } else { 1.0 };
    (padded(x_lo, x_hi), 0.0..y_hi)
}

/// Writes one `<Label>.png` line chart per metric into the output directory.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output_dir: PathBuf,
}

impl ChartRenderer {
    /// Registers `font`, or the bundled DejaVu Sans, for chart text.
    pub fn new(output_dir: impl Into<PathBuf>, font: Option<&Path>) -> Result<Self, Error> {
        load_font(font)?;
        Ok(Self {
            output_dir: output_dir.into(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn chart_path(&self, metric: Metric) -> PathBuf {
        self.output_dir.join(format!("{}.png", metric.label()))
    }

    /// Draws into a sibling temp file and renames it over `<Label>.png`, so a
    /// failed render never leaves a truncated chart behind.
    pub fn render(&self, metric: Metric, sizes: &[u64], values: &[f64]) -> Result<PathBuf, Error> {
        let path = self.chart_path(metric);
        let render_err = |reason: String| Error::ChartRender {
            chart: metric.label().to_string(),
            path: path.clone(),
            reason,
        };

        if sizes.len() != values.len() {
            return Err(render_err(format!(
                "{} sizes but {} values",
                sizes.len(),
                values.len()
            )));
        }
        if sizes.is_empty() {
            return Err(render_err("no points to plot".to_string()));
        }
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(render_err(format!(
                "value {} for size {} is not finite",
                values[idx], sizes[idx]
            )));
        }

        let partial = self
            .output_dir
            .join(format!(".{}.partial.png", metric.label()));
        if let Err(err) = self.draw(&partial, metric.label(), &points(sizes, values)) {
            let _ = fs::remove_file(&partial);
            return Err(render_err(err.to_string()));
        }
        if let Err(err) = fs::rename(&partial, &path) {
            let _ = fs::remove_file(&partial);
            return Err(render_err(err.to_string()));
        }

        log::info!("wrote {} chart to {}", metric.label(), path.display());
        Ok(path)
    }

    fn draw(
        &self,
        path: &Path,
        title: &str,
        points: &[(f64, f64)],
    ) -> Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let (x_range, y_range) = ranges(points);
        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .caption(title, (FONT_FAMILY, 28).into_font())
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_desc(X_DESC)
            .y_desc(Y_DESC)
            .label_style((FONT_FAMILY, 14).into_font())
            .axis_desc_style((FONT_FAMILY, 16).into_font())
            .draw()?;

        chart.draw_series(LineSeries::new(points.iter().copied(), &BLUE))?;
        chart.draw_series(
            points
                .iter()
                .map(|&point| Circle::new(point, 4, BLUE.filled())),
        )?;

        root.present()?;
        Ok(())
    }
}

fn load_font(explicit: Option<&Path>) -> Result<(), Error> {
    let Some(path) = explicit else {
        if register_font(FONT_FAMILY, FontStyle::Normal, BUNDLED_FONT).is_err() {
            return Err(Error::InvalidFont {
                path: PathBuf::from(BUNDLED_FONT_NAME),
            });
        }
        return Ok(());
    };

    let bytes = fs::read(path).map_err(|source| Error::Font {
        path: path.to_path_buf(),
        source,
    })?;
    // plotters keeps registered fonts for the life of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    if register_font(FONT_FAMILY, FontStyle::Normal, bytes).is_err() {
        return Err(Error::InvalidFont {
            path: path.to_path_buf(),
        });
    }
    log::debug!("using font {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn test_log_sizes() {
        let sizes = [1, 10, 50, 100, 1_000_000];
        let xs = log_sizes(&sizes);
        let expected = [0.0, 1.0, 50f64.log10(), 2.0, 6.0];
        for (x, want) in xs.iter().zip(expected) {
            assert!((x - want).abs() < 1e-9, "{x} != {want}");
        }
    }

    #[test]
    fn test_points_are_index_aligned() {
        let pts = points(&[1, 10, 100], &[1.5, 10.5, 100.5]);
        assert_eq!(pts.len(), 3);
        assert!((pts[1].0 - 1.0).abs() < 1e-9);
        assert_eq!(pts[2].1, 100.5);
    }

    #[test]
    fn test_single_point_range_is_padded() {
        let (x, y) = ranges(&[(2.0, 0.0)]);
        assert_eq!(x, 1.5..2.5);
        assert_eq!(y, 0.0..1.0);
    }

    #[test]
    fn test_render_writes_png() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let renderer = ChartRenderer::new(dir.path(), None)?;

        let path = renderer.render(Metric::Insert, &[1, 10, 100], &[1.25, 10.25, 100.25])?;
        assert_eq!(path, dir.path().join("Insert.png"));

        let bytes = fs::read(&path)?;
        assert!(bytes.starts_with(PNG_MAGIC));
        assert!(!dir.path().join(".Insert.partial.png").exists());
        Ok(())
    }

    #[test]
    fn test_render_overwrites_existing() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("Find.png"), b"stale")?;

        let renderer = ChartRenderer::new(dir.path(), None)?;
        renderer.render(Metric::Find, &[1, 10], &[0.5, 0.7])?;

        assert!(fs::read(dir.path().join("Find.png"))?.starts_with(PNG_MAGIC));
        Ok(())
    }

    #[test]
    fn test_bundled_font_draws_text() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let renderer = ChartRenderer::new(dir.path(), None)?;

        let (width, height) = (FONT_FAMILY, 28).into_font().box_size("Erase")?;
        assert!(width > 0 && height > 0);
        let (width, _) = (FONT_FAMILY, 16).into_font().box_size(Y_DESC)?;
        assert!(width > 0);

        let path = renderer.render(Metric::Erase, &[1, 10, 100], &[1.1, 10.1, 100.1])?;
        assert!(fs::read(path)?.starts_with(PNG_MAGIC));
        Ok(())
    }

    #[test]
    fn test_render_rejects_non_finite() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let renderer = ChartRenderer::new(dir.path(), None)?;
        for bad in [f64::INFINITY, f64::NAN] {
            match renderer.render(Metric::Find, &[1, 10], &[bad, 1.0]) {
                Err(Error::ChartRender { chart, reason, .. }) => {
                    assert_eq!(chart, "Find");
                    assert!(reason.contains("size 1 is not finite"), "{reason}");
                }
                other => panic!("expected render error, got {other:?}"),
            }
        }
        assert!(!dir.path().join("Find.png").exists());
        assert!(!dir.path().join(".Find.partial.png").exists());
        Ok(())
    }

    #[test]
    fn test_render_length_mismatch() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let renderer = ChartRenderer::new(dir.path(), None)?;
        match renderer.render(Metric::Find, &[1, 10], &[1.0]) {
            Err(Error::ChartRender { chart, reason, .. }) => {
                assert_eq!(chart, "Find");
                assert_eq!(reason, "2 sizes but 1 values");
            }
            other => panic!("expected render error, got {other:?}"),
        }
        assert!(!dir.path().join("Find.png").exists());
        Ok(())
    }

    #[test]
    fn test_render_into_missing_dir_fails() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let missing = dir.path().join("nope");
        let renderer = ChartRenderer::new(&missing, None)?;

        let err = renderer
            .render(Metric::Find, &[1, 10], &[1.0, 2.0])
            .unwrap_err();
        assert!(matches!(err, Error::ChartRender { .. }));
        assert!(!missing.exists());
        Ok(())
    }

    #[test]
    fn test_missing_explicit_font() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let font = dir.path().join("missing.ttf");
        let err = ChartRenderer::new(dir.path(), Some(&font)).unwrap_err();
        assert!(matches!(err, Error::Font { .. }));
        Ok(())
    }

    #[test]
    fn test_invalid_explicit_font() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let font = dir.path().join("bogus.ttf");
        fs::write(&font, b"not a font")?;
        let err = ChartRenderer::new(dir.path(), Some(&font)).unwrap_err();
        assert!(matches!(err, Error::InvalidFont { .. }));
        Ok(())
    }
}
