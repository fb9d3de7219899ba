use std::fmt::Write;

use xray::batch::BatchEntry;
use xray::enhance::{Metrics, MetricsComparison};

fn write_metrics(out: &mut String, title: &str, metrics: &Metrics) -> std::fmt::Result {
    writeln!(out, "{title}:")?;
    writeln!(out, "  Mean Intensity: {:.2}", metrics.mean_intensity)?;
    writeln!(out, "  Contrast: {:.3}", metrics.contrast)?;
    writeln!(out, "  Std Deviation: {:.2}", metrics.std_intensity)?;
    writeln!(
        out,
        "  Range: {}-{}",
        metrics.min_intensity, metrics.max_intensity
    )
}

/// Render the original versus processed metrics of one image for one technique.
///
/// Returns `None` when the technique is not part of the entry.
pub fn comparison_text(entry: &BatchEntry, technique: &str) -> Option<String> {
    let original = &entry.result.original().metrics;
    let processed = entry.result.metrics(technique)?;
    let cmp = MetricsComparison::new(original, processed);

    let mut out = String::new();
    let render = |out: &mut String| -> std::fmt::Result {
        writeln!(out, "IMAGE: {}", entry.name)?;
        writeln!(out, "TECHNIQUE: {technique}")?;
        writeln!(out)?;
        write_metrics(out, "ORIGINAL", original)?;
        writeln!(out)?;
        write_metrics(out, "PROCESSED", processed)?;
        writeln!(out)?;
        writeln!(out, "IMPROVEMENT:")?;
        writeln!(out, "  Brightness Δ: {:+.2}", cmp.brightness_delta)?;
        writeln!(out, "  Contrast Ratio: {:.3}x", cmp.contrast_ratio)
    };
    render(&mut out).ok()?;

    Some(out)
}
