use serde::Serialize;

use crate::pipeline::{CompositionResult, Percentages};

// ---------------------------------------------------------------------------
// Human readable output
// ---------------------------------------------------------------------------

/// Framed title line printed before a prediction.
pub fn banner(title: &str, frame: &str) -> String {
    let width = title.chars().count();
    let line: String = frame.chars().cycle().take(width).collect();
    format!("{line}\n{title}\n{line}")
}

/// Percentages block, one decimal place each.
pub fn render_text(result: &CompositionResult) -> String {
    let pct = result.percentages();
    format!(
        " Secondary Structure Prediction\n \
         ------------------------------\n \
         Helix: {:.1}%\n \
         Sheet: {:.1}%\n \
         Coil: {:.1}%",
        pct.helix, pct.sheet, pct.coil
    )
}

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub source: &'a str,
    pub peaks_used: usize,
    pub fractions: CompositionResult,
    pub percentages: Percentages,
}

pub fn render_json(
    source: &str,
    peaks_used: usize,
    result: &CompositionResult,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        source,
        peaks_used,
        fractions: *result,
        percentages: result.percentages(),
    })
}

// ---------------------------------------------------------------------------
// Reference check
// ---------------------------------------------------------------------------

/// Expected percentages for the ubiquitin backbone peak list (BMRB 5387)
/// with the shipped model, as `(helix, sheet, coil)` string prefixes.
pub const UBIQUITIN_REFERENCE: (&str, &str, &str) = ("21.2", "36.1", "42.8");

/// Compare the first four characters of each percentage string.
pub fn matches_reference(result: &CompositionResult, reference: (&str, &str, &str)) -> bool {
    let pct = result.percentages();
    let prefix = |v: f64| v.to_string().chars().take(4).collect::<String>();
    prefix(pct.helix) == reference.0
        && prefix(pct.sheet) == reference.1
        && prefix(pct.coil) == reference.2
}
