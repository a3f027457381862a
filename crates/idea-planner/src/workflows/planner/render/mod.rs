//! Paginated document output for an assembled [`Report`].
//!
//! Layout and encoding are separate passes: [`layout_report`] produces the
//! page geometry, [`pdf::encode`] turns it into bytes. Both are pure.

pub mod layout;
mod markup;
pub mod metrics;
pub mod pdf;

pub use layout::{layout_report, severity_color, DocumentLayout, DrawOp, Page, Rgb};
pub use markup::strip_markup;

use chrono::NaiveDate;

use super::report::Report;

const FILENAME_PREFIX: &str = "Design1st_DevicePlan";
const MAX_DEVICE_SEGMENT: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("document encoding failed: {0}")]
    Encode(String),
}

/// Encoded document ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub filename: String,
    pub page_count: usize,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentRenderer;

impl DocumentRenderer {
    pub fn layout(&self, report: &Report) -> DocumentLayout {
        layout_report(report)
    }

    pub fn render(&self, report: &Report) -> Result<RenderedDocument, RenderError> {
        let layout = layout_report(report);
        let bytes = pdf::encode(&layout)?;
        Ok(RenderedDocument {
            filename: document_filename(&report.header.device_type, report.header.generated_on),
            page_count: layout.page_count(),
            bytes,
        })
    }
}

/// `Design1st_DevicePlan_<device>_<Month_D_YYYY>.pdf`.
pub fn document_filename(device_type: &str, generated_on: NaiveDate) -> String {
    let device = sanitize_segment(device_type, MAX_DEVICE_SEGMENT);
    let date = sanitize_segment(&generated_on.format("%B %-d, %Y").to_string(), usize::MAX);
    let device = if device.is_empty() {
        "Device".to_string()
    } else {
        device
    };
    format!("{FILENAME_PREFIX}_{device}_{date}.pdf")
}

/// Collapses every run of characters outside `[A-Za-z0-9]` into one `_`.
fn sanitize_segment(raw: &str, max_len: usize) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches('_');
    let capped: String = trimmed.chars().take(max_len).collect();
    capped.trim_end_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_collapses_unsafe_runs() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).expect("valid date");
        assert_eq!(
            document_filename("Software / digital health (SaMD)", date),
            "Design1st_DevicePlan_Software_digital_health_SaMD_March_7_2025.pdf"
        );
    }

    #[test]
    fn filename_caps_device_segment() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 21).expect("valid date");
        let name = document_filename(&"A".repeat(90), date);
        assert_eq!(
            name,
            format!("Design1st_DevicePlan_{}_November_21_2025.pdf", "A".repeat(40))
        );
    }

    #[test]
    fn filename_falls_back_for_symbol_only_device() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).expect("valid date");
        assert_eq!(
            document_filename("+++", date),
            "Design1st_DevicePlan_Device_January_2_2025.pdf"
        );
    }
}
