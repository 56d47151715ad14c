use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::error::{AppError, Result};
use crate::models::holiday_plan::HolidayPlan;

/// The filename offered to the client for downloads.
pub const PDF_FILENAME: &str = "holiday-plan.pdf";

/// A rendered document ready to be sent.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub filename: &'static str,
    pub bytes: Vec<u8>,
}

fn render_error(e: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("PDF rendering failed: {}", e))
}

/// Renders the fixed single-page layout for a plan.
///
/// The heading carries the owner's display name, followed by one labelled
/// line per field.
pub fn render_holiday_plan(plan: &HolidayPlan, owner_name: &str) -> Result<RenderedPdf> {
    let (doc, page, layer) = PdfDocument::new("Holiday plan", Mm(210.0), Mm(297.0), "content");
    let heading_font = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(render_error)?;
    let body_font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(render_error)?;

    let canvas = doc.get_page(page).get_layer(layer);
    canvas.use_text(
        format!("{} holiday plan", owner_name),
        24.0,
        Mm(20.0),
        Mm(270.0),
        &heading_font,
    );

    let participants = plan
        .participants
        .map(|count| count.to_string())
        .unwrap_or_default();
    let lines = [
        ("Title", plan.title.clone()),
        ("Description", plan.description.clone()),
        ("Date", plan.date.format("%Y-%m-%d").to_string()),
        ("Location", plan.location.clone()),
        ("Participants", participants),
    ];

    let mut y = 255.0;
    for (label, value) in lines {
        canvas.use_text(format!("{}: {}", label, value), 14.0, Mm(20.0), Mm(y), &body_font);
        y -= 8.0;
    }

    let bytes = doc.save_to_bytes().map_err(render_error)?;
    tracing::debug!("Rendered PDF for holiday plan {} ({} bytes)", plan.id, bytes.len());

    Ok(RenderedPdf {
        filename: PDF_FILENAME,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn plan(participants: Option<i32>) -> HolidayPlan {
        HolidayPlan {
            id: 1,
            owner_id: 1,
            title: "Travel to Lisbon".to_string(),
            description: "A week by the sea".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            location: "Lisbon".to_string(),
            participants,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn renders_a_pdf_document() {
        let rendered = render_holiday_plan(&plan(Some(4)), "Yuri Fernandes").unwrap();
        assert_eq!(rendered.filename, PDF_FILENAME);
        assert!(rendered.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn renders_without_participants() {
        let rendered = render_holiday_plan(&plan(None), "Yuri Fernandes").unwrap();
        assert!(!rendered.bytes.is_empty());
    }
}
