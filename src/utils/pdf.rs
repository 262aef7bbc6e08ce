//! Single-page PDF writer for test result sheets.
//!
//! Produces a PDF 1.4 file using the built-in Helvetica font, so no font data
//! has to be embedded. Text outside printable ASCII is replaced with `?`.

use crate::{models::Booking, utils::AppError};
use chrono::{DateTime, NaiveDate};

const PAGE_WIDTH: f64 = 612.0;
const PAGE_HEIGHT: f64 = 792.0;
const MARGIN: f64 = 72.0;

pub fn render_test_result(user_name: &str, booking: &Booking) -> Result<Vec<u8>, AppError> {
    if !booking.price.is_finite() {
        return Err(AppError::Render(format!("price of '{}' is not a number", booking.test_name)));
    }

    let lines = [
        format!("User Name: {}", user_name),
        format!("Test Name: {}", booking.test_name),
        format!("Test Date: {}", display_date(&booking.date)),
        format!("Test Price: ${:.2}", booking.price),
        format!("Delivery Status: {}", booking.status),
    ];

    let mut content = String::new();
    let title = "Test Result Details";
    // Helvetica averages about half an em per glyph.
    let title_x = (PAGE_WIDTH - title.len() as f64 * 16.0 * 0.5) / 2.0;
    let mut y = PAGE_HEIGHT - MARGIN;
    text_line(&mut content, 16.0, title_x, y, title);

    y -= 32.0;
    for line in &lines {
        text_line(&mut content, 12.0, MARGIN, y, line);
        y -= 18.0;
    }

    Ok(assemble(&content))
}

fn text_line(content: &mut String, size: f64, x: f64, y: f64, text: &str) {
    content.push_str(&format!(
        "BT /F1 {} Tf {:.2} {:.2} Td ({}) Tj ET\n",
        size,
        x,
        y,
        escape(text)
    ));
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            ' '..='~' => escaped.push(c),
            _ => escaped.push('?'),
        }
    }
    escaped
}

/// Formats ISO dates as MM/DD/YYYY; anything else is printed as stored.
fn display_date(raw: &str) -> String {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%m/%d/%Y").to_string();
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.format("%m/%d/%Y").to_string();
    }
    raw.to_string()
}

fn assemble(content: &str) -> Vec<u8> {
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>",
            PAGE_WIDTH, PAGE_HEIGHT
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ),
    ];

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{}\nendobj\n", index + 1, body));
    }

    let xref_offset = out.len();
    out.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        out.push_str(&format!("{:010} 00000 n \n", offset));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));

    out.into_bytes()
}
