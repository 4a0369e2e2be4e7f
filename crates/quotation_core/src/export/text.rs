//! Plain-text quotation transcript.

use crate::export::{ExportFormat, ExportResult};
use crate::model::quotation::Quotation;

pub struct TextExport;

impl ExportFormat for TextExport {
    const EXTENSION: &'static str = "txt";
    const CONTENT_TYPE: &'static str = "text/plain; charset=utf-8";

    fn render(quotation: &Quotation) -> ExportResult<Vec<u8>> {
        Ok(render_transcript(quotation).into_bytes())
    }
}

/// Renders the fixed-layout transcript.
///
/// Header block, a numbered item list (an indented note line follows an
/// item only when its note is non-empty), then total, address and notes.
pub fn render_transcript(quotation: &Quotation) -> String {
    let mut out = String::new();
    out.push_str(&format!("報價單編號: {}\n", quotation.quotation_number));
    out.push_str(&format!("日期: {}\n", quotation.date));
    out.push_str(&format!("客戶名稱: {}\n", quotation.customer));
    out.push_str(&format!("聯絡人: {}\n", quotation.contact_person));
    out.push_str("\n項目列表:\n");

    for (index, item) in quotation.items.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} - 數量: {} - 單價: {} - 金額: {}\n",
            index + 1,
            item.description,
            item.quantity,
            item.unit_price,
            item.amount
        ));
        if !item.notes.is_empty() {
            out.push_str(&format!("   備註: {}\n", item.notes));
        }
    }

    out.push_str(&format!("\n總金額: ${}\n", quotation.grand_total));
    out.push_str(&format!("地址: {}\n", quotation.address));
    out.push_str(&format!("備註說明: {}\n", quotation.notes));
    out
}
