//! Paginated PDF rendering with `printpdf`.
//!
//! Text is set in the built-in Helvetica, which only covers the WinAnsi
//! (Windows-1252) character set. Anything outside it is drawn as `?` and
//! counted, and the export logs a warning naming how many characters were
//! replaced. The stored log and the workbook export keep the original text.

use super::layout::{document_line, PageLayout};
use super::ExportError;
use crate::types::LogRecord;
use printpdf::{BuiltinFont, Mm, PdfDocument, Pt};
use std::io::{BufWriter, Write};

const LAYER: &str = "Layer 1";
const TITLE: &str = "Hospital QA log";

/// Render one line per record, breaking pages per [`PageLayout::paginate`].
pub fn write_document<W: Write>(
    records: &[LogRecord],
    layout: &PageLayout,
    out: W,
) -> Result<(), ExportError> {
    let pages = layout.paginate(records.iter().map(document_line));
    let width = Mm::from(Pt(layout.page_width));
    let height = Mm::from(Pt(layout.page_height));

    let (doc, first_page, first_layer) = PdfDocument::new(TITLE, width, height, LAYER);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Document(e.to_string()))?;

    let mut replaced = 0usize;
    let mut first = Some((first_page, first_layer));
    for page in &pages {
        let (page_ref, layer_ref) = match first.take() {
            Some(ids) => ids,
            None => doc.add_page(width, height, LAYER),
        };
        let layer = doc.get_page(page_ref).get_layer(layer_ref);
        for line in &page.lines {
            let (text, lost) = win_ansi_text(&line.text);
            replaced += lost;
            layer.use_text(
                text,
                layout.font_size,
                Mm::from(Pt(layout.left_margin)),
                Mm::from(Pt(line.y)),
                &font,
            );
        }
    }

    if replaced > 0 {
        tracing::warn!(
            replaced,
            "characters outside the PDF font's WinAnsi set were drawn as '?'"
        );
    }

    doc.save(&mut BufWriter::new(out))
        .map_err(|e| ExportError::Document(e.to_string()))
}

/// Windows-1252 characters in 0x80..=0x9F, where it departs from Latin-1.
const CP1252_EXTRAS: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

fn in_win_ansi(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}') || CP1252_EXTRAS.contains(c)
}

/// Map `text` onto what the built-in font can draw. Control characters
/// (embedded newlines, tabs) become spaces; other unsupported characters
/// become `?` and are counted.
fn win_ansi_text(text: &str) -> (String, usize) {
    let mut lost = 0;
    let mapped = text
        .chars()
        .map(|c| {
            if in_win_ansi(c) {
                c
            } else if c.is_control() {
                ' '
            } else {
                lost += 1;
                '?'
            }
        })
        .collect();
    (mapped, lost)
}
