//! Page layout for the document export.
//!
//! Pure arithmetic, kept apart from the PDF writer so the pagination rule can
//! be tested directly: a line is drawn at the cursor, the cursor moves down by
//! one line step, and once it falls below the bottom threshold the next line
//! starts a fresh page at the top.

use crate::types::LogRecord;

/// Characters of the timestamp shown per line (date + time to the second).
pub const TIMESTAMP_CHARS: usize = 19;
/// Characters of the answer shown per line.
pub const ANSWER_CHARS: usize = 60;

/// Geometry in PDF points (1/72 inch). Defaults are US Letter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub left_margin: f32,
    /// Cursor value for the first line of every page.
    pub top: f32,
    pub line_height: f32,
    /// A new page starts once the cursor drops below this value.
    pub bottom: f32,
    pub font_size: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            left_margin: 30.0,
            top: 750.0,
            line_height: 15.0,
            bottom: 50.0,
            font_size: 12.0,
        }
    }
}

/// One line of text positioned on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub y: f32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

impl PageLayout {
    /// Distribute `lines` over pages. Always yields at least one page; a
    /// break never produces a trailing empty page.
    pub fn paginate<I>(&self, lines: I) -> Vec<Page>
    where
        I: IntoIterator<Item = String>,
    {
        let mut pages = vec![Page::default()];
        let mut y = self.top;
        let mut break_pending = false;

        for text in lines {
            if break_pending {
                pages.push(Page::default());
                y = self.top;
                break_pending = false;
            }
            if let Some(page) = pages.last_mut() {
                page.lines.push(PlacedLine { y, text });
            }
            y -= self.line_height;
            if y < self.bottom {
                break_pending = true;
            }
        }
        pages
    }

    /// Lines that fit on one page under this layout.
    pub fn lines_per_page(&self) -> usize {
        if self.line_height <= 0.0 || self.top < self.bottom {
            return 1;
        }
        ((self.top - self.bottom) / self.line_height).floor() as usize + 1
    }
}

/// Render one record as a document line:
/// `<timestamp[..19]> - Q: <question> | A: <answer[..60]>...`
///
/// Truncation counts characters, not bytes or words.
pub fn document_line(record: &LogRecord) -> String {
    format!(
        "{} - Q: {} | A: {}...",
        truncate_chars(&record.timestamp, TIMESTAMP_CHARS),
        record.question,
        truncate_chars(&record.answer, ANSWER_CHARS),
    )
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
