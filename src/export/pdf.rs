//! Paginated PDF export.
//!
//! Layout is a pure function over the conversation ([`layout`]); rendering
//! hands the placed lines to `printpdf` with a single builtin font.

use printpdf::{BuiltinFont, Mm, PdfDocument, Pt};

use super::{separator, speaker_line, wrap, EXPORT_TITLE};
use crate::{chat::ChatMessage, error::PersonaError, mode::Mode};

/// Fixed page geometry and font metrics, all in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub left_margin: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    pub font_size: f32,
    /// Vertical distance between baselines
    pub leading: f32,
    /// Maximum characters per line
    pub wrap_width: usize,
}

impl PageSetup {
    /// A4 portrait, Helvetica 10pt, 90 columns.
    pub fn a4() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            left_margin: 40.0,
            top_margin: 50.0,
            bottom_margin: 50.0,
            font_size: 10.0,
            leading: 12.0,
            wrap_width: 90,
        }
    }

    fn first_baseline(&self) -> f32 {
        self.height - self.top_margin
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::a4()
    }
}

/// A line of text positioned on a page; `y` is measured from the bottom edge.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

struct Cursor<'a> {
    setup: &'a PageSetup,
    pages: Vec<Page>,
    y: f32,
}

impl<'a> Cursor<'a> {
    fn new(setup: &'a PageSetup) -> Self {
        Self {
            setup,
            pages: vec![Page::default()],
            y: setup.first_baseline(),
        }
    }

    fn place(&mut self, text: String) {
        if self.y < self.setup.bottom_margin {
            self.pages.push(Page::default());
            self.y = self.setup.first_baseline();
        }
        let line = PlacedLine {
            x: self.setup.left_margin,
            y: self.y,
            text,
        };
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(line);
        }
        self.y -= self.setup.leading;
    }
}

/// Lays the export out onto pages. Returns no pages for an empty conversation.
pub fn layout(mode: Mode, messages: &[ChatMessage], setup: &PageSetup) -> Vec<Page> {
    if messages.is_empty() {
        return Vec::new();
    }

    let mut cursor = Cursor::new(setup);
    cursor.place(EXPORT_TITLE.to_string());
    cursor.place(format!("Mode: {}", mode.name()));
    cursor.place(separator());
    cursor.place(String::new());

    for message in messages {
        for line in wrap(&speaker_line(message), setup.wrap_width) {
            cursor.place(line);
        }
        cursor.place(String::new());
    }
    cursor.pages
}

/// Maps text onto what the builtin Helvetica encoding can show.
fn encodable(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2022}' => '*',
            c if c == ' ' || c.is_ascii_graphic() => c,
            _ => '?',
        })
        .collect()
}

/// Renders the conversation as a PDF document.
///
/// Returns `Ok(None)` when there are no messages instead of an empty document.
pub fn to_pdf(mode: Mode, messages: &[ChatMessage]) -> Result<Option<Vec<u8>>, PersonaError> {
    let setup = PageSetup::a4();
    let pages = layout(mode, messages, &setup);
    if pages.is_empty() {
        return Ok(None);
    }

    let width = Mm::from(Pt(setup.width));
    let height = Mm::from(Pt(setup.height));
    let (doc, first_page, first_layer) =
        PdfDocument::new(format!("{EXPORT_TITLE} - {}", mode.name()), width, height, "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| PersonaError::Export(e.to_string()))?;

    for (i, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, "Layer 1")
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for line in page.lines.iter().filter(|l| !l.text.is_empty()) {
            layer.use_text(
                encodable(&line.text),
                setup.font_size,
                Mm::from(Pt(line.x)),
                Mm::from(Pt(line.y)),
                &font,
            );
        }
    }

    log::debug!("exported {} page(s) for mode {}", pages.len(), mode.slug());

    doc.save_to_bytes()
        .map(Some)
        .map_err(|e| PersonaError::Export(e.to_string()))
}
