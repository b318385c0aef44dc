//! Conversation export to plain text and paginated PDF.

pub mod pdf;
pub mod wrap;

pub use pdf::{layout, to_pdf, Page, PageSetup, PlacedLine};
pub use wrap::wrap;

use crate::{chat::ChatMessage, mode::Mode};

/// Title printed at the top of every export.
pub const EXPORT_TITLE: &str = "PersonaAI";

/// Returned by [`to_text`] when there is nothing to export.
pub const EMPTY_TEXT_EXPORT: &str = "No messages to export.";

/// Width of the separator line under the export header.
const SEPARATOR_WIDTH: usize = 60;

pub(crate) fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// `You: ...` / `AI: ...` rendering of one message.
pub(crate) fn speaker_line(message: &ChatMessage) -> String {
    format!("{}: {}", message.role.export_label(), message.content)
}

/// Renders a conversation as plain UTF-8 text.
///
/// An empty conversation yields [`EMPTY_TEXT_EXPORT`] rather than an error.
pub fn to_text(mode: Mode, messages: &[ChatMessage]) -> String {
    if messages.is_empty() {
        return EMPTY_TEXT_EXPORT.to_string();
    }

    let mut text = format!("{EXPORT_TITLE}\nMode: {}\n", mode.label());
    text.push_str(&separator());
    text.push_str("\n\n");

    for message in messages {
        text.push_str(&speaker_line(message));
        text.push_str("\n\n");
    }
    text
}

/// Download file name, e.g. `Study_chat.pdf`.
pub fn file_name(mode: Mode, extension: &str) -> String {
    format!("{}_chat.{extension}", mode.name().replace(' ', "_"))
}
