//! Per-session conversation state.
//!
//! A [`Session`] holds one ordered message history per [`Mode`] plus the
//! transient UI state (notices, the side panel, a prepared PDF) that is shown
//! once on the next render.

mod registry;

pub use registry::{lock, SessionHandle, SessionId, SessionRegistry, DEFAULT_IDLE_TIMEOUT};

use crate::{chat::ChatMessage, mode::Mode};

/// Assistant message every mode starts with.
pub const WELCOME_MESSAGE: &str = "Hi 👋 I'm PersonaAI!\n\n\
    You can chat with me, create content ideas, study concepts, or get help with writing.\n\n\
    ✨ Choose a mode from the sidebar and start typing!";

/// Severity of a one-shot notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A message shown once above the conversation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Result of a one-shot side flow. Never stored as a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    Ideas { topic: String, body: String },
    Summary { mode: Mode, body: String },
}

/// A PDF export waiting for the follow-up download.
#[derive(Debug, Clone)]
pub struct PreparedPdf {
    pub mode: Mode,
    pub bytes: Vec<u8>,
}

/// All state for one user's browser session.
#[derive(Debug, Clone)]
pub struct Session {
    histories: [Vec<ChatMessage>; 4],
    notices: Vec<Notice>,
    panel: Option<Panel>,
    prepared_pdf: Option<PreparedPdf>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a session with the welcome message seeded in every mode.
    pub fn new() -> Self {
        let welcome = || vec![ChatMessage::assistant().content(WELCOME_MESSAGE).build()];
        Self {
            histories: [welcome(), welcome(), welcome(), welcome()],
            notices: Vec::new(),
            panel: None,
            prepared_pdf: None,
        }
    }

    pub fn get(&self, mode: Mode) -> &[ChatMessage] {
        &self.histories[mode.index()]
    }

    /// Appends to the mode's history. A PDF prepared for that mode is now stale and is dropped.
    pub fn append(&mut self, mode: Mode, message: ChatMessage) {
        self.drop_prepared_pdf(mode);
        self.histories[mode.index()].push(message);
    }

    /// Appends a reply only if the history still has `expected_len` messages.
    ///
    /// A chat turn releases the session while it waits for the model; if the
    /// mode was cleared or another turn landed meanwhile, the reply no longer
    /// pairs with its question and is discarded. Returns whether it was appended.
    pub fn append_reply(&mut self, mode: Mode, expected_len: usize, reply: ChatMessage) -> bool {
        if self.get(mode).len() != expected_len {
            return false;
        }
        self.append(mode, reply);
        true
    }

    /// Empties the mode's history. The welcome message is not re-seeded.
    pub fn clear(&mut self, mode: Mode) -> &[ChatMessage] {
        self.drop_prepared_pdf(mode);
        let history = &mut self.histories[mode.index()];
        history.clear();
        history
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn set_panel(&mut self, panel: Panel) {
        self.panel = Some(panel);
    }

    pub fn take_panel(&mut self) -> Option<Panel> {
        self.panel.take()
    }

    pub fn prepare_pdf(&mut self, pdf: PreparedPdf) {
        self.prepared_pdf = Some(pdf);
    }

    fn drop_prepared_pdf(&mut self, mode: Mode) {
        if self
            .prepared_pdf
            .as_ref()
            .is_some_and(|pdf| pdf.mode == mode)
        {
            self.prepared_pdf = None;
        }
    }

    /// The prepared PDF, if one exists for `mode`.
    pub fn prepared_pdf(&self, mode: Mode) -> Option<&PreparedPdf> {
        self.prepared_pdf.as_ref().filter(|pdf| pdf.mode == mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatRole;

    #[test]
    fn every_mode_starts_with_one_welcome() {
        let session = Session::new();
        for mode in Mode::ALL {
            let history = session.get(mode);
            assert_eq!(history.len(), 1);
            assert_eq!(history[0].role, ChatRole::Assistant);
            assert_eq!(history[0].content, WELCOME_MESSAGE);
        }
    }

    #[test]
    fn clear_only_touches_one_mode() {
        let mut session = Session::new();
        session.append(Mode::Study, ChatMessage::user().content("What is Rust?").build());
        assert!(session.clear(Mode::Study).is_empty());
        assert!(session.get(Mode::Study).is_empty());
        for mode in [Mode::Chat, Mode::Creator, Mode::Writer] {
            assert_eq!(session.get(mode).len(), 1);
        }
    }

    #[test]
    fn append_preserves_order() {
        let mut session = Session::new();
        session.append(Mode::Chat, ChatMessage::user().content("one").build());
        session.append(Mode::Chat, ChatMessage::assistant().content("two").build());
        let contents: Vec<_> = session
            .get(Mode::Chat)
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec![WELCOME_MESSAGE, "one", "two"]);
    }

    #[test]
    fn notices_and_panel_are_one_shot() {
        let mut session = Session::new();
        session.push_notice(Notice::warning("Please enter a topic"));
        session.set_panel(Panel::Ideas {
            topic: "travel".into(),
            body: "- go".into(),
        });
        assert_eq!(session.take_notices().len(), 1);
        assert!(session.take_notices().is_empty());
        assert!(session.take_panel().is_some());
        assert!(session.take_panel().is_none());
    }

    fn pdf_for(mode: Mode) -> PreparedPdf {
        PreparedPdf {
            mode,
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn prepared_pdf_is_per_mode_and_dropped_on_clear() {
        let mut session = Session::new();
        session.prepare_pdf(pdf_for(Mode::Writer));
        assert!(session.prepared_pdf(Mode::Chat).is_none());
        assert!(session.prepared_pdf(Mode::Writer).is_some());
        session.clear(Mode::Writer);
        assert!(session.prepared_pdf(Mode::Writer).is_none());
    }

    #[test]
    fn new_message_makes_prepared_pdf_stale() {
        let mut session = Session::new();
        session.prepare_pdf(pdf_for(Mode::Chat));
        session.append(Mode::Study, ChatMessage::user().content("elsewhere").build());
        assert!(session.prepared_pdf(Mode::Chat).is_some());
        session.append(Mode::Chat, ChatMessage::user().content("Hello").build());
        assert!(session.prepared_pdf(Mode::Chat).is_none());
    }

    #[test]
    fn reply_is_dropped_when_history_moved_on() {
        let mut session = Session::new();
        session.append(Mode::Chat, ChatMessage::user().content("Hello").build());
        let asked_at = session.get(Mode::Chat).len();

        session.clear(Mode::Chat);
        let reply = ChatMessage::assistant().content("late").build();
        assert!(!session.append_reply(Mode::Chat, asked_at, reply.clone()));
        assert!(session.get(Mode::Chat).is_empty());

        session.append(Mode::Chat, ChatMessage::user().content("again").build());
        assert!(session.append_reply(Mode::Chat, 1, reply));
        assert_eq!(session.get(Mode::Chat).len(), 2);
    }
}
