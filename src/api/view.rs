//! Page rendering.
//!
//! Every action ends in a call to [`View::render`] with a [`PageModel`]
//! snapshot taken from the session; nothing re-renders implicitly.

use minijinja::{context, Environment, Value};
use pulldown_cmark::{html, Event, Options, Parser};
use serde::Serialize;

use crate::{
    chat::ChatMessage,
    error::PersonaError,
    mode::Mode,
    session::{Notice, Panel},
};

const PAGE_TEMPLATE: &str = "page.html";

/// Everything the page needs, copied out of the session so the lock is not held while rendering.
#[derive(Debug, Clone)]
pub struct PageModel {
    pub mode: Mode,
    pub messages: Vec<ChatMessage>,
    pub notices: Vec<Notice>,
    pub panel: Option<Panel>,
    pub pdf_ready: bool,
}

#[derive(Serialize)]
struct ModeOption {
    slug: &'static str,
    label: &'static str,
    selected: bool,
}

#[derive(Serialize)]
struct RenderedMessage {
    is_user: bool,
    html: Value,
}

#[derive(Serialize)]
struct RenderedPanel {
    title: String,
    html: Value,
}

/// Renders Markdown to HTML, escaping any raw HTML the model produced.
pub fn markdown_to_html(source: &str) -> String {
    let parser = Parser::new_ext(source, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH)
        .map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn rendered_panel(panel: &Panel) -> RenderedPanel {
    let (title, body) = match panel {
        Panel::Ideas { topic, body } => (format!("📸 Content ideas: {topic}"), body),
        Panel::Summary { mode, body } => (format!("Auto Summary ({})", mode.label()), body),
    };
    RenderedPanel {
        title,
        html: Value::from_safe_string(markdown_to_html(body)),
    }
}

/// Holds the compiled page template.
pub struct View {
    env: Environment<'static>,
}

impl View {
    pub fn new() -> Result<Self, PersonaError> {
        let mut env = Environment::new();
        env.add_template(PAGE_TEMPLATE, include_str!("templates/page.html"))?;
        Ok(Self { env })
    }

    pub fn render(&self, model: &PageModel) -> Result<String, PersonaError> {
        let modes: Vec<ModeOption> = Mode::ALL
            .iter()
            .map(|m| ModeOption {
                slug: m.slug(),
                label: m.label(),
                selected: *m == model.mode,
            })
            .collect();

        let messages: Vec<RenderedMessage> = model
            .messages
            .iter()
            .map(|m| RenderedMessage {
                is_user: m.is_user(),
                html: Value::from_safe_string(markdown_to_html(&m.content)),
            })
            .collect();

        let template = self.env.get_template(PAGE_TEMPLATE)?;
        let page = template.render(context! {
            mode => model.mode.slug(),
            mode_label => model.mode.label(),
            modes => modes,
            messages => messages,
            notices => &model.notices,
            panel => model.panel.as_ref().map(rendered_panel),
            pdf_ready => model.pdf_ready,
            pdf_file => crate::export::file_name(model.mode, "pdf"),
        })?;
        Ok(page)
    }
}
