use std::str::FromStr;

use axum::{
    extract::{Form, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use super::types::{ChatForm, IdeasForm, ModeForm, ModeQuery};
use super::view::PageModel;
use super::ServerState;
use crate::{
    chat::ChatMessage,
    completion,
    error::PersonaError,
    export,
    mode::Mode,
    session::{lock as lock_session, Notice, Panel, PreparedPdf, SessionHandle},
};

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "persona_session";

impl IntoResponse for PersonaError {
    fn into_response(self) -> Response {
        let status = match &self {
            PersonaError::InvalidMode(_) | PersonaError::EmptyInput(_) => StatusCode::BAD_REQUEST,
            PersonaError::Transport(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

fn parse_mode(raw: Option<&str>) -> Result<Mode, PersonaError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Mode::default()),
        Some(slug) => Mode::from_str(slug),
    }
}

/// Finds the caller's session, creating one when needed, and refreshes the cookie.
fn resolve_session(state: &ServerState, jar: CookieJar) -> (CookieJar, SessionHandle) {
    let id = jar
        .get(SESSION_COOKIE)
        .and_then(|c| uuid::Uuid::parse_str(c.value()).ok());
    let (id, handle, _) = state.sessions.get_or_create(id);
    // Re-issued on every request so the cookie's lifetime slides with the session's
    let max_age = Duration::try_from(state.sessions.idle_timeout()).unwrap_or(Duration::MAX);
    let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(max_age);
    (jar.add(cookie), handle)
}

fn back_to(mode: Mode) -> Redirect {
    Redirect::to(&format!("/?mode={}", mode.slug()))
}

/// Records a failed side flow as a notice: warnings for empty input, errors otherwise.
fn notice_for(err: &PersonaError) -> Notice {
    if err.is_warning() {
        Notice::warning(err.to_string())
    } else {
        log::warn!("completion failed: {err}");
        Notice::error(format!("AI request failed: {err}"))
    }
}

/// Renders the page for the selected mode, consuming one-shot notices and panel.
pub async fn index(
    State(state): State<ServerState>,
    jar: CookieJar,
    Query(query): Query<ModeQuery>,
) -> Result<(CookieJar, Html<String>), PersonaError> {
    let mode = parse_mode(query.mode.as_deref())?;
    let (jar, handle) = resolve_session(&state, jar);

    let model = {
        let mut session = lock_session(&handle);
        PageModel {
            mode,
            messages: session.get(mode).to_vec(),
            notices: session.take_notices(),
            panel: session.take_panel(),
            pdf_ready: session.prepared_pdf(mode).is_some(),
        }
    };

    let page = state.view.render(&model)?;
    Ok((jar, Html(page)))
}

/// Appends the user's message, asks the model with the mode's persona, appends the reply.
///
/// On failure the user message stays in the history and an error notice is shown.
/// The session is unlocked while the model answers, so a `/clear` or another turn
/// in the same session may land first; the reply is then discarded.
pub async fn handle_chat(
    State(state): State<ServerState>,
    jar: CookieJar,
    Form(form): Form<ChatForm>,
) -> Result<(CookieJar, Redirect), PersonaError> {
    let mode = parse_mode(form.mode.as_deref())?;
    let (jar, handle) = resolve_session(&state, jar);

    if form.message.trim().is_empty() {
        lock_session(&handle).push_notice(Notice::warning("Please type a message"));
        return Ok((jar, back_to(mode)));
    }

    let history = {
        let mut session = lock_session(&handle);
        session.append(mode, ChatMessage::user().content(form.message).build());
        session.get(mode).to_vec()
    };

    log::debug!(
        "chat turn in {} with {} message(s) via {}",
        mode.slug(),
        history.len(),
        state.provider.model()
    );
    let result = state.provider.complete(mode.system_prompt(), &history).await;

    let mut session = lock_session(&handle);
    match result {
        Ok(reply) => {
            let reply = ChatMessage::assistant().content(reply).build();
            if !session.append_reply(mode, history.len(), reply) {
                log::debug!("{} history changed during the turn; reply dropped", mode.slug());
            }
        }
        Err(err) => session.push_notice(notice_for(&err)),
    }
    drop(session);

    Ok((jar, back_to(mode)))
}

/// One-shot content ideas; the result goes to the side panel, not the history.
pub async fn handle_ideas(
    State(state): State<ServerState>,
    jar: CookieJar,
    Form(form): Form<IdeasForm>,
) -> Result<(CookieJar, Redirect), PersonaError> {
    let mode = parse_mode(form.mode.as_deref())?;
    let (jar, handle) = resolve_session(&state, jar);

    let result = completion::generate_ideas(state.provider.as_ref(), &form.topic).await;

    let mut session = lock_session(&handle);
    match result {
        Ok(body) => session.set_panel(Panel::Ideas {
            topic: form.topic.trim().to_string(),
            body,
        }),
        Err(err) => session.push_notice(notice_for(&err)),
    }
    drop(session);

    Ok((jar, back_to(mode)))
}

/// One-shot summary of the current mode's conversation.
pub async fn handle_summary(
    State(state): State<ServerState>,
    jar: CookieJar,
    Form(form): Form<ModeForm>,
) -> Result<(CookieJar, Redirect), PersonaError> {
    let mode = parse_mode(form.mode.as_deref())?;
    let (jar, handle) = resolve_session(&state, jar);

    let history = lock_session(&handle).get(mode).to_vec();
    let result = completion::summarize(state.provider.as_ref(), &history).await;

    let mut session = lock_session(&handle);
    match result {
        Ok(body) => session.set_panel(Panel::Summary { mode, body }),
        Err(err) => session.push_notice(notice_for(&err)),
    }
    drop(session);

    Ok((jar, back_to(mode)))
}

pub async fn handle_clear(
    State(state): State<ServerState>,
    jar: CookieJar,
    Form(form): Form<ModeForm>,
) -> Result<(CookieJar, Redirect), PersonaError> {
    let mode = parse_mode(form.mode.as_deref())?;
    let (jar, handle) = resolve_session(&state, jar);

    let mut session = lock_session(&handle);
    session.clear(mode);
    session.push_notice(Notice::success("Chat cleared!"));
    drop(session);

    Ok((jar, back_to(mode)))
}

fn attachment(content_type: &'static str, file_name: &str, body: impl IntoResponse) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}

/// Plain-text download of the current mode's conversation.
pub async fn export_txt(
    State(state): State<ServerState>,
    jar: CookieJar,
    Query(query): Query<ModeQuery>,
) -> Result<(CookieJar, Response), PersonaError> {
    let mode = parse_mode(query.mode.as_deref())?;
    let (jar, handle) = resolve_session(&state, jar);

    let text = export::to_text(mode, lock_session(&handle).get(mode));
    let response = attachment(
        "text/plain; charset=utf-8",
        &export::file_name(mode, "txt"),
        text,
    );
    Ok((jar, response))
}

/// First step of the PDF export: build the document and offer the download link.
pub async fn prepare_pdf(
    State(state): State<ServerState>,
    jar: CookieJar,
    Form(form): Form<ModeForm>,
) -> Result<(CookieJar, Redirect), PersonaError> {
    let mode = parse_mode(form.mode.as_deref())?;
    let (jar, handle) = resolve_session(&state, jar);

    let history = lock_session(&handle).get(mode).to_vec();
    let notice_or_pdf = match export::to_pdf(mode, &history) {
        Ok(Some(bytes)) => Ok(PreparedPdf { mode, bytes }),
        Ok(None) => Err(Notice::warning("No messages to export yet.")),
        Err(err) => {
            log::warn!("pdf export failed: {err}");
            Err(Notice::error(err.to_string()))
        }
    };

    let mut session = lock_session(&handle);
    match notice_or_pdf {
        Ok(pdf) => session.prepare_pdf(pdf),
        Err(notice) => session.push_notice(notice),
    }
    drop(session);

    Ok((jar, back_to(mode)))
}

/// Second step of the PDF export: serve the prepared document.
pub async fn download_pdf(
    State(state): State<ServerState>,
    jar: CookieJar,
    Query(query): Query<ModeQuery>,
) -> Result<(CookieJar, Response), PersonaError> {
    let mode = parse_mode(query.mode.as_deref())?;
    let (jar, handle) = resolve_session(&state, jar);

    let mut session = lock_session(&handle);
    let bytes = session.prepared_pdf(mode).map(|pdf| pdf.bytes.clone());
    let response = match bytes {
        Some(bytes) => attachment("application/pdf", &export::file_name(mode, "pdf"), bytes),
        None => {
            session.push_notice(Notice::warning("Click \"Export as PDF\" first."));
            back_to(mode).into_response()
        }
    };
    drop(session);

    Ok((jar, response))
}

/// Drops the caller's session and its cookie.
pub async fn end_session(
    State(state): State<ServerState>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    if let Some(id) = jar
        .get(SESSION_COOKIE)
        .and_then(|c| uuid::Uuid::parse_str(c.value()).ok())
    {
        state.sessions.end(&id);
    }
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Redirect::to("/"),
    )
}

pub async fn health() -> &'static str {
    "ok"
}
