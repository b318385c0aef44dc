use serde::Deserialize;

/// Query string carrying the selected mode, e.g. `/?mode=study`
#[derive(Deserialize, Debug, Default)]
pub struct ModeQuery {
    /// Mode slug; the default mode is used when absent
    #[serde(default)]
    pub mode: Option<String>,
}

/// Form posted by actions that only need the mode
#[derive(Deserialize, Debug)]
pub struct ModeForm {
    #[serde(default)]
    pub mode: Option<String>,
}

/// Chat input submission
#[derive(Deserialize, Debug)]
pub struct ChatForm {
    #[serde(default)]
    pub mode: Option<String>,
    /// Text typed by the user
    #[serde(default)]
    pub message: String,
}

/// Content idea request from the sidebar
#[derive(Deserialize, Debug)]
pub struct IdeasForm {
    #[serde(default)]
    pub mode: Option<String>,
    /// Topic to brainstorm about
    #[serde(default)]
    pub topic: String,
}
