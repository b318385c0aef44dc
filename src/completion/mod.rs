use async_trait::async_trait;

use crate::{chat::ChatMessage, error::PersonaError};

/// System prompt for the one-shot content idea generator.
pub const IDEAS_SYSTEM_PROMPT: &str =
    "You are a social media expert. Format your response clearly using headings and bullet points.";

/// System prompt for the one-shot conversation summarizer.
pub const SUMMARY_SYSTEM_PROMPT: &str =
    "Summarize the conversation clearly using bullet points. Highlight key ideas and conclusions.";

/// Trait for providers that turn a conversation into a single assistant reply.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends `[system(system_prompt), ...history]` and returns the reply text.
    ///
    /// # Arguments
    ///
    /// * `system_prompt` - Persona instructions placed before the history
    /// * `history` - The conversation so far, oldest first
    ///
    /// # Returns
    ///
    /// The assistant's reply or a transport error
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
    ) -> Result<String, PersonaError>;

    /// Single-shot completion with a crafted user prompt and no stored history.
    async fn complete_once(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PersonaError> {
        let req = [ChatMessage::user().content(user_prompt).build()];
        self.complete(system_prompt, &req).await
    }

    /// Model identifier, used for logging.
    fn model(&self) -> &str;
}

/// Asks for content ideas about `topic`.
pub async fn generate_ideas(
    provider: &dyn CompletionProvider,
    topic: &str,
) -> Result<String, PersonaError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(PersonaError::EmptyInput("Please enter a topic".into()));
    }
    provider
        .complete_once(IDEAS_SYSTEM_PROMPT, &format!("Suggest content ideas for: {topic}"))
        .await
}

/// Summarizes a conversation. An empty conversation short-circuits without a call.
pub async fn summarize(
    provider: &dyn CompletionProvider,
    messages: &[ChatMessage],
) -> Result<String, PersonaError> {
    if messages.is_empty() {
        return Ok("No messages to summarize.".into());
    }
    provider
        .complete_once(SUMMARY_SYSTEM_PROMPT, &crate::chat::transcript(messages))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(String, Vec<ChatMessage>)>>,
    }

    #[async_trait]
    impl CompletionProvider for Recorder {
        async fn complete(
            &self,
            system_prompt: &str,
            history: &[ChatMessage],
        ) -> Result<String, PersonaError> {
            self.calls
                .lock()
                .unwrap()
                .push((system_prompt.to_string(), history.to_vec()));
            Ok("reply".into())
        }

        fn model(&self) -> &str {
            "recorder"
        }
    }

    #[tokio::test]
    async fn blank_topic_makes_no_call() {
        let rec = Recorder::default();
        let err = generate_ideas(&rec, "   ").await.unwrap_err();
        assert!(err.is_warning());
        assert!(rec.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn ideas_prompt_shape() {
        let rec = Recorder::default();
        generate_ideas(&rec, " fitness ").await.unwrap();
        let calls = rec.calls.lock().unwrap();
        assert_eq!(calls[0].0, IDEAS_SYSTEM_PROMPT);
        assert_eq!(calls[0].1[0].content, "Suggest content ideas for: fitness");
    }

    #[tokio::test]
    async fn empty_summary_short_circuits() {
        let rec = Recorder::default();
        let text = summarize(&rec, &[]).await.unwrap();
        assert_eq!(text, "No messages to summarize.");
        assert!(rec.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn summary_sends_transcript() {
        let rec = Recorder::default();
        let msgs = vec![
            ChatMessage::user().content("Hi").build(),
            ChatMessage::assistant().content("Hello!").build(),
        ];
        summarize(&rec, &msgs).await.unwrap();
        let calls = rec.calls.lock().unwrap();
        assert_eq!(calls[0].0, SUMMARY_SYSTEM_PROMPT);
        assert_eq!(calls[0].1[0].content, "User: Hi\nAI: Hello!\n");
    }
}
