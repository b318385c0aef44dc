/// Groq's hosted Llama models behind an OpenAI-compatible endpoint
pub mod groq;
