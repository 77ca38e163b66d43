//! LLM provider implementations

#[cfg(feature = "llm-huggingface")]
pub mod huggingface;

#[cfg(feature = "llm-huggingface")]
pub use huggingface::HuggingFaceProvider;

#[cfg(feature = "llm-ollama")]
pub mod ollama;

#[cfg(feature = "llm-ollama")]
pub use ollama::OllamaProvider;
