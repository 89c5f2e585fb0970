//! Model client module
//!
//! Handles the calls to the hosted language model.

pub mod gemini;
pub mod provider;

pub use gemini::{GeminiClient, GeminiFactory};
pub use provider::{ChatModel, ModelError, ModelFactory, ModelSettings};
