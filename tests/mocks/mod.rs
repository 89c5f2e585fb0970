//! Mock infrastructure for testing external services
//!
//! Only one external dependency exists: the Gemini `generateContent` API.

pub mod gemini;

pub use gemini::*;
