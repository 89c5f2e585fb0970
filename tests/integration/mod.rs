//! Integration tests for the TanyaKakGem service
//!
//! These tests drive the real router through `axum-test` with a wiremock
//! stand-in for Gemini, covering complete turns from HTTP request to
//! stored transcript.

mod health;
mod sessions;
