//! Text-generation backend for category commentary.
//!
//! - `TextGenerator`: the seam the dispatcher calls through
//! - `GeminiClient`: HTTP implementation against the Gemini `generateContent` API
//! - `MockGenerator`: deterministic replies for tests and offline demos
//! - `CommentaryDispatcher`: one task per category, outcomes returned over a channel

pub mod client;
pub mod config;
pub mod dispatcher;
mod generator;
mod mock;
pub mod types;

pub use client::*;
pub use config::*;
pub use dispatcher::CommentaryDispatcher;
pub use generator::TextGenerator;
pub use mock::MockGenerator;
pub use types::*;
