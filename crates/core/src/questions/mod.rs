//! Typed question descriptors and the interactive prompt delegate.
//!
//! Callers describe what they need as [`Question`] values and hand a batch of
//! them to a [`Prompter`]. The CLI renders them with dialoguer; tests use
//! scripted prompters.

mod types;

pub use types::{Answer, Answers, PromptError, Prompter, Question, Validator};
