//! Question and answer types.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Shared validation callback for free-text answers.
pub type Validator = Arc<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

/// Answers keyed by question id.
pub type Answers = HashMap<String, Answer>;

/// A single question to put to the operator.
#[derive(Clone)]
pub enum Question {
    /// Free text, optionally pre-filled and validated.
    Text { id: String, label: String, default: Option<String>, validator: Option<Validator> },
    /// Yes/no.
    Confirm { id: String, label: String, default: bool },
    /// Pick one entry from a short list.
    Select { id: String, label: String, choices: Vec<String>, default: usize },
    /// Pick one entry from a list by typing part of it.
    Autocomplete { id: String, label: String, choices: Vec<String> },
}

impl Question {
    /// A plain free-text question with `name` as both id and label.
    pub fn text(name: impl Into<String>) -> Self {
        let name = name.into();
        Question::Text { id: name.clone(), label: name, default: None, validator: None }
    }

    pub fn confirm(id: impl Into<String>, label: impl Into<String>, default: bool) -> Self {
        Question::Confirm { id: id.into(), label: label.into(), default }
    }

    pub fn select(
        id: impl Into<String>,
        label: impl Into<String>,
        choices: Vec<String>,
    ) -> Self {
        Question::Select { id: id.into(), label: label.into(), choices, default: 0 }
    }

    pub fn autocomplete(
        id: impl Into<String>,
        label: impl Into<String>,
        choices: Vec<String>,
    ) -> Self {
        Question::Autocomplete { id: id.into(), label: label.into(), choices }
    }

    pub fn id(&self) -> &str {
        match self {
            Question::Text { id, .. }
            | Question::Confirm { id, .. }
            | Question::Select { id, .. }
            | Question::Autocomplete { id, .. } => id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Question::Text { label, .. }
            | Question::Confirm { label, .. }
            | Question::Select { label, .. }
            | Question::Autocomplete { label, .. } => label,
        }
    }

    /// The answer used when nobody can be asked, if the question has one.
    pub fn default_answer(&self) -> Option<Answer> {
        match self {
            Question::Text { default, .. } => default.clone().map(Answer::Text),
            Question::Confirm { default, .. } => Some(Answer::Bool(*default)),
            Question::Select { choices, default, .. } => {
                choices.get(*default).cloned().map(Answer::Text)
            }
            Question::Autocomplete { .. } => None,
        }
    }

    /// Check a free-text value against the question's validator.
    pub fn validate(&self, value: &str) -> Result<(), String> {
        match self {
            Question::Text { validator: Some(v), .. } => v(value),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Question::Text { id, label, default, validator } => f
                .debug_struct("Text")
                .field("id", id)
                .field("label", label)
                .field("default", default)
                .field("validator", &validator.is_some())
                .finish(),
            Question::Confirm { id, label, default } => f
                .debug_struct("Confirm")
                .field("id", id)
                .field("label", label)
                .field("default", default)
                .finish(),
            Question::Select { id, label, choices, default } => f
                .debug_struct("Select")
                .field("id", id)
                .field("label", label)
                .field("choices", choices)
                .field("default", default)
                .finish(),
            Question::Autocomplete { id, label, choices } => f
                .debug_struct("Autocomplete")
                .field("id", id)
                .field("label", label)
                .field("choices", choices)
                .finish(),
        }
    }
}

/// A typed answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Bool(bool),
}

impl Answer {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Answer::Bool(b) => Some(*b),
            Answer::Text(_) => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Text(s) => write!(f, "{s}"),
            Answer::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Error type for the prompt delegate.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("no answer available for '{0}' in non-interactive mode")]
    MissingAnswer(String),

    #[error("input cancelled by user")]
    Cancelled,

    #[error("invalid answer for '{id}': {message}")]
    Invalid { id: String, message: String },

    #[error("IO error while prompting: {0}")]
    Io(#[from] std::io::Error),
}

/// Interactive prompt delegate: one round-trip for a batch of questions.
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn prompt_many(&self, questions: &[Question]) -> Result<Answers, PromptError>;
}
