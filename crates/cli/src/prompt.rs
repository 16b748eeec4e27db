//! Interactive prompts backed by dialoguer.
//!
//! Questions are rendered on a blocking thread so the async runtime stays
//! free. When stdin is not a terminal (or `--batch` is given) nothing is
//! rendered: questions with a default get it and the rest fail with
//! [`PromptError::MissingAnswer`].

use async_trait::async_trait;
use dialoguer::{theme::ColorfulTheme, Confirm, FuzzySelect, Input, Select};
use provisio_core::questions::{Answer, Answers, PromptError, Prompter, Question};
use std::io::{self, IsTerminal};

#[derive(Debug, Clone, Copy)]
pub struct DialoguerPrompter {
    interactive: bool,
}

impl DialoguerPrompter {
    pub fn new(batch_mode: bool) -> Self {
        Self { interactive: io::stdin().is_terminal() && !batch_mode }
    }
}

#[async_trait]
impl Prompter for DialoguerPrompter {
    async fn prompt_many(&self, questions: &[Question]) -> Result<Answers, PromptError> {
        let questions = questions.to_vec();
        let interactive = self.interactive;
        tokio::task::spawn_blocking(move || ask_all(&questions, interactive))
            .await
            .map_err(|e| PromptError::Io(io::Error::other(e)))?
    }
}

fn ask_all(questions: &[Question], interactive: bool) -> Result<Answers, PromptError> {
    let mut answers = Answers::new();
    for question in questions {
        let answer = if interactive {
            ask(question)?
        } else {
            answer_unattended(question)?
        };
        answers.insert(question.id().to_string(), answer);
    }
    Ok(answers)
}

fn answer_unattended(question: &Question) -> Result<Answer, PromptError> {
    let answer = question
        .default_answer()
        .ok_or_else(|| PromptError::MissingAnswer(question.id().to_string()))?;
    if let Answer::Text(value) = &answer {
        question
            .validate(value)
            .map_err(|message| PromptError::Invalid { id: question.id().to_string(), message })?;
    }
    Ok(answer)
}

fn ask(question: &Question) -> Result<Answer, PromptError> {
    let theme = ColorfulTheme::default();

    match question {
        Question::Text { label, default, validator, .. } => {
            let mut input = Input::<String>::with_theme(&theme).with_prompt(label);
            if let Some(default) = default {
                input = input.default(default.clone());
            }
            if let Some(validator) = validator.clone() {
                input = input.validate_with(move |value: &String| validator(value.as_str()));
            }
            input.interact_text().map(Answer::Text).map_err(dialoguer_error_to_prompt_error)
        }
        Question::Confirm { label, default, .. } => Confirm::with_theme(&theme)
            .with_prompt(label)
            .default(*default)
            .interact()
            .map(Answer::Bool)
            .map_err(dialoguer_error_to_prompt_error),
        Question::Select { id, label, choices, default } => {
            if choices.is_empty() {
                return Err(no_choices(id));
            }
            let index = Select::with_theme(&theme)
                .with_prompt(label)
                .items(choices)
                .default(*default)
                .interact()
                .map_err(dialoguer_error_to_prompt_error)?;
            Ok(Answer::Text(choices[index].clone()))
        }
        Question::Autocomplete { id, label, choices } => {
            if choices.is_empty() {
                return Err(no_choices(id));
            }
            let index = FuzzySelect::with_theme(&theme)
                .with_prompt(label)
                .items(choices)
                .interact()
                .map_err(dialoguer_error_to_prompt_error)?;
            Ok(Answer::Text(choices[index].clone()))
        }
    }
}

fn no_choices(id: &str) -> PromptError {
    PromptError::Invalid { id: id.to_string(), message: "no choices available".to_string() }
}

/// Convert dialoguer error to our PromptError.
fn dialoguer_error_to_prompt_error(e: dialoguer::Error) -> PromptError {
    match e {
        dialoguer::Error::IO(io_err) => {
            if io_err.kind() == io::ErrorKind::UnexpectedEof
                || io_err.kind() == io::ErrorKind::Interrupted
            {
                PromptError::Cancelled
            } else {
                PromptError::Io(io_err)
            }
        }
    }
}
