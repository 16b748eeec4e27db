pub mod doctor;
pub mod exec;
pub mod provision;
pub mod resolve;

use provisio_core::answers::AnswerFile;
use std::path::Path;

/// Load the answers file if one was given, exiting on failure.
pub fn load_answers(path: Option<&Path>) -> AnswerFile {
    let Some(path) = path else {
        return AnswerFile::default();
    };
    match AnswerFile::load(path) {
        Ok(file) => {
            tracing::debug!("loaded answers from {}", path.display());
            file
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

/// Save the answers file if one was requested, exiting on failure.
pub fn save_answers(path: Option<&Path>, answers: &AnswerFile) {
    let Some(path) = path else {
        return;
    };
    if let Err(e) = answers.save(path) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
    tracing::debug!("saved answers to {}", path.display());
}

/// Map a command's exit code to a process exit status.
pub fn exit_status(code: i32) -> i32 {
    if code < 0 { 1 } else { code }
}
