//! Command request and result types.

/// Per-call options for [`super::CommandRunner::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandOptions {
    /// Echo output as it arrives. When unset, output is echoed unless a
    /// progress indicator is shown.
    pub realtime: Option<bool>,
    /// Do not print captured stderr when a non-echoed command fails.
    pub silent: bool,
    /// Leave echoed output on screen after the command closes.
    pub keep_output: bool,
}

impl CommandOptions {
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = Some(realtime);
        self
    }

    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    pub fn keep_output(mut self) -> Self {
        self.keep_output = true;
        self
    }
}

/// Outcome of one command. Built once the process has terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_flags() {
        let opts = CommandOptions::default().realtime(false).silent().keep_output();
        assert_eq!(opts.realtime, Some(false));
        assert!(opts.silent);
        assert!(opts.keep_output);
    }

    #[test]
    fn test_default_leaves_realtime_unset() {
        assert_eq!(CommandOptions::default().realtime, None);
    }
}
