//! Shell script assembly.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::render::substitute_macros;
use crate::answers::MacroValues;

/// Heredoc terminator wrapping each query.
const QUERY_EOF: &str = "PROVISIO_QUERY";

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read query file {path}: {source}")]
    ReadQuery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write script {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Builds one bash script that feeds each rendered query to `query_command`.
#[derive(Debug)]
pub struct ScriptBuilder {
    query_command: String,
    environment: Option<String>,
    blocks: Vec<String>,
}

impl ScriptBuilder {
    pub fn new(query_command: impl Into<String>) -> Self {
        Self { query_command: query_command.into(), environment: None, blocks: Vec::new() }
    }

    /// Export `PROVISIO_ENV` at the top of the script.
    pub fn environment(mut self, env: Option<String>) -> Self {
        self.environment = env;
        self
    }

    /// Append one query, labelled with `label`, after macro substitution.
    pub fn add_query(&mut self, label: &str, text: &str, values: &MacroValues) {
        let rendered = substitute_macros(text, values);
        let body = rendered.strip_suffix('\n').unwrap_or(&rendered);
        self.blocks.push(format!(
            "# {label}\n{cmd} <<'{QUERY_EOF}'\n{body}\n{QUERY_EOF}\n",
            cmd = self.query_command
        ));
    }

    /// Read `path` and append it, labelled relative to `root`.
    pub fn add_query_file(
        &mut self,
        root: &Path,
        path: &Path,
        values: &MacroValues,
    ) -> Result<(), ScriptError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ScriptError::ReadQuery { path: path.to_path_buf(), source })?;
        let label = path.strip_prefix(root).unwrap_or(path).display().to_string();
        self.add_query(&label, &text, values);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn build(&self) -> String {
        let mut script = String::from("#!/usr/bin/env bash\nset -euo pipefail\n");
        if let Some(env) = &self.environment {
            script.push_str(&format!("export PROVISIO_ENV={}\n", shell_quote(env)));
        }
        for block in &self.blocks {
            script.push('\n');
            script.push_str(block);
        }
        script
    }
}

/// Write `contents` to `path` and make it executable.
pub fn write_script(path: &Path, contents: &str) -> Result<(), ScriptError> {
    let err = |source| ScriptError::Write { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(err)?;
    }
    fs::write(path, contents).map_err(err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(err)?;
    }

    Ok(())
}

/// Quote `value` for a POSIX shell.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_script() {
        let mut values = MacroValues::new();
        values.insert("schema".into(), "ops".into());

        let mut builder =
            ScriptBuilder::new("psql -f -").environment(Some("prod".into()));
        builder.add_query("init/schema.sql", "create schema {schema};\n", &values);

        assert_eq!(
            builder.build(),
            "#!/usr/bin/env bash\nset -euo pipefail\nexport PROVISIO_ENV='prod'\n\n\
             # init/schema.sql\npsql -f - <<'PROVISIO_QUERY'\ncreate schema ops;\nPROVISIO_QUERY\n"
        );
    }

    #[test]
    fn test_empty_builder() {
        let builder = ScriptBuilder::new("true");
        assert!(builder.is_empty());
        assert_eq!(builder.build(), "#!/usr/bin/env bash\nset -euo pipefail\n");
    }

    #[test]
    fn test_shell_quote_escapes_single_quotes() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_add_query_file_labels_relative_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("views/report.sql");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "select 1;").unwrap();

        let mut builder = ScriptBuilder::new("cat");
        builder.add_query_file(dir.path(), &path, &MacroValues::new()).unwrap();

        assert!(builder.build().contains("# views/report.sql\ncat <<'PROVISIO_QUERY'\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_script_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/deploy.sh");
        write_script(&path, "#!/bin/sh\n").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        assert_eq!(fs::read_to_string(&path).unwrap(), "#!/bin/sh\n");
    }
}
