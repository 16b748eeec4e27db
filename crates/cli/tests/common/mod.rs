#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;

pub fn write(dir: &Path, rel: &str, content: impl AsRef<str>) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content.as_ref()).unwrap();
}

/// Config whose templates live in `<root>/templates` and scripts in `<root>/scripts`.
pub fn make_config(root: &Path, extra: &str) -> String {
    format!(
        r#"
version = 1
profile = "test"

[profiles.test]
templates_dir = "{root}/templates"
scripts_dir = "{{{{templates_dir}}}}/../scripts"
query_command = "cat"

[runner]
debug_log = "{root}/debug.log"
{extra}
"#,
        root = root.display()
    )
}

pub fn provisio(config: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("provisio"));
    cmd.env("NO_COLOR", "1").arg("--config").arg(config);
    cmd
}
