use provisio_core::config::{default_config_path, ConfigLoader};
use provisio_core::macros::namespaces;
use std::path::Path;

pub fn run(config: Option<&Path>, profile: Option<&str>, debug: bool, diagnostic: bool) {
    match ConfigLoader::load(config, profile) {
        Ok(rc) => {
            let rc = rc.with_runner_overrides(debug, diagnostic);
            println!("OK   provisio doctor");
            println!(
                "path: {}",
                config.map_or_else(
                    || default_config_path().display().to_string(),
                    |p| p.display().to_string()
                )
            );
            println!("profile: {}", rc.active_profile);
            println!("templates_dir: {}", rc.templates_dir.display());
            println!("scripts_dir: {}", rc.scripts_dir.display());
            println!("query_command: {}", rc.query_command);
            println!("macros.extension: {}", rc.macros.extension);
            println!("macros.functions_marker: {}", rc.macros.functions_marker);
            println!("runner.debug: {}", rc.runner.debug);
            println!("runner.diagnostic: {}", rc.runner.diagnostic);
            println!("runner.debug_log: {}", rc.debug_log.display());
            let found = namespaces(&rc.templates_dir);
            if found.is_empty() {
                println!("namespaces: (none)");
            } else {
                println!("namespaces: {}", found.join(", "));
            }
        }
        Err(e) => {
            println!("FAIL provisio doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    }
}
