use super::{load_answers, save_answers};
use crate::prompt::DialoguerPrompter;
use crate::ResolveArgs;
use provisio_core::config::ResolvedConfig;
use provisio_core::macros::MacroResolver;
use std::sync::Arc;

pub async fn run(cfg: &ResolvedConfig, args: &ResolveArgs, batch: bool) {
    let namespace = args.namespace.clone().unwrap_or_else(|| {
        args.dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "default".to_string())
    });

    let mut answers = load_answers(args.answers.answers.as_deref());
    let resolver = MacroResolver::new(&cfg.macros, Arc::new(DialoguerPrompter::new(batch)));

    let values = match resolver.resolve(&args.dir, &mut answers.macros, &namespace).await {
        Ok(values) => values,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&values) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }

    save_answers(args.answers.save_answers.as_deref(), &answers);
}
