//! Resolve every namespace under the templates directory and write one
//! provisioning script per namespace, optionally running them.

use super::{exit_status, load_answers, save_answers};
use crate::prompt::DialoguerPrompter;
use crate::ProvisionArgs;
use provisio_core::answers::AnswerFile;
use provisio_core::config::ResolvedConfig;
use provisio_core::debuglog::DebugLog;
use provisio_core::macros::{namespaces, MacroResolver, QueryFiles};
use provisio_core::questions::{Answer, PromptError, Prompter, Question};
use provisio_core::runner::{CommandOptions, CommandRunner};
use provisio_core::scripts::{shell_quote, write_script, ScriptBuilder};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

const ENVIRONMENT_KEY: &str = "environment";
const NAMESPACE_KEY: &str = "namespace";
const RUN_KEY: &str = "run";

pub async fn run(cfg: &ResolvedConfig, args: &ProvisionArgs, batch: bool) {
    let prompter: Arc<dyn Prompter> = Arc::new(DialoguerPrompter::new(batch));
    let mut answers = load_answers(args.answers.answers.as_deref());

    let scripts = match generate(cfg, args, &prompter, &mut answers).await {
        Ok(scripts) => scripts,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    if args.run && !scripts.is_empty() {
        let code = match run_scripts(cfg, prompter.as_ref(), &scripts, &mut answers).await {
            Ok(code) => code,
            Err(e) => {
                eprintln!("error: {e}");
                1
            }
        };
        save_answers(args.answers.save_answers.as_deref(), &answers);
        if code != 0 {
            std::process::exit(exit_status(code));
        }
        return;
    }

    save_answers(args.answers.save_answers.as_deref(), &answers);
}

async fn generate(
    cfg: &ResolvedConfig,
    args: &ProvisionArgs,
    prompter: &Arc<dyn Prompter>,
    answers: &mut AnswerFile,
) -> Result<Vec<PathBuf>, String> {
    let available = namespaces(&cfg.templates_dir);
    if available.is_empty() {
        return Err(format!("no namespaces found under {}", cfg.templates_dir.display()));
    }

    let selected = select_namespaces(args, prompter.as_ref(), available, answers).await?;
    let environment = select_environment(cfg, prompter.as_ref(), answers).await?;

    let resolver = MacroResolver::new(&cfg.macros, Arc::clone(prompter));
    let out_dir = args.out_dir.clone().unwrap_or_else(|| cfg.scripts_dir.clone());
    let mut scripts = Vec::new();

    for namespace in selected {
        let dir = cfg.templates_dir.join(&namespace);
        let values = resolver
            .resolve(&dir, &mut answers.macros, &namespace)
            .await
            .map_err(|e| e.to_string())?;

        let mut builder =
            ScriptBuilder::new(cfg.query_command.clone()).environment(environment.clone());
        for path in QueryFiles::new(&dir, &cfg.macros.extension).sorted() {
            builder.add_query_file(&dir, &path, &values).map_err(|e| e.to_string())?;
        }

        if builder.is_empty() {
            info!("No query files in {}, skipping", dir.display());
            continue;
        }

        let script_path = out_dir.join(format!("{namespace}.sh"));
        write_script(&script_path, &builder.build()).map_err(|e| e.to_string())?;
        println!("OK   wrote {}", script_path.display());
        scripts.push(script_path);
    }

    Ok(scripts)
}

async fn select_namespaces(
    args: &ProvisionArgs,
    prompter: &dyn Prompter,
    available: Vec<String>,
    answers: &mut AnswerFile,
) -> Result<Vec<String>, String> {
    if let Some(only) = &args.only {
        if !available.contains(only) {
            return Err(format!("namespace '{only}' not found"));
        }
        return Ok(vec![only.clone()]);
    }

    if !args.pick {
        return Ok(available);
    }

    let question = Question::autocomplete(NAMESPACE_KEY, "Namespace to provision", available);
    let picked = ask_one(prompter, question).await.map_err(|e| e.to_string())?.to_string();
    answers.set_extra(NAMESPACE_KEY, &picked);
    Ok(vec![picked])
}

async fn select_environment(
    cfg: &ResolvedConfig,
    prompter: &dyn Prompter,
    answers: &mut AnswerFile,
) -> Result<Option<String>, String> {
    if cfg.environments.is_empty() {
        return Ok(None);
    }

    let saved = answers
        .extra
        .get(ENVIRONMENT_KEY)
        .and_then(|v| v.as_str())
        .filter(|env| cfg.environments.iter().any(|e| e == *env))
        .map(ToOwned::to_owned);

    let environment = match saved {
        Some(env) => {
            debug!("using saved environment {env}");
            env
        }
        None => {
            let question =
                Question::select(ENVIRONMENT_KEY, "Environment", cfg.environments.clone());
            ask_one(prompter, question).await.map_err(|e| e.to_string())?.to_string()
        }
    };

    answers.set_extra(ENVIRONMENT_KEY, &environment);
    Ok(Some(environment))
}

/// Confirm, then run each script in order. Returns the first non-zero exit code.
async fn run_scripts(
    cfg: &ResolvedConfig,
    prompter: &dyn Prompter,
    scripts: &[PathBuf],
    answers: &mut AnswerFile,
) -> Result<i32, PromptError> {
    let label = format!("Run {} generated script(s) now?", scripts.len());
    let confirmed = ask_one(prompter, Question::confirm(RUN_KEY, label, true))
        .await?
        .as_bool()
        .unwrap_or(false);
    answers.set_extra(RUN_KEY, confirmed);

    if !confirmed {
        info!("Scripts left unexecuted");
        return Ok(0);
    }

    let runner =
        CommandRunner::new(cfg.runner).with_debug_log(DebugLog::new(&cfg.debug_log));
    let options = CommandOptions::default().realtime(true).keep_output();

    for script in scripts {
        info!("Running {}", script.display());
        let command = shell_quote(&script.to_string_lossy());
        let result = runner.run(&command, options, None).await;
        if !result.success() {
            eprintln!("FAIL {} exited with {}", script.display(), result.exit_code);
            return Ok(result.exit_code);
        }
    }

    Ok(0)
}

async fn ask_one(prompter: &dyn Prompter, question: Question) -> Result<Answer, PromptError> {
    let id = question.id().to_string();
    let mut answers = prompter.prompt_many(std::slice::from_ref(&question)).await?;
    answers.remove(&id).ok_or(PromptError::MissingAnswer(id))
}
