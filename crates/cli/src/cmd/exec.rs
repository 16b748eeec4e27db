use super::exit_status;
use crate::ExecArgs;
use provisio_core::config::ResolvedConfig;
use provisio_core::debuglog::DebugLog;
use provisio_core::runner::{CommandOptions, CommandRunner, ProgressIndicator, Spinner};
use tracing::debug;

pub async fn run(cfg: &ResolvedConfig, args: &ExecArgs) {
    let runner =
        CommandRunner::new(cfg.runner).with_debug_log(DebugLog::new(&cfg.debug_log));

    let options = CommandOptions {
        realtime: args.no_realtime.then_some(false),
        silent: args.silent,
        keep_output: args.keep_output,
    };

    let mut spinner = args.spinner.as_deref().map(Spinner::new);
    let echoed = options.realtime.unwrap_or(spinner.is_none());

    let result = runner
        .run(
            &args.command,
            options,
            spinner.as_mut().map(|s| s as &mut dyn ProgressIndicator),
        )
        .await;

    debug!("exec finished with exit code {}", result.exit_code);

    if !echoed && result.success() {
        print!("{}", result.stdout);
    }

    if !result.success() {
        std::process::exit(exit_status(result.exit_code));
    }
}
