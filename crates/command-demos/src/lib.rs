//! Command trees for the demo binaries.
//!
//! - `echo`: prints its arguments, optionally upper- or lowercased
//! - `log-level`: logs its arguments at info or error level, filtered by the
//!   root `-level` option

use standout_command::{exit, handler, Command, Handler};
use tracing::level_filters::LevelFilter;

/// `echo [-verbose] echo [-case upper|lower] words...`
pub fn echo_app(name: &str) -> Command {
    Command::new(name)
        .help("Example command")
        .options(|o| {
            o.flag("verbose", false, "Enable verbose output");
        })
        .subcommand("echo", |echo| {
            echo.help("Print the arguments")
                .options(|o| {
                    o.string("case", "", "Case to use (upper, lower)");
                })
                .action(|_ctx, options, args| {
                    let case = options.lookup::<String>("case");
                    if options.lookup::<bool>("verbose") {
                        println!("command echo called with case: {case}");
                    }
                    println!("{}", apply_case(&case, args));
                    exit::SUCCESS
                })
        })
}

/// Joins `args` with spaces and applies `case` (`upper`, `lower`, anything
/// else leaves the text alone).
pub fn apply_case(case: &str, args: &[String]) -> String {
    let text = args.join(" ");
    match case {
        "upper" => text.to_uppercase(),
        "lower" => text.to_lowercase(),
        _ => text,
    }
}

/// `log-level [-level debug|info|warn|error] info|error words...`
pub fn log_level_app(name: &str) -> Command {
    Command::new(name)
        .options(|o| {
            o.string("level", "info", "Minimum level of logs to display");
        })
        .subcommand("info", |info| {
            info.help("Log the arguments at info level")
                .middleware(level_middleware)
                .action(|_ctx, _options, args| {
                    tracing::info!("{}", args.join(" "));
                    exit::SUCCESS
                })
        })
        .subcommand("error", |error| {
            error
                .help("Log the arguments at error level")
                .middleware(level_middleware)
                .action(|_ctx, _options, args| {
                    tracing::error!("{}", args.join(" "));
                    exit::SUCCESS
                })
        })
}

/// Maps a `-level` value to a filter.
pub fn level_filter(level: &str) -> Option<LevelFilter> {
    match level {
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        _ => None,
    }
}

/// Installs a stderr subscriber at the level given by `-level`, or fails
/// with exit code 1 on an unknown level.
pub fn level_middleware(next: Handler) -> Handler {
    handler(move |ctx, options, args| {
        let level = options.lookup::<String>("level");
        let Some(filter) = level_filter(&level) else {
            eprintln!("Unknown level: {level}");
            return exit::FAILURE;
        };

        // A subscriber may already be installed (tests, embedding); keep it.
        let _ = tracing_subscriber::fmt()
            .with_max_level(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();

        next(ctx, options, args)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use standout_command::Context;

    fn run(root: &Command, args: &[&str]) -> (i32, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = root.run_with(&Context::new(), args.iter().copied(), &mut out, &mut err);
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_apply_case() {
        let args = vec!["Hello".to_string(), "World".to_string()];
        assert_eq!(apply_case("upper", &args), "HELLO WORLD");
        assert_eq!(apply_case("lower", &args), "hello world");
        assert_eq!(apply_case("", &args), "Hello World");
    }

    #[test]
    fn test_echo_tree() {
        let root = echo_app("echo");
        let res = root
            .resolve(["-verbose", "echo", "-case=upper", "hi"])
            .unwrap();

        assert_eq!(res.command_path(), ["echo", "echo"]);
        assert!(res.options().lookup::<bool>("verbose"));
        assert_eq!(res.options().lookup::<String>("case"), "upper");
        assert_eq!(res.args(), ["hi"]);
    }

    #[test]
    fn test_echo_root_prints_usage() {
        let (code, out) = run(&echo_app("echo"), &[]);
        assert_eq!(code, exit::SUCCESS);
        assert!(out.starts_with("Usage: echo [OPTIONS] COMMAND\n"));
    }

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter("debug"), Some(LevelFilter::DEBUG));
        assert_eq!(level_filter("error"), Some(LevelFilter::ERROR));
        assert_eq!(level_filter("loud"), None);
    }

    #[test]
    fn test_unknown_level_short_circuits() {
        let (code, _) = run(&log_level_app("log-level"), &["-level=loud", "info", "x"]);
        assert_eq!(code, exit::FAILURE);
    }

    #[test]
    fn test_known_level_runs_handler() {
        let (code, _) = run(&log_level_app("log-level"), &["-level=debug", "error", "x"]);
        assert_eq!(code, exit::SUCCESS);
    }
}
