use std::cell::RefCell;
use std::rc::Rc;

use standout_command::{exit, handler, lookup, Command, Context, Handler, OptionSet};

struct Captured {
    code: i32,
    stdout: String,
    stderr: String,
}

fn run(root: &Command, args: &[&str]) -> Captured {
    run_in(root, &Context::new(), args)
}

fn run_in(root: &Command, ctx: &Context, args: &[&str]) -> Captured {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = root.run_with(ctx, args.iter().copied(), &mut stdout, &mut stderr);
    Captured {
        code,
        stdout: String::from_utf8(stdout).unwrap(),
        stderr: String::from_utf8(stderr).unwrap(),
    }
}

/// Records what the handler saw.
#[derive(Default, Debug, Clone, PartialEq)]
struct Seen {
    verbose: Option<bool>,
    args: Vec<String>,
}

fn recorder(seen: &Rc<RefCell<Seen>>, code: i32) -> Handler {
    let seen = Rc::clone(seen);
    handler(move |_ctx, options, args| {
        *seen.borrow_mut() = Seen {
            verbose: options.get::<bool>("verbose").ok(),
            args: args.to_vec(),
        };
        code
    })
}

fn github(seen: &Rc<RefCell<Seen>>) -> Command {
    Command::new("github")
        .help("Example command")
        .options(|o| {
            o.flag("verbose", false, "Enable verbose output");
        })
        .subcommand("repos", |repos| {
            repos.help("Manage GitHub repositories").subcommand("list", |list| {
                list.help("List repositories of a GitHub user")
                    .options(|o| {
                        o.string("user", "", "GitHub user");
                    })
                    .with_handler(recorder(seen, exit::SUCCESS))
            })
        })
}

// ============================================================================
// Option inheritance
// ============================================================================

#[test]
fn test_root_flag_visible_in_child_handler() {
    let seen = Rc::new(RefCell::new(Seen::default()));
    let root = Command::new("app")
        .options(|o| {
            o.flag("verbose", false, "Verbose");
        })
        .subcommand("list", |list| list.with_handler(recorder(&seen, 0)));

    let result = run(&root, &["-verbose", "list"]);

    assert_eq!(result.code, exit::SUCCESS);
    assert_eq!(seen.borrow().verbose, Some(true));
}

#[test]
fn test_inherited_flag_keeps_default_when_not_given() {
    let seen = Rc::new(RefCell::new(Seen::default()));
    let root = github(&seen);

    run(&root, &["repos", "list"]);

    assert_eq!(seen.borrow().verbose, Some(false));
}

#[test]
fn test_handler_reads_own_and_inherited_options() {
    let root = Command::new("app")
        .options(|o| {
            o.string("level", "info", "Level");
        })
        .subcommand("show", |show| {
            show.options(|o| {
                o.int("limit", 10, "Limit");
            })
            .action(|_ctx, options, _args| {
                let level = lookup::<String>(options, "level");
                let limit = lookup::<i64>(options, "limit");
                if level == "debug" && limit == 3 {
                    0
                } else {
                    1
                }
            })
        });

    assert_eq!(run(&root, &["-level=debug", "show", "-limit", "3"]).code, 0);
    assert_eq!(run(&root, &["show", "-limit", "3"]).code, 1);
}

// ============================================================================
// Descent
// ============================================================================

#[test]
fn test_longest_match_descent() {
    let seen = Rc::new(RefCell::new(Seen::default()));
    let root = github(&seen);

    let result = run(&root, &["repos", "list", "extra"]);

    assert_eq!(result.code, exit::SUCCESS);
    assert_eq!(seen.borrow().args, ["extra"]);
}

#[test]
fn test_positional_after_double_dash() {
    let seen = Rc::new(RefCell::new(Seen::default()));
    let root = github(&seen);

    run(&root, &["repos", "list", "--", "-not-an-option"]);

    assert_eq!(seen.borrow().args, ["-not-an-option"]);
}

#[test]
fn test_handler_with_children_gets_unmatched_tokens() {
    let seen = Rc::new(RefCell::new(Seen::default()));
    let root = Command::new("app")
        .with_handler(recorder(&seen, 0))
        .subcommand("sub", |sub| sub.action(|_, _, _| 7));

    assert_eq!(run(&root, &["other", "sub"]).code, 0);
    assert_eq!(seen.borrow().args, ["other", "sub"]);

    assert_eq!(run(&root, &["sub"]).code, 7);
}

// ============================================================================
// Namespaces and unknown commands
// ============================================================================

#[test]
fn test_unrecognized_command() {
    let root = Command::new("app").subcommand("repos", |r| r.action(|_, _, _| 0));

    let result = run(&root, &["foo"]);

    assert_eq!(result.code, exit::USAGE);
    assert!(result.stdout.is_empty());
    assert!(result.stderr.contains("foo"));
    assert!(result
        .stderr
        .starts_with("command provided but not defined: foo\n"));
    assert!(result.stderr.contains("Usage: app [OPTIONS] COMMAND"));
}

#[test]
fn test_unrecognized_nested_command() {
    let seen = Rc::new(RefCell::new(Seen::default()));
    let root = github(&seen);

    let result = run(&root, &["repos", "delete"]);

    assert_eq!(result.code, exit::USAGE);
    assert!(result
        .stderr
        .contains("Usage: github repos [OPTIONS] COMMAND"));
}

#[test]
fn test_empty_namespace_invocation() {
    let root = Command::new("app").subcommand("repos", |r| r.action(|_, _, _| 0));

    let result = run(&root, &[]);

    assert_eq!(result.code, exit::SUCCESS);
    assert!(result.stderr.is_empty());
    assert_eq!(
        result.stdout,
        "Usage: app [OPTIONS] COMMAND\n\nSubcommands:\n  repos\n"
    );
}

#[test]
fn test_nested_namespace_invocation() {
    let seen = Rc::new(RefCell::new(Seen::default()));
    let root = github(&seen);

    let result = run(&root, &["-verbose", "repos"]);

    assert_eq!(result.code, exit::SUCCESS);
    assert!(result
        .stdout
        .starts_with("Usage: github repos [OPTIONS] COMMAND\n"));
    assert_eq!(*seen.borrow(), Seen::default());
}

// ============================================================================
// Option errors
// ============================================================================

#[test]
fn test_unknown_option_exit_code() {
    let seen = Rc::new(RefCell::new(Seen::default()));
    let root = github(&seen);

    let result = run(&root, &["repos", "list", "-nope"]);

    assert_eq!(result.code, exit::USAGE);
    assert!(result
        .stderr
        .starts_with("flag provided but not defined: -nope\n"));
    assert!(result
        .stderr
        .contains("Usage: github repos list [OPTIONS]\n"));
    assert_eq!(*seen.borrow(), Seen::default());
}

#[test]
fn test_invalid_value_exit_code() {
    let root = Command::new("app")
        .options(|o| {
            o.uint("count", 1, "Count");
        })
        .action(|_, _, _| 0);

    let result = run(&root, &["-count=-3"]);

    assert_eq!(result.code, exit::USAGE);
    assert!(result.stderr.contains("invalid value \"-3\" for flag -count"));
}

#[test]
fn test_missing_value_exit_code() {
    let root = Command::new("app")
        .options(|o| {
            o.string("user", "", "User");
        })
        .action(|_, _, _| 0);

    let result = run(&root, &["-user"]);

    assert_eq!(result.code, exit::USAGE);
    assert!(result
        .stderr
        .starts_with("flag needs an argument: -user\n"));
}

#[test]
fn test_bad_flag_syntax_exit_code() {
    let root = Command::new("app").action(|_, _, _| 0);

    for token in ["---", "-=x"] {
        let result = run(&root, &[token]);
        assert_eq!(result.code, exit::USAGE, "{token}");
        assert!(result
            .stderr
            .starts_with(&format!("bad flag syntax: {token}\n")));
    }
}

#[test]
fn test_out_of_range_duration_exit_code() {
    let root = Command::new("app")
        .options(|o| {
            o.duration("timeout", std::time::Duration::from_secs(1), "Timeout");
        })
        .action(|_, _, _| 0);

    let result = run(&root, &["-timeout=99999999999999999999h"]);

    assert_eq!(result.code, exit::USAGE);
    assert!(result.stderr.contains("for flag -timeout"));
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn test_help_flag_on_leaf() {
    let seen = Rc::new(RefCell::new(Seen::default()));
    let root = github(&seen);

    let result = run(&root, &["repos", "list", "-h"]);

    assert_eq!(result.code, exit::SUCCESS);
    assert!(result.stderr.is_empty());
    assert!(result.stdout.contains("List repositories of a GitHub user"));
    assert!(result.stdout.contains("  -user string\n"));
    assert!(result.stdout.contains("  -verbose\n"));
    assert_eq!(*seen.borrow(), Seen::default());
}

// ============================================================================
// Handlers, middlewares and context
// ============================================================================

#[test]
fn test_handler_code_passes_through() {
    let root = Command::new("app").action(|_, _, _| exit::FAILURE);
    assert_eq!(run(&root, &[]).code, exit::FAILURE);

    let root = Command::new("app")
        .middleware(|next| next)
        .middleware(|next| {
            handler(move |ctx, options, args| {
                let code = next(ctx, options, args);
                assert_eq!(code, exit::FAILURE);
                code
            })
        })
        .action(|_, _, _| exit::FAILURE);
    assert_eq!(run(&root, &[]).code, exit::FAILURE);
}

fn level_guard(next: Handler) -> Handler {
    handler(move |ctx, options: &OptionSet, args| {
        match options.lookup::<String>("level").as_str() {
            "debug" | "info" | "warn" | "error" => next(ctx, options, args),
            _ => exit::FAILURE,
        }
    })
}

#[test]
fn test_middleware_short_circuits_on_inherited_option() {
    let called = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&called);

    let root = Command::new("app")
        .options(|o| {
            o.string("level", "info", "Minimum level of logs to display");
        })
        .subcommand("info", |info| {
            info.middleware(level_guard).action(move |_, _, _| {
                *flag.borrow_mut() = true;
                0
            })
        });

    assert_eq!(run(&root, &["-level=loud", "info"]).code, exit::FAILURE);
    assert!(!*called.borrow());

    assert_eq!(run(&root, &["-level=warn", "info"]).code, exit::SUCCESS);
    assert!(*called.borrow());
}

#[test]
fn test_parent_middleware_does_not_wrap_children() {
    let root = Command::new("app")
        .middleware(|_next| handler(|_, _, _| 42))
        .action(|_, _, _| 0)
        .subcommand("child", |c| c.action(|_, _, _| 5));

    assert_eq!(run(&root, &[]).code, 42);
    assert_eq!(run(&root, &["child"]).code, 5);
}

#[test]
fn test_context_reaches_handler() {
    struct Token(&'static str);

    let root = Command::new("app").action(|ctx, _, _| {
        match (ctx.extensions.get::<Token>(), ctx.is_cancelled()) {
            (Some(Token("secret")), true) => 0,
            _ => 1,
        }
    });

    let ctx = Context::new().with(Token("secret"));
    ctx.cancel();

    assert_eq!(run_in(&root, &ctx, &[]).code, 0);
}
