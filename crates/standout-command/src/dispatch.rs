//! Command dispatch.
//!
//! Dispatch walks the argument list down the command tree:
//!
//! ```text
//! args = ["-verbose", "repos", "list", "-user=me", "extra"]
//!
//! github   parses "-verbose"            next token "repos" is a child → descend
//! repos    inherits verbose, parses -   next token "list" is a child  → descend
//! list     inherits verbose, parses "-user=me"
//!          next token "extra" is not a child → stop
//!
//! terminal: list, remaining: ["extra"]
//! ```
//!
//! At each level the command's options are parsed first; the first
//! positional token then either names a child (descend) or ends the walk.
//! Descending copies every option visible at the current level, parsed value
//! included, into the child's options unless the child declares the same
//! name itself.
//!
//! The walk never mutates the tree: each level works on a copy of its
//! declared options, so dispatching the same tree twice with the same
//! arguments always gives the same result.
//!
//! # Outcomes
//!
//! | Terminal command | Remaining tokens | Result |
//! |------------------|------------------|--------|
//! | has a handler | any | handler's return value |
//! | no handler | none | usage on stdout, [`exit::SUCCESS`] |
//! | no handler | some | diagnostic + usage on stderr, [`exit::USAGE`] |
//! | option error | - | diagnostic + usage on stderr, [`exit::USAGE`] |
//! | `-h` / `-help` | - | usage on stdout, [`exit::SUCCESS`] |

use std::io::{self, Write};

use crate::command::Command;
use crate::context::Context;
use crate::error::DispatchError;
use crate::middleware::compose;
use crate::options::OptionSet;
use crate::usage;

/// Conventional process exit codes.
pub mod exit {
    /// Success, or a namespace invoked without a subcommand.
    pub const SUCCESS: i32 = 0;
    /// Reserved for handlers reporting a failure of their own.
    pub const FAILURE: i32 = 1;
    /// Usage error: bad option, unknown subcommand.
    pub const USAGE: i32 = 2;
}

/// Where a dispatch walk ended.
#[derive(Debug)]
pub struct Resolution<'a> {
    trail: Vec<&'a Command>,
    options: OptionSet,
    args: Vec<String>,
    help_requested: bool,
}

impl<'a> Resolution<'a> {
    /// The terminal command.
    pub fn command(&self) -> &'a Command {
        self.trail[self.trail.len() - 1]
    }

    /// Every command from the root to the terminal one.
    pub fn trail(&self) -> &[&'a Command] {
        &self.trail
    }

    /// Command names from the root to the terminal command.
    pub fn command_path(&self) -> Vec<&'a str> {
        self.trail.iter().map(|c| c.name()).collect()
    }

    /// The terminal command's options, inherited ones included.
    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// Positional arguments left for the handler.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// `-h` or `-help` stopped the walk.
    pub fn help_requested(&self) -> bool {
        self.help_requested
    }

    /// Usage text for the terminal command.
    pub fn usage(&self) -> String {
        usage::render(&self.trail)
    }
}

impl Command {
    /// Walks `args` (program name excluded) down the tree without running
    /// anything.
    ///
    /// Fails when options at some level do not parse, or when the walk ends
    /// at a command without a handler while tokens remain.
    pub fn resolve<I, S>(&self, args: I) -> Result<Resolution<'_>, DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut trail = vec![self];
        let mut current = self;
        let mut options = self.options.clone();
        let mut remaining: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut help_requested = false;

        loop {
            let parsed = options
                .parse(&remaining)
                .map_err(|source| DispatchError::InvalidOptions {
                    path: names(&trail),
                    source,
                })?;
            remaining = parsed.remaining;

            if parsed.help_requested {
                help_requested = true;
                break;
            }

            let Some(child) = remaining.first().and_then(|token| current.child(token)) else {
                break;
            };

            tracing::debug!(parent = current.name(), command = child.name(), "descending");
            let mut inherited = child.options.clone();
            inherited.inherit(&options);
            options = inherited;

            trail.push(child);
            current = child;
            remaining.remove(0);
        }

        if !help_requested && !current.has_handler() {
            if let Some(first) = remaining.first() {
                return Err(DispatchError::UnknownCommand {
                    path: names(&trail),
                    name: first.clone(),
                });
            }
        }

        tracing::debug!(
            command = %names(&trail).join(" "),
            args = remaining.len(),
            help_requested,
            "resolved"
        );

        Ok(Resolution {
            trail,
            options,
            args: remaining,
            help_requested,
        })
    }

    /// Dispatches `args` (program name excluded) and returns the exit code.
    ///
    /// Usage requested by the user goes to `stdout`; diagnostics and usage
    /// after an error go to `stderr`.
    pub fn run_with<I, S>(
        &self,
        ctx: &Context,
        args: I,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> i32
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let resolution = match self.resolve(args) {
            Ok(resolution) => resolution,
            Err(err) => {
                let trail = self.trail(err.path());
                let _ = writeln!(stderr, "{err}");
                let _ = write!(stderr, "{}", usage::render(&trail));
                return exit::USAGE;
            }
        };

        let command = resolution.command();
        let handler = match &command.handler {
            Some(handler) if !resolution.help_requested() => handler.clone(),
            _ => {
                let _ = write!(stdout, "{}", resolution.usage());
                return exit::SUCCESS;
            }
        };

        let handler = compose(handler, &command.middlewares);
        handler(ctx, resolution.options(), resolution.args())
    }

    /// Dispatches `args` (program name excluded) using the process streams.
    pub fn run<I, S>(&self, ctx: &Context, args: I) -> i32
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_with(ctx, args, &mut io::stdout(), &mut io::stderr())
    }

    /// Dispatches the process arguments and exits with the resulting code.
    pub fn execute(&self, ctx: &Context) -> ! {
        let code = self.run(ctx, std::env::args().skip(1));
        std::process::exit(code)
    }
}

fn names(trail: &[&Command]) -> Vec<String> {
    trail.iter().map(|c| c.name().to_string()).collect()
}
