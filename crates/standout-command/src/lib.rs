//! Command tree dispatch for CLIs.
//!
//! `standout-command` builds a tree of named commands and subcommands,
//! parses process arguments level by level against each command's options,
//! routes control to the deepest matching command and renders usage text.
//!
//! # Features
//!
//! - **Command tree**: nested subcommands built with a fluent API
//! - **Typed options**: booleans, integers, floats, strings, durations, lists
//!   and your own [`OptionType`]s, read back with [`lookup`]
//! - **Option inheritance**: options of a parent are visible to every
//!   subcommand dispatch descends into, with the values parsed so far
//! - **Middlewares**: wrap a command's handler to validate, set up or
//!   short-circuit
//! - **Usage text**: generated for every level, printed on `-h`, on errors and
//!   for namespaces invoked without a subcommand
//! - **Exit codes**: dispatch returns the code instead of exiting, so it can
//!   be tested; [`Command::execute`] is the thin wrapper that exits
//!
//! # Example
//!
//! ```rust
//! use standout_command::{exit, Command, Context};
//!
//! let root = Command::new("app")
//!     .options(|o| {
//!         o.flag("verbose", false, "Enable verbose output");
//!     })
//!     .subcommand("echo", |echo| {
//!         echo.options(|o| {
//!             o.string("case", "", "Case to use (upper, lower)");
//!         })
//!         .action(|_ctx, options, args| {
//!             let text = args.join(" ");
//!             match options.lookup::<String>("case").as_str() {
//!                 "upper" => println!("{}", text.to_uppercase()),
//!                 _ => println!("{text}"),
//!             }
//!             exit::SUCCESS
//!         })
//!     });
//!
//! let code = root.run(&Context::new(), ["-verbose", "echo", "-case=upper", "hello"]);
//! assert_eq!(code, exit::SUCCESS);
//! ```
//!
//! # Errors
//!
//! User mistakes (unknown option, bad value, unknown subcommand) never
//! escape as panics: they become a diagnostic, usage on stderr and
//! [`exit::USAGE`]. Reading an option with the wrong name or type is a
//! programming error; [`lookup`] panics, [`OptionSet::get`] returns a
//! [`LookupError`].

mod command;
mod context;
mod dispatch;
mod error;
mod lookup;
mod middleware;
mod options;
mod usage;

pub use command::Command;

pub use context::{Context, Extensions};

pub use dispatch::{exit, Resolution};

pub use error::{DispatchError, LookupError, ParseError};

pub use lookup::lookup;

pub use middleware::{compose, handler, middleware, Handler, Middleware};

pub use options::{OptionEntry, OptionSet, OptionType, Parsed};
