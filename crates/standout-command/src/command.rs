//! Command tree construction.
//!
//! A [`Command`] is one node of the tree: a name, optional help text, an
//! optional handler, its middlewares, its options and its subcommands. Trees
//! are built with a consuming builder and nested closures:
//!
//! ```rust
//! use standout_command::Command;
//!
//! let root = Command::new("github")
//!     .help("Example command")
//!     .options(|o| {
//!         o.flag("verbose", false, "Enable verbose output");
//!     })
//!     .subcommand("repos", |repos| {
//!         repos
//!             .help("Manage GitHub repositories")
//!             .subcommand("list", |list| {
//!                 list.help("List repositories of a GitHub user")
//!                     .options(|o| {
//!                         o.string("user", "", "GitHub user");
//!                     })
//!                     .action(|_ctx, options, _args| {
//!                         println!("{}", options.lookup::<String>("user"));
//!                         0
//!                     })
//!             })
//!     });
//!
//! assert!(root.child("repos").and_then(|r| r.child("list")).is_some());
//! ```
//!
//! A node without a handler is a namespace: dispatching to it with no
//! further arguments prints its usage. A node with neither a handler nor
//! subcommands can never do anything useful; attaching one logs a warning.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::context::Context;
use crate::middleware::{Handler, Middleware};
use crate::options::OptionSet;
use crate::usage;

/// A node of the command tree.
pub struct Command {
    name: String,
    help: Option<String>,
    pub(crate) handler: Option<Handler>,
    pub(crate) middlewares: Vec<Middleware>,
    children: HashMap<String, Command>,
    pub(crate) options: OptionSet,
}

impl Command {
    /// Creates a command with no handler, options or subcommands.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: None,
            handler: None,
            middlewares: Vec::new(),
            children: HashMap::new(),
            options: OptionSet::new(),
        }
    }

    /// Creates a root command named after the running program.
    pub fn root() -> Self {
        Self::new(program_name())
    }

    /// Sets the help text.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the handler run when dispatch ends at this command.
    pub fn action<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context, &OptionSet, &[String]) -> i32 + 'static,
    {
        self.handler = Some(crate::middleware::handler(f));
        self
    }

    /// Sets an already built [`Handler`].
    pub fn with_handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Appends a middleware around this command's handler.
    pub fn middleware<F>(mut self, f: F) -> Self
    where
        F: Fn(Handler) -> Handler + 'static,
    {
        self.middlewares.push(crate::middleware::middleware(f));
        self
    }

    /// Appends several middlewares, in order.
    pub fn middlewares<I>(mut self, middlewares: I) -> Self
    where
        I: IntoIterator<Item = Middleware>,
    {
        self.middlewares.extend(middlewares);
        self
    }

    /// Declares options on this command.
    pub fn options<F>(mut self, declare: F) -> Self
    where
        F: FnOnce(&mut OptionSet),
    {
        declare(&mut self.options);
        self
    }

    /// Adds a subcommand configured by `configure`.
    pub fn subcommand<F>(self, name: impl Into<String>, configure: F) -> Self
    where
        F: FnOnce(Command) -> Command,
    {
        self.add_subcommand(configure(Command::new(name)))
    }

    /// Adds an already built subcommand. A previous child with the same name
    /// is replaced.
    pub fn add_subcommand(mut self, child: Command) -> Self {
        if child.is_inert() {
            tracing::warn!(
                parent = %self.name,
                command = %child.name,
                "subcommand has neither a handler nor subcommands"
            );
        }
        if let Some(previous) = self.children.insert(child.name.clone(), child) {
            tracing::warn!(
                parent = %self.name,
                command = %previous.name,
                "subcommand replaced by a later declaration"
            );
        }
        self
    }

    /// The name matched against arguments. For the root, the program name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The help text, if set.
    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// A command without a handler is a namespace.
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Whether any subcommand is attached.
    pub fn has_subcommands(&self) -> bool {
        !self.children.is_empty()
    }

    /// The options declared on this command (inherited ones excluded).
    pub fn declared_options(&self) -> &OptionSet {
        &self.options
    }

    /// The direct subcommand called `name`.
    pub fn child(&self, name: &str) -> Option<&Command> {
        self.children.get(name)
    }

    /// Subcommands sorted by name.
    pub fn subcommands(&self) -> Vec<&Command> {
        let mut children: Vec<&Command> = self.children.values().collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        children
    }

    /// Space-joined paths of every node, this one included, that has neither
    /// a handler nor subcommands.
    pub fn inert_paths(&self) -> Vec<String> {
        let mut found = Vec::new();
        self.collect_inert(&mut vec![self.name.as_str()], &mut found);
        found
    }

    fn collect_inert<'a>(&'a self, path: &mut Vec<&'a str>, found: &mut Vec<String>) {
        if self.is_inert() {
            found.push(path.join(" "));
        }
        for child in self.subcommands() {
            path.push(&child.name);
            child.collect_inert(path, found);
            path.pop();
        }
    }

    fn is_inert(&self) -> bool {
        self.handler.is_none() && self.children.is_empty()
    }

    /// Usage text for this command on its own, as if it were the root.
    pub fn usage(&self) -> String {
        usage::render(&[self])
    }

    /// Follows `path` (root name first) down the tree, returning every node
    /// on the way. Stops early at the first name that does not match.
    pub(crate) fn trail<'a>(&'a self, path: &[String]) -> Vec<&'a Command> {
        let mut trail = vec![self];
        let mut current = self;
        for name in path.iter().skip(1) {
            match current.children.get(name) {
                Some(child) => {
                    trail.push(child);
                    current = child;
                }
                None => break,
            }
        }
        trail
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("has_handler", &self.handler.is_some())
            .field("middleware_count", &self.middlewares.len())
            .field("options", &self.options)
            .field("subcommands", &self.subcommands())
            .finish()
    }
}

fn program_name() -> String {
    std::env::args_os()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "app".to_string())
}
