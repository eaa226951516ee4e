//! Handlers and middlewares.
//!
//! A [`Handler`] is the terminal action of a command: it receives the
//! [`Context`], the command's resolved options and the positional arguments,
//! and returns the process exit code.
//!
//! A [`Middleware`] turns a handler into another handler with the same
//! signature. It can run code before or after the wrapped handler, inspect
//! the options, or skip the handler entirely by returning its own code.
//!
//! ```text
//! middlewares [m1, m2] on a command with handler h
//!   → m1(m2(h))
//!   → m1 runs first and sees m2's result
//! ```
//!
//! Middlewares are local to the command they are declared on. A parent's
//! middlewares do not wrap its children's handlers.

use std::rc::Rc;

use crate::context::Context;
use crate::options::OptionSet;

/// Terminal action of a command. The return value is the exit code.
pub type Handler = Rc<dyn Fn(&Context, &OptionSet, &[String]) -> i32>;

/// Wraps a handler into another handler.
pub type Middleware = Rc<dyn Fn(Handler) -> Handler>;

/// Turns a closure into a [`Handler`].
///
/// Useful inside middlewares, where the closure signature cannot be inferred
/// from `Rc::new` alone:
///
/// ```rust
/// use standout_command::{handler, Handler};
///
/// fn require_user(next: Handler) -> Handler {
///     handler(move |ctx, options, args| {
///         if options.lookup::<String>("user").is_empty() {
///             eprintln!("missing required flag: user");
///             return 1;
///         }
///         next(ctx, options, args)
///     })
/// }
/// ```
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&Context, &OptionSet, &[String]) -> i32 + 'static,
{
    Rc::new(f)
}

/// Turns a closure into a [`Middleware`].
pub fn middleware<F>(f: F) -> Middleware
where
    F: Fn(Handler) -> Handler + 'static,
{
    Rc::new(f)
}

/// Wraps `handler` with `middlewares`, the first one outermost.
pub fn compose(handler: Handler, middlewares: &[Middleware]) -> Handler {
    middlewares
        .iter()
        .rev()
        .fold(handler, |next, middleware| middleware(next))
}
