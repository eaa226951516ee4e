//! Option registry.
//!
//! Every command node owns an [`OptionSet`]: named, typed options with a
//! default value and a help string. The set decides where the option prefix
//! of an argument list ends and hands that prefix to `clap`, which resolves
//! names, attaches values and reports syntax errors. Converting the raw value
//! into the declared type is done here, through [`OptionType`].
//!
//! # Accepted syntax
//!
//! ```text
//! -name          boolean options only, sets `true`
//! -name=value    any option (`-verbose=false` for booleans)
//! -name value    non-boolean options; the value may start with `-`
//! --name ...     same as the single-dash forms
//! --             ends the option prefix and is consumed
//! ```
//!
//! Parsing stops at the first token that is not an option (a lone `-` counts
//! as a positional). That token and everything after it are returned as the
//! positional remainder.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use clap::{value_parser, Arg, ArgAction};

use crate::error::ParseError;

const HELP_ID: &str = "[help]";

/// A value type that options can be declared with.
///
/// Implemented for `bool`, `i64`, `u64`, `f64`, `String`,
/// [`Duration`] and `Vec<String>`. Implement it for your own types to get
/// custom option values.
///
/// ```rust
/// use standout_command::{OptionSet, OptionType};
///
/// #[derive(Clone, Default, Debug, PartialEq)]
/// struct Level(u8);
///
/// impl OptionType for Level {
///     const TYPE_NAME: &'static str = "level";
///
///     fn parse_value(raw: &str) -> Result<Self, String> {
///         match raw {
///             "low" => Ok(Level(0)),
///             "high" => Ok(Level(9)),
///             other => Err(format!("unknown level {other}")),
///         }
///     }
///
///     fn render(&self) -> String {
///         if self.0 > 4 { "high".into() } else { "low".into() }
///     }
/// }
///
/// let mut options = OptionSet::new();
/// options.declare("level", Level(0), "How loud to be");
/// options.parse(&["-level=high".to_string()]).unwrap();
/// assert_eq!(options.lookup::<Level>("level"), Level(9));
/// ```
pub trait OptionType: Clone + Default + 'static {
    /// Name shown in usage text and in lookup diagnostics.
    const TYPE_NAME: &'static str;

    /// Boolean options may appear without a value.
    const IS_BOOL: bool = false;

    /// Converts a raw command-line value.
    fn parse_value(raw: &str) -> Result<Self, String>;

    /// Renders the value for usage text.
    fn render(&self) -> String;
}

impl OptionType for bool {
    const TYPE_NAME: &'static str = "bool";
    const IS_BOOL: bool = true;

    fn parse_value(raw: &str) -> Result<Self, String> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err("invalid boolean value".to_string()),
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl OptionType for i64 {
    const TYPE_NAME: &'static str = "int";

    fn parse_value(raw: &str) -> Result<Self, String> {
        raw.parse().map_err(|e| format!("{e}"))
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl OptionType for u64 {
    const TYPE_NAME: &'static str = "uint";

    fn parse_value(raw: &str) -> Result<Self, String> {
        raw.parse().map_err(|e| format!("{e}"))
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl OptionType for f64 {
    const TYPE_NAME: &'static str = "float";

    fn parse_value(raw: &str) -> Result<Self, String> {
        raw.parse().map_err(|e| format!("{e}"))
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl OptionType for String {
    const TYPE_NAME: &'static str = "string";

    fn parse_value(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn render(&self) -> String {
        format!("{self:?}")
    }
}

impl OptionType for Duration {
    const TYPE_NAME: &'static str = "duration";

    fn parse_value(raw: &str) -> Result<Self, String> {
        parse_duration(raw)
    }

    fn render(&self) -> String {
        format!("{self:?}")
    }
}

/// Comma-separated list; each occurrence replaces the previous list.
impl OptionType for Vec<String> {
    const TYPE_NAME: &'static str = "list";

    fn parse_value(raw: &str) -> Result<Self, String> {
        Ok(raw.split(',').map(String::from).collect())
    }

    fn render(&self) -> String {
        format!("{:?}", self.join(","))
    }
}

/// Parses Go-style duration literals: a sequence of decimal numbers each
/// followed by a unit (`ns`, `us`, `µs`, `ms`, `s`, `m`, `h`), e.g. `1h30m`
/// or `1.5s`. A bare `0` is accepted.
fn parse_duration(raw: &str) -> Result<Duration, String> {
    if raw == "0" {
        return Ok(Duration::ZERO);
    }
    if raw.is_empty() {
        return Err("empty duration".to_string());
    }

    let is_number = |c: char| c.is_ascii_digit() || c == '.';
    let mut nanos = 0f64;
    let mut rest = raw;

    while !rest.is_empty() {
        let number_end = rest.find(|c: char| !is_number(c)).unwrap_or(rest.len());
        if number_end == 0 {
            return Err(format!("invalid duration {raw:?}"));
        }
        let value: f64 = rest[..number_end]
            .parse()
            .map_err(|_| format!("invalid duration {raw:?}"))?;
        rest = &rest[number_end..];

        let unit_end = rest.find(is_number).unwrap_or(rest.len());
        let scale = match &rest[..unit_end] {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(format!("missing unit in duration {raw:?}")),
            unit => return Err(format!("unknown unit {unit:?} in duration {raw:?}")),
        };
        nanos += value * scale;
        if !nanos.is_finite() || nanos >= u64::MAX as f64 {
            return Err(format!("duration {raw:?} out of range"));
        }
        rest = &rest[unit_end..];
    }

    Ok(Duration::from_nanos(nanos.round() as u64))
}

fn parse_erased<T: OptionType>(raw: &str) -> Result<Rc<dyn Any>, String> {
    T::parse_value(raw).map(|value| Rc::new(value) as Rc<dyn Any>)
}

fn render_erased<T: OptionType>(value: &dyn Any) -> String {
    value.downcast_ref::<T>().map(T::render).unwrap_or_default()
}

/// One declared option and its current value.
#[derive(Clone)]
pub struct OptionEntry {
    name: String,
    help: String,
    type_name: &'static str,
    is_bool: bool,
    default: String,
    zero_default: bool,
    pub(crate) value: Rc<dyn Any>,
    parse: fn(&str) -> Result<Rc<dyn Any>, String>,
    render: fn(&dyn Any) -> String,
}

impl OptionEntry {
    fn new<T: OptionType>(name: String, default: T, help: String) -> Self {
        let rendered = default.render();
        Self {
            zero_default: rendered == T::default().render(),
            default: rendered,
            name,
            help,
            type_name: T::TYPE_NAME,
            is_bool: T::IS_BOOL,
            value: Rc::new(default),
            parse: parse_erased::<T>,
            render: render_erased::<T>,
        }
    }

    /// The option name, without dashes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The help string given at declaration.
    pub fn help(&self) -> &str {
        &self.help
    }

    /// The declared type's [`OptionType::TYPE_NAME`].
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Boolean options are set by their bare name and never consume the
    /// next token.
    pub fn is_bool(&self) -> bool {
        self.is_bool
    }

    /// The rendered default value.
    pub fn default_value(&self) -> &str {
        &self.default
    }

    /// True when the default equals the zero value of its type.
    pub fn has_zero_default(&self) -> bool {
        self.zero_default
    }

    /// The rendered current (parsed or default) value.
    pub fn value(&self) -> String {
        (self.render)(&*self.value)
    }
}

impl fmt::Debug for OptionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionEntry")
            .field("name", &self.name)
            .field("type", &self.type_name)
            .field("value", &self.value())
            .finish()
    }
}

/// What a successful [`OptionSet::parse`] leaves behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    /// Tokens after the option prefix.
    pub remaining: Vec<String>,
    /// `-h` or `-help` was given.
    pub help_requested: bool,
}

/// Per-command collection of named, typed options.
///
/// Options are kept sorted by name. Declaring a name that already exists
/// replaces the earlier declaration, value included.
#[derive(Clone, Default)]
pub struct OptionSet {
    pub(crate) entries: BTreeMap<String, OptionEntry>,
}

impl OptionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an option of type `T`.
    pub fn declare<T: OptionType>(
        &mut self,
        name: impl Into<String>,
        default: T,
        help: impl Into<String>,
    ) -> &mut Self {
        let name = name.into();
        let entry = OptionEntry::new(name.clone(), default, help.into());
        if let Some(previous) = self.entries.insert(name, entry) {
            tracing::debug!(
                option = previous.name(),
                previous_type = previous.type_name(),
                "option redeclared, keeping the latest declaration"
            );
        }
        self
    }

    /// Declares a boolean option.
    pub fn flag(
        &mut self,
        name: impl Into<String>,
        default: bool,
        help: impl Into<String>,
    ) -> &mut Self {
        self.declare(name, default, help)
    }

    /// Declares a signed integer option.
    pub fn int(
        &mut self,
        name: impl Into<String>,
        default: i64,
        help: impl Into<String>,
    ) -> &mut Self {
        self.declare(name, default, help)
    }

    /// Declares an unsigned integer option. Negative values are rejected.
    pub fn uint(
        &mut self,
        name: impl Into<String>,
        default: u64,
        help: impl Into<String>,
    ) -> &mut Self {
        self.declare(name, default, help)
    }

    /// Declares a floating-point option.
    pub fn float(
        &mut self,
        name: impl Into<String>,
        default: f64,
        help: impl Into<String>,
    ) -> &mut Self {
        self.declare(name, default, help)
    }

    /// Declares a string option.
    pub fn string(
        &mut self,
        name: impl Into<String>,
        default: impl Into<String>,
        help: impl Into<String>,
    ) -> &mut Self {
        self.declare(name, default.into(), help)
    }

    /// Declares a duration option, written as `1h30m`, `250ms`, `1.5s`.
    pub fn duration(
        &mut self,
        name: impl Into<String>,
        default: Duration,
        help: impl Into<String>,
    ) -> &mut Self {
        self.declare(name, default, help)
    }

    /// Declares a comma-separated list option.
    pub fn list(
        &mut self,
        name: impl Into<String>,
        default: Vec<String>,
        help: impl Into<String>,
    ) -> &mut Self {
        self.declare(name, default, help)
    }

    /// Whether an option named `name` is declared or inherited.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The option named `name`, with its current value.
    pub fn entry(&self, name: &str) -> Option<&OptionEntry> {
        self.entries.get(name)
    }

    /// Iterates over the options sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &OptionEntry> {
        self.entries.values()
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no option is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses the option prefix of `tokens` and stores the values.
    ///
    /// On error no value is changed.
    pub fn parse(&mut self, tokens: &[String]) -> Result<Parsed, ParseError> {
        let (argv, remaining) = self.split_prefix(tokens)?;

        let matches = self
            .clap_command()
            .try_get_matches_from(argv)
            .map_err(ParseError::from_clap)?;

        let mut updates = Vec::new();
        for entry in self.entries.values() {
            if let Some(raw) = matches.get_one::<String>(entry.name()) {
                let value = (entry.parse)(raw).map_err(|reason| ParseError::InvalidValue {
                    name: entry.name.clone(),
                    value: raw.clone(),
                    reason,
                })?;
                updates.push((entry.name.clone(), value));
            }
        }
        for (name, value) in updates {
            if let Some(entry) = self.entries.get_mut(&name) {
                entry.value = value;
            }
        }

        let help_requested = self.builtin_help() && matches.get_flag(HELP_ID);
        Ok(Parsed {
            remaining,
            help_requested,
        })
    }

    /// Copies every option not declared here from `parent`, current value
    /// included. Options declared here shadow the parent's.
    pub(crate) fn inherit(&mut self, parent: &OptionSet) {
        for (name, entry) in &parent.entries {
            self.entries
                .entry(name.clone())
                .or_insert_with(|| entry.clone());
        }
    }

    /// `-h` and `-help` are available unless the command declares them.
    fn builtin_help(&self) -> bool {
        !self.contains("h") && !self.contains("help")
    }

    /// Splits `tokens` into the clap argv for the option prefix and the
    /// positional remainder. Option names in the prefix are rewritten to the
    /// double-dash form; values are passed through untouched.
    fn split_prefix(
        &self,
        tokens: &[String],
    ) -> Result<(Vec<String>, Vec<String>), ParseError> {
        let mut argv = Vec::new();
        let mut index = 0;

        while index < tokens.len() {
            let token = &tokens[index];
            if token == "--" {
                index += 1;
                break;
            }
            if token.len() < 2 || !token.starts_with('-') {
                break;
            }

            let long = if token.starts_with("--") {
                token.clone()
            } else {
                format!("-{token}")
            };
            let body = &long[2..];
            if body.starts_with('-') || body.starts_with('=') {
                return Err(ParseError::BadSyntax {
                    token: token.clone(),
                });
            }
            let takes_value = !body.contains('=')
                && self.entries.get(body).is_some_and(|entry| !entry.is_bool);

            argv.push(long);
            index += 1;
            if takes_value && index < tokens.len() {
                argv.push(tokens[index].clone());
                index += 1;
            }
        }

        Ok((argv, tokens[index..].to_vec()))
    }

    fn clap_command(&self) -> clap::Command {
        let mut command = clap::Command::new("options")
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true);

        for entry in self.entries.values() {
            let arg = Arg::new(entry.name.clone())
                .long(entry.name.clone())
                .action(ArgAction::Set)
                .value_parser(value_parser!(String));
            let arg = if entry.is_bool {
                arg.num_args(0..=1)
                    .require_equals(true)
                    .default_missing_value("true")
            } else {
                arg.num_args(1).allow_hyphen_values(true)
            };
            command = command.arg(arg);
        }

        if self.builtin_help() {
            command = command.arg(
                Arg::new(HELP_ID)
                    .long("help")
                    .alias("h")
                    .action(ArgAction::SetTrue),
            );
        }

        command
    }
}

impl fmt::Debug for OptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.values()).finish()
    }
}
