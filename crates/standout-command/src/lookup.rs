//! Typed option lookup.
//!
//! Handlers read option values back with the same type they were declared
//! with. Asking for an undeclared name, or for the wrong type, is a bug in the
//! program rather than in the user's input: [`lookup`] panics with a
//! diagnostic, while [`OptionSet::get`] hands the same condition back as a
//! [`LookupError`] for callers that want to check it.

use crate::error::LookupError;
use crate::options::{OptionSet, OptionType};

impl OptionSet {
    /// Returns the current value of `name` as `T`.
    pub fn get<T: OptionType>(&self, name: &str) -> Result<T, LookupError> {
        let entry = self.entries.get(name).ok_or_else(|| LookupError::Missing {
            name: name.to_string(),
        })?;

        entry
            .value
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| LookupError::TypeMismatch {
                name: name.to_string(),
                declared: entry.type_name(),
                requested: T::TYPE_NAME,
            })
    }

    /// Returns the current value of `name` as `T`.
    ///
    /// # Panics
    ///
    /// If `name` is not declared or was declared with another type.
    #[track_caller]
    pub fn lookup<T: OptionType>(&self, name: &str) -> T {
        lookup(self, name)
    }
}

/// Returns the value of option `name` as `T`.
///
/// ```rust
/// use standout_command::{lookup, OptionSet};
///
/// let mut options = OptionSet::new();
/// options.string("level", "info", "Minimum level of logs to display");
/// options.parse(&["-level=debug".to_string()]).unwrap();
///
/// assert_eq!(lookup::<String>(&options, "level"), "debug");
/// ```
///
/// # Panics
///
/// If `name` is not declared or was declared with another type.
#[track_caller]
pub fn lookup<T: OptionType>(options: &OptionSet, name: &str) -> T {
    match options.get(name) {
        Ok(value) => value,
        Err(err) => panic!("option lookup failed: {err}"),
    }
}
