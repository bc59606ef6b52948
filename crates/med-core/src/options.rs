//! Editor options.
//!
//! There is one knob today: the tab stop width used by the column mapper.
//! Options are set programmatically via [`Options::with_tab_width`] or from
//! `name=value` assignments (the `--set` command-line flag) via
//! [`Options::apply`].
//!
//! | Full name | Abbrev | Type    | Default |
//! |-----------|--------|---------|---------|
//! | `tabstop` | `ts`   | integer | 4       |

use thiserror::Error;

/// Default tab stop width.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Why an option assignment was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    /// Not of the form `name=value`.
    #[error("expected name=value, got {0:?}")]
    Malformed(String),

    /// The option name is not known.
    #[error("unknown option: {0}")]
    Unknown(String),

    /// The value does not parse for this option.
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: String, value: String },
}

/// Editor configuration shared by every buffer operation that maps bytes to
/// columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    tab_width: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

impl Options {
    /// Default options: 4-column tab stops.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }

    /// Tab stop width in columns (always at least 1).
    #[inline]
    #[must_use]
    pub const fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Builder-style tab width setter. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width.max(1);
        self
    }

    /// Apply a single `name=value` assignment.
    ///
    /// # Errors
    ///
    /// Returns an [`OptionError`] if the assignment is malformed, names an
    /// unknown option, or carries a value that does not parse.
    pub fn apply(&mut self, assignment: &str) -> Result<(), OptionError> {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| OptionError::Malformed(assignment.to_string()))?;
        let name = name.trim();
        let value = value.trim();

        match name {
            "tabstop" | "ts" => {
                let width = value
                    .parse::<usize>()
                    .ok()
                    .filter(|w| *w > 0)
                    .ok_or_else(|| OptionError::InvalidValue {
                        name: name.to_string(),
                        value: value.to_string(),
                    })?;
                self.tab_width = width;
                Ok(())
            }
            _ => Err(OptionError::Unknown(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tab_width_is_four() {
        assert_eq!(Options::default().tab_width(), 4);
    }

    #[test]
    fn with_tab_width_floors_at_one() {
        assert_eq!(Options::new().with_tab_width(0).tab_width(), 1);
        assert_eq!(Options::new().with_tab_width(8).tab_width(), 8);
    }

    #[test]
    fn apply_full_and_abbreviated_names() {
        let mut opts = Options::new();
        opts.apply("tabstop=8").unwrap();
        assert_eq!(opts.tab_width(), 8);
        opts.apply("ts = 2").unwrap();
        assert_eq!(opts.tab_width(), 2);
    }

    #[test]
    fn apply_rejects_zero_and_garbage() {
        let mut opts = Options::new();
        assert_eq!(
            opts.apply("ts=0"),
            Err(OptionError::InvalidValue {
                name: "ts".into(),
                value: "0".into()
            })
        );
        assert!(matches!(
            opts.apply("ts=wide"),
            Err(OptionError::InvalidValue { .. })
        ));
        assert_eq!(opts.tab_width(), 4);
    }

    #[test]
    fn apply_rejects_unknown_and_malformed() {
        let mut opts = Options::new();
        assert_eq!(
            opts.apply("shiftwidth=2"),
            Err(OptionError::Unknown("shiftwidth".into()))
        );
        assert_eq!(
            opts.apply("tabstop"),
            Err(OptionError::Malformed("tabstop".into()))
        );
    }
}
