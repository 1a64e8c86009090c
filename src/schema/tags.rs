//! Tag-string tokenizer.
//!
//! A tag string is a comma-separated list of tokens, each either `name` or `name=value`:
//! `"trim,lowercase,default=n/a"`.

/// How unknown or malformed tag tokens are treated during schema compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagMode {
    /// Fail compilation with [`crate::ProcessError::InvalidTagFormat`].
    #[default]
    Strict,
    /// Drop the offending token and keep compiling.
    Lenient,
}

/// One token of a tag string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken<'a> {
    /// The token exactly as written (trimmed), used in error messages.
    pub raw: &'a str,
    /// Rule name (text before the first `=`).
    pub name: &'a str,
    /// Argument (text after the first `=`), if any.
    pub arg: Option<&'a str>,
}

/// Why a token could not be turned into a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    /// No rule with this name exists.
    Unknown,
    /// The rule exists but its argument is missing or invalid.
    Malformed(String),
}

impl TagError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Message used in [`crate::ProcessError::InvalidTagFormat`].
    pub fn message(&self, name: &str) -> String {
        match self {
            Self::Unknown => format!("unknown tag '{name}'"),
            Self::Malformed(msg) => msg.clone(),
        }
    }
}

impl<'a> TagToken<'a> {
    /// The argument, or a [`TagError::Malformed`] naming the rule when it is missing or empty.
    pub fn required_arg(&self) -> Result<&'a str, TagError> {
        match self.arg {
            Some(arg) if !arg.is_empty() => Ok(arg),
            _ => Err(TagError::malformed(format!("'{}' requires a value", self.name))),
        }
    }

    /// Fails when an argument was given to a rule that takes none.
    pub fn no_arg(&self) -> Result<(), TagError> {
        match self.arg {
            None => Ok(()),
            Some(_) => Err(TagError::malformed(format!(
                "'{}' does not take a value",
                self.name
            ))),
        }
    }

    /// Parse the argument as a number.
    pub fn number_arg(&self) -> Result<f64, TagError> {
        let arg = self.required_arg()?;
        arg.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                TagError::malformed(format!("'{}' expects a number, got '{arg}'", self.name))
            })
    }

    /// Parse the argument as a non-negative count.
    pub fn count_arg(&self) -> Result<usize, TagError> {
        let arg = self.required_arg()?;
        arg.trim().parse::<usize>().map_err(|_| {
            TagError::malformed(format!(
                "'{}' expects a non-negative integer, got '{arg}'",
                self.name
            ))
        })
    }

    /// Parse the argument as exactly one character.
    pub fn char_arg(&self) -> Result<char, TagError> {
        let arg = self.required_arg()?;
        let mut chars = arg.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(TagError::malformed(format!(
                "'{}' expects a single character, got '{arg}'",
                self.name
            ))),
        }
    }
}

/// Split a tag string into tokens. Empty tokens are skipped.
pub fn tokenize(tags: &str) -> Vec<TagToken<'_>> {
    tags.split(',')
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| match raw.split_once('=') {
            Some((name, arg)) => TagToken {
                raw,
                name: name.trim(),
                arg: Some(arg),
            },
            None => TagToken {
                raw,
                name: raw,
                arg: None,
            },
        })
        .collect()
}
