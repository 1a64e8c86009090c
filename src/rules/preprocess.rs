//! Preprocessors: pure string-to-string transforms applied before coercion and validation.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::schema::tags::{TagError, TagToken};

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("html tag pattern is valid"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Target of the `coerce` preprocessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoerceTarget {
    /// Reformat as an integer (fractions are truncated).
    Int,
    /// Reformat as a float in shortest form.
    Float,
    /// Reformat common boolean spellings as `true`/`false`.
    Bool,
}

/// A single preprocessing step, compiled from one `prep` tag token.
#[derive(Debug, Clone)]
pub enum Preprocessor {
    /// `trim`: strip leading and trailing whitespace.
    Trim,
    /// `ltrim`: strip leading whitespace.
    LTrim,
    /// `rtrim`: strip trailing whitespace.
    RTrim,
    /// `lowercase`
    Lowercase,
    /// `uppercase`
    Uppercase,
    /// `default=V`: substitute `V` for empty or whitespace-only values.
    Default(String),
    /// `replace=OLD:NEW`: replace every occurrence.
    Replace { from: String, to: String },
    /// `prefix=V`: prepend to non-empty values.
    Prefix(String),
    /// `suffix=V`: append to non-empty values.
    Suffix(String),
    /// `truncate=N`: keep the first `N` characters.
    Truncate(usize),
    /// `strip_html`: remove markup tags.
    StripHtml,
    /// `strip_newline`: remove `\r` and `\n`.
    StripNewline,
    /// `collapse_space`: collapse whitespace runs to a single space.
    CollapseSpace,
    /// `remove_digits`
    RemoveDigits,
    /// `remove_alpha`
    RemoveAlpha,
    /// `keep_digits`
    KeepDigits,
    /// `keep_alpha`
    KeepAlpha,
    /// `trim_set=CHARS`: strip any of `CHARS` from both ends.
    TrimSet(String),
    /// `pad_left=N:C`
    PadLeft { width: usize, pad: char },
    /// `pad_right=N:C`
    PadRight { width: usize, pad: char },
    /// `normalize_unicode`: NFC normalization.
    NormalizeUnicode,
    /// `nullify=V`: values equal to `V` become empty.
    Nullify(String),
    /// `coerce=int|float|bool`
    Coerce(CoerceTarget),
    /// `fix_scheme=SCHEME`: add `SCHEME://` to values lacking a scheme.
    FixScheme(String),
    /// `regex_replace=PATTERN:REPLACEMENT`
    RegexReplace { pattern: Regex, replacement: String },
}

impl Preprocessor {
    /// Compile one tag token.
    pub fn from_token(token: &TagToken<'_>) -> Result<Self, TagError> {
        let simple = |p: Preprocessor| token.no_arg().map(|_| p);

        match token.name {
            "trim" => simple(Self::Trim),
            "ltrim" => simple(Self::LTrim),
            "rtrim" => simple(Self::RTrim),
            "lowercase" => simple(Self::Lowercase),
            "uppercase" => simple(Self::Uppercase),
            "default" => Ok(Self::Default(token.required_arg()?.to_string())),
            "replace" => {
                let (from, to) = split_pair(token)?;
                if from.is_empty() {
                    return Err(TagError::malformed("'replace' needs a non-empty search text"));
                }
                Ok(Self::Replace {
                    from: from.to_string(),
                    to: to.to_string(),
                })
            }
            "prefix" => Ok(Self::Prefix(token.required_arg()?.to_string())),
            "suffix" => Ok(Self::Suffix(token.required_arg()?.to_string())),
            "truncate" => Ok(Self::Truncate(token.count_arg()?)),
            "strip_html" => simple(Self::StripHtml),
            "strip_newline" => simple(Self::StripNewline),
            "collapse_space" => simple(Self::CollapseSpace),
            "remove_digits" => simple(Self::RemoveDigits),
            "remove_alpha" => simple(Self::RemoveAlpha),
            "keep_digits" => simple(Self::KeepDigits),
            "keep_alpha" => simple(Self::KeepAlpha),
            "trim_set" => Ok(Self::TrimSet(token.required_arg()?.to_string())),
            "pad_left" => {
                let (width, pad) = padding(token)?;
                Ok(Self::PadLeft { width, pad })
            }
            "pad_right" => {
                let (width, pad) = padding(token)?;
                Ok(Self::PadRight { width, pad })
            }
            "normalize_unicode" => simple(Self::NormalizeUnicode),
            "nullify" => Ok(Self::Nullify(token.required_arg()?.to_string())),
            "coerce" => match token.required_arg()? {
                "int" => Ok(Self::Coerce(CoerceTarget::Int)),
                "float" => Ok(Self::Coerce(CoerceTarget::Float)),
                "bool" => Ok(Self::Coerce(CoerceTarget::Bool)),
                other => Err(TagError::malformed(format!(
                    "'coerce' expects int, float or bool, got '{other}'"
                ))),
            },
            "fix_scheme" => {
                let scheme = token.required_arg()?;
                if !scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)) {
                    return Err(TagError::malformed(format!("invalid scheme '{scheme}'")));
                }
                Ok(Self::FixScheme(scheme.to_string()))
            }
            "regex_replace" => {
                let (pattern, replacement) = split_pair(token)?;
                let pattern = Regex::new(pattern)
                    .map_err(|e| TagError::malformed(format!("invalid regex: {e}")))?;
                Ok(Self::RegexReplace {
                    pattern,
                    replacement: replacement.to_string(),
                })
            }
            _ => Err(TagError::Unknown),
        }
    }

    /// Apply this step to `input`.
    pub fn apply(&self, input: &str) -> String {
        match self {
            Self::Trim => input.trim().to_string(),
            Self::LTrim => input.trim_start().to_string(),
            Self::RTrim => input.trim_end().to_string(),
            Self::Lowercase => input.to_lowercase(),
            Self::Uppercase => input.to_uppercase(),
            Self::Default(v) => {
                if input.trim().is_empty() {
                    v.clone()
                } else {
                    input.to_string()
                }
            }
            Self::Replace { from, to } => input.replace(from.as_str(), to),
            Self::Prefix(p) => {
                if input.is_empty() {
                    String::new()
                } else {
                    format!("{p}{input}")
                }
            }
            Self::Suffix(s) => {
                if input.is_empty() {
                    String::new()
                } else {
                    format!("{input}{s}")
                }
            }
            Self::Truncate(n) => input.chars().take(*n).collect(),
            Self::StripHtml => HTML_TAG.replace_all(input, "").into_owned(),
            Self::StripNewline => input.chars().filter(|c| !matches!(c, '\r' | '\n')).collect(),
            Self::CollapseSpace => WHITESPACE_RUN.replace_all(input, " ").into_owned(),
            Self::RemoveDigits => input.chars().filter(|c| !c.is_ascii_digit()).collect(),
            Self::RemoveAlpha => input.chars().filter(|c| !c.is_alphabetic()).collect(),
            Self::KeepDigits => input.chars().filter(char::is_ascii_digit).collect(),
            Self::KeepAlpha => input.chars().filter(|c| c.is_alphabetic()).collect(),
            Self::TrimSet(set) => input.trim_matches(|c| set.contains(c)).to_string(),
            Self::PadLeft { width, pad } => {
                let missing = width.saturating_sub(input.chars().count());
                let mut out: String = std::iter::repeat_n(*pad, missing).collect();
                out.push_str(input);
                out
            }
            Self::PadRight { width, pad } => {
                let missing = width.saturating_sub(input.chars().count());
                let mut out = input.to_string();
                out.extend(std::iter::repeat_n(*pad, missing));
                out
            }
            Self::NormalizeUnicode => input.nfc().collect(),
            Self::Nullify(v) => {
                if input == v {
                    String::new()
                } else {
                    input.to_string()
                }
            }
            Self::Coerce(target) => coerce(input, *target),
            Self::FixScheme(scheme) => fix_scheme(input, scheme),
            Self::RegexReplace {
                pattern,
                replacement,
            } => pattern.replace_all(input, replacement.as_str()).into_owned(),
        }
    }
}

/// Run a preprocessor chain left-to-right.
pub fn apply_chain(chain: &[Preprocessor], input: &str) -> String {
    chain
        .iter()
        .fold(input.to_string(), |acc, step| step.apply(&acc))
}

fn split_pair<'a>(token: &TagToken<'a>) -> Result<(&'a str, &'a str), TagError> {
    token.required_arg()?.split_once(':').ok_or_else(|| {
        TagError::malformed(format!("'{}' expects a value of the form A:B", token.name))
    })
}

fn padding(token: &TagToken<'_>) -> Result<(usize, char), TagError> {
    let arg = token.required_arg()?;
    let (width, pad) = match arg.split_once(':') {
        Some((w, p)) => (w, p),
        None => (arg, " "),
    };
    let width = width.trim().parse::<usize>().map_err(|_| {
        TagError::malformed(format!("'{}' expects a width, got '{width}'", token.name))
    })?;
    let mut chars = pad.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok((width, c)),
        _ => Err(TagError::malformed(format!(
            "'{}' expects a single pad character, got '{pad}'",
            token.name
        ))),
    }
}

fn coerce(input: &str, target: CoerceTarget) -> String {
    let trimmed = input.trim();
    match target {
        CoerceTarget::Int => {
            if let Ok(v) = trimmed.parse::<i64>() {
                return v.to_string();
            }
            match trimmed.parse::<f64>() {
                Ok(f) if f.is_finite() && f.abs() < i64::MAX as f64 => {
                    (f.trunc() as i64).to_string()
                }
                _ => input.to_string(),
            }
        }
        CoerceTarget::Float => match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => f.to_string(),
            _ => input.to_string(),
        },
        CoerceTarget::Bool => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "1" | "on" => "true".to_string(),
            "false" | "f" | "no" | "n" | "0" | "off" => "false".to_string(),
            _ => input.to_string(),
        },
    }
}

fn fix_scheme(input: &str, scheme: &str) -> String {
    if input.is_empty() || input.contains("://") {
        input.to_string()
    } else if let Some(rest) = input.strip_prefix("//") {
        format!("{scheme}://{rest}")
    } else {
        format!("{scheme}://{input}")
    }
}
