//! Validators that compare a field against another field of the same row.

use std::cmp::Ordering;

use crate::schema::tags::{TagError, TagToken};

/// Which comparison a [`CrossFieldRule`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossFieldKind {
    EqField,
    NeField,
    GtField,
    GteField,
    LtField,
    LteField,
    FieldContains,
    FieldExcludes,
    /// Required when the other field equals the expected value.
    RequiredIf,
    /// Required unless the other field equals the expected value.
    RequiredUnless,
    /// Required when the other field is non-empty.
    RequiredWith,
    /// Required when the other field is empty.
    RequiredWithout,
}

impl CrossFieldKind {
    /// Look up a kind by its tag name.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "eqfield" => Self::EqField,
            "nefield" => Self::NeField,
            "gtfield" => Self::GtField,
            "gtefield" => Self::GteField,
            "ltfield" => Self::LtField,
            "ltefield" => Self::LteField,
            "fieldcontains" => Self::FieldContains,
            "fieldexcludes" => Self::FieldExcludes,
            "required_if" => Self::RequiredIf,
            "required_unless" => Self::RequiredUnless,
            "required_with" => Self::RequiredWith,
            "required_without" => Self::RequiredWithout,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::EqField => "eqfield",
            Self::NeField => "nefield",
            Self::GtField => "gtfield",
            Self::GteField => "gtefield",
            Self::LtField => "ltfield",
            Self::LteField => "ltefield",
            Self::FieldContains => "fieldcontains",
            Self::FieldExcludes => "fieldexcludes",
            Self::RequiredIf => "required_if",
            Self::RequiredUnless => "required_unless",
            Self::RequiredWith => "required_with",
            Self::RequiredWithout => "required_without",
        }
    }

    fn takes_expected_value(self) -> bool {
        matches!(self, Self::RequiredIf | Self::RequiredUnless)
    }
}

/// A compiled cross-field validator.
///
/// `target_index` is the position of the referenced field in the schema, resolved once at
/// compile time; `None` means the identifier does not exist and every check fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossFieldRule {
    pub kind: CrossFieldKind,
    /// Identifier of the referenced field.
    pub target: String,
    pub target_index: Option<usize>,
    /// Expected value for `required_if` / `required_unless`; empty otherwise.
    pub expected: String,
}

impl CrossFieldRule {
    /// Compile a token whose name is a cross-field tag. Returns `Ok(None)` for other names.
    pub fn from_token(token: &TagToken<'_>) -> Result<Option<Self>, TagError> {
        let Some(kind) = CrossFieldKind::from_name(token.name) else {
            return Ok(None);
        };
        let arg = token.required_arg()?.trim();

        let (target, expected) = if kind.takes_expected_value() {
            match arg.split_once(' ') {
                Some((field, value)) => (field, value),
                None => (arg, ""),
            }
        } else {
            (arg, "")
        };
        if target.is_empty() {
            return Err(TagError::malformed(format!(
                "'{}' requires a field name",
                token.name
            )));
        }

        Ok(Some(Self {
            kind,
            target: target.to_string(),
            target_index: None,
            expected: expected.to_string(),
        }))
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Check `own` against the referenced field's value; `other` is `None` when the
    /// referenced field does not exist in the schema.
    pub fn check(&self, own: &str, other: Option<&str>) -> Result<(), String> {
        let Some(other) = other else {
            return Err(format!("field not found: '{}'", self.target));
        };
        let target = &self.target;

        let ok = match self.kind {
            CrossFieldKind::EqField => own == other,
            CrossFieldKind::NeField => own != other,
            CrossFieldKind::GtField
            | CrossFieldKind::GteField
            | CrossFieldKind::LtField
            | CrossFieldKind::LteField => {
                own.is_empty() || {
                    let ordering = compare(own, other);
                    match self.kind {
                        CrossFieldKind::GtField => ordering == Ordering::Greater,
                        CrossFieldKind::GteField => ordering != Ordering::Less,
                        CrossFieldKind::LtField => ordering == Ordering::Less,
                        _ => ordering != Ordering::Greater,
                    }
                }
            }
            CrossFieldKind::FieldContains => own.is_empty() || own.contains(other),
            CrossFieldKind::FieldExcludes => {
                own.is_empty() || other.is_empty() || !own.contains(other)
            }
            CrossFieldKind::RequiredIf => other != self.expected || !own.is_empty(),
            CrossFieldKind::RequiredUnless => other == self.expected || !own.is_empty(),
            CrossFieldKind::RequiredWith => other.is_empty() || !own.is_empty(),
            CrossFieldKind::RequiredWithout => !other.is_empty() || !own.is_empty(),
        };
        if ok {
            return Ok(());
        }

        Err(match self.kind {
            CrossFieldKind::EqField => format!("value must equal field '{target}'"),
            CrossFieldKind::NeField => format!("value must not equal field '{target}'"),
            CrossFieldKind::GtField => {
                format!("value '{own}' must be greater than field '{target}' ('{other}')")
            }
            CrossFieldKind::GteField => format!(
                "value '{own}' must be greater than or equal to field '{target}' ('{other}')"
            ),
            CrossFieldKind::LtField => {
                format!("value '{own}' must be less than field '{target}' ('{other}')")
            }
            CrossFieldKind::LteField => format!(
                "value '{own}' must be less than or equal to field '{target}' ('{other}')"
            ),
            CrossFieldKind::FieldContains => {
                format!("value must contain the value of field '{target}'")
            }
            CrossFieldKind::FieldExcludes => {
                format!("value must not contain the value of field '{target}'")
            }
            CrossFieldKind::RequiredIf => {
                format!("value is required when '{target}' is '{}'", self.expected)
            }
            CrossFieldKind::RequiredUnless => {
                format!("value is required unless '{target}' is '{}'", self.expected)
            }
            CrossFieldKind::RequiredWith => format!("value is required when '{target}' is present"),
            CrossFieldKind::RequiredWithout => {
                format!("value is required when '{target}' is absent")
            }
        })
    }
}

/// Numeric ordering when both sides parse as numbers, lexicographic otherwise.
fn compare(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or_else(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}
