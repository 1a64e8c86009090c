//! Single-field validators.
//!
//! Validators run against the coerced-then-restringified value of a field. Every validator
//! except [`Validator::Required`] passes on an empty value, so presence and format are checked
//! independently.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::schema::tags::{TagError, TagToken};
use crate::types::DataType;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($re).expect(concat!(stringify!($name), " is valid")));
    };
}

pattern!(NUMERIC, r"^[-+]?[0-9]+(?:\.[0-9]+)?$");
pattern!(NUMBER, r"^[0-9]+$");
pattern!(ALPHA, r"^[a-zA-Z]+$");
pattern!(ALPHA_SPACE, r"^[a-zA-Z ]+$");
pattern!(ALPHA_NUMERIC, r"^[a-zA-Z0-9]+$");
pattern!(
    EMAIL,
    r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
);
pattern!(URL, r"^([a-zA-Z][a-zA-Z0-9+.-]*)://[^\s/?#]+[^\s]*$");
pattern!(URI, r"^[a-zA-Z][a-zA-Z0-9+.-]*:[^\s]+$");
pattern!(URL_ENCODED, r"^(?:[^%\s]|%[0-9A-Fa-f]{2})*$");
pattern!(HOSTNAME_RFC952, r"^[a-zA-Z]([a-zA-Z0-9\-]+[\.]?)*[a-zA-Z0-9]$");
pattern!(
    HOSTNAME_RFC1123,
    r"^([a-zA-Z0-9][a-zA-Z0-9-]{0,62})(\.[a-zA-Z0-9][a-zA-Z0-9-]{0,62})*$"
);
pattern!(
    FQDN,
    r"^([a-zA-Z0-9][a-zA-Z0-9-]{0,62})(\.[a-zA-Z0-9][a-zA-Z0-9-]{0,62})*(\.[a-zA-Z][a-zA-Z0-9]{0,62})\.?$"
);
pattern!(MAC, r"^(?:[0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}$");
pattern!(
    UUID,
    r"^(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$"
);
pattern!(
    UUID3,
    r"^(?i)[0-9a-f]{8}-[0-9a-f]{4}-3[0-9a-f]{3}-[0-9a-f]{4}-[0-9a-f]{12}$"
);
pattern!(
    UUID4,
    r"^(?i)[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$"
);
pattern!(
    UUID5,
    r"^(?i)[0-9a-f]{8}-[0-9a-f]{4}-5[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$"
);
pattern!(ULID, r"^(?i)[0-7][0-9A-HJKMNP-TV-Z]{25}$");
pattern!(HEXADECIMAL, r"^(?:0[xX])?[0-9a-fA-F]+$");
pattern!(
    HEXCOLOR,
    r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$"
);
pattern!(
    RGB,
    r"^rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)$"
);
pattern!(
    RGBA,
    r"^rgba\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*((?:0|1)(?:\.\d+)?|\.\d+)\s*\)$"
);
pattern!(
    HSL,
    r"^hsl\(\s*(\d{1,3})\s*,\s*(\d{1,3})%\s*,\s*(\d{1,3})%\s*\)$"
);
pattern!(
    HSLA,
    r"^hsla\(\s*(\d{1,3})\s*,\s*(\d{1,3})%\s*,\s*(\d{1,3})%\s*,\s*((?:0|1)(?:\.\d+)?|\.\d+)\s*\)$"
);
pattern!(E164, r"^\+[1-9][0-9]{7,14}$");
pattern!(
    SEMVER,
    r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$"
);
pattern!(
    BASE64,
    r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=|[A-Za-z0-9+/]{4})$"
);
pattern!(
    BASE64_URL,
    r"^(?:[A-Za-z0-9_-]{4})*(?:[A-Za-z0-9_-]{2}==|[A-Za-z0-9_-]{3}=|[A-Za-z0-9_-]{4})$"
);
pattern!(JWT, r"^[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]*$");

/// A single-field validation rule, compiled from one `validate` tag token.
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    Required,
    Boolean,
    Numeric,
    Number,
    Alpha,
    AlphaUnicode,
    AlphaSpace,
    AlphaNumeric,
    AlphaNumUnicode,
    Ascii,
    PrintAscii,
    Multibyte,
    Lowercase,
    Uppercase,
    Eq(String),
    Ne(String),
    EqIgnoreCase(String),
    NeIgnoreCase(String),
    Gt(f64),
    Gte(f64),
    Lt(f64),
    Lte(f64),
    /// Minimum value (numeric fields) or character count (other fields).
    Min(f64),
    /// Maximum value (numeric fields) or character count (other fields).
    Max(f64),
    /// Exact value (numeric fields) or character count (other fields).
    Len(f64),
    OneOf(Vec<String>),
    StartsWith(String),
    StartsNotWith(String),
    EndsWith(String),
    EndsNotWith(String),
    Contains(String),
    ContainsAny(String),
    ContainsRune(char),
    Excludes(String),
    ExcludesAll(String),
    ExcludesRune(char),
    Email,
    Url,
    HttpUrl,
    HttpsUrl,
    Uri,
    UrlEncoded,
    Fqdn,
    Hostname,
    HostnameRfc1123,
    HostnamePort,
    IpAddr,
    Ip4Addr,
    Ip6Addr,
    Cidr,
    CidrV4,
    CidrV6,
    Mac,
    Uuid,
    Uuid3,
    Uuid4,
    Uuid5,
    Ulid,
    Latitude,
    Longitude,
    Hexadecimal,
    HexColor,
    Rgb,
    Rgba,
    Hsl,
    Hsla,
    E164,
    Semver,
    Base64,
    Base64Url,
    Jwt,
    /// `datetime=FORMAT` with a chrono strftime format.
    Datetime(String),
}

impl Validator {
    /// Compile one tag token.
    pub fn from_token(token: &TagToken<'_>) -> Result<Self, TagError> {
        let simple = |v: Validator| token.no_arg().map(|_| v);
        let text = || token.required_arg().map(str::to_string);

        match token.name {
            "required" => simple(Self::Required),
            "boolean" => simple(Self::Boolean),
            "numeric" => simple(Self::Numeric),
            "number" => simple(Self::Number),
            "alpha" => simple(Self::Alpha),
            "alphaunicode" => simple(Self::AlphaUnicode),
            "alphaspace" => simple(Self::AlphaSpace),
            "alphanumeric" => simple(Self::AlphaNumeric),
            "alphanumunicode" => simple(Self::AlphaNumUnicode),
            "ascii" => simple(Self::Ascii),
            "printascii" => simple(Self::PrintAscii),
            "multibyte" => simple(Self::Multibyte),
            "lowercase" => simple(Self::Lowercase),
            "uppercase" => simple(Self::Uppercase),
            "eq" => Ok(Self::Eq(text()?)),
            "ne" => Ok(Self::Ne(text()?)),
            "eq_ignore_case" => Ok(Self::EqIgnoreCase(text()?)),
            "ne_ignore_case" => Ok(Self::NeIgnoreCase(text()?)),
            "gt" => Ok(Self::Gt(token.number_arg()?)),
            "gte" => Ok(Self::Gte(token.number_arg()?)),
            "lt" => Ok(Self::Lt(token.number_arg()?)),
            "lte" => Ok(Self::Lte(token.number_arg()?)),
            "min" => Ok(Self::Min(token.number_arg()?)),
            "max" => Ok(Self::Max(token.number_arg()?)),
            "len" => Ok(Self::Len(token.number_arg()?)),
            "oneof" => {
                let options: Vec<String> = token
                    .required_arg()?
                    .split_whitespace()
                    .map(str::to_string)
                    .collect();
                Ok(Self::OneOf(options))
            }
            "startswith" => Ok(Self::StartsWith(text()?)),
            "startsnotwith" => Ok(Self::StartsNotWith(text()?)),
            "endswith" => Ok(Self::EndsWith(text()?)),
            "endsnotwith" => Ok(Self::EndsNotWith(text()?)),
            "contains" => Ok(Self::Contains(text()?)),
            "containsany" => Ok(Self::ContainsAny(text()?)),
            "containsrune" => Ok(Self::ContainsRune(token.char_arg()?)),
            "excludes" => Ok(Self::Excludes(text()?)),
            "excludesall" => Ok(Self::ExcludesAll(text()?)),
            "excludesrune" => Ok(Self::ExcludesRune(token.char_arg()?)),
            "email" => simple(Self::Email),
            "url" => simple(Self::Url),
            "http_url" => simple(Self::HttpUrl),
            "https_url" => simple(Self::HttpsUrl),
            "uri" => simple(Self::Uri),
            "url_encoded" => simple(Self::UrlEncoded),
            "fqdn" => simple(Self::Fqdn),
            "hostname" => simple(Self::Hostname),
            "hostname_rfc1123" => simple(Self::HostnameRfc1123),
            "hostname_port" => simple(Self::HostnamePort),
            "ip_addr" | "ip" => simple(Self::IpAddr),
            "ip4_addr" | "ipv4" => simple(Self::Ip4Addr),
            "ip6_addr" | "ipv6" => simple(Self::Ip6Addr),
            "cidr" => simple(Self::Cidr),
            "cidrv4" => simple(Self::CidrV4),
            "cidrv6" => simple(Self::CidrV6),
            "mac" => simple(Self::Mac),
            "uuid" => simple(Self::Uuid),
            "uuid3" => simple(Self::Uuid3),
            "uuid4" => simple(Self::Uuid4),
            "uuid5" => simple(Self::Uuid5),
            "ulid" => simple(Self::Ulid),
            "latitude" => simple(Self::Latitude),
            "longitude" => simple(Self::Longitude),
            "hexadecimal" => simple(Self::Hexadecimal),
            "hexcolor" => simple(Self::HexColor),
            "rgb" => simple(Self::Rgb),
            "rgba" => simple(Self::Rgba),
            "hsl" => simple(Self::Hsl),
            "hsla" => simple(Self::Hsla),
            "e164" => simple(Self::E164),
            "semver" => simple(Self::Semver),
            "base64" => simple(Self::Base64),
            "base64url" => simple(Self::Base64Url),
            "jwt" => simple(Self::Jwt),
            "datetime" => {
                let format = token.required_arg()?;
                if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                    return Err(TagError::malformed(format!(
                        "invalid datetime format '{format}'"
                    )));
                }
                Ok(Self::Datetime(format.to_string()))
            }
            _ => Err(TagError::Unknown),
        }
    }

    /// Tag name reported in validation errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Boolean => "boolean",
            Self::Numeric => "numeric",
            Self::Number => "number",
            Self::Alpha => "alpha",
            Self::AlphaUnicode => "alphaunicode",
            Self::AlphaSpace => "alphaspace",
            Self::AlphaNumeric => "alphanumeric",
            Self::AlphaNumUnicode => "alphanumunicode",
            Self::Ascii => "ascii",
            Self::PrintAscii => "printascii",
            Self::Multibyte => "multibyte",
            Self::Lowercase => "lowercase",
            Self::Uppercase => "uppercase",
            Self::Eq(_) => "eq",
            Self::Ne(_) => "ne",
            Self::EqIgnoreCase(_) => "eq_ignore_case",
            Self::NeIgnoreCase(_) => "ne_ignore_case",
            Self::Gt(_) => "gt",
            Self::Gte(_) => "gte",
            Self::Lt(_) => "lt",
            Self::Lte(_) => "lte",
            Self::Min(_) => "min",
            Self::Max(_) => "max",
            Self::Len(_) => "len",
            Self::OneOf(_) => "oneof",
            Self::StartsWith(_) => "startswith",
            Self::StartsNotWith(_) => "startsnotwith",
            Self::EndsWith(_) => "endswith",
            Self::EndsNotWith(_) => "endsnotwith",
            Self::Contains(_) => "contains",
            Self::ContainsAny(_) => "containsany",
            Self::ContainsRune(_) => "containsrune",
            Self::Excludes(_) => "excludes",
            Self::ExcludesAll(_) => "excludesall",
            Self::ExcludesRune(_) => "excludesrune",
            Self::Email => "email",
            Self::Url => "url",
            Self::HttpUrl => "http_url",
            Self::HttpsUrl => "https_url",
            Self::Uri => "uri",
            Self::UrlEncoded => "url_encoded",
            Self::Fqdn => "fqdn",
            Self::Hostname => "hostname",
            Self::HostnameRfc1123 => "hostname_rfc1123",
            Self::HostnamePort => "hostname_port",
            Self::IpAddr => "ip_addr",
            Self::Ip4Addr => "ip4_addr",
            Self::Ip6Addr => "ip6_addr",
            Self::Cidr => "cidr",
            Self::CidrV4 => "cidrv4",
            Self::CidrV6 => "cidrv6",
            Self::Mac => "mac",
            Self::Uuid => "uuid",
            Self::Uuid3 => "uuid3",
            Self::Uuid4 => "uuid4",
            Self::Uuid5 => "uuid5",
            Self::Ulid => "ulid",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::Hexadecimal => "hexadecimal",
            Self::HexColor => "hexcolor",
            Self::Rgb => "rgb",
            Self::Rgba => "rgba",
            Self::Hsl => "hsl",
            Self::Hsla => "hsla",
            Self::E164 => "e164",
            Self::Semver => "semver",
            Self::Base64 => "base64",
            Self::Base64Url => "base64url",
            Self::Jwt => "jwt",
            Self::Datetime(_) => "datetime",
        }
    }

    /// Check `value` (the restringified field value); `Err` carries the failure message.
    pub fn check(&self, value: &str, data_type: &DataType) -> Result<(), String> {
        if value.is_empty() {
            return match self {
                Self::Required => Err("value is required".to_string()),
                _ => Ok(()),
            };
        }

        let ok = match self {
            Self::Required => true,
            Self::Boolean => {
                matches!(
                    value,
                    "1" | "t" | "T" | "TRUE" | "true" | "True" | "0" | "f" | "F" | "FALSE"
                        | "false" | "False"
                )
            }
            Self::Numeric => NUMERIC.is_match(value),
            Self::Number => NUMBER.is_match(value),
            Self::Alpha => ALPHA.is_match(value),
            Self::AlphaUnicode => value.chars().all(char::is_alphabetic),
            Self::AlphaSpace => ALPHA_SPACE.is_match(value),
            Self::AlphaNumeric => ALPHA_NUMERIC.is_match(value),
            Self::AlphaNumUnicode => value.chars().all(char::is_alphanumeric),
            Self::Ascii => value.is_ascii(),
            Self::PrintAscii => value.chars().all(|c| (' '..='~').contains(&c)),
            Self::Multibyte => !value.is_ascii(),
            Self::Lowercase => value == value.to_lowercase(),
            Self::Uppercase => value == value.to_uppercase(),
            Self::Eq(expected) => values_equal(value, expected, data_type),
            Self::Ne(expected) => !values_equal(value, expected, data_type),
            Self::EqIgnoreCase(expected) => value.to_lowercase() == expected.to_lowercase(),
            Self::NeIgnoreCase(expected) => value.to_lowercase() != expected.to_lowercase(),
            Self::Gt(n) | Self::Gte(n) | Self::Lt(n) | Self::Lte(n) => {
                let Some(v) = parse_number(value) else {
                    return Err(format!("value '{value}' is not a number"));
                };
                match self {
                    Self::Gt(_) => v > *n,
                    Self::Gte(_) => v >= *n,
                    Self::Lt(_) => v < *n,
                    _ => v <= *n,
                }
            }
            Self::Min(n) | Self::Max(n) | Self::Len(n) => {
                let measured = measure(value, data_type);
                match self {
                    Self::Min(_) => measured >= *n,
                    Self::Max(_) => measured <= *n,
                    _ => measured == *n,
                }
            }
            Self::OneOf(options) => options.iter().any(|o| o == value),
            Self::StartsWith(p) => value.starts_with(p.as_str()),
            Self::StartsNotWith(p) => !value.starts_with(p.as_str()),
            Self::EndsWith(s) => value.ends_with(s.as_str()),
            Self::EndsNotWith(s) => !value.ends_with(s.as_str()),
            Self::Contains(s) => value.contains(s.as_str()),
            Self::ContainsAny(chars) => value.chars().any(|c| chars.contains(c)),
            Self::ContainsRune(c) => value.contains(*c),
            Self::Excludes(s) => !value.contains(s.as_str()),
            Self::ExcludesAll(chars) => !value.chars().any(|c| chars.contains(c)),
            Self::ExcludesRune(c) => !value.contains(*c),
            Self::Email => EMAIL.is_match(value),
            Self::Url => URL.is_match(value),
            Self::HttpUrl => url_with_scheme(value, &["http", "https"]),
            Self::HttpsUrl => url_with_scheme(value, &["https"]),
            Self::Uri => URI.is_match(value),
            Self::UrlEncoded => URL_ENCODED.is_match(value),
            Self::Fqdn => FQDN.is_match(value),
            Self::Hostname => HOSTNAME_RFC952.is_match(value),
            Self::HostnameRfc1123 => HOSTNAME_RFC1123.is_match(value),
            Self::HostnamePort => hostname_port(value),
            Self::IpAddr => value.parse::<IpAddr>().is_ok(),
            Self::Ip4Addr => value.parse::<Ipv4Addr>().is_ok(),
            Self::Ip6Addr => value.parse::<Ipv6Addr>().is_ok(),
            Self::Cidr => cidr(value, None),
            Self::CidrV4 => cidr(value, Some(false)),
            Self::CidrV6 => cidr(value, Some(true)),
            Self::Mac => MAC.is_match(value),
            Self::Uuid => UUID.is_match(value),
            Self::Uuid3 => UUID3.is_match(value),
            Self::Uuid4 => UUID4.is_match(value),
            Self::Uuid5 => UUID5.is_match(value),
            Self::Ulid => ULID.is_match(value),
            Self::Latitude => parse_number(value).is_some_and(|v| (-90.0..=90.0).contains(&v)),
            Self::Longitude => parse_number(value).is_some_and(|v| (-180.0..=180.0).contains(&v)),
            Self::Hexadecimal => HEXADECIMAL.is_match(value),
            Self::HexColor => HEXCOLOR.is_match(value),
            Self::Rgb => color_components(&RGB, value, &[255, 255, 255]),
            Self::Rgba => color_components(&RGBA, value, &[255, 255, 255]),
            Self::Hsl => color_components(&HSL, value, &[360, 100, 100]),
            Self::Hsla => color_components(&HSLA, value, &[360, 100, 100]),
            Self::E164 => E164.is_match(value),
            Self::Semver => SEMVER.is_match(value),
            Self::Base64 => BASE64.is_match(value),
            Self::Base64Url => BASE64_URL.is_match(value),
            Self::Jwt => JWT.is_match(value),
            Self::Datetime(format) => {
                NaiveDateTime::parse_from_str(value, format).is_ok()
                    || NaiveDate::parse_from_str(value, format).is_ok()
                    || NaiveTime::parse_from_str(value, format).is_ok()
            }
        };

        if ok { Ok(()) } else { Err(self.failure_message(value)) }
    }

    fn failure_message(&self, value: &str) -> String {
        match self {
            Self::Eq(v) => format!("value '{value}' must equal '{v}'"),
            Self::Ne(v) => format!("value must not equal '{v}'"),
            Self::EqIgnoreCase(v) => format!("value '{value}' must equal '{v}' (ignoring case)"),
            Self::NeIgnoreCase(v) => format!("value must not equal '{v}' (ignoring case)"),
            Self::Gt(n) => format!("value {value} must be greater than {n}"),
            Self::Gte(n) => format!("value {value} must be greater than or equal to {n}"),
            Self::Lt(n) => format!("value {value} must be less than {n}"),
            Self::Lte(n) => format!("value {value} must be less than or equal to {n}"),
            Self::Min(n) => format!("value '{value}' is below the minimum of {n}"),
            Self::Max(n) => format!("value '{value}' exceeds the maximum of {n}"),
            Self::Len(n) => format!("value '{value}' must have length {n}"),
            Self::OneOf(options) => {
                format!("value '{value}' must be one of [{}]", options.join(" "))
            }
            Self::StartsWith(p) => format!("value must start with '{p}'"),
            Self::StartsNotWith(p) => format!("value must not start with '{p}'"),
            Self::EndsWith(s) => format!("value must end with '{s}'"),
            Self::EndsNotWith(s) => format!("value must not end with '{s}'"),
            Self::Contains(s) => format!("value must contain '{s}'"),
            Self::ContainsAny(s) => format!("value must contain one of the characters '{s}'"),
            Self::ContainsRune(c) => format!("value must contain '{c}'"),
            Self::Excludes(s) => format!("value must not contain '{s}'"),
            Self::ExcludesAll(s) => format!("value must not contain any of the characters '{s}'"),
            Self::ExcludesRune(c) => format!("value must not contain '{c}'"),
            Self::Datetime(format) => format!("value '{value}' does not match format '{format}'"),
            other => format!("value '{value}' failed '{}' validation", other.name()),
        }
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn values_equal(value: &str, expected: &str, data_type: &DataType) -> bool {
    if data_type.is_numeric() {
        if let (Some(a), Some(b)) = (parse_number(value), parse_number(expected)) {
            return a == b;
        }
    }
    value == expected
}

fn measure(value: &str, data_type: &DataType) -> f64 {
    if data_type.is_numeric() {
        if let Some(v) = parse_number(value) {
            return v;
        }
    }
    value.chars().count() as f64
}

fn url_with_scheme(value: &str, schemes: &[&str]) -> bool {
    URL.captures(value)
        .and_then(|caps| caps.get(1))
        .is_some_and(|scheme| schemes.iter().any(|s| s.eq_ignore_ascii_case(scheme.as_str())))
}

fn hostname_port(value: &str) -> bool {
    let Some((host, port)) = value.rsplit_once(':') else {
        return false;
    };
    let port_ok = port.parse::<u16>().is_ok_and(|p| p > 0);
    let host_ok = host.is_empty()
        || HOSTNAME_RFC1123.is_match(host)
        || host.parse::<Ipv4Addr>().is_ok();
    port_ok && host_ok
}

fn cidr(value: &str, v6: Option<bool>) -> bool {
    let Some((addr, prefix)) = value.split_once('/') else {
        return false;
    };
    let Ok(prefix) = prefix.parse::<u8>() else {
        return false;
    };
    match addr.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => v6 != Some(true) && prefix <= 32,
        Ok(IpAddr::V6(_)) => v6 != Some(false) && prefix <= 128,
        Err(_) => false,
    }
}

fn color_components(re: &Regex, value: &str, limits: &[u32]) -> bool {
    let Some(caps) = re.captures(value) else {
        return false;
    };
    limits.iter().enumerate().all(|(i, limit)| {
        caps.get(i + 1)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .is_some_and(|v| v <= *limit)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tags::tokenize;

    fn validator(tag: &str) -> Validator {
        Validator::from_token(&tokenize(tag)[0]).unwrap()
    }

    fn passes(tag: &str, value: &str) -> bool {
        validator(tag).check(value, &DataType::Utf8).is_ok()
    }

    #[test]
    fn required_is_the_only_rule_failing_on_empty() {
        assert!(!passes("required", ""));
        assert!(passes("required", "x"));
        assert!(passes("email", ""));
        assert!(passes("min=3", ""));
    }

    #[test]
    fn character_classes() {
        assert!(passes("alpha", "abcXYZ"));
        assert!(!passes("alpha", "abc1"));
        assert!(passes("alphaunicode", "日本語"));
        assert!(passes("alphaspace", "John Smith"));
        assert!(passes("alphanumeric", "abc123"));
        assert!(passes("numeric", "-12.5"));
        assert!(!passes("number", "-12"));
        assert!(passes("printascii", "Hello, World!"));
        assert!(!passes("ascii", "café"));
        assert!(passes("multibyte", "café"));
        assert!(passes("boolean", "True"));
        assert!(!passes("boolean", "yes"));
        assert!(passes("lowercase", "abc1"));
        assert!(!passes("uppercase", "Abc"));
    }

    #[test]
    fn numeric_comparisons() {
        assert!(passes("gt=0", "1"));
        assert!(!passes("gt=0", "0"));
        assert!(passes("gte=0", "0"));
        assert!(passes("lt=10", "9.5"));
        assert!(passes("lte=10", "10"));
        let err = validator("gt=0").check("abc", &DataType::Utf8).unwrap_err();
        assert!(err.contains("not a number"));
    }

    #[test]
    fn length_rules_depend_on_type() {
        let min = validator("min=3");
        assert!(min.check("abc", &DataType::Utf8).is_ok());
        assert!(min.check("ab", &DataType::Utf8).is_err());
        assert!(min.check("5", &DataType::Int64).is_ok());
        assert!(min.check("2", &DataType::Int64).is_err());
        assert!(validator("max=2").check("日本", &DataType::Utf8).is_ok());
        assert!(validator("len=2").check("ab", &DataType::Utf8).is_ok());
        assert!(validator("eq=1.5").check("1.50", &DataType::Float64).is_ok());
        assert!(validator("eq=1.5").check("1.50", &DataType::Utf8).is_err());
    }

    #[test]
    fn string_content() {
        assert!(passes("oneof=red green blue", "green"));
        assert!(!passes("oneof=red green blue", "Green"));
        assert!(passes("startswith=ab", "abc"));
        assert!(passes("endsnotwith=.tmp", "a.txt"));
        assert!(passes("containsany=!@#", "hi!"));
        assert!(!passes("excludesall=!@#", "hi!"));
        assert!(passes("containsrune=@", "a@b"));
        assert!(passes("eq_ignore_case=YES", "yes"));
        assert!(!passes("ne=x", "x"));
    }

    #[test]
    fn network_formats() {
        assert!(passes("email", "ada@example.com"));
        assert!(!passes("email", "ada@"));
        assert!(passes("url", "ftp://files.example.com/a"));
        assert!(passes("http_url", "HTTP://example.com"));
        assert!(!passes("https_url", "http://example.com"));
        assert!(passes("uri", "mailto:ada@example.com"));
        assert!(passes("url_encoded", "a%20b"));
        assert!(!passes("url_encoded", "a%2"));
        assert!(passes("fqdn", "www.example.com"));
        assert!(!passes("fqdn", "localhost"));
        assert!(passes("hostname", "localhost"));
        assert!(passes("hostname_port", "db.local:5432"));
        assert!(!passes("hostname_port", "db.local:99999"));
        assert!(passes("ip_addr", "::1"));
        assert!(!passes("ip4_addr", "::1"));
        assert!(passes("cidrv4", "10.0.0.0/8"));
        assert!(!passes("cidrv4", "10.0.0.0/33"));
        assert!(passes("cidr", "2001:db8::/32"));
        assert!(passes("mac", "00:1A:2b:3C:4d:5E"));
    }

    #[test]
    fn identifiers_and_encodings() {
        assert!(passes("uuid", "123E4567-e89b-12d3-a456-426614174000"));
        assert!(passes("uuid4", "f47ac10b-58cc-4372-a567-0e02b2c3d479"));
        assert!(!passes("uuid4", "123e4567-e89b-12d3-a456-426614174000"));
        assert!(passes("ulid", "01ARZ3NDEKTSV4RRFFQ69G5FAV"));
        assert!(passes("semver", "1.2.3-beta.1+build.5"));
        assert!(!passes("semver", "1.2"));
        assert!(passes("base64", "aGVsbG8="));
        assert!(!passes("base64", "aGVsbG8"));
        assert!(passes("jwt", "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxIn0.sig"));
        assert!(passes("e164", "+14155552671"));
        assert!(passes("hexadecimal", "0xFF"));
        assert!(passes("hexcolor", "#a1b2c3"));
        assert!(passes("rgb", "rgb(255, 0, 10)"));
        assert!(!passes("rgb", "rgb(256, 0, 10)"));
        assert!(passes("rgba", "rgba(1,2,3,0.5)"));
        assert!(passes("hsl", "hsl(360, 100%, 50%)"));
        assert!(passes("latitude", "-45.5"));
        assert!(!passes("longitude", "181"));
    }

    #[test]
    fn datetime_uses_strftime_format() {
        assert!(passes("datetime=%Y-%m-%d", "2024-02-29"));
        assert!(!passes("datetime=%Y-%m-%d", "2023-02-29"));
        assert!(passes("datetime=%Y-%m-%d %H:%M", "2024-01-01 10:30"));
    }

    #[test]
    fn malformed_and_unknown_tokens() {
        let bad = |tag: &str| Validator::from_token(&tokenize(tag)[0]).unwrap_err();
        assert_eq!(bad("nonsense"), TagError::Unknown);
        assert!(matches!(bad("gt=abc"), TagError::Malformed(_)));
        assert!(matches!(bad("oneof"), TagError::Malformed(_)));
        assert!(matches!(bad("datetime=%Q"), TagError::Malformed(_)));
        assert!(matches!(bad("email=x"), TagError::Malformed(_)));
    }

    #[test]
    fn failure_messages_name_the_rule() {
        let err = validator("email").check("nope", &DataType::Utf8).unwrap_err();
        assert!(err.contains("email"));
        let err = validator("oneof=a b").check("c", &DataType::Utf8).unwrap_err();
        assert!(err.contains("[a b]"));
    }
}
