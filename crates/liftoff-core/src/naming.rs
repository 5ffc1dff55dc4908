use std::fmt;
use std::str::FromStr;

/// Registry names: 5-50 lowercase alphanumerics.
const REGISTRY_MAX: usize = 50;
/// Web app names are capped at 60, DNS labels at 63; the tighter bound serves both.
const LABEL_MAX: usize = 60;

const TOKEN_MIN: usize = 4;
const TOKEN_MAX: usize = 16;

/// Per-run uniqueness token embedded in resource names.
///
/// Defaults to the UTC start time (`YYMMDDhhmmss`), so two runs started at
/// different seconds never share registry, app, or DNS names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunToken(String);

impl RunToken {
    pub fn now() -> Self {
        Self::at(chrono::Utc::now())
    }

    pub fn at(instant: chrono::DateTime<chrono::Utc>) -> Self {
        Self(instant.format("%y%m%d%H%M%S").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RunToken {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = (TOKEN_MIN..=TOKEN_MAX).contains(&s.len())
            && s
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        if valid {
            Ok(Self(s.to_owned()))
        } else {
            Err(crate::Error::InvalidRunToken(s.to_owned()))
        }
    }
}

impl fmt::Display for RunToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercase alphanumerics only.
pub fn alnum(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Lowercase alphanumerics and single hyphens, no leading/trailing hyphen.
pub fn dns_label(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_owned()
}

/// `<alnum(base)>acr<token>`, truncated so the whole fits a registry name.
pub fn registry_name(base: &str, token: &RunToken) -> String {
    let budget = REGISTRY_MAX - "acr".len() - token.as_str().len();
    let prefix: String = alnum(base).chars().take(budget).collect();
    format!("{prefix}acr{token}")
}

/// `<dns_label(base)>-<token>`, truncated to a valid label.
pub fn unique_label(base: &str, token: &RunToken) -> String {
    let budget = LABEL_MAX - 1 - token.as_str().len();
    let prefix: String = dns_label(base).chars().take(budget).collect();
    let prefix = prefix.trim_end_matches('-');
    if prefix.is_empty() {
        format!("app-{token}")
    } else {
        format!("{prefix}-{token}")
    }
}
