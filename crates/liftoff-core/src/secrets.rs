use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};

/// Secrets read from the local KEY=VALUE file.
///
/// Values are wrapped in [`SecretString`] and never appear in `Debug`
/// output; only key names do.
pub struct SecretSet {
    source: PathBuf,
    entries: BTreeMap<String, SecretString>,
}

impl SecretSet {
    /// Read `path` and verify every key in `required` is present and non-empty.
    ///
    /// Lines starting with `#` are comments. Parsing follows `dotenvy`, so
    /// quoted values and `export KEY=VALUE` lines are accepted too. Values are
    /// taken literally: a `$` outside single quotes is rejected rather than
    /// expanded against the process environment.
    pub fn load(path: &Path, required: &[String]) -> crate::Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(crate::Error::ConfigMissing {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => {
                return Err(crate::Error::SecretRead {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        if let Some(key) = first_expanding_key(&content) {
            return Err(crate::Error::SecretExpansion {
                key: key.to_owned(),
                path: path.to_path_buf(),
            });
        }

        let iter = dotenvy::from_read_iter(content.as_bytes());

        let mut entries = BTreeMap::new();
        for item in iter {
            let (key, value) = item.map_err(|e| map_dotenv_error(path, e))?;
            entries.insert(key, SecretString::from(value));
        }

        let set = Self {
            source: path.to_path_buf(),
            entries,
        };
        set.require(required)?;

        tracing::debug!(
            path = %path.display(),
            keys = set.entries.len(),
            "secrets loaded"
        );
        Ok(set)
    }

    /// Build a set from in-memory pairs, applying the same required-key check.
    pub fn from_pairs<I, K, V>(pairs: I, required: &[String]) -> crate::Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let set = Self {
            source: PathBuf::new(),
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), SecretString::from(v.into())))
                .collect(),
        };
        set.require(required)?;
        Ok(set)
    }

    fn require(&self, required: &[String]) -> crate::Result<()> {
        for key in required {
            let present = self
                .entries
                .get(key)
                .is_some_and(|v| !v.expose_secret().trim().is_empty());
            if !present {
                return Err(crate::Error::RequiredSecretMissing {
                    key: key.clone(),
                    path: self.source.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&SecretString> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SecretString)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for SecretSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretSet")
            .field("source", &self.source)
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn map_dotenv_error(path: &Path, err: dotenvy::Error) -> crate::Error {
    crate::Error::SecretParse {
        path: path.to_path_buf(),
        source: err,
    }
}

/// First key whose value `dotenvy` would substitute from the environment.
///
/// Only single-quoted values are literal; unquoted and double-quoted values
/// expand `$NAME` and `${NAME}`.
fn first_expanding_key(content: &str) -> Option<&str> {
    // Key of a single-quoted value still open from an earlier line.
    let mut open_quote: Option<&str> = None;
    for raw in content.lines() {
        if let Some(key) = open_quote {
            if let Some((_, tail)) = raw.split_once('\'') {
                open_quote = None;
                if tail.contains('$') {
                    return Some(key);
                }
            }
            continue;
        }

        let line = raw.trim_start();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = match line.strip_prefix("export ") {
            Some(rest) => rest,
            None => line,
        };
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim_start();

        let expands = match value.strip_prefix('\'') {
            Some(rest) => match rest.split_once('\'') {
                Some((_, tail)) => tail.contains('$'),
                None => {
                    open_quote = Some(key);
                    false
                }
            },
            None => value.contains('$'),
        };
        if expands {
            return Some(key);
        }
    }
    None
}
