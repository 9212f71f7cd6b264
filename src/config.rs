//! Client metadata loaded from a `key=value` file shipped next to the binary.
//!
//! Recognized keys:
//!
//! | Key                | Field               | Default                          |
//! |--------------------|---------------------|----------------------------------|
//! | `url`              | `base_url`          | `https://seeleft.de/go/api/v1/`  |
//! | `retrofit.version` | `framework_version` | none                             |
//! | `version`          | `client_version`    | this crate's package version     |
//!
//! Loading never fails. A missing or malformed file is logged and every field
//! falls back to its default.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

/// File read by [`Config::load`] when `REDIRECTOR_META` is unset.
pub const META_FILE: &str = ".meta";

/// Environment variable overriding the location of [`META_FILE`].
pub const META_FILE_ENV: &str = "REDIRECTOR_META";

pub const DEFAULT_BASE_URL: &str = "https://seeleft.de/go/api/v1/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub framework_version: Option<String>,
    pub client_version: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_entries(HashMap::new())
    }
}

impl Config {
    /// Loads the metadata file named by `REDIRECTOR_META`, or `.meta` in the
    /// working directory.
    pub fn load() -> Self {
        let path = std::env::var(META_FILE_ENV).unwrap_or_else(|_| META_FILE.to_string());
        Self::from_path(path)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Metadata file unreadable, using defaults"
                );
                return Self::default();
            }
        };

        debug!(path = %path.display(), "Loading redirector metadata");
        Self::parse(file).unwrap_or_else(|e| {
            warn!(
                path = %path.display(),
                error = %e,
                "Metadata file malformed, using defaults"
            );
            Self::default()
        })
    }

    /// Parses `key=value` lines from `reader`. Any parse error discards the
    /// whole file. Values are taken literally; `$NAME` is not expanded.
    pub fn from_reader<R: Read>(reader: R) -> Self {
        Self::parse(reader).unwrap_or_else(|e| {
            warn!(error = %e, "Metadata file malformed, using defaults");
            Self::default()
        })
    }

    fn parse<R: Read>(mut reader: R) -> anyhow::Result<Self> {
        let mut raw = String::new();
        reader.read_to_string(&mut raw)?;

        let escaped = escape_substitutions(&raw);
        let entries = dotenvy::from_read_iter(escaped.as_bytes())
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(Self::from_entries(entries))
    }

    fn from_entries(mut entries: HashMap<String, String>) -> Self {
        Self {
            base_url: entries
                .remove("url")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            framework_version: entries.remove("retrofit.version"),
            client_version: entries
                .remove("version")
                .or_else(|| Some(env!("CARGO_PKG_VERSION").to_string())),
        }
    }

    /// `User-Agent` sent with every redirector request.
    pub fn user_agent(&self) -> String {
        match &self.client_version {
            Some(version) => format!("redirector-client/{version}"),
            None => "redirector-client".to_string(),
        }
    }
}

/// Escapes `$` outside single quotes so dotenvy keeps it literal instead of
/// substituting from the environment. Single-quoted text is already literal.
/// Quote state does not carry across lines.
fn escape_substitutions(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for line in input.split_inclusive('\n') {
        let (mut single, mut double, mut escaped) = (false, false, false);
        for c in line.chars() {
            if escaped {
                escaped = false;
            } else if single {
                single = c != '\'';
            } else if c == '\\' {
                escaped = true;
            } else if c == '\'' && !double {
                single = true;
            } else if c == '"' {
                double = !double;
            } else if c == '$' {
                out.push('\\');
            }
            out.push(c);
        }
    }
    out
}
