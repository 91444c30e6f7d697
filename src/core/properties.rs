// ─── Property Model ───
// Parses and validates the canonical `gradle.properties`-style file.
// The property file is the single source of truth for version, loader and
// identity fields; every diagnostic names the offending key or line so CI
// output stays actionable.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::core::error::{CheckError, CheckResult};
use crate::core::loader::LoaderType;

/// Parsed and validated build properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildProperties {
    pub minecraft_version: String,
    pub mod_id: String,
    pub mod_version: String,
    pub loader_multi: bool,
    /// Single-loader projects: the one declared loader.
    pub loader_type: Option<LoaderType>,
    /// Multi-loader projects: the declared loader set, in declaration order.
    pub active_loaders: Vec<LoaderType>,
    /// Java toolchain major version, when declared.
    pub java_version: Option<u32>,
}

impl BuildProperties {
    /// Read and parse a property file from disk.
    pub fn load(path: &Path) -> CheckResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CheckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded property file {:?}", path);
        Self::parse(&text)
    }

    /// Parse a flat `key=value` document.
    ///
    /// Rules:
    /// - blank lines and `#` comments are ignored;
    /// - every other line must be a `key=value` pair;
    /// - keys must be lower_snake_case and unique;
    /// - required fields: `minecraft_version`, `mod_id`, `mod_version`,
    ///   `loader_multi`, and either `loader_type` or `active_loaders`
    ///   depending on `loader_multi`.
    pub fn parse(text: &str) -> CheckResult<Self> {
        let pairs = parse_pairs(text)?;

        let minecraft_version = required(&pairs, "minecraft_version")?;
        if !is_dotted_numeric(&minecraft_version) {
            return Err(CheckError::Property(format!(
                "minecraft_version '{minecraft_version}' is not a dotted numeric version"
            )));
        }

        let mod_id = required(&pairs, "mod_id")?;
        let mod_version = required(&pairs, "mod_version")?;

        let loader_multi = match required(&pairs, "loader_multi")?.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(CheckError::Property(format!(
                    "loader_multi must be 'true' or 'false', got '{other}'"
                )))
            }
        };

        let mut loader_type = None;
        let mut active_loaders = Vec::new();

        if loader_multi {
            let raw = required(&pairs, "active_loaders")?;
            for part in raw.split(',') {
                let name = part.trim();
                if name.is_empty() {
                    return Err(CheckError::Property(
                        "active_loaders contains an empty entry".to_string(),
                    ));
                }
                let loader: LoaderType = name.parse().map_err(|_| {
                    CheckError::Property(format!(
                        "active_loaders contains unrecognized loader '{name}'"
                    ))
                })?;
                if active_loaders.contains(&loader) {
                    return Err(CheckError::Property(format!(
                        "active_loaders lists '{name}' more than once"
                    )));
                }
                active_loaders.push(loader);
            }
            if active_loaders.len() < 2 {
                return Err(CheckError::Property(format!(
                    "active_loaders must list at least 2 loaders when loader_multi=true, got {}",
                    active_loaders.len()
                )));
            }
        } else {
            let raw = required(&pairs, "loader_type")?;
            let loader: LoaderType = raw.parse().map_err(|_| {
                CheckError::Property(format!("loader_type '{raw}' is not a recognized loader"))
            })?;
            loader_type = Some(loader);
        }

        let java_version = match pairs.get("java_version") {
            Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
                CheckError::Property(format!("java_version '{raw}' is not a number"))
            })?),
            None => None,
        };

        Ok(Self {
            minecraft_version,
            mod_id,
            mod_version,
            loader_multi,
            loader_type,
            active_loaders,
            java_version,
        })
    }
}

/// Split the document into validated `key=value` pairs.
fn parse_pairs(text: &str) -> CheckResult<HashMap<String, String>> {
    let mut pairs = HashMap::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| {
            CheckError::Property(format!(
                "line {} is not a key=value pair: '{line}'",
                index + 1
            ))
        })?;
        let key = key.trim();
        let value = value.trim();

        if !is_snake_case_key(key) {
            return Err(CheckError::Property(format!(
                "key '{key}' is not lower_snake_case (line {})",
                index + 1
            )));
        }
        if pairs.insert(key.to_string(), value.to_string()).is_some() {
            return Err(CheckError::Property(format!("duplicate key '{key}'")));
        }
    }

    Ok(pairs)
}

fn required(pairs: &HashMap<String, String>, key: &str) -> CheckResult<String> {
    match pairs.get(key) {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        Some(_) => Err(CheckError::Property(format!(
            "required field '{key}' is empty"
        ))),
        None => Err(CheckError::Property(format!(
            "required field '{key}' is missing"
        ))),
    }
}

fn is_snake_case_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn is_dotted_numeric(version: &str) -> bool {
    !version.is_empty()
        && version
            .split('.')
            .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_digit()))
}
