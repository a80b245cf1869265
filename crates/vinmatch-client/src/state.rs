use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::registry::{BUILTIN_ORIGIN, PatternRegistry};
use crate::records::input::read_file;
use crate::{ClientError, ClientResult};

pub const HOME_ENV: &str = "VINMATCH_HOME";
const REGISTRY_FILE_NAME: &str = "registry.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrySourceKind {
    Explicit,
    Home,
    Builtin,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrySource {
    pub kind: RegistrySourceKind,
    pub path: Option<String>,
    pub home: Option<String>,
}

pub fn resolve_home(home_override: Option<&Path>) -> ClientResult<PathBuf> {
    let candidate = match home_override {
        Some(path) => path.to_path_buf(),
        None => {
            if let Some(override_path) = std::env::var_os(HOME_ENV) {
                if override_path.is_empty() {
                    return Err(ClientError::home_unresolved(&format!(
                        "`{HOME_ENV}` is set but empty."
                    )));
                }
                PathBuf::from(override_path)
            } else if let Some(home_path) = home::home_dir() {
                home_path.join(".vinmatch")
            } else {
                return Err(ClientError::home_unresolved(
                    "No user home directory is available.",
                ));
            }
        }
    };

    absolutize(&candidate)
}

pub fn registry_path(home: &Path) -> PathBuf {
    home.join(REGISTRY_FILE_NAME)
}

/// Explicit path, then `<home>/registry.json` when it exists, then the
/// bundled registry.
pub fn load_registry(
    explicit: Option<&str>,
    home_override: Option<&Path>,
) -> ClientResult<(PatternRegistry, RegistrySource)> {
    if let Some(path) = explicit {
        let content = read_file(path)?;
        let registry = PatternRegistry::from_json(&content, path)?;
        return Ok((
            registry,
            RegistrySource {
                kind: RegistrySourceKind::Explicit,
                path: Some(path.to_string()),
                home: None,
            },
        ));
    }

    let home = match resolve_home(home_override) {
        Ok(home) => Some(home),
        Err(error) => {
            warn!(reason = %error.message, "falling back to the bundled registry");
            None
        }
    };

    if let Some(home) = &home {
        let candidate = registry_path(home);
        if candidate.is_file() {
            let location = candidate.display().to_string();
            let content = read_file(&location)?;
            let registry = PatternRegistry::from_json(&content, &location)?;
            return Ok((
                registry,
                RegistrySource {
                    kind: RegistrySourceKind::Home,
                    path: Some(location),
                    home: Some(home.display().to_string()),
                },
            ));
        }
        debug!(path = %candidate.display(), "no registry file in home directory");
    }

    Ok((
        PatternRegistry::builtin()?,
        RegistrySource {
            kind: RegistrySourceKind::Builtin,
            path: None,
            home: home.map(|path| path.display().to_string()),
        },
    ))
}

impl RegistrySource {
    pub fn label(&self) -> &str {
        self.path.as_deref().unwrap_or(BUILTIN_ORIGIN)
    }
}

fn absolutize(path: &Path) -> ClientResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|error| ClientError::home_unresolved(&error.to_string()))
}
