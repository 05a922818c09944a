use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomeDirError {
    #[error("cannot determine user home directory (HOME/APPDATA not set)")]
    HomeUnavailable,

    #[error("failed to create directory '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

/// Platform base directory used when no explicit home_dir is configured.
/// Windows: %APPDATA%, Unix/macOS: $HOME.
fn platform_base_dir() -> Result<PathBuf, HomeDirError> {
    #[cfg(target_os = "windows")]
    let var = "APPDATA";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";

    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or(HomeDirError::HomeUnavailable)
}

/// Expand a leading `~` into the user's home directory.
fn expand_tilde(raw: &str) -> Result<PathBuf, HomeDirError> {
    if raw == "~" {
        return platform_base_dir();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_base_dir()?.join(rest));
    }
    Ok(PathBuf::from(raw))
}

fn absolutize(p: PathBuf) -> Result<PathBuf, HomeDirError> {
    if p.is_absolute() {
        Ok(p)
    } else {
        let cwd = std::env::current_dir().map_err(HomeDirError::CurrentDir)?;
        Ok(cwd.join(p))
    }
}

/// Resolve the application home directory.
///
/// - `configured`: value from config; `None` selects `<platform base>/<default_subdir>`.
/// - `~` is expanded, relative paths are made absolute against the cwd.
/// - when `create` is set the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf, HomeDirError> {
    let path = match configured {
        Some(raw) => absolutize(expand_tilde(raw.trim())?)?,
        None => platform_base_dir()?.join(default_subdir),
    };

    if create {
        ensure_dir(&path)?;
    }
    Ok(path)
}

fn ensure_dir(path: &Path) -> Result<(), HomeDirError> {
    std::fs::create_dir_all(path).map_err(|source| HomeDirError::Create {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_absolute_path_is_kept_and_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("nested").join("home");
        let resolved =
            resolve_home_dir(Some(target.to_string_lossy().to_string()), ".x", true).unwrap();
        assert_eq!(resolved, target);
        assert!(target.is_dir());
    }

    #[test]
    fn relative_path_becomes_absolute() {
        let resolved = resolve_home_dir(Some("relative/dir".into()), ".x", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("relative/dir"));
    }
}
