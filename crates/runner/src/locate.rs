//! Startup lookup of the automation tool.

use std::path::PathBuf;

use trigger::ConfigError;

/// Resolves `tool` to an executable path.
///
/// A bare name is searched for on `PATH`; anything containing a path
/// separator is checked directly.
///
/// # Errors
///
/// Returns [`ConfigError::ToolNotFound`] if no executable exists. Callers
/// treat this as fatal.
pub fn locate_tool(tool: &str) -> Result<PathBuf, ConfigError> {
    which::which(tool).map_err(|e| ConfigError::ToolNotFound {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_locates_tool_on_path() {
        let path = locate_tool("sh").unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("sh"));
    }

    #[test]
    fn test_missing_tool_is_a_config_error() {
        let err = locate_tool("ansible-playbook-does-not-exist-4f1c").unwrap_err();

        assert!(matches!(err, ConfigError::ToolNotFound { ref tool, .. } if tool == "ansible-playbook-does-not-exist-4f1c"));
        assert!(err.to_string().starts_with("unable to find ansible-playbook-does-not-exist-4f1c"));
    }

    #[test]
    fn test_missing_explicit_path_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("ansible-playbook");

        assert!(locate_tool(&missing.to_string_lossy()).is_err());
    }
}
