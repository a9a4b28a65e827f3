//! Standard location of the tagpanel configuration files

use std::path::PathBuf;

/// `<config dir>/tagpanel`, falling back to the working directory
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tagpanel")
}

/// `<config dir>/tagpanel/{filename}`
pub fn default_config_path(filename: &str) -> PathBuf {
    default_config_dir().join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_ends_with_app_name() {
        assert!(default_config_dir().ends_with("tagpanel"));
    }

    #[test]
    fn test_config_path_includes_filename() {
        let path = default_config_path("panel.yaml");
        assert!(path.ends_with("panel.yaml"));
    }
}
