use crate::error::{SmwError, SmwResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Page size of a `list=categorymembers` query. Only the first page is fetched.
pub const CATEGORY_MEMBER_LIMIT: usize = 200;

/// Property metadata lookups in flight at once while resolving one page
pub const PROPERTY_FETCH_CONCURRENCY: usize = 4;

pub const USER_AGENT: &str = concat!("smw-client/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_CONFIG_PATH: &str = "config.yml";

/// Connection settings read from a YAML file:
///
/// ```yaml
/// url: https://wiki.example.org/
/// api: https://wiki.example.org/api.php
/// lgname: Importer
/// lgpassword: secret
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct WikiConfig {
    /// Wiki base URL; `index.php` is resolved against it
    pub url: String,
    /// Full URL of `api.php`
    pub api: String,
    pub lgname: String,
    pub lgpassword: String,
    #[serde(default)]
    pub verbose: bool,
}

impl WikiConfig {
    pub fn from_yaml(text: &str) -> SmwResult<Self> {
        serde_yaml::from_str(text).map_err(|e| SmwError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> SmwResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| SmwError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_yaml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "url: https://wiki.example.org/\n\
                          api: https://wiki.example.org/api.php\n\
                          lgname: Importer\n\
                          lgpassword: secret\n";

    #[test]
    fn parses_required_keys() {
        let config = WikiConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.url, "https://wiki.example.org/");
        assert_eq!(config.api, "https://wiki.example.org/api.php");
        assert_eq!(config.lgname, "Importer");
        assert_eq!(config.lgpassword, "secret");
        assert!(!config.verbose);
    }

    #[test]
    fn verbose_is_optional() {
        let config = WikiConfig::from_yaml(&format!("{SAMPLE}verbose: true\n")).unwrap();
        assert!(config.verbose);
    }

    #[test]
    fn missing_key_is_config_error() {
        let result = WikiConfig::from_yaml("url: https://wiki.example.org/\n");
        assert!(matches!(result, Err(SmwError::Config(_))));
    }

    #[test]
    fn load_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = WikiConfig::load(file.path()).unwrap();
        assert_eq!(config.lgname, "Importer");
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let result = WikiConfig::load("/nonexistent/config.yml");
        assert!(matches!(result, Err(SmwError::Config(_))));
    }
}
