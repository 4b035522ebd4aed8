use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::errors::{SearchError, SearchResult};

/// How an item is compared against an element.
///
/// Combined modes are independent alternatives: an element matches when any
/// enabled sub-mode matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MatchMode {
    #[default]
    Exact,
    Prefix,
    Suffix,
    Infix,
    PrefixInfix,
    PrefixSuffix,
    PrefixInfixSuffix,
    InfixSuffix,
    Regex,
}

impl MatchMode {
    /// Every mode, in the order they are listed to users
    pub const ALL: [MatchMode; 9] = [
        MatchMode::Exact,
        MatchMode::Prefix,
        MatchMode::Suffix,
        MatchMode::Infix,
        MatchMode::PrefixInfix,
        MatchMode::PrefixSuffix,
        MatchMode::PrefixInfixSuffix,
        MatchMode::InfixSuffix,
        MatchMode::Regex,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::Prefix => "prefix",
            MatchMode::Suffix => "suffix",
            MatchMode::Infix => "infix",
            MatchMode::PrefixInfix => "prefix+infix",
            MatchMode::PrefixSuffix => "prefix+suffix",
            MatchMode::PrefixInfixSuffix => "prefix+infix+suffix",
            MatchMode::InfixSuffix => "infix+suffix",
            MatchMode::Regex => "regex",
        }
    }

    pub fn has_prefix(self) -> bool {
        matches!(
            self,
            MatchMode::Prefix
                | MatchMode::PrefixInfix
                | MatchMode::PrefixSuffix
                | MatchMode::PrefixInfixSuffix
        )
    }

    pub fn has_infix(self) -> bool {
        matches!(
            self,
            MatchMode::Infix
                | MatchMode::PrefixInfix
                | MatchMode::PrefixInfixSuffix
                | MatchMode::InfixSuffix
        )
    }

    pub fn has_suffix(self) -> bool {
        matches!(
            self,
            MatchMode::Suffix
                | MatchMode::PrefixSuffix
                | MatchMode::PrefixInfixSuffix
                | MatchMode::InfixSuffix
        )
    }

    /// Whether the word separator takes part in matching for this mode
    pub fn uses_word_separator(self) -> bool {
        !matches!(self, MatchMode::Exact | MatchMode::Regex)
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MatchMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SearchError::invalid_mode(s))
    }
}

impl TryFrom<String> for MatchMode {
    type Error = SearchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MatchMode> for String {
    fn from(mode: MatchMode) -> Self {
        mode.as_str().to_string()
    }
}

/// Configuration for a search.
///
/// # Configuration Locations
///
/// Values can be loaded from several YAML files, later ones overriding
/// earlier ones:
/// 1. Global `$HOME/.config/seqscout/config.yaml`
/// 2. Local `.seqscout.yaml` in the current directory
/// 3. Custom config file specified via `--config`
///
/// # Configuration Format
///
/// ```yaml
/// # exact, prefix, suffix, infix, prefix+infix, prefix+suffix,
/// # prefix+infix+suffix, infix+suffix or regex
/// mode: "prefix"
///
/// # Fold case before comparing (regex mode compiles with the i flag)
/// case_insensitive: true
///
/// # Matches must align to this delimiter for prefix/infix/suffix
/// word_separator: "."
///
/// # 0 = unbounded, N = stop after N results,
/// # -N = stop once N distinct items have matched
/// max_results: 10
///
/// # 0 = unbounded
/// max_comparisons: 1000
///
/// unique: true
/// shuffle: false
/// seed: 42
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
///
/// Request files and command-line arguments take precedence over file
/// values; see [`SearchConfig::merge_overrides`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Lowercase items and elements before comparing
    #[serde(default)]
    pub case_insensitive: bool,

    #[serde(default)]
    pub mode: MatchMode,

    /// Delimiter that prefix/infix/suffix matches must align to
    #[serde(default)]
    pub word_separator: Option<String>,

    /// 0 = unbounded, +N = stop at N collected results,
    /// -N = stop once N distinct items have each matched
    #[serde(default)]
    pub max_results: i64,

    /// Hard cap on item/element comparisons; 0 = unbounded
    #[serde(default)]
    pub max_comparisons: u64,

    /// Drop results whose case-folded value was already collected
    #[serde(default)]
    pub unique: bool,

    /// Return results in random order
    #[serde(default)]
    pub shuffle: bool,

    /// Seed for a reproducible shuffle
    #[serde(default)]
    pub seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            mode: MatchMode::Exact,
            word_separator: None,
            max_results: 0,
            max_comparisons: 0,
            unique: false,
            shuffle: false,
            seed: None,
            log_level: default_log_level(),
        }
    }
}

impl SearchConfig {
    /// Loads configuration from the default locations
    pub fn load() -> SearchResult<Self> {
        Self::load_from(None)
    }

    /// Loads configuration from the default locations plus a specific file
    pub fn load_from(config_path: Option<&Path>) -> SearchResult<Self> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(SearchError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
        }

        let mut builder = ConfigBuilder::builder();

        let config_files = [
            dirs::config_dir().map(|p| p.join("seqscout/config.yaml")),
            Some(PathBuf::from(".seqscout.yaml")),
            config_path.map(PathBuf::from),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                debug!("Loading config from {}", path.display());
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        let config: SearchConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!("Loaded config: mode {}, max_results {}", config.mode, config.max_results);
        Ok(config)
    }

    /// Checks the settings that the type system cannot express
    pub fn validate(&self) -> SearchResult<()> {
        if matches!(self.word_separator.as_deref(), Some("")) {
            return Err(SearchError::EmptyWordSeparator);
        }
        Ok(())
    }

    /// Applies every setting the overrides carry, leaving the rest as is
    pub fn merge_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(case_insensitive) = overrides.case_insensitive {
            self.case_insensitive = case_insensitive;
        }
        if let Some(mode) = overrides.mode {
            self.mode = mode;
        }
        if overrides.word_separator.is_some() {
            self.word_separator = overrides.word_separator;
        }
        if let Some(max_results) = overrides.max_results {
            self.max_results = max_results;
        }
        if let Some(max_comparisons) = overrides.max_comparisons {
            self.max_comparisons = max_comparisons;
        }
        if let Some(unique) = overrides.unique {
            self.unique = unique;
        }
        if let Some(shuffle) = overrides.shuffle {
            self.shuffle = shuffle;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        if let Some(log_level) = overrides.log_level {
            self.log_level = log_level;
        }
        self
    }
}

/// Settings given explicitly by a layer above the config files.
///
/// A request file or the command line sets only what it names; every `None`
/// keeps the value from the layer below, so `mode: exact` or `max_results: 0`
/// still override a file that says otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_insensitive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<MatchMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_separator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_comparisons: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shuffle: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_parse_modes() {
        assert_eq!("exact".parse::<MatchMode>().unwrap(), MatchMode::Exact);
        assert_eq!(
            " Prefix+Infix ".parse::<MatchMode>().unwrap(),
            MatchMode::PrefixInfix
        );
        assert_eq!(
            "prefix+infix+suffix".parse::<MatchMode>().unwrap(),
            MatchMode::PrefixInfixSuffix
        );
        assert_eq!("REGEX".parse::<MatchMode>().unwrap(), MatchMode::Regex);

        let err = "suffix+prefix".parse::<MatchMode>().unwrap_err();
        assert!(matches!(err, SearchError::InvalidMode(ref m) if m == "suffix+prefix"));
    }

    #[test]
    fn test_mode_round_trips_through_display() {
        for mode in MatchMode::ALL {
            assert_eq!(mode.to_string().parse::<MatchMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_sub_modes() {
        assert!(MatchMode::PrefixInfixSuffix.has_prefix());
        assert!(MatchMode::PrefixInfixSuffix.has_infix());
        assert!(MatchMode::PrefixInfixSuffix.has_suffix());
        assert!(!MatchMode::InfixSuffix.has_prefix());
        assert!(!MatchMode::Exact.has_infix());
        assert!(!MatchMode::Regex.uses_word_separator());
        assert!(MatchMode::Suffix.uses_word_separator());
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let config_content = r#"
            case_insensitive: true
            mode: "prefix+suffix"
            word_separator: "."
            max_results: -2
            max_comparisons: 100
            unique: true
            shuffle: true
            seed: 7
            log_level: "debug"
        "#;

        let mut file = File::create(&config_path).unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let config = SearchConfig::load_from(Some(&config_path)).unwrap();
        assert!(config.case_insensitive);
        assert_eq!(config.mode, MatchMode::PrefixSuffix);
        assert_eq!(config.word_separator.as_deref(), Some("."));
        assert_eq!(config.max_results, -2);
        assert_eq!(config.max_comparisons, 100);
        assert!(config.unique);
        assert!(config.shuffle);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_default_values() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(b"mode: \"infix\"\n").unwrap();

        let config = SearchConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.mode, MatchMode::Infix);
        assert!(!config.case_insensitive);
        assert_eq!(config.word_separator, None);
        assert_eq!(config.max_results, 0);
        assert_eq!(config.max_comparisons, 0);
        assert!(!config.unique);
        assert!(!config.shuffle);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_invalid_mode_in_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(b"mode: \"sideways\"\n").unwrap();

        let result = SearchConfig::load_from(Some(&config_path));
        assert!(result.is_err(), "Expected error loading invalid mode");
    }

    #[test]
    fn test_empty_separator_in_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(b"mode: \"prefix\"\nword_separator: \"\"\n")
            .unwrap();

        let result = SearchConfig::load_from(Some(&config_path));
        assert!(matches!(result, Err(SearchError::EmptyWordSeparator)));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = SearchConfig::load_from(Some(Path::new("nonexistent.yaml")));
        assert!(matches!(result, Err(SearchError::ConfigError(_))));
    }

    #[test]
    fn test_merge_overrides() {
        let config_file = SearchConfig {
            mode: MatchMode::Prefix,
            case_insensitive: true,
            word_separator: Some(".".to_string()),
            max_results: 5,
            unique: true,
            ..SearchConfig::default()
        };

        let overrides = ConfigOverrides {
            mode: Some(MatchMode::Exact),
            case_insensitive: Some(false),
            max_results: Some(0),
            seed: Some(3),
            log_level: Some("debug".to_string()),
            ..ConfigOverrides::default()
        };

        let merged = config_file.merge_overrides(overrides);
        assert_eq!(merged.mode, MatchMode::Exact); // explicit default still wins
        assert!(!merged.case_insensitive);
        assert_eq!(merged.max_results, 0);
        assert_eq!(merged.word_separator.as_deref(), Some(".")); // not given, file value
        assert!(merged.unique);
        assert_eq!(merged.seed, Some(3));
        assert_eq!(merged.log_level, "debug");
    }

    #[test]
    fn test_empty_overrides_keep_file_values() {
        let config_file = SearchConfig {
            mode: MatchMode::Infix,
            max_comparisons: 9,
            shuffle: true,
            ..SearchConfig::default()
        };
        let merged = config_file.clone().merge_overrides(ConfigOverrides::default());
        assert_eq!(merged, config_file);
    }

    #[test]
    fn test_overrides_from_json_fields() {
        let overrides: ConfigOverrides =
            serde_json::from_str(r#"{"mode": "exact", "case_insensitive": false}"#).unwrap();
        assert_eq!(overrides.mode, Some(MatchMode::Exact));
        assert_eq!(overrides.case_insensitive, Some(false));
        assert_eq!(overrides.max_results, None);

        let resolved = SearchConfig::default().merge_overrides(overrides);
        assert_eq!(resolved.mode, MatchMode::Exact);
        assert_eq!(resolved.log_level, "warn");
    }
}
