use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::errors::AppError;
use crate::translation::core::INCLUDES_DIR;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and overlaying environment settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Root of the Markdown tree to translate
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Target languages: code -> display name
    #[serde(default = "default_languages")]
    pub languages: BTreeMap<String, String>,

    /// Relative path patterns that are never translated
    #[serde(default = "default_excluded_paths")]
    pub excluded_paths: Vec<String>,

    /// Prompt rule tables
    #[serde(default)]
    pub rules: TranslationRules,

    /// Replace fenced code blocks by placeholders before translation
    #[serde(default = "default_true")]
    pub enable_code_snippet_exclusion: bool,

    /// Split long documents at headings before translation
    #[serde(default)]
    pub enable_small_chunk_translation: bool,

    /// Minimum lines in a chunk before a heading may start a new one
    #[serde(default = "default_max_chunk_lines")]
    pub max_chunk_lines: usize,

    /// Number of files translated at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Model provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Azure OpenAI deployment
    #[default]
    Azure,
    // @provider: OpenAI or any OpenAI-compatible server
    OpenAI,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Azure => "Azure OpenAI",
            Self::OpenAI => "OpenAI",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Azure => "azure".to_string(),
            Self::OpenAI => "openai".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "azure" => Ok(Self::Azure),
            "openai" => Ok(Self::OpenAI),
            _ => Err(anyhow::anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type", default)]
    pub provider_type: TranslationProvider,

    // @field: Model or deployment name
    #[serde(default = "default_model")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Azure API version
    #[serde(default = "default_api_version")]
    pub api_version: String,

    // @field: Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: TranslationProvider::default(),
            model: default_model(),
            api_key: String::new(),
            endpoint: String::new(),
            api_version: default_api_version(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Static tables the instruction builder renders into every prompt
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationRules {
    /// Terms copied verbatim in every language
    #[serde(default = "default_do_not_translate")]
    pub do_not_translate: Vec<String>,

    /// Per language: English term -> required translation
    #[serde(default = "default_term_mappings")]
    pub term_mappings: BTreeMap<String, BTreeMap<String, String>>,

    /// Extra guidelines; the `common` key applies to every language
    #[serde(default = "default_instructions")]
    pub instructions: BTreeMap<String, Vec<String>>,

    /// Per language spacing and punctuation rules
    #[serde(default = "default_typography")]
    pub typography: BTreeMap<String, Vec<String>>,
}

impl Default for TranslationRules {
    fn default() -> Self {
        Self {
            do_not_translate: default_do_not_translate(),
            term_mappings: default_term_mappings(),
            instructions: default_instructions(),
            typography: default_typography(),
        }
    }
}

/// One configured target language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTarget {
    /// Directory name and prompt code, e.g. `ja`
    pub code: String,
    /// Name used in the prompt, e.g. `Japanese`
    pub display_name: String,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

/// Environment variable holding the endpoint URL
pub const ENV_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT_URL";
/// Environment variable holding the deployment or model name
pub const ENV_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT_NAME";
/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "AZURE_OPENAI_API_KEY";
/// Environment variable holding the Azure API version
pub const ENV_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";

fn default_source_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_languages() -> BTreeMap<String, String> {
    BTreeMap::from([("ja".to_string(), "Japanese".to_string())])
}

fn default_excluded_paths() -> Vec<String> {
    vec!["ref/".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_max_chunk_lines() -> usize {
    120
}

fn default_concurrency() -> usize {
    6
}

fn default_model() -> String {
    "o3".to_string()
}

fn default_api_version() -> String {
    "2025-01-01-preview".to_string()
}

fn default_temperature() -> f32 {
    1.0
}

fn default_timeout_secs() -> u64 {
    // Reasoning deployments routinely take minutes on long pages
    300
}

fn default_do_not_translate() -> Vec<String> {
    [
        "Copilot",
        "Copilot Developer Camp",
        "Copilot Studio",
        "Microsoft 365",
        "M365",
        "Azure",
        "Azure AI Foundry",
        "OpenAI",
        "Visual Studio",
        "Visual Studio Code",
        "VS Code",
        "Agents SDK",
        "Hello World",
        "MCP",
        "SharePoint Online",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_term_mappings() -> BTreeMap<String, BTreeMap<String, String>> {
    let ja = [
        ("agents", "エージェント"),
        ("lab", "ラボ"),
        ("Maker Path", "Maker 向けコース"),
        ("license", "ライセンス"),
        ("user", "ユーザー"),
        ("disclaimer", "注意事項"),
        ("parameter", "パラメーター"),
        ("processor", "プロセッサー"),
        ("server", "サーバー"),
        ("web search", "Web 検索"),
        ("file search", "ファイル検索"),
        ("streaming", "ストリーミング"),
        ("system prompt", "システムプロンプト"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    BTreeMap::from([("ja".to_string(), ja)])
}

fn default_instructions() -> BTreeMap<String, Vec<String>> {
    let common = vec![
        "* The term 'examples' must be code examples when the page mentions the code examples in the repo, it can be translated as either 'code examples' or 'sample code'.".to_string(),
        "* The term 'primitives' can be translated as basic components.".to_string(),
        "* When the terms 'instructions' and 'tools' are mentioned as API parameter names, they must be kept as is.".to_string(),
        "* The terms 'temperature', 'top_p', 'max_tokens', 'presence_penalty', 'frequency_penalty' as parameter names must be kept as is.".to_string(),
    ];
    let ja = vec![
        "* The term 'result' in the Runner guide context must be translated like 'execution results'".to_string(),
        "* The term 'raw' in 'raw response events' must be kept as is".to_string(),
        "* You must consistently use polite wording such as です/ます rather than である/なのだ.".to_string(),
    ];

    BTreeMap::from([("common".to_string(), common), ("ja".to_string(), ja)])
}

fn default_typography() -> BTreeMap<String, Vec<String>> {
    let ja = vec![
        "- Insert a half-width space before and after all alphanumeric terms.".to_string(),
        "- Add a half-width space just outside markdown emphasis markers: ` **太字** ` (good) vs `** 太字 **` (bad).".to_string(),
    ];

    BTreeMap::from([("ja".to_string(), ja)])
}

/// Settings given on the command line, applied last
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replaces `source_dir`
    pub source_dir: Option<PathBuf>,
    /// Restricts `languages` when not empty
    pub languages: Vec<String>,
    /// Replaces `log_level`
    pub log_level: Option<LogLevel>,
}

impl Config {
    /// Build the effective configuration
    ///
    /// Layers, last one wins: built-in defaults, the JSON file at `path` when
    /// it exists, environment variables read through `lookup`, then the
    /// command line overrides. The result is validated.
    pub fn load_layered<P, F>(path: P, lookup: F, overrides: &ConfigOverrides) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let mut config = if path.exists() {
            log::info!("Loading configuration from {}", path.display());
            Self::from_file(path)?
        } else {
            Self::default()
        };

        config.apply_env_with(lookup);
        config.apply_overrides(overrides)?;
        config.validate()?;

        Ok(config)
    }

    /// Apply command line overrides
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<(), AppError> {
        if let Some(source_dir) = &overrides.source_dir {
            self.source_dir = source_dir.clone();
        }
        if !overrides.languages.is_empty() {
            self.restrict_languages(&overrides.languages)?;
        }
        if let Some(log_level) = &overrides.log_level {
            self.log_level = log_level.clone();
        }
        Ok(())
    }

    /// Load a JSON configuration file; missing fields fall back to defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        use anyhow::Context;

        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = std::io::BufReader::new(file);
        let config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Overlay the process environment onto the provider settings
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay provider settings from an arbitrary variable lookup
    ///
    /// Empty values are ignored so a blank line in `.env` does not wipe a
    /// value set in the config file.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(endpoint) = get(ENV_ENDPOINT) {
            self.provider.endpoint = endpoint;
        }
        if let Some(model) = get(ENV_DEPLOYMENT) {
            self.provider.model = model;
        }
        if let Some(api_key) = get(ENV_API_KEY) {
            self.provider.api_key = api_key;
        }
        if let Some(api_version) = get(ENV_API_VERSION) {
            self.provider.api_version = api_version;
        }
    }

    /// Keep only the given language codes
    pub fn restrict_languages(&mut self, codes: &[String]) -> Result<(), AppError> {
        for code in codes {
            if !self.languages.contains_key(code) {
                return Err(AppError::Config(format!("Language '{}' is not configured", code)));
            }
        }
        self.languages.retain(|code, _| codes.contains(code));
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        if self.languages.is_empty() {
            return Err(AppError::Config("At least one target language is required".to_string()));
        }

        for (code, name) in &self.languages {
            // the relocated fragments live in <source>/includes/<lang>
            if code == INCLUDES_DIR {
                return Err(AppError::Config(format!("'{}' cannot be used as a language code", INCLUDES_DIR)));
            }
            crate::language_utils::validate_language_code(code)
                .map_err(|e| AppError::Config(e.to_string()))?;
            if name.trim().is_empty() && crate::language_utils::get_language_name(code).is_err() {
                return Err(AppError::Config(format!("Language '{}' needs a display name", code)));
            }
        }

        if self.concurrency == 0 {
            return Err(AppError::Config("concurrency must be at least 1".to_string()));
        }

        if self.max_chunk_lines == 0 {
            return Err(AppError::Config("max_chunk_lines must be at least 1".to_string()));
        }

        if self.excluded_paths.iter().any(|p| p.trim().is_empty()) {
            return Err(AppError::Config("excluded_paths cannot contain empty patterns".to_string()));
        }

        Ok(())
    }

    /// Configured languages in code order
    ///
    /// A blank display name falls back to the English ISO 639 name.
    pub fn language_targets(&self) -> Vec<LanguageTarget> {
        self.languages
            .iter()
            .map(|(code, name)| {
                let display_name = if name.trim().is_empty() {
                    crate::language_utils::get_language_name(code).unwrap_or_else(|_| code.clone())
                } else {
                    name.clone()
                };
                LanguageTarget {
                    code: code.clone(),
                    display_name,
                }
            })
            .collect()
    }

    /// Language codes in code order
    pub fn language_codes(&self) -> Vec<String> {
        self.languages.keys().cloned().collect()
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_dir: default_source_dir(),
            languages: default_languages(),
            excluded_paths: default_excluded_paths(),
            rules: TranslationRules::default(),
            enable_code_snippet_exclusion: true,
            enable_small_chunk_translation: false,
            max_chunk_lines: default_max_chunk_lines(),
            concurrency: default_concurrency(),
            provider: ProviderConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
