//! Configuration loading and typed config structures for the Agora economy.
//!
//! The canonical configuration lives in `agora-config.yaml` at the project
//! root. Every field has a serde default, so a partial (or empty) file is
//! valid and a missing section falls back to the documented defaults.
//! [`SimulationConfig::validate`] checks ranges once at construction time.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use agora_types::{GoodId, RiskDisposition};

/// Environment variable that overrides `llm.api_key`.
pub const API_KEY_ENV: &str = "LLM_API_KEY";

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is outside its allowed range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `agora-config.yaml`. Immutable for the
/// duration of a run; the controller replaces it wholesale on
/// `set_config`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Population sizes, round limit and seed.
    #[serde(default)]
    pub simulation: RunConfig,

    /// Goods and their starting price.
    #[serde(default)]
    pub market: MarketConfig,

    /// Starting wealth, risk dispositions and memory.
    #[serde(default)]
    pub agents: AgentsConfig,

    /// Policy toggles and rates.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Language-model decision backend.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Result persistence.
    #[serde(default)]
    pub output: OutputConfig,

    /// Extra routine headlines.
    #[serde(default)]
    pub news: NewsConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `LLM_API_KEY` environment variable overrides `llm.api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.llm.apply_env_overrides();
        Ok(config)
    }

    /// Check every value against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.rounds == 0 {
            return Err(invalid("simulation.rounds", "must be at least 1"));
        }
        if self.simulation.plot_interval == 0 {
            return Err(invalid("simulation.plot_interval", "must be at least 1"));
        }
        if self.market.goods.is_empty() {
            return Err(invalid("market.goods", "at least one good is required"));
        }
        let unique: BTreeSet<&GoodId> = self.market.goods.iter().collect();
        if unique.len() != self.market.goods.len() {
            return Err(invalid("market.goods", "good names must be unique"));
        }
        if !(self.market.initial_price.is_finite() && self.market.initial_price > 0.0) {
            return Err(invalid("market.initial_price", "must be positive"));
        }
        non_negative("agents.household_wealth", self.agents.household_wealth)?;
        non_negative("agents.business_wealth", self.agents.business_wealth)?;
        if self.agents.risk_dispositions.is_empty() {
            return Err(invalid(
                "agents.risk_dispositions",
                "at least one disposition is required",
            ));
        }
        if self.agents.memory_length == 0 {
            return Err(invalid("agents.memory_length", "must be at least 1"));
        }
        non_negative("policy.ubi_amount", self.policy.ubi_amount)?;
        if !(0.0..=1.0).contains(&self.policy.wealth_tax_rate) {
            return Err(invalid("policy.wealth_tax_rate", "must lie in [0, 1]"));
        }
        if self.llm.max_tokens == 0 {
            return Err(invalid("llm.max_tokens", "must be at least 1"));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(invalid("llm.temperature", "must lie in [0, 2]"));
        }
        Ok(())
    }

    /// The good households and businesses trade.
    pub fn primary_good(&self) -> Option<&GoodId> {
        self.market.goods.first()
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_owned(),
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be a finite, non-negative amount"))
    }
}

/// Population sizes, round limit and seed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Number of households.
    #[serde(default = "default_households")]
    pub households: u32,

    /// Number of businesses.
    #[serde(default = "default_businesses")]
    pub businesses: u32,

    /// Round limit after which the controller is done.
    #[serde(default = "default_rounds")]
    pub rounds: u64,

    /// Seed of the simulation's single random source.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Rounds between progress reports and state dumps.
    #[serde(default = "default_plot_interval")]
    pub plot_interval: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            households: default_households(),
            businesses: default_businesses(),
            rounds: default_rounds(),
            seed: default_seed(),
            plot_interval: default_plot_interval(),
        }
    }
}

/// Goods traded on the market.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarketConfig {
    /// Good names; the first is the one agents trade.
    #[serde(default = "default_goods")]
    pub goods: Vec<GoodId>,

    /// Starting price of every good.
    #[serde(default = "default_initial_price")]
    pub initial_price: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            goods: default_goods(),
            initial_price: default_initial_price(),
        }
    }
}

/// Agent population parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentsConfig {
    /// Starting wealth of each household.
    #[serde(default = "default_household_wealth")]
    pub household_wealth: f64,

    /// Starting wealth of each business.
    #[serde(default = "default_business_wealth")]
    pub business_wealth: f64,

    /// Dispositions assigned to households round-robin.
    #[serde(default = "default_risk_dispositions")]
    pub risk_dispositions: Vec<RiskDisposition>,

    /// Rounds each agent remembers.
    #[serde(default = "default_memory_length")]
    pub memory_length: usize,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            household_wealth: default_household_wealth(),
            business_wealth: default_business_wealth(),
            risk_dispositions: default_risk_dispositions(),
            memory_length: default_memory_length(),
        }
    }
}

/// Policy toggles and rates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PolicyConfig {
    /// Whether UBI is in force before the government first acts.
    #[serde(default)]
    pub ubi_enabled: bool,

    /// UBI credited to each household per round while enabled.
    #[serde(default = "default_ubi_amount")]
    pub ubi_amount: f64,

    /// Whether households pay a wealth tax every round.
    #[serde(default)]
    pub wealth_tax_enabled: bool,

    /// Fraction of (non-negative) wealth taxed per round.
    #[serde(default = "default_wealth_tax_rate")]
    pub wealth_tax_rate: f64,

    /// Whether shock headlines can occur.
    #[serde(default = "default_true")]
    pub market_shocks_enabled: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            ubi_enabled: false,
            ubi_amount: default_ubi_amount(),
            wealth_tax_enabled: false,
            wealth_tax_rate: default_wealth_tax_rate(),
            market_shocks_enabled: true,
        }
    }
}

/// Which completion API the language-model backend speaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackendKind {
    /// OpenAI-compatible chat completions.
    #[default]
    OpenAi,
    /// Anthropic Messages API.
    Anthropic,
}

/// Language-model decision backend configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LlmConfig {
    /// Whether households are language-model backed.
    #[serde(default)]
    pub enabled: bool,

    /// API dialect.
    #[serde(default)]
    pub backend: LlmBackendKind,

    /// Base URL of the API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; empty means no credentials.
    #[serde(default)]
    pub api_key: String,

    /// Upper bound on generated tokens.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Optional prompt template file replacing the built-in wording.
    #[serde(default)]
    pub prompt_template: Option<PathBuf>,
}

impl LlmConfig {
    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(API_KEY_ENV) {
            self.api_key = val;
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            backend: LlmBackendKind::default(),
            api_url: default_api_url(),
            model: default_model(),
            api_key: String::new(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_ms: default_timeout_ms(),
            prompt_template: None,
        }
    }
}

/// Result persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Whether the driver writes result files.
    #[serde(default = "default_true")]
    pub save_results: bool,

    /// Directory receiving result files.
    #[serde(default = "default_results_path")]
    pub results_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            save_results: true,
            results_path: default_results_path(),
        }
    }
}

/// News feed configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewsConfig {
    /// Headlines added to the routine pool.
    #[serde(default)]
    pub custom_headlines: Vec<String>,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_households() -> u32 {
    200
}

const fn default_businesses() -> u32 {
    10
}

const fn default_rounds() -> u64 {
    1000
}

const fn default_seed() -> u64 {
    42
}

const fn default_plot_interval() -> u64 {
    10
}

fn default_goods() -> Vec<GoodId> {
    vec![GoodId::from("GoodA")]
}

const fn default_initial_price() -> f64 {
    100.0
}

const fn default_household_wealth() -> f64 {
    1000.0
}

const fn default_business_wealth() -> f64 {
    5000.0
}

fn default_risk_dispositions() -> Vec<RiskDisposition> {
    vec![
        RiskDisposition::Cautious,
        RiskDisposition::Neutral,
        RiskDisposition::RiskTaker,
    ]
}

const fn default_memory_length() -> usize {
    5
}

const fn default_ubi_amount() -> f64 {
    50.0
}

const fn default_wealth_tax_rate() -> f64 {
    0.01
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".to_owned()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_owned()
}

const fn default_max_tokens() -> u32 {
    64
}

const fn default_temperature() -> f64 {
    0.7
}

const fn default_timeout_ms() -> u64 {
    10_000
}

fn default_results_path() -> PathBuf {
    PathBuf::from("results")
}

const fn default_true() -> bool {
    true
}
