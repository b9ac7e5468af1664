use counter_engine::LengthLimit;
use counter_logging::counter_warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_STATUS_TEMPLATE: &str = "Remaining: {remaining}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterPosition {
    Before,
    #[default]
    After,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid counter settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-field counter settings, shared read-only by every surface of the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FieldSettings", into = "FieldSettings")]
pub struct FieldCounterConfig {
    max_length: usize,
    count_markup: bool,
    position: CounterPosition,
    prevent_submit_on_overflow: bool,
    status_template: String,
}

impl FieldCounterConfig {
    /// Negative limits are clamped to zero, which disables counting.
    pub fn new(max_length: i64) -> Self {
        Self {
            max_length: clamp_max_length(max_length),
            count_markup: true,
            position: CounterPosition::default(),
            prevent_submit_on_overflow: true,
            status_template: DEFAULT_STATUS_TEMPLATE.to_string(),
        }
    }

    /// Parses the settings object the host attaches to each field.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_count_markup(mut self, count_markup: bool) -> Self {
        self.count_markup = count_markup;
        self
    }

    pub fn with_position(mut self, position: CounterPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_prevent_submit(mut self, prevent: bool) -> Self {
        self.prevent_submit_on_overflow = prevent;
        self
    }

    pub fn with_status_template(mut self, template: impl Into<String>) -> Self {
        self.status_template = template.into();
        self
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn count_markup(&self) -> bool {
        self.count_markup
    }

    pub fn position(&self) -> CounterPosition {
        self.position
    }

    pub fn prevent_submit_on_overflow(&self) -> bool {
        self.prevent_submit_on_overflow
    }

    pub fn status_template(&self) -> &str {
        &self.status_template
    }

    pub fn is_enabled(&self) -> bool {
        self.max_length > 0
    }

    /// The limit handed to server-side validation for this field.
    pub fn limit(&self) -> LengthLimit {
        LengthLimit::new(self.max_length, self.count_markup)
    }
}

impl Default for FieldCounterConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

fn clamp_max_length(max_length: i64) -> usize {
    if max_length < 0 {
        counter_warn!("Negative max length {} clamped to 0; counter disabled", max_length);
        return 0;
    }
    usize::try_from(max_length).unwrap_or(usize::MAX)
}

/// Wire shape of the host settings, keyed the way the field widgets emit them.
///
/// Widgets write `preventSubmit` only when prevention is on, and send
/// `countHTMLCharacters` as `null` when the setting was never saved. A missing
/// or null flag reads as off.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FieldSettings {
    #[serde(rename = "maxlength", default)]
    max_length: i64,
    #[serde(rename = "countHTMLCharacters", default)]
    count_markup: Option<bool>,
    #[serde(rename = "counterPosition", default)]
    position: CounterPosition,
    #[serde(rename = "preventSubmit", default)]
    prevent_submit: Option<bool>,
    #[serde(rename = "statusTemplate", default = "default_template")]
    status_template: String,
}

fn default_template() -> String {
    DEFAULT_STATUS_TEMPLATE.to_string()
}

impl From<FieldSettings> for FieldCounterConfig {
    fn from(settings: FieldSettings) -> Self {
        FieldCounterConfig::new(settings.max_length)
            .with_count_markup(settings.count_markup.unwrap_or(false))
            .with_position(settings.position)
            .with_prevent_submit(settings.prevent_submit.unwrap_or(false))
            .with_status_template(settings.status_template)
    }
}

impl From<FieldCounterConfig> for FieldSettings {
    fn from(config: FieldCounterConfig) -> Self {
        Self {
            max_length: i64::try_from(config.max_length).unwrap_or(i64::MAX),
            count_markup: Some(config.count_markup),
            position: config.position,
            prevent_submit: Some(config.prevent_submit_on_overflow),
            status_template: config.status_template,
        }
    }
}
