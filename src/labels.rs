//! Display strings for menus, prompts and button prefixes.
//!
//! Every string comes from the `msg` object of config.json; keys keep the
//! spaced spelling used there (`"wrong input"`, `"city prefix"`, ...).
//! Labels and captions are sent as legacy Markdown, so a literal `_`, `*`,
//! `` ` `` or `[` in config.json must be escaped with a backslash.

use serde::Deserialize;

use crate::text_processing::normalize;

/// Placeholder replaced by the city name in `list caption pattern`
pub const CAPTION_PLACEHOLDER: &str = "%s";

/// Separator between an ad's text and the configured ad suffix
pub const AD_CAPTION_SEPARATOR: &str = "\n\n";

/// The full label set shown to users
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LabelSet {
    pub welcome: String,
    pub tnx: String,
    #[serde(rename = "wrong input")]
    pub wrong_input: String,
    /// Shown when a catalog entry's file cannot be read; defaults to `wrong input`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unavailable: Option<String>,
    #[serde(rename = "select main")]
    pub select_main: String,
    #[serde(rename = "select province")]
    pub select_province: String,
    #[serde(rename = "select city")]
    pub select_city: String,
    #[serde(rename = "select ad")]
    pub select_ad: String,
    pub back: String,
    pub ad: String,
    #[serde(rename = "other cities")]
    pub other_cities: String,
    #[serde(rename = "city prefix")]
    pub city_prefix: String,
    #[serde(rename = "province prefix")]
    pub province_prefix: String,
    #[serde(rename = "ad prefix")]
    pub ad_prefix: String,
    #[serde(rename = "ad suffix")]
    pub ad_suffix: String,
    #[serde(rename = "list caption pattern")]
    pub list_caption_pattern: String,
}

impl LabelSet {
    /// Fold glyph variants in the labels users tap, so they compare equal to normalized input.
    pub fn normalized(mut self) -> Self {
        for label in [
            &mut self.back,
            &mut self.ad,
            &mut self.other_cities,
            &mut self.city_prefix,
            &mut self.province_prefix,
            &mut self.ad_prefix,
        ] {
            *label = normalize(label);
        }
        self
    }

    /// Caption for a city list photo.
    ///
    /// The pattern is Markdown; the city name is escaped before it is inserted.
    pub fn list_caption(&self, city: &str) -> String {
        self.list_caption_pattern
            .replace(CAPTION_PLACEHOLDER, &escape_markdown(city))
    }

    /// Caption for an ad photo: the ad's text followed by the ad suffix
    pub fn ad_caption(&self, ad_text: &str) -> String {
        [ad_text, self.ad_suffix.as_str()].join(AD_CAPTION_SEPARATOR)
    }

    pub fn unavailable(&self) -> &str {
        self.unavailable.as_deref().unwrap_or(&self.wrong_input)
    }

    pub fn city_label(&self, city: &str) -> String {
        format!("{} {}", self.city_prefix, city)
    }

    pub fn province_label(&self, province: &str) -> String {
        format!("{} {}", self.province_prefix, province)
    }

    pub fn ad_label(&self, ad: &str) -> String {
        format!("{} {}", self.ad_prefix, ad)
    }
}

/// Escape the characters legacy Markdown treats as entity delimiters
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
