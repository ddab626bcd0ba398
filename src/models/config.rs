//! Tab layout configuration
//!
//! [`Configuration`] is the effective, fully resolved setting set stored per
//! container. [`ConfigLayer`] is one partial source of settings (defaults,
//! declarative attributes, the stored configuration, caller overrides); layers
//! combine with [`ConfigLayer::merge`], later layers winning field by field.

use super::tabstop::{Alignment, Leader, TabStop};
use crate::error::{Result, TabstopsError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Default source of tab-stop declarations
pub const DEFAULT_TABSTOPS_PROPERTY: &str = "--tabstops";

/// One inch; the default tab interval of presentation editors
pub const DEFAULT_TAB_INTERVAL: &str = "96px";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LeaderMode {
    /// Fill the gap with repeated characters
    #[default]
    Text,
    /// Draw rule leaders as a bottom border
    Border,
}

impl LeaderMode {
    pub fn parse(value: &str) -> Option<LeaderMode> {
        match value.trim() {
            "text" => Some(LeaderMode::Text),
            "border" => Some(LeaderMode::Border),
            _ => None,
        }
    }
}

/// Effective configuration of one container
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(alias = "tabstops")]
    pub tab_stops: Vec<TabStop>,

    /// Spacing of default stops beyond the explicit ones, in pixels
    #[serde(alias = "defaultTabstop")]
    pub default_tab_interval: f32,

    #[serde(alias = "tabElement")]
    pub tab_element_tag: String,

    #[serde(alias = "tabClass")]
    pub tab_marker_class: String,

    #[serde(alias = "convertTabs")]
    pub convert_literal_tabs: bool,

    /// Ratio of rendered (post-transform) to layout pixels
    #[serde(alias = "scale")]
    pub scale_factor: f32,

    pub leader_mode: LeaderMode,

    #[serde(alias = "refreshOnResize")]
    pub auto_refresh_on_resize: bool,

    /// Custom property read when no declaration is given
    #[serde(alias = "tabstopsCssProperty")]
    pub tab_stops_property: String,
}

/// Canonical key for an option name, accepting the declarative aliases
pub fn canonical_key(key: &str) -> Option<&'static str> {
    match key {
        "tabStops" | "tabstops" => Some("tabStops"),
        "defaultTabInterval" | "defaultTabstop" => Some("defaultTabInterval"),
        "tabElementTag" | "tabElement" => Some("tabElementTag"),
        "tabMarkerClass" | "tabClass" => Some("tabMarkerClass"),
        "convertLiteralTabs" | "convertTabs" => Some("convertLiteralTabs"),
        "scaleFactor" | "scale" => Some("scaleFactor"),
        "leaderMode" => Some("leaderMode"),
        "autoRefreshOnResize" | "refreshOnResize" => Some("autoRefreshOnResize"),
        "tabStopsProperty" | "tabstopsCssProperty" => Some("tabStopsProperty"),
        _ => None,
    }
}

/// A length option: already in pixels, or an expression still to resolve
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum LengthValue {
    Pixels(f32),
    Expr(String),
}

/// Raw tab-stop declaration as it arrives from a configuration source
#[derive(Clone, Debug, PartialEq)]
pub enum TabStopsSpec {
    /// Read the tab-stops custom property of the container
    FromStyle,
    /// Comma-separated declaration list
    Text(String),
    List(Vec<TabStopEntry>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum TabStopEntry {
    /// `"<position> [alignment] [leader]"`, in either token order
    Text(String),
    Record(TabStopRecord),
}

/// Pre-structured entry; skips tokenizing
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabStopRecord {
    pub position: String,

    #[serde(default, alias = "align")]
    pub alignment: Option<Alignment>,

    #[serde(default)]
    pub leader: Option<Leader>,
}

impl TabStopsSpec {
    /// Interpret a dynamically typed declaration
    pub fn from_value(value: &Value) -> Result<TabStopsSpec> {
        match value {
            Value::Null => Ok(TabStopsSpec::FromStyle),
            Value::String(text) => Ok(TabStopsSpec::Text(text.clone())),
            Value::Array(items) => items
                .iter()
                .map(TabStopEntry::from_value)
                .collect::<Result<Vec<_>>>()
                .map(TabStopsSpec::List),
            other => Err(TabstopsError::InvalidSpecFormat(format!(
                "expected null, string or array, found {}",
                json_type(other)
            ))),
        }
    }
}

impl TabStopEntry {
    pub fn from_value(value: &Value) -> Result<TabStopEntry> {
        match value {
            Value::String(text) => Ok(TabStopEntry::Text(text.clone())),
            Value::Object(_) => serde_json::from_value(value.clone())
                .map(TabStopEntry::Record)
                .map_err(|e| TabstopsError::InvalidSpecFormat(e.to_string())),
            other => Err(TabstopsError::InvalidSpecFormat(format!(
                "expected string or object entry, found {}",
                json_type(other)
            ))),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One partial source of configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigLayer {
    /// Parsed separately; see [`ConfigLayer::from_json`]
    #[serde(skip)]
    pub tab_stops: Option<TabStopsSpec>,

    #[serde(alias = "defaultTabstop")]
    pub default_tab_interval: Option<LengthValue>,

    #[serde(alias = "tabElement")]
    pub tab_element_tag: Option<String>,

    #[serde(alias = "tabClass")]
    pub tab_marker_class: Option<String>,

    #[serde(alias = "convertTabs")]
    pub convert_literal_tabs: Option<bool>,

    #[serde(alias = "scale")]
    pub scale_factor: Option<f32>,

    pub leader_mode: Option<LeaderMode>,

    #[serde(alias = "refreshOnResize")]
    pub auto_refresh_on_resize: Option<bool>,

    #[serde(alias = "tabstopsCssProperty")]
    pub tab_stops_property: Option<String>,
}

/// Declarative attributes read from the container, without the `data-` prefix
pub const DECLARATIVE_ATTRIBUTES: [&str; 6] = [
    "tabstops",
    "default-tabstop",
    "tab-element",
    "tab-class",
    "convert-tabs",
    "leader-mode",
];

impl ConfigLayer {
    /// Built-in defaults; every field set
    pub fn defaults() -> Self {
        Self {
            tab_stops: Some(TabStopsSpec::FromStyle),
            default_tab_interval: Some(LengthValue::Expr(DEFAULT_TAB_INTERVAL.to_string())),
            tab_element_tag: Some("span".to_string()),
            tab_marker_class: Some("tab".to_string()),
            convert_literal_tabs: Some(true),
            scale_factor: Some(1.0),
            leader_mode: Some(LeaderMode::Text),
            auto_refresh_on_resize: Some(true),
            tab_stops_property: Some(DEFAULT_TABSTOPS_PROPERTY.to_string()),
        }
    }

    /// Layer from a JSON object of option values
    ///
    /// An explicit `null` tab-stop value means "read the custom property" and
    /// is kept, unlike an absent key.
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(TabstopsError::InvalidOptionValue {
                key: "options".to_string(),
                reason: format!("expected an object, found {}", json_type(value)),
            });
        };
        let mut rest = Map::new();
        let mut tab_stops = None;
        for (key, value) in map {
            match canonical_key(key) {
                Some("tabStops") => tab_stops = Some(TabStopsSpec::from_value(value)?),
                Some(_) => {
                    rest.insert(key.clone(), value.clone());
                }
                None => log::debug!("ignoring unknown option '{}'", key),
            }
        }
        let mut layer: ConfigLayer = serde_json::from_value(Value::Object(rest)).map_err(|e| {
            TabstopsError::InvalidOptionValue {
                key: "options".to_string(),
                reason: e.to_string(),
            }
        })?;
        layer.tab_stops = tab_stops;
        Ok(layer)
    }

    /// Layer from the container's `data-*` attributes
    ///
    /// Each kebab-case attribute name maps to its camelCase option key.
    pub fn from_attributes(attributes: &BTreeMap<String, String>) -> Result<Self> {
        let mut map = Map::new();
        for name in DECLARATIVE_ATTRIBUTES {
            let Some(raw) = attributes.get(&format!("data-{}", name)) else {
                continue;
            };
            let key = kebab_to_camel(name);
            let value = if key == "convertTabs" {
                Value::Bool(parse_flag(raw).ok_or_else(|| TabstopsError::InvalidOptionValue {
                    key: key.clone(),
                    reason: format!("'{}' is not a boolean", raw),
                })?)
            } else {
                Value::String(raw.clone())
            };
            map.insert(key, value);
        }
        Self::from_json(&Value::Object(map))
    }

    /// Field-wise overlay: every field set in `over` wins
    pub fn merge(self, over: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            tab_stops: over.tab_stops.or(self.tab_stops),
            default_tab_interval: over.default_tab_interval.or(self.default_tab_interval),
            tab_element_tag: over.tab_element_tag.or(self.tab_element_tag),
            tab_marker_class: over.tab_marker_class.or(self.tab_marker_class),
            convert_literal_tabs: over.convert_literal_tabs.or(self.convert_literal_tabs),
            scale_factor: over.scale_factor.or(self.scale_factor),
            leader_mode: over.leader_mode.or(self.leader_mode),
            auto_refresh_on_resize: over.auto_refresh_on_resize.or(self.auto_refresh_on_resize),
            tab_stops_property: over.tab_stops_property.or(self.tab_stops_property),
        }
    }
}

impl From<&Configuration> for ConfigLayer {
    fn from(config: &Configuration) -> Self {
        let records = config
            .tab_stops
            .iter()
            .map(|stop| {
                TabStopEntry::Record(TabStopRecord {
                    position: stop.position.clone(),
                    alignment: Some(stop.alignment),
                    leader: Some(stop.leader.clone()),
                })
            })
            .collect();
        Self {
            tab_stops: Some(TabStopsSpec::List(records)),
            default_tab_interval: Some(LengthValue::Pixels(config.default_tab_interval)),
            tab_element_tag: Some(config.tab_element_tag.clone()),
            tab_marker_class: Some(config.tab_marker_class.clone()),
            convert_literal_tabs: Some(config.convert_literal_tabs),
            scale_factor: Some(config.scale_factor),
            leader_mode: Some(config.leader_mode),
            auto_refresh_on_resize: Some(config.auto_refresh_on_resize),
            tab_stops_property: Some(config.tab_stops_property.clone()),
        }
    }
}

pub fn kebab_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for ch in name.chars() {
        if ch == '-' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
