//! Configuration resolution
//!
//! Merges, lowest priority first: built-in defaults, the container's `data-*`
//! attributes, the configuration stored by the previous refresh, and the
//! caller's overrides. Lengths and tab stops are then resolved to pixels.

use super::measure::resolve_length_value;
use crate::error::{Result, TabstopsError};
use crate::host::LayoutHost;
use crate::models::config::DEFAULT_TABSTOPS_PROPERTY;
use crate::models::{ConfigLayer, Configuration, LengthValue, TabStopsSpec, TextTree};
use crate::parse::tabstops::parse_tab_stops;
use serde_json::Value;

/// Caller-supplied overrides for a refresh
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Overrides {
    #[default]
    None,
    /// Use the declarative attributes as the override layer
    Data,
    Layer(ConfigLayer),
}

impl Overrides {
    /// Interpret a dynamically typed options argument
    pub fn from_json(value: &Value) -> Result<Overrides> {
        match value {
            Value::Null => Ok(Overrides::None),
            Value::String(s) if s == "data" => Ok(Overrides::Data),
            Value::Object(_) => ConfigLayer::from_json(value).map(Overrides::Layer),
            other => Err(TabstopsError::InvalidOptionValue {
                key: "options".to_string(),
                reason: format!("expected an object or 'data', found {}", other),
            }),
        }
    }
}

impl From<ConfigLayer> for Overrides {
    fn from(layer: ConfigLayer) -> Self {
        Overrides::Layer(layer)
    }
}

/// Merge every source into one unresolved layer
///
/// `stored` is the container's stored configuration together with any option
/// values set since the last refresh.
pub fn merge_layers(tree: &TextTree, stored: &ConfigLayer, overrides: &Overrides) -> Result<ConfigLayer> {
    let attributes = ConfigLayer::from_attributes(&tree.container().attributes)?;
    let overrides = match overrides {
        Overrides::None => ConfigLayer::default(),
        Overrides::Data => attributes.clone(),
        Overrides::Layer(layer) => layer.clone(),
    };
    Ok(ConfigLayer::defaults()
        .merge(attributes)
        .merge(stored.clone())
        .merge(overrides))
}

/// A scale factor must be a positive finite number
pub fn validate_scale_factor(key: &str, scale: f32) -> Result<f32> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(TabstopsError::InvalidOptionValue {
            key: key.to_string(),
            reason: format!("{} is not a positive number", scale),
        })
    }
}

/// Produce the effective configuration for a container
pub fn resolve_configuration<H: LayoutHost + ?Sized>(
    tree: &TextTree,
    host: &H,
    stored: &ConfigLayer,
    overrides: &Overrides,
) -> Result<Configuration> {
    let layer = merge_layers(tree, stored, overrides)?;
    let tab_stops_property = layer
        .tab_stops_property
        .unwrap_or_else(|| DEFAULT_TABSTOPS_PROPERTY.to_string());
    let tab_stops = parse_tab_stops(
        layer.tab_stops.as_ref().unwrap_or(&TabStopsSpec::FromStyle),
        tree,
        host,
        &tab_stops_property,
    )?;
    let interval = layer
        .default_tab_interval
        .unwrap_or(LengthValue::Expr(crate::models::config::DEFAULT_TAB_INTERVAL.to_string()));
    let default_tab_interval = resolve_length_value(host, tree, &interval)?;
    let scale_factor = validate_scale_factor("scaleFactor", layer.scale_factor.unwrap_or(1.0))?;

    Ok(Configuration {
        tab_stops,
        default_tab_interval,
        tab_element_tag: layer.tab_element_tag.unwrap_or_else(|| "span".to_string()),
        tab_marker_class: layer.tab_marker_class.unwrap_or_else(|| "tab".to_string()),
        convert_literal_tabs: layer.convert_literal_tabs.unwrap_or(true),
        scale_factor,
        leader_mode: layer.leader_mode.unwrap_or_default(),
        auto_refresh_on_resize: layer.auto_refresh_on_resize.unwrap_or(true),
        tab_stops_property,
    })
}
