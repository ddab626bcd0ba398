//! Per-container lifecycle
//!
//! A [`Container`] owns the text tree of one managed element together with the
//! configuration stored by its last refresh and the resize subscription that
//! keeps it laid out.

use crate::error::{Result, TabstopsError};
use crate::host::{LayoutHost, ResizeSubscription};
use crate::html_layout::{
    reset_markers, resolve_configuration, validate_scale_factor, DisplayList, MarkerSelector, Overrides, ResetMode,
    TabLayoutEngine,
};
use crate::models::config::canonical_key;
use crate::models::{ConfigLayer, Configuration, Markup, TabStopsSpec, TextTree};
use crate::parse::parse_records;
use serde_json::{Map, Value};

/// Decoded arguments of the `option` operation
#[derive(Clone, Debug, PartialEq)]
pub enum OptionArgs {
    /// Whole stored configuration
    All,
    Get(String),
    Set(String, Value),
    /// Shallow merge of several fields
    Merge(Map<String, Value>),
}

impl OptionArgs {
    /// Interpret the dynamically typed `(key, value)` pair JavaScript passes
    ///
    /// An absent `value` reads `key`; a `null` value is a write.
    pub fn from_values(key: Option<Value>, value: Option<Value>) -> Result<OptionArgs> {
        match (key, value) {
            (None | Some(Value::Null), None) => Ok(OptionArgs::All),
            (Some(Value::String(key)), None) => Ok(OptionArgs::Get(key)),
            (Some(Value::String(key)), Some(value)) => Ok(OptionArgs::Set(key, value)),
            (Some(Value::Object(fields)), None) => Ok(OptionArgs::Merge(fields)),
            (key, _) => Err(TabstopsError::InvalidOptionValue {
                key: "option".to_string(),
                reason: format!("unsupported arguments {:?}", key),
            }),
        }
    }
}

#[derive(Debug)]
pub struct Container {
    tree: TextTree,
    stored: Option<Configuration>,
    /// Option values in declaration form, resolved by the next refresh
    pending: Map<String, Value>,
    subscription: Option<ResizeSubscription>,
}

impl Container {
    pub fn new(tree: TextTree) -> Self {
        Self {
            tree,
            stored: None,
            pending: Map::new(),
            subscription: None,
        }
    }

    pub fn from_markup(markup: &Markup) -> Result<Self> {
        TextTree::from_markup(markup).map(Self::new)
    }

    pub fn tree(&self) -> &TextTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut TextTree {
        &mut self.tree
    }

    /// Configuration stored by the last successful refresh
    pub fn configuration(&self) -> Option<&Configuration> {
        self.stored.as_ref()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Stored configuration with the pending option values laid over it
    fn stored_layer(&self) -> Result<ConfigLayer> {
        let stored = self.stored.as_ref().map(ConfigLayer::from).unwrap_or_default();
        if self.pending.is_empty() {
            return Ok(stored);
        }
        Ok(stored.merge(ConfigLayer::from_json(&Value::Object(self.pending.clone()))?))
    }

    /// Resolve the configuration, store it and lay the container out
    ///
    /// A declaration that fails to parse aborts before anything is stored.
    pub fn refresh<H: LayoutHost + ?Sized>(&mut self, host: &H, overrides: &Overrides) -> Result<DisplayList> {
        let config = resolve_configuration(&self.tree, host, &self.stored_layer()?, overrides)?;
        log::info!(
            "refresh: {} tab stops, interval {}px, {:?} leaders",
            config.tab_stops.len(),
            config.default_tab_interval,
            config.leader_mode
        );
        let list = TabLayoutEngine::new(host, &config).layout(&mut self.tree)?;

        // a new subscription replaces (and so cancels) the previous one
        self.subscription = None;
        if config.auto_refresh_on_resize {
            self.subscription = Some(host.subscribe_resize(&self.tree));
        }
        self.stored = Some(config);
        self.pending.clear();
        Ok(list)
    }

    /// Re-layout after the container was resized
    ///
    /// Uses the stored configuration as it is. Returns `None` when the
    /// container is not subscribed or auto-refresh has been switched off.
    pub fn notify_resize<H: LayoutHost + ?Sized>(&mut self, host: &H) -> Result<Option<DisplayList>> {
        let Some(config) = self.stored.as_ref() else {
            return Ok(None);
        };
        if self.subscription.is_none() || !config.auto_refresh_on_resize {
            return Ok(None);
        }
        log::debug!("resize: re-laying out {} tab stops", config.tab_stops.len());
        TabLayoutEngine::new(host, config).layout(&mut self.tree).map(Some)
    }

    /// Read or change stored options; never triggers layout
    ///
    /// Returns the requested value for reads and `null` for writes.
    pub fn option(&mut self, args: OptionArgs) -> Result<Value> {
        match args {
            OptionArgs::All => self.options(),
            OptionArgs::Get(key) => self.get_option(&key),
            OptionArgs::Set(key, value) => self.set_option(&key, value).map(|_| Value::Null),
            OptionArgs::Merge(fields) => self.merge_options(fields).map(|_| Value::Null),
        }
    }

    /// The stored configuration, or `null` before the first refresh
    ///
    /// Values set since the last refresh are reported as they were given.
    pub fn options(&self) -> Result<Value> {
        let Some(config) = &self.stored else {
            return Ok(Value::Null);
        };
        let mut value = to_json(config)?;
        if let Value::Object(fields) = &mut value {
            fields.extend(self.pending.clone());
        }
        Ok(value)
    }

    pub fn get_option(&self, key: &str) -> Result<Value> {
        let field = canonical_key(key).ok_or_else(|| TabstopsError::UnknownOption(key.to_string()))?;
        match self.options()? {
            Value::Object(mut fields) => Ok(fields.remove(field).unwrap_or(Value::Null)),
            _ => Ok(Value::Null),
        }
    }

    pub fn set_option(&mut self, key: &str, value: Value) -> Result<()> {
        let mut fields = Map::new();
        fields.insert(key.to_string(), value);
        self.merge_options(fields)
    }

    /// Overwrite stored fields; the stored configuration is left untouched
    /// when any field is rejected
    ///
    /// A value that fits the stored field is applied at once. A declaration
    /// (`"100px right"`, `"2in"`, `null` tab stops) is checked for syntax and
    /// kept pending until the next refresh resolves it.
    pub fn merge_options(&mut self, fields: Map<String, Value>) -> Result<()> {
        let stored = self.stored.as_ref().ok_or(TabstopsError::NotInitialized)?;
        let Value::Object(mut current) = to_json(stored)? else {
            return Err(TabstopsError::NotInitialized);
        };
        let mut pending = self.pending.clone();
        for (key, value) in fields {
            let field = canonical_key(&key).ok_or_else(|| TabstopsError::UnknownOption(key.clone()))?;
            let mut candidate = current.clone();
            candidate.insert(field.to_string(), value.clone());
            // validate field by field so the error names the offending key
            match serde_json::from_value::<Configuration>(Value::Object(candidate.clone())) {
                Ok(config) => {
                    validate_scale_factor(&key, config.scale_factor)?;
                    current = candidate;
                    pending.remove(field);
                }
                Err(resolved_error) => {
                    check_declaration(&key, field, &value).map_err(|reason| TabstopsError::InvalidOptionValue {
                        key: key.clone(),
                        reason: format!("{}; {}", resolved_error, reason),
                    })?;
                    pending.insert(field.to_string(), value);
                }
            }
        }
        let updated: Configuration =
            serde_json::from_value(Value::Object(current)).map_err(|e| TabstopsError::InvalidOptionValue {
                key: "options".to_string(),
                reason: e.to_string(),
            })?;
        if !updated.auto_refresh_on_resize {
            self.subscription = None;
        }
        self.stored = Some(updated);
        self.pending = pending;
        Ok(())
    }

    /// Undo all tab layout, revert materialized markers and forget the
    /// stored configuration
    pub fn destroy(&mut self) -> Result<()> {
        self.subscription = None;
        self.pending.clear();
        let config = self.stored.take();
        let selector = match &config {
            Some(config) => MarkerSelector::from(config),
            None => MarkerSelector::new("span", "tab"),
        };
        let remaining = reset_markers(&mut self.tree, &selector, ResetMode::Dematerialize)?;
        log::debug!("destroy: {} authored tab markers kept", remaining.len());
        Ok(())
    }
}

/// Syntax check for an option value that still needs resolving
///
/// Only tab stops and the default interval have a declaration form. Lengths
/// are measured by the host at refresh time.
fn check_declaration(key: &str, field: &str, value: &Value) -> std::result::Result<(), String> {
    if value.is_null() && field != "tabStops" {
        return Err(format!("'{}' cannot be null", key));
    }
    let mut single = Map::new();
    single.insert(field.to_string(), value.clone());
    let layer = ConfigLayer::from_json(&Value::Object(single)).map_err(|e| e.to_string())?;
    match field {
        "tabStops" => {
            let spec = layer.tab_stops.unwrap_or(TabStopsSpec::FromStyle);
            parse_records(&spec, String::new).map(|_| ()).map_err(|e| e.to_string())
        }
        "defaultTabInterval" => Ok(()),
        _ => Err(format!("'{}' has no declaration form", key)),
    }
}

fn to_json(config: &Configuration) -> Result<Value> {
    serde_json::to_value(config).map_err(|e| TabstopsError::InvalidOptionValue {
        key: "options".to_string(),
        reason: e.to_string(),
    })
}
