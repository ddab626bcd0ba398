//! JavaScript-facing container API
//!
//! `TabstopsContainer` wraps one [`Container`]. Measurements are answered by a
//! duck-typed JS host object that receives the container's current markup and
//! the child-index path of the node being measured:
//!
//! ```text
//! containerLeft(tree)          containerWidth(tree)     contentHeight(tree)
//! marginBottom(tree)           parentWidth(tree)        fontSize(tree)
//! offsetLeft(tree, path)       renderedWidth(tree, path)
//! textDecoration(tree, path)   computedCustomProperty(tree, name)
//! measureLength(tree, expr)
//! ```

use super::container::{Container, OptionArgs};
use super::helpers::{defined_json, deserialize, optional_json, serialize, to_js_error};
use crate::host::LayoutHost;
use crate::html_layout::Overrides;
use crate::models::{Markup, NodeId, TextDecoration, TextTree};
use crate::{wasm_error, wasm_info};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// Host object supplied by JavaScript
    pub type JsLayoutHost;

    #[wasm_bindgen(method, js_name = containerLeft)]
    fn container_left(this: &JsLayoutHost, tree: &JsValue) -> f32;

    #[wasm_bindgen(method, js_name = containerWidth)]
    fn container_width(this: &JsLayoutHost, tree: &JsValue) -> f32;

    #[wasm_bindgen(method, js_name = contentHeight)]
    fn content_height(this: &JsLayoutHost, tree: &JsValue) -> f32;

    #[wasm_bindgen(method, js_name = marginBottom)]
    fn margin_bottom(this: &JsLayoutHost, tree: &JsValue) -> f32;

    #[wasm_bindgen(method, js_name = parentWidth)]
    fn parent_width(this: &JsLayoutHost, tree: &JsValue) -> f32;

    #[wasm_bindgen(method, js_name = fontSize)]
    fn font_size(this: &JsLayoutHost, tree: &JsValue) -> f32;

    #[wasm_bindgen(method, js_name = offsetLeft)]
    fn offset_left(this: &JsLayoutHost, tree: &JsValue, path: &JsValue) -> f32;

    #[wasm_bindgen(method, js_name = renderedWidth)]
    fn rendered_width(this: &JsLayoutHost, tree: &JsValue, path: &JsValue) -> f32;

    #[wasm_bindgen(method, js_name = textDecoration)]
    fn text_decoration(this: &JsLayoutHost, tree: &JsValue, path: &JsValue) -> JsValue;

    #[wasm_bindgen(method, js_name = computedCustomProperty)]
    fn computed_custom_property(this: &JsLayoutHost, tree: &JsValue, name: &str) -> Option<String>;

    #[wasm_bindgen(method, js_name = measureLength)]
    fn measure_length(this: &JsLayoutHost, tree: &JsValue, expr: &str) -> Option<f32>;
}

/// [`LayoutHost`] over a JS host object
///
/// The serialized tree is cached per tree revision; layout asks for several
/// measurements between mutations.
struct JsHostAdapter<'a> {
    js: &'a JsLayoutHost,
    cache: RefCell<Option<(u64, JsValue)>>,
}

impl<'a> JsHostAdapter<'a> {
    fn new(js: &'a JsLayoutHost) -> Self {
        Self {
            js,
            cache: RefCell::new(None),
        }
    }

    fn markup(&self, tree: &TextTree) -> JsValue {
        let mut cache = self.cache.borrow_mut();
        if let Some((revision, value)) = cache.as_ref() {
            if *revision == tree.revision() {
                return value.clone();
            }
        }
        let value = match tree.to_markup(tree.root()) {
            Some(markup) => serialize(&markup, "Failed to serialize tree for the host").unwrap_or_else(|_| {
                wasm_error!("host measurements at revision {} run against null", tree.revision());
                JsValue::NULL
            }),
            None => {
                wasm_error!("container root has no markup at revision {}", tree.revision());
                JsValue::NULL
            }
        };
        *cache = Some((tree.revision(), value.clone()));
        value
    }

    fn path(&self, tree: &TextTree, node: NodeId) -> JsValue {
        match tree.path_to(node) {
            Some(path) => path
                .into_iter()
                .map(|index| JsValue::from(index as u32))
                .collect::<js_sys::Array>()
                .into(),
            None => JsValue::NULL,
        }
    }
}

impl LayoutHost for JsHostAdapter<'_> {
    fn container_left(&self, tree: &TextTree) -> f32 {
        self.js.container_left(&self.markup(tree))
    }

    fn container_width(&self, tree: &TextTree) -> f32 {
        self.js.container_width(&self.markup(tree))
    }

    fn content_height(&self, tree: &TextTree) -> f32 {
        self.js.content_height(&self.markup(tree))
    }

    fn margin_bottom(&self, tree: &TextTree) -> f32 {
        self.js.margin_bottom(&self.markup(tree))
    }

    fn parent_width(&self, tree: &TextTree) -> f32 {
        self.js.parent_width(&self.markup(tree))
    }

    fn font_size(&self, tree: &TextTree) -> f32 {
        self.js.font_size(&self.markup(tree))
    }

    fn offset_left(&self, tree: &TextTree, node: NodeId) -> f32 {
        self.js.offset_left(&self.markup(tree), &self.path(tree, node))
    }

    fn rendered_width(&self, tree: &TextTree, node: NodeId) -> f32 {
        self.js.rendered_width(&self.markup(tree), &self.path(tree, node))
    }

    fn text_decoration(&self, tree: &TextTree, node: NodeId) -> Option<TextDecoration> {
        let value = self.js.text_decoration(&self.markup(tree), &self.path(tree, node));
        serde_wasm_bindgen::from_value::<Option<TextDecoration>>(value)
            .ok()
            .flatten()
    }

    fn computed_custom_property(&self, tree: &TextTree, name: &str) -> Option<String> {
        self.js.computed_custom_property(&self.markup(tree), name)
    }

    fn measure_length(&self, tree: &TextTree, expr: &str) -> Option<f32> {
        self.js.measure_length(&self.markup(tree), expr)
    }
}

/// A managed tab-stop container
#[wasm_bindgen]
pub struct TabstopsContainer {
    inner: RefCell<Container>,
}

#[wasm_bindgen]
impl TabstopsContainer {
    /// Build a container from its markup (`{type: "element", tag, children, ...}`)
    #[wasm_bindgen(constructor)]
    pub fn new(markup: JsValue) -> Result<TabstopsContainer, JsValue> {
        let markup: Markup = deserialize(markup, "Invalid container markup")?;
        let container = Container::from_markup(&markup).map_err(|e| to_js_error("TabstopsContainer", e))?;
        Ok(TabstopsContainer {
            inner: RefCell::new(container),
        })
    }

    /// Resolve options, lay the container out and return the display list
    ///
    /// `options` may be omitted, an options object, or `'data'` to re-apply
    /// the declarative attributes.
    pub fn refresh(&self, host: &JsLayoutHost, options: JsValue) -> Result<JsValue, JsValue> {
        let overrides = match optional_json(options, "Invalid refresh options")? {
            Some(value) => Overrides::from_json(&value).map_err(|e| to_js_error("refresh", e))?,
            None => Overrides::None,
        };
        let mut container = self.borrow_mut("refresh")?;
        let list = container
            .refresh(&JsHostAdapter::new(host), &overrides)
            .map_err(|e| to_js_error("refresh", e))?;
        wasm_info!("refresh: laid out {} tabs, {} bars", list.tabs.len(), list.bars.len());
        serialize(&list, "Failed to serialize display list")
    }

    /// `option()`, `option(key)`, `option(key, value)` or `option({...})`
    ///
    /// `option(key, null)` sets `key` to `null`; only an omitted value reads.
    pub fn option(&self, key: JsValue, value: JsValue) -> Result<JsValue, JsValue> {
        let args = OptionArgs::from_values(
            optional_json(key, "Invalid option key")?,
            defined_json(value, "Invalid option value")?,
        )
        .map_err(|e| to_js_error("option", e))?;
        let result = self
            .borrow_mut("option")?
            .option(args)
            .map_err(|e| to_js_error("option", e))?;
        serialize(&result, "Failed to serialize option")
    }

    pub fn destroy(&self) -> Result<(), JsValue> {
        self.borrow_mut("destroy")?
            .destroy()
            .map_err(|e| to_js_error("destroy", e))
    }

    /// Re-layout after a resize; `undefined` when not subscribed
    ///
    /// A notification arriving while a pass is running is ignored.
    #[wasm_bindgen(js_name = notifyResize)]
    pub fn notify_resize(&self, host: &JsLayoutHost) -> Result<JsValue, JsValue> {
        let Ok(mut container) = self.inner.try_borrow_mut() else {
            return Ok(JsValue::UNDEFINED);
        };
        match container
            .notify_resize(&JsHostAdapter::new(host))
            .map_err(|e| to_js_error("notifyResize", e))?
        {
            Some(list) => serialize(&list, "Failed to serialize display list"),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Current markup of the container
    pub fn markup(&self) -> Result<JsValue, JsValue> {
        let container = self.borrow_mut("markup")?;
        let tree = container.tree();
        serialize(&tree.to_markup(tree.root()), "Failed to serialize markup")
    }

    #[wasm_bindgen(js_name = textContent)]
    pub fn text_content(&self) -> Result<String, JsValue> {
        let container = self.borrow_mut("textContent")?;
        Ok(container.tree().text_content(container.tree().root()))
    }
}

impl TabstopsContainer {
    fn borrow_mut(&self, operation: &str) -> Result<std::cell::RefMut<'_, Container>, JsValue> {
        self.inner.try_borrow_mut().map_err(|_| {
            let msg = format!("{}: container is busy with another layout pass", operation);
            wasm_error!("{}", msg);
            JsValue::from_str(&msg)
        })
    }
}
