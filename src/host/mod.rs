//! Host rendering environment
//!
//! Tab layout never measures text itself. Everything it needs to know about
//! rendered geometry comes through [`LayoutHost`], implemented over a live
//! document in the browser and by [`MonospaceHost`] for headless use and tests.

pub mod monospace;

pub use monospace::MonospaceHost;

use crate::models::{NodeId, TextDecoration, TextTree};
use crate::parse::length::{Length, LengthContext};
use std::fmt;

/// Registration of a resize re-layout; dropping it cancels the registration
pub struct ResizeSubscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl ResizeSubscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to cancel, for hosts that deliver resize
    /// notifications themselves
    pub fn detached() -> Self {
        Self { cancel: None }
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for ResizeSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeSubscription")
            .field("attached", &self.cancel.is_some())
            .finish()
    }
}

/// Measurement and style queries answered by the rendering environment
///
/// Horizontal positions returned by [`offset_left`](LayoutHost::offset_left)
/// and [`container_left`](LayoutHost::container_left) are in rendered (scaled)
/// page pixels. Widths are in layout pixels.
pub trait LayoutHost {
    /// Left edge of the container
    fn container_left(&self, tree: &TextTree) -> f32;

    /// Content-box width of the container
    fn container_width(&self, tree: &TextTree) -> f32;

    /// Content-box height of the container
    fn content_height(&self, tree: &TextTree) -> f32;

    fn margin_bottom(&self, tree: &TextTree) -> f32;

    /// Width that percentages of the container resolve against
    fn parent_width(&self, tree: &TextTree) -> f32;

    fn font_size(&self, _tree: &TextTree) -> f32 {
        16.0
    }

    /// Left border edge of a node
    fn offset_left(&self, tree: &TextTree, node: NodeId) -> f32;

    /// Content-box width of a node
    fn rendered_width(&self, tree: &TextTree, node: NodeId) -> f32;

    /// Computed text decoration in effect for a node
    fn text_decoration(&self, tree: &TextTree, node: NodeId) -> Option<TextDecoration>;

    /// Custom property value from the stylesheet cascade
    fn computed_custom_property(&self, _tree: &TextTree, _name: &str) -> Option<String> {
        None
    }

    /// Width in pixels of a box sized to `expr` inside the container's parent
    ///
    /// The default converts the expression arithmetically from the host's font
    /// metrics and parent width; browser hosts measure a hidden probe instead.
    fn measure_length(&self, tree: &TextTree, expr: &str) -> Option<f32> {
        let length = Length::parse(expr).ok()?;
        let font_size = self.font_size(tree);
        let ctx = LengthContext {
            font_size,
            root_font_size: 16.0,
            char_width: font_size / 2.0,
            percent_base: self.parent_width(tree),
        };
        let lookup = |name: &str| custom_property(self, tree, name);
        length.to_px(&ctx, &lookup).ok()
    }

    /// Start observing the container for size changes
    fn subscribe_resize(&self, _tree: &TextTree) -> ResizeSubscription {
        ResizeSubscription::detached()
    }
}

/// Custom property of the container: inline declaration first, then the
/// computed value
pub fn custom_property<H: LayoutHost + ?Sized>(host: &H, tree: &TextTree, name: &str) -> Option<String> {
    tree.container()
        .style
        .custom_properties
        .get(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| host.computed_custom_property(tree, name))
}
