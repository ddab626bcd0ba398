//! Length resolution against a rendered container

use crate::error::{Result, TabstopsError};
use crate::host::LayoutHost;
use crate::models::{LengthValue, TextTree};
use crate::parse::length::parse_pixels;

/// Resolve a length expression to pixels
///
/// Plain pixel values are taken as they are; anything else is measured by the
/// host in the container's context.
pub fn resolve_length<H: LayoutHost + ?Sized>(host: &H, tree: &TextTree, expr: &str) -> Result<f32> {
    if let Some(px) = parse_pixels(expr) {
        return Ok(px);
    }
    host.measure_length(tree, expr.trim())
        .filter(|px| px.is_finite())
        .ok_or_else(|| TabstopsError::InvalidLength(expr.trim().to_string()))
}

pub fn resolve_length_value<H: LayoutHost + ?Sized>(
    host: &H,
    tree: &TextTree,
    value: &LengthValue,
) -> Result<f32> {
    match value {
        LengthValue::Pixels(px) => Ok(*px),
        LengthValue::Expr(expr) => resolve_length(host, tree, expr),
    }
}
