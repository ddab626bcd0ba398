//! CSS length expressions
//!
//! Parses the subset of CSS lengths tab stops are declared with and converts
//! them to pixels given the measurement context of a container.

use crate::error::{Result, TabstopsError};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DIMENSION: Regex =
        Regex::new(r"^([+-]?(?:\d+\.?\d*|\.\d+))([a-zA-Z]*|%)$").expect("valid dimension pattern");
    static ref VAR_REFERENCE: Regex =
        Regex::new(r"^var\(\s*(--[A-Za-z0-9_-]+)\s*(?:,\s*(.*?))?\s*\)$").expect("valid var() pattern");
}

const PX_PER_INCH: f32 = 96.0;

/// Custom property references nested deeper than this are treated as cycles
const MAX_VAR_DEPTH: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    Pt,
    Pc,
    In,
    Cm,
    Mm,
    Q,
    Em,
    Rem,
    Ex,
    Ch,
    Percent,
}

impl LengthUnit {
    fn from_suffix(suffix: &str) -> Option<LengthUnit> {
        let unit = match suffix.to_ascii_lowercase().as_str() {
            "px" => LengthUnit::Px,
            "pt" => LengthUnit::Pt,
            "pc" => LengthUnit::Pc,
            "in" => LengthUnit::In,
            "cm" => LengthUnit::Cm,
            "mm" => LengthUnit::Mm,
            "q" => LengthUnit::Q,
            "em" => LengthUnit::Em,
            "rem" => LengthUnit::Rem,
            "ex" => LengthUnit::Ex,
            "ch" => LengthUnit::Ch,
            "%" => LengthUnit::Percent,
            _ => return None,
        };
        Some(unit)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Length {
    Dimension { value: f32, unit: LengthUnit },
    /// `var(--name, fallback)`
    Var { name: String, fallback: Option<String> },
}

/// Font and box metrics relative units are measured against
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LengthContext {
    pub font_size: f32,
    pub root_font_size: f32,
    /// Advance of the `0` glyph
    pub char_width: f32,
    /// Width percentages refer to
    pub percent_base: f32,
}

impl Default for LengthContext {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            root_font_size: 16.0,
            char_width: 8.0,
            percent_base: 0.0,
        }
    }
}

impl Length {
    pub fn parse(expr: &str) -> Result<Length> {
        let expr = expr.trim();
        if let Some(caps) = VAR_REFERENCE.captures(expr) {
            return Ok(Length::Var {
                name: caps[1].to_string(),
                fallback: caps
                    .get(2)
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|s| !s.is_empty()),
            });
        }
        let invalid = || TabstopsError::InvalidLength(expr.to_string());
        let caps = DIMENSION.captures(expr).ok_or_else(invalid)?;
        let value: f32 = caps[1].parse().map_err(|_| invalid())?;
        let unit = match &caps[2] {
            "" if value == 0.0 => LengthUnit::Px,
            suffix => LengthUnit::from_suffix(suffix).ok_or_else(invalid)?,
        };
        Ok(Length::Dimension { value, unit })
    }

    /// Convert to pixels; `lookup` resolves custom property names
    pub fn to_px(&self, ctx: &LengthContext, lookup: &dyn Fn(&str) -> Option<String>) -> Result<f32> {
        self.to_px_at_depth(ctx, lookup, 0)
    }

    fn to_px_at_depth(
        &self,
        ctx: &LengthContext,
        lookup: &dyn Fn(&str) -> Option<String>,
        depth: usize,
    ) -> Result<f32> {
        match self {
            Length::Dimension { value, unit } => Ok(value * unit_factor(*unit, ctx)),
            Length::Var { name, fallback } => {
                if depth >= MAX_VAR_DEPTH {
                    return Err(TabstopsError::InvalidLength(format!("var({})", name)));
                }
                let raw = lookup(name)
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .or_else(|| fallback.clone())
                    .ok_or_else(|| TabstopsError::InvalidLength(format!("var({})", name)))?;
                Length::parse(&raw)?.to_px_at_depth(ctx, lookup, depth + 1)
            }
        }
    }
}

fn unit_factor(unit: LengthUnit, ctx: &LengthContext) -> f32 {
    match unit {
        LengthUnit::Px => 1.0,
        LengthUnit::Pt => PX_PER_INCH / 72.0,
        LengthUnit::Pc => PX_PER_INCH / 6.0,
        LengthUnit::In => PX_PER_INCH,
        LengthUnit::Cm => PX_PER_INCH / 2.54,
        LengthUnit::Mm => PX_PER_INCH / 25.4,
        LengthUnit::Q => PX_PER_INCH / 101.6,
        LengthUnit::Em => ctx.font_size,
        LengthUnit::Rem => ctx.root_font_size,
        LengthUnit::Ex => ctx.font_size / 2.0,
        LengthUnit::Ch => ctx.char_width,
        LengthUnit::Percent => ctx.percent_base / 100.0,
    }
}

/// Value of a plain pixel expression (`"12.5px"`, `"0"`), if it is one
pub fn parse_pixels(expr: &str) -> Option<f32> {
    let expr = expr.trim();
    if expr == "0" {
        return Some(0.0);
    }
    expr.strip_suffix("px")
        .and_then(|number| number.trim_end().parse::<f32>().ok())
        .filter(|v| v.is_finite())
}
