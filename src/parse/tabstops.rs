//! Tab-stop declaration parser
//!
//! Turns raw declarations into ordered [`TabStop`] records. A string entry has
//! up to three whitespace-separated tokens, `position alignment leader`; quoted
//! segments may contain whitespace. The alignment and leader may appear in
//! either order.

use crate::error::{Result, TabstopsError};
use crate::host::{custom_property, LayoutHost};
use crate::html_layout::measure::resolve_length;
use crate::models::{Alignment, Leader, TabStop, TabStopEntry, TabStopRecord, TabStopsSpec, TextTree};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r#"[^\s"']+|"[^"]*"|'[^']*'"#).expect("valid token pattern");
}

/// Split an entry on whitespace outside quoted segments
pub fn tokenize(entry: &str) -> Vec<&str> {
    TOKEN.find_iter(entry.trim()).map(|m| m.as_str()).collect()
}

/// Split a comma-separated declaration into entries
///
/// A declaration that is only whitespace has no entries.
pub fn split_declaration(text: &str) -> Vec<String> {
    let entries: Vec<String> = text.trim().split(',').map(str::to_string).collect();
    if entries.len() == 1 && entries[0].is_empty() {
        return Vec::new();
    }
    entries
}

/// Parse one string entry into an unresolved record
///
/// Returns `None` for a blank entry.
pub fn parse_entry(entry: &str) -> Result<Option<TabStopRecord>> {
    let tokens = tokenize(entry);
    let Some((&position, rest)) = tokens.split_first() else {
        return Ok(None);
    };
    if rest.len() > 2 {
        return Err(TabstopsError::InvalidSpecFormat(format!(
            "'{}' has more than three tokens",
            entry.trim()
        )));
    }
    let (mut alignment, mut leader) = (rest.first().copied(), rest.get(1).copied());
    // tolerate "50px dotted right" as well as "50px right dotted"
    if alignment.map_or(false, |token| {
        token.parse::<Alignment>().is_err() && Leader::parse_token(token).is_ok()
    }) {
        std::mem::swap(&mut alignment, &mut leader);
    }
    Ok(Some(TabStopRecord {
        position: position.to_string(),
        alignment: alignment.map(str::parse::<Alignment>).transpose()?,
        leader: leader.map(Leader::parse_token).transpose()?,
    }))
}

/// Parse every entry of a declaration, in order, without resolving positions
pub fn parse_records(spec: &TabStopsSpec, style_value: impl FnOnce() -> String) -> Result<Vec<TabStopRecord>> {
    let entries: Vec<TabStopEntry> = match spec {
        TabStopsSpec::FromStyle => split_declaration(&style_value())
            .into_iter()
            .map(TabStopEntry::Text)
            .collect(),
        TabStopsSpec::Text(text) => split_declaration(text)
            .into_iter()
            .map(TabStopEntry::Text)
            .collect(),
        TabStopsSpec::List(entries) => entries.clone(),
    };
    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            TabStopEntry::Text(text) => match parse_entry(&text)? {
                Some(record) => records.push(record),
                None => log::debug!("skipping blank tab-stop entry"),
            },
            TabStopEntry::Record(record) => records.push(record),
        }
    }
    Ok(records)
}

/// Parse a declaration and resolve each position against the container
pub fn parse_tab_stops<H: LayoutHost + ?Sized>(
    spec: &TabStopsSpec,
    tree: &TextTree,
    host: &H,
    property: &str,
) -> Result<Vec<TabStop>> {
    let records = parse_records(spec, || {
        custom_property(host, tree, property).unwrap_or_default()
    })?;
    records
        .into_iter()
        .map(|record| {
            let pixel_offset = resolve_length(host, tree, &record.position)?;
            Ok(TabStop {
                pixel_offset,
                alignment: record.alignment.unwrap_or(Alignment::Left),
                leader: record.leader.unwrap_or_default(),
                position: record.position,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_keeps_quoted_segments() {
        assert_eq!(
            tokenize(r#"  100px right "- -" "#),
            vec!["100px", "right", r#""- -""#]
        );
        assert_eq!(tokenize("2cm 'a b' center"), vec!["2cm", "'a b'", "center"]);
    }

    #[test]
    fn test_leader_in_alignment_slot_is_swapped() {
        let record = parse_entry("50px dotted").unwrap().unwrap();
        assert_eq!(record.alignment, None);
        assert_eq!(record.leader, Some(Leader::Dotted));

        let record = parse_entry("50px dashed right").unwrap().unwrap();
        assert_eq!(record.alignment, Some(Alignment::Right));
        assert_eq!(record.leader, Some(Leader::Dashed));
    }

    #[test]
    fn test_empty_declaration_has_no_entries() {
        assert!(split_declaration("").is_empty());
        assert!(split_declaration("   ").is_empty());
        assert_eq!(split_declaration("50px, 1in right").len(), 2);
    }

    #[test]
    fn test_blank_entries_between_commas_are_skipped() {
        let records = parse_records(&TabStopsSpec::Text("50px,,100px,".into()), String::new).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_from_style_uses_supplied_value() {
        let records = parse_records(&TabStopsSpec::FromStyle, || "1in decimal".to_string()).unwrap();
        assert_eq!(records[0].alignment, Some(Alignment::Decimal));
    }

    #[test]
    fn test_bad_tokens_fail() {
        assert!(matches!(
            parse_entry("50px sideways"),
            Err(TabstopsError::InvalidSpecFormat(_))
        ));
        assert!(matches!(
            parse_entry("50px right dotted extra"),
            Err(TabstopsError::InvalidSpecFormat(_))
        ));
    }
}
