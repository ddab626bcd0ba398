// Tab-stop declarations resolved against a container

use serde_json::json;
use tabstops::html_layout::{resolve_configuration, Overrides};
use tabstops::parse::parse_tab_stops;
use tabstops::{Alignment, ConfigLayer, Leader, Markup, MonospaceHost, TabStop, TabStopsSpec, TabstopsError, TextTree};

fn container() -> TextTree {
    TextTree::from_markup(&Markup::element("p")).unwrap()
}

fn stops(declaration: &str) -> Result<Vec<TabStop>, TabstopsError> {
    parse_tab_stops(
        &TabStopsSpec::Text(declaration.to_string()),
        &container(),
        &MonospaceHost::new(400.0),
        "--tabstops",
    )
}

#[test]
fn test_position_and_leader() {
    assert_eq!(
        stops("50px dotted").unwrap(),
        vec![TabStop {
            position: "50px".to_string(),
            pixel_offset: 50.0,
            alignment: Alignment::Left,
            leader: Leader::Dotted,
        }]
    );
}

#[test]
fn test_empty_declaration_yields_no_stops() {
    assert!(stops("").unwrap().is_empty());
}

#[test]
fn test_mixed_units_and_token_orders() {
    let stops = stops("1in right dotted, 2in dashed center, 3in 'x y' decimal, 12pc bar").unwrap();
    assert_eq!(stops.len(), 4);

    assert_eq!(stops[0].pixel_offset, 96.0);
    assert_eq!(stops[0].alignment, Alignment::Right);
    assert_eq!(stops[0].leader, Leader::Dotted);

    assert_eq!(stops[1].alignment, Alignment::Center);
    assert_eq!(stops[1].leader, Leader::Dashed);

    assert_eq!(stops[2].pixel_offset, 288.0);
    assert_eq!(stops[2].leader, Leader::Literal("x y".to_string()));
    assert_eq!(stops[2].leader.fill_unit(), "x\u{a0}y");

    assert_eq!(stops[3].pixel_offset, 192.0);
    assert!(stops[3].alignment.is_bar());
}

#[test]
fn test_ooxml_leader_names() {
    let stops = stops("10px dot, 20px hyphen, 30px underscore, 40px middleDot, 50px none").unwrap();
    let leaders: Vec<Leader> = stops.into_iter().map(|s| s.leader).collect();
    assert_eq!(
        leaders,
        vec![
            Leader::Dotted,
            Leader::Dashed,
            Leader::Solid,
            Leader::Literal("\u{b7}".to_string()),
            Leader::Blank,
        ]
    );
}

#[test]
fn test_malformed_declarations_are_rejected() {
    assert!(matches!(stops("50px sideways"), Err(TabstopsError::InvalidSpecFormat(_))));
    assert!(matches!(stops("50px left dotted more"), Err(TabstopsError::InvalidSpecFormat(_))));
    assert!(matches!(stops("wide"), Err(TabstopsError::InvalidLength(_))));
}

#[test]
fn test_array_of_strings_and_objects() {
    let overrides = Overrides::from_json(&json!({
        "tabStops": ["50px right", { "position": "2in", "align": "center" }]
    }))
    .unwrap();
    let host = MonospaceHost::new(400.0);
    let config = resolve_configuration(&container(), &host, &ConfigLayer::default(), &overrides).unwrap();

    assert_eq!(config.tab_stops.len(), 2);
    assert_eq!(config.tab_stops[0].alignment, Alignment::Right);
    assert_eq!(config.tab_stops[1].pixel_offset, 192.0);
    assert_eq!(config.tab_stops[1].alignment, Alignment::Center);
    assert_eq!(config.tab_stops[1].leader, Leader::Blank);
}

#[test]
fn test_non_string_declaration_is_rejected() {
    assert!(matches!(
        Overrides::from_json(&json!({ "tabStops": 42 })),
        Err(TabstopsError::InvalidSpecFormat(_))
    ));
}

#[test]
fn test_var_reference_in_position() {
    let tree = TextTree::from_markup(
        &Markup::element("p")
            .with_custom_property("--gutter", "3ch")
            .with_custom_property("--tabstops", "var(--gutter) right, var(--missing)"),
    )
    .unwrap();
    let host = MonospaceHost::new(400.0).with_char_width(10.0);
    let result = resolve_configuration(&tree, &host, &ConfigLayer::default(), &Overrides::None);
    assert!(matches!(result, Err(TabstopsError::InvalidLength(_))));

    let overrides = Overrides::from_json(&json!({ "tabstops": "var(--gutter) right" })).unwrap();
    let config = resolve_configuration(&tree, &host, &ConfigLayer::default(), &overrides).unwrap();
    assert_eq!(config.tab_stops[0].pixel_offset, 30.0);
    assert_eq!(config.tab_stops[0].alignment, Alignment::Right);
}
