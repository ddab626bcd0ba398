// Tab layout against a fixed-advance host: every character is 8px wide unless
// a test says otherwise.

use serde_json::{json, Value};
use tabstops::html_layout::{Overrides, FILL_REPETITION_LIMIT};
use tabstops::{
    Alignment, Container, DecorationStyle, Display, DisplayList, LayoutHost, Leader, Markup, MonospaceHost,
    NodeKind, RuleStyle, TextAlign, TextDecoration,
};

const NBSP: &str = "\u{a0}";

fn paragraph(text: &str) -> Markup {
    Markup::element("p").with_text(text)
}

fn lay_out(markup: Markup, host: &MonospaceHost, options: Value) -> (Container, DisplayList) {
    let mut container = Container::from_markup(&markup).unwrap();
    let overrides = Overrides::from_json(&options).unwrap();
    let list = container.refresh(host, &overrides).unwrap();
    (container, list)
}

#[test]
fn test_left_stop() {
    let host = MonospaceHost::new(300.0);
    let (container, list) = lay_out(paragraph("a\tb"), &host, json!({ "tabstops": "100px" }));

    let tab = &list.tabs[0];
    assert_eq!(tab.span_left, 8.0);
    assert_eq!(tab.width, Some(92.0));
    assert_eq!(tab.fill, Some(NBSP.repeat(11)));
    assert_eq!(tab.stop.as_ref().unwrap().declared_index, Some(0));

    let tree = container.tree();
    let marker = tree.element(tab.node).unwrap();
    assert_eq!(marker.style.display, Display::InlineBlock);
    assert_eq!(marker.style.min_width, Some(92.0));

    let after = tree.next_sibling(tab.node).unwrap();
    assert_eq!(tree.text(after), Some("b"));
    assert_eq!(host.offset_left(tree, after), 100.0);
}

#[test]
fn test_right_stop_ends_run_at_stop() {
    let host = MonospaceHost::new(300.0);
    let (container, list) = lay_out(paragraph("a\tbcd"), &host, json!({ "tabstops": "100px right" }));

    assert_eq!(list.tabs[0].width, Some(68.0));
    let tree = container.tree();
    let after = tree.next_sibling(list.tabs[0].node).unwrap();
    assert_eq!(host.offset_left(tree, after) + host.rendered_width(tree, after), 100.0);
}

#[test]
fn test_center_stop() {
    let host = MonospaceHost::new(300.0);
    let (_, list) = lay_out(paragraph("a\tbcd"), &host, json!({ "tabstops": "100px center" }));
    assert_eq!(list.tabs[0].width, Some(80.0));
    assert_eq!(list.tabs[0].stop.as_ref().unwrap().alignment, Alignment::Center);
}

#[test]
fn test_decimal_stop_aligns_the_point() {
    let host = MonospaceHost::new(300.0);
    let (container, list) = lay_out(paragraph("a\t12.5"), &host, json!({ "tabstops": "100px decimal" }));

    let tab = &list.tabs[0];
    assert_eq!(tab.width, Some(76.0));
    assert_eq!(tab.stop.as_ref().unwrap().alignment, Alignment::Decimal);

    // the split used for measuring is undone
    let tree = container.tree();
    let after = tree.next_sibling(tab.node).unwrap();
    assert_eq!(tree.text(after), Some("12.5"));
    assert!(tree.next_sibling(after).is_none());
    assert_eq!(host.offset_left(tree, after) + 16.0, 100.0);
}

#[test]
fn test_decimal_point_inside_nested_element() {
    let host = MonospaceHost::new(300.0);
    let markup = Markup::element("p")
        .with_text("a\t")
        .with_child(Markup::element("b").with_text("1").with_child(Markup::element("i").with_text("2.5")));
    let (_, list) = lay_out(markup, &host, json!({ "tabstops": "100px decimal" }));
    assert_eq!(list.tabs[0].width, Some(76.0));
}

#[test]
fn test_decimal_without_point_falls_back_to_right() {
    let host = MonospaceHost::new(300.0);
    let (_, decimal) = lay_out(paragraph("a\tbcd"), &host, json!({ "tabstops": "100px decimal" }));
    let (_, right) = lay_out(paragraph("a\tbcd"), &host, json!({ "tabstops": "100px right" }));

    assert_eq!(decimal.tabs[0].width, right.tabs[0].width);
    assert_eq!(decimal.tabs[0].stop.as_ref().unwrap().alignment, Alignment::Right);
}

#[test]
fn test_decimal_scan_stops_at_next_marker() {
    let host = MonospaceHost::new(400.0);
    let (_, list) = lay_out(
        paragraph("a\tbc\t1.5"),
        &host,
        json!({ "tabstops": "100px decimal, 200px" }),
    );
    // no point before the second tab: right-aligned "bc"
    assert_eq!(list.tabs[0].width, Some(76.0));
    assert_eq!(list.tabs[0].stop.as_ref().unwrap().alignment, Alignment::Right);
}

#[test]
fn test_leading_decimal_point() {
    let host = MonospaceHost::new(300.0);
    let (_, list) = lay_out(paragraph("a\t.5"), &host, json!({ "tabstops": "100px decimal" }));
    assert_eq!(list.tabs[0].width, Some(92.0));
}

#[test]
fn test_consecutive_markers() {
    let host = MonospaceHost::new(300.0);
    let (container, list) = lay_out(paragraph("a\tb\tc"), &host, json!({ "tabstops": "100px, 200px right" }));

    assert_eq!(list.tabs.len(), 2);
    assert_eq!(list.tabs[1].span_left, 108.0);
    assert_eq!(list.tabs[1].width, Some(84.0));

    let tree = container.tree();
    let last = tree.next_sibling(list.tabs[1].node).unwrap();
    assert_eq!(host.offset_left(tree, last), 192.0);
}

#[test]
fn test_border_leader() {
    let host = MonospaceHost::new(300.0);
    let (container, list) = lay_out(
        paragraph("a\tb"),
        &host,
        json!({ "tabstops": "100px dotted", "leaderMode": "border" }),
    );

    let tab = &list.tabs[0];
    assert_eq!(tab.width, Some(92.0));
    assert_eq!(tab.fill, None);

    let tree = container.tree();
    let style = &tree.element(tab.node).unwrap().style;
    assert_eq!(style.border_bottom, Some(RuleStyle::Dotted));
    assert_eq!(style.margin_x, Some(4.0));
    assert_eq!(style.width, Some(84.0));
    assert!(tree.children(tab.node).is_empty());

    let after = tree.next_sibling(tab.node).unwrap();
    assert_eq!(host.offset_left(tree, after), 100.0);
}

#[test]
fn test_border_mode_narrow_gap_is_plain_spacer() {
    let host = MonospaceHost::new(300.0);
    let (container, list) = lay_out(
        paragraph("abcdefghijkl\tb"),
        &host,
        json!({ "tabstops": "100px dotted", "leaderMode": "border" }),
    );
    let style = &container.tree().element(list.tabs[0].node).unwrap().style;
    assert_eq!(style.width, Some(4.0));
    assert_eq!(style.border_bottom, None);
    assert_eq!(style.margin_x, None);
}

#[test]
fn test_underline_overrides_leader() {
    let host = MonospaceHost::new(300.0);
    let underlined = |text: &str| {
        Markup::element("p").with_child(
            Markup::element("u")
                .with_decoration(TextDecoration::underline(DecorationStyle::Dashed))
                .with_text(text),
        )
    };

    let (_, list) = lay_out(underlined("a\tb"), &host, json!({ "tabstops": "100px" }));
    assert_eq!(list.tabs[0].fill, Some("-".repeat(11)));
    assert_eq!(list.tabs[0].stop.as_ref().unwrap().leader, Leader::Dashed);

    let (_, list) = lay_out(underlined("a\t1.5"), &host, json!({ "tabstops": "100px decimal" }));
    assert_eq!(list.tabs[0].stop.as_ref().unwrap().leader, Leader::Blank);
}

#[test]
fn test_fill_stops_at_repetition_limit() {
    // zero-width glyphs never reach the target width
    let host = MonospaceHost::new(300.0).with_char_width(0.0);
    let (_, list) = lay_out(paragraph("a\tb"), &host, json!({ "tabstops": "100px dotted" }));

    let fill = list.tabs[0].fill.as_ref().unwrap();
    assert_eq!(fill.chars().count(), FILL_REPETITION_LIMIT - 1);
    assert_eq!(fill, &Leader::Dotted.fill_unit().repeat(FILL_REPETITION_LIMIT - 1));
}

#[test]
fn test_multi_character_leader_right_aligns() {
    let host = MonospaceHost::new(300.0);
    let (container, list) = lay_out(paragraph("a\tb"), &host, json!({ "tabstops": "100px '-+'" }));

    assert_eq!(list.tabs[0].fill, Some("-+".repeat(5)));
    let style = &container.tree().element(list.tabs[0].node).unwrap().style;
    assert_eq!(style.text_align, Some(TextAlign::Right));
}

#[test]
fn test_bar_stop_draws_rule_and_is_not_a_target() {
    let host = MonospaceHost::new(300.0).with_margin_bottom(6.0);
    let (container, list) = lay_out(paragraph("a\tb"), &host, json!({ "tabstops": "50px bar, 100px" }));

    assert_eq!(list.bars.len(), 1);
    let bar = &list.bars[0];
    assert_eq!(bar.offset, 50.0);
    assert_eq!(bar.height, 26.0);
    assert_eq!(bar.width, 51.0);
    assert_eq!(bar.view_box, "0 0 51 26");
    assert_eq!(bar.path, "M50,0 v 26");

    let tab = &list.tabs[0];
    assert_eq!(tab.stop.as_ref().unwrap().offset, 100.0);
    assert_eq!(tab.stop.as_ref().unwrap().declared_index, Some(1));

    let tree = container.tree();
    let first = tree.first_child(tree.root()).unwrap();
    assert!(matches!(tree.kind(first), Some(NodeKind::Overlay(_))));
}

fn default_stop_after(chars: usize, char_width: f32) -> Option<f32> {
    let host = MonospaceHost::new(200.0).with_char_width(char_width);
    let text = format!("{}\tz", "x".repeat(chars));
    let (_, list) = lay_out(paragraph(&text), &host, json!({ "defaultTabstop": "96px" }));
    list.tabs[0].stop.as_ref().map(|stop| stop.offset)
}

#[test]
fn test_default_stops() {
    assert_eq!(default_stop_after(1, 10.0), Some(96.0));
    assert_eq!(default_stop_after(10, 10.0), Some(192.0));
    assert_eq!(default_stop_after(15, 10.0), Some(192.0));
    // next multiple would be 288, beyond the 200px container
    assert_eq!(default_stop_after(39, 5.0), None);
}

#[test]
fn test_skipped_marker_is_left_unstyled() {
    let host = MonospaceHost::new(200.0).with_char_width(5.0);
    let text = format!("{}\tz", "x".repeat(39));
    let (container, list) = lay_out(paragraph(&text), &host, json!({}));

    let tab = &list.tabs[0];
    assert_eq!(tab.stop, None);
    assert_eq!(tab.width, None);
    let marker = container.tree().element(tab.node).unwrap();
    assert_eq!(marker.style.display, Display::Inline);
    assert_eq!(marker.style.min_width, None);
}

#[test]
fn test_explicit_stops_fall_through_to_defaults() {
    let host = MonospaceHost::new(400.0);
    let (_, list) = lay_out(paragraph("a\tb\tc"), &host, json!({ "tabstops": "50px" }));

    assert_eq!(list.tabs[0].stop.as_ref().unwrap().offset, 50.0);
    let second = list.tabs[1].stop.as_ref().unwrap();
    assert_eq!(second.offset, 96.0);
    assert_eq!(second.declared_index, None);
}

#[test]
fn test_layout_is_idempotent() {
    let host = MonospaceHost::new(300.0);
    let mut container = Container::from_markup(&paragraph("a\tb\t1.25\tc")).unwrap();
    let overrides = Overrides::from_json(&json!({ "tabstops": "40px bar, 60px dotted, 120px decimal, 200px right" }))
        .unwrap();

    let first = container.refresh(&host, &overrides).unwrap();
    let markup = container.tree().to_markup(container.tree().root());
    let second = container.refresh(&host, &Overrides::None).unwrap();

    assert_eq!(first, second);
    assert_eq!(container.tree().to_markup(container.tree().root()), markup);
}

#[test]
fn test_scaled_container() {
    let host = MonospaceHost::new(300.0).with_container_left(10.0).with_scale(2.0);
    let (_, list) = lay_out(paragraph("a\tb"), &host, json!({ "tabstops": "100px", "scale": 2 }));

    assert_eq!(list.tabs[0].span_left, 8.0);
    assert_eq!(list.tabs[0].width, Some(92.0));
}

#[test]
fn test_literal_tabs_kept_when_conversion_disabled() {
    let host = MonospaceHost::new(300.0);
    let (container, list) = lay_out(paragraph("a\tb"), &host, json!({ "convertTabs": false }));

    assert!(list.tabs.is_empty());
    assert_eq!(container.tree().text_content(container.tree().root()), "a\tb");
}

#[test]
fn test_authored_markers_with_custom_selector() {
    let host = MonospaceHost::new(300.0);
    let markup = Markup::element("p")
        .with_attribute("data-tab-element", "i")
        .with_attribute("data-tab-class", "gap")
        .with_text("a")
        .with_child(Markup::element("i").with_class("gap"))
        .with_text("b");
    let (_, list) = lay_out(markup, &host, json!({ "tabstops": "100px" }));

    assert_eq!(list.tabs.len(), 1);
    assert_eq!(list.tabs[0].width, Some(92.0));
}
