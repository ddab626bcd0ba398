//! Tab layout engine
//!
//! For each tab marker, in document order: find the stop it tabs to, work out
//! how wide the marker must be for the following text to align against that
//! stop, then size the marker and draw its leader.
//!
//! Markers are sized one at a time and each measurement reads the live
//! geometry, so earlier markers push later ones along exactly as rendered.

use super::display_list::{DisplayList, RenderTab, ResolvedStop};
use super::materialize::{reset_markers, MarkerSelector, ResetMode};
use crate::error::Result;
use crate::host::LayoutHost;
use crate::models::{
    Alignment, BarOverlay, Configuration, Display, Leader, LeaderMode, NodeId, NodeKind, TextAlign, TextTree,
};

/// Upper bound on leader fill repetitions per marker
pub const FILL_REPETITION_LIMIT: usize = 1000;

/// Border leaders are only drawn on gaps wider than this
const BORDER_LEADER_MIN_WIDTH: f32 = 9.0;

/// Horizontal margin on each side of a border leader
const BORDER_LEADER_MARGIN: f32 = 4.0;

/// Character that decimal alignment lines up on
const DECIMAL_POINT: char = '.';

/// Next default stop strictly beyond `span_left`, if it lies within the container
pub fn next_default_stop(span_left: f32, interval: f32, container_width: f32) -> Option<f32> {
    if !(interval.is_finite() && interval > 0.0) {
        return None;
    }
    let stop = ((span_left / interval).floor() + 1.0) * interval;
    (stop < container_width).then_some(stop)
}

/// Width that right-aligns a run of `run_width` against `stop`
fn right_aligned_width(stop: f32, span_left: f32, run_width: f32) -> f32 {
    (stop - span_left - run_width).max(0.0)
}

/// Where the first decimal point after a marker was found
enum DecimalScan {
    Found { node: NodeId, byte_offset: usize },
    /// Hit the next tab marker first
    Blocked,
    Exhausted,
}

pub struct TabLayoutEngine<'a, H: LayoutHost + ?Sized> {
    host: &'a H,
    config: &'a Configuration,
}

impl<'a, H: LayoutHost + ?Sized> TabLayoutEngine<'a, H> {
    pub fn new(host: &'a H, config: &'a Configuration) -> Self {
        Self { host, config }
    }

    fn selector(&self) -> MarkerSelector<'a> {
        MarkerSelector::from(self.config)
    }

    fn scale(&self) -> f32 {
        self.config.scale_factor
    }

    /// Lay out every tab marker in the container
    pub fn layout(&self, tree: &mut TextTree) -> Result<DisplayList> {
        let mode = if self.config.convert_literal_tabs {
            ResetMode::Materialize
        } else {
            ResetMode::Clear
        };
        let markers = reset_markers(tree, &self.selector(), mode)?;
        let bars = self.draw_bars(tree)?;

        let container_left = self.host.container_left(tree) / self.scale();
        let container_width = self.host.container_width(tree);
        let mut tabs = Vec::with_capacity(markers.len());

        for (index, &marker) in markers.iter().enumerate() {
            let span_left = self.host.offset_left(tree, marker) / self.scale() - container_left;
            let Some(mut stop) = self.select_stop(span_left, container_width) else {
                log::debug!("tab {} at {}px has no stop within {}px", index, span_left, container_width);
                tabs.push(RenderTab::skipped(marker, span_left));
                continue;
            };
            stop.leader = self.effective_leader(tree, marker, &stop);

            if let Some(element) = tree.element_mut(marker) {
                element.style.display = Display::InlineBlock;
            }
            let (alignment, width) = self.gap_width(tree, &markers, index, span_left, container_left, &stop)?;
            stop.alignment = alignment;
            let fill = self.apply_leader(tree, marker, width, &stop.leader)?;

            log::debug!(
                "tab {} at {}px -> {} stop at {}px, width {}px",
                index,
                span_left,
                alignment.as_str(),
                stop.offset,
                width
            );
            tabs.push(RenderTab {
                node: marker,
                span_left,
                stop: Some(stop),
                width: Some(width),
                fill,
            });
        }

        Ok(DisplayList { tabs, bars })
    }

    /// Prepend a full-height rule overlay for each bar stop
    fn draw_bars(&self, tree: &mut TextTree) -> Result<Vec<BarOverlay>> {
        let mut bars = Vec::new();
        let mut height = None;
        for stop in self.config.tab_stops.iter().filter(|s| s.alignment.is_bar()) {
            let h = *height.get_or_insert_with(|| {
                self.host.content_height(tree) + self.host.margin_bottom(tree)
            });
            let overlay = BarOverlay::new(stop.pixel_offset, h);
            let node = tree.create(NodeKind::Overlay(overlay.clone()));
            tree.prepend_child(tree.root(), node)?;
            bars.push(overlay);
        }
        Ok(bars)
    }

    /// First declared non-bar stop beyond the marker, else the next default stop
    fn select_stop(&self, span_left: f32, container_width: f32) -> Option<ResolvedStop> {
        let declared = self
            .config
            .tab_stops
            .iter()
            .enumerate()
            .find(|(_, s)| !s.alignment.is_bar() && s.pixel_offset > span_left);
        if let Some((index, stop)) = declared {
            return Some(ResolvedStop {
                offset: stop.pixel_offset,
                alignment: stop.alignment,
                leader: stop.leader.clone(),
                declared_index: Some(index),
            });
        }
        next_default_stop(span_left, self.config.default_tab_interval, container_width).map(|offset| {
            ResolvedStop {
                offset,
                alignment: Alignment::Left,
                leader: Leader::Blank,
                declared_index: None,
            }
        })
    }

    /// An underlined text run draws its underline style as the leader
    fn effective_leader(&self, tree: &TextTree, marker: NodeId, stop: &ResolvedStop) -> Leader {
        if stop.alignment == Alignment::Decimal {
            return stop.leader.clone();
        }
        let run = tree.parent(marker).unwrap_or(marker);
        match self.host.text_decoration(tree, run) {
            Some(decoration) if decoration.is_underline() => decoration.rule_style().into(),
            _ => stop.leader.clone(),
        }
    }

    /// Width of the gap and the alignment actually applied
    fn gap_width(
        &self,
        tree: &mut TextTree,
        markers: &[NodeId],
        index: usize,
        span_left: f32,
        container_left: f32,
        stop: &ResolvedStop,
    ) -> Result<(Alignment, f32)> {
        let offset = stop.offset;
        match stop.alignment {
            // bars never reach here; select_stop skips them
            Alignment::Left | Alignment::Start | Alignment::Bar => Ok((stop.alignment, offset - span_left)),
            Alignment::Right | Alignment::End => {
                let run = self.text_run_width(tree, markers, index, span_left, container_left)?;
                Ok((stop.alignment, right_aligned_width(offset, span_left, run)))
            }
            Alignment::Center => {
                let run = self.text_run_width(tree, markers, index, span_left, container_left)?;
                Ok((Alignment::Center, (offset - span_left - run / 2.0).max(0.0)))
            }
            Alignment::Decimal => match self.decimal_prefix_width(tree, markers[index], span_left, container_left)? {
                Some(prefix) => Ok((Alignment::Decimal, right_aligned_width(offset, span_left, prefix))),
                None => {
                    let run = self.text_run_width(tree, markers, index, span_left, container_left)?;
                    Ok((Alignment::Right, right_aligned_width(offset, span_left, run)))
                }
            },
        }
    }

    /// Width of the text between this marker and the next one, or the end of
    /// the container
    fn text_run_width(
        &self,
        tree: &mut TextTree,
        markers: &[NodeId],
        index: usize,
        span_left: f32,
        container_left: f32,
    ) -> Result<f32> {
        let end = match markers.get(index + 1) {
            Some(&next) => self.host.offset_left(tree, next),
            None => {
                let probe = tree.create(NodeKind::Probe);
                tree.append_child(tree.root(), probe)?;
                let end = self.host.offset_left(tree, probe);
                tree.remove(probe)?;
                end
            }
        };
        Ok(end / self.scale() - container_left - span_left)
    }

    /// Width of the text between the marker and the first decimal point after it
    ///
    /// `None` when no decimal point comes before the next marker or the end of
    /// the container.
    fn decimal_prefix_width(
        &self,
        tree: &mut TextTree,
        marker: NodeId,
        span_left: f32,
        container_left: f32,
    ) -> Result<Option<f32>> {
        let DecimalScan::Found { node, byte_offset } = self.find_decimal_point(tree, marker) else {
            return Ok(None);
        };
        let text = tree.text(node).unwrap_or_default().to_string();
        let (before, after) = text.split_at(byte_offset);

        let head = tree.create(NodeKind::Text(before.to_string()));
        tree.insert_before(node, head)?;
        let probe = tree.create(NodeKind::Probe);
        tree.insert_before(node, probe)?;
        tree.set_text(node, after.to_string())?;

        let point = self.host.offset_left(tree, probe);

        tree.remove(probe)?;
        tree.remove(head)?;
        tree.set_text(node, text)?;

        Ok(Some((point / self.scale() - container_left - span_left).max(0.0)))
    }

    fn find_decimal_point(&self, tree: &TextTree, marker: NodeId) -> DecimalScan {
        let root = tree.root();
        let mut from = marker;
        loop {
            match self.scan_siblings(tree, tree.next_sibling(from)) {
                DecimalScan::Exhausted => {}
                found_or_blocked => return found_or_blocked,
            }
            // continue after the enclosing inline element
            match tree.parent(from) {
                Some(parent) if parent != root => from = parent,
                _ => return DecimalScan::Exhausted,
            }
        }
    }

    fn scan_siblings(&self, tree: &TextTree, start: Option<NodeId>) -> DecimalScan {
        let selector = self.selector();
        let mut current = start;
        while let Some(node) = current {
            match tree.kind(node) {
                Some(NodeKind::Text(text)) => {
                    if let Some(byte_offset) = text.find(DECIMAL_POINT) {
                        return DecimalScan::Found { node, byte_offset };
                    }
                }
                Some(NodeKind::Element(element)) if selector.matches(element) => return DecimalScan::Blocked,
                Some(NodeKind::Element(_)) => match self.scan_siblings(tree, tree.first_child(node)) {
                    DecimalScan::Exhausted => {}
                    found_or_blocked => return found_or_blocked,
                },
                Some(NodeKind::Overlay(_)) | Some(NodeKind::Probe) | None => {}
            }
            current = tree.next_sibling(node);
        }
        DecimalScan::Exhausted
    }

    /// Size the marker and draw its leader; returns the text fill, if any
    fn apply_leader(&self, tree: &mut TextTree, marker: NodeId, width: f32, leader: &Leader) -> Result<Option<String>> {
        match self.config.leader_mode {
            LeaderMode::Border => {
                if let Some(element) = tree.element_mut(marker) {
                    match leader.rule_style() {
                        Some(rule) if width > BORDER_LEADER_MIN_WIDTH => {
                            element.style.border_bottom = Some(rule);
                            element.style.margin_x = Some(BORDER_LEADER_MARGIN);
                            element.style.width = Some(width - 2.0 * BORDER_LEADER_MARGIN);
                        }
                        _ => element.style.width = Some(width),
                    }
                }
                Ok(None)
            }
            LeaderMode::Text => self.fill_with_text(tree, marker, width, leader).map(Some),
        }
    }

    /// Repeat the leader's fill unit until it would overflow the marker
    fn fill_with_text(&self, tree: &mut TextTree, marker: NodeId, width: f32, leader: &Leader) -> Result<String> {
        let unit = leader.fill_unit();
        if let Some(element) = tree.element_mut(marker) {
            element.style.min_width = Some(width);
            if unit.chars().count() > 1 {
                element.style.text_align = Some(TextAlign::Right);
            }
        }
        // rendered width absorbs sub-pixel rounding of the min-width
        let target = self.host.rendered_width(tree, marker);

        let fill_node = tree.create(NodeKind::Text(unit.clone()));
        tree.append_child(marker, fill_node)?;
        let mut fill = unit.clone();
        let mut count = 1;
        while self.host.rendered_width(tree, marker) <= target && count < FILL_REPETITION_LIMIT {
            fill.push_str(&unit);
            count += 1;
            tree.set_text(fill_node, fill.clone())?;
        }
        fill.truncate(fill.len() - unit.len());
        tree.set_text(fill_node, fill.clone())?;
        Ok(fill)
    }
}
