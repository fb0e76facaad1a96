//! Host abstraction
//!
//! The engine never touches a real document. Everything it needs from the
//! outside world (viewport size, anchor rectangles, surface measurement,
//! showing/hiding, focus, scroll) goes through [`SurfaceHost`]. A browser
//! binding implements it over the DOM; [`HeadlessHost`] implements it in memory.

use std::collections::{HashMap, HashSet};
use std::fmt;

use glam::Vec2;

use crate::primitives::{Dimensions, MaxSize, Point, Rect};
use crate::surface::SurfaceId;
use crate::transition::Transition;

/// Identifies an anchor element in the host (an element id, a node key, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(String);

impl AnchorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AnchorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AnchorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the host needs to draw a surface where the engine wants it
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceLayout {
    /// Resting top-left corner in viewport coordinates
    pub position: Point,
    pub max_size: MaxSize,
    /// Current animation offset on top of `position`
    pub translation: Vec2,
}

impl SurfaceLayout {
    /// Where the surface is drawn this frame
    pub fn visual_position(&self) -> Point {
        self.position.offset(self.translation)
    }
}

/// Trait for the environment surfaces live in
///
/// Measurement must honour `max_size`: a surface clamped by anchor avoidance
/// reports its clamped size.
pub trait SurfaceHost {
    /// Size of the visible viewport
    fn viewport(&self) -> Dimensions;

    /// Measure a surface's rendered size under the given max-size clamp
    fn surface_size(&self, surface: SurfaceId, max_size: MaxSize) -> Dimensions;

    /// Live bounding rectangle of an anchor element, if it is still laid out
    fn anchor_rect(&self, anchor: &AnchorId) -> Option<Rect>;

    fn show(&mut self, surface: SurfaceId);

    fn hide(&mut self, surface: SurfaceId);

    fn focus(&mut self, surface: SurfaceId);

    fn apply_layout(&mut self, surface: SurfaceId, layout: &SurfaceLayout);

    /// Replace the text content of a surface (shared text tooltips)
    fn set_text(&mut self, surface: SurfaceId, text: &str);

    /// Current document scroll offset
    fn scroll_offset(&self) -> Point;

    fn scroll_to(&mut self, offset: Point);

    /// Called when an entrance or exit slide begins
    ///
    /// Hosts with their own animation system can run the slide themselves and
    /// report completion through
    /// [`FlyoutContext::finish_animation`](crate::FlyoutContext::finish_animation).
    fn on_animation_start(
        &mut self,
        _surface: SurfaceId,
        _from: Vec2,
        _to: Vec2,
        _transition: Transition,
    ) {
    }
}

/// In-memory host for tests and headless use
///
/// Surfaces have a natural size set with [`HeadlessHost::set_surface_size`];
/// measurement clamps it by the requested max size.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    viewport: Dimensions,
    sizes: HashMap<SurfaceId, Dimensions>,
    anchors: HashMap<AnchorId, Rect>,
    visible: HashSet<SurfaceId>,
    focused: Option<SurfaceId>,
    texts: HashMap<SurfaceId, String>,
    layouts: HashMap<SurfaceId, SurfaceLayout>,
    scroll: Point,
    animations_started: usize,
}

impl HeadlessHost {
    pub fn new(viewport: Dimensions) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    pub fn set_viewport(&mut self, viewport: Dimensions) {
        self.viewport = viewport;
    }

    pub fn set_surface_size(&mut self, surface: SurfaceId, size: Dimensions) {
        self.sizes.insert(surface, size);
    }

    pub fn set_anchor_rect(&mut self, anchor: impl Into<AnchorId>, rect: Rect) {
        self.anchors.insert(anchor.into(), rect);
    }

    /// Simulate an anchor element leaving the document
    pub fn remove_anchor(&mut self, anchor: &AnchorId) {
        self.anchors.remove(anchor);
    }

    /// Simulate the user scrolling the document
    pub fn set_scroll_offset(&mut self, offset: Point) {
        self.scroll = offset;
    }

    pub fn is_visible(&self, surface: SurfaceId) -> bool {
        self.visible.contains(&surface)
    }

    pub fn focused(&self) -> Option<SurfaceId> {
        self.focused
    }

    pub fn text(&self, surface: SurfaceId) -> Option<&str> {
        self.texts.get(&surface).map(String::as_str)
    }

    /// Last layout applied to a surface
    pub fn layout(&self, surface: SurfaceId) -> Option<&SurfaceLayout> {
        self.layouts.get(&surface)
    }

    /// Rectangle the surface currently occupies at rest
    pub fn surface_rect(&self, surface: SurfaceId) -> Option<Rect> {
        let layout = self.layouts.get(&surface)?;
        let size = self.surface_size(surface, layout.max_size);
        Some(Rect::from_min_size(
            [layout.position.x, layout.position.y],
            [size.width, size.height],
        ))
    }

    pub fn animations_started(&self) -> usize {
        self.animations_started
    }
}

impl SurfaceHost for HeadlessHost {
    fn viewport(&self) -> Dimensions {
        self.viewport
    }

    fn surface_size(&self, surface: SurfaceId, max_size: MaxSize) -> Dimensions {
        self.sizes
            .get(&surface)
            .copied()
            .unwrap_or_default()
            .clamped(max_size)
    }

    fn anchor_rect(&self, anchor: &AnchorId) -> Option<Rect> {
        self.anchors.get(anchor).copied()
    }

    fn show(&mut self, surface: SurfaceId) {
        self.visible.insert(surface);
    }

    fn hide(&mut self, surface: SurfaceId) {
        self.visible.remove(&surface);
        if self.focused == Some(surface) {
            self.focused = None;
        }
    }

    fn focus(&mut self, surface: SurfaceId) {
        self.focused = Some(surface);
    }

    fn apply_layout(&mut self, surface: SurfaceId, layout: &SurfaceLayout) {
        self.layouts.insert(surface, *layout);
    }

    fn set_text(&mut self, surface: SurfaceId, text: &str) {
        self.texts.insert(surface, text.to_string());
    }

    fn scroll_offset(&self) -> Point {
        self.scroll
    }

    fn scroll_to(&mut self, offset: Point) {
        self.scroll = offset;
    }

    fn on_animation_start(
        &mut self,
        _surface: SurfaceId,
        _from: Vec2,
        _to: Vec2,
        _transition: Transition,
    ) {
        self.animations_started += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_honours_max_size() {
        let mut host = HeadlessHost::new(Dimensions::new(800.0, 600.0));
        let id = SurfaceId::from_raw(1);
        host.set_surface_size(id, Dimensions::new(300.0, 200.0));

        assert_eq!(
            host.surface_size(id, MaxSize::NONE),
            Dimensions::new(300.0, 200.0)
        );
        assert_eq!(
            host.surface_size(id, MaxSize::width(120.0)),
            Dimensions::new(120.0, 200.0)
        );
    }

    #[test]
    fn test_hide_drops_focus() {
        let mut host = HeadlessHost::new(Dimensions::new(800.0, 600.0));
        let id = SurfaceId::from_raw(7);
        host.show(id);
        host.focus(id);
        assert_eq!(host.focused(), Some(id));

        host.hide(id);
        assert!(!host.is_visible(id));
        assert_eq!(host.focused(), None);
    }

    #[test]
    fn test_removed_anchor_has_no_rect() {
        let mut host = HeadlessHost::new(Dimensions::new(800.0, 600.0));
        host.set_anchor_rect("button", Rect::from_ltwh(10.0, 10.0, 40.0, 20.0));
        let id = AnchorId::from("button");
        assert!(host.anchor_rect(&id).is_some());

        host.remove_anchor(&id);
        assert!(host.anchor_rect(&id).is_none());
    }
}
