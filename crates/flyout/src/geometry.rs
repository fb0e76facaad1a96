//! Geometry resolver for anchored flyouts
//!
//! Everything here is pure: the same inputs always produce the same output.
//! Nothing in this module fails; missing or oversized inputs degrade to a
//! zero or clamped result instead.

use flyout_macros::WithBuilders;
use glam::Vec2;

use crate::placement::{HorizontalBucket, Placement, VerticalBucket};
use crate::primitives::{Dimensions, MaxSize, Point, Rect};

/// Distance kept between a flyout and the viewport edges
pub const DEFAULT_MARGIN: f32 = 8.0;

/// Gap used by [`PositionRequest::new`] when none is given
pub const DEFAULT_GAP: f32 = 8.0;

/// What a flyout is positioned against
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorTarget {
    /// A resolved anchor rectangle
    Rect(Rect),
    /// A raw pointer coordinate, treated as a zero-size anchor
    Pointer(Point),
}

impl AnchorTarget {
    pub fn rect(&self) -> Rect {
        match self {
            AnchorTarget::Rect(rect) => *rect,
            AnchorTarget::Pointer(point) => Rect::from_point(*point),
        }
    }

    pub fn center(&self) -> Point {
        self.rect().center()
    }
}

/// Input to [`resolve_position`]
#[derive(Debug, Clone, Copy, PartialEq, WithBuilders)]
pub struct PositionRequest {
    /// Measured size of the flyout
    pub flyout: Dimensions,
    #[with_builders(raw)]
    pub target: Option<AnchorTarget>,
    pub placement: Placement,
    /// Distance between the anchor and the flyout for outside placements
    pub gap: f32,
    /// Overhang past the anchor edge for edge-aligned placements
    pub padding: f32,
    pub margin: f32,
}

impl PositionRequest {
    pub fn new(flyout: Dimensions, target: Option<AnchorTarget>) -> Self {
        Self {
            flyout,
            target,
            placement: Placement::default(),
            gap: DEFAULT_GAP,
            padding: 0.0,
            margin: DEFAULT_MARGIN,
        }
    }
}

/// Resolved flyout position
///
/// `top`/`left` are the flyout's top-left corner in viewport coordinates.
/// `bottom`/`right` are the distances from the flyout's bottom/right edges to
/// the viewport's bottom/right edges.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResolvedPosition {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl ResolvedPosition {
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }
}

/// One axis worth of resolver input
#[derive(Debug, Clone, Copy)]
enum AxisBucket {
    Before,
    AlignStart,
    Center,
    AlignEnd,
    After,
}

impl From<HorizontalBucket> for AxisBucket {
    fn from(bucket: HorizontalBucket) -> Self {
        match bucket {
            HorizontalBucket::Before => AxisBucket::Before,
            HorizontalBucket::AlignStart => AxisBucket::AlignStart,
            HorizontalBucket::Center => AxisBucket::Center,
            HorizontalBucket::AlignEnd => AxisBucket::AlignEnd,
            HorizontalBucket::After => AxisBucket::After,
        }
    }
}

impl From<VerticalBucket> for AxisBucket {
    fn from(bucket: VerticalBucket) -> Self {
        match bucket {
            VerticalBucket::Above => AxisBucket::Before,
            VerticalBucket::AlignTop => AxisBucket::AlignStart,
            VerticalBucket::Middle => AxisBucket::Center,
            VerticalBucket::AlignBottom => AxisBucket::AlignEnd,
            VerticalBucket::Below => AxisBucket::After,
        }
    }
}

struct Axis {
    anchor_start: f32,
    anchor_end: f32,
    /// Length of the viewport along this axis
    extent: f32,
    /// Flyout length along this axis (already clamped)
    size: f32,
}

impl Axis {
    fn anchor_mid(&self) -> f32 {
        self.anchor_start + (self.anchor_end - self.anchor_start) / 2.0
    }

    fn anchor_in_first_half(&self) -> bool {
        self.anchor_mid() < self.extent / 2.0
    }

    fn anchor_in_second_half(&self) -> bool {
        self.anchor_mid() > self.extent / 2.0
    }

    /// Place the flyout along this axis, flipping to the mirror side when the
    /// preferred side runs past the viewport edge.
    fn place(&self, bucket: AxisBucket, gap: f32, padding: f32, margin: f32) -> f32 {
        let edge_start = margin;
        let edge_end = self.extent - margin;
        let size = self.size;

        match bucket {
            AxisBucket::Before => {
                let pos = self.anchor_start - size - gap;
                if pos >= edge_start {
                    pos
                } else if self.anchor_in_first_half() {
                    self.anchor_end + gap
                } else {
                    edge_start
                }
            }
            AxisBucket::AlignStart => {
                let pos = self.anchor_start - padding;
                if pos + size <= edge_end {
                    pos
                } else if self.anchor_in_second_half() {
                    self.anchor_end - size + padding
                } else {
                    edge_end - size
                }
            }
            AxisBucket::Center => self.anchor_mid() - size / 2.0,
            AxisBucket::AlignEnd => {
                let pos = self.anchor_end - size + padding;
                if pos >= edge_start {
                    pos
                } else if self.anchor_in_first_half() {
                    self.anchor_start - padding
                } else {
                    edge_start
                }
            }
            AxisBucket::After => {
                let pos = self.anchor_end + gap;
                if pos + size <= edge_end {
                    pos
                } else if self.anchor_in_second_half() {
                    self.anchor_start - size - gap
                } else {
                    edge_end - size
                }
            }
        }
    }

    /// Final pass: the flyout never leaves `[margin, extent - margin]`
    fn hard_clamp(&self, pos: f32, margin: f32) -> f32 {
        let mut pos = pos;
        if pos < margin {
            pos = margin;
        }
        if pos + self.size > self.extent - margin {
            pos = self.extent - margin - self.size;
        }
        pos
    }
}

/// Compute where a flyout should sit relative to its anchor or pointer
///
/// Returns all zeros when the request has no target.
pub fn resolve_position(request: &PositionRequest, viewport: Dimensions) -> ResolvedPosition {
    let Some(target) = request.target else {
        return ResolvedPosition::default();
    };

    let anchor = target.rect();
    let margin = request.margin;

    // Never propose a flyout larger than the screen
    let width = request
        .flyout
        .width
        .min(viewport.width - margin * 2.0)
        .max(0.0);
    let height = request
        .flyout
        .height
        .min(viewport.height - margin * 2.0)
        .max(0.0);

    let x_axis = Axis {
        anchor_start: anchor.left(),
        anchor_end: anchor.right(),
        extent: viewport.width,
        size: width,
    };
    let y_axis = Axis {
        anchor_start: anchor.top(),
        anchor_end: anchor.bottom(),
        extent: viewport.height,
        size: height,
    };

    let (h_bucket, v_bucket) = request.placement.buckets();
    let left = x_axis.place(h_bucket.into(), request.gap, request.padding, margin);
    let top = y_axis.place(v_bucket.into(), request.gap, request.padding, margin);

    let left = x_axis.hard_clamp(left, margin);
    let top = y_axis.hard_clamp(top, margin);

    ResolvedPosition {
        top,
        left,
        right: viewport.width - (left + width),
        bottom: viewport.height - (top + height),
    }
}

/// Keep an already placed rect inside the viewport margin
///
/// Used where there is nothing meaningful to re-anchor against: pointer-opened
/// surfaces on reposition, and surfaces released after a drag.
pub fn clamp_into_viewport(rect: Rect, viewport: Dimensions, margin: f32) -> Point {
    let mut left = rect.left();
    let mut top = rect.top();

    if left < margin {
        left = margin;
    }
    if top < margin {
        top = margin;
    }
    if left + rect.width() > viewport.width - margin {
        left = viewport.width - rect.width() - margin;
    }
    if top + rect.height() > viewport.height - margin {
        top = viewport.height - rect.height() - margin;
    }

    Point::new(left, top)
}

/// Max-size clamp that keeps a surface from covering its anchor
///
/// Compares the surface's mid-point with the anchor's on the dominant axis and
/// bounds exactly one dimension on the side the surface sits on. Returns `None`
/// when the surface does not overlap the anchor on that side.
pub fn anchor_avoidance(
    surface: Rect,
    anchor: Rect,
    viewport: Dimensions,
    margin: f32,
    gap: f32,
) -> Option<MaxSize> {
    let surface_mid = surface.center();
    let anchor_mid = anchor.center();
    let range_x = (surface_mid.x - anchor_mid.x).abs();
    let range_y = (surface_mid.y - anchor_mid.y).abs();

    if range_x > range_y {
        if surface_mid.x < anchor_mid.x && surface.right() > anchor.left() {
            Some(MaxSize::width(anchor.left() - margin - gap))
        } else if surface_mid.x > anchor_mid.x && surface.left() < anchor.right() {
            Some(MaxSize::width(viewport.width - anchor.right() - margin - gap))
        } else {
            None
        }
    } else if surface_mid.y < anchor_mid.y && surface.bottom() > anchor.top() {
        Some(MaxSize::height(anchor.top() - margin - gap))
    } else if surface_mid.y > anchor_mid.y && surface.top() < anchor.bottom() {
        Some(MaxSize::height(
            viewport.height - anchor.bottom() - margin - gap,
        ))
    } else {
        None
    }
}

/// Translation a surface slides in from (entrance) or out to (exit)
///
/// The offset points from the surface's resting mid-point back toward `origin`
/// (the anchor centre or pointer) on the dominant axis, so motion appears to
/// start at the anchor. When the dominant axis disagrees with the edge the
/// placement hangs off, the placement's edge wins.
pub fn slide_offset(surface: Rect, origin: Point, placement: Placement, distance: f32) -> Vec2 {
    let mid = surface.center();
    let range_x = (mid.x - origin.x).abs();
    let range_y = (mid.y - origin.y).abs();

    let horizontal = if range_x > range_y {
        !placement.is_top_or_bottom_edge()
    } else {
        placement.is_left_or_right_edge()
    };

    let toward = |surface_mid: f32, origin: f32| {
        if surface_mid > origin {
            -distance
        } else if surface_mid < origin {
            distance
        } else {
            0.0
        }
    };

    if horizontal {
        Vec2::new(toward(mid.x, origin.x), 0.0)
    } else {
        Vec2::new(0.0, toward(mid.y, origin.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn request(
        flyout: Dimensions,
        anchor: Rect,
        placement: Placement,
        gap: f32,
    ) -> PositionRequest {
        PositionRequest::new(flyout, Some(AnchorTarget::Rect(anchor)))
            .with_placement(placement)
            .with_gap(gap)
    }

    #[test]
    fn test_no_target_is_zero() {
        let req = PositionRequest::new(Dimensions::new(100.0, 50.0), None);
        let pos = resolve_position(&req, Dimensions::new(800.0, 600.0));
        assert_eq!(pos, ResolvedPosition::default());
    }

    #[test]
    fn test_never_escapes_viewport() {
        let viewports = [
            Dimensions::new(320.0, 480.0),
            Dimensions::new(800.0, 600.0),
            Dimensions::new(1920.0, 1080.0),
        ];
        let flyouts = [
            Dimensions::new(40.0, 20.0),
            Dimensions::new(300.0, 200.0),
            Dimensions::new(5000.0, 5000.0),
        ];

        for viewport in viewports {
            let anchors = [
                Rect::from_ltwh(0.0, 0.0, 30.0, 30.0),
                Rect::from_ltwh(viewport.width / 2.0, viewport.height / 2.0, 60.0, 20.0),
                Rect::from_ltwh(viewport.width - 20.0, viewport.height - 10.0, 20.0, 10.0),
                Rect::from_ltwh(-50.0, -50.0, viewport.width + 100.0, viewport.height + 100.0),
            ];
            for flyout in flyouts {
                for anchor in anchors {
                    for placement in Placement::ALL {
                        let req = request(flyout, anchor, placement, 8.0);
                        let pos = resolve_position(&req, viewport);
                        let width = viewport.width - pos.left - pos.right;
                        let height = viewport.height - pos.top - pos.bottom;

                        assert!(pos.left >= DEFAULT_MARGIN - EPS, "{placement} left {}", pos.left);
                        assert!(pos.top >= DEFAULT_MARGIN - EPS, "{placement} top {}", pos.top);
                        assert!(
                            pos.left + width <= viewport.width - DEFAULT_MARGIN + EPS,
                            "{placement} right edge"
                        );
                        assert!(
                            pos.top + height <= viewport.height - DEFAULT_MARGIN + EPS,
                            "{placement} bottom edge"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_pure_center_with_centered_anchor() {
        let viewport = Dimensions::new(800.0, 600.0);
        let flyout = Dimensions::new(200.0, 100.0);
        let anchor = Rect::from_ltwh(380.0, 290.0, 40.0, 20.0);

        for placement in [
            Placement::CenterTop,
            Placement::CenterCenterTop,
            Placement::CenterCenter,
            Placement::CenterCenterBottom,
            Placement::CenterBottom,
        ] {
            let pos = resolve_position(&request(flyout, anchor, placement, 8.0), viewport);
            assert!((pos.left - (viewport.width - flyout.width) / 2.0).abs() < EPS);
        }

        let pos = resolve_position(
            &request(flyout, anchor, Placement::CenterCenter, 8.0),
            viewport,
        );
        assert!((pos.top - (viewport.height - flyout.height) / 2.0).abs() < EPS);
    }

    #[test]
    fn test_center_bottom_clamps_at_right_edge() {
        let viewport = Dimensions::new(800.0, 600.0);
        let anchor = Rect::from_ltwh(700.0, 100.0, 100.0, 30.0);
        let flyout = Dimensions::new(200.0, 80.0);

        let req = request(flyout, anchor, Placement::CenterBottom, 8.0);
        let pos = resolve_position(&req, viewport);

        assert_eq!(pos.left, 800.0 - flyout.width - 8.0);
        assert_eq!(pos.top, 130.0 + 8.0);
    }

    #[test]
    fn test_before_flips_when_anchor_in_left_half() {
        let viewport = Dimensions::new(800.0, 600.0);
        let anchor = Rect::from_ltwh(20.0, 200.0, 40.0, 20.0);
        let flyout = Dimensions::new(100.0, 50.0);

        let pos = resolve_position(&request(flyout, anchor, Placement::LeftCenter, 8.0), viewport);
        assert_eq!(pos.left, anchor.right() + 8.0);
    }

    #[test]
    fn test_below_flips_above_when_anchor_in_lower_half() {
        let viewport = Dimensions::new(800.0, 600.0);
        let anchor = Rect::from_ltwh(300.0, 560.0, 40.0, 20.0);
        let flyout = Dimensions::new(100.0, 50.0);

        let req = request(flyout, anchor, Placement::CenterBottom, 8.0);
        let pos = resolve_position(&req, viewport);
        assert_eq!(pos.top, anchor.top() - flyout.height - 8.0);
    }

    #[test]
    fn test_align_start_applies_padding() {
        let viewport = Dimensions::new(800.0, 600.0);
        let anchor = Rect::from_ltwh(100.0, 100.0, 80.0, 30.0);
        let flyout = Dimensions::new(120.0, 60.0);

        let req = request(flyout, anchor, Placement::CenterBottomToRight, 8.0).with_padding(5.0);
        let pos = resolve_position(&req, viewport);
        assert_eq!(pos.left, 95.0);
    }

    #[test]
    fn test_pointer_target_is_zero_size_anchor() {
        let viewport = Dimensions::new(800.0, 600.0);
        let req = PositionRequest::new(
            Dimensions::new(100.0, 40.0),
            Some(AnchorTarget::Pointer(Point::new(400.0, 300.0))),
        )
        .with_placement(Placement::RightBottom)
        .with_gap(4.0);

        let pos = resolve_position(&req, viewport);
        assert_eq!(pos.origin(), Point::new(404.0, 304.0));
    }

    #[test]
    fn test_clamp_into_viewport() {
        let viewport = Dimensions::new(800.0, 600.0);
        let rect = Rect::from_ltwh(750.0, -20.0, 100.0, 50.0);
        assert_eq!(clamp_into_viewport(rect, viewport, 8.0), Point::new(692.0, 8.0));
    }

    #[test]
    fn test_anchor_avoidance_left_side() {
        let viewport = Dimensions::new(800.0, 600.0);
        let anchor = Rect::from_ltwh(700.0, 280.0, 60.0, 40.0);
        let surface = Rect::from_ltwh(8.0, 250.0, 784.0, 100.0);

        let max = anchor_avoidance(surface, anchor, viewport, 8.0, 8.0).unwrap();
        assert_eq!(max, MaxSize::width(684.0));
    }

    #[test]
    fn test_anchor_avoidance_none_without_overlap() {
        let viewport = Dimensions::new(800.0, 600.0);
        let anchor = Rect::from_ltwh(400.0, 100.0, 60.0, 40.0);
        let surface = Rect::from_ltwh(380.0, 148.0, 100.0, 100.0);
        assert_eq!(anchor_avoidance(surface, anchor, viewport, 8.0, 8.0), None);
    }

    #[test]
    fn test_slide_offset_originates_from_anchor() {
        let anchor = Rect::from_ltwh(100.0, 100.0, 40.0, 20.0);
        let below = Rect::from_ltwh(70.0, 128.0, 100.0, 50.0);
        let offset = slide_offset(below, anchor.center(), Placement::CenterBottom, 12.0);
        assert_eq!(offset, Vec2::new(0.0, -12.0));

        let right = Rect::from_ltwh(148.0, 90.0, 100.0, 40.0);
        let offset = slide_offset(right, anchor.center(), Placement::RightCenter, 12.0);
        assert_eq!(offset, Vec2::new(-12.0, 0.0));
    }

    #[test]
    fn test_slide_offset_prefers_placement_edge() {
        // Clamped far to the side: horizontal distance dominates, but the
        // surface still hangs below the anchor.
        let anchor = Rect::from_ltwh(760.0, 100.0, 40.0, 20.0);
        let surface = Rect::from_ltwh(392.0, 128.0, 400.0, 30.0);
        let offset = slide_offset(surface, anchor.center(), Placement::CenterBottom, 12.0);
        assert_eq!(offset, Vec2::new(0.0, -12.0));
    }
}
