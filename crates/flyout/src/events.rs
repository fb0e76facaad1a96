//! Output events emitted by the flyout engine
//!
//! These replace the custom DOM events a browser component would dispatch.
//! The context queues them; hosts drain the queue once per frame with
//! [`FlyoutContext::drain_events`](crate::FlyoutContext::drain_events).

use crate::surface::SurfaceId;

/// What happened to a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEventKind {
    /// The surface started opening (`true`) or finished closing (`false`)
    ToggleOpen(bool),
    /// The entrance animation completed
    OpenDone,
    /// The exit animation completed and the surface is hidden
    Closed,
    /// A soft close was refused and the surface pulsed its focus ring instead
    FocusPulse,
    /// The surface moved without animation (scroll, resize, content change)
    Repositioned,
}

/// An event together with the surface it concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceEvent {
    pub surface: SurfaceId,
    pub kind: SurfaceEventKind,
}

impl SurfaceEvent {
    pub fn new(surface: SurfaceId, kind: SurfaceEventKind) -> Self {
        Self { surface, kind }
    }
}
