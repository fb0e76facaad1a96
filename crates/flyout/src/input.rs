//! Backend-agnostic pointer and keyboard events
//!
//! Hosts convert their native events (DOM `MouseEvent`/`TouchEvent`/`KeyboardEvent`,
//! winit events, ...) into these before handing them to the
//! [`FlyoutContext`](crate::FlyoutContext).

use crate::Point;

/// Which input stream produced a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
    Pen,
}

/// A pointer event (click, press, touch start)
///
/// Opening a surface stops the triggering event's propagation, so the same
/// click arriving at [`FlyoutContext::handle_click`](crate::FlyoutContext::handle_click)
/// afterwards does not immediately dismiss what it just opened.
#[derive(Debug, Clone, Default)]
pub struct PointerEvent {
    /// Client position of the event; for touches, the first touch point.
    /// `None` for synthetic events that carry no coordinates.
    pub position: Option<Point>,
    pub kind: PointerKind,
    propagation_stopped: bool,
}

impl PointerEvent {
    /// A mouse event at a client position
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Some(Point::new(x, y)),
            kind: PointerKind::Mouse,
            propagation_stopped: false,
        }
    }

    /// A touch event whose first touch is at `point`
    pub fn touch(point: Point) -> Self {
        Self {
            position: Some(point),
            kind: PointerKind::Touch,
            propagation_stopped: false,
        }
    }

    /// An event with no coordinates (keyboard activation, programmatic open)
    pub fn synthetic() -> Self {
        Self::default()
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Position, or the origin when the event has none
    pub fn position_or_origin(&self) -> Point {
        self.position.unwrap_or_default()
    }
}

/// Backend-agnostic named key representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Escape,
    Enter,
    Tab,
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
}

/// Backend-agnostic key representation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A named key (Enter, Escape, arrows, etc.)
    Named(NamedKey),
    /// A character key (letters, numbers, symbols)
    Character(String),
    /// Unknown/unhandled key
    Unknown,
}

/// Modifier keys held while a key was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Super/Meta/Windows/Command
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// A key press delivered to a focused surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    default_prevented: bool,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            default_prevented: false,
        }
    }

    pub fn named(key: NamedKey) -> Self {
        Self::new(Key::Named(key), Modifiers::NONE)
    }

    /// Plain Escape, with no modifiers held
    pub fn is_bare_escape(&self) -> bool {
        self.key == Key::Named(NamedKey::Escape) && !self.modifiers.any()
    }

    pub fn is_escape(&self) -> bool {
        self.key == Key::Named(NamedKey::Escape)
    }

    /// Tell the host not to run its default action (e.g. a native dialog cancel)
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}
