//! Per-surface state and the open/close phase machine
//!
//! A [`Surface`] only tracks state. Talking to the host, registering with the
//! class registry and emitting events is done by
//! [`FlyoutContext`](crate::FlyoutContext), which drives these transitions.

use std::fmt;
use std::time::Duration;

use flyout_macros::WithBuilders;
use glam::Vec2;

use crate::geometry::DEFAULT_GAP;
use crate::host::AnchorId;
use crate::placement::Placement;
use crate::primitives::{MaxSize, Point, Rect};
use crate::timer::DelayTimer;
use crate::transition::{SlideAnimation, Transition};

/// Handle to a surface owned by a [`FlyoutContext`](crate::FlyoutContext)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(u64);

impl SurfaceId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Surface classes; each has its own registry and document listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SurfaceClass {
    Modal,
    Popover,
    Tooltip,
}

impl SurfaceClass {
    pub const ALL: [SurfaceClass; 3] = [
        SurfaceClass::Modal,
        SurfaceClass::Popover,
        SurfaceClass::Tooltip,
    ];
}

impl fmt::Display for SurfaceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SurfaceClass::Modal => "modal",
            SurfaceClass::Popover => "popover",
            SurfaceClass::Tooltip => "tooltip",
        };
        f.write_str(name)
    }
}

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl Phase {
    /// `Opening` or `Open`
    pub fn is_open(self) -> bool {
        matches!(self, Phase::Opening | Phase::Open)
    }
}

/// Which open surfaces an outside click may dismiss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DismissScope {
    /// Only the most recently opened surface of the class
    Topmost,
    /// Every surface of the class the click lands outside of
    All,
    /// Outside clicks never dismiss
    None,
}

/// What a surface is positioned against
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorRef {
    /// An element whose rectangle is queried from the host at layout time
    Element(AnchorId),
    /// A rectangle snapshot
    Rect(Rect),
    /// A raw pointer coordinate
    Pointer(Point),
}

impl AnchorRef {
    /// Whether this anchor has an extent worth avoiding
    pub fn is_rect_like(&self) -> bool {
        matches!(self, AnchorRef::Element(_) | AnchorRef::Rect(_))
    }
}

impl From<AnchorId> for AnchorRef {
    fn from(id: AnchorId) -> Self {
        AnchorRef::Element(id)
    }
}

impl From<Rect> for AnchorRef {
    fn from(rect: Rect) -> Self {
        AnchorRef::Rect(rect)
    }
}

impl From<Point> for AnchorRef {
    fn from(point: Point) -> Self {
        AnchorRef::Pointer(point)
    }
}

/// Per-open options
///
/// Unset positioning fields fall back to the geometry defaults (gap 8,
/// padding 0, [`Placement::CenterBottom`]).
#[derive(Debug, Clone, PartialEq, WithBuilders)]
pub struct OpenOptions {
    pub anchor: Option<AnchorRef>,
    pub gap: Option<f32>,
    pub padding: Option<f32>,
    pub placement: Option<Placement>,
    /// When false, the surface is size-clamped so it never covers its anchor
    pub allow_hide_anchor: bool,
    pub dragable: bool,
    /// Soft closes pulse focus instead of closing
    pub important: bool,
    /// Exempt from outside-click dismissal
    pub manual_dismiss: bool,
    /// Leave focus where it is (an input inside the surface grabs it)
    pub input_auto_focus: bool,
    /// Pointer fallback overriding the trigger event's position
    pub pointer: Option<Point>,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            anchor: None,
            gap: None,
            padding: None,
            placement: None,
            allow_hide_anchor: true,
            dragable: false,
            important: false,
            manual_dismiss: false,
            input_auto_focus: false,
            pointer: None,
        }
    }
}

/// Class-level behaviour shared by every surface of a variant
#[derive(Debug, Clone, Copy, WithBuilders)]
pub struct SurfacePolicy {
    pub class: SurfaceClass,
    pub dismiss: DismissScope,
    /// Lock the document scroll position while open
    pub scroll_lock: bool,
    pub close_on_escape: bool,
    pub open_transition: Transition,
    pub close_transition: Transition,
}

impl SurfacePolicy {
    pub fn modal() -> Self {
        Self {
            class: SurfaceClass::Modal,
            dismiss: DismissScope::Topmost,
            scroll_lock: true,
            close_on_escape: true,
            open_transition: Transition::surface(),
            close_transition: Transition::surface(),
        }
    }

    pub fn popover() -> Self {
        Self {
            class: SurfaceClass::Popover,
            dismiss: DismissScope::All,
            scroll_lock: false,
            close_on_escape: false,
            open_transition: Transition::surface(),
            close_transition: Transition::surface(),
        }
    }

    pub fn tooltip() -> Self {
        Self {
            class: SurfaceClass::Tooltip,
            dismiss: DismissScope::None,
            scroll_lock: false,
            close_on_escape: false,
            open_transition: Transition::surface(),
            close_transition: Transition::surface(),
        }
    }

    /// Default policy for a class
    pub fn for_class(class: SurfaceClass) -> Self {
        match class {
            SurfaceClass::Modal => Self::modal(),
            SurfaceClass::Popover => Self::popover(),
            SurfaceClass::Tooltip => Self::tooltip(),
        }
    }

    /// Use the same transition for entrance and exit
    pub fn with_transition(self, transition: Transition) -> Self {
        self.with_open_transition(transition)
            .with_close_transition(transition)
    }
}

/// Mutable per-surface record, reset when the exit animation completes
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceState {
    pub phase: Phase,
    /// Resting top-left corner
    pub position: Point,
    pub max_size: MaxSize,
    pub allow_hide_anchor: bool,
    pub placement: Placement,
    pub gap: f32,
    pub padding: f32,
    pub dragable: bool,
    pub is_dragging: bool,
    /// Pointer minus position, captured when a drag begins
    pub drag_offset: Vec2,
    pub important: bool,
    pub manual_dismiss: bool,
    pub input_auto_focus: bool,
    /// Focus pulse active
    pub focused: bool,
    pub anchor: Option<AnchorRef>,
    /// Pointer fallback from the triggering event
    pub pointer: Point,
    /// Current animation offset
    pub translation: Vec2,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            phase: Phase::Closed,
            position: Point::zero(),
            max_size: MaxSize::NONE,
            allow_hide_anchor: true,
            placement: Placement::default(),
            gap: DEFAULT_GAP,
            padding: 0.0,
            dragable: false,
            is_dragging: false,
            drag_offset: Vec2::ZERO,
            important: false,
            manual_dismiss: false,
            input_auto_focus: false,
            focused: false,
            anchor: None,
            pointer: Point::zero(),
            translation: Vec2::ZERO,
        }
    }
}

impl SurfaceState {
    /// Whether the surface was opened from a pointer rather than an anchor
    /// with extent. Such surfaces only get an edge clamp on reposition.
    pub fn is_pointer_opened(&self) -> bool {
        !self.anchor.as_ref().is_some_and(AnchorRef::is_rect_like)
    }
}

/// Animation that just ran to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completed {
    Entrance,
    Exit,
}

/// One surface: policy, state and the running slide
#[derive(Debug, Clone)]
pub struct Surface {
    id: SurfaceId,
    policy: SurfacePolicy,
    state: SurfaceState,
    animation: Option<SlideAnimation>,
    focus_pulse: DelayTimer,
}

impl Surface {
    pub fn new(id: SurfaceId, policy: SurfacePolicy) -> Self {
        Self {
            id,
            policy,
            state: SurfaceState::default(),
            animation: None,
            focus_pulse: DelayTimer::new(),
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn policy(&self) -> &SurfacePolicy {
        &self.policy
    }

    pub fn state(&self) -> &SurfaceState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut SurfaceState {
        &mut self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// `Closed`/`Closing` → `Opening`
    ///
    /// Returns false (and changes nothing) when already opening or open. A
    /// running exit animation is dropped.
    pub(crate) fn begin_open(&mut self, options: &OpenOptions, pointer: Point) -> bool {
        if self.state.phase.is_open() {
            return false;
        }
        if self.state.phase == Phase::Closing {
            log::debug!("surface {} reopened before its exit finished", self.id);
            self.animation = None;
        }

        let state = &mut self.state;
        state.phase = Phase::Opening;
        state.anchor = options.anchor.clone();
        state.pointer = pointer;
        state.placement = options.placement.unwrap_or_default();
        state.gap = options.gap.unwrap_or(DEFAULT_GAP);
        state.padding = options.padding.unwrap_or(0.0);
        state.allow_hide_anchor = options.allow_hide_anchor;
        state.dragable = options.dragable;
        state.important = options.important;
        state.manual_dismiss = options.manual_dismiss;
        state.input_auto_focus = options.input_auto_focus;
        state.max_size = MaxSize::NONE;
        state.is_dragging = false;
        true
    }

    pub(crate) fn start_entrance(&mut self, offset: Vec2) -> &SlideAnimation {
        self.state.translation = offset;
        self.animation
            .insert(SlideAnimation::new(offset, Vec2::ZERO, self.policy.open_transition))
    }

    /// `Opening`/`Open` → `Closing`
    ///
    /// Returns false when already closing or closed. A running entrance is
    /// dropped; the exit starts from the current translation.
    pub(crate) fn begin_close(&mut self) -> bool {
        if !self.state.phase.is_open() {
            return false;
        }
        if self.state.phase == Phase::Opening {
            log::debug!("surface {} closed before its entrance finished", self.id);
            self.animation = None;
        }
        self.state.phase = Phase::Closing;
        self.state.is_dragging = false;
        true
    }

    pub(crate) fn start_exit(&mut self, offset: Vec2) -> &SlideAnimation {
        let from = self.state.translation;
        self.animation
            .insert(SlideAnimation::new(from, offset, self.policy.close_transition))
    }

    /// Advance the running slide and the focus pulse
    pub(crate) fn advance(&mut self, dt: Duration) -> Option<Completed> {
        if self.focus_pulse.advance(dt) {
            log::trace!("surface {} focus pulse ended", self.id);
            self.state.focused = false;
        }

        let animation = self.animation.as_mut()?;
        let finished = animation.advance(dt);
        self.state.translation = animation.value();
        if finished {
            self.complete()
        } else {
            None
        }
    }

    /// Jump the running slide to its end
    pub(crate) fn finish_animation(&mut self) -> Option<Completed> {
        let animation = self.animation.as_mut()?;
        animation.finish();
        self.state.translation = animation.value();
        self.complete()
    }

    fn complete(&mut self) -> Option<Completed> {
        self.animation = None;
        match self.state.phase {
            Phase::Opening => {
                self.state.phase = Phase::Open;
                self.state.translation = Vec2::ZERO;
                Some(Completed::Entrance)
            }
            Phase::Closing => {
                self.focus_pulse.cancel();
                self.state = SurfaceState::default();
                Some(Completed::Exit)
            }
            Phase::Open | Phase::Closed => None,
        }
    }

    /// Start (or restart) the focus pulse
    pub(crate) fn pulse_focus(&mut self, duration: Duration) {
        self.state.focused = true;
        self.focus_pulse.start(duration);
    }
}
