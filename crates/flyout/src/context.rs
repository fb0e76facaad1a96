//! Flyout context: owns every surface and drives their lifecycle
//!
//! The `FlyoutContext` is the central coordinator. It holds:
//! - the host (viewport, measurement, anchor lookup, show/hide)
//! - every surface and its state machine
//! - one registry per surface class (stacking order)
//! - the document-level listener bookkeeping (click, scroll, resize)
//! - debounce timers and the output event queue
//!
//! Hosts forward document events to the `handle_*` methods and call
//! [`FlyoutContext::advance`] once per frame.
//!
//! # Example
//!
//! ```ignore
//! let mut ctx = FlyoutContext::new(HeadlessHost::new(Dimensions::new(800.0, 600.0)));
//! let menu = ctx.create_surface(ctx.policy(SurfaceClass::Popover));
//!
//! let mut click = PointerEvent::at(120.0, 40.0);
//! let options = OpenOptions::default().with_anchor(AnchorId::from("menu-button").into());
//! ctx.open(menu, &mut click, options)?;
//! ctx.handle_click(&click); // the trigger does not dismiss what it opened
//!
//! // Each frame:
//! ctx.advance(dt);
//! for event in ctx.drain_events() { /* ... */ }
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use glam::Vec2;
use log::{debug, trace, warn};

use crate::config::FlyoutConfig;
use crate::error::{FlyoutError, Result};
use crate::events::{SurfaceEvent, SurfaceEventKind};
use crate::geometry::{
    anchor_avoidance, clamp_into_viewport, resolve_position, slide_offset, AnchorTarget,
    PositionRequest,
};
use crate::host::{SurfaceHost, SurfaceLayout};
use crate::input::{KeyEvent, PointerEvent};
use crate::primitives::{Dimensions, Point, Rect};
use crate::registry::SurfaceRegistry;
use crate::surface::{
    AnchorRef, Completed, DismissScope, OpenOptions, Phase, Surface, SurfaceClass, SurfaceId,
    SurfacePolicy, SurfaceState,
};
use crate::timer::DelayTimer;

const CLASS_COUNT: usize = SurfaceClass::ALL.len();

fn class_index(class: SurfaceClass) -> usize {
    match class {
        SurfaceClass::Modal => 0,
        SurfaceClass::Popover => 1,
        SurfaceClass::Tooltip => 2,
    }
}

fn rect_at(position: Point, size: Dimensions) -> Rect {
    Rect::from_ltwh(position.x, position.y, size.width, size.height)
}

fn layout_of(state: &SurfaceState) -> SurfaceLayout {
    SurfaceLayout {
        position: state.position,
        max_size: state.max_size,
        translation: state.translation,
    }
}

/// Result of laying a surface out against its anchor
struct Placed {
    rect: Rect,
    target: AnchorTarget,
}

/// The main flyout context
pub struct FlyoutContext<H: SurfaceHost> {
    host: H,
    config: FlyoutConfig,

    surfaces: BTreeMap<SurfaceId, Surface>,
    next_id: u64,

    /// Open surfaces per class, in stacking order
    registries: [SurfaceRegistry; CLASS_COUNT],

    /// Document listeners installed per class
    listeners: [bool; CLASS_COUNT],

    /// Debounced reposition sweep per class (resize, popover scroll)
    reposition_debounce: [DelayTimer; CLASS_COUNT],

    /// Scroll offset restored while a scroll-locking surface is open
    saved_scroll: Point,

    /// Context-wide, last writer wins
    no_pointer_events: bool,

    dragging: Option<SurfaceId>,

    events: Vec<SurfaceEvent>,
}

impl<H: SurfaceHost> FlyoutContext<H> {
    /// Create a context with the default configuration
    pub fn new(host: H) -> Self {
        Self::with_config(host, FlyoutConfig::default())
    }

    pub fn with_config(host: H, config: FlyoutConfig) -> Self {
        Self {
            host,
            config,
            surfaces: BTreeMap::new(),
            next_id: 1,
            registries: Default::default(),
            listeners: [false; CLASS_COUNT],
            reposition_debounce: Default::default(),
            saved_scroll: Point::zero(),
            no_pointer_events: false,
            dragging: None,
            events: Vec::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &FlyoutConfig {
        &self.config
    }

    /// Default policy for a class, using the configured animation length
    pub fn policy(&self, class: SurfaceClass) -> SurfacePolicy {
        SurfacePolicy::for_class(class).with_transition(self.config.transition())
    }

    // ========== Surfaces ==========

    /// Create a closed surface. Installs the class's document listeners on
    /// first use.
    pub fn create_surface(&mut self, policy: SurfacePolicy) -> SurfaceId {
        let id = SurfaceId::from_raw(self.next_id);
        self.next_id += 1;
        self.surfaces.insert(id, Surface::new(id, policy));
        self.install_listeners(policy.class);
        id
    }

    pub fn surface(&self, handle: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(&handle)
    }

    pub fn state(&self, handle: SurfaceId) -> Option<&SurfaceState> {
        self.surfaces.get(&handle).map(Surface::state)
    }

    pub fn phase(&self, handle: SurfaceId) -> Option<Phase> {
        self.surfaces.get(&handle).map(Surface::phase)
    }

    /// `Opening` or `Open`
    pub fn is_open(&self, handle: SurfaceId) -> bool {
        self.phase(handle).is_some_and(Phase::is_open)
    }

    pub fn registry(&self, class: SurfaceClass) -> &SurfaceRegistry {
        &self.registries[class_index(class)]
    }

    /// Resting rectangle of a surface, measured by the host
    pub fn surface_rect(&self, handle: SurfaceId) -> Option<Rect> {
        let state = self.state(handle)?;
        Some(rect_at(
            state.position,
            self.host.surface_size(handle, state.max_size),
        ))
    }

    fn surface_mut(&mut self, handle: SurfaceId) -> Result<&mut Surface> {
        self.surfaces
            .get_mut(&handle)
            .ok_or(FlyoutError::UnknownSurface(handle))
    }

    // ========== Lifecycle ==========

    /// Open a surface
    ///
    /// Stops the trigger's propagation so it cannot dismiss what it opens.
    /// Returns `Ok(false)` when the surface is already opening or open.
    pub fn open(
        &mut self,
        handle: SurfaceId,
        trigger: &mut PointerEvent,
        options: OpenOptions,
    ) -> Result<bool> {
        let was_scroll_locked = self.is_scroll_locked();
        let Self {
            host,
            config,
            surfaces,
            registries,
            saved_scroll,
            events,
            ..
        } = self;

        let surface = surfaces
            .get_mut(&handle)
            .ok_or(FlyoutError::UnknownSurface(handle))?;

        trigger.stop_propagation();
        let pointer = options
            .pointer
            .or(trigger.position)
            .unwrap_or_default();

        if !surface.begin_open(&options, pointer) {
            trace!("surface {handle} already open");
            return Ok(false);
        }

        let policy = *surface.policy();
        if policy.scroll_lock && !was_scroll_locked {
            *saved_scroll = host.scroll_offset();
        }
        registries[class_index(policy.class)].register(handle);

        host.show(handle);
        if !options.input_auto_focus {
            host.focus(handle);
        }

        let placed = Self::place(&*host, config, surface);
        let state = surface.state();
        let offset = slide_offset(
            placed.rect,
            placed.target.center(),
            state.placement,
            config.slide_distance,
        );
        let animation = surface.start_entrance(offset);
        host.on_animation_start(
            handle,
            animation.from(),
            animation.to(),
            animation.transition(),
        );
        host.apply_layout(handle, &layout_of(surface.state()));

        events.push(SurfaceEvent::new(handle, SurfaceEventKind::ToggleOpen(true)));
        debug!("opening {} surface {handle}", policy.class);
        Ok(true)
    }

    /// Close a surface
    ///
    /// A soft close of an important open surface pulses its focus instead.
    /// Returns whether an exit animation was started.
    pub fn close(&mut self, handle: SurfaceId, soft: bool) -> Result<bool> {
        let Self {
            host,
            config,
            surfaces,
            registries,
            no_pointer_events,
            dragging,
            events,
            ..
        } = self;

        let surface = surfaces
            .get_mut(&handle)
            .ok_or(FlyoutError::UnknownSurface(handle))?;

        let state = surface.state();
        if soft && state.important && state.phase.is_open() {
            surface.pulse_focus(config.focus_pulse());
            host.focus(handle);
            events.push(SurfaceEvent::new(handle, SurfaceEventKind::FocusPulse));
            debug!("surface {handle} is important, pulsing focus instead of closing");
            return Ok(false);
        }

        if !surface.begin_close() {
            return Ok(false);
        }

        if *dragging == Some(handle) {
            *dragging = None;
            *no_pointer_events = false;
        }

        let class = surface.policy().class;
        registries[class_index(class)].unregister(handle);

        let state = surface.state();
        let target = Self::resolve_target(&*host, handle, state);
        let rect = rect_at(state.position, host.surface_size(handle, state.max_size));
        let offset = slide_offset(rect, target.center(), state.placement, config.slide_distance);

        let animation = surface.start_exit(offset);
        host.on_animation_start(
            handle,
            animation.from(),
            animation.to(),
            animation.transition(),
        );

        debug!("closing {class} surface {handle}");
        Ok(true)
    }

    /// Re-run placement without animation
    ///
    /// Skipped for surfaces that are not open or are being dragged.
    pub fn reposition(&mut self, handle: SurfaceId) -> Result<bool> {
        let Self {
            host,
            config,
            surfaces,
            events,
            ..
        } = self;

        let surface = surfaces
            .get_mut(&handle)
            .ok_or(FlyoutError::UnknownSurface(handle))?;

        let state = surface.state();
        if !state.phase.is_open() {
            return Ok(false);
        }
        if state.is_dragging {
            trace!("surface {handle} is being dragged, skipping reposition");
            return Ok(false);
        }

        if state.is_pointer_opened() {
            let size = host.surface_size(handle, state.max_size);
            let position = clamp_into_viewport(
                rect_at(state.position, size),
                host.viewport(),
                config.edge_margin,
            );
            surface.state_mut().position = position;
        } else {
            Self::place(&*host, config, surface);
        }

        host.apply_layout(handle, &layout_of(surface.state()));
        events.push(SurfaceEvent::new(handle, SurfaceEventKind::Repositioned));
        trace!("repositioned surface {handle}");
        Ok(true)
    }

    /// The surface's content changed size; reposition immediately
    pub fn content_changed(&mut self, handle: SurfaceId) -> Result<bool> {
        self.reposition(handle)
    }

    /// Pulse the focus ring of an open surface
    pub fn focus(&mut self, handle: SurfaceId) -> Result<bool> {
        let pulse = self.config.focus_pulse();
        let surface = self.surface_mut(handle)?;
        if !surface.phase().is_open() {
            return Ok(false);
        }
        surface.pulse_focus(pulse);
        self.host.focus(handle);
        self.events
            .push(SurfaceEvent::new(handle, SurfaceEventKind::FocusPulse));
        Ok(true)
    }

    /// Jump a running entrance or exit to its end
    ///
    /// For hosts that run the slide themselves.
    pub fn finish_animation(&mut self, handle: SurfaceId) -> Result<()> {
        let surface = self
            .surfaces
            .get_mut(&handle)
            .ok_or(FlyoutError::UnknownSurface(handle))?;
        if let Some(completed) = surface.finish_animation() {
            Self::complete(&mut self.host, &mut self.events, surface, completed);
        }
        Ok(())
    }

    fn complete(
        host: &mut H,
        events: &mut Vec<SurfaceEvent>,
        surface: &Surface,
        completed: Completed,
    ) {
        let handle = surface.id();
        match completed {
            Completed::Entrance => {
                host.apply_layout(handle, &layout_of(surface.state()));
                events.push(SurfaceEvent::new(handle, SurfaceEventKind::OpenDone));
                debug!("surface {handle} open");
            }
            Completed::Exit => {
                host.hide(handle);
                events.push(SurfaceEvent::new(handle, SurfaceEventKind::ToggleOpen(false)));
                events.push(SurfaceEvent::new(handle, SurfaceEventKind::Closed));
                debug!("surface {handle} closed");
            }
        }
    }

    // ========== Placement ==========

    /// Geometry target for a surface; a missing live rect degrades to the pointer
    fn resolve_target(host: &H, handle: SurfaceId, state: &SurfaceState) -> AnchorTarget {
        match &state.anchor {
            Some(AnchorRef::Element(anchor)) => match host.anchor_rect(anchor) {
                Some(rect) => AnchorTarget::Rect(rect),
                None => {
                    warn!(
                        "anchor `{anchor}` of surface {handle} has no rectangle, using the pointer"
                    );
                    AnchorTarget::Pointer(state.pointer)
                }
            },
            Some(AnchorRef::Rect(rect)) => AnchorTarget::Rect(*rect),
            Some(AnchorRef::Pointer(point)) => AnchorTarget::Pointer(*point),
            None => AnchorTarget::Pointer(state.pointer),
        }
    }

    /// Resolve position (and the anchor-avoidance clamp) for a surface
    fn place(host: &H, config: &FlyoutConfig, surface: &mut Surface) -> Placed {
        let handle = surface.id();
        let viewport = host.viewport();
        let margin = config.edge_margin;
        let target = Self::resolve_target(host, handle, surface.state());

        let state = surface.state_mut();
        let mut size = host.surface_size(handle, state.max_size);
        let request = PositionRequest::new(size, Some(target))
            .with_placement(state.placement)
            .with_gap(state.gap)
            .with_padding(state.padding)
            .with_margin(margin);
        state.position = resolve_position(&request, viewport).origin();

        if !state.allow_hide_anchor {
            if let AnchorTarget::Rect(anchor) = target {
                let current = rect_at(state.position, size);
                let avoided = anchor_avoidance(current, anchor, viewport, margin, state.gap);
                if let Some(max_size) = avoided {
                    trace!("surface {handle} clamped to {max_size:?} to keep its anchor visible");
                    state.max_size = max_size;
                    size = host.surface_size(handle, max_size);
                    state.position =
                        resolve_position(&request.with_flyout(size), viewport).origin();
                }
            }
        }

        Placed {
            rect: rect_at(state.position, size),
            target,
        }
    }

    // ========== Dragging ==========

    /// Start dragging a `dragable` open surface
    pub fn begin_drag(&mut self, handle: SurfaceId, pointer: Point) -> Result<bool> {
        let previous = self.dragging;
        let surface = self.surface_mut(handle)?;
        let state = surface.state_mut();
        if !state.dragable || !state.phase.is_open() {
            return Ok(false);
        }

        state.drag_offset = Vec2::from(pointer) - Vec2::from(state.position);
        state.is_dragging = true;

        if let Some(previous) = previous.filter(|p| *p != handle) {
            if let Some(other) = self.surfaces.get_mut(&previous) {
                other.state_mut().is_dragging = false;
            }
        }
        self.dragging = Some(handle);
        self.no_pointer_events = true;
        trace!("drag started on surface {handle}");
        Ok(true)
    }

    /// Move the dragged surface so the grab point stays under the pointer
    pub fn drag_to(&mut self, pointer: Point) -> bool {
        let Some(handle) = self.dragging else {
            return false;
        };
        let Some(surface) = self.surfaces.get_mut(&handle) else {
            return false;
        };
        let state = surface.state_mut();
        state.position = Point::from(Vec2::from(pointer) - state.drag_offset);
        self.host.apply_layout(handle, &layout_of(state));
        true
    }

    /// Release the dragged surface and clamp it back inside the viewport
    pub fn end_drag(&mut self) -> bool {
        self.no_pointer_events = false;
        let Some(handle) = self.dragging.take() else {
            return false;
        };
        let Some(surface) = self.surfaces.get_mut(&handle) else {
            return false;
        };

        let size = self.host.surface_size(handle, surface.state().max_size);
        let state = surface.state_mut();
        state.is_dragging = false;
        state.position = clamp_into_viewport(
            rect_at(state.position, size),
            self.host.viewport(),
            self.config.edge_margin,
        );
        self.host.apply_layout(handle, &layout_of(state));
        self.events
            .push(SurfaceEvent::new(handle, SurfaceEventKind::Repositioned));
        trace!("drag ended on surface {handle}");
        true
    }

    pub fn dragging(&self) -> Option<SurfaceId> {
        self.dragging
    }

    // ========== Document events ==========

    fn install_listeners(&mut self, class: SurfaceClass) {
        let installed = &mut self.listeners[class_index(class)];
        if !*installed {
            *installed = true;
            debug!("installing {class} document listeners");
        }
    }

    pub fn listeners_installed(&self, class: SurfaceClass) -> bool {
        self.listeners[class_index(class)]
    }

    /// Remove every document listener and cancel pending sweeps
    ///
    /// Listeners come back the next time a surface is created.
    pub fn teardown(&mut self) {
        for class in SurfaceClass::ALL {
            let index = class_index(class);
            if self.listeners[index] {
                debug!("removing {class} document listeners");
            }
            self.listeners[index] = false;
            self.reposition_debounce[index].cancel();
        }
    }

    /// Suppress outside-click handling (e.g. while something is dragged)
    pub fn set_no_pointer_events(&mut self, value: bool) {
        self.no_pointer_events = value;
    }

    pub fn no_pointer_events(&self) -> bool {
        self.no_pointer_events
    }

    /// A click reached the document
    ///
    /// Closes (softly) every surface the click dismisses and returns the ones
    /// that started closing.
    pub fn handle_click(&mut self, event: &PointerEvent) -> Vec<SurfaceId> {
        if self.no_pointer_events {
            trace!("click ignored while pointer events are suppressed");
            return Vec::new();
        }
        if event.is_propagation_stopped() {
            return Vec::new();
        }
        let Some(point) = event.position else {
            return Vec::new();
        };

        let mut closed = Vec::new();
        for class in SurfaceClass::ALL {
            let index = class_index(class);
            if !self.listeners[index] {
                continue;
            }

            let registry = &mut self.registries[index];
            let suppressed = registry.take_removed();
            let topmost = registry.topmost();

            let mut dismissed = Vec::new();
            for handle in registry.handles() {
                let Some(surface) = self.surfaces.get(&handle) else {
                    warn!("{class} registry holds unknown surface {handle}");
                    continue;
                };
                let eligible = match surface.policy().dismiss {
                    DismissScope::Topmost => !suppressed && topmost == Some(handle),
                    DismissScope::All => true,
                    DismissScope::None => false,
                };
                if !eligible || surface.state().manual_dismiss {
                    continue;
                }
                if self.surface_rect(handle).is_some_and(|r| r.contains(point)) {
                    continue;
                }
                dismissed.push((handle, surface.policy().dismiss));
            }

            for (handle, scope) in dismissed {
                if let Ok(true) = self.close(handle, true) {
                    closed.push(handle);
                    // This click already did its dismissal
                    if scope == DismissScope::Topmost {
                        self.registries[index].clear_removed();
                    }
                }
            }
        }
        closed
    }

    /// The document scrolled
    pub fn handle_scroll(&mut self) {
        if self.is_scroll_locked() {
            trace!("scroll locked, restoring {:?}", self.saved_scroll);
            self.host.scroll_to(self.saved_scroll);
        } else {
            self.saved_scroll = self.host.scroll_offset();
        }

        let popovers = class_index(SurfaceClass::Popover);
        if self.listeners[popovers] && !self.registries[popovers].is_empty() {
            self.reposition_debounce[popovers].start(self.config.resize_debounce());
        }
    }

    /// The viewport resized; restarts the debounced reposition sweep
    pub fn handle_resize(&mut self) {
        let debounce = self.config.resize_debounce();
        for class in SurfaceClass::ALL {
            let index = class_index(class);
            if self.listeners[index] {
                self.reposition_debounce[index].start(debounce);
            }
        }
    }

    /// A key was pressed while `handle` had focus
    ///
    /// Escape closes surfaces whose policy allows it. Important surfaces pulse
    /// instead, and only on a bare Escape. Returns whether the key was handled.
    pub fn handle_key(&mut self, handle: SurfaceId, event: &mut KeyEvent) -> Result<bool> {
        let surface = self
            .surfaces
            .get(&handle)
            .ok_or(FlyoutError::UnknownSurface(handle))?;
        if !surface.policy().close_on_escape || !event.is_escape() || !surface.phase().is_open() {
            return Ok(false);
        }

        event.prevent_default();
        if surface.state().important {
            if event.is_bare_escape() {
                self.focus(handle)?;
            }
        } else {
            self.close(handle, true)?;
        }
        Ok(true)
    }

    /// Whether a scroll-locking surface is registered
    pub fn is_scroll_locked(&self) -> bool {
        self.registries.iter().flat_map(|r| r.iter()).any(|entry| {
            self.surfaces
                .get(&entry.handle)
                .is_some_and(|s| s.policy().scroll_lock)
        })
    }

    // ========== Frame ==========

    /// Advance animations, focus pulses and debounce timers
    pub fn advance(&mut self, dt: Duration) {
        for surface in self.surfaces.values_mut() {
            let was_animating = surface.is_animating();
            match surface.advance(dt) {
                Some(completed) => {
                    Self::complete(&mut self.host, &mut self.events, surface, completed)
                }
                None if was_animating => {
                    self.host
                        .apply_layout(surface.id(), &layout_of(surface.state()));
                }
                None => {}
            }
        }

        for class in SurfaceClass::ALL {
            let index = class_index(class);
            if !self.reposition_debounce[index].advance(dt) {
                continue;
            }
            trace!("{class} reposition sweep");
            for handle in self.registries[index].handles() {
                if let Err(err) = self.reposition(handle) {
                    warn!("{err}");
                }
            }
        }
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{AnchorId, HeadlessHost};
    use crate::placement::Placement;
    use crate::primitives::MaxSize;

    const FRAME: Duration = Duration::from_millis(16);

    fn ctx() -> FlyoutContext<HeadlessHost> {
        FlyoutContext::new(HeadlessHost::new(Dimensions::new(800.0, 600.0)))
    }

    fn popover(ctx: &mut FlyoutContext<HeadlessHost>, size: Dimensions) -> SurfaceId {
        let id = ctx.create_surface(ctx.policy(SurfaceClass::Popover));
        ctx.host_mut().set_surface_size(id, size);
        id
    }

    fn settle(ctx: &mut FlyoutContext<HeadlessHost>) {
        for _ in 0..30 {
            ctx.advance(FRAME);
        }
    }

    #[test]
    fn test_listeners_installed_lazily() {
        let mut ctx = ctx();
        assert!(!ctx.listeners_installed(SurfaceClass::Popover));
        popover(&mut ctx, Dimensions::new(100.0, 50.0));
        assert!(ctx.listeners_installed(SurfaceClass::Popover));
        assert!(!ctx.listeners_installed(SurfaceClass::Modal));

        ctx.teardown();
        assert!(!ctx.listeners_installed(SurfaceClass::Popover));
    }

    #[test]
    fn test_open_shows_focuses_and_registers() {
        let mut ctx = ctx();
        let id = popover(&mut ctx, Dimensions::new(100.0, 50.0));

        let mut click = PointerEvent::at(200.0, 200.0);
        assert!(ctx.open(id, &mut click, OpenOptions::default()).unwrap());

        assert!(click.is_propagation_stopped());
        assert!(ctx.host().is_visible(id));
        assert_eq!(ctx.host().focused(), Some(id));
        assert!(ctx.registry(SurfaceClass::Popover).contains(id));
        assert_eq!(ctx.phase(id), Some(Phase::Opening));

        settle(&mut ctx);
        assert_eq!(ctx.phase(id), Some(Phase::Open));
        let kinds: Vec<_> = ctx.drain_events().into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![SurfaceEventKind::ToggleOpen(true), SurfaceEventKind::OpenDone]
        );
    }

    #[test]
    fn test_input_auto_focus_leaves_focus_alone() {
        let mut ctx = ctx();
        let id = popover(&mut ctx, Dimensions::new(100.0, 50.0));
        ctx.open(
            id,
            &mut PointerEvent::at(10.0, 10.0),
            OpenOptions::default().with_input_auto_focus(true),
        )
        .unwrap();
        assert_eq!(ctx.host().focused(), None);
    }

    #[test]
    fn test_unknown_surface() {
        let mut ctx = ctx();
        let bogus = SurfaceId::from_raw(99);
        let err = ctx.close(bogus, false).unwrap_err();
        assert!(matches!(err, FlyoutError::UnknownSurface(id) if id == bogus));
    }

    #[test]
    fn test_close_hides_after_exit() {
        let mut ctx = ctx();
        let id = popover(&mut ctx, Dimensions::new(100.0, 50.0));
        ctx.open(id, &mut PointerEvent::at(10.0, 10.0), OpenOptions::default())
            .unwrap();
        settle(&mut ctx);
        ctx.drain_events();

        assert!(ctx.close(id, false).unwrap());
        assert!(!ctx.registry(SurfaceClass::Popover).contains(id));
        // Still visible while the exit plays
        assert!(ctx.host().is_visible(id));
        assert!(!ctx.close(id, false).unwrap());

        settle(&mut ctx);
        assert!(!ctx.host().is_visible(id));
        assert_eq!(ctx.phase(id), Some(Phase::Closed));
        let kinds: Vec<_> = ctx.drain_events().into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![SurfaceEventKind::ToggleOpen(false), SurfaceEventKind::Closed]
        );
    }

    #[test]
    fn test_soft_close_of_important_pulses() {
        let mut ctx = ctx();
        let id = popover(&mut ctx, Dimensions::new(100.0, 50.0));
        ctx.open(
            id,
            &mut PointerEvent::at(10.0, 10.0),
            OpenOptions::default().with_important(true),
        )
        .unwrap();

        assert!(!ctx.close(id, true).unwrap());
        assert!(ctx.is_open(id));
        assert!(ctx.state(id).unwrap().focused);

        ctx.advance(Duration::from_millis(1000));
        assert!(!ctx.state(id).unwrap().focused);

        // A hard close always goes through
        assert!(ctx.close(id, false).unwrap());
    }

    #[test]
    fn test_finish_animation() {
        let mut ctx = ctx();
        let id = popover(&mut ctx, Dimensions::new(100.0, 50.0));
        ctx.open(id, &mut PointerEvent::at(10.0, 10.0), OpenOptions::default())
            .unwrap();
        ctx.finish_animation(id).unwrap();
        assert_eq!(ctx.phase(id), Some(Phase::Open));
        assert_eq!(ctx.state(id).unwrap().translation, Vec2::ZERO);
    }

    #[test]
    fn test_missing_anchor_rect_falls_back_to_pointer() {
        let mut ctx = ctx();
        let id = popover(&mut ctx, Dimensions::new(100.0, 50.0));
        ctx.open(
            id,
            &mut PointerEvent::at(300.0, 200.0),
            OpenOptions::default()
                .with_anchor(AnchorRef::Element(AnchorId::from("gone")))
                .with_placement(Placement::RightBottom)
                .with_gap(0.0),
        )
        .unwrap();
        assert_eq!(ctx.state(id).unwrap().position, Point::new(300.0, 200.0));
    }

    #[test]
    fn test_reposition_follows_live_anchor() {
        let mut ctx = ctx();
        let id = popover(&mut ctx, Dimensions::new(100.0, 50.0));
        ctx.host_mut()
            .set_anchor_rect("button", Rect::from_ltwh(100.0, 100.0, 40.0, 20.0));
        ctx.open(
            id,
            &mut PointerEvent::at(110.0, 110.0),
            OpenOptions::default()
                .with_anchor(AnchorId::from("button").into())
                .with_placement(Placement::CenterBottomToRight),
        )
        .unwrap();
        assert_eq!(ctx.state(id).unwrap().position, Point::new(100.0, 128.0));

        ctx.host_mut()
            .set_anchor_rect("button", Rect::from_ltwh(200.0, 150.0, 40.0, 20.0));
        assert!(ctx.reposition(id).unwrap());
        assert_eq!(ctx.state(id).unwrap().position, Point::new(200.0, 178.0));
    }

    #[test]
    fn test_reposition_pointer_opened_only_clamps() {
        let mut ctx = ctx();
        let id = popover(&mut ctx, Dimensions::new(100.0, 50.0));
        ctx.open(
            id,
            &mut PointerEvent::at(300.0, 200.0),
            OpenOptions::default()
                .with_placement(Placement::RightBottom)
                .with_gap(0.0),
        )
        .unwrap();

        ctx.host_mut().set_viewport(Dimensions::new(350.0, 600.0));
        ctx.reposition(id).unwrap();
        // Clamped against the new right edge, not re-anchored to the pointer
        assert_eq!(ctx.state(id).unwrap().position, Point::new(242.0, 200.0));
    }

    #[test]
    fn test_reposition_keeps_max_size_when_no_overlap() {
        let mut ctx = ctx();
        let id = popover(&mut ctx, Dimensions::new(2000.0, 100.0));
        ctx.host_mut()
            .set_anchor_rect("a", Rect::from_ltwh(700.0, 280.0, 60.0, 40.0));
        ctx.open(
            id,
            &mut PointerEvent::synthetic(),
            OpenOptions::default()
                .with_anchor(AnchorId::from("a").into())
                .with_placement(Placement::LeftCenter)
                .with_allow_hide_anchor(false),
        )
        .unwrap();
        assert_eq!(ctx.state(id).unwrap().max_size, MaxSize::width(684.0));

        ctx.reposition(id).unwrap();
        assert_eq!(ctx.state(id).unwrap().max_size, MaxSize::width(684.0));
    }

    #[test]
    fn test_escape() {
        let mut ctx = ctx();
        let modal = ctx.create_surface(ctx.policy(SurfaceClass::Modal));
        ctx.open(modal, &mut PointerEvent::synthetic(), OpenOptions::default())
            .unwrap();

        let mut key = KeyEvent::named(crate::input::NamedKey::Enter);
        assert!(!ctx.handle_key(modal, &mut key).unwrap());

        let mut escape = KeyEvent::named(crate::input::NamedKey::Escape);
        assert!(ctx.handle_key(modal, &mut escape).unwrap());
        assert!(escape.is_default_prevented());
        assert_eq!(ctx.phase(modal), Some(Phase::Closing));
    }

    #[test]
    fn test_popover_ignores_escape() {
        let mut ctx = ctx();
        let id = popover(&mut ctx, Dimensions::new(100.0, 50.0));
        ctx.open(id, &mut PointerEvent::synthetic(), OpenOptions::default())
            .unwrap();
        let mut escape = KeyEvent::named(crate::input::NamedKey::Escape);
        assert!(!ctx.handle_key(id, &mut escape).unwrap());
        assert!(ctx.is_open(id));
    }
}
