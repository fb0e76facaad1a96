//! Nested sub-menus with hover intent
//!
//! A sub-menu is a manual-dismiss popover anchored to its wrapper element (the
//! menu item that reveals it). Hovering the wrapper opens it after a delay,
//! leaving closes it after a longer one. Opening a sub-menu first closes any
//! open sibling at the same or a deeper nesting level.

use std::time::Duration;

use flyout::{
    AnchorId, AnchorRef, DelayTimer, FlyoutContext, FlyoutError, OpenOptions, PointerEvent,
    Result, SurfaceHost, SurfaceId,
};

use crate::popover::Popover;

/// Sub-menus that can close each other
#[derive(Debug, Clone, Default)]
pub struct SubMenuGroup {
    members: Vec<(SurfaceId, u32)>,
}

impl SubMenuGroup {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, id: SurfaceId, level: u32) {
        if !self.members.iter().any(|(member, _)| *member == id) {
            self.members.push((id, level));
        }
    }

    /// Close every open member other than `except` nested at `level` or
    /// deeper. Returns whether any was closed.
    pub fn close_siblings<H: SurfaceHost>(
        &self,
        ctx: &mut FlyoutContext<H>,
        except: SurfaceId,
        level: u32,
    ) -> Result<bool> {
        let mut closed_any = false;
        for &(member, member_level) in &self.members {
            if member == except || member_level < level || !ctx.is_open(member) {
                continue;
            }
            ctx.close(member, false)?;
            closed_any = true;
        }
        Ok(closed_any)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoverIntent {
    Open,
    Close,
}

/// A nested menu revealed from a menu item
#[derive(Debug)]
pub struct SubMenu {
    popover: Popover,
    level: u32,
    wrapper: AnchorId,
    options: OpenOptions,

    hover: DelayTimer,
    intent: HoverIntent,

    /// Waiting for closed siblings to finish their exit
    sibling_wait: DelayTimer,
}

impl SubMenu {
    /// Create a sub-menu revealed by `wrapper` at nesting `level` and add it to `group`
    pub fn new<H: SurfaceHost>(
        ctx: &mut FlyoutContext<H>,
        group: &mut SubMenuGroup,
        level: u32,
        wrapper: impl Into<AnchorId>,
    ) -> Self {
        let popover = Popover::new(ctx);
        group.add(popover.id(), level);
        Self {
            popover,
            level,
            wrapper: wrapper.into(),
            options: OpenOptions::default(),
            hover: DelayTimer::new(),
            intent: HoverIntent::Open,
            sibling_wait: DelayTimer::new(),
        }
    }

    /// Override placement, gap, padding, `dragable` or `allow_hide_anchor`
    pub fn with_options(mut self, options: OpenOptions) -> Self {
        self.options = options;
        self
    }

    pub fn id(&self) -> SurfaceId {
        self.popover.id()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn wrapper(&self) -> &AnchorId {
        &self.wrapper
    }

    pub fn is_open<H: SurfaceHost>(&self, ctx: &FlyoutContext<H>) -> bool {
        self.popover.is_open(ctx)
    }

    /// The pointer entered the wrapper
    pub fn hover_enter<H: SurfaceHost>(&mut self, ctx: &FlyoutContext<H>) {
        self.schedule(HoverIntent::Open, ctx.config().submenu.open_delay());
    }

    /// The pointer left the wrapper
    pub fn hover_leave<H: SurfaceHost>(&mut self, ctx: &FlyoutContext<H>) {
        self.schedule(HoverIntent::Close, ctx.config().submenu.close_delay());
    }

    fn schedule(&mut self, intent: HoverIntent, delay: Duration) {
        self.intent = intent;
        self.hover.start(delay);
    }

    /// The wrapper was clicked: open without waiting for hover intent
    pub fn click<H: SurfaceHost>(
        &mut self,
        ctx: &mut FlyoutContext<H>,
        group: &SubMenuGroup,
        trigger: &mut PointerEvent,
    ) -> Result<bool> {
        self.hover.cancel();
        self.open(ctx, group, trigger)
    }

    /// Open, closing siblings first
    ///
    /// When a sibling had to be closed the open is deferred until its exit
    /// animation has played; `Ok(false)` is returned and [`SubMenu::advance`]
    /// finishes the job.
    pub fn open<H: SurfaceHost>(
        &mut self,
        ctx: &mut FlyoutContext<H>,
        group: &SubMenuGroup,
        trigger: &mut PointerEvent,
    ) -> Result<bool> {
        if self.is_open(ctx) || self.sibling_wait.is_pending() {
            return Ok(false);
        }

        trigger.stop_propagation();
        if group.close_siblings(ctx, self.id(), self.level)? {
            log::trace!("sub-menu {} waiting for siblings to close", self.id());
            self.sibling_wait
                .start(ctx.config().submenu.sibling_close_wait());
            return Ok(false);
        }
        self.open_now(ctx, trigger)
    }

    fn open_now<H: SurfaceHost>(
        &mut self,
        ctx: &mut FlyoutContext<H>,
        trigger: &mut PointerEvent,
    ) -> Result<bool> {
        let defaults = &ctx.config().submenu;
        let options = OpenOptions::default()
            .with_anchor(AnchorRef::Element(self.wrapper.clone()))
            .with_placement(self.options.placement.unwrap_or(defaults.placement))
            .with_gap(self.options.gap.unwrap_or(defaults.gap))
            .with_padding(self.options.padding.unwrap_or(defaults.padding))
            .with_dragable(self.options.dragable)
            .with_allow_hide_anchor(self.options.allow_hide_anchor)
            .with_manual_dismiss(true);
        self.popover.open(ctx, trigger, options)
    }

    pub fn close<H: SurfaceHost>(&mut self, ctx: &mut FlyoutContext<H>) -> Result<bool> {
        self.hover.cancel();
        self.sibling_wait.cancel();
        self.popover.close(ctx)
    }

    /// A click reached the document
    ///
    /// Closes the sub-menu when the click lands outside both the wrapper and
    /// the sub-menu itself. The wrapper must be laid out in the host.
    pub fn handle_click<H: SurfaceHost>(
        &mut self,
        ctx: &mut FlyoutContext<H>,
        event: &PointerEvent,
    ) -> Result<bool> {
        if !self.is_open(ctx) || event.is_propagation_stopped() {
            return Ok(false);
        }
        let Some(point) = event.position else {
            return Ok(false);
        };

        let wrapper = ctx
            .host()
            .anchor_rect(&self.wrapper)
            .ok_or_else(|| FlyoutError::MissingAnchorRect(self.wrapper.clone()))?;
        let inside_surface = ctx
            .surface_rect(self.id())
            .is_some_and(|rect| rect.contains(point));
        if wrapper.contains(point) || inside_surface {
            return Ok(false);
        }
        self.close(ctx)
    }

    /// Advance hover-intent and sibling-wait timers
    pub fn advance<H: SurfaceHost>(
        &mut self,
        ctx: &mut FlyoutContext<H>,
        group: &SubMenuGroup,
        dt: Duration,
    ) -> Result<()> {
        if self.sibling_wait.advance(dt) {
            self.open_now(ctx, &mut PointerEvent::synthetic())?;
        }
        if self.hover.advance(dt) {
            log::trace!("sub-menu {} hover intent {:?}", self.id(), self.intent);
            match self.intent {
                HoverIntent::Open => {
                    self.open(ctx, group, &mut PointerEvent::synthetic())?;
                }
                HoverIntent::Close => {
                    self.close(ctx)?;
                }
            }
        }
        Ok(())
    }
}
