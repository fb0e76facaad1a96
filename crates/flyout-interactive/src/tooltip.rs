//! Hover tooltips
//!
//! One [`TooltipController`] serves every tooltip in a document. Text tooltips
//! share a single surface whose text is swapped on each open; rich tooltips
//! open a caller-supplied manual-dismiss [`Popover`]. Opening and closing are
//! both delayed, and a pending open or close always replaces the other.

use std::time::Duration;

use flyout::{
    AnchorId, AnchorRef, DelayTimer, FlyoutContext, OpenOptions, Phase, Placement, Point,
    PointerEvent, Rect, Result, SurfaceClass, SurfaceHost, SurfaceId,
};
use flyout_macros::WithBuilders;

use crate::popover::Popover;

/// What a tooltip shows
#[derive(Debug, Clone, PartialEq)]
pub enum TooltipContent {
    /// Plain text on the shared text surface
    Text(String),
    /// Arbitrary content in its own popover
    Rich(Popover),
}

/// A request to show a tooltip for an anchor
#[derive(Debug, Clone, PartialEq, WithBuilders)]
pub struct TooltipRequest {
    #[with_builders(skip)]
    pub anchor: AnchorId,
    /// Child elements whose union is the anchor rectangle; empty means the
    /// anchor's own rectangle
    pub parts: Vec<AnchorId>,
    #[with_builders(skip)]
    pub content: TooltipContent,
    /// Position against the anchor instead of the tracked pointer
    pub use_anchor: bool,
    pub placement: Option<Placement>,
    pub gap: Option<f32>,
    pub open_delay: Option<Duration>,
    pub close_delay: Option<Duration>,
}

impl TooltipRequest {
    pub fn text(anchor: impl Into<AnchorId>, text: impl Into<String>) -> Self {
        Self::new(anchor.into(), TooltipContent::Text(text.into()))
    }

    pub fn rich(anchor: impl Into<AnchorId>, popover: Popover) -> Self {
        Self::new(anchor.into(), TooltipContent::Rich(popover))
    }

    fn new(anchor: AnchorId, content: TooltipContent) -> Self {
        Self {
            anchor,
            parts: Vec::new(),
            content,
            use_anchor: false,
            placement: None,
            gap: None,
            open_delay: None,
            close_delay: None,
        }
    }
}

#[derive(Debug, Clone)]
enum Intent {
    Open(Box<TooltipRequest>),
    Close,
}

#[derive(Debug, Clone)]
struct Shown {
    anchor: AnchorId,
    surface: SurfaceId,
    close_delay: Option<Duration>,
}

/// Shared tooltip state for a document
#[derive(Debug)]
pub struct TooltipController {
    text_surface: SurfaceId,
    shown: Option<Shown>,

    timer: DelayTimer,
    intent: Option<Intent>,

    /// Next tooltip, waiting for the previous one's exit to finish
    swap: Option<(SurfaceId, Box<TooltipRequest>)>,

    /// Last known pointer position
    pointer: Point,
}

impl TooltipController {
    pub fn new<H: SurfaceHost>(ctx: &mut FlyoutContext<H>) -> Self {
        let policy = ctx.policy(SurfaceClass::Tooltip);
        Self {
            text_surface: ctx.create_surface(policy),
            shown: None,
            timer: DelayTimer::new(),
            intent: None,
            swap: None,
            pointer: Point::zero(),
        }
    }

    /// The surface shared by all text tooltips
    pub fn text_surface(&self) -> SurfaceId {
        self.text_surface
    }

    /// Anchor of the tooltip currently shown
    pub fn shown_anchor(&self) -> Option<&AnchorId> {
        self.shown.as_ref().map(|shown| &shown.anchor)
    }

    pub fn is_showing<H: SurfaceHost>(&self, ctx: &FlyoutContext<H>) -> bool {
        self.shown
            .as_ref()
            .is_some_and(|shown| ctx.is_open(shown.surface))
    }

    /// Track the pointer for tooltips that follow it
    pub fn pointer_moved(&mut self, pointer: Point) {
        self.pointer = pointer;
    }

    /// The pointer entered an anchor
    ///
    /// Waits 800 ms, or 300 ms when a tooltip is already showing, unless the
    /// request overrides the delay.
    pub fn hover_enter<H: SurfaceHost>(&mut self, ctx: &FlyoutContext<H>, request: TooltipRequest) {
        let delay = request
            .open_delay
            .unwrap_or_else(|| ctx.config().tooltip.open_delay(self.is_showing(ctx)));
        self.intent = Some(Intent::Open(Box::new(request)));
        self.timer.start(delay);
    }

    /// The pointer left the anchor (or pressed it)
    pub fn hover_leave<H: SurfaceHost>(&mut self, ctx: &FlyoutContext<H>) {
        let delay = self
            .shown
            .as_ref()
            .and_then(|shown| shown.close_delay)
            .unwrap_or_else(|| ctx.config().tooltip.close_delay());
        self.intent = Some(Intent::Close);
        self.timer.start(delay);
    }

    /// Advance the open/close delay and finish pending swaps
    pub fn advance<H: SurfaceHost>(
        &mut self,
        ctx: &mut FlyoutContext<H>,
        dt: Duration,
    ) -> Result<()> {
        let swap_ready = self
            .swap
            .as_ref()
            .is_some_and(|(previous, _)| ctx.phase(*previous) == Some(Phase::Closed));
        if swap_ready {
            if let Some((_, request)) = self.swap.take() {
                self.show(ctx, *request)?;
            }
        }

        if !self.timer.advance(dt) {
            return Ok(());
        }
        match self.intent.take() {
            Some(Intent::Open(request)) => self.open_delayed(ctx, request),
            Some(Intent::Close) => self.hide(ctx).map(|_| ()),
            None => Ok(()),
        }
    }

    fn open_delayed<H: SurfaceHost>(
        &mut self,
        ctx: &mut FlyoutContext<H>,
        request: Box<TooltipRequest>,
    ) -> Result<()> {
        // Still waiting on an exit: the newest hover wins the slot
        if let Some((_, pending)) = self.swap.as_mut() {
            *pending = request;
            return Ok(());
        }

        let Some(shown) = self.shown.take() else {
            return self.show(ctx, *request);
        };

        if !ctx.is_open(shown.surface) {
            return self.show(ctx, *request);
        }
        if shown.anchor == request.anchor {
            self.shown = Some(shown);
            return Ok(());
        }

        log::trace!(
            "tooltip moving from `{}` to `{}`",
            shown.anchor,
            request.anchor
        );
        ctx.close(shown.surface, false)?;
        self.swap = Some((shown.surface, request));
        Ok(())
    }

    fn show<H: SurfaceHost>(
        &mut self,
        ctx: &mut FlyoutContext<H>,
        request: TooltipRequest,
    ) -> Result<()> {
        let defaults = &ctx.config().tooltip;
        let anchor = if request.use_anchor {
            anchor_union(ctx, &request)
        } else {
            AnchorRef::Pointer(self.pointer)
        };
        let options = OpenOptions::default()
            .with_anchor(anchor)
            .with_placement(request.placement.unwrap_or(defaults.placement))
            .with_gap(request.gap.unwrap_or(defaults.gap))
            .with_pointer(self.pointer);

        let mut trigger = PointerEvent::at(self.pointer.x, self.pointer.y);
        let surface = match &request.content {
            TooltipContent::Text(text) => {
                ctx.host_mut().set_text(self.text_surface, text);
                ctx.open(self.text_surface, &mut trigger, options)?;
                self.text_surface
            }
            TooltipContent::Rich(popover) => {
                popover.open(ctx, &mut trigger, options.with_manual_dismiss(true))?;
                popover.id()
            }
        };

        self.shown = Some(Shown {
            anchor: request.anchor,
            surface,
            close_delay: request.close_delay,
        });
        Ok(())
    }

    /// Close the current tooltip right away
    pub fn hide<H: SurfaceHost>(&mut self, ctx: &mut FlyoutContext<H>) -> Result<bool> {
        self.swap = None;
        match self.shown.take() {
            Some(shown) => ctx.close(shown.surface, false),
            None => Ok(false),
        }
    }
}

/// Bounding box of the anchor's parts, or of the anchor itself
fn anchor_union<H: SurfaceHost>(ctx: &FlyoutContext<H>, request: &TooltipRequest) -> AnchorRef {
    if request.parts.is_empty() {
        return AnchorRef::Element(request.anchor.clone());
    }

    let union = request
        .parts
        .iter()
        .filter_map(|part| ctx.host().anchor_rect(part))
        .reduce(|acc: Rect, rect| acc.union(&rect));
    match union {
        Some(rect) => AnchorRef::Rect(rect),
        None => AnchorRef::Element(request.anchor.clone()),
    }
}
