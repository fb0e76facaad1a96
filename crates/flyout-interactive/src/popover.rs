//! Popover surfaces
//!
//! Popovers don't stack: an outside click dismisses every open popover it
//! lands outside of, except those opened with `manual_dismiss`.

use flyout::{
    FlyoutContext, OpenOptions, PointerEvent, Result, SurfaceClass, SurfaceHost, SurfaceId,
};

use crate::modal::flush_defaults;

/// Handle to a popover surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Popover {
    id: SurfaceId,
}

impl Popover {
    pub fn new<H: SurfaceHost>(ctx: &mut FlyoutContext<H>) -> Self {
        let policy = ctx.policy(SurfaceClass::Popover);
        Self {
            id: ctx.create_surface(policy),
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn open<H: SurfaceHost>(
        &self,
        ctx: &mut FlyoutContext<H>,
        trigger: &mut PointerEvent,
        options: OpenOptions,
    ) -> Result<bool> {
        ctx.open(self.id, trigger, flush_defaults(options))
    }

    pub fn close<H: SurfaceHost>(&self, ctx: &mut FlyoutContext<H>) -> Result<bool> {
        ctx.close(self.id, false)
    }

    pub fn reposition<H: SurfaceHost>(&self, ctx: &mut FlyoutContext<H>) -> Result<bool> {
        ctx.reposition(self.id)
    }

    pub fn is_open<H: SurfaceHost>(&self, ctx: &FlyoutContext<H>) -> bool {
        ctx.is_open(self.id)
    }
}
