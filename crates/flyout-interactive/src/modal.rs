//! Modal surfaces
//!
//! Modals stack: an outside click dismisses only the topmost one, the
//! document scroll is locked while any is open, and Escape closes them.

use std::ops::Deref;

use flyout::{
    FlyoutContext, KeyEvent, OpenOptions, PointerEvent, Result, SurfaceClass, SurfaceHost,
    SurfaceId,
};

/// Modals and popovers hug their anchor unless told otherwise
pub(crate) fn flush_defaults(mut options: OpenOptions) -> OpenOptions {
    options.gap.get_or_insert(0.0);
    options.padding.get_or_insert(0.0);
    options
}

/// Handle to a modal surface
///
/// # Example
///
/// ```ignore
/// let dialog = Modal::new(&mut ctx);
/// dialog.open(&mut ctx, &mut click, OpenOptions::default().with_important(true))?;
///
/// // Escape pulses the focus ring instead of closing, since it is important
/// dialog.handle_key(&mut ctx, &mut key)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modal {
    id: SurfaceId,
}

impl Modal {
    pub fn new<H: SurfaceHost>(ctx: &mut FlyoutContext<H>) -> Self {
        let policy = ctx.policy(SurfaceClass::Modal);
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

    /// Close unconditionally
    pub fn close<H: SurfaceHost>(&self, ctx: &mut FlyoutContext<H>) -> Result<bool> {
        ctx.close(self.id, false)
    }

    /// Close as a user gesture would; important modals pulse instead
    pub fn dismiss<H: SurfaceHost>(&self, ctx: &mut FlyoutContext<H>) -> Result<bool> {
        ctx.close(self.id, true)
    }

    pub fn reposition<H: SurfaceHost>(&self, ctx: &mut FlyoutContext<H>) -> Result<bool> {
        ctx.reposition(self.id)
    }

    pub fn focus<H: SurfaceHost>(&self, ctx: &mut FlyoutContext<H>) -> Result<bool> {
        ctx.focus(self.id)
    }

    /// Forward a key press the modal received
    pub fn handle_key<H: SurfaceHost>(
        &self,
        ctx: &mut FlyoutContext<H>,
        event: &mut KeyEvent,
    ) -> Result<bool> {
        ctx.handle_key(self.id, event)
    }

    pub fn is_open<H: SurfaceHost>(&self, ctx: &FlyoutContext<H>) -> bool {
        ctx.is_open(self.id)
    }
}

/// A menu: a modal whose content is a list of menu items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Menu {
    modal: Modal,
}

impl Menu {
    pub fn new<H: SurfaceHost>(ctx: &mut FlyoutContext<H>) -> Self {
        Self {
            modal: Modal::new(ctx),
        }
    }
}

impl Deref for Menu {
    type Target = Modal;

    fn deref(&self) -> &Modal {
        &self.modal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flyout::{Dimensions, HeadlessHost, Key, Modifiers, NamedKey, Phase, Point};
    use std::time::Duration;

    fn ctx() -> FlyoutContext<HeadlessHost> {
        FlyoutContext::new(HeadlessHost::new(Dimensions::new(800.0, 600.0)))
    }

    fn open(ctx: &mut FlyoutContext<HeadlessHost>, modal: &Modal, options: OpenOptions) {
        ctx.host_mut()
            .set_surface_size(modal.id(), Dimensions::new(200.0, 100.0));
        modal
            .open(ctx, &mut PointerEvent::at(100.0, 100.0), options)
            .unwrap();
    }

    #[test]
    fn test_defaults_to_zero_gap() {
        let mut ctx = ctx();
        let modal = Modal::new(&mut ctx);
        open(&mut ctx, &modal, OpenOptions::default());
        assert_eq!(ctx.state(modal.id()).unwrap().gap, 0.0);
        // Centred under the pointer, pushed in from the left edge
        assert_eq!(
            ctx.state(modal.id()).unwrap().position,
            Point::new(8.0, 100.0)
        );
    }

    #[test]
    fn test_escape_closes() {
        let mut ctx = ctx();
        let modal = Modal::new(&mut ctx);
        open(&mut ctx, &modal, OpenOptions::default());

        let mut escape = KeyEvent::named(NamedKey::Escape);
        assert!(modal.handle_key(&mut ctx, &mut escape).unwrap());
        assert_eq!(ctx.phase(modal.id()), Some(Phase::Closing));
    }

    #[test]
    fn test_important_escape_pulses() {
        let mut ctx = ctx();
        let modal = Modal::new(&mut ctx);
        open(&mut ctx, &modal, OpenOptions::default().with_important(true));

        let mut escape = KeyEvent::named(NamedKey::Escape);
        assert!(modal.handle_key(&mut ctx, &mut escape).unwrap());
        assert!(modal.is_open(&ctx));
        assert!(ctx.state(modal.id()).unwrap().focused);

        // Pulse restarts on a second Escape
        ctx.advance(Duration::from_millis(600));
        modal.handle_key(&mut ctx, &mut escape).unwrap();
        ctx.advance(Duration::from_millis(600));
        assert!(ctx.state(modal.id()).unwrap().focused);
    }

    #[test]
    fn test_important_escape_with_modifier_does_nothing() {
        let mut ctx = ctx();
        let modal = Modal::new(&mut ctx);
        open(&mut ctx, &modal, OpenOptions::default().with_important(true));

        let mut escape = KeyEvent::new(
            Key::Named(NamedKey::Escape),
            Modifiers {
                ctrl: true,
                ..Modifiers::NONE
            },
        );
        assert!(modal.handle_key(&mut ctx, &mut escape).unwrap());
        assert!(modal.is_open(&ctx));
        assert!(!ctx.state(modal.id()).unwrap().focused);
    }

    #[test]
    fn test_dismiss_vs_close() {
        let mut ctx = ctx();
        let modal = Modal::new(&mut ctx);
        open(&mut ctx, &modal, OpenOptions::default().with_important(true));

        assert!(!modal.dismiss(&mut ctx).unwrap());
        assert!(modal.is_open(&ctx));
        assert!(modal.close(&mut ctx).unwrap());
        assert!(!modal.is_open(&ctx));
    }

    #[test]
    fn test_menu_is_a_modal() {
        let mut ctx = ctx();
        let menu = Menu::new(&mut ctx);
        assert_eq!(
            ctx.surface(menu.id()).unwrap().policy().class,
            SurfaceClass::Modal
        );
        menu.open(&mut ctx, &mut PointerEvent::at(10.0, 10.0), OpenOptions::default())
            .unwrap();
        assert!(ctx.registry(SurfaceClass::Modal).contains(menu.id()));
    }
}
