use std::time::Duration;

use flyout::{
    Dimensions, FlyoutContext, HeadlessHost, KeyEvent, NamedKey, OpenOptions, Phase, Point,
    PointerEvent, Rect, SurfaceClass,
};
use flyout_interactive::{Menu, Modal, SubMenu, SubMenuGroup};

const FRAME: Duration = Duration::from_millis(16);

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A context with a 160x200 menu opened by a click at (100, 100)
///
/// The menu lands at (20, 100); its "Export" item spans (20, 120)-(180, 144).
fn open_menu() -> (FlyoutContext<HeadlessHost>, Menu) {
    init_logger();
    let mut host = HeadlessHost::new(Dimensions::new(800.0, 600.0));
    host.set_anchor_rect("menu-export", Rect::from_ltwh(20.0, 120.0, 160.0, 24.0));
    let mut ctx = FlyoutContext::new(host);

    let menu = Menu::new(&mut ctx);
    ctx.host_mut()
        .set_surface_size(menu.id(), Dimensions::new(160.0, 200.0));
    menu.open(&mut ctx, &mut PointerEvent::at(100.0, 100.0), OpenOptions::default())
        .unwrap();
    assert_eq!(ctx.state(menu.id()).unwrap().position, Point::new(20.0, 100.0));
    (ctx, menu)
}

fn run(
    ctx: &mut FlyoutContext<HeadlessHost>,
    sub: &mut SubMenu,
    group: &SubMenuGroup,
    frames: usize,
) {
    for _ in 0..frames {
        sub.advance(ctx, group, FRAME).unwrap();
        ctx.advance(FRAME);
    }
}

#[test]
fn test_hovering_item_reveals_submenu_beside_menu() {
    let (mut ctx, _menu) = open_menu();
    let mut group = SubMenuGroup::new();
    let mut export = SubMenu::new(&mut ctx, &mut group, 1, "menu-export");
    ctx.host_mut()
        .set_surface_size(export.id(), Dimensions::new(120.0, 80.0));

    export.hover_enter(&ctx);
    run(&mut ctx, &mut export, &group, 18);
    assert!(!export.is_open(&ctx));
    run(&mut ctx, &mut export, &group, 1);
    assert!(export.is_open(&ctx));

    // Overlaps the menu edge by 8 px, lifted by its 5 px padding
    assert_eq!(
        ctx.state(export.id()).unwrap().position,
        Point::new(172.0, 115.0)
    );
}

#[test]
fn test_outside_click_closes_menu_and_submenu() {
    let (mut ctx, menu) = open_menu();
    let mut group = SubMenuGroup::new();
    let mut export = SubMenu::new(&mut ctx, &mut group, 1, "menu-export");
    ctx.host_mut()
        .set_surface_size(export.id(), Dimensions::new(120.0, 80.0));
    export
        .click(&mut ctx, &group, &mut PointerEvent::at(100.0, 130.0))
        .unwrap();
    assert!(export.is_open(&ctx));

    let click = PointerEvent::at(600.0, 500.0);
    // Sub-menus are manual-dismiss: the document sweep leaves them alone
    assert_eq!(ctx.handle_click(&click), vec![menu.id()]);
    assert!(export.is_open(&ctx));

    assert!(export.handle_click(&mut ctx, &click).unwrap());
    assert_eq!(ctx.phase(export.id()), Some(Phase::Closing));
}

#[test]
fn test_click_inside_submenu_keeps_everything_open() {
    let (mut ctx, menu) = open_menu();
    let mut group = SubMenuGroup::new();
    let mut export = SubMenu::new(&mut ctx, &mut group, 1, "menu-export");
    ctx.host_mut()
        .set_surface_size(export.id(), Dimensions::new(120.0, 80.0));
    export
        .click(&mut ctx, &group, &mut PointerEvent::at(100.0, 130.0))
        .unwrap();
    run(&mut ctx, &mut export, &group, 40);

    // Inside both the menu and the sub-menu
    let click = PointerEvent::at(176.0, 150.0);
    assert!(ctx.handle_click(&click).is_empty());
    assert!(!export.handle_click(&mut ctx, &click).unwrap());
    assert!(menu.is_open(&ctx));
    assert!(export.is_open(&ctx));
}

#[test]
fn test_dialog_from_menu_stacks_on_top() {
    let (mut ctx, menu) = open_menu();
    let dialog = Modal::new(&mut ctx);
    ctx.host_mut()
        .set_surface_size(dialog.id(), Dimensions::new(300.0, 200.0));
    dialog
        .open(
            &mut ctx,
            &mut PointerEvent::at(100.0, 130.0),
            OpenOptions::default().with_important(true),
        )
        .unwrap();
    assert_eq!(ctx.registry(SurfaceClass::Modal).topmost(), Some(dialog.id()));

    // Important and topmost: the outside click pulses it and leaves the menu be
    assert!(ctx.handle_click(&PointerEvent::at(700.0, 550.0)).is_empty());
    assert!(dialog.is_open(&ctx));
    assert!(menu.is_open(&ctx));
    assert!(ctx.state(dialog.id()).unwrap().focused);

    // Escape pulses again instead of closing
    let mut escape = KeyEvent::named(NamedKey::Escape);
    dialog.handle_key(&mut ctx, &mut escape).unwrap();
    assert!(dialog.is_open(&ctx));

    // Its own button closes it; the click that did so must not reach the menu
    dialog.close(&mut ctx).unwrap();
    assert!(ctx.handle_click(&PointerEvent::at(700.0, 550.0)).is_empty());
    assert!(menu.is_open(&ctx));

    assert_eq!(
        ctx.handle_click(&PointerEvent::at(700.0, 550.0)),
        vec![menu.id()]
    );
}

#[test]
fn test_escape_closes_menu() {
    let (mut ctx, menu) = open_menu();
    let mut escape = KeyEvent::named(NamedKey::Escape);
    assert!(menu.handle_key(&mut ctx, &mut escape).unwrap());
    assert!(!menu.is_open(&ctx));

    for _ in 0..40 {
        ctx.advance(FRAME);
    }
    assert_eq!(ctx.phase(menu.id()), Some(Phase::Closed));
    assert!(!ctx.host().is_visible(menu.id()));
    assert!(!ctx.is_scroll_locked());
}
