//! # flyout-interactive
//!
//! Ready-made surface variants built on the flyout engine.
//!
//! This crate provides the modal, menu, popover, sub-menu and tooltip
//! components. Each is a thin handle over a surface owned by a
//! [`flyout::FlyoutContext`]; hover intent and sibling coordination live here,
//! positioning and lifecycle live in the engine.

mod modal;
mod popover;
mod submenu;
mod tooltip;

pub use modal::*;
pub use popover::*;
pub use submenu::*;
pub use tooltip::*;
