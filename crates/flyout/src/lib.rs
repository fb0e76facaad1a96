//! # flyout
//!
//! Backend agnostic positioning and lifecycle engine for layered surfaces:
//! modals, popovers, menus and tooltips.
//!
//! The crate never touches a real document. A [`SurfaceHost`] supplies the
//! viewport, anchor rectangles and measurement; the engine decides where each
//! surface goes, animates it in and out, and arbitrates between surfaces that
//! are open at the same time.
//!
//! ## Core Types
//!
//! - [`FlyoutContext`] - Owns every surface and drives their lifecycle
//! - [`SurfaceHost`] - Trait for the environment surfaces live in
//! - [`HeadlessHost`] - In-memory host for tests and headless use
//! - [`SurfacePolicy`] - Class-level behaviour (dismissal, scroll lock, Escape)
//! - [`OpenOptions`] - Per-open anchor, placement and flags
//!
//! ## Geometry
//!
//! - [`Placement`] - Fixed enumeration of relative placements
//! - [`resolve_position`] - Pure placement computation
//! - [`anchor_avoidance`] - Max-size clamp that keeps an anchor visible
//!
//! ## Time
//!
//! - [`Transition`] / [`SlideAnimation`] - Entrance and exit slides
//! - [`DelayTimer`] - Frame-advanced debounce and hover-intent timers

mod config;
mod context;
mod error;
mod events;
mod geometry;
mod host;
mod input;
mod placement;
mod primitives;
mod registry;
mod surface;
mod timer;
pub mod transition;

pub use config::*;
pub use context::*;
pub use error::{FlyoutError, Result};
pub use events::*;
pub use geometry::*;
pub use host::*;
pub use placement::*;
pub use primitives::*;
pub use registry::*;
pub use surface::*;
pub use timer::*;
pub use transition::*;

// Input
pub use input::*;
