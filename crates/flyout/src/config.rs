//! Engine configuration
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! edge_margin = 12.0
//! easing = "easeOut"
//!
//! [tooltip]
//! open_delay_ms = 500
//! placement = "rightCenter"
//! ```

use std::time::Duration;

use flyout_macros::WithBuilders;
use serde::Deserialize;

use crate::error::Result;
use crate::geometry::DEFAULT_MARGIN;
use crate::placement::Placement;
use crate::transition::{Easing, Transition};

#[derive(Debug, Clone, PartialEq, Deserialize, WithBuilders)]
#[serde(default)]
pub struct FlyoutConfig {
    /// Distance kept between surfaces and the viewport edges
    pub edge_margin: f32,
    /// Length of the entrance/exit slide
    pub slide_distance: f32,
    pub animation_ms: u64,
    /// Curve of the entrance/exit slide
    pub easing: Easing,
    pub resize_debounce_ms: u64,
    pub focus_pulse_ms: u64,
    pub tooltip: TooltipConfig,
    pub submenu: SubMenuConfig,
}

impl Default for FlyoutConfig {
    fn default() -> Self {
        Self {
            edge_margin: DEFAULT_MARGIN,
            slide_distance: 12.0,
            animation_ms: 300,
            easing: Easing::Spring,
            resize_debounce_ms: 250,
            focus_pulse_ms: 1000,
            tooltip: TooltipConfig::default(),
            submenu: SubMenuConfig::default(),
        }
    }
}

impl FlyoutConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Entrance/exit transition for surfaces
    pub fn transition(&self) -> Transition {
        Transition::new(Duration::from_millis(self.animation_ms), self.easing.curve())
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn focus_pulse(&self) -> Duration {
        Duration::from_millis(self.focus_pulse_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, WithBuilders)]
#[serde(default)]
pub struct TooltipConfig {
    /// Hover delay before the first tooltip opens
    pub open_delay_ms: u64,
    /// Hover delay while another tooltip is already showing
    pub reopen_delay_ms: u64,
    pub close_delay_ms: u64,
    pub gap: f32,
    pub placement: Placement,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            open_delay_ms: 800,
            reopen_delay_ms: 300,
            close_delay_ms: 300,
            gap: 40.0,
            placement: Placement::CenterTop,
        }
    }
}

impl TooltipConfig {
    /// Open delay depending on whether a tooltip is already showing
    pub fn open_delay(&self, tooltip_showing: bool) -> Duration {
        if tooltip_showing {
            Duration::from_millis(self.reopen_delay_ms)
        } else {
            Duration::from_millis(self.open_delay_ms)
        }
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, WithBuilders)]
#[serde(default)]
pub struct SubMenuConfig {
    /// Hover-enter delay before opening
    pub open_delay_ms: u64,
    /// Hover-leave delay before closing
    pub close_delay_ms: u64,
    /// Wait after closing siblings, so their exit can play out
    pub sibling_close_wait_ms: u64,
    pub gap: f32,
    pub padding: f32,
    pub placement: Placement,
}

impl Default for SubMenuConfig {
    fn default() -> Self {
        Self {
            open_delay_ms: 300,
            close_delay_ms: 500,
            sibling_close_wait_ms: 300,
            gap: -8.0,
            padding: 5.0,
            placement: Placement::RightCenterToBottom,
        }
    }
}

impl SubMenuConfig {
    pub fn open_delay(&self) -> Duration {
        Duration::from_millis(self.open_delay_ms)
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }

    pub fn sibling_close_wait(&self) -> Duration {
        Duration::from_millis(self.sibling_close_wait_ms)
    }
}
