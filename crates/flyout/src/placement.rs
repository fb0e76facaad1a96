//! Relative placement of a flyout around its anchor
//!
//! ```txt
//!        |            |                      |
//!        |   BEFORE   |        CENTER        |  AFTER
//! ------ + ---------- + -------------------- + -------
//!        |            ^                      ^
//! ABOVE  |     [<^  ] | [^>  ] [<^> ] [<^  ] | [^>  ]
//! ------ +    <------ + -------------------- + ------>
//!        |     [<v  ] | [v>  ] [<v> ] [<v  ] | [v>  ]
//! MIDDLE |     [<^v ] | [^v> ] [<^v>] [<^v ] | [^v> ]
//!        |     [<^  ] | [^>  ] [<^> ] [<^  ] | [^>  ]
//! ------ +    <------ + -------------------- + ------>
//! BELOW  |     [<v  ] | [v>  ] [<v> ] [<v  ] | [v>  ]
//!        |            v                      v
//! ```
//!
//! Every [`Placement`] is exactly one (horizontal, vertical) bucket pairing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::FlyoutError;

/// Where the flyout sits horizontally relative to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalBucket {
    /// Entirely left of the anchor
    Before,
    /// Left edges aligned, growing right
    AlignStart,
    /// Centred on the anchor
    Center,
    /// Right edges aligned, growing left
    AlignEnd,
    /// Entirely right of the anchor
    After,
}

/// Where the flyout sits vertically relative to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalBucket {
    /// Entirely above the anchor
    Above,
    /// Top edges aligned, growing down
    AlignTop,
    /// Centred on the anchor
    Middle,
    /// Bottom edges aligned, growing up
    AlignBottom,
    /// Entirely below the anchor
    Below,
}

/// Fixed enumeration of relative placements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Placement {
    LeftTop,
    LeftCenterToBottom,
    LeftCenter,
    LeftCenterToTop,
    LeftBottom,
    RightTop,
    RightCenterToBottom,
    RightCenter,
    RightCenterToTop,
    RightBottom,
    CenterTopToRight,
    CenterTop,
    CenterTopToLeft,
    CenterBottomToRight,
    #[default]
    CenterBottom,
    CenterBottomToLeft,
    CenterCenterLeftTop,
    CenterCenterLeft,
    CenterCenterLeftBottom,
    CenterCenterTop,
    CenterCenter,
    CenterCenterBottom,
    CenterCenterRightTop,
    CenterCenterRight,
    CenterCenterRightBottom,
}

impl Placement {
    /// Every placement, in declaration order
    pub const ALL: [Placement; 25] = [
        Placement::LeftTop,
        Placement::LeftCenterToBottom,
        Placement::LeftCenter,
        Placement::LeftCenterToTop,
        Placement::LeftBottom,
        Placement::RightTop,
        Placement::RightCenterToBottom,
        Placement::RightCenter,
        Placement::RightCenterToTop,
        Placement::RightBottom,
        Placement::CenterTopToRight,
        Placement::CenterTop,
        Placement::CenterTopToLeft,
        Placement::CenterBottomToRight,
        Placement::CenterBottom,
        Placement::CenterBottomToLeft,
        Placement::CenterCenterLeftTop,
        Placement::CenterCenterLeft,
        Placement::CenterCenterLeftBottom,
        Placement::CenterCenterTop,
        Placement::CenterCenter,
        Placement::CenterCenterBottom,
        Placement::CenterCenterRightTop,
        Placement::CenterCenterRight,
        Placement::CenterCenterRightBottom,
    ];

    /// The bucket pairing this placement resolves with
    pub const fn buckets(self) -> (HorizontalBucket, VerticalBucket) {
        use HorizontalBucket as H;
        use Placement as P;
        use VerticalBucket as V;

        match self {
            P::LeftTop => (H::Before, V::Above),
            P::LeftCenterToBottom => (H::Before, V::AlignTop),
            P::LeftCenter => (H::Before, V::Middle),
            P::LeftCenterToTop => (H::Before, V::AlignBottom),
            P::LeftBottom => (H::Before, V::Below),
            P::RightTop => (H::After, V::Above),
            P::RightCenterToBottom => (H::After, V::AlignTop),
            P::RightCenter => (H::After, V::Middle),
            P::RightCenterToTop => (H::After, V::AlignBottom),
            P::RightBottom => (H::After, V::Below),
            P::CenterTopToRight => (H::AlignStart, V::Above),
            P::CenterTop => (H::Center, V::Above),
            P::CenterTopToLeft => (H::AlignEnd, V::Above),
            P::CenterBottomToRight => (H::AlignStart, V::Below),
            P::CenterBottom => (H::Center, V::Below),
            P::CenterBottomToLeft => (H::AlignEnd, V::Below),
            P::CenterCenterLeftTop => (H::AlignStart, V::AlignTop),
            P::CenterCenterLeft => (H::AlignStart, V::Middle),
            P::CenterCenterLeftBottom => (H::AlignStart, V::AlignBottom),
            P::CenterCenterTop => (H::Center, V::AlignTop),
            P::CenterCenter => (H::Center, V::Middle),
            P::CenterCenterBottom => (H::Center, V::AlignBottom),
            P::CenterCenterRightTop => (H::AlignEnd, V::AlignTop),
            P::CenterCenterRight => (H::AlignEnd, V::Middle),
            P::CenterCenterRightBottom => (H::AlignEnd, V::AlignBottom),
        }
    }

    pub const fn horizontal(self) -> HorizontalBucket {
        self.buckets().0
    }

    pub const fn vertical(self) -> VerticalBucket {
        self.buckets().1
    }

    /// Placements that hang off the anchor's top or bottom edge
    /// (`CenterTop*`, `CenterBottom*`).
    pub fn is_top_or_bottom_edge(self) -> bool {
        matches!(self.vertical(), VerticalBucket::Above | VerticalBucket::Below)
            && !matches!(
                self.horizontal(),
                HorizontalBucket::Before | HorizontalBucket::After
            )
    }

    /// Placements that hang off the anchor's left or right edge
    /// (`LeftCenter*`, `RightCenter*`).
    pub fn is_left_or_right_edge(self) -> bool {
        matches!(
            self.horizontal(),
            HorizontalBucket::Before | HorizontalBucket::After
        ) && !matches!(self.vertical(), VerticalBucket::Above | VerticalBucket::Below)
    }

    /// Short code, e.g. `"cb"` for [`Placement::CenterBottom`]
    pub const fn code(self) -> &'static str {
        use Placement as P;
        match self {
            P::LeftTop => "lt",
            P::LeftCenterToBottom => "lctb",
            P::LeftCenter => "lc",
            P::LeftCenterToTop => "lctt",
            P::LeftBottom => "lb",
            P::RightTop => "rt",
            P::RightCenterToBottom => "rctb",
            P::RightCenter => "rc",
            P::RightCenterToTop => "rctt",
            P::RightBottom => "rb",
            P::CenterTopToRight => "cttr",
            P::CenterTop => "ct",
            P::CenterTopToLeft => "cttl",
            P::CenterBottomToRight => "cbtr",
            P::CenterBottom => "cb",
            P::CenterBottomToLeft => "cbtl",
            P::CenterCenterLeftTop => "cclt",
            P::CenterCenterLeft => "ccl",
            P::CenterCenterLeftBottom => "cclb",
            P::CenterCenterTop => "cct",
            P::CenterCenter => "cc",
            P::CenterCenterBottom => "ccb",
            P::CenterCenterRightTop => "ccrt",
            P::CenterCenterRight => "ccr",
            P::CenterCenterRightBottom => "ccrb",
        }
    }

    /// camelCase name, e.g. `"centerBottom"`
    pub const fn name(self) -> &'static str {
        use Placement as P;
        match self {
            P::LeftTop => "leftTop",
            P::LeftCenterToBottom => "leftCenterToBottom",
            P::LeftCenter => "leftCenter",
            P::LeftCenterToTop => "leftCenterToTop",
            P::LeftBottom => "leftBottom",
            P::RightTop => "rightTop",
            P::RightCenterToBottom => "rightCenterToBottom",
            P::RightCenter => "rightCenter",
            P::RightCenterToTop => "rightCenterToTop",
            P::RightBottom => "rightBottom",
            P::CenterTopToRight => "centerTopToRight",
            P::CenterTop => "centerTop",
            P::CenterTopToLeft => "centerTopToLeft",
            P::CenterBottomToRight => "centerBottomToRight",
            P::CenterBottom => "centerBottom",
            P::CenterBottomToLeft => "centerBottomToLeft",
            P::CenterCenterLeftTop => "centerCenterLeftTop",
            P::CenterCenterLeft => "centerCenterLeft",
            P::CenterCenterLeftBottom => "centerCenterLeftBottom",
            P::CenterCenterTop => "centerCenterTop",
            P::CenterCenter => "centerCenter",
            P::CenterCenterBottom => "centerCenterBottom",
            P::CenterCenterRightTop => "centerCenterRightTop",
            P::CenterCenterRight => "centerCenterRight",
            P::CenterCenterRightBottom => "centerCenterRightBottom",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Placement {
    type Err = FlyoutError;

    /// Accepts either the short code (`"rctb"`) or the camelCase name
    /// (`"rightCenterToBottom"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Older code for `leftCenterToTop`
        if s == "lctp" {
            return Ok(Placement::LeftCenterToTop);
        }
        Placement::ALL
            .into_iter()
            .find(|p| p.code() == s || p.name() == s)
            .ok_or_else(|| FlyoutError::UnknownPlacement(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Placement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
