//! Visibility watcher options: `rootMargin` and `threshold`.
//!
//! The root margin uses the CSS margin shorthand accepted by
//! `IntersectionObserver`: one to four lengths, each in `px` or `%`.
//! Percentages resolve against the root's height for the top and bottom
//! edges and against its width for the left and right edges.

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A single margin length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    /// Resolve against the size of the root along the same axis.
    pub fn resolve(self, basis: f64) -> f64 {
        match self {
            Length::Px(px) => px,
            Length::Percent(pct) => basis * pct / 100.0,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(v) => write!(f, "{}px", v),
            Length::Percent(v) => write!(f, "{}%", v),
        }
    }
}

/// Axis-aligned rectangle in document or viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Intersection of two rectangles. Edge-adjacent rectangles produce a
    /// zero-area intersection, which still counts as intersecting.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// The `rootMargin` option.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl RootMargin {
    pub const ZERO: RootMargin = RootMargin {
        top: Length::Px(0.0),
        right: Length::Px(0.0),
        bottom: Length::Px(0.0),
        left: Length::Px(0.0),
    };

    /// Grow (or, with negative margins, shrink) the root rectangle.
    pub fn apply(&self, root: Rect) -> Rect {
        let top = self.top.resolve(root.height);
        let right = self.right.resolve(root.width);
        let bottom = self.bottom.resolve(root.height);
        let left = self.left.resolve(root.width);
        Rect::new(
            root.x - left,
            root.y - top,
            root.width + left + right,
            root.height + top + bottom,
        )
    }
}

impl Default for RootMargin {
    /// Trigger line at the vertical midpoint of the viewport.
    fn default() -> Self {
        RootMargin {
            bottom: Length::Percent(-50.0),
            ..RootMargin::ZERO
        }
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

fn length_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([+-]?(?:\d+\.?\d*|\.\d+))(px|%)?$").expect("length pattern is valid")
    })
}

fn parse_length(token: &str, input: &str) -> Result<Length> {
    let invalid = |reason: String| Error::InvalidRootMargin {
        input: input.to_string(),
        reason,
    };
    let caps = length_pattern()
        .captures(token)
        .ok_or_else(|| invalid(format!("'{}' is not a px or % length", token)))?;
    let value: f64 = caps[1]
        .parse()
        .map_err(|_| invalid(format!("'{}' is not a number", &caps[1])))?;
    match caps.get(2).map(|m| m.as_str()) {
        Some("px") => Ok(Length::Px(value)),
        Some("%") => Ok(Length::Percent(value)),
        // Unitless lengths are only valid for zero
        _ if value == 0.0 => Ok(Length::Px(0.0)),
        _ => Err(invalid(format!("'{}' needs a px or % unit", token))),
    }
}

impl FromStr for RootMargin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lengths = s
            .split_whitespace()
            .map(|token| parse_length(token, s))
            .collect::<Result<Vec<_>>>()?;

        let (top, right, bottom, left) = match lengths.as_slice() {
            [] => return Ok(RootMargin::ZERO),
            [all] => (*all, *all, *all, *all),
            [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
            [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
            [top, right, bottom, left] => (*top, *right, *bottom, *left),
            _ => {
                return Err(Error::InvalidRootMargin {
                    input: s.to_string(),
                    reason: format!("expected 1 to 4 values, got {}", lengths.len()),
                });
            }
        };
        Ok(RootMargin {
            top,
            right,
            bottom,
            left,
        })
    }
}

/// The complete configuration surface of a visibility watcher.
#[derive(Debug, Clone, PartialEq)]
pub struct WatcherOptions {
    pub root_margin: RootMargin,
    /// Fraction of the target that must be visible for a crossing.
    /// `0.0` fires on any contact with the root.
    pub threshold: f64,
}

impl WatcherOptions {
    pub fn new(root_margin: RootMargin, threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::InvalidThreshold(threshold));
        }
        Ok(Self {
            root_margin,
            threshold,
        })
    }
}

impl Default for WatcherOptions {
    fn default() -> Self {
        Self {
            root_margin: RootMargin::default(),
            threshold: 0.0,
        }
    }
}
