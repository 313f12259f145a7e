//! `scrollIntoView` alignment along a single scroll axis.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Where an element lands in its scroll container.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Alignment {
    Start,
    Center,
    End,
    /// Scroll as little as possible; no-op when already fully visible.
    #[default]
    Nearest,
}

/// Alignment on both axes, as passed to `scrollIntoView`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollIntoView {
    #[serde(default = "default_block")]
    pub block: Alignment,
    #[serde(default = "default_inline")]
    pub inline: Alignment,
}

fn default_block() -> Alignment {
    Alignment::Nearest
}

fn default_inline() -> Alignment {
    Alignment::Start
}

impl Default for ScrollIntoView {
    fn default() -> Self {
        Self {
            block: default_block(),
            inline: default_inline(),
        }
    }
}

/// Compute the new scroll offset of a container so that the element
/// `[elem_start, elem_start + elem_len)` is placed per `alignment`.
///
/// `view_start` is the current scroll offset and `view_len` the visible
/// extent. `content_len` bounds the result to `[0, content_len - view_len]`.
pub fn align(
    alignment: Alignment,
    view_start: f64,
    view_len: f64,
    elem_start: f64,
    elem_len: f64,
    content_len: f64,
) -> f64 {
    let elem_end = elem_start + elem_len;
    let view_end = view_start + view_len;

    let target = match alignment {
        Alignment::Start => elem_start,
        Alignment::End => elem_end - view_len,
        Alignment::Center => elem_start + elem_len / 2.0 - view_len / 2.0,
        Alignment::Nearest => {
            let inside = elem_start >= view_start && elem_end <= view_end;
            let covers = elem_start <= view_start && elem_end >= view_end;
            if inside || covers {
                view_start
            } else if (elem_start < view_start) == (elem_len <= view_len) {
                // Above and fits, or below and taller: align the starts
                elem_start
            } else {
                elem_end - view_len
            }
        }
    };

    let max_scroll = (content_len - view_len).max(0.0);
    target.clamp(0.0, max_scroll)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_keeps_visible_element_in_place() {
        assert_eq!(align(Alignment::Nearest, 48.0, 100.0, 72.0, 24.0, 480.0), 48.0);
    }

    #[test]
    fn test_nearest_scrolls_minimal_distance() {
        // Below the view: bottom edges align
        assert_eq!(align(Alignment::Nearest, 0.0, 100.0, 120.0, 24.0, 480.0), 44.0);
        // Above the view: top edges align
        assert_eq!(align(Alignment::Nearest, 200.0, 100.0, 96.0, 24.0, 480.0), 96.0);
        // Below the view and taller than it: top edges align
        assert_eq!(align(Alignment::Nearest, 0.0, 10.0, 50.0, 24.0, 480.0), 50.0);
        // Above the view and taller than it: bottom edges align
        assert_eq!(align(Alignment::Nearest, 200.0, 10.0, 100.0, 24.0, 480.0), 114.0);
    }

    #[test]
    fn test_nearest_leaves_covering_element_alone() {
        assert_eq!(align(Alignment::Nearest, 100.0, 10.0, 50.0, 150.0, 1000.0), 100.0);
        assert_eq!(align(Alignment::Nearest, 100.0, 10.0, 100.0, 10.0, 1000.0), 100.0);
    }

    #[test]
    fn test_start_center_end() {
        assert_eq!(align(Alignment::Start, 0.0, 100.0, 200.0, 20.0, 480.0), 200.0);
        assert_eq!(align(Alignment::End, 0.0, 100.0, 200.0, 20.0, 480.0), 120.0);
        assert_eq!(align(Alignment::Center, 0.0, 100.0, 200.0, 20.0, 480.0), 160.0);
    }

    #[test]
    fn test_alignment_clamps_to_content() {
        assert_eq!(align(Alignment::Start, 0.0, 100.0, 450.0, 20.0, 480.0), 380.0);
        assert_eq!(align(Alignment::End, 50.0, 100.0, 10.0, 20.0, 480.0), 0.0);
        // Content shorter than the view never scrolls
        assert_eq!(align(Alignment::Start, 0.0, 100.0, 40.0, 20.0, 60.0), 0.0);
    }

    #[test]
    fn test_alignment_keywords() {
        assert_eq!("nearest".parse::<Alignment>().unwrap(), Alignment::Nearest);
        assert_eq!(Alignment::Center.to_string(), "center");
        assert!("middle".parse::<Alignment>().is_err());
    }
}
