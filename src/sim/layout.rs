//! Layout description for the simulated document.
//!
//! A layout is the geometry the scroll-spy cares about and nothing else:
//! the viewport, the navigation panel with its links, and the vertical
//! position of every heading. Layouts load from TOML or JSON.
//!
//! ```toml
//! steps = [0, 250, 900]
//!
//! [viewport]
//! height = 800
//!
//! [[links]]
//! href = "#intro"
//!
//! [[headings]]
//! id = "intro"
//! top = 0
//! ```

use crate::error::{Error, Result};
use crate::spy::slug_from_href;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    #[serde(default = "default_viewport_width")]
    pub width: f64,
    #[serde(default = "default_viewport_height")]
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
        }
    }
}

fn default_viewport_width() -> f64 {
    1000.0
}

fn default_viewport_height() -> f64 {
    800.0
}

/// The scrollable container holding the TOC links, one row per link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavPanel {
    #[serde(default = "default_nav_height")]
    pub height: f64,
    #[serde(default = "default_nav_width")]
    pub width: f64,
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    /// Classes on the container element (matched by ancestor selectors).
    #[serde(default = "default_nav_classes")]
    pub classes: Vec<String>,
}

impl Default for NavPanel {
    fn default() -> Self {
        Self {
            height: default_nav_height(),
            width: default_nav_width(),
            row_height: default_row_height(),
            classes: default_nav_classes(),
        }
    }
}

fn default_nav_height() -> f64 {
    300.0
}

fn default_nav_width() -> f64 {
    240.0
}

fn default_row_height() -> f64 {
    24.0
}

fn default_nav_classes() -> Vec<String> {
    vec!["toc-list".to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocLink {
    /// Usually `#<slug>`; absent on malformed markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default = "default_link_classes")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Horizontal offset inside the panel (nested entries).
    #[serde(default)]
    pub indent: f64,
}

fn default_link_classes() -> Vec<String> {
    vec!["toc-link".to_string()]
}

impl TocLink {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            classes: default_link_classes(),
            label: None,
            indent: 0.0,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn display_name(&self) -> &str {
        self.label
            .as_deref()
            .or(self.href.as_deref())
            .unwrap_or("<no href>")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub id: String,
    /// Offset of the heading's top edge from the document top.
    pub top: f64,
    #[serde(default = "default_heading_height")]
    pub height: f64,
}

fn default_heading_height() -> f64 {
    32.0
}

impl Heading {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub nav: NavPanel,
    #[serde(default)]
    pub links: Vec<TocLink>,
    #[serde(default)]
    pub headings: Vec<Heading>,
    /// Scroll offsets to visit when simulating.
    #[serde(default)]
    pub steps: Vec<f64>,
}

impl Layout {
    /// Load a layout; `.json` files are read as JSON, anything else as TOML.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            serde_json::from_str(&contents).map_err(|source| Error::Json {
                path: path.to_path_buf(),
                source,
            })
        } else {
            toml::from_str(&contents).map_err(|source| Error::Toml {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Height of the whole document: the lowest heading bottom or one
    /// viewport, whichever is larger.
    pub fn document_height(&self) -> f64 {
        self.headings
            .iter()
            .map(|h| h.top + h.height)
            .fold(self.viewport.height, f64::max)
    }

    pub fn heading(&self, id: &str) -> Option<&Heading> {
        self.headings.iter().find(|h| h.id == id)
    }

    /// Problems that make links inert or ambiguous.
    pub fn lint(&self) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut seen_slugs = HashSet::new();

        for link in &self.links {
            let Some(href) = link.href.as_deref() else {
                findings.push(Finding::MissingHref {
                    label: link.display_name().to_string(),
                });
                continue;
            };
            if !href.starts_with('#') {
                findings.push(Finding::NotAnAnchor {
                    href: href.to_string(),
                });
            }
            let slug = slug_from_href(href);
            if !seen_slugs.insert(slug) {
                findings.push(Finding::DuplicateSlug {
                    slug: slug.to_string(),
                });
            }
            if self.heading(slug).is_none() {
                findings.push(Finding::OrphanSlug {
                    slug: slug.to_string(),
                });
            }
        }

        let mut seen_ids = HashSet::new();
        for heading in &self.headings {
            if !seen_ids.insert(heading.id.as_str()) {
                findings.push(Finding::DuplicateHeadingId {
                    id: heading.id.clone(),
                });
            }
        }

        findings
    }
}

/// A lint result from [`Layout::lint`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// No heading carries the link's slug; the link never activates.
    OrphanSlug { slug: String },
    /// Two links share a slug; only the later one can activate.
    DuplicateSlug { slug: String },
    DuplicateHeadingId { id: String },
    MissingHref { label: String },
    /// `href` without a leading `#`, used verbatim as the slug.
    NotAnAnchor { href: String },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::OrphanSlug { slug } => write!(f, "#{} has no matching heading", slug),
            Finding::DuplicateSlug { slug } => {
                write!(f, "#{} is linked more than once; the last link wins", slug)
            }
            Finding::DuplicateHeadingId { id } => write!(f, "heading id '{}' is not unique", id),
            Finding::MissingHref { label } => write!(f, "link '{}' has no href", label),
            Finding::NotAnAnchor { href } => write!(f, "href '{}' does not start with '#'", href),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LAYOUT: &str = r##"
steps = [0, 250]

[viewport]
height = 600

[nav]
height = 48

[[links]]
href = "#intro"
label = "Introduction"

[[links]]
href = "#body"

[[headings]]
id = "intro"
top = 0

[[headings]]
id = "body"
top = 500
height = 40
"##;

    #[test]
    fn test_load_toml_layout_with_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(LAYOUT.as_bytes()).unwrap();

        let layout = Layout::from_path(file.path()).unwrap();
        assert_eq!(layout.viewport.height, 600.0);
        assert_eq!(layout.viewport.width, 1000.0);
        assert_eq!(layout.nav.height, 48.0);
        assert_eq!(layout.nav.row_height, 24.0);
        assert_eq!(layout.nav.classes, vec!["toc-list"]);
        assert_eq!(layout.links[0].classes, vec!["toc-link"]);
        assert_eq!(layout.links[0].display_name(), "Introduction");
        assert_eq!(layout.headings[0].height, 32.0);
        assert_eq!(layout.steps, vec![0.0, 250.0]);
    }

    #[test]
    fn test_load_json_layout() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br##"{"links":[{"href":"#a"}],"headings":[{"id":"a","top":10}]}"##)
            .unwrap();

        let layout = Layout::from_path(file.path()).unwrap();
        assert_eq!(layout.links.len(), 1);
        assert_eq!(layout.heading("a").map(|h| h.top), Some(10.0));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(b"[[links]\nhref = ").unwrap();
        assert!(matches!(
            Layout::from_path(file.path()),
            Err(Error::Toml { .. })
        ));
        assert!(matches!(
            Layout::from_path(Path::new("/nonexistent/layout.toml")),
            Err(Error::Read { .. })
        ));
    }

    #[test]
    fn test_document_height() {
        let layout: Layout = toml::from_str(LAYOUT).unwrap();
        assert_eq!(layout.document_height(), 600.0);

        let mut tall = layout.clone();
        tall.headings.push(Heading::new("end", 2000.0, 50.0));
        assert_eq!(tall.document_height(), 2050.0);
    }

    #[test]
    fn test_lint_findings() {
        let layout = Layout {
            links: vec![
                TocLink::new("#intro"),
                TocLink::new("#intro"),
                TocLink::new("#missing"),
                TocLink::new("bare"),
                TocLink {
                    href: None,
                    label: Some("Broken".to_string()),
                    ..TocLink::new("")
                },
            ],
            headings: vec![
                Heading::new("intro", 0.0, 32.0),
                Heading::new("bare", 100.0, 32.0),
                Heading::new("bare", 200.0, 32.0),
            ],
            ..Layout::default()
        };

        let findings = layout.lint();
        assert_eq!(
            findings,
            vec![
                Finding::DuplicateSlug {
                    slug: "intro".to_string()
                },
                Finding::OrphanSlug {
                    slug: "missing".to_string()
                },
                Finding::NotAnAnchor {
                    href: "bare".to_string()
                },
                Finding::MissingHref {
                    label: "Broken".to_string()
                },
                Finding::DuplicateHeadingId {
                    id: "bare".to_string()
                },
            ]
        );
        assert_eq!(findings[1].to_string(), "#missing has no matching heading");
    }
}
