//! The closed set of icon glyphs used by the bio and landing renderers.
//!
//! Glyphs are resolved from configuration strings with [`str::parse`]; any
//! id outside the set is an error rather than a broken image. Each glyph
//! ships its own simplified 24×24 vector artwork, rendered inline in the bio
//! and written to `/icons/{slug}.svg` for the landing page.

use maud::{Markup, PreEscaped, html};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown icon {0:?} (expected one of: github, linkedin, medium, file, resume, twitter)")]
pub struct UnknownIcon(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconGlyph {
    Github,
    Linkedin,
    Medium,
    /// Document glyph, used for résumé links.
    File,
    Twitter,
}

impl IconGlyph {
    pub const ALL: [IconGlyph; 5] = [
        IconGlyph::Github,
        IconGlyph::Linkedin,
        IconGlyph::Medium,
        IconGlyph::File,
        IconGlyph::Twitter,
    ];

    /// Canonical id, also the asset file stem.
    pub fn slug(self) -> &'static str {
        match self {
            IconGlyph::Github => "github",
            IconGlyph::Linkedin => "linkedin",
            IconGlyph::Medium => "medium",
            IconGlyph::File => "file",
            IconGlyph::Twitter => "twitter",
        }
    }

    /// Site-absolute URL of the standalone SVG asset.
    pub fn asset_path(self) -> String {
        format!("/icons/{}.svg", self.slug())
    }

    fn shapes(self) -> &'static str {
        match self {
            IconGlyph::Github => concat!(
                r##"<rect x="1" y="1" width="22" height="22" rx="4"/>"##,
                r##"<path fill="#fff" d="M12 5.2a6.8 6.8 0 0 0-2.15 13.25c.34.06.46-.15.46-.33v-1.2c-1.9.41-2.3-.9-2.3-.9-.31-.79-.76-1-.76-1-.62-.42.05-.41.05-.41.68.05 1.04.7 1.04.7.61 1.04 1.6.74 1.99.57.06-.44.24-.74.43-.91-1.51-.17-3.1-.76-3.1-3.37 0-.74.27-1.35.7-1.83-.07-.17-.3-.87.07-1.8 0 0 .57-.18 1.87.7a6.5 6.5 0 0 1 3.4 0c1.3-.88 1.87-.7 1.87-.7.37.93.14 1.63.07 1.8.44.48.7 1.09.7 1.83 0 2.62-1.6 3.2-3.12 3.36.25.21.46.63.46 1.27v1.88c0 .18.12.4.47.33A6.8 6.8 0 0 0 12 5.2z"/>"##,
            ),
            IconGlyph::Linkedin => concat!(
                r##"<rect x="1" y="1" width="22" height="22" rx="3"/>"##,
                r##"<path fill="#fff" d="M5.5 9.5h2.8V18H5.5zM6.9 5.3a1.6 1.6 0 1 1 0 3.2 1.6 1.6 0 0 1 0-3.2zM10.1 9.5h2.7v1.2c.38-.7 1.3-1.4 2.66-1.4 2.84 0 3.36 1.87 3.36 4.3V18h-2.8v-3.9c0-.93-.02-2.13-1.3-2.13-1.3 0-1.5 1.02-1.5 2.06V18h-2.8z"/>"##,
            ),
            IconGlyph::Medium => concat!(
                r##"<circle cx="6.8" cy="12" r="5.6"/>"##,
                r##"<ellipse cx="16.2" cy="12" rx="2.9" ry="5.3"/>"##,
                r##"<ellipse cx="21.3" cy="12" rx="1.1" ry="4.8"/>"##,
            ),
            IconGlyph::File => concat!(
                r##"<path d="M5 1.5h9.5L20 7v15.5H5z"/>"##,
                r##"<path fill="#fff" d="M14 2.5V7.5h5zM8 11h9v1.4H8zM8 14h9v1.4H8zM8 17h6v1.4H8z"/>"##,
            ),
            IconGlyph::Twitter => {
                r##"<path d="M23 5.1a9 9 0 0 1-2.6.7 4.5 4.5 0 0 0 2-2.5 9 9 0 0 1-2.9 1.1 4.5 4.5 0 0 0-7.7 4.1A12.8 12.8 0 0 1 2.5 3.8a4.5 4.5 0 0 0 1.4 6 4.5 4.5 0 0 1-2-.6v.1a4.5 4.5 0 0 0 3.6 4.4 4.5 4.5 0 0 1-2 .1 4.5 4.5 0 0 0 4.2 3.1A9 9 0 0 1 1 18.8a12.8 12.8 0 0 0 6.9 2c8.3 0 12.8-6.9 12.8-12.8v-.6A9 9 0 0 0 23 5.1z"/>"##
            }
        }
    }

    /// Inline SVG for embedding in a fragment.
    pub fn svg(self, size: &str, color: &str) -> Markup {
        html! {
            svg viewBox="0 0 24 24" width=(size) height=(size) fill=(color)
                role="img" aria-hidden="true" focusable="false" {
                (PreEscaped(self.shapes()))
            }
        }
    }

    /// Standalone SVG document for the `/icons/*.svg` asset files.
    pub fn svg_document(self) -> String {
        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" width="48" height="48" fill="#4f5969">{}</svg>
"##,
            self.shapes()
        )
    }
}

impl fmt::Display for IconGlyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for IconGlyph {
    type Err = UnknownIcon;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(IconGlyph::Github),
            "linkedin" => Ok(IconGlyph::Linkedin),
            "medium" => Ok(IconGlyph::Medium),
            "file" | "resume" => Ok(IconGlyph::File),
            "twitter" => Ok(IconGlyph::Twitter),
            other => Err(UnknownIcon(other.to_string())),
        }
    }
}
