//! Standalone landing page: name, a row of icon links, job title, location
//! and the icon attribution footer.
//!
//! The page links to the glyph assets under `/icons/`; the build writes those
//! files from [`IconGlyph::svg_document`].

use crate::config::LandingConfig;
use crate::icons::IconGlyph;
use crate::profile::{Profile, RenderError};
use crate::shell::Document;
use maud::{Markup, PreEscaped, html};

const LANDING_CSS: &str = include_str!("../static/landing.css");

/// Attribution for the icon artwork, in footer order.
pub const ICON_CREDITS: [(&str, &str); 3] = [
    ("simpleicon", "https://www.flaticon.com/authors/simpleicon"),
    ("freepik", "https://www.freepik.com/"),
    ("www.flaticon.com", "http://www.flaticon.com/"),
];

/// Render the landing page for `profile`.
///
/// Links are validated up front: an empty `href` or an unknown icon fails
/// the whole page.
pub fn render_landing(profile: &Profile, page: &LandingConfig) -> Result<Document, RenderError> {
    let mut links = Vec::with_capacity(page.links.len());
    for link in &page.links {
        if link.href.trim().is_empty() {
            return Err(RenderError::EmptyHref {
                alt: link.alt.clone(),
            });
        }
        let glyph: IconGlyph = link.icon.parse()?;
        let alt = if link.alt.is_empty() {
            glyph.slug().to_string()
        } else {
            link.alt.clone()
        };
        links.push((link.href.as_str(), glyph, alt));
    }

    let name = page.name.as_deref().unwrap_or(&profile.name);

    let body = html! {
        div.app {
            div.main {
                @if !name.is_empty() {
                    p.name { (name) }
                }
                div.imgs {
                    @for (href, glyph, alt) in &links {
                        a href=(href) target="_blank" rel="noopener noreferrer" {
                            img.img-button src=(glyph.asset_path()) alt=(alt);
                        }
                    }
                }
                @if !page.job_title.is_empty() {
                    p.job-title { (page.job_title) }
                }
                @if !page.location.is_empty() {
                    p.location { (page.location) }
                }
            }
            (footer())
        }
    };

    let title = if name.is_empty() { "Home" } else { name };
    Ok(Document::new(title, body)
        .with_css(LANDING_CSS)
        .with_body_class("landing"))
}

fn footer() -> Markup {
    let [author_a, author_b, site] = ICON_CREDITS;
    html! {
        div.footer {
            "Icon made by" (PreEscaped("&nbsp;"))
            a href=(author_a.1) { (author_a.0) }
            ","
            a href=(author_b.1) { (author_b.0) }
            (PreEscaped("&nbsp;")) "from" (PreEscaped("&nbsp;"))
            a href=(site.1) { (site.0) }
        }
    }
}
