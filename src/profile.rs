//! Identity data shared by the bio and landing renderers.
//!
//! A [`Profile`] is built once from [`SiteConfig`] and never mutated. The
//! renderers borrow it; nothing here performs I/O.

use crate::config::SiteConfig;
use crate::icons::{IconGlyph, UnknownIcon};
use thiserror::Error;

/// Errors raised while turning profile data into markup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error(transparent)]
    UnknownIcon(#[from] UnknownIcon),
    #[error("duplicate icon {0:?} in social links")]
    DuplicateIcon(String),
    #[error("link {alt:?} has an empty href")]
    EmptyHref { alt: String },
}

/// A social link shown as an icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialLink {
    pub label: String,
    pub url: String,
    /// Icon id, resolved against [`IconGlyph`](crate::icons::IconGlyph) at render time.
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub summary: String,
    social_links: Vec<SocialLink>,
}

impl Profile {
    /// Build a profile, rejecting links that resolve to the same glyph.
    ///
    /// Aliases count as the same icon. Unknown ids are compared verbatim and
    /// left for the renderer to reject.
    pub fn new(
        name: impl Into<String>,
        summary: impl Into<String>,
        social_links: Vec<SocialLink>,
    ) -> Result<Self, RenderError> {
        let keys: Vec<&str> = social_links.iter().map(|l| icon_key(&l.icon)).collect();
        for (i, key) in keys.iter().enumerate() {
            if keys[..i].contains(key) {
                return Err(RenderError::DuplicateIcon(social_links[i].icon.clone()));
            }
        }
        Ok(Self {
            name: name.into(),
            summary: summary.into(),
            social_links,
        })
    }

    pub fn from_config(config: &SiteConfig) -> Result<Self, RenderError> {
        let links = config
            .links
            .iter()
            .map(|l| SocialLink {
                label: l.label.clone(),
                url: l.url.clone(),
                icon: l.icon.clone(),
            })
            .collect();
        Self::new(
            config.author.name.trim(),
            config.author.summary.trim(),
            links,
        )
    }

    /// Social links in display order.
    pub fn social_links(&self) -> &[SocialLink] {
        &self.social_links
    }
}

fn icon_key(icon: &str) -> &str {
    match icon.parse::<IconGlyph>() {
        Ok(glyph) => glyph.slug(),
        Err(_) => icon,
    }
}

/// A processed profile picture.
///
/// Produced by [`avatar::process_avatar`](crate::avatar::process_avatar);
/// renderers only read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarAsset {
    /// Fallback image URL (JPEG).
    pub src: String,
    /// Additional formats as `(mime type, url)`, best first.
    pub sources: Vec<(String, String)>,
    pub width: u32,
    pub height: u32,
    pub quality: u32,
}
