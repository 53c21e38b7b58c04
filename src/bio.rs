//! Author bio fragment shown on the blog index and under every post.
//!
//! ```text
//! div.bio
//! ├── picture.bio-avatar        (only when an avatar was processed)
//! └── div.bio-intro
//!     ├── p  "Written by <strong>name</strong><br> summary"   (only with a name)
//!     └── p.bio-icons           (one a.bio-icon per social link, in order)
//! ```

use crate::icons::IconGlyph;
use crate::profile::{AvatarAsset, Profile, RenderError};
use maud::{Markup, html};

const ICON_SIZE: &str = "1.5em";
const ICON_COLOR: &str = "#4f5969";

/// Render the bio for `profile`.
///
/// Every icon is resolved before any markup is produced, so an unknown icon
/// id yields an error and no partial fragment.
pub fn render_bio(profile: &Profile, avatar: Option<&AvatarAsset>) -> Result<Markup, RenderError> {
    let links = profile
        .social_links()
        .iter()
        .map(|link| -> Result<_, RenderError> { Ok((link, link.icon.parse::<IconGlyph>()?)) })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(html! {
        div.bio {
            @if let Some(avatar) = avatar {
                (render_avatar(avatar))
            }
            div.bio-intro {
                @if !profile.name.is_empty() {
                    p {
                        "Written by "
                        strong { (profile.name) }
                        br;
                        @if !profile.summary.is_empty() {
                            " " (profile.summary)
                        }
                    }
                }
                @if !links.is_empty() {
                    p.bio-icons {
                        @for (link, glyph) in &links {
                            a.bio-icon href=(link.url) rel="noopener noreferrer" target="_blank"
                                aria-label=(aria_label(&link.label, *glyph)) {
                                (glyph.svg(ICON_SIZE, ICON_COLOR))
                            }
                        }
                    }
                }
            }
        }
    })
}

fn render_avatar(avatar: &AvatarAsset) -> Markup {
    html! {
        picture.bio-avatar {
            @for (mime, src) in &avatar.sources {
                source type=(mime) srcset=(src);
            }
            img src=(avatar.src) width=(avatar.width) height=(avatar.height)
                alt="Profile picture" decoding="async";
        }
    }
}

fn aria_label(label: &str, glyph: IconGlyph) -> String {
    if label.is_empty() {
        glyph.slug().to_string()
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::SocialLink;

    fn link(icon: &str, url: &str) -> SocialLink {
        SocialLink {
            label: String::new(),
            url: url.to_string(),
            icon: icon.to_string(),
        }
    }

    fn sample_profile() -> Profile {
        Profile::new(
            "Jerome Wu",
            "Personal writings about software technologies",
            vec![
                link("github", "https://github.com/jeromewu"),
                link("linkedin", "https://www.linkedin.com/in/wenchiehwu/"),
                link("medium", "https://medium.com/@jeromewus"),
                link("file", "https://jeromewu.github.io/doc/resume.pdf"),
            ],
        )
        .unwrap()
    }

    fn sample_avatar() -> AvatarAsset {
        AvatarAsset {
            src: "/static/avatar-50x50.jpg".into(),
            sources: vec![("image/webp".into(), "/static/avatar-50x50.webp".into())],
            width: 50,
            height: 50,
            quality: 95,
        }
    }

    #[test]
    fn renders_name_and_summary() {
        let html = render_bio(&sample_profile(), None).unwrap().into_string();
        assert!(html.contains("Written by <strong>Jerome Wu</strong><br>"));
        assert!(html.contains("Personal writings about software technologies"));
    }

    #[test]
    fn empty_name_omits_written_by() {
        let profile = Profile::new("", "summary only", vec![]).unwrap();
        let html = render_bio(&profile, None).unwrap().into_string();
        assert!(!html.contains("Written by"));
        assert!(!html.contains("summary only"));
    }

    #[test]
    fn empty_summary_is_omitted() {
        let profile = Profile::new("Jerome", "", vec![]).unwrap();
        let html = render_bio(&profile, None).unwrap().into_string();
        assert!(html.contains("<p>Written by <strong>Jerome</strong><br></p>"));
    }

    #[test]
    fn absent_avatar_renders_no_image() {
        let html = render_bio(&sample_profile(), None).unwrap().into_string();
        assert!(!html.contains("<img"));
        assert!(!html.contains("<picture"));
    }

    #[test]
    fn avatar_renders_picture_with_sources() {
        let html = render_bio(&sample_profile(), Some(&sample_avatar()))
            .unwrap()
            .into_string();
        assert!(html.contains(r#"<picture class="bio-avatar">"#));
        assert!(html.contains(r#"<source type="image/webp" srcset="/static/avatar-50x50.webp">"#));
        assert!(html.contains(r#"src="/static/avatar-50x50.jpg" width="50" height="50""#));
        assert!(html.contains(r#"alt="Profile picture""#));
    }

    #[test]
    fn links_keep_configured_order() {
        let profile = Profile::new(
            "",
            "",
            vec![
                link("medium", "https://m.example"),
                link("github", "https://g.example"),
                link("twitter", "https://t.example"),
            ],
        )
        .unwrap();
        let html = render_bio(&profile, None).unwrap().into_string();
        let positions: Vec<usize> = ["https://m.example", "https://g.example", "https://t.example"]
            .iter()
            .map(|url| html.find(url).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn links_open_in_new_context_without_referrer() {
        let html = render_bio(&sample_profile(), None).unwrap().into_string();
        assert_eq!(html.matches(r#"class="bio-icon""#).count(), 4);
        assert_eq!(html.matches(r#"rel="noopener noreferrer""#).count(), 4);
        assert_eq!(html.matches(r#"target="_blank""#).count(), 4);
    }

    #[test]
    fn aria_label_falls_back_to_slug() {
        let html = render_bio(&sample_profile(), None).unwrap().into_string();
        assert!(html.contains(r#"aria-label="github""#));

        let labelled = Profile::new(
            "",
            "",
            vec![SocialLink {
                label: "My résumé".into(),
                url: "/doc/resume.pdf".into(),
                icon: "resume".into(),
            }],
        )
        .unwrap();
        let html = render_bio(&labelled, None).unwrap().into_string();
        assert!(html.contains(r#"aria-label="My résumé""#));
    }

    #[test]
    fn unknown_icon_is_error() {
        let profile = Profile::new("A", "", vec![link("twitter-x", "https://x.com/a")]).unwrap();
        let err = render_bio(&profile, None).unwrap_err();
        assert!(matches!(err, RenderError::UnknownIcon(_)));
    }

    #[test]
    fn no_links_renders_no_icon_row() {
        let profile = Profile::new("A", "", vec![]).unwrap();
        let html = render_bio(&profile, None).unwrap().into_string();
        assert!(!html.contains("bio-icons"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let profile = sample_profile();
        let avatar = sample_avatar();
        let a = render_bio(&profile, Some(&avatar)).unwrap().into_string();
        let b = render_bio(&profile, Some(&avatar)).unwrap().into_string();
        assert_eq!(a, b);
    }

    #[test]
    fn escapes_profile_text() {
        let profile = Profile::new("<b>me</b>", "", vec![]).unwrap();
        let html = render_bio(&profile, None).unwrap().into_string();
        assert!(html.contains("&lt;b&gt;me&lt;/b&gt;"));
    }
}
