//! RSS 2.0 feed of the blog posts.

use crate::config::SiteConfig;
use crate::posts::Post;
use chrono::NaiveTime;
use rss::validation::Validate;
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("RSS validation failed: {0}")]
    Invalid(String),
}

/// Render the feed channel for `posts`, newest first as given.
pub fn render_feed(config: &SiteConfig, posts: &[Post]) -> Result<String, FeedError> {
    let base = config.base_url();
    let items: Vec<rss::Item> = posts
        .iter()
        .map(|post| {
            let link = format!("{base}{}", post.url());
            let pub_date = post.date.and_time(NaiveTime::MIN).and_utc().to_rfc2822();
            ItemBuilder::default()
                .title(Some(post.title.clone()))
                .link(Some(link.clone()))
                .guid(GuidBuilder::default().permalink(true).value(link).build())
                .description(Some(post.excerpt()))
                .pub_date(Some(pub_date))
                .build()
        })
        .collect();

    let channel = ChannelBuilder::default()
        .title(config.title.clone())
        .link(format!("{base}/"))
        .description(config.description.clone())
        .language(Some(config.language.clone()))
        .generator(Some(format!("folio {}", env!("CARGO_PKG_VERSION"))))
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| FeedError::Invalid(e.to_string()))?;
    Ok(channel.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn config() -> SiteConfig {
        SiteConfig {
            title: "TechBlog".into(),
            description: "Personal writings about software technologies".into(),
            site_url: "https://jeromewu.github.io/".into(),
            ..SiteConfig::default()
        }
    }

    fn post(slug: &str, date: (i32, u32, u32), description: Option<&str>) -> Post {
        Post {
            slug: slug.into(),
            title: format!("Title of {slug}"),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            description: description.map(String::from),
            body: "Some *body* text.".into(),
            source_dir: PathBuf::from("blog"),
        }
    }

    #[test]
    fn channel_carries_site_metadata() {
        let xml = render_feed(&config(), &[]).unwrap();
        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        assert_eq!(channel.title(), "TechBlog");
        assert_eq!(channel.link(), "https://jeromewu.github.io/");
        assert_eq!(
            channel.description(),
            "Personal writings about software technologies"
        );
        assert_eq!(channel.language(), Some("en"));
        assert!(channel.items().is_empty());
    }

    #[test]
    fn items_have_permalink_guid_and_rfc2822_date() {
        let posts = vec![
            post("second", (2020, 10, 2), Some("The second one")),
            post("first", (2020, 10, 1), None),
        ];
        let xml = render_feed(&config(), &posts).unwrap();
        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        let items = channel.items();
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].title(), Some("Title of second"));
        assert_eq!(items[0].link(), Some("https://jeromewu.github.io/second/"));
        let guid = items[0].guid().unwrap();
        assert!(guid.is_permalink());
        assert_eq!(guid.value(), "https://jeromewu.github.io/second/");
        assert_eq!(items[0].description(), Some("The second one"));
        assert_eq!(items[0].pub_date(), Some("Fri, 2 Oct 2020 00:00:00 +0000"));

        assert_eq!(items[1].description(), Some("Some body text."));
    }

    #[test]
    fn missing_site_url_fails_validation() {
        let mut config = config();
        config.site_url = String::new();
        let err = render_feed(&config, &[post("a", (2021, 1, 1), None)]).unwrap_err();
        assert!(matches!(err, FeedError::Invalid(_)));
    }
}
