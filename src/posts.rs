//! Blog post discovery.
//!
//! Posts live under `content/blog/` in one of two shapes:
//!
//! ```text
//! content/blog/
//! ├── hello-world/
//! │   ├── index.md          # slug "hello-world"; siblings can be linked
//! │   └── diagram.png
//! └── short-note.md         # slug "short-note"
//! ```
//!
//! Each file starts with YAML front matter:
//!
//! ```text
//! ---
//! title: Hello World
//! date: "2020-10-01"
//! description: Optional summary for the index and feed
//! draft: false
//! ---
//! ```

use chrono::{DateTime, NaiveDate};
use pulldown_cmark::{Event, Parser, TagEnd};
use serde::Deserialize;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

const EXCERPT_CHARS: usize = 160;

#[derive(Error, Debug)]
pub enum PostError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{0}: missing front matter (expected a leading '---' block)")]
    MissingFrontMatter(PathBuf),
    #[error("{path}: invalid front matter: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{path}: invalid date {value:?} (expected YYYY-MM-DD or RFC 3339)")]
    InvalidDate { path: PathBuf, value: String },
    #[error("duplicate post slug {0:?}")]
    DuplicateSlug(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// URL path segment(s), e.g. `hello-world`.
    pub slug: String,
    pub title: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    /// Markdown body without front matter.
    pub body: String,
    /// Directory the post's linked files are resolved against.
    pub source_dir: PathBuf,
}

impl Post {
    /// Site-absolute URL of the post page.
    pub fn url(&self) -> String {
        format!("/{}/", self.slug)
    }

    /// Description, or the opening of the body as plain text.
    pub fn excerpt(&self) -> String {
        match &self.description {
            Some(d) if !d.trim().is_empty() => d.trim().to_string(),
            _ => truncate_chars(&plain_text(&self.body), EXCERPT_CHARS),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FrontMatter {
    title: String,
    date: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    draft: bool,
}

/// Scan `{content_root}/blog` for posts, newest first.
///
/// A missing blog directory yields no posts.
pub fn scan_posts(content_root: &Path) -> Result<Vec<Post>, PostError> {
    let blog_dir = content_root.join("blog");
    if !blog_dir.is_dir() {
        debug!("no blog directory at {}", blog_dir.display());
        return Ok(Vec::new());
    }

    let mut posts = Vec::new();
    for entry in WalkDir::new(&blog_dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|e| e != "md") {
            continue;
        }
        let Some(slug) = slug_for(&blog_dir, path) else {
            continue;
        };
        let content = fs::read_to_string(path)?;
        match parse_post(path, slug, &content)? {
            Some(post) => posts.push(post),
            None => debug!("skipping draft {}", path.display()),
        }
    }

    let mut seen = HashSet::new();
    for post in &posts {
        if !seen.insert(post.slug.as_str()) {
            return Err(PostError::DuplicateSlug(post.slug.clone()));
        }
    }
    posts.sort_by_key(|p| (Reverse(p.date), p.slug.clone()));
    Ok(posts)
}

/// `blog/a/b/index.md` → `a/b`; `blog/a/note.md` → `a/note`.
fn slug_for(blog_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(blog_dir).ok()?;
    let stem_path = if relative.file_name()? == "index.md" {
        relative.parent()?.to_path_buf()
    } else {
        relative.with_extension("")
    };
    let parts: Vec<String> = stem_path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Parse one post file. Returns `Ok(None)` for drafts.
pub fn parse_post(path: &Path, slug: String, content: &str) -> Result<Option<Post>, PostError> {
    let (yaml, body) = split_front_matter(content)
        .ok_or_else(|| PostError::MissingFrontMatter(path.to_path_buf()))?;
    let front: FrontMatter =
        serde_yaml::from_str(yaml).map_err(|source| PostError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?;
    if front.draft {
        return Ok(None);
    }
    let date = parse_date(&front.date).ok_or_else(|| PostError::InvalidDate {
        path: path.to_path_buf(),
        value: front.date.clone(),
    })?;
    Ok(Some(Post {
        slug,
        title: front.title.trim().to_string(),
        date,
        description: front.description.filter(|d| !d.trim().is_empty()),
        body: body.to_string(),
        source_dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
    }))
}

/// Split `---\n<yaml>\n---\n<body>`.
fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = content
        .strip_prefix("---\r\n")
        .or_else(|| content.strip_prefix("---\n"))?;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|d| d.date_naive()))
}

/// Markdown reduced to its text content, blocks separated by spaces.
pub fn plain_text(markdown: &str) -> String {
    let mut text = String::new();
    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item) => text.push(' '),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", text[..idx].trim_end()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn post_md(title: &str, date: &str) -> String {
        format!("---\ntitle: {title}\ndate: \"{date}\"\n---\n\nBody of {title}.\n")
    }

    #[test]
    fn split_front_matter_basic() {
        let (yaml, body) = split_front_matter("---\ntitle: x\n---\nhello\n").unwrap();
        assert_eq!(yaml, "title: x\n");
        assert_eq!(body, "hello\n");
    }

    #[test]
    fn split_front_matter_crlf() {
        let (yaml, body) = split_front_matter("---\r\ntitle: x\r\n---\r\nhello").unwrap();
        assert_eq!(yaml, "title: x\r\n");
        assert_eq!(body, "hello");
    }

    #[test]
    fn split_front_matter_missing() {
        assert!(split_front_matter("# no front matter").is_none());
        assert!(split_front_matter("---\ntitle: unterminated\n").is_none());
    }

    #[test]
    fn parse_date_formats() {
        assert_eq!(parse_date("2020-10-01"), NaiveDate::from_ymd_opt(2020, 10, 1));
        assert_eq!(
            parse_date("2020-10-01T22:12:03.284Z"),
            NaiveDate::from_ymd_opt(2020, 10, 1)
        );
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn parse_post_reads_front_matter() {
        let content = "---\ntitle: Hello\ndate: 2020-10-01\ndescription: First post\n---\n# Hi\n";
        let post = parse_post(Path::new("blog/hello/index.md"), "hello".into(), content)
            .unwrap()
            .unwrap();
        assert_eq!(post.title, "Hello");
        assert_eq!(post.date, NaiveDate::from_ymd_opt(2020, 10, 1).unwrap());
        assert_eq!(post.description.as_deref(), Some("First post"));
        assert_eq!(post.body, "# Hi\n");
        assert_eq!(post.source_dir, PathBuf::from("blog/hello"));
        assert_eq!(post.url(), "/hello/");
    }

    #[test]
    fn parse_post_skips_drafts() {
        let content = "---\ntitle: WIP\ndate: 2020-10-01\ndraft: true\n---\n";
        assert!(parse_post(Path::new("x.md"), "x".into(), content).unwrap().is_none());
    }

    #[test]
    fn parse_post_requires_title() {
        let content = "---\ndate: 2020-10-01\n---\n";
        let err = parse_post(Path::new("x.md"), "x".into(), content).unwrap_err();
        assert!(matches!(err, PostError::FrontMatter { .. }));
    }

    #[test]
    fn parse_post_rejects_bad_date() {
        let content = "---\ntitle: T\ndate: soon\n---\n";
        let err = parse_post(Path::new("x.md"), "x".into(), content).unwrap_err();
        assert!(matches!(err, PostError::InvalidDate { value, .. } if value == "soon"));
    }

    #[test]
    fn scan_posts_without_blog_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(scan_posts(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn scan_posts_both_layouts_newest_first() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "blog/hello-world/index.md", &post_md("Hello", "2020-10-01"));
        write(tmp.path(), "blog/hello-world/diagram.png", "not really a png");
        write(tmp.path(), "blog/short-note.md", &post_md("Note", "2021-01-15"));
        write(tmp.path(), "blog/notes/deep.md", &post_md("Deep", "2020-10-01"));

        let posts = scan_posts(tmp.path()).unwrap();
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["short-note", "hello-world", "notes/deep"]);
        assert_eq!(posts[1].source_dir, tmp.path().join("blog/hello-world"));
    }

    #[test]
    fn scan_posts_detects_duplicate_slugs() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "blog/same/index.md", &post_md("A", "2020-01-01"));
        write(tmp.path(), "blog/same.md", &post_md("B", "2021-01-01"));
        let err = scan_posts(tmp.path()).unwrap_err();
        assert!(matches!(err, PostError::DuplicateSlug(slug) if slug == "same"));
    }

    #[test]
    fn excerpt_prefers_description() {
        let mut post = parse_post(
            Path::new("x.md"),
            "x".into(),
            "---\ntitle: T\ndate: 2020-01-01\n---\nSome *body* text.\n\nMore.",
        )
        .unwrap()
        .unwrap();
        assert_eq!(post.excerpt(), "Some body text. More.");
        post.description = Some("Summary".into());
        assert_eq!(post.excerpt(), "Summary");
    }

    #[test]
    fn excerpt_truncates_long_bodies() {
        let body = "word ".repeat(100);
        let text = truncate_chars(&plain_text(&body), EXCERPT_CHARS);
        assert!(text.ends_with('…'));
        assert!(text.chars().count() <= EXCERPT_CHARS + 1);
    }
}
