//! Site generation.
//!
//! Loads everything once, renders every output in memory, then writes. A dry
//! run ([`check`]) stops before the write step, so it exercises exactly the
//! same loading and rendering code as [`build`].
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                 # bio + post list
//! ├── 404.html
//! ├── hello-world/index.html     # one per post: bio, prev/next, comments
//! ├── about/index.html           # landing page ([landing].path)
//! ├── icons/github.svg           # glyphs linked from the landing page
//! ├── rss.xml                    # [feed].path, when enabled
//! ├── manifest.webmanifest       # when [manifest] is set
//! └── static/
//!     ├── avatar-50x50.jpg
//!     ├── avatar-50x50.webp
//!     └── 3f9a…/diagram.png      # files linked from posts
//! ```
//!
//! Every HTML page is a [`Document`] passed through [`inject_head_elements`]
//! right before it is serialized.

use crate::avatar::{self, AvatarError};
use crate::bio::render_bio;
use crate::config::{self, ConfigError, SiteConfig};
use crate::feed::{self, FeedError};
use crate::icons::IconGlyph;
use crate::landing::render_landing;
use crate::markdown::{self, MarkdownError, PageContext, Pipeline, TransformStep};
use crate::posts::{self, Post, PostError};
use crate::profile::{AvatarAsset, Profile, RenderError};
use crate::shell::{Document, HeadElement, head_elements, inject_head_elements};
use chrono::NaiveDate;
use maud::{Markup, PreEscaped, html};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Markdown error: {0}")]
    Markdown(#[from] MarkdownError),
    #[error("Post error: {0}")]
    Posts(#[from] PostError),
    #[error("Avatar error: {0}")]
    Avatar(#[from] AvatarError),
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} is produced by more than one page or asset")]
    OutputCollision(String),
    #[error("Failed to read manifest icon {path}: {source}")]
    ManifestIcon {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// What a build produced (or would produce, for [`check`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub title: String,
    pub posts: Vec<PostEntry>,
    /// HTML pages, output-relative, in write order.
    pub pages: Vec<String>,
    /// Non-HTML outputs, output-relative.
    pub assets: Vec<String>,
    /// Keys of the head elements injected into every page.
    pub head_keys: Vec<String>,
    pub avatar: Option<AvatarAsset>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostEntry {
    pub slug: String,
    pub title: String,
    pub date: NaiveDate,
    /// Page-relative files copied for this post.
    pub linked_files: Vec<String>,
}

const STYLE_CSS: &str = include_str!("../static/style.css");
const DATE_FORMAT: &str = "%B %d, %Y";

/// Build the site from `source` into `output_dir`.
pub fn build(source: &Path, output_dir: &Path) -> Result<BuildReport, GenerateError> {
    let site = Site::load(source)?;
    fs::create_dir_all(output_dir)?;
    let avatar = avatar::process_avatar(source, &site.config.avatar, output_dir)?;
    let rendered = site.render(avatar.as_ref())?;

    for file in &rendered.files {
        let dest = output_dir.join(&file.path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, &file.contents)?;
        debug!("wrote {}", file.path);
    }
    for copy in &rendered.copies {
        let dest = output_dir.join(&copy.dest);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&copy.source, &dest)?;
        debug!("copied {} → {}", copy.source.display(), copy.dest);
    }

    info!(
        "built {} pages and {} posts into {}",
        rendered.report.pages.len(),
        rendered.report.posts.len(),
        output_dir.display()
    );
    Ok(rendered.report)
}

/// Load and render the site from `source` without writing anything.
pub fn check(source: &Path) -> Result<BuildReport, GenerateError> {
    let site = Site::load(source)?;
    let avatar = avatar::inspect_avatar(source, &site.config.avatar)?;
    Ok(site.render(avatar.as_ref())?.report)
}

// ============================================================================
// Loading
// ============================================================================

/// Everything rendering needs, resolved up front.
struct Site {
    source: PathBuf,
    config: SiteConfig,
    profile: Profile,
    pipeline: Pipeline,
    head: Vec<HeadElement>,
    posts: Vec<Post>,
}

impl Site {
    fn load(source: &Path) -> Result<Self, GenerateError> {
        let config = config::load_config(source)?;
        let profile = Profile::from_config(&config)?;
        let pipeline = Pipeline::from_plugins(&config.markdown.plugins)?;
        let head = head_elements(&config.integrations, config.manifest.as_ref());
        let posts = posts::scan_posts(source)?;
        debug!(
            "loaded {} posts, {} markdown steps, {} head elements",
            posts.len(),
            pipeline.steps().len(),
            head.len()
        );
        Ok(Self {
            source: source.to_path_buf(),
            config,
            profile,
            pipeline,
            head,
            posts,
        })
    }

    fn render(&self, avatar: Option<&AvatarAsset>) -> Result<Rendered, GenerateError> {
        let mut out = Rendered::default();
        out.report.title = self.config.title.clone();
        out.report.head_keys = self.head.iter().map(|e| e.key.clone()).collect();
        out.report.avatar = avatar.cloned();
        if let Some(avatar) = avatar {
            out.report.assets.push(avatar.src.trim_start_matches('/').to_string());
            for (_, src) in &avatar.sources {
                out.report.assets.push(src.trim_start_matches('/').to_string());
            }
        }

        let bio = render_bio(&self.profile, avatar)?;

        out.page("index.html", self.page(render_index(&self.config, &bio, &self.posts)))?;
        out.page("404.html", self.page(render_not_found(&self.config)))?;

        let copies_files = self.pipeline.steps().contains(&TransformStep::CopyLinkedFiles);
        let rendered_posts: Vec<RenderedPost> = self
            .posts
            .par_iter()
            .enumerate()
            .map(|(idx, post)| {
                let older = self.posts.get(idx + 1);
                let newer = idx.checked_sub(1).and_then(|i| self.posts.get(i));
                self.render_post(post, &bio, older, newer, copies_files)
            })
            .collect();
        for (post, rendered) in self.posts.iter().zip(rendered_posts) {
            out.page(&format!("{}/index.html", post.slug), rendered.html)?;
            out.report.posts.push(PostEntry {
                slug: post.slug.clone(),
                title: post.title.clone(),
                date: post.date,
                linked_files: rendered.copies.iter().map(|(t, _)| t.clone()).collect(),
            });
            for (_, copy) in rendered.copies {
                out.copy(copy)?;
            }
        }

        if let Some(landing) = &self.config.landing {
            let doc = render_landing(&self.profile, landing)?
                .with_lang(&self.config.language)
                .with_description(&self.config.description);
            let dir = landing.path.trim_matches('/');
            out.page(&format!("{dir}/index.html"), self.page(doc))?;

            let used: HashSet<IconGlyph> = landing
                .links
                .iter()
                .filter_map(|link| link.icon.parse().ok())
                .collect();
            for glyph in IconGlyph::ALL.into_iter().filter(|g| used.contains(g)) {
                out.asset(
                    glyph.asset_path().trim_start_matches('/'),
                    glyph.svg_document(),
                )?;
            }
        }

        if self.config.feed.enabled {
            let xml = feed::render_feed(&self.config, &self.posts)?;
            out.asset(self.config.feed.path.trim_start_matches('/'), xml)?;
        }

        if let Some(manifest) = &self.config.manifest {
            let (json, icon) = self.render_manifest(manifest)?;
            out.asset("manifest.webmanifest", json)?;
            if let Some(icon) = icon {
                out.copy(icon)?;
            }
        }

        Ok(out)
    }

    /// Shell defaults shared by every page, then head injection.
    fn page(&self, doc: Document) -> String {
        let title = doc.title.clone();
        let description = doc.description.clone().unwrap_or_default();
        let doc = doc
            .with_lang(&self.config.language)
            .with_meta("og:title", &title)
            .with_meta("og:description", &description)
            .with_meta("og:type", "website")
            .with_meta("twitter:card", "summary")
            .with_meta("twitter:creator", &self.twitter_handle())
            .with_meta("twitter:title", &title)
            .with_meta("twitter:description", &description);
        inject_head_elements(doc, &self.head).render().into_string()
    }

    /// `[social] twitter` as an `@handle`, or empty.
    fn twitter_handle(&self) -> String {
        match self.config.social.get("twitter").map(|h| h.trim()) {
            Some("") | None => String::new(),
            Some(h) if h.starts_with('@') => h.to_string(),
            Some(h) => format!("@{h}"),
        }
    }

    fn render_post(
        &self,
        post: &Post,
        bio: &Markup,
        older: Option<&Post>,
        newer: Option<&Post>,
        copies_files: bool,
    ) -> RenderedPost {
        let raw = markdown::render_markdown(&post.body);
        let copies = if copies_files {
            self.linked_copies(post, &raw)
        } else {
            Vec::new()
        };
        let files: Vec<String> = copies.iter().map(|(target, _)| target.clone()).collect();
        let page = PageContext {
            slug: &post.slug,
            files: &files,
        };
        let body = self.pipeline.apply(&raw, &page);

        let url = format!("{}{}", self.config.base_url(), post.url());
        let content = html! {
            article.blog-post itemscope itemtype="http://schema.org/Article" {
                header {
                    h1 itemprop="headline" { (post.title) }
                    p { (post.date.format(DATE_FORMAT).to_string()) }
                }
                section itemprop="articleBody" { (PreEscaped(body)) }
                hr;
                footer { (bio) }
            }
            nav.blog-post-nav {
                ul {
                    li {
                        @if let Some(older) = older {
                            a href=(older.url()) rel="prev" { "← " (older.title) }
                        }
                    }
                    li {
                        @if let Some(newer) = newer {
                            a href=(newer.url()) rel="next" { (newer.title) " →" }
                        }
                    }
                }
            }
            @if let Some(shortname) = non_empty(&self.config.integrations.disqus.shortname) {
                (disqus_embed(shortname, &url, &post.slug))
            }
        };

        let doc = Document::new(
            format!("{} | {}", post.title, self.config.title),
            layout(&self.config, false, content),
        )
        .with_description(&post.excerpt())
        .with_css(STYLE_CSS);
        RenderedPost {
            html: self.page(doc),
            copies,
        }
    }

    /// Files linked from a post that exist next to it. Missing ones are
    /// logged and their links stay as written.
    fn linked_copies(&self, post: &Post, raw_html: &str) -> Vec<(String, LinkedCopy)> {
        markdown::linked_files(raw_html)
            .into_iter()
            .filter_map(|target| {
                let source = post.source_dir.join(&target);
                if !source.is_file() {
                    warn!("{}: linked file {target} not found", post.slug);
                    return None;
                }
                let dest = markdown::static_file(&post.slug, &target);
                Some((target, LinkedCopy { source, dest }))
            })
            .collect()
    }

    fn render_manifest(
        &self,
        manifest: &config::ManifestConfig,
    ) -> Result<(String, Option<LinkedCopy>), GenerateError> {
        let mut icons = Vec::new();
        let mut copy = None;
        if let Some(icon) = manifest.icon.as_deref().filter(|i| !i.trim().is_empty()) {
            let source = self.source.join(icon);
            if source.is_file() {
                let file_name = source
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| icon.to_string());
                let (mime, sizes) = icon_meta(&source)?;
                icons.push(serde_json::json!({
                    "src": format!("/{file_name}"),
                    "sizes": sizes,
                    "type": mime,
                }));
                copy = Some(LinkedCopy {
                    source,
                    dest: file_name,
                });
            } else {
                warn!("manifest icon {} not found", source.display());
            }
        }

        let short_name = if manifest.short_name.is_empty() {
            &manifest.name
        } else {
            &manifest.short_name
        };
        let json = serde_json::json!({
            "name": manifest.name,
            "short_name": short_name,
            "start_url": manifest.start_url,
            "background_color": manifest.background_color,
            "theme_color": manifest.theme_color,
            "display": manifest.display,
            "icons": icons,
        });
        Ok((serde_json::to_string_pretty(&json)?, copy))
    }
}

// ============================================================================
// Rendered output
// ============================================================================

#[derive(Default)]
struct Rendered {
    files: Vec<OutputFile>,
    copies: Vec<LinkedCopy>,
    report: BuildReport,
}

struct OutputFile {
    path: String,
    contents: String,
}

struct LinkedCopy {
    source: PathBuf,
    dest: String,
}

struct RenderedPost {
    html: String,
    copies: Vec<(String, LinkedCopy)>,
}

impl Rendered {
    fn page(&mut self, path: &str, html: String) -> Result<(), GenerateError> {
        self.claim(path)?;
        self.report.pages.push(path.to_string());
        self.files.push(OutputFile {
            path: path.to_string(),
            contents: html,
        });
        Ok(())
    }

    fn asset(&mut self, path: &str, contents: String) -> Result<(), GenerateError> {
        self.claim(path)?;
        self.report.assets.push(path.to_string());
        self.files.push(OutputFile {
            path: path.to_string(),
            contents,
        });
        Ok(())
    }

    /// Same source and destination twice is one copy.
    fn copy(&mut self, copy: LinkedCopy) -> Result<(), GenerateError> {
        if self
            .copies
            .iter()
            .any(|c| c.dest == copy.dest && c.source == copy.source)
        {
            return Ok(());
        }
        self.claim(&copy.dest)?;
        self.report.assets.push(copy.dest.clone());
        self.copies.push(copy);
        Ok(())
    }

    /// Reserve an output path, failing if something already writes there.
    fn claim(&self, path: &str) -> Result<(), GenerateError> {
        let taken = self.files.iter().any(|f| f.path == path)
            || self.copies.iter().any(|c| c.dest == path)
            || self.report.assets.iter().any(|a| a == path);
        if taken {
            return Err(GenerateError::OutputCollision(path.to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Header, main content and footer shared by the blog pages.
fn layout(config: &SiteConfig, is_root: bool, content: Markup) -> Markup {
    html! {
        div.global-wrapper data-is-root-path=(if is_root { "true" } else { "false" }) {
            header.global-header {
                @if is_root {
                    h1.main-heading { a href="/" { (config.title) } }
                } @else {
                    a.header-link-home href="/" { (config.title) }
                }
            }
            main { (content) }
            footer.global-footer {
                @if !config.author.name.trim().is_empty() {
                    "© " (config.author.name.trim()) ". "
                }
                "Built with folio"
            }
        }
    }
}

fn render_index(config: &SiteConfig, bio: &Markup, posts: &[Post]) -> Document {
    let content = html! {
        (bio)
        @if posts.is_empty() {
            p { "No blog posts found." }
        } @else {
            ol.post-list style="list-style: none" {
                @for post in posts {
                    li {
                        article.post-list-item itemscope itemtype="http://schema.org/Article" {
                            header {
                                h2 {
                                    a href=(post.url()) itemprop="url" {
                                        span itemprop="headline" { (post.title) }
                                    }
                                }
                                small { (post.date.format(DATE_FORMAT).to_string()) }
                            }
                            section {
                                p itemprop="description" { (post.excerpt()) }
                            }
                        }
                    }
                }
            }
        }
    };
    Document::new(&config.title, layout(config, true, content))
        .with_description(&config.description)
        .with_css(STYLE_CSS)
}

fn render_not_found(config: &SiteConfig) -> Document {
    let content = html! {
        h1 { "404: Not Found" }
        p { "You just hit a route that doesn't exist." }
    };
    Document::new(
        format!("404: Not Found | {}", config.title),
        layout(config, false, content),
    )
    .with_css(STYLE_CSS)
}

/// Comment thread container plus the loader for `shortname`.
fn disqus_embed(shortname: &str, url: &str, identifier: &str) -> Markup {
    let script = format!(
        "var disqus_config=function(){{this.page.url={};this.page.identifier={};}};\
         (function(){{var d=document,s=d.createElement('script');\
         s.src='https://{shortname}.disqus.com/embed.js';\
         s.setAttribute('data-timestamp',+new Date());\
         (d.head||d.body).appendChild(s);}})();",
        js_string(url),
        js_string(identifier),
    );
    html! {
        div #disqus_thread {}
        script { (PreEscaped(script)) }
    }
}

/// JS string literal safe to embed in an inline `<script>`.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace('<', "\\u003c")
}

fn icon_meta(path: &Path) -> Result<(&'static str, String), GenerateError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let mime = match ext.as_str() {
        "svg" => return Ok(("image/svg+xml", "any".to_string())),
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    };
    let (w, h) = image::image_dimensions(path).map_err(|source| GenerateError::ManifestIcon {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((mime, format!("{w}x{h}")))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// ============================================================================
// Tests
// ============================================================================
