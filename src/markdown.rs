//! Markdown to HTML, followed by an ordered chain of HTML transforms.
//!
//! Conversion itself is pulldown-cmark. Everything a post needs on top of
//! plain CommonMark is a named [`TransformStep`] declared in `config.toml`:
//!
//! | `resolve` | Options | Effect |
//! |---|---|---|
//! | `images` | `max_width` (630) | lazy-load `<img>`, cap width in a `span.md-image` |
//! | `responsive-iframe` | `wrapper_style` | aspect-ratio wrapper for sized iframes |
//! | `prismjs` | (none) | `language-*` class on `<pre>`, `div.md-highlight` wrapper |
//! | `copy-linked-files` | (none) | relative file links → `/static/{hash}/{file}` |
//! | `smartypants` | (none) | curly quotes, dashes, ellipses in prose |
//!
//! Steps are pure `html -> html` functions applied left to right. The only
//! outside input is the [`PageContext`], which scopes copied file paths to
//! the page that links them and lists the linked files that actually exist.
//! Links to anything else are left as written.

use crate::config::PluginDecl;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use pulldown_cmark::{Options, Parser, html as md_html};
use regex::{Captures, Regex};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarkdownError {
    #[error("unknown markdown plugin {0:?}")]
    UnknownStep(String),
    #[error("invalid options for markdown plugin {step:?}: {source}")]
    InvalidOptions {
        step: String,
        #[source]
        source: toml::de::Error,
    },
}

/// The page a fragment is being transformed for.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub slug: &'a str,
    /// Decoded page-relative targets that will be copied next to the page.
    pub files: &'a [String],
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransformStep {
    Images { max_width: u32 },
    ResponsiveIframe { wrapper_style: String },
    Prism,
    CopyLinkedFiles,
    Smartypants,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ImagesOptions {
    #[serde(default = "default_max_width")]
    max_width: u32,
}

fn default_max_width() -> u32 {
    630
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct IframeOptions {
    #[serde(default)]
    wrapper_style: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NoOptions {}

impl TransformStep {
    pub fn from_plugin(decl: &PluginDecl) -> Result<Self, MarkdownError> {
        let options = || toml::Value::Table(decl.options.clone());
        let invalid = |source| MarkdownError::InvalidOptions {
            step: decl.resolve.clone(),
            source,
        };
        let step = match decl.resolve.as_str() {
            "images" => {
                let opts: ImagesOptions = options().try_into().map_err(invalid)?;
                TransformStep::Images {
                    max_width: opts.max_width,
                }
            }
            "responsive-iframe" => {
                let opts: IframeOptions = options().try_into().map_err(invalid)?;
                TransformStep::ResponsiveIframe {
                    wrapper_style: opts.wrapper_style,
                }
            }
            "prismjs" | "copy-linked-files" | "smartypants" => {
                let _: NoOptions = options().try_into().map_err(invalid)?;
                match decl.resolve.as_str() {
                    "prismjs" => TransformStep::Prism,
                    "copy-linked-files" => TransformStep::CopyLinkedFiles,
                    _ => TransformStep::Smartypants,
                }
            }
            other => return Err(MarkdownError::UnknownStep(other.to_string())),
        };
        Ok(step)
    }

    pub fn apply(&self, html: &str, page: &PageContext) -> String {
        match self {
            TransformStep::Images { max_width } => wrap_images(html, *max_width),
            TransformStep::ResponsiveIframe { wrapper_style } => wrap_iframes(html, wrapper_style),
            TransformStep::Prism => mark_code_blocks(html),
            TransformStep::CopyLinkedFiles => rewrite_linked_files(html, page),
            TransformStep::Smartypants => smarten(html),
        }
    }
}

/// An ordered transform chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    steps: Vec<TransformStep>,
}

impl Pipeline {
    /// Resolve plugin declarations in order. Any unknown name fails the whole chain.
    pub fn from_plugins(decls: &[PluginDecl]) -> Result<Self, MarkdownError> {
        let steps = decls
            .iter()
            .map(TransformStep::from_plugin)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[TransformStep] {
        &self.steps
    }

    pub fn apply(&self, html: &str, page: &PageContext) -> String {
        self.steps
            .iter()
            .fold(html.to_string(), |acc, step| step.apply(&acc, page))
    }
}

/// Convert markdown to HTML with GitHub-style extensions.
pub fn render_markdown(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    let parser = Parser::new_ext(text, options);
    let mut html = String::with_capacity(text.len() * 3 / 2);
    md_html::push_html(&mut html, parser);
    html
}

/// Markdown → HTML → transform chain.
pub fn transform(text: &str, pipeline: &Pipeline, page: &PageContext) -> String {
    pipeline.apply(&render_markdown(text), page)
}

// ============================================================================
// images
// ============================================================================

static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<img\s[^>]*>").expect("static regex"));

fn wrap_images(html: &str, max_width: u32) -> String {
    IMG_TAG
        .replace_all(html, |caps: &Captures| {
            let tag = &caps[0];
            let tag = if tag.contains(" loading=") {
                tag.to_string()
            } else {
                tag.replacen("<img", r#"<img loading="lazy""#, 1)
            };
            format!(r#"<span class="md-image" style="max-width: {max_width}px">{tag}</span>"#)
        })
        .into_owned()
}

// ============================================================================
// responsive-iframe
// ============================================================================

static IFRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(<iframe\b[^>]*>).*?</iframe>").expect("static regex")
});
static WIDTH_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\swidth="(\d+)""#).expect("static regex"));
static HEIGHT_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\sheight="(\d+)""#).expect("static regex"));

fn wrap_iframes(html: &str, wrapper_style: &str) -> String {
    IFRAME
        .replace_all(html, |caps: &Captures| {
            let open = &caps[1];
            let dim = |re: &Regex| {
                re.captures(open)
                    .and_then(|c| c[1].parse::<u32>().ok())
                    .filter(|v| *v > 0)
            };
            match (dim(&*WIDTH_ATTR), dim(&*HEIGHT_ATTR)) {
                (Some(w), Some(h)) => {
                    let ratio = f64::from(h) / f64::from(w) * 100.0;
                    let ratio = format!("{ratio:.4}");
                    let ratio = ratio.trim_end_matches('0').trim_end_matches('.');
                    let extra = wrapper_style.trim();
                    let style = if extra.is_empty() {
                        format!("padding-bottom: {ratio}%")
                    } else {
                        format!("padding-bottom: {ratio}%; {extra}")
                    };
                    format!(
                        r#"<div class="md-responsive-iframe" style="{}">{}</div>"#,
                        attr_escape(&style),
                        &caps[0]
                    )
                }
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn attr_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

// ============================================================================
// prismjs
// ============================================================================

static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<pre><code class="language-([A-Za-z0-9_+#.-]+)">(.*?)</code></pre>"#)
        .expect("static regex")
});

fn mark_code_blocks(html: &str) -> String {
    CODE_BLOCK
        .replace_all(html, |caps: &Captures| {
            let lang = &caps[1];
            format!(
                r#"<div class="md-highlight" data-language="{lang}"><pre class="language-{lang}"><code class="language-{lang}">{}</code></pre></div>"#,
                &caps[2]
            )
        })
        .into_owned()
}

// ============================================================================
// copy-linked-files
// ============================================================================

static LINKING_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:a|img|source|video|audio)\s[^>]*>").expect("static regex")
});
static LINK_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b(href|src)="([^"]*)""#).expect("static regex"));
static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").expect("static regex"));

const PAGE_EXTENSIONS: [&str; 3] = ["html", "htm", "md"];

/// Characters escaped in a published file name.
const URL_FILE_NAME: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Normalize a link target to a decoded page-relative file path, or `None`
/// if the target is not a linked file (absolute, external, anchor, page) or
/// would leave the post directory.
fn linked_file_target(target: &str) -> Option<String> {
    if target.is_empty()
        || target.starts_with('/')
        || target.starts_with('#')
        || target.starts_with('?')
        || SCHEME.is_match(target)
    {
        return None;
    }
    let path = target.split(['?', '#']).next().unwrap_or_default();
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    let path: &str = &decoded;
    let path = path.strip_prefix("./").unwrap_or(path);
    if path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|seg| seg == ".." || seg.contains(':'))
    {
        return None;
    }
    let file_name = path.rsplit('/').next().unwrap_or_default();
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() || PAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
        return None;
    }
    Some(path.to_string())
}

/// Output-relative path a linked file is copied to. `target` is decoded.
pub fn static_file(slug: &str, target: &str) -> String {
    let (dir, file_name) = static_parts(slug, target);
    format!("static/{dir}/{file_name}")
}

/// Site-absolute URL of [`static_file`], with the file name percent-encoded.
pub fn static_path(slug: &str, target: &str) -> String {
    let (dir, file_name) = static_parts(slug, target);
    format!("/static/{dir}/{}", utf8_percent_encode(file_name, URL_FILE_NAME))
}

fn static_parts<'t>(slug: &str, target: &'t str) -> (String, &'t str) {
    let digest = Sha256::digest(format!("{slug}/{target}").as_bytes());
    let hex = format!("{digest:x}");
    let file_name = target.rsplit('/').next().unwrap_or(target);
    (hex[..16].to_string(), file_name)
}

/// Decoded page-relative files linked from `html`, in first-seen order.
/// `copy-linked-files` rewrites the ones listed in [`PageContext::files`].
pub fn linked_files(html: &str) -> Vec<String> {
    let mut files: Vec<String> = Vec::new();
    for tag in LINKING_TAG.find_iter(html) {
        for caps in LINK_ATTR.captures_iter(tag.as_str()) {
            if let Some(target) = linked_file_target(&caps[2]) {
                if !files.contains(&target) {
                    files.push(target);
                }
            }
        }
    }
    files
}

fn rewrite_linked_files(html: &str, page: &PageContext) -> String {
    LINKING_TAG
        .replace_all(html, |tag: &Captures| {
            LINK_ATTR
                .replace_all(&tag[0], |caps: &Captures| match linked_file_target(&caps[2]) {
                    Some(target) if page.files.contains(&target) => {
                        format!(r#"{}="{}""#, &caps[1], static_path(page.slug, &target))
                    }
                    _ => caps[0].to_string(),
                })
                .into_owned()
        })
        .into_owned()
}

// ============================================================================
// smartypants
// ============================================================================

const RAW_TEXT_TAGS: [&str; 5] = ["pre", "code", "kbd", "script", "style"];

/// Typographic punctuation for text outside tags and raw-text elements.
fn smarten(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut raw_depth = 0usize;
    // Last emitted text character, carried across inline tags.
    let mut prev: Option<char> = None;
    let mut rest = html;

    while !rest.is_empty() {
        if rest.starts_with('<') {
            let end = rest.find('>').map(|i| i + 1).unwrap_or(rest.len());
            let tag = &rest[..end];
            let (closing, name) = tag_name(tag);
            if RAW_TEXT_TAGS.contains(&name.as_str()) {
                if closing {
                    raw_depth = raw_depth.saturating_sub(1);
                } else if !tag.ends_with("/>") {
                    raw_depth += 1;
                }
            }
            if matches!(name.as_str(), "p" | "li" | "br" | "div" | "td" | "th" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote") {
                prev = None;
            }
            out.push_str(tag);
            rest = &rest[end..];
            continue;
        }
        let end = rest.find('<').unwrap_or(rest.len());
        let text = &rest[..end];
        if raw_depth > 0 {
            out.push_str(text);
        } else {
            smarten_text(text, &mut prev, &mut out);
        }
        rest = &rest[end..];
    }
    out
}

fn tag_name(tag: &str) -> (bool, String) {
    let inner = tag.trim_start_matches('<');
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    let name = inner
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    (closing, name)
}

fn opens_quote(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, '(' | '[' | '{' | '—' | '–' | '“' | '‘'),
    }
}

fn smarten_text(text: &str, prev: &mut Option<char>, out: &mut String) {
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        let (emit, consumed) = if rest.starts_with("---") {
            ('—', 3)
        } else if rest.starts_with("--") {
            ('–', 2)
        } else if rest.starts_with("...") {
            ('…', 3)
        } else if rest.starts_with("&quot;") {
            (if opens_quote(*prev) { '“' } else { '”' }, 6)
        } else if rest.starts_with("&#39;") {
            (if opens_quote(*prev) { '‘' } else { '’' }, 5)
        } else if c == '"' {
            (if opens_quote(*prev) { '“' } else { '”' }, 1)
        } else if c == '\'' {
            (if opens_quote(*prev) { '‘' } else { '’' }, 1)
        } else if c == '&' {
            // Pass other entities through untouched.
            let len = rest.find(';').filter(|i| *i <= 10).map(|i| i + 1).unwrap_or(1);
            out.push_str(&rest[..len]);
            *prev = Some('&');
            rest = &rest[len..];
            continue;
        } else {
            (c, c.len_utf8())
        };
        out.push(emit);
        *prev = Some(emit);
        rest = &rest[consumed..];
    }
}
