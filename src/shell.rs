//! Document shell and head injection.
//!
//! Every page is assembled as a [`Document`]: a title, inline CSS and a
//! rendered body. Third-party integrations (analytics, ads, fonts, the web
//! manifest) are described as keyed [`HeadElement`]s and appended with
//! [`inject_head_elements`], which never touches the body and never adds the
//! same key twice.
//!
//! ## Injection Order
//!
//! ```text
//! google-analytics-init   inline queue snippet   (tracking_id)
//! google-analytics        analytics.js, async    (tracking_id)
//! google-adsense          adsbygoogle.js, async  (publisher_id)
//! web-fonts               Google Fonts stylesheet (families)
//! web-manifest            <link rel="manifest">  ([manifest])
//! ```
//!
//! An integration whose identifier is missing contributes no elements; the
//! others keep their relative order.

use crate::config::{IntegrationsConfig, ManifestConfig};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use tracing::{debug, warn};

pub const ADSENSE_KEY: &str = "google-adsense";
pub const ANALYTICS_KEY: &str = "google-analytics";
pub const ANALYTICS_INIT_KEY: &str = "google-analytics-init";
pub const FONTS_KEY: &str = "web-fonts";
pub const MANIFEST_KEY: &str = "web-manifest";

const ADSENSE_SRC: &str = "https://pagead2.googlesyndication.com/pagead/js/adsbygoogle.js";
const ANALYTICS_SRC: &str = "https://www.google-analytics.com/analytics.js";
const FONTS_CSS: &str = "https://fonts.googleapis.com/css2";

/// What an injected head element renders as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadKind {
    Script {
        src: String,
        crossorigin: Option<String>,
        is_async: bool,
    },
    InlineScript {
        body: String,
    },
    Link {
        rel: String,
        href: String,
    },
}

/// A head element tagged with a stable key used for de-duplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadElement {
    pub key: String,
    pub kind: HeadKind,
}

impl HeadElement {
    fn render(&self) -> Markup {
        match &self.kind {
            HeadKind::Script {
                src,
                crossorigin,
                is_async,
            } => html! {
                script async[*is_async] src=(src) crossorigin=[crossorigin] data-key=(self.key) {}
            },
            HeadKind::InlineScript { body } => html! {
                script data-key=(self.key) { (PreEscaped(body)) }
            },
            HeadKind::Link { rel, href } => html! {
                link rel=(rel) href=(href) data-key=(self.key);
            },
        }
    }
}

/// A full HTML page before serialization.
#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    pub lang: String,
    pub description: Option<String>,
    /// Extra `<meta>` tags as `(name, content)`; `og:*` names render as `property`.
    pub meta: Vec<(String, String)>,
    pub css: String,
    pub body_class: Option<String>,
    pub head: Vec<HeadElement>,
    pub body: Markup,
}

impl Document {
    pub fn new(title: impl Into<String>, body: Markup) -> Self {
        Self {
            title: title.into(),
            lang: "en".to_string(),
            description: None,
            meta: Vec::new(),
            css: String::new(),
            body_class: None,
            head: Vec::new(),
            body,
        }
    }

    pub fn with_lang(mut self, lang: &str) -> Self {
        self.lang = lang.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        if !description.is_empty() {
            self.description = Some(description.to_string());
        }
        self
    }

    pub fn with_meta(mut self, name: &str, content: &str) -> Self {
        if !content.is_empty() {
            self.meta.push((name.to_string(), content.to_string()));
        }
        self
    }

    pub fn with_css(mut self, css: &str) -> Self {
        self.css = css.to_string();
        self
    }

    pub fn with_body_class(mut self, class: &str) -> Self {
        self.body_class = Some(class.to_string());
        self
    }

    /// Keys of the injected head elements, in order.
    pub fn head_keys(&self) -> Vec<&str> {
        self.head.iter().map(|e| e.key.as_str()).collect()
    }

    pub fn render(&self) -> Markup {
        html! {
            (DOCTYPE)
            html lang=(self.lang) {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (self.title) }
                    @if let Some(description) = &self.description {
                        meta name="description" content=(description);
                    }
                    @for (name, content) in &self.meta {
                        @if name.starts_with("og:") {
                            meta property=(name) content=(content);
                        } @else {
                            meta name=(name) content=(content);
                        }
                    }
                    @if !self.css.is_empty() {
                        style { (PreEscaped(&self.css)) }
                    }
                    @for element in &self.head {
                        (element.render())
                    }
                }
                body class=[&self.body_class] {
                    (self.body)
                }
            }
        }
    }
}

/// Append `elements` to the document head in order.
///
/// Elements whose key is already present are skipped, so injecting the same
/// list twice leaves the head unchanged.
pub fn inject_head_elements(mut doc: Document, elements: &[HeadElement]) -> Document {
    for element in elements {
        if doc.head.iter().any(|e| e.key == element.key) {
            continue;
        }
        doc.head.push(element.clone());
    }
    doc
}

/// Resolve the configured integrations into head elements.
pub fn head_elements(
    integrations: &IntegrationsConfig,
    manifest: Option<&ManifestConfig>,
) -> Vec<HeadElement> {
    let mut elements = Vec::new();

    match non_empty(&integrations.google_analytics.tracking_id) {
        Some(id) => {
            // serde_json gives a correctly quoted JS string literal.
            let id_literal = serde_json::Value::String(id.to_string()).to_string();
            elements.push(HeadElement {
                key: ANALYTICS_INIT_KEY.to_string(),
                kind: HeadKind::InlineScript {
                    body: format!(
                        "window.ga=window.ga||function(){{(ga.q=ga.q||[]).push(arguments)}};\
                         ga.l=+new Date;ga('create',{id_literal},'auto');ga('send','pageview');"
                    ),
                },
            });
            elements.push(HeadElement {
                key: ANALYTICS_KEY.to_string(),
                kind: HeadKind::Script {
                    src: ANALYTICS_SRC.to_string(),
                    crossorigin: None,
                    is_async: true,
                },
            });
        }
        None => warn!("google analytics tracking_id not set; skipping analytics tags"),
    }

    match non_empty(&integrations.adsense.publisher_id) {
        Some(id) => elements.push(HeadElement {
            key: ADSENSE_KEY.to_string(),
            kind: HeadKind::Script {
                src: format!("{ADSENSE_SRC}?client={id}"),
                crossorigin: Some("anonymous".to_string()),
                is_async: true,
            },
        }),
        None => warn!("adsense publisher_id not set; skipping ads script"),
    }

    let families: Vec<&str> = integrations
        .web_fonts
        .families
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .collect();
    if families.is_empty() {
        debug!("no web font families configured");
    } else {
        elements.push(HeadElement {
            key: FONTS_KEY.to_string(),
            kind: HeadKind::Link {
                rel: "stylesheet".to_string(),
                href: fonts_href(&families),
            },
        });
    }

    if manifest.is_some() {
        elements.push(HeadElement {
            key: MANIFEST_KEY.to_string(),
            kind: HeadKind::Link {
                rel: "manifest".to_string(),
                href: "/manifest.webmanifest".to_string(),
            },
        });
    }

    elements
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn fonts_href(families: &[&str]) -> String {
    let params: Vec<String> = families
        .iter()
        .map(|f| format!("family={}", f.replace(' ', "+")))
        .collect();
    format!("{FONTS_CSS}?{}&display=swap", params.join("&"))
}
