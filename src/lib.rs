//! # Folio
//!
//! A static site generator for a personal blog with an author bio and a
//! standalone landing page. The content directory is the data source:
//! `config.toml` describes the author and integrations, `blog/` holds the
//! posts.
//!
//! # Architecture: Load, Render, Write
//!
//! ```text
//! 1. Load     config.toml, blog/, avatar   →  resolved data (Profile, Post, Pipeline)
//! 2. Render   resolved data                →  Documents in memory
//! 3. Write    Documents + assets           →  dist/
//! ```
//!
//! Renderers are pure functions of resolved data: they never read files or
//! configuration, so the same profile always renders the same markup.
//! `folio check` runs the first two steps only.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`profile`] | Author identity, social links, processed avatar description |
//! | [`icons`] | Closed set of icon glyphs with inline and standalone SVG |
//! | [`bio`] | Author bio fragment shown on the index and every post |
//! | [`landing`] | Standalone landing page document |
//! | [`shell`] | Page document, keyed head elements, integration tags |
//! | [`markdown`] | Markdown conversion and the configured transform chain |
//! | [`posts`] | Post discovery and front matter parsing |
//! | [`avatar`] | Profile picture resizing and encoding |
//! | [`feed`] | RSS 2.0 feed |
//! | [`generate`] | Build pipeline wiring all of the above |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Templates are Rust
//! expressions checked at compile time and every interpolation is escaped,
//! so author names and post titles can never inject markup.
//!
//! ## Head Injection Is Data
//!
//! Analytics, ads, fonts and the web manifest are described as keyed
//! [`shell::HeadElement`]s rather than spliced into templates. Each page is
//! assembled first and the integrations are appended last, so no renderer
//! needs to know which integrations are enabled.
//!
//! ## Closed Icon Set
//!
//! Icon identifiers in the config are parsed into [`icons::IconGlyph`]. An
//! unknown identifier fails the build instead of rendering an empty link.

pub mod avatar;
pub mod bio;
pub mod config;
pub mod feed;
pub mod generate;
pub mod icons;
pub mod landing;
pub mod markdown;
pub mod output;
pub mod posts;
pub mod profile;
pub mod shell;
