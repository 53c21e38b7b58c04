//! CLI output formatting for builds and checks.
//!
//! Output leads with content, not files: each post is listed by positional
//! index and title, with its URL and copied files as indented context lines.
//!
//! ```text
//! TechBlog
//!
//! Posts
//! 001 Second Post (2020-11-01)
//!     URL: /second/
//! 002 Hello World (2020-10-01)
//!     URL: /hello-world/
//!     File: diagram.png
//!
//! Pages
//!     index.html
//!     404.html
//!
//! Assets
//!     static/avatar-50x50.jpg
//!
//! Head
//!     google-adsense
//!
//! 4 pages, 2 posts, 1 asset
//! ```
//!
//! [`format_build_output`] returns the lines for testability; [`print_build_output`]
//! writes them to stdout.

use crate::generate::BuildReport;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Format a build or check report.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = vec![report.title.clone(), String::new()];

    lines.push("Posts".to_string());
    if report.posts.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, post) in report.posts.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            post.title,
            post.date.format("%Y-%m-%d")
        ));
        lines.push(format!("{}URL: /{}/", indent(1), post.slug));
        for file in &post.linked_files {
            lines.push(format!("{}File: {}", indent(1), file));
        }
    }

    for (heading, items) in [
        ("Pages", &report.pages),
        ("Assets", &report.assets),
        ("Head", &report.head_keys),
    ] {
        if items.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(heading.to_string());
        for item in items {
            lines.push(format!("{}{}", indent(1), item));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{}, {}, {}",
        plural(report.pages.len(), "page"),
        plural(report.posts.len(), "post"),
        plural(report.assets.len(), "asset")
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}
