//! Directory listing page
//!
//! Rendered for directories that have no index file.

use std::io;
use std::path::Path;

use tokio::fs;

use crate::http::url::{escape_html, percent_encode_path};

/// One row of the listing
#[derive(Debug, PartialEq, Eq)]
struct ListingEntry {
    /// Bare file name, the sort key
    name: String,
    /// Shown text, `/` suffix for directories, `@` for symlinks
    display: String,
    /// Relative link target before percent-encoding
    link: String,
}

/// Render the HTML listing of `dir`
///
/// `url_path` is the decoded request path and only appears in the title.
/// Entries are sorted case-insensitively.
pub async fn render_listing(dir: &Path, url_path: &str) -> io::Result<String> {
    let entries = read_entries(dir).await?;
    let title = format!("Directory listing for {}", escape_html(url_path));

    let mut html = String::with_capacity(256 + entries.len() * 64);
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));
    html.push_str(&format!("<h2>{title}</h2>\n<hr>\n<ul>\n"));
    for entry in &entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            percent_encode_path(&entry.link),
            escape_html(&entry.display)
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");

    Ok(html)
}

async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_symlink = entry
            .file_type()
            .await
            .map(|t| t.is_symlink())
            .unwrap_or(false);
        // Follows symlinks, so a link to a directory still links with a slash
        let is_dir = fs::metadata(entry.path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);

        let (display, link) = if is_dir {
            (format!("{name}/"), format!("{name}/"))
        } else {
            (name.clone(), name.clone())
        };
        let display = if is_symlink {
            format!("{}@", display.trim_end_matches('/'))
        } else {
            display
        };

        entries.push(ListingEntry {
            name,
            display,
            link,
        });
    }

    entries.sort_by_key(|e| e.name.to_lowercase());
    Ok(entries)
}
