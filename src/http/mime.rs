//! MIME type detection module
//!
//! Guesses the Content-Type of a served file from its extension.

use std::path::Path;

/// Guess the Content-Type of a file path
///
/// The extension is matched case-insensitively; unknown or missing
/// extensions fall back to `application/octet-stream`.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use quittable_httpd::http::mime::guess_type;
///
/// assert_eq!(guess_type(Path::new("index.HTML")), "text/html; charset=utf-8");
/// assert_eq!(guess_type(Path::new("module.nexe")), "application/octet-stream");
/// ```
pub fn guess_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    content_type_for(extension.as_deref())
}

/// Content-Type for a lowercase file extension
pub fn content_type_for(extension: Option<&str>) -> &'static str {
    match extension {
        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md" | "py" | "c" | "cc" | "h" | "vim") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",

        // Scripts and binaries loaded by the page
        Some("js" | "mjs") => "application/javascript",
        Some("json" | "nmf") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Media
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("ogg" | "ogv") => "video/ogg",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",

        // Archives
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz" | "gzip") => "application/gzip",
        Some("tar") => "application/x-tar",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(guess_type(Path::new("a/index.html")), "text/html; charset=utf-8");
        assert_eq!(guess_type(Path::new("style.css")), "text/css");
        assert_eq!(guess_type(Path::new("app.js")), "application/javascript");
        assert_eq!(guess_type(Path::new("vim.nmf")), "application/json");
        assert_eq!(guess_type(Path::new("logo.PNG")), "image/png");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(guess_type(Path::new("data.xyz")), "application/octet-stream");
        assert_eq!(guess_type(Path::new("Makefile")), "application/octet-stream");
        assert_eq!(content_type_for(None), "application/octet-stream");
    }
}
