//! Static file serving module
//!
//! Maps request paths below the serving root, resolves directories (index
//! file, redirect or listing) and builds whole-file and partial responses.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, date, mime, url, ByteRange};
use crate::logger;

/// What a request path points at
#[derive(Debug, PartialEq, Eq)]
pub enum Target {
    /// Regular file (possibly a directory's index file)
    File(PathBuf),
    /// Directory without index file
    Listing(PathBuf),
    /// Directory requested without trailing slash; holds the new `Location`
    Redirect(String),
    NotFound,
}

/// Static file delegate bound to one serving root
pub struct StaticFiles<'a> {
    root: &'a Path,
    index_files: &'a [String],
    dir_listing: bool,
}

impl<'a> StaticFiles<'a> {
    /// `root` must already be canonical
    pub const fn new(root: &'a Path, index_files: &'a [String], dir_listing: bool) -> Self {
        Self {
            root,
            index_files,
            dir_listing,
        }
    }

    /// Map a URL path onto the filesystem
    ///
    /// The path is percent-decoded and split on `/`. Empty and `.` segments are
    /// dropped and `..` removes the previous segment but never climbs above the
    /// root. Existing targets are canonicalized and must stay below the root,
    /// which rejects symlinks that point outside it.
    pub async fn resolve_path(&self, url_path: &str) -> Option<PathBuf> {
        let decoded = url::percent_decode(url_path);
        let mut segments: Vec<&str> = Vec::new();

        for segment in decoded.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                // Separators other than '/' or NUL never name a file below the root
                s if s.contains(['\\', '\0']) => return None,
                s => segments.push(s),
            }
        }

        let candidate = segments
            .iter()
            .fold(self.root.to_path_buf(), |path, segment| path.join(segment));

        match fs::canonicalize(&candidate).await {
            Ok(canonical) => self.is_contained(url_path, &canonical).then_some(candidate),
            // Missing file: the caller turns the failed open into 404
            Err(_) => Some(candidate),
        }
    }

    /// Whether a canonical path lies below the root; logs when it does not
    fn is_contained(&self, url_path: &str, canonical: &Path) -> bool {
        if canonical.starts_with(self.root) {
            return true;
        }
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {url_path} -> {}",
            canonical.display()
        ));
        false
    }

    /// Decide what the request points at
    pub async fn locate(&self, ctx: &RequestContext<'_>) -> Target {
        let Some(path) = self.resolve_path(ctx.path).await else {
            return Target::NotFound;
        };
        let Ok(metadata) = fs::metadata(&path).await else {
            return Target::NotFound;
        };

        if metadata.is_dir() {
            if !ctx.path.ends_with('/') {
                let location = match ctx.query {
                    Some(query) => format!("{}/?{query}", ctx.path),
                    None => format!("{}/", ctx.path),
                };
                return Target::Redirect(location);
            }
            for index_file in self.index_files {
                let index_path = path.join(index_file);
                if !fs::metadata(&index_path).await.is_ok_and(|m| m.is_file()) {
                    continue;
                }
                // The index file itself may be a symlink leading out of the root
                return match fs::canonicalize(&index_path).await {
                    Ok(canonical) if self.is_contained(ctx.path, &canonical) => {
                        Target::File(index_path)
                    }
                    _ => Target::NotFound,
                };
            }
            return Target::Listing(path);
        }

        if ctx.path.ends_with('/') {
            return Target::NotFound;
        }
        Target::File(path)
    }

    /// Serve the whole file, index file or listing
    pub async fn serve(&self, ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
        match self.locate(ctx).await {
            Target::File(path) => serve_file(&path, ctx.is_head).await,
            Target::Listing(dir) => self.serve_listing(&dir, ctx).await,
            Target::Redirect(location) => http::build_redirect_response(&location),
            Target::NotFound => http::build_404_response(),
        }
    }

    /// Serve `range` of the requested file
    ///
    /// Directories resolve exactly as in [`StaticFiles::serve`]; a directory
    /// without index file gets its full listing rather than a partial one.
    pub async fn serve_partial(
        &self,
        ctx: &RequestContext<'_>,
        range: &ByteRange,
    ) -> Response<Full<Bytes>> {
        match self.locate(ctx).await {
            Target::File(path) => serve_file_range(&path, range).await,
            Target::Listing(dir) => self.serve_listing(&dir, ctx).await,
            Target::Redirect(location) => http::build_redirect_response(&location),
            Target::NotFound => http::build_404_response(),
        }
    }

    async fn serve_listing(&self, dir: &Path, ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
        if !self.dir_listing {
            return http::build_403_response();
        }

        let display_path = url::percent_decode(ctx.path);
        match listing::render_listing(dir, &display_path).await {
            Ok(html) => http::response::build_html_response(html, ctx.is_head),
            Err(e) => {
                logger::log_warning(&format!("Failed to list '{}': {e}", dir.display()));
                http::response::build_error_response(404, "No permission to list directory")
            }
        }
    }
}

async fn serve_file(path: &Path, is_head: bool) -> Response<Full<Bytes>> {
    let content_type = mime::guess_type(path);

    let Ok(mut file) = fs::File::open(path).await else {
        return http::build_404_response();
    };
    let metadata = match file.metadata().await {
        Ok(m) => m,
        Err(e) => {
            logger::log_error(&format!("Failed to stat '{}': {e}", path.display()));
            return http::build_500_response();
        }
    };
    let last_modified = date::last_modified(&metadata);

    if is_head {
        return http::response::build_file_response(
            Bytes::new(),
            content_type,
            metadata.len(),
            last_modified.as_deref(),
            true,
        );
    }

    let mut content = Vec::new();
    if let Err(e) = file.read_to_end(&mut content).await {
        logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
        return http::build_500_response();
    }

    let content_length = content.len() as u64;
    http::response::build_file_response(
        Bytes::from(content),
        content_type,
        content_length,
        last_modified.as_deref(),
        false,
    )
}

async fn serve_file_range(path: &Path, range: &ByteRange) -> Response<Full<Bytes>> {
    let content_type = mime::guess_type(path);

    let Ok(mut file) = fs::File::open(path).await else {
        return http::build_404_response();
    };
    let metadata = match file.metadata().await {
        Ok(m) => m,
        Err(e) => {
            logger::log_error(&format!("Failed to stat '{}': {e}", path.display()));
            return http::build_500_response();
        }
    };

    let Some((offset, length)) = range.satisfiable_within(metadata.len()) else {
        return http::build_416_response();
    };
    let last_modified = date::last_modified(&metadata);

    match read_exact_at(&mut file, offset, length).await {
        Ok(data) => http::response::build_partial_response(
            Bytes::from(data),
            content_type,
            range,
            last_modified.as_deref(),
        ),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read {length} bytes at offset {offset} from '{}': {e}",
                path.display()
            ));
            http::build_500_response()
        }
    }
}

/// Read exactly `length` bytes starting at `offset`
///
/// Fails with `UnexpectedEof` when the file shrank after it was checked.
async fn read_exact_at(file: &mut fs::File, offset: u64, length: u64) -> std::io::Result<Vec<u8>> {
    let length = usize::try_from(length)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    file.seek(SeekFrom::Start(offset)).await?;
    let mut buffer = vec![0_u8; length];
    file.read_exact(&mut buffer).await?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    const CONTENT: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    struct Fixture {
        _dir: tempfile::TempDir,
        root: PathBuf,
        index_files: Vec<String>,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().canonicalize().expect("canonical root");
        std::fs::write(root.join("data.txt"), CONTENT).expect("write data");
        std::fs::create_dir(root.join("site")).expect("mkdir site");
        std::fs::write(root.join("site/index.htm"), b"<p>htm</p>").expect("write index");
        std::fs::create_dir(root.join("empty")).expect("mkdir empty");
        Fixture {
            _dir: dir,
            root,
            index_files: vec!["index.html".to_string(), "index.htm".to_string()],
        }
    }

    fn ctx<'a>(path: &'a str, query: Option<&'a str>) -> RequestContext<'a> {
        RequestContext {
            path,
            query,
            is_head: false,
            range_header: None,
        }
    }

    async fn body_of(response: Response<Full<Bytes>>) -> Bytes {
        response
            .into_body()
            .collect()
            .await
            .expect("infallible body")
            .to_bytes()
    }

    #[tokio::test]
    async fn test_resolve_path_normalizes_segments() {
        let fx = fixture();
        let files = StaticFiles::new(&fx.root, &fx.index_files, true);

        assert_eq!(
            files.resolve_path("/./site/../data.txt").await,
            Some(fx.root.join("data.txt"))
        );
        assert_eq!(
            files.resolve_path("/../../data.txt").await,
            Some(fx.root.join("data.txt"))
        );
        assert_eq!(
            files.resolve_path("/%64ata.txt").await,
            Some(fx.root.join("data.txt"))
        );
        assert_eq!(files.resolve_path("/").await, Some(fx.root.clone()));
        assert_eq!(files.resolve_path("/a\\b").await, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escaping_root_rejected() {
        let outer = tempfile::tempdir().expect("tempdir");
        let root = outer.path().canonicalize().expect("canon").join("web");
        std::fs::create_dir(&root).expect("mkdir web");
        std::fs::write(outer.path().join("secret.txt"), b"secret").expect("write");
        std::os::unix::fs::symlink(outer.path().join("secret.txt"), root.join("leak"))
            .expect("symlink");

        let index_files = Vec::new();
        let files = StaticFiles::new(&root, &index_files, true);
        assert_eq!(files.resolve_path("/leak").await, None);
        assert_eq!(files.serve(&ctx("/leak", None)).await.status(), 404);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_index_symlink_escaping_root_rejected() {
        let outer = tempfile::tempdir().expect("tempdir");
        let outer_path = outer.path().canonicalize().expect("canon");
        let root = outer_path.join("web");
        std::fs::create_dir_all(root.join("site")).expect("mkdir web/site");
        std::fs::write(outer_path.join("secret.txt"), b"TOP-SECRET").expect("write");
        std::os::unix::fs::symlink(outer_path.join("secret.txt"), root.join("site/index.html"))
            .expect("symlink");

        let index_files = vec!["index.html".to_string()];
        let files = StaticFiles::new(&root, &index_files, true);

        assert_eq!(files.locate(&ctx("/site/", None)).await, Target::NotFound);

        let response = files.serve(&ctx("/site/", None)).await;
        assert_eq!(response.status(), 404);
        assert_ne!(body_of(response).await, "TOP-SECRET".as_bytes());

        let range = ByteRange::from_bounds(0, 3).expect("range");
        let response = files.serve_partial(&ctx("/site/", None), &range).await;
        assert_eq!(response.status(), 404);
        assert!(!response.headers().contains_key("Content-Range"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_index_symlink_inside_root_served() {
        let fx = fixture();
        std::fs::create_dir(fx.root.join("alias")).expect("mkdir alias");
        std::os::unix::fs::symlink(fx.root.join("data.txt"), fx.root.join("alias/index.html"))
            .expect("symlink");
        let files = StaticFiles::new(&fx.root, &fx.index_files, true);

        assert_eq!(
            files.locate(&ctx("/alias/", None)).await,
            Target::File(fx.root.join("alias/index.html"))
        );
        let response = files.serve(&ctx("/alias/", None)).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Content-Type"], "text/html; charset=utf-8");
        assert_eq!(body_of(response).await, CONTENT);
    }

    #[tokio::test]
    async fn test_locate() {
        let fx = fixture();
        let files = StaticFiles::new(&fx.root, &fx.index_files, true);

        assert_eq!(
            files.locate(&ctx("/site", Some("a=1"))).await,
            Target::Redirect("/site/?a=1".to_string())
        );
        assert_eq!(
            files.locate(&ctx("/site/", None)).await,
            Target::File(fx.root.join("site/index.htm"))
        );
        assert_eq!(
            files.locate(&ctx("/empty/", None)).await,
            Target::Listing(fx.root.join("empty"))
        );
        assert_eq!(files.locate(&ctx("/data.txt/", None)).await, Target::NotFound);
        assert_eq!(files.locate(&ctx("/nope.txt", None)).await, Target::NotFound);
    }

    #[tokio::test]
    async fn test_serve_full_file() {
        let fx = fixture();
        let files = StaticFiles::new(&fx.root, &fx.index_files, true);

        let response = files.serve(&ctx("/data.txt", None)).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Content-Type"], "text/plain; charset=utf-8");
        assert_eq!(response.headers()["Content-Length"], "36");
        assert!(response.headers().contains_key("Last-Modified"));
        assert_eq!(body_of(response).await, CONTENT);
    }

    #[tokio::test]
    async fn test_serve_head_has_no_body() {
        let fx = fixture();
        let files = StaticFiles::new(&fx.root, &fx.index_files, true);

        let mut head = ctx("/data.txt", None);
        head.is_head = true;
        let response = files.serve(&head).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Content-Length"], "36");
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_listing_disabled() {
        let fx = fixture();
        let files = StaticFiles::new(&fx.root, &fx.index_files, false);

        assert_eq!(files.serve(&ctx("/empty/", None)).await.status(), 403);
        assert_eq!(files.serve(&ctx("/site/", None)).await.status(), 200);
    }

    #[tokio::test]
    async fn test_serve_partial() {
        let fx = fixture();
        let files = StaticFiles::new(&fx.root, &fx.index_files, true);

        let range = ByteRange::from_bounds(10, 19).expect("range");
        let response = files.serve_partial(&ctx("/data.txt", None), &range).await;
        assert_eq!(response.status(), 206);
        assert_eq!(response.headers()["Content-Range"], "10-19");
        assert_eq!(response.headers()["Content-Length"], "10");
        assert_eq!(body_of(response).await, &CONTENT[10..20]);
    }

    #[tokio::test]
    async fn test_serve_partial_empty_at_end_of_file() {
        let fx = fixture();
        let files = StaticFiles::new(&fx.root, &fx.index_files, true);

        let range = ByteRange {
            offset: 36,
            length: 0,
        };
        let response = files.serve_partial(&ctx("/data.txt", None), &range).await;
        assert_eq!(response.status(), 206);
        assert_eq!(response.headers()["Content-Range"], "36-35");
        assert_eq!(response.headers()["Content-Length"], "0");
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_serve_partial_errors() {
        let fx = fixture();
        let files = StaticFiles::new(&fx.root, &fx.index_files, true);

        let past_end = ByteRange::from_bounds(30, 40).expect("range");
        let backwards = ByteRange::from_bounds(10, 2).expect("range");
        assert_eq!(
            files.serve_partial(&ctx("/data.txt", None), &past_end).await.status(),
            416
        );
        assert_eq!(
            files.serve_partial(&ctx("/data.txt", None), &backwards).await.status(),
            416
        );
        assert_eq!(
            files.serve_partial(&ctx("/missing", None), &past_end).await.status(),
            404
        );
        assert_eq!(
            files.serve_partial(&ctx("/site", None), &past_end).await.status(),
            301
        );
    }

    #[tokio::test]
    async fn test_serve_partial_directory_falls_back_to_listing() {
        let fx = fixture();
        let files = StaticFiles::new(&fx.root, &fx.index_files, true);

        let range = ByteRange::from_bounds(0, 3).expect("range");
        let response = files.serve_partial(&ctx("/empty/", None), &range).await;
        assert_eq!(response.status(), 200);
        assert!(!response.headers().contains_key("Content-Range"));
    }
}
