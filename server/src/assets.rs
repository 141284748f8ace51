//! Static files under `/static/`.
//!
//! Files come straight from `ServeDir`. Two things are layered around it:
//! redirects it issues are rewritten to include the mount prefix, and a
//! directory with no `index.html` gets a plain HTML listing of its entries.

use axum::{
    extract::{OriginalUri, Request},
    http::{header, HeaderValue, StatusCode},
    middleware::{from_fn, Next},
    response::{Html, IntoResponse, Redirect, Response},
    Router,
};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::convert::Infallible;
use std::fmt::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tower::{service_fn, Layer};
use tower_http::services::ServeDir;

pub const STATIC_PREFIX: &str = "/static";

/// Bytes escaped in listing links
const HREF: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b':')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Nest the static file service for `root` at [`STATIC_PREFIX`]
pub fn mount<S>(router: Router<S>, root: &Path) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let listing_root = Arc::new(root.to_path_buf());
    let listing = service_fn(move |request: Request| list_directory(Arc::clone(&listing_root), request));
    let files = ServeDir::new(root).fallback(listing);

    router.nest_service(STATIC_PREFIX, from_fn(rewrite_redirects).layer(files))
}

// The nested service only sees the path with the prefix stripped, so any
// Location it builds is missing the prefix.
async fn rewrite_redirects(
    OriginalUri(original): OriginalUri,
    request: Request,
    next: Next,
) -> Response {
    if original.path() == STATIC_PREFIX {
        return Redirect::permanent(&format!("{}/", STATIC_PREFIX)).into_response();
    }

    let mut response = next.run(request).await;
    if response.status().is_redirection() {
        let mounted = response
            .headers()
            .get(header::LOCATION)
            .and_then(|location| location.to_str().ok())
            .filter(|location| location.starts_with('/'))
            .and_then(|location| HeaderValue::from_str(&format!("{}{}", STATIC_PREFIX, location)).ok());
        if let Some(location) = mounted {
            response.headers_mut().insert(header::LOCATION, location);
        }
    }
    response
}

/// Reached whenever `ServeDir` has nothing to serve: missing files, rejected
/// paths, and directories without `index.html`.
async fn list_directory(root: Arc<PathBuf>, request: Request) -> Result<Response, Infallible> {
    let Some(dir) = resolve(&root, request.uri().path()) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    match read_entries(&dir).await {
        Ok(Some(entries)) => Ok(Html(render_listing(&entries)).into_response()),
        Ok(None) => Ok(StatusCode::NOT_FOUND.into_response()),
        Err(e) => {
            tracing::warn!("Cannot list {}: {}", dir.display(), e);
            Ok(StatusCode::NOT_FOUND.into_response())
        }
    }
}

/// Map a request path onto `root`. `None` if any segment would leave it.
fn resolve(root: &Path, uri_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(uri_path.trim_start_matches('/'))
        .decode_utf8()
        .ok()?;

    let mut path = root.to_path_buf();
    for component in Path::new(decoded.as_ref()).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(path)
}

/// Sorted entry names of `dir`, directories suffixed with `/`.
/// `None` when `dir` is not a directory.
async fn read_entries(dir: &Path) -> std::io::Result<Option<Vec<String>>> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => {}
        _ => return Ok(None),
    }

    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().await?.is_dir() {
            name.push('/');
        }
        names.push(name);
    }
    names.sort();
    Ok(Some(names))
}

fn render_listing(entries: &[String]) -> String {
    let mut page = String::from("<!doctype html>\n<meta name=\"viewport\" content=\"width=device-width\">\n<pre>\n");
    for name in entries {
        let (base, slash) = match name.strip_suffix('/') {
            Some(base) => (base, "/"),
            None => (name.as_str(), ""),
        };
        let _ = writeln!(
            page,
            "<a href=\"{}{}\">{}{}</a>",
            utf8_percent_encode(base, HREF),
            slash,
            askama_escape::escape(base, askama_escape::Html),
            slash
        );
    }
    page.push_str("</pre>\n");
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_stays_under_root() {
        let root = Path::new("/srv/web");

        assert_eq!(resolve(root, "/"), Some(PathBuf::from("/srv/web")));
        assert_eq!(resolve(root, "/img/./a.png"), Some(PathBuf::from("/srv/web/img/a.png")));
        assert_eq!(resolve(root, "/my%20files/"), Some(PathBuf::from("/srv/web/my files")));
    }

    #[test]
    fn test_resolve_rejects_escapes() {
        let root = Path::new("/srv/web");

        for path in ["/../etc", "/img/../../etc", "/%2e%2e/etc", "/..%2fetc", "/%2F%2Fetc"] {
            assert_eq!(resolve(root, path), None, "{path}");
        }
    }

    #[test]
    fn test_listing_escapes_names() {
        let page = render_listing(&["a&b <c>.txt".to_string(), "sub/".to_string()]);

        assert!(page.contains("<a href=\"a%26b%20%3Cc%3E.txt\">a&amp;b &lt;c&gt;.txt</a>"));
        assert!(page.contains("<a href=\"sub/\">sub/</a>"));
    }

    #[tokio::test]
    async fn test_read_entries_marks_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("img")).unwrap();
        std::fs::write(dir.path().join("b.txt"), b"b").unwrap();

        let entries = read_entries(dir.path()).await.unwrap().unwrap();
        assert_eq!(entries, vec!["b.txt".to_string(), "img/".to_string()]);

        assert_eq!(read_entries(&dir.path().join("b.txt")).await.unwrap(), None);
    }
}
