//! Static asset responder for the browser client.
//!
//! Serves files from a fixed root directory; `/` maps to the index document.
//! The decoded request path must stay inside the root: any `..` segment, or
//! a canonicalised resolution escaping the root (symlinks), is rejected with
//! 403 before any content is read. Missing files are 404. Content types come
//! from a small fixed extension mapping with a plain-text fallback.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::path::{Component, Path};

/// Extension to content-type mapping. Deliberately small; anything the
/// client does not ship is served as plain text.
fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        _ => "text/plain",
    }
}

/// Resolve `request_path` against `root` and serve the file.
pub async fn serve(root: &Path, request_path: &str) -> Response {
    let request_path = if request_path == "/" {
        "/index.html"
    } else {
        request_path
    };
    let decoded = percent_decode(request_path);
    let relative = Path::new(decoded.trim_start_matches('/'));

    // Lexical traversal guard, checked before touching the filesystem so an
    // escaping path is 403 whether or not its target exists.
    if relative
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }

    let file_path = root.join(relative);

    // Second guard on the canonicalised path, which catches symlinked
    // escapes the lexical check cannot see.
    if let (Ok(root_real), Ok(file_real)) = (
        tokio::fs::canonicalize(root).await,
        tokio::fs::canonicalize(&file_path).await,
    ) {
        if !file_real.starts_with(&root_real) {
            return (StatusCode::FORBIDDEN, "Forbidden").into_response();
        }
    }

    match tokio::fs::read(&file_path).await {
        Ok(contents) => (
            [(header::CONTENT_TYPE, content_type_for(&file_path))],
            contents,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// Decode %XX escapes in a request path; malformed escapes pass through
/// untouched.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let h1 = bytes[i + 1] as char;
            let h2 = bytes[i + 2] as char;
            if let (Some(a), Some(b)) = (h1.to_digit(16), h2.to_digit(16)) {
                out.push(((a << 4) + b) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).to_string()
}
