use std::path::{Component, Path, PathBuf};

use actix_files::NamedFile;
use actix_web::http::Method;
use actix_web::{HttpRequest, HttpResponse};
use tracing::debug;

use crate::domain::error::{AppError, Result};
use crate::interfaces::state::AppState;

pub const ENTRY_DOCUMENT: &str = "index.html";

/// Map a request path onto a file below `root`.
///
/// Returns `None` for anything that is not a plain existing file or that
/// tries to leave the asset root.
pub fn resolve_asset(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = request_path.strip_prefix('/').unwrap_or(request_path);
    if relative.is_empty() {
        return None;
    }

    let mut resolved = root.to_path_buf();
    for segment in relative.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
            return None;
        }
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => resolved.push(part),
            _ => return None,
        }
    }

    resolved.is_file().then_some(resolved)
}

/// Default service: the requested asset if it exists, otherwise the entry
/// document so client-side routing can take over.
pub async fn serve_static(req: HttpRequest, state: actix_web::web::Data<AppState>) -> Result<HttpResponse> {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return Err(AppError::NotFound(req.path().to_string()));
    }

    let root = &state.config.server.static_dir;
    let target = match resolve_asset(root, req.path()) {
        Some(path) => path,
        None => {
            let entry = root.join(ENTRY_DOCUMENT);
            if !entry.is_file() {
                debug!(path = %req.path(), root = %root.display(), "Entry document missing");
                return Err(AppError::NotFound(req.path().to_string()));
            }
            entry
        }
    };

    let file = NamedFile::open_async(&target).await?;
    Ok(file.into_response(&req))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn asset_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(ENTRY_DOCUMENT), "<html>app</html>").unwrap();
        fs::create_dir(dir.path().join("static")).unwrap();
        fs::write(dir.path().join("static").join("main.js"), "console.log(1)").unwrap();
        dir
    }

    #[test]
    fn test_resolve_existing_asset() {
        let dir = asset_root();
        assert_eq!(
            resolve_asset(dir.path(), "/static/main.js"),
            Some(dir.path().join("static").join("main.js"))
        );
    }

    #[test]
    fn test_resolve_rejects_root_and_directories() {
        let dir = asset_root();
        assert_eq!(resolve_asset(dir.path(), "/"), None);
        assert_eq!(resolve_asset(dir.path(), "/static"), None);
        assert_eq!(resolve_asset(dir.path(), "/missing.css"), None);
    }

    #[test]
    fn test_resolve_rejects_escape_attempts() {
        let dir = asset_root();
        let inner = dir.path().join("static");
        assert_eq!(resolve_asset(&inner, "/../index.html"), None);
        assert_eq!(resolve_asset(&inner, "/./main.js"), None);
        assert_eq!(resolve_asset(&inner, "//main.js"), None);
        assert_eq!(resolve_asset(&inner, "main.js"), Some(inner.join("main.js")));
        assert_eq!(resolve_asset(&inner, "/..\\index.html"), None);
    }
}
