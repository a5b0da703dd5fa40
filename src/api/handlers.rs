// Bible content handlers
//
// Each handler is one linear pipeline: parse path, touch the filesystem,
// write the response. Nothing is cached between requests.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::error::ApiError;
use super::path::{is_safe_segment, query_param, split_segments};
use super::types::{BooksResponse, ChaptersResponse};
use crate::content::{self, ContentStore};
use crate::http;
use crate::logger;

const CHAPTER_FORMAT: &str = "/api/chapter/{book}/{chapter}";
const CHAPTERS_FORMAT: &str = "/api/chapters/{book}";

/// `GET /api/chapter/{book}/{chapter}?lang=..`
///
/// The file is decoded only to validate it; the response carries the original
/// bytes so clients see exactly what is on disk.
pub async fn get_chapter(
    store: &ContentStore,
    path: &str,
    query: Option<&str>,
) -> Result<Response<Full<Bytes>>, ApiError> {
    let malformed = ApiError::MalformedRequest {
        expected: CHAPTER_FORMAT,
    };
    let segments = split_segments(path).ok_or_else(|| malformed.clone())?;
    let [api, kind, book, chapter] = segments.as_slice() else {
        return Err(malformed);
    };
    if api != "api" || kind != "chapter" {
        return Err(malformed);
    }

    let language = query_param(query, "lang");
    if language.as_deref().is_some_and(|l| !l.is_empty() && !is_safe_segment(l)) {
        return Err(ApiError::NotFound("Chapter not found"));
    }

    let file_path = store.resolve_path(book, chapter, language.as_deref());
    if !ContentStore::exists(&file_path).await {
        return Err(ApiError::NotFound("Chapter not found"));
    }

    let data = ContentStore::read_bytes(&file_path).await.map_err(|e| {
        logger::log_error(&e.to_string());
        ApiError::Internal("Error reading chapter")
    })?;

    if let Err(e) = content::decode(&data) {
        logger::log_warning(&format!(
            "Invalid chapter file '{}': {e}",
            file_path.display()
        ));
        return Err(ApiError::Internal("Invalid JSON format"));
    }

    Ok(http::build_json_response(Bytes::from(data)))
}

/// `GET /api/books`
pub async fn get_books(store: &ContentStore) -> Result<Response<Full<Bytes>>, ApiError> {
    let books = store.list_books().await.map_err(|e| {
        logger::log_error(&e.to_string());
        ApiError::Internal("Error reading Bible directory")
    })?;

    Ok(http::build_serialized_response(&BooksResponse { books }))
}

/// `GET /api/chapters/{book}`
pub async fn get_chapters(
    store: &ContentStore,
    path: &str,
) -> Result<Response<Full<Bytes>>, ApiError> {
    let malformed = ApiError::MalformedRequest {
        expected: CHAPTERS_FORMAT,
    };
    let segments = split_segments(path).ok_or_else(|| malformed.clone())?;
    let [api, kind, book] = segments.as_slice() else {
        return Err(malformed);
    };
    if api != "api" || kind != "chapters" {
        return Err(malformed);
    }

    let chapters = store.list_chapters(book).await.map_err(|e| {
        logger::log_debug(&e.to_string());
        ApiError::NotFound("Book not found")
    })?;

    Ok(http::build_serialized_response(&ChaptersResponse { chapters }))
}

/// `GET /api/health`
pub fn health() -> Response<Full<Bytes>> {
    http::build_text_response(StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    const GENESIS_1: &[u8] = b"{\n  \"book\": \"genesis\",\n  \"chapter\": 1,\n  \"language\": \"eng\",\n  \"verses\": [\n    {\"verse\": 1, \"text\": \"In the beginning God created the heaven and the earth.\"}\n  ]\n}\n";

    fn fixture() -> (tempfile::TempDir, ContentStore) {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        for dir in ["genesis/1", "genesis/2", "genesis/10", "genesis/foo", "exodus/1"] {
            std::fs::create_dir_all(root.join(dir)).unwrap();
        }
        std::fs::write(root.join("genesis/1/eng.json"), GENESIS_1).unwrap();
        std::fs::write(root.join("genesis/2/eng.json"), b"{\"book\": ").unwrap();
        let store = ContentStore::new(root, "eng");
        (tmp, store)
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_get_chapter_returns_raw_bytes() {
        let (_tmp, store) = fixture();
        let resp = get_chapter(&store, "/api/chapter/genesis/1", None)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], "application/json");
        assert_eq!(body_of(resp).await.as_ref(), GENESIS_1);
    }

    #[tokio::test]
    async fn test_get_chapter_language() {
        let (tmp, store) = fixture();
        let err = get_chapter(&store, "/api/chapter/genesis/1", Some("lang=xyz"))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::NotFound("Chapter not found"));

        std::fs::write(tmp.path().join("genesis/1/xyz.json"), b"{}").unwrap();
        let resp = get_chapter(&store, "/api/chapter/genesis/1", Some("lang=xyz"))
            .await
            .unwrap();
        assert_eq!(body_of(resp).await, "{}");

        // empty lang falls back to the default language
        let resp = get_chapter(&store, "/api/chapter/genesis/1", Some("lang="))
            .await
            .unwrap();
        assert_eq!(body_of(resp).await.as_ref(), GENESIS_1);
    }

    #[tokio::test]
    async fn test_get_chapter_bad_paths() {
        let (_tmp, store) = fixture();
        for path in [
            "/api/chapter/",
            "/api/chapter/genesis",
            "/api/chapter/genesis/1/extra",
            "/api/chapter/../1",
        ] {
            let err = get_chapter(&store, path, None).await.unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "path {path}");
        }
    }

    #[tokio::test]
    async fn test_get_chapter_rejects_traversing_language() {
        let (_tmp, store) = fixture();
        let err = get_chapter(&store, "/api/chapter/genesis/1", Some("lang=../../x"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_chapter_missing_and_invalid() {
        let (_tmp, store) = fixture();
        let err = get_chapter(&store, "/api/chapter/genesis/3", None)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = get_chapter(&store, "/api/chapter/genesis/2", None)
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Internal("Invalid JSON format"));
    }

    #[tokio::test]
    async fn test_get_chapter_unreadable_file() {
        let (tmp, store) = fixture();
        std::fs::create_dir_all(tmp.path().join("exodus/1/eng.json")).unwrap();
        let err = get_chapter(&store, "/api/chapter/exodus/1", None)
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Internal("Error reading chapter"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_get_books() {
        let (_tmp, store) = fixture();
        let resp = get_books(&store).await.unwrap();
        let parsed: BooksResponse = serde_json::from_slice(&body_of(resp).await).unwrap();
        assert_eq!(parsed.books, vec!["exodus", "genesis"]);
    }

    #[tokio::test]
    async fn test_get_books_missing_root() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ContentStore::new(tmp.path().join("missing"), "eng");
        let err = get_books(&store).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_get_chapters() {
        let (_tmp, store) = fixture();
        let resp = get_chapters(&store, "/api/chapters/genesis").await.unwrap();
        let parsed: ChaptersResponse = serde_json::from_slice(&body_of(resp).await).unwrap();
        assert_eq!(parsed.chapters, vec![1, 10, 2]);

        let err = get_chapters(&store, "/api/chapters/nonexistent-book")
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::NotFound("Book not found"));

        let err = get_chapters(&store, "/api/chapters/genesis/1")
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health() {
        let resp = health();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_of(resp).await, "OK");
    }
}
