// API module entry
// Route table for the Bible content endpoints

mod error;
mod handlers;
mod path;
mod types;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::content::ContentStore;

pub use error::ApiError;
pub use types::{BooksResponse, ChaptersResponse};

/// API endpoints, matched the way a prefix mux does:
/// exact paths for books and health, subtree prefixes for chapter lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Chapter,
    Books,
    Chapters,
    Health,
}

impl Route {
    pub fn match_path(path: &str) -> Option<Self> {
        match path {
            "/api/health" => Some(Self::Health),
            "/api/books" => Some(Self::Books),
            "/api/chapter" => Some(Self::Chapter),
            "/api/chapters" => Some(Self::Chapters),
            p if p.starts_with("/api/chapter/") => Some(Self::Chapter),
            p if p.starts_with("/api/chapters/") => Some(Self::Chapters),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Chapter => "chapter",
            Self::Books => "books",
            Self::Chapters => "chapters",
            Self::Health => "health",
        }
    }
}

/// Run the handler for `route`, turning API errors into their HTTP responses
pub async fn dispatch(
    route: Route,
    store: &ContentStore,
    path: &str,
    query: Option<&str>,
) -> Response<Full<Bytes>> {
    let result = match route {
        Route::Chapter => handlers::get_chapter(store, path, query).await,
        Route::Books => handlers::get_books(store).await,
        Route::Chapters => handlers::get_chapters(store, path).await,
        Route::Health => Ok(handlers::health()),
    };
    result.unwrap_or_else(ApiError::into_response)
}
