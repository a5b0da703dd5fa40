// API response bodies

use serde::{Deserialize, Serialize};

/// `GET /api/books`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooksResponse {
    pub books: Vec<String>,
}

/// `GET /api/chapters/{book}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaptersResponse {
    pub chapters: Vec<i64>,
}
