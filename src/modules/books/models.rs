use serde::{Deserialize, Serialize};

/// A catalogued book, keyed by its ISBN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// Client-supplied identifier; immutable after creation
    pub isbn: String,
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    /// Page count, always positive
    pub pages: i32,
    pub publisher: String,
    pub title: String,
    /// Publication year
    pub year: i32,
}

/// Response envelope for `GET /books`.
#[derive(Debug, Serialize)]
pub struct BookList {
    pub books: Vec<Book>,
}

/// Response envelope for single-book endpoints.
#[derive(Debug, Serialize)]
pub struct BookEnvelope {
    pub book: Book,
}

/// Response body carrying a confirmation message.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}
