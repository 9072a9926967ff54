pub use memory::InMemoryBookRepository;
pub use postgres::PostgresBookRepository;

use bookshelf_db::DbError;

use super::models::Book;
use super::validation::{BookChanges, NewBook};

mod memory;
mod postgres;

#[derive(thiserror::Error, Debug)]
pub enum RepositoryError {
    #[error("book {0} not found")]
    NotFound(String),

    #[error("book {0} already exists")]
    Duplicate(String),

    #[error("storage failure: {0}")]
    Storage(#[from] DbError),
}

/// Persistence for books, keyed by ISBN.
///
/// Every operation is a single statement against storage and is atomic on
/// its own.
#[async_trait::async_trait]
pub trait BookRepository: Send + Sync {
    /// All books in insertion order
    async fn list_all(&self) -> Result<Vec<Book>, RepositoryError>;

    /// The book with exactly this ISBN
    async fn get_by_isbn(&self, isbn: &str) -> Result<Book, RepositoryError>;

    /// Stores a new book; never overwrites an existing ISBN
    async fn create(&self, book: NewBook) -> Result<Book, RepositoryError>;

    /// Replaces every field except the ISBN, returning the stored result
    async fn update(&self, isbn: &str, changes: BookChanges) -> Result<Book, RepositoryError>;

    /// Removes the book
    async fn delete(&self, isbn: &str) -> Result<(), RepositoryError>;
}
