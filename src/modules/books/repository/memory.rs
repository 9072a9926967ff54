use tokio::sync::RwLock;

use super::{BookRepository, RepositoryError};
use crate::modules::books::models::Book;
use crate::modules::books::validation::{BookChanges, NewBook};

/// Process-local book store.
///
/// Keeps books in a vector so listing preserves insertion order.
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    books: RwLock<Vec<Book>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every book.
    pub async fn clear(&self) {
        self.books.write().await.clear();
    }
}

#[async_trait::async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn list_all(&self) -> Result<Vec<Book>, RepositoryError> {
        Ok(self.books.read().await.clone())
    }

    async fn get_by_isbn(&self, isbn: &str) -> Result<Book, RepositoryError> {
        self.books
            .read()
            .await
            .iter()
            .find(|book| book.isbn == isbn)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(isbn.to_string()))
    }

    async fn create(&self, book: NewBook) -> Result<Book, RepositoryError> {
        let mut books = self.books.write().await;
        if books.iter().any(|existing| existing.isbn == book.isbn()) {
            return Err(RepositoryError::Duplicate(book.isbn().to_string()));
        }

        let book = book.into_book();
        books.push(book.clone());
        Ok(book)
    }

    async fn update(&self, isbn: &str, changes: BookChanges) -> Result<Book, RepositoryError> {
        let mut books = self.books.write().await;
        let slot = books
            .iter_mut()
            .find(|book| book.isbn == isbn)
            .ok_or_else(|| RepositoryError::NotFound(isbn.to_string()))?;

        *slot = changes.into_book(isbn);
        Ok(slot.clone())
    }

    async fn delete(&self, isbn: &str) -> Result<(), RepositoryError> {
        let mut books = self.books.write().await;
        let position = books
            .iter()
            .position(|book| book.isbn == isbn)
            .ok_or_else(|| RepositoryError::NotFound(isbn.to_string()))?;

        books.remove(position);
        Ok(())
    }
}
