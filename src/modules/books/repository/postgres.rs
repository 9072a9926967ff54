use bookshelf_db::{DbError, DbPool};

use super::{BookRepository, RepositoryError};
use crate::modules::books::models::Book;
use crate::modules::books::validation::{BookChanges, NewBook};

const BOOK_COLUMNS: &str = "isbn, amazon_url, author, language, pages, publisher, title, year";

/// Book storage in the `books` table.
#[derive(Clone, Debug)]
pub struct PostgresBookRepository {
    pool: DbPool,
}

impl PostgresBookRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn storage_error(operation: &'static str, err: impl Into<DbError>) -> RepositoryError {
    let err: DbError = err.into();
    tracing::error!(operation, error = %err, "book storage failure");
    RepositoryError::Storage(err)
}

#[async_trait::async_trait]
impl BookRepository for PostgresBookRepository {
    async fn list_all(&self) -> Result<Vec<Book>, RepositoryError> {
        sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY seq"))
            .fetch_all(self.pool.inner())
            .await
            .map_err(|e| storage_error("list_all", e))
    }

    async fn get_by_isbn(&self, isbn: &str) -> Result<Book, RepositoryError> {
        sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE isbn = $1"))
            .bind(isbn)
            .fetch_optional(self.pool.inner())
            .await
            .map_err(|e| storage_error("get_by_isbn", e))?
            .ok_or_else(|| RepositoryError::NotFound(isbn.to_string()))
    }

    async fn create(&self, book: NewBook) -> Result<Book, RepositoryError> {
        let book = book.into_book();

        let inserted = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books ({BOOK_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .fetch_one(self.pool.inner())
        .await;

        match inserted.map_err(DbError::from) {
            Ok(stored) => Ok(stored),
            Err(err) if err.is_unique_violation() => Err(RepositoryError::Duplicate(book.isbn)),
            Err(err) => Err(storage_error("create", err)),
        }
    }

    async fn update(&self, isbn: &str, changes: BookChanges) -> Result<Book, RepositoryError> {
        let book = changes.into_book(isbn);

        sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET amazon_url = $1, author = $2, language = $3, pages = $4, \
             publisher = $5, title = $6, year = $7 \
             WHERE isbn = $8 \
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .bind(&book.isbn)
        .fetch_optional(self.pool.inner())
        .await
        .map_err(|e| storage_error("update", e))?
        .ok_or_else(|| RepositoryError::NotFound(isbn.to_string()))
    }

    async fn delete(&self, isbn: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = $1")
            .bind(isbn)
            .execute(self.pool.inner())
            .await
            .map_err(|e| storage_error("delete", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(isbn.to_string()));
        }
        Ok(())
    }
}
