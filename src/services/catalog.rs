//! Catalog management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::book::{Book, BookInput, BookQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search books with filters
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.search(query).await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a new book
    pub async fn create_book(&self, book: BookInput) -> AppResult<Book> {
        let book = book.normalized();
        book.validate()?;

        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = created.id, "Book created: {}", created.title);
        Ok(created)
    }

    /// Replace an existing book
    pub async fn update_book(&self, id: i32, book: BookInput) -> AppResult<Book> {
        let book = book.normalized();
        book.validate()?;

        self.repository.books.update(id, &book).await
    }

    /// Delete a book and, through the foreign key, its lending history
    pub async fn delete_book(&self, id: i32) -> AppResult<i32> {
        let deleted = self.repository.books.delete(id).await?;
        tracing::info!(book_id = deleted, "Book deleted");
        Ok(deleted)
    }
}
