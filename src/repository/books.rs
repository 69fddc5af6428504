//! Books repository for database operations

use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{conflict_on_unique, AppError, AppResult},
    models::book::{Book, BookInput, BookQuery},
};

use super::lending::non_empty;

const BOOK_COLUMNS: &str = "id, title, author, isbn, quantity, category, created_at, updated_at";

fn duplicate_isbn(_constraint: &str) -> String {
    "A book with this ISBN already exists".to_string()
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Search books with optional filters, ordered by title
    pub async fn search(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM books WHERE 1=1", BOOK_COLUMNS));

        if let Some(search) = non_empty(&query.search) {
            let pattern = format!("%{}%", search);
            builder
                .push(" AND (LOWER(title) LIKE LOWER(")
                .push_bind(pattern.clone())
                .push(") OR LOWER(author) LIKE LOWER(")
                .push_bind(pattern)
                .push("))");
        }

        if let Some(category) = non_empty(&query.category) {
            builder
                .push(" AND LOWER(category) = LOWER(")
                .push_bind(category.to_string())
                .push(")");
        }

        if let Some(author) = non_empty(&query.author) {
            builder
                .push(" AND LOWER(author) = LOWER(")
                .push_bind(author.to_string())
                .push(")");
        }

        match query.available {
            Some(true) => {
                builder.push(" AND quantity > 0");
            }
            Some(false) => {
                builder.push(" AND quantity = 0");
            }
            None => {}
        }

        builder.push(" ORDER BY title ASC");

        let books = builder.build_query_as::<Book>().fetch_all(&self.pool).await?;
        Ok(books)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Create a new book
    pub async fn create(&self, book: &BookInput) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, isbn, quantity, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.quantity)
        .bind(&book.category)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, duplicate_isbn))
    }

    /// Replace every editable field of a book
    pub async fn update(&self, id: i32, book: &BookInput) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $1, author = $2, isbn = $3, quantity = $4, category = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.quantity)
        .bind(&book.category)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, duplicate_isbn))?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book; its lending records cascade
    pub async fn delete(&self, id: i32) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>("DELETE FROM books WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }
}
