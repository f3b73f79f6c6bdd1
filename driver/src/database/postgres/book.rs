use sqlx::PgConnection;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    AmazonUrl, Author, Book, BookPatch, DestructBookPatch, Isbn, Language, Pages, Publisher,
    Title, Year,
};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::ConvertError;

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Connection = PostgresConnection;

    async fn find_all(
        &self,
        con: &mut PostgresConnection,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_all(con).await
    }

    async fn find_by_isbn(
        &self,
        con: &mut PostgresConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_isbn(con, isbn).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Connection = PostgresConnection;

    async fn create(
        &self,
        con: &mut PostgresConnection,
        book: &Book,
    ) -> error_stack::Result<Book, KernelError> {
        PgBookInternal::create(con, book).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        isbn: &Isbn,
        patch: BookPatch,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::update(con, isbn, patch).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Isbn>, KernelError> {
        PgBookInternal::delete(con, isbn).await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    isbn: String,
    amazon_url: String,
    author: String,
    language: String,
    pages: i32,
    publisher: String,
    title: String,
    year: i32,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        Book::new(
            Isbn::new(value.isbn),
            AmazonUrl::new(value.amazon_url),
            Author::new(value.author),
            Language::new(value.language),
            Pages::new(value.pages),
            Publisher::new(value.publisher),
            Title::new(value.title),
            Year::new(value.year),
        )
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Book>, KernelError> {
        // ctid keeps rows in heap order, the same order an unordered scan returns.
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT isbn, amazon_url, author, language, pages, publisher, title, year
            FROM books
            ORDER BY ctid
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn find_by_isbn(
        con: &mut PgConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT isbn, amazon_url, author, language, pages, publisher, title, year
            FROM books
            WHERE isbn = $1
            "#,
        )
        .bind(isbn.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        let found = row.map(Book::from);
        Ok(found)
    }

    async fn create(con: &mut PgConnection, book: &Book) -> error_stack::Result<Book, KernelError> {
        tracing::debug!(isbn = %book.isbn(), "inserting book");
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            INSERT INTO books (isbn, amazon_url, author, language, pages, publisher, title, year)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING isbn, amazon_url, author, language, pages, publisher, title, year
            "#,
        )
        .bind(book.isbn().as_ref())
        .bind(book.amazon_url().as_ref())
        .bind(book.author().as_ref())
        .bind(book.language().as_ref())
        .bind(book.pages().as_ref())
        .bind(book.publisher().as_ref())
        .bind(book.title().as_ref())
        .bind(book.year().as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(Book::from(row))
    }

    async fn update(
        con: &mut PgConnection,
        isbn: &Isbn,
        patch: BookPatch,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        tracing::debug!(%isbn, "updating book");
        let DestructBookPatch {
            amazon_url,
            author,
            language,
            pages,
            publisher,
            title,
            year,
        } = patch.into_destruct();
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            UPDATE books
            SET amazon_url = COALESCE($2, amazon_url),
                author     = COALESCE($3, author),
                language   = COALESCE($4, language),
                pages      = COALESCE($5, pages),
                publisher  = COALESCE($6, publisher),
                title      = COALESCE($7, title),
                year       = COALESCE($8, year)
            WHERE isbn = $1
            RETURNING isbn, amazon_url, author, language, pages, publisher, title, year
            "#,
        )
        .bind(isbn.as_ref())
        .bind(amazon_url.map(String::from))
        .bind(author.map(String::from))
        .bind(language.map(String::from))
        .bind(pages.map(i32::from))
        .bind(publisher.map(String::from))
        .bind(title.map(String::from))
        .bind(year.map(i32::from))
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn delete(
        con: &mut PgConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Isbn>, KernelError> {
        tracing::debug!(%isbn, "deleting book");
        let deleted = sqlx::query_scalar::<_, String>(
            // language=postgresql
            r#"
            DELETE FROM books
            WHERE isbn = $1
            RETURNING isbn
            "#,
        )
        .bind(isbn.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(deleted.map(Isbn::new))
    }
}
