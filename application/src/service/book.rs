use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{Book, Isbn};
use kernel::{ErrorMessage, KernelError};

use crate::transfer::{
    BookDto, CreateBookDto, DeleteBookDto, DeletedBookDto, GetBookDto, UpdateBookDto,
};

#[async_trait::async_trait]
pub trait GetBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookQuery
{
    async fn get_all_books(&self) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let mut connection = self.database_connection().acquire().await?;
        let books = self.book_query().find_all(&mut connection).await?;
        Ok(books.into_iter().map(BookDto::from).collect())
    }

    async fn get_book(&self, dto: GetBookDto) -> error_stack::Result<Option<BookDto>, KernelError> {
        let mut connection = self.database_connection().acquire().await?;

        let isbn = Isbn::new(dto.isbn);
        let book = self.book_query().find_by_isbn(&mut connection, &isbn).await?;

        Ok(book.map(BookDto::from))
    }
}

impl<T> GetBookService for T where T: DependOnDatabaseConnection + DependOnBookQuery {}

#[async_trait::async_trait]
pub trait CreateBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookModifier
{
    async fn create_book(&self, dto: CreateBookDto) -> error_stack::Result<BookDto, KernelError> {
        let mut connection = self.database_connection().acquire().await?;

        let book = Book::from(dto);
        tracing::debug!(isbn = %book.isbn(), "creating book");
        let created = self
            .book_modifier()
            .create(&mut connection, &book)
            .await
            .map_err(|report| match *report.current_context() {
                KernelError::Conflict => report.attach_printable(ErrorMessage::new(format!(
                    "There is already a book with an isbn {}",
                    book.isbn()
                ))),
                _ => report,
            })?;

        Ok(BookDto::from(created))
    }
}

impl<T> CreateBookService for T where T: DependOnDatabaseConnection + DependOnBookModifier {}

#[async_trait::async_trait]
pub trait UpdateBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookModifier
{
    async fn update_book(
        &self,
        dto: UpdateBookDto,
    ) -> error_stack::Result<Option<BookDto>, KernelError> {
        let mut connection = self.database_connection().acquire().await?;
        let (isbn, patch) = dto.into_patch();
        let updated = self
            .book_modifier()
            .update(&mut connection, &isbn, patch)
            .await?;
        Ok(updated.map(BookDto::from))
    }
}

impl<T> UpdateBookService for T where T: DependOnDatabaseConnection + DependOnBookModifier {}

#[async_trait::async_trait]
pub trait DeleteBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookModifier
{
    async fn delete_book(
        &self,
        dto: DeleteBookDto,
    ) -> error_stack::Result<Option<DeletedBookDto>, KernelError> {
        let mut connection = self.database_connection().acquire().await?;

        let isbn = Isbn::new(dto.isbn);
        let deleted = self.book_modifier().delete(&mut connection, &isbn).await?;

        Ok(deleted.map(|isbn| DeletedBookDto { isbn: isbn.into() }))
    }
}

impl<T> DeleteBookService for T where T: DependOnDatabaseConnection + DependOnBookModifier {}
