use crate::database::{DatabaseConnection, DependOnDatabaseConnection};
use crate::entity::{Book, BookPatch, Isbn};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookModifier: 'static + Sync + Send {
    type Connection: 'static + Send;
    /// Fails with [`KernelError::Conflict`] when the isbn is already taken.
    async fn create(
        &self,
        con: &mut Self::Connection,
        book: &Book,
    ) -> error_stack::Result<Book, KernelError>;
    /// Returns `None` when no book has the given isbn.
    async fn update(
        &self,
        con: &mut Self::Connection,
        isbn: &Isbn,
        patch: BookPatch,
    ) -> error_stack::Result<Option<Book>, KernelError>;
    /// Returns the isbn of the removed row, `None` when nothing matched.
    async fn delete(
        &self,
        con: &mut Self::Connection,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Isbn>, KernelError>;
}

pub trait DependOnBookModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookModifier: BookModifier<
        Connection = <Self::DatabaseConnection as DatabaseConnection>::Connection,
    >;
    fn book_modifier(&self) -> &Self::BookModifier;
}
