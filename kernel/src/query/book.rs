use crate::database::{DatabaseConnection, DependOnDatabaseConnection};
use crate::entity::{Book, Isbn};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookQuery: 'static + Sync + Send {
    type Connection: 'static + Send;
    /// Every stored book, in storage order.
    async fn find_all(
        &self,
        con: &mut Self::Connection,
    ) -> error_stack::Result<Vec<Book>, KernelError>;
    async fn find_by_isbn(
        &self,
        con: &mut Self::Connection,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError>;
}

pub trait DependOnBookQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookQuery: BookQuery<
        Connection = <Self::DatabaseConnection as DatabaseConnection>::Connection,
    >;
    fn book_query(&self) -> &Self::BookQuery;
}
