use error_stack::{Report, ResultExt};
use sqlx::pool::PoolConnection;
use sqlx::{Error, Pool, Postgres};

use kernel::interface::database::DatabaseConnection;
use kernel::interface::query::DependOnBookQuery;
use kernel::interface::update::DependOnBookModifier;
use kernel::KernelError;

use crate::env;
use crate::error::ConvertError;

pub use self::book::*;

mod book;

static POSTGRES_URL: &str = "POSTGRES_URL";

pub type PostgresConnection = PoolConnection<Postgres>;

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    /// Connects to `POSTGRES_URL` and applies pending migrations.
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        let pool = Pool::connect(&url).await.convert_error()?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable_lazy(|| "Failed to run database migrations")?;
        tracing::info!("connected to postgres");
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Connection = PostgresConnection;
    async fn acquire(&self) -> error_stack::Result<PostgresConnection, KernelError> {
        let con = self.pool.acquire().await.convert_error()?;
        Ok(con)
    }
}

impl DependOnBookQuery for PostgresDatabase {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &PostgresBookRepository
    }
}

impl DependOnBookModifier for PostgresDatabase {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &PostgresBookRepository
    }
}

impl<T> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = match &error {
                Error::PoolTimedOut => KernelError::Timeout,
                Error::Database(e) if e.is_unique_violation() => KernelError::Conflict,
                _ => KernelError::Internal,
            };
            Report::from(error).change_context(context)
        })
    }
}
