use std::sync::Arc;

use application::transfer::{CreateBookDto, DeleteBookDto, GetBookDto, UpdateBookDto};
use error_stack::{Report, ResultExt};
use kernel::interface::schema::{BookSchema, SchemaMode};
use kernel::{ErrorMessage, KernelError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::controller::{Intake, TryIntake};

#[derive(Debug)]
pub struct CreateBookRequest {
    body: Value,
}

impl CreateBookRequest {
    pub fn new(body: Value) -> Self {
        Self { body }
    }
}

#[derive(Debug)]
pub struct UpdateBookRequest {
    isbn: String,
    body: Value,
}

impl UpdateBookRequest {
    pub fn new(isbn: String, body: Value) -> Self {
        Self { isbn, body }
    }
}

#[derive(Debug)]
pub struct GetBookRequest {
    isbn: String,
}

impl GetBookRequest {
    pub fn new(isbn: String) -> Self {
        Self { isbn }
    }
}

#[derive(Debug)]
pub struct DeleteBookRequest {
    isbn: String,
}

impl DeleteBookRequest {
    pub fn new(isbn: String) -> Self {
        Self { isbn }
    }
}

#[derive(Debug, Deserialize)]
struct CreateBookBody {
    isbn: String,
    amazon_url: String,
    author: String,
    language: String,
    pages: i32,
    publisher: String,
    title: String,
    year: i32,
}

// The body isbn is required by the update schema but the path decides which book changes.
#[derive(Debug, Deserialize)]
struct UpdateBookBody {
    amazon_url: Option<String>,
    author: Option<String>,
    language: Option<String>,
    pages: Option<i32>,
    publisher: Option<String>,
    title: Option<String>,
    year: Option<i32>,
}

pub struct BookTransformer;

impl Intake<GetBookRequest> for BookTransformer {
    type To = GetBookDto;
    fn emit(&self, input: GetBookRequest) -> Self::To {
        GetBookDto { isbn: input.isbn }
    }
}

impl Intake<DeleteBookRequest> for BookTransformer {
    type To = DeleteBookDto;
    fn emit(&self, input: DeleteBookRequest) -> Self::To {
        DeleteBookDto { isbn: input.isbn }
    }
}

/// Validates request bodies against the book schema before building dtos.
pub struct BookPayloadTransformer {
    schema: Arc<BookSchema>,
}

impl BookPayloadTransformer {
    pub fn new(schema: Arc<BookSchema>) -> Self {
        Self { schema }
    }

    fn parse<T: DeserializeOwned>(
        &self,
        mode: SchemaMode,
        body: Value,
    ) -> error_stack::Result<T, KernelError> {
        self.schema.check(mode, &body)?;
        serde_json::from_value(body).map_err(|error| {
            let message = ErrorMessage::new(error.to_string());
            Report::from(error)
                .change_context(KernelError::Validation)
                .attach_printable(message)
        })
    }
}

impl TryIntake<CreateBookRequest> for BookPayloadTransformer {
    type To = CreateBookDto;
    type Error = Report<KernelError>;
    fn emit(&self, input: CreateBookRequest) -> Result<Self::To, Self::Error> {
        let body = self
            .parse::<CreateBookBody>(SchemaMode::Create, input.body)
            .attach_printable("Invalid book creation request")?;
        Ok(CreateBookDto {
            isbn: body.isbn,
            amazon_url: body.amazon_url,
            author: body.author,
            language: body.language,
            pages: body.pages,
            publisher: body.publisher,
            title: body.title,
            year: body.year,
        })
    }
}

impl TryIntake<UpdateBookRequest> for BookPayloadTransformer {
    type To = UpdateBookDto;
    type Error = Report<KernelError>;
    fn emit(&self, input: UpdateBookRequest) -> Result<Self::To, Self::Error> {
        let UpdateBookRequest { isbn, body } = input;
        let body = self
            .parse::<UpdateBookBody>(SchemaMode::Update, body)
            .attach_printable_lazy(|| format!("Invalid update request for book {isbn}"))?;
        Ok(UpdateBookDto {
            isbn,
            amazon_url: body.amazon_url,
            author: body.author,
            language: body.language,
            pages: body.pages,
            publisher: body.publisher,
            title: body.title,
            year: body.year,
        })
    }
}
