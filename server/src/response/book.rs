use crate::controller::Exhaust;
use application::transfer::{BookDto, DeletedBookDto};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Field order here is the order clients see in the JSON body.
#[derive(Debug, Serialize)]
pub struct BookBody {
    isbn: String,
    amazon_url: String,
    author: String,
    language: String,
    pages: i32,
    publisher: String,
    title: String,
    year: i32,
}

impl From<BookDto> for BookBody {
    fn from(value: BookDto) -> Self {
        Self {
            isbn: value.isbn,
            amazon_url: value.amazon_url,
            author: value.author,
            language: value.language,
            pages: value.pages,
            publisher: value.publisher,
            title: value.title,
            year: value.year,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BooksResponse {
    books: Vec<BookBody>,
}

impl IntoResponse for BooksResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    book: BookBody,
}

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedBookResponse {
    book: BookBody,
}

impl IntoResponse for CreatedBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, axum::Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedBookResponse {
    message: &'static str,
}

impl IntoResponse for DeletedBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct BookPresenter;

impl Exhaust<Vec<BookDto>> for BookPresenter {
    type To = BooksResponse;
    fn emit(&self, input: Vec<BookDto>) -> Self::To {
        BooksResponse {
            books: input.into_iter().map(BookBody::from).collect(),
        }
    }
}

impl Exhaust<Option<BookDto>> for BookPresenter {
    type To = Option<BookResponse>;
    fn emit(&self, input: Option<BookDto>) -> Self::To {
        input.map(|book| BookResponse {
            book: BookBody::from(book),
        })
    }
}

impl Exhaust<BookDto> for BookPresenter {
    type To = CreatedBookResponse;
    fn emit(&self, input: BookDto) -> Self::To {
        CreatedBookResponse {
            book: BookBody::from(input),
        }
    }
}

impl Exhaust<Option<DeletedBookDto>> for BookPresenter {
    type To = Option<DeletedBookResponse>;
    fn emit(&self, input: Option<DeletedBookDto>) -> Self::To {
        input.map(|_| DeletedBookResponse {
            message: "Book deleted",
        })
    }
}
