use kernel::prelude::entity::{
    AmazonUrl, Author, Book, BookPatch, DestructBook, Isbn, Language, Pages, Publisher, Title,
    Year,
};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BookDto {
    pub isbn: String,
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    pub pages: i32,
    pub publisher: String,
    pub title: String,
    pub year: i32,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let DestructBook {
            isbn,
            amazon_url,
            author,
            language,
            pages,
            publisher,
            title,
            year,
        } = value.into_destruct();
        Self {
            isbn: isbn.into(),
            amazon_url: amazon_url.into(),
            author: author.into(),
            language: language.into(),
            pages: pages.into(),
            publisher: publisher.into(),
            title: title.into(),
            year: year.into(),
        }
    }
}

pub struct GetBookDto {
    pub isbn: String,
}

#[derive(Debug, Clone)]
pub struct CreateBookDto {
    pub isbn: String,
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    pub pages: i32,
    pub publisher: String,
    pub title: String,
    pub year: i32,
}

impl From<CreateBookDto> for Book {
    fn from(value: CreateBookDto) -> Self {
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

/// `isbn` selects the row; the remaining fields overwrite only when present.
#[derive(Debug, Clone)]
pub struct UpdateBookDto {
    pub isbn: String,
    pub amazon_url: Option<String>,
    pub author: Option<String>,
    pub language: Option<String>,
    pub pages: Option<i32>,
    pub publisher: Option<String>,
    pub title: Option<String>,
    pub year: Option<i32>,
}

impl UpdateBookDto {
    pub(crate) fn into_patch(self) -> (Isbn, BookPatch) {
        let patch = BookPatch::new(
            self.amazon_url.map(AmazonUrl::new),
            self.author.map(Author::new),
            self.language.map(Language::new),
            self.pages.map(Pages::new),
            self.publisher.map(Publisher::new),
            self.title.map(Title::new),
            self.year.map(Year::new),
        );
        (Isbn::new(self.isbn), patch)
    }
}

pub struct DeleteBookDto {
    pub isbn: String,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DeletedBookDto {
    pub isbn: String,
}
