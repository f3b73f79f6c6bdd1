mod amazon_url;
mod author;
mod isbn;
mod language;
mod pages;
mod publisher;
mod title;
mod year;

pub use self::{
    amazon_url::*, author::*, isbn::*, language::*, pages::*, publisher::*, title::*, year::*,
};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Book {
    isbn: Isbn,
    amazon_url: AmazonUrl,
    author: Author,
    language: Language,
    pages: Pages,
    publisher: Publisher,
    title: Title,
    year: Year,
}

impl Book {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        isbn: Isbn,
        amazon_url: AmazonUrl,
        author: Author,
        language: Language,
        pages: Pages,
        publisher: Publisher,
        title: Title,
        year: Year,
    ) -> Self {
        Self {
            isbn,
            amazon_url,
            author,
            language,
            pages,
            publisher,
            title,
            year,
        }
    }
}

/// Non-key fields to overwrite on an existing book. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Eq, PartialEq, Destructure)]
pub struct BookPatch {
    amazon_url: Option<AmazonUrl>,
    author: Option<Author>,
    language: Option<Language>,
    pages: Option<Pages>,
    publisher: Option<Publisher>,
    title: Option<Title>,
    year: Option<Year>,
}

impl BookPatch {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        amazon_url: Option<AmazonUrl>,
        author: Option<Author>,
        language: Option<Language>,
        pages: Option<Pages>,
        publisher: Option<Publisher>,
        title: Option<Title>,
        year: Option<Year>,
    ) -> Self {
        Self {
            amazon_url,
            author,
            language,
            pages,
            publisher,
            title,
            year,
        }
    }
}
