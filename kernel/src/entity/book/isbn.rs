use std::fmt::Display;

use vodca::{AsRefln, Fromln};

/// Primary key of a book. Never changes once the book is stored.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Fromln, AsRefln)]
pub struct Isbn(String);

impl Isbn {
    pub fn new(isbn: impl Into<String>) -> Self {
        Self(isbn.into())
    }
}

impl Display for Isbn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
