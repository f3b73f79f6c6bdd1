use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct Author(String);

impl Author {
    pub fn new(author: impl Into<String>) -> Self {
        Self(author.into())
    }
}
