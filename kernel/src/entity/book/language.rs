use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct Language(String);

impl Language {
    pub fn new(language: impl Into<String>) -> Self {
        Self(language.into())
    }
}
