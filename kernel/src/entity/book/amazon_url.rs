use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct AmazonUrl(String);

impl AmazonUrl {
    pub fn new(amazon_url: impl Into<String>) -> Self {
        Self(amazon_url.into())
    }
}
