use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Fromln, AsRefln)]
pub struct Pages(i32);

impl Pages {
    pub fn new(pages: impl Into<i32>) -> Self {
        Self(pages.into())
    }
}
