use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Fromln, AsRefln)]
pub struct Year(i32);

impl Year {
    pub fn new(year: impl Into<i32>) -> Self {
        Self(year.into())
    }
}
