pub use crate::error::*;

mod database;
mod entity;
mod error;
mod modify;
mod query;
mod schema;

#[cfg(feature = "prelude")]
pub mod prelude {
    pub mod entity {
        pub use crate::entity::*;
    }
}

#[cfg(feature = "interface")]
pub mod interface {
    pub mod database {
        pub use crate::database::*;
    }
    pub mod query {
        pub use crate::query::*;
    }
    pub mod update {
        pub use crate::modify::*;
    }
    pub mod schema {
        pub use crate::schema::*;
    }
}
