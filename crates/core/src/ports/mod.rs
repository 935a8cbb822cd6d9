mod movie_catalog;
mod trending_source;

pub use movie_catalog::*;
pub use trending_source::*;
