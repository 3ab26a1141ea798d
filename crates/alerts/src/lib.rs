pub mod error;
pub mod feed;
pub mod filters;
pub mod mock;
pub mod model;
pub mod store;

pub use error::*;
pub use feed::*;
pub use filters::*;
pub use model::*;
pub use store::*;
