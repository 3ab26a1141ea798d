pub mod capability;
pub mod error;
pub mod memory;

pub use capability::*;
pub use error::*;
pub use memory::*;
