pub mod heatmap;
pub mod info;
pub mod symbology;

pub use heatmap::*;
pub use info::*;
pub use symbology::*;
