//! Building blocks of the `voronoi-view` binary: interaction scripts, the
//! frame loop, a software raster surface and frame encoders.

pub mod encode;
pub mod raster;
pub mod script;
pub mod session;

pub use encode::{FrameEncoder, OutputFormat};
pub use raster::RasterSurface;
pub use script::{frames, load_script, parse_step, Script, Step};
pub use session::{max_size, Session};
