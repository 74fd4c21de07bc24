//! Compute module - Cell codec, the two per-tick kernels and the driver.

mod census;
mod codec;
mod color;
mod driver;
mod field;
mod flush;
mod transition;

pub use census::*;
pub use codec::*;
pub use color::*;
pub use driver::*;
pub use field::*;
pub use flush::*;
pub use transition::*;
