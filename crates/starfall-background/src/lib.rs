//! Shooting star background for the starfall terminal app.
//!
//! A fixed field of faint stars with comets streaking across it every few
//! seconds. [`Starfield`] owns the simulation and draws through any
//! [`starfall_core::Surface`]; [`CellCanvas`] is the surface that turns the
//! drawing into terminal cells.

mod animator;
mod canvas;
mod chars;
mod color;
mod comet;
mod star;

pub use animator::Starfield;
pub use canvas::CellCanvas;
pub use comet::{Comet, fade_alpha};
pub use star::Star;
