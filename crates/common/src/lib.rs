//! Text helpers shared by the leadflow crates.

pub mod text;
