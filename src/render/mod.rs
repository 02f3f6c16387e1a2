//! Rendering: snapshot to draw commands, painted into the terminal

pub mod frame;
pub mod sprite;
pub mod stars;
pub mod terminal;
