pub mod renderer;

pub use renderer::{GestureStatus, Renderer};
