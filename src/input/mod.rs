pub mod handler;

pub use handler::{BOOST_HOLD_WINDOW, InputHandler, KeyboardInput};
