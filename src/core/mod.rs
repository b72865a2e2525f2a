pub mod clock;
pub mod controller;
pub mod input_adapter;
pub mod window;

pub use clock::FrameClock;
pub use controller::{Button, Controller};
pub use input_adapter::{WinitController, LINE_HEIGHT};
pub use window::{WindowContext, WindowDimensions};
