mod activity;
mod export;
mod window;

pub use activity::*;
pub use export::*;
pub use window::*;
