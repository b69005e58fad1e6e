pub mod task;
pub mod category;
pub mod view;
pub mod config;
pub mod timestamp;

pub use task::*;
pub use category::*;
pub use view::*;
pub use config::*;
