pub mod clipboard;
pub mod loader;
pub mod logging;
