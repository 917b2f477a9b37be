// Presentation layer for the terminal: vessel rendering, markdown display and
// the shell that ties the selection to the AI uplink.

pub mod markdown;
pub mod render;
pub mod shell;

pub use render::OutputFormat;
pub use shell::{SelectionFlags, Shell};
