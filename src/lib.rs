// Library surface for headless/integration tests and reuse.
// Rendering and terminal setup stay in the binary.
pub mod app_dirs;
pub mod config;
pub mod engine;
pub mod question;
pub mod runtime;
pub mod score;
pub mod session;
pub mod shuffle;
pub mod source;
pub mod timer;
