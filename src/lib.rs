// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod evaluator;
pub mod history;
pub mod machine;
pub mod runtime;
pub mod scheduler;
pub mod score;
pub mod session;
