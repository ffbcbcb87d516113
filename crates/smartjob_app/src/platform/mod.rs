mod app;
mod cli;
mod effects;
mod logging;
mod persistence;
mod shell;
mod ui;

pub use app::run_app;
