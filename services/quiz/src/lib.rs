pub mod config;
pub mod listener;
pub mod presenter;
pub mod question_loader;
pub mod speaker;
pub mod terminal;
