// src/core/mod.rs

pub mod builder;
pub mod config_loader;
pub mod graph_display;
pub mod resolver;
pub mod usage;
pub mod validator;
pub mod value;
