// src/system/mod.rs

pub mod partials;
