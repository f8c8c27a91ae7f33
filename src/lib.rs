// src/lib.rs

pub mod fetch;
pub mod github;
pub mod html;
pub mod loader;
pub mod parse;
pub mod render;
