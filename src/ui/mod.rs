/// UI module exports
pub mod components;
pub mod render;
pub mod viewer;
