pub mod args;
pub mod color_when;
pub mod script;
