pub mod display;
pub mod show;
pub mod template;
pub mod validate;
