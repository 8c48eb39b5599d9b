pub mod design;
pub mod parse_system;
pub mod show;
pub mod validate;
