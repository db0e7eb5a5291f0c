pub mod lifecycle;
pub mod list;
pub mod logs;
pub mod render;
