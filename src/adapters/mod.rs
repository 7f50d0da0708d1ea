pub mod detector;
pub mod http;
pub mod render;
