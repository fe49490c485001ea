pub mod json_path;
pub mod primitive;

pub use json_path::JsonPath;
pub use primitive::JsonType;
