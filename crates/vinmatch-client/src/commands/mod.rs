pub mod canonicalize;
pub mod common;
pub mod describe;
pub mod registry;
pub mod table;
