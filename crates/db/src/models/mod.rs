//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus the `Deserialize` create DTO used by admin tooling
//! and tests.

pub mod comic_file;
pub mod resource;
pub mod user;
pub mod vip_plan;
