//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod comic_file_repo;
pub mod resource_repo;
pub mod user_repo;
pub mod vip_plan_repo;

pub use comic_file_repo::ComicFileRepo;
pub use resource_repo::ResourceRepo;
pub use user_repo::UserRepo;
pub use vip_plan_repo::VipPlanRepo;
