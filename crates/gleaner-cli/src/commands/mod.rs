//! Command implementations.

pub mod archive;
pub mod digest;
pub mod extract;
pub mod hash;
pub mod init;
pub mod process;
pub mod reconcile;

pub use self::archive::execute_archive;
pub use self::digest::{execute_digest, execute_weekly_review};
pub use self::extract::execute_extract;
pub use self::hash::execute_hash;
pub use self::init::execute_init;
pub use self::process::execute_process;
pub use self::reconcile::execute_reconcile;
