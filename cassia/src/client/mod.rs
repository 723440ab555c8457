//! Session machinery: building, executing, paging, caching.

pub mod caching_session;
pub mod execution_profile;
pub mod pager;
pub mod session;
pub mod session_builder;

pub use caching_session::CachingSession;
pub use execution_profile::ExecutionProfile;
pub use pager::RowStream;
pub use session::Session;
pub use session_builder::SessionBuilder;
