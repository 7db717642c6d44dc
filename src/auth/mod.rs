pub mod magic;
pub mod sessions;
pub mod token;

pub use magic::{MagicLinkConfig, MagicLinkService};
pub use sessions::CurrentUser;
