pub mod check_email;
pub mod history;
pub mod home;
pub mod login;

pub use check_email::check_email_page;
pub use history::{history_page, Notice};
pub use home::{home_page, Outcome};
pub use login::login_page;
