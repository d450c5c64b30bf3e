pub mod current_user;
pub mod lockout;
pub mod password;

pub use current_user::{AdminUser, SessionUser, StaffUser};
