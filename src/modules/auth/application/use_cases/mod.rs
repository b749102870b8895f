pub mod login_user;
pub mod sign_up_user;
