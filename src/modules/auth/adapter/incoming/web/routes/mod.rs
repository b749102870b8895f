pub mod login_user;
pub mod sign_up_user;

pub use login_user::{login_user_handler, LoginRequestDto, SessionResponse, SessionUser};
pub use sign_up_user::{sign_up_user_handler, SignUpRequestDto};
