pub mod login_user;
pub mod recover_password;
