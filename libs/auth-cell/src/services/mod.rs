pub mod account;
pub mod share_code;

pub use account::AccountService;
pub use share_code::generate_share_code;
