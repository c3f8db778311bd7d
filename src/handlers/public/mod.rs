pub mod health;
pub mod login;
pub mod options;
pub mod root;

pub use health::health;
pub use login::login;
pub use options::options_get;
pub use root::root;
