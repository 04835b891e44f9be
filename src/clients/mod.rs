pub mod google;

pub use google::GoogleAuthClient;
