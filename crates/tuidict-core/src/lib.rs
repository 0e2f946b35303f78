pub mod aggregate;
pub mod cache;
pub mod language;
pub mod output;
pub mod preprocess;
pub mod provider;
pub mod search;
pub mod session;

pub use tuidict_types as types;
