pub mod error;
pub mod types;

pub mod collection;
pub mod native;
pub mod property;
pub mod reactive;
