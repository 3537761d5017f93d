pub mod collection;
pub mod repository;
pub mod todo;
