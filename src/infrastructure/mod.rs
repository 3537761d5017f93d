pub mod http_collection;
pub mod sqlite_repo;
