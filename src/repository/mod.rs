pub mod repository_error;
pub mod user_query;
pub mod user_repo;
