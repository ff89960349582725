pub mod book;
pub mod record;
pub mod repository;
pub mod store;
pub mod todo;
pub mod validation;
