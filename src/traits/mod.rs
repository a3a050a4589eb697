pub mod delegate;
pub mod line;
pub mod repository;
