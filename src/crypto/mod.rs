pub mod cipher;
pub mod digest;
