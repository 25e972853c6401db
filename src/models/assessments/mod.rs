pub mod entities;
pub mod import;
pub mod requests;
pub mod responses;
