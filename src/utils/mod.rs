pub mod builder;
pub mod error;
pub mod mason;
pub mod response;
pub mod urls;
