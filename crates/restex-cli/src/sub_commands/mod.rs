pub mod batch;
pub mod cancel_demo;
pub mod create;
pub mod create_with_headers;
pub mod delete;
pub mod error_demo;
pub mod instance;
pub mod list;
pub mod transform;
pub mod update;
