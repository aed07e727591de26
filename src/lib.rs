pub mod cache;
pub mod config;
pub mod form;
pub mod limits;
pub mod model;
pub mod observability;
pub mod picker;
pub mod refresher;
pub mod session;
pub mod validator;
