//! Olympic statistics dashboard service library.

pub mod config;
pub mod dashboard;
pub mod http;
pub mod lifecycle;
pub mod models;
pub mod net;
pub mod observability;
pub mod source;

pub use config::schema::DashboardConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use source::OlympicService;
