pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use router::support_network_routes;
pub use services::access::{require_accessible_subject, SupportAccessService};
pub use services::network::SupportNetworkService;
