pub mod access;
pub mod network;

pub use access::SupportAccessService;
pub use network::SupportNetworkService;
