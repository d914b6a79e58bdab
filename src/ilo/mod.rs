pub mod adapter;
pub mod client;
pub mod local;
pub mod redfish;
pub mod types;

pub use adapter::IntoSnapshot;
pub use client::IloClient;
