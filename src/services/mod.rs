//! Service layer

mod cluster_service;

pub use cluster_service::ClusterService;
