//! Resource model layer
//!
//! Lightweight snapshots of the Kubernetes objects the dashboard works with.
//! Snapshots are built fresh from a list call, serialized to the frontend
//! as-is, and fed to the topology resolver; nothing here is persisted or
//! mutated after construction.

mod snapshot;

pub use snapshot::{
    format_age, DeploymentSnapshot, IngressPath, IngressRule, IngressSnapshot, ObjectRef,
    PodSnapshot, ServiceSnapshot,
};
