//! Execution profiles: named option bundles.
//!
//! A profile is registered on the session at build time and selected per
//! statement by name. Options set directly on a statement win over the
//! profile's, which win over the session default profile's.

use std::time::Duration;

use crate::statement::{Consistency, SerialConsistency};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionProfile {
    pub(crate) consistency: Option<Consistency>,
    pub(crate) serial_consistency: Option<SerialConsistency>,
    pub(crate) request_timeout: Option<Duration>,
    /// Inert names forwarded to the engine.
    pub(crate) retry_policy: Option<String>,
    pub(crate) load_balancing: Option<String>,
}

impl ExecutionProfile {
    pub fn builder() -> ExecutionProfileBuilder {
        ExecutionProfileBuilder {
            profile: ExecutionProfile::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExecutionProfileBuilder {
    profile: ExecutionProfile,
}

impl ExecutionProfileBuilder {
    pub fn consistency(mut self, consistency: Consistency) -> Self {
        self.profile.consistency = Some(consistency);
        self
    }

    pub fn serial_consistency(mut self, serial_consistency: SerialConsistency) -> Self {
        self.profile.serial_consistency = Some(serial_consistency);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.profile.request_timeout = Some(timeout);
        self
    }

    /// Names a retry policy for the engine to resolve.
    pub fn retry_policy(mut self, name: impl Into<String>) -> Self {
        self.profile.retry_policy = Some(name.into());
        self
    }

    /// Names a load balancing policy for the engine to resolve.
    pub fn load_balancing(mut self, name: impl Into<String>) -> Self {
        self.profile.load_balancing = Some(name.into());
        self
    }

    pub fn build(self) -> ExecutionProfile {
        self.profile
    }
}
