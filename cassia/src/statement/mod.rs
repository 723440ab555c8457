//! Statements, batches and the binding rules.

use std::time::Duration;

pub mod batch;
pub mod prepared;
pub mod unprepared;

pub use batch::{Batch, BatchType};
pub use prepared::PreparedStatement;
pub use unprepared::Statement;

/// Consistency levels of the CQL protocol, with their wire codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum Consistency {
    Any = 0x0000,
    One = 0x0001,
    Two = 0x0002,
    Three = 0x0003,
    Quorum = 0x0004,
    All = 0x0005,
    #[default]
    LocalQuorum = 0x0006,
    EachQuorum = 0x0007,
    LocalOne = 0x000A,

    // Conditional-statement consistencies; also valid as the regular
    // consistency of a read.
    Serial = 0x0008,
    LocalSerial = 0x0009,
}

impl Consistency {
    pub fn is_serial(&self) -> bool {
        matches!(self, Consistency::Serial | Consistency::LocalSerial)
    }
}

/// The consistency of the paxos phase of a conditional statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SerialConsistency {
    Serial = 0x0008,
    #[default]
    LocalSerial = 0x0009,
}

/// Options shared by statements, prepared statements and batches. All are
/// optional; unset fields fall back to the execution profile and then to the
/// session defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct StatementConfig {
    pub(crate) consistency: Option<Consistency>,
    pub(crate) serial_consistency: Option<SerialConsistency>,

    pub(crate) is_idempotent: bool,
    pub(crate) tracing: bool,
    pub(crate) timestamp: Option<i64>,
    pub(crate) request_timeout: Option<Duration>,

    /// Inert names the engine resolves; the session forwards them verbatim.
    pub(crate) retry_policy: Option<String>,
    pub(crate) execution_profile: Option<String>,
    pub(crate) host: Option<String>,
}
