//! The per-event action interface.

use crate::Result;
use decaytrack_core::TpcData;
use serde_json::Value;

/// What an action did to the event it was run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    /// Action disabled; the event was not looked at.
    Skipped,
    /// Event passed; clusters left as they were.
    Kept,
    /// Event rejected; all clusters removed.
    Cleared,
}

/// A user action run once per event by the reconstruction chain.
///
/// Actions are configured once from their block of the multi-action
/// document and then invoked with exclusive access to each event in turn.
pub trait Action: Send {
    /// Name of the configuration block this action reads.
    fn id(&self) -> &str;

    /// Reads the action's configuration block.
    ///
    /// # Errors
    /// Returns an error if the block is malformed.
    fn read_configuration(&mut self, block: &Value) -> Result<()>;

    /// Runs the action on one event, mutating it in place.
    fn run(&mut self, tpc: &mut TpcData) -> ActionStatus;

    /// Whether the action is enabled.
    fn is_enabled(&self) -> bool;

    /// Whether per-event diagnostics are on.
    fn is_verbose(&self) -> bool;

    /// Enables or disables per-event diagnostics.
    fn set_verbose(&mut self, verbose: bool);

    /// Human-readable summary of the configuration.
    fn summary(&self) -> String;
}

/// Formats the banner that opens every action summary.
pub(crate) fn summary_header(id: &str) -> String {
    format!("····· {id} ·····")
}
