//! Action registry and the multi-action chain.
//!
//! Actions are created by name from the blocks of a multi-action document:
//!
//! ```json
//! {
//!   "CorrelateImplantDecay": { "IsEnabled": true, "MinLength": 5.0 }
//! }
//! ```
//!
//! Blocks are instantiated in document order and run in that order on every
//! event.

use crate::action::{Action, ActionStatus};
use crate::correlate::{self, CorrelateImplantDecay};
use crate::{Error, Result};
use decaytrack_core::{EventRecord, TpcData};
use serde_json::Value;
use std::collections::HashMap;

/// Constructor for a boxed action.
pub type ActionFactory = fn() -> Box<dyn Action>;

fn new_correlator() -> Box<dyn Action> {
    Box::new(CorrelateImplantDecay::default())
}

/// Maps configuration block names to action constructors.
pub struct ActionRegistry {
    factories: HashMap<String, ActionFactory>,
}

impl Default for ActionRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(correlate::ACTION_ID, new_correlator);
        registry
    }
}

impl ActionRegistry {
    /// Registry with no actions.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registers (or replaces) the factory for `name`.
    pub fn register(&mut self, name: &str, factory: ActionFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    /// Returns true if `name` has a factory.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Creates an unconfigured action.
    ///
    /// # Errors
    /// Returns [`Error::UnknownAction`] if nothing is registered under `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn Action>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| Error::UnknownAction(name.to_string()))
    }
}

/// Counters accumulated while running a chain over many events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainStatistics {
    /// Events processed.
    pub events: usize,
    /// Events with clusters left after the chain.
    pub kept: usize,
    /// Events whose clusters were removed by an action.
    pub cleared: usize,
}

/// An ordered list of configured actions.
#[derive(Default)]
pub struct ActionChain {
    actions: Vec<Box<dyn Action>>,
}

impl ActionChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a chain from a multi-action document.
    ///
    /// # Errors
    /// Returns an error if the document is not an object, names an unknown
    /// action, or contains a malformed block.
    pub fn from_config(registry: &ActionRegistry, config: &Value) -> Result<Self> {
        let blocks = config.as_object().ok_or_else(|| {
            Error::ConfigError("multi-action document must be an object of blocks".to_string())
        })?;

        let mut chain = Self::new();
        for (name, block) in blocks {
            let mut action = registry.create(name)?;
            action.read_configuration(block)?;
            chain.push(action);
        }
        Ok(chain)
    }

    /// Appends an action.
    pub fn push(&mut self, action: Box<dyn Action>) {
        self.actions.push(action);
    }

    /// Number of actions in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns true if the chain has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Turns per-event diagnostics on or off for every action.
    pub fn set_verbose(&mut self, verbose: bool) {
        for action in &mut self.actions {
            action.set_verbose(verbose);
        }
    }

    /// Returns true if any action logs per-event diagnostics.
    #[must_use]
    pub fn any_verbose(&self) -> bool {
        self.actions.iter().any(|action| action.is_verbose())
    }

    /// Runs every action on one event, in order.
    pub fn run(&mut self, tpc: &mut TpcData) -> Vec<ActionStatus> {
        self.actions.iter_mut().map(|action| action.run(tpc)).collect()
    }

    /// Runs the chain over a sequence of events.
    pub fn run_all<'a, I>(&mut self, events: I) -> ChainStatistics
    where
        I: IntoIterator<Item = &'a mut EventRecord>,
    {
        let mut stats = ChainStatistics::default();
        for event in events {
            let statuses = self.run(&mut event.tpc);
            stats.events += 1;
            if statuses.contains(&ActionStatus::Cleared) {
                stats.cleared += 1;
            }
            if !event.tpc.is_empty() {
                stats.kept += 1;
            }
        }
        stats
    }

    /// Summaries of every action, one block per action.
    #[must_use]
    pub fn summary(&self) -> String {
        self.actions
            .iter()
            .map(|action| action.summary())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
