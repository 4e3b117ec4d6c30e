//! Schema migrations for persisted and imported session records.
//!
//! Records are migrated as raw JSON objects before typed decoding. Each
//! `Migration` is keyed by the `schemaVersion` it reads:
//!
//! - `from_version < to_version`: upgrades the layout and bumps the version.
//! - `from_version == to_version`: normalizes a layout change that shipped
//!   without a version bump (the "pile" to "group" rename is one).
//!
//! `MigrationChain::migrate` applies every step in sequence from the record's
//! version up to the target. A record whose version is absent, newer than the
//! target, or has no upgrade path is rejected.

use chrono::Utc;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::core::CURRENT_SCHEMA_VERSION;

/// A record as a mutable JSON object.
pub type JsonObject = Map<String, Value>;

const VERSION_KEY: &str = "schemaVersion";

/// Reasons a record cannot be brought to the current schema.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MigrationError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("record has no integer schemaVersion")]
    MissingVersion,

    #[error("no migration path from schema version {found} to {target}")]
    NoPath { found: u64, target: u32 },

    #[error("migration '{description}' ({from} -> {to}) does not fit chain targeting {target}")]
    StepOutOfRange {
        description: String,
        from: u32,
        to: u32,
        target: u32,
    },
}

/// One step of the migration chain.
pub trait Migration {
    /// Version of the records this step reads.
    fn from_version(&self) -> u32;

    /// Version of the records this step produces.
    fn to_version(&self) -> u32;

    /// Human-readable description for logs.
    fn description(&self) -> &str;

    /// Transform the record in place. `schemaVersion` is rewritten by the chain.
    fn migrate(&self, record: &mut JsonObject);
}

/// Replace `key` with the array under `legacy` when `key` is not an array.
///
/// Missing both, `key` becomes `[]`. The legacy key is dropped either way.
fn adopt_legacy_array(record: &mut JsonObject, key: &str, legacy: &str) {
    let old = record.remove(legacy);
    if record.get(key).is_some_and(Value::is_array) {
        return;
    }
    let value = match old {
        Some(Value::Array(items)) => Value::Array(items),
        _ => Value::Array(Vec::new()),
    };
    record.insert(key.to_string(), value);
}

/// Groups used to be called piles; records written before the rename carry
/// `piles` / `topPileIds` under schema version 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct LegacyPileFields;

impl Migration for LegacyPileFields {
    fn from_version(&self) -> u32 {
        1
    }

    fn to_version(&self) -> u32 {
        1
    }

    fn description(&self) -> &str {
        "read piles/topPileIds as groups/topGroupIds"
    }

    fn migrate(&self, record: &mut JsonObject) {
        adopt_legacy_array(record, "groups", "piles");
        adopt_legacy_array(record, "topGroupIds", "topPileIds");
    }
}

/// Records written before skipping was tracked have no `discardedCardIds`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultDiscardedCardIds;

impl Migration for DefaultDiscardedCardIds {
    fn from_version(&self) -> u32 {
        1
    }

    fn to_version(&self) -> u32 {
        1
    }

    fn description(&self) -> &str {
        "default missing discardedCardIds to []"
    }

    fn migrate(&self, record: &mut JsonObject) {
        if !record.get("discardedCardIds").is_some_and(Value::is_array) {
            record.insert("discardedCardIds".to_string(), Value::Array(Vec::new()));
        }
    }
}

/// Hand-edited or very old records may lack one or both timestamps.
///
/// A missing `createdAt` becomes the current time; a missing `updatedAt`
/// copies `createdAt`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultTimestamps;

impl Migration for DefaultTimestamps {
    fn from_version(&self) -> u32 {
        1
    }

    fn to_version(&self) -> u32 {
        1
    }

    fn description(&self) -> &str {
        "default missing createdAt/updatedAt"
    }

    fn migrate(&self, record: &mut JsonObject) {
        if !record.contains_key("createdAt") {
            record.insert("createdAt".to_string(), Value::from(Utc::now().to_rfc3339()));
        }
        if !record.contains_key("updatedAt") {
            if let Some(created) = record.get("createdAt").cloned() {
                record.insert("updatedAt".to_string(), created);
            }
        }
    }
}

/// Ordered set of migrations targeting one schema version.
///
/// ## Example
///
/// ```
/// use serde_json::json;
/// use values_sort::persistence::MigrationChain;
///
/// let chain = MigrationChain::builtin();
/// let record = json!({"schemaVersion": 1, "piles": [], "topPileIds": []});
///
/// let migrated = chain.migrate(record).unwrap();
/// assert!(migrated["groups"].is_array());
/// assert!(migrated.get("piles").is_none());
///
/// assert!(chain.migrate(json!({"schemaVersion": 99})).is_err());
/// ```
pub struct MigrationChain {
    target: u32,
    steps: Vec<Box<dyn Migration>>,
}

impl std::fmt::Debug for MigrationChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let steps: Vec<_> = self.steps.iter().map(|s| s.description()).collect();
        f.debug_struct("MigrationChain")
            .field("target", &self.target)
            .field("steps", &steps)
            .finish()
    }
}

impl MigrationChain {
    /// Create an empty chain targeting `target`.
    #[must_use]
    pub fn new(target: u32) -> Self {
        Self {
            target,
            steps: Vec::new(),
        }
    }

    /// The chain shipped with the engine, targeting `CURRENT_SCHEMA_VERSION`.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(CURRENT_SCHEMA_VERSION)
            .with_step(LegacyPileFields)
            .with_step(DefaultDiscardedCardIds)
            .with_step(DefaultTimestamps)
    }

    /// Version every migrated record ends at.
    #[must_use]
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Number of registered steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Register a step.
    ///
    /// Returns `MigrationError::StepOutOfRange` if the step goes backwards or
    /// past the target; the chain is left unchanged.
    pub fn register(&mut self, step: Box<dyn Migration>) -> Result<(), MigrationError> {
        let (from, to) = (step.from_version(), step.to_version());
        if to < from || to > self.target {
            return Err(MigrationError::StepOutOfRange {
                description: step.description().to_string(),
                from,
                to,
                target: self.target,
            });
        }
        self.steps.push(step);
        Ok(())
    }

    /// Register a step (builder pattern).
    ///
    /// # Panics
    ///
    /// Panics if the step does not fit the chain (see `register`). Steps are
    /// fixed at build time, so a misfit is a programming error.
    #[must_use]
    pub fn with_step(mut self, step: impl Migration + 'static) -> Self {
        if let Err(e) = self.register(Box::new(step)) {
            panic!("{e}");
        }
        self
    }

    /// Bring a record to the target version.
    pub fn migrate(&self, value: Value) -> Result<Value, MigrationError> {
        let Value::Object(mut record) = value else {
            return Err(MigrationError::NotAnObject);
        };

        let found = read_version(&record).ok_or(MigrationError::MissingVersion)?;
        let no_path = MigrationError::NoPath {
            found,
            target: self.target,
        };
        let mut version = u32::try_from(found).map_err(|_| no_path.clone())?;
        if version > self.target {
            return Err(no_path);
        }

        loop {
            for step in self.steps.iter().filter(|s| {
                s.from_version() == version && s.to_version() == version
            }) {
                debug!(version, step = step.description(), "normalizing record");
                step.migrate(&mut record);
            }

            if version == self.target {
                break;
            }

            let upgrade = self
                .steps
                .iter()
                .find(|s| s.from_version() == version && s.to_version() > version)
                .ok_or_else(|| no_path.clone())?;
            debug!(
                from = version,
                to = upgrade.to_version(),
                step = upgrade.description(),
                "upgrading record"
            );
            upgrade.migrate(&mut record);
            version = upgrade.to_version();
        }

        record.insert(VERSION_KEY.to_string(), Value::from(version));
        Ok(Value::Object(record))
    }
}

impl Default for MigrationChain {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Integer `schemaVersion`, accepting whole-number floats like `1.0`.
fn read_version(record: &JsonObject) -> Option<u64> {
    let value = record.get(VERSION_KEY)?;
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct RenameField {
        from: u32,
        old: &'static str,
        new: &'static str,
    }

    impl Migration for RenameField {
        fn from_version(&self) -> u32 {
            self.from
        }

        fn to_version(&self) -> u32 {
            self.from + 1
        }

        fn description(&self) -> &str {
            "rename field"
        }

        fn migrate(&self, record: &mut JsonObject) {
            if let Some(v) = record.remove(self.old) {
                record.insert(self.new.to_string(), v);
            }
        }
    }

    #[test]
    fn test_piles_become_groups() {
        let chain = MigrationChain::builtin();
        let record = json!({
            "schemaVersion": 1,
            "piles": [{"id": "p1", "name": "Pile", "cardIds": ["c1"]}],
            "topPileIds": ["p1"],
        });

        let migrated = chain.migrate(record).unwrap();
        assert_eq!(migrated["groups"][0]["id"], "p1");
        assert_eq!(migrated["topGroupIds"], json!(["p1"]));
        assert!(migrated.get("piles").is_none());
        assert!(migrated.get("topPileIds").is_none());
        assert_eq!(migrated["discardedCardIds"], json!([]));
    }

    #[test]
    fn test_groups_win_over_piles() {
        let chain = MigrationChain::builtin();
        let record = json!({
            "schemaVersion": 1,
            "groups": [{"id": "g1", "name": "G", "cardIds": []}],
            "piles": [{"id": "p1", "name": "P", "cardIds": []}],
            "topGroupIds": "not an array",
            "topPileIds": ["p1"],
        });

        let migrated = chain.migrate(record).unwrap();
        assert_eq!(migrated["groups"][0]["id"], "g1");
        // A non-array current field falls back to the legacy one
        assert_eq!(migrated["topGroupIds"], json!(["p1"]));
    }

    #[test]
    fn test_missing_arrays_default_to_empty() {
        let migrated = MigrationChain::builtin()
            .migrate(json!({"schemaVersion": 1}))
            .unwrap();
        assert_eq!(migrated["groups"], json!([]));
        assert_eq!(migrated["topGroupIds"], json!([]));
        assert_eq!(migrated["discardedCardIds"], json!([]));
    }

    #[test]
    fn test_missing_timestamps_filled() {
        let migrated = MigrationChain::builtin()
            .migrate(json!({"schemaVersion": 1}))
            .unwrap();
        assert!(migrated["createdAt"].is_string());
        assert_eq!(migrated["updatedAt"], migrated["createdAt"]);

        let migrated = MigrationChain::builtin()
            .migrate(json!({"schemaVersion": 1, "createdAt": "2024-01-01T00:00:00Z"}))
            .unwrap();
        assert_eq!(migrated["createdAt"], "2024-01-01T00:00:00Z");
        assert_eq!(migrated["updatedAt"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_existing_discarded_ids_kept() {
        let migrated = MigrationChain::builtin()
            .migrate(json!({"schemaVersion": 1, "discardedCardIds": ["a"]}))
            .unwrap();
        assert_eq!(migrated["discardedCardIds"], json!(["a"]));
    }

    #[test]
    fn test_version_gate() {
        let chain = MigrationChain::builtin();

        assert_eq!(chain.migrate(json!([1, 2])), Err(MigrationError::NotAnObject));
        assert_eq!(chain.migrate(json!({})), Err(MigrationError::MissingVersion));
        assert_eq!(
            chain.migrate(json!({"schemaVersion": "1"})),
            Err(MigrationError::MissingVersion)
        );
        assert_eq!(
            chain.migrate(json!({"schemaVersion": 2})),
            Err(MigrationError::NoPath { found: 2, target: 1 })
        );
        assert_eq!(
            chain.migrate(json!({"schemaVersion": 0})),
            Err(MigrationError::NoPath { found: 0, target: 1 })
        );
    }

    #[test]
    fn test_whole_float_version_accepted() {
        let migrated = MigrationChain::builtin()
            .migrate(json!({"schemaVersion": 1.0}))
            .unwrap();
        assert_eq!(migrated["schemaVersion"], json!(1));
    }

    #[test]
    fn test_upgrade_steps_run_in_sequence() {
        let chain = MigrationChain::new(3)
            .with_step(RenameField { from: 1, old: "a", new: "b" })
            .with_step(RenameField { from: 2, old: "b", new: "c" });

        let migrated = chain.migrate(json!({"schemaVersion": 1, "a": 7})).unwrap();
        assert_eq!(migrated, json!({"schemaVersion": 3, "c": 7}));

        let migrated = chain.migrate(json!({"schemaVersion": 2, "b": 8})).unwrap();
        assert_eq!(migrated, json!({"schemaVersion": 3, "c": 8}));
    }

    #[test]
    fn test_gap_in_chain_rejected() {
        let chain = MigrationChain::new(3).with_step(RenameField { from: 2, old: "b", new: "c" });
        assert_eq!(
            chain.migrate(json!({"schemaVersion": 1})),
            Err(MigrationError::NoPath { found: 1, target: 3 })
        );
    }

    #[test]
    fn test_register_rejects_step_past_target() {
        let mut chain = MigrationChain::new(1);
        let err = chain
            .register(Box::new(RenameField { from: 1, old: "a", new: "b" }))
            .unwrap_err();

        assert_eq!(
            err,
            MigrationError::StepOutOfRange {
                description: "rename field".to_string(),
                from: 1,
                to: 2,
                target: 1,
            }
        );
        assert!(chain.is_empty());
    }

    #[test]
    #[should_panic(expected = "does not fit chain")]
    fn test_with_step_past_target_panics() {
        let _ = MigrationChain::new(1).with_step(RenameField { from: 1, old: "a", new: "b" });
    }

    #[test]
    fn test_builtin_chain_shape() {
        let chain = MigrationChain::builtin();
        assert_eq!(chain.target(), CURRENT_SCHEMA_VERSION);
        assert_eq!(chain.len(), 3);
        assert!(format!("{:?}", chain).contains("piles"));
    }
}
