use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use snafu::Snafu;

/// Aliases for the particle counter metrics reported by Apollo Automation devices.
pub mod well_known {
    /// Particle count, 0.3 to 0.5 µm.
    pub const PM_0_3_TO_0_5: u64 = 1;
    /// Particle count, 0.5 to 1 µm.
    pub const PM_0_5_TO_1: u64 = 2;
    /// Particle count, 1 to 2.5 µm.
    pub const PM_1_TO_2_5: u64 = 3;
    /// Particle count, 2.5 to 4 µm.
    pub const PM_2_5_TO_4: u64 = 4;
    /// Particle count, 4 to 10 µm.
    pub const PM_4_TO_10: u64 = 5;
    /// Total particle count.
    pub const PM_TOTAL_COUNT: u64 = 6;
    /// Whether the device is online.
    pub const DEVICE_ONLINE: u64 = 7;
    /// Device uptime.
    pub const UPTIME: u64 = 8;

    pub(super) const ALL: [(u64, &str); 8] = [
        (PM_0_3_TO_0_5, "pm_0_3_to_0_5"),
        (PM_0_5_TO_1, "pm_0_5_to_1"),
        (PM_1_TO_2_5, "pm_1_to_2_5"),
        (PM_2_5_TO_4, "pm_2_5_to_4"),
        (PM_4_TO_10, "pm_4_to_10"),
        (PM_TOTAL_COUNT, "pm_total_count"),
        (DEVICE_ONLINE, "device_online"),
        (UPTIME, "uptime"),
    ];
}

/// Alias table error.
#[derive(Debug, Eq, PartialEq, Snafu)]
#[snafu(context(suffix(false)))]
pub enum AliasTableError {
    /// Alias is zero.
    ///
    /// Zero is the sentinel for "no alias" on the wire, and so can't be assigned to a metric.
    #[snafu(display("alias for metric '{}' must be non-zero", name))]
    ZeroAlias {
        /// Metric name.
        name: String,
    },

    /// Metric name is empty.
    #[snafu(display("metric name for alias {} must not be empty", alias))]
    EmptyName {
        /// Alias.
        alias: u64,
    },

    /// Alias is assigned to more than one metric.
    #[snafu(display("alias {} is assigned to both '{}' and '{}'", alias, first, second))]
    DuplicateAlias {
        /// Alias.
        alias: u64,

        /// Name of the metric the alias was first assigned to.
        first: String,

        /// Name of the metric the alias was assigned to again.
        second: String,
    },

    /// Metric name is assigned more than one alias.
    #[snafu(display("metric '{}' has more than one alias", name))]
    DuplicateName {
        /// Metric name.
        name: String,
    },
}

/// A mapping between a metric alias and its name.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MetricAlias {
    /// Alias.
    pub alias: u64,

    /// Metric name.
    pub name: String,
}

impl MetricAlias {
    /// Creates a new `MetricAlias`.
    pub fn new<N>(alias: u64, name: N) -> Self
    where
        N: Into<String>,
    {
        Self {
            alias,
            name: name.into(),
        }
    }
}

/// Returns the well-known metric aliases.
pub fn well_known_aliases() -> Vec<MetricAlias> {
    well_known::ALL
        .iter()
        .map(|(alias, name)| MetricAlias::new(*alias, *name))
        .collect()
}

/// A table of metric aliases.
///
/// Consumers of compact messages, which identify metrics by alias only, rely on this mapping having been established by
/// an earlier definition message. Each alias maps to exactly one name, and vice versa.
#[derive(Clone, Debug)]
pub struct AliasTable {
    entries: Vec<MetricAlias>,
    by_alias: HashMap<u64, usize>,
    by_name: HashMap<String, usize>,
}

impl AliasTable {
    /// Creates a new `AliasTable` from the given entries.
    ///
    /// Entries are kept in the given order.
    ///
    /// # Errors
    ///
    /// If any alias is zero, any name is empty, or any alias or name appears more than once, an error is returned.
    pub fn new<I>(entries: I) -> Result<Self, AliasTableError>
    where
        I: IntoIterator<Item = MetricAlias>,
    {
        let mut table = Self {
            entries: Vec::new(),
            by_alias: HashMap::new(),
            by_name: HashMap::new(),
        };

        for entry in entries {
            if entry.alias == 0 {
                return ZeroAlias { name: entry.name }.fail();
            }

            if entry.name.is_empty() {
                return EmptyName { alias: entry.alias }.fail();
            }

            if let Some(existing) = table.by_alias.get(&entry.alias) {
                return DuplicateAlias {
                    alias: entry.alias,
                    first: table.entries[*existing].name.clone(),
                    second: entry.name,
                }
                .fail();
            }

            if table.by_name.contains_key(&entry.name) {
                return DuplicateName { name: entry.name }.fail();
            }

            let idx = table.entries.len();
            table.by_alias.insert(entry.alias, idx);
            table.by_name.insert(entry.name.clone(), idx);
            table.entries.push(entry);
        }

        Ok(table)
    }

    /// Creates an `AliasTable` holding the well-known metric aliases.
    pub fn well_known() -> Self {
        let entries = well_known_aliases();
        let by_alias = entries.iter().enumerate().map(|(idx, e)| (e.alias, idx)).collect();
        let by_name = entries.iter().enumerate().map(|(idx, e)| (e.name.clone(), idx)).collect();

        Self {
            entries,
            by_alias,
            by_name,
        }
    }

    /// Gets the name for the given alias.
    pub fn name_of(&self, alias: u64) -> Option<&str> {
        self.by_alias.get(&alias).map(|idx| self.entries[*idx].name.as_str())
    }

    /// Gets the alias for the given name.
    pub fn alias_of(&self, name: &str) -> Option<u64> {
        self.by_name.get(name).map(|idx| self.entries[*idx].alias)
    }

    /// Returns an iterator over the entries, in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &MetricAlias> {
        self.entries.iter()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::well_known()
    }
}
