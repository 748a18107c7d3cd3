//! Task variants and the tagged registry that maps names to them.

use crate::{BIG_TARGET, SMALL_TARGET};

/// The Arm26 difficulty levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskVariant {
    /// Large target, sparse reward.
    Easy,
    /// Small target, sparse reward.
    Hard,
}

impl TaskVariant {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Hard => "hard",
        }
    }

    /// Target radius used by this variant.
    pub const fn target_size(self) -> f64 {
        match self {
            Self::Easy => BIG_TARGET,
            Self::Hard => SMALL_TARGET,
        }
    }

    pub const fn tags(self) -> &'static [&'static str] {
        match self {
            Self::Easy => &["benchmarking", "easy"],
            Self::Hard => &["benchmarking"],
        }
    }
}

/// Every registered task name.
pub const ALL_TASKS: [&str; 2] = ["easy", "hard"];

/// Name-to-variant table. Built explicitly by whoever loads tasks.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<TaskVariant>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Registry with both Arm26 variants.
    pub fn new() -> Self {
        Self {
            entries: vec![TaskVariant::Easy, TaskVariant::Hard],
        }
    }

    pub fn get(&self, name: &str) -> Option<TaskVariant> {
        self.entries.iter().copied().find(|v| v.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|v| v.name())
    }

    /// Names of the tasks carrying `tag`.
    pub fn tagged(&self, tag: &str) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|v| v.tags().contains(&tag))
            .map(|v| v.name())
            .collect()
    }
}
