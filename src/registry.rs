use std::collections::BTreeMap;

use serde::Serialize;

use crate::file_parsers::bank::types::Bank;

/// Decoded banks keyed by the position other banks use to point at them
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct BankRegistry {
    banks: BTreeMap<u64, Bank>,
}

impl BankRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bank, handing back whatever was registered at that position before
    pub fn insert(&mut self, position: u64, bank: Bank) -> Option<Bank> {
        self.banks.insert(position, bank)
    }

    pub fn get(&self, position: u64) -> Option<&Bank> {
        self.banks.get(&position)
    }

    pub fn contains(&self, position: u64) -> bool {
        self.banks.contains_key(&position)
    }

    pub fn len(&self) -> usize {
        self.banks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    /// Banks in ascending position order
    pub fn iter(&self) -> impl Iterator<Item = (u64, &Bank)> {
        self.banks.iter().map(|(position, bank)| (*position, bank))
    }
}
