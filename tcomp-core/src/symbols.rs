//! Symbol table for one evaluation scope.
//!
//! The table is a plain value: entering a loop body clones it, and the
//! clone's final state is written back to the enclosing scope.

use std::collections::HashMap;

use crate::bits::Bitset;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Variable(Bitset),
    /// Element values in declaration order.
    Array(Vec<Bitset>),
    /// Reserved; nothing binds it yet.
    Collection,
}

impl Symbol {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Symbol::Variable(_) => "variable",
            Symbol::Array(_) => "array",
            Symbol::Collection => "collection",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    entries: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Bind `name`, replacing whatever it was bound to before.
    pub fn insert(&mut self, name: impl Into<String>, symbol: Symbol) {
        self.entries.insert(name.into(), symbol);
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.entries.get(name)
    }

    /// The bits bound to `name` if, and only if, it is a variable.
    pub fn variable(&self, name: &str) -> Option<&Bitset> {
        match self.entries.get(name) {
            Some(Symbol::Variable(bits)) => Some(bits),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.entries.iter().map(|(name, symbol)| (name.as_str(), symbol))
    }
}
