//! Nominal type hierarchy.
//!
//! The variance rules fall back to nominal subtyping for class and interface
//! names (`Derived` may be returned where `Base` is promised). That relation
//! is supplied by a `NominalHierarchy`; `InheritanceGraph` is the in-memory
//! implementation used by `TypeRegistry`.
//!
//! Cycle detection happens when an edge is added, so every query can assume
//! the graph is acyclic.

use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::{Arc, PoisonError, RwLock};

/// Answers "is `sub` declared as a subtype of `sup`?".
///
/// Implementations are only asked about class/interface names; scalar names
/// never reach this trait.
pub trait NominalHierarchy {
    fn is_nominal_subtype(&self, sub: &str, sup: &str) -> bool;
}

impl<T: NominalHierarchy + ?Sized> NominalHierarchy for &T {
    fn is_nominal_subtype(&self, sub: &str, sup: &str) -> bool {
        (**self).is_nominal_subtype(sub, sup)
    }
}

impl<T: NominalHierarchy + ?Sized> NominalHierarchy for Arc<T> {
    fn is_nominal_subtype(&self, sub: &str, sup: &str) -> bool {
        (**self).is_nominal_subtype(sub, sup)
    }
}

/// A hierarchy with no declared relations: only identical names relate.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatHierarchy;

impl NominalHierarchy for FlatHierarchy {
    fn is_nominal_subtype(&self, sub: &str, sup: &str) -> bool {
        sub == sup
    }
}

/// Directed `child -> parents` graph of `extends`/`implements` edges.
#[derive(Debug, Default)]
pub struct InheritanceGraph {
    parents: RwLock<FxHashMap<String, Vec<String>>>,
}

impl InheritanceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `child` directly derives from each of `parents`.
    ///
    /// Callers must check [`would_create_cycle`](Self::would_create_cycle)
    /// first; this method does not.
    pub fn add_inheritance(&self, child: &str, parents: &[String]) {
        let mut graph = self.parents.write().unwrap_or_else(PoisonError::into_inner);
        let entry = graph.entry(child.to_string()).or_default();
        for parent in parents {
            if !entry.contains(parent) {
                entry.push(parent.clone());
            }
        }
    }

    /// True if adding `child -> parent` edges would close a cycle.
    pub fn would_create_cycle(&self, child: &str, parents: &[String]) -> bool {
        parents
            .iter()
            .any(|parent| parent == child || self.is_derived_from(parent, child))
    }

    /// Strict, transitive derivation: `child` reaches `ancestor` through at
    /// least one edge.
    pub fn is_derived_from(&self, child: &str, ancestor: &str) -> bool {
        let graph = self.parents.read().unwrap_or_else(PoisonError::into_inner);
        let mut stack: Vec<&str> = vec![child];
        let mut seen: FxHashSet<&str> = FxHashSet::default();

        while let Some(current) = stack.pop() {
            let Some(direct) = graph.get(current) else {
                continue;
            };
            for parent in direct {
                if parent == ancestor {
                    return true;
                }
                if seen.insert(parent.as_str()) {
                    stack.push(parent.as_str());
                }
            }
        }
        false
    }

    /// Direct parents in declaration order.
    pub fn direct_parents(&self, child: &str) -> Vec<String> {
        let graph = self.parents.read().unwrap_or_else(PoisonError::into_inner);
        graph.get(child).cloned().unwrap_or_default()
    }

    /// Every ancestor, nearest first, each listed once.
    pub fn ancestors(&self, child: &str) -> Vec<String> {
        let graph = self.parents.read().unwrap_or_else(PoisonError::into_inner);
        let mut result = Vec::new();
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut frontier: Vec<&str> = vec![child];

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for name in frontier {
                for parent in graph.get(name).into_iter().flatten() {
                    if seen.insert(parent.as_str()) {
                        result.push(parent.clone());
                        next.push(parent.as_str());
                    }
                }
            }
            frontier = next;
        }
        result
    }

    pub fn len(&self) -> usize {
        self.parents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NominalHierarchy for InheritanceGraph {
    /// Reflexive-transitive closure of the declared edges.
    fn is_nominal_subtype(&self, sub: &str, sup: &str) -> bool {
        sub == sup || self.is_derived_from(sub, sup)
    }
}

#[cfg(test)]
#[path = "../tests/inheritance_tests.rs"]
mod tests;
