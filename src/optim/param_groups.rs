//! Parameter groups: the mutable target a schedule writes into
//!
//! An optimizer keeps its hyperparameters in an ordered list of groups, each
//! mapping an option name (`"lr"`, `"momentum"`, ...) to a value. Schedules
//! hold a [`ParamGroups`] handle onto that list and overwrite one named option
//! in every group; the list itself stays owned by whoever drives training.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// A single bundle of optimizer options sharing the same values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamGroup {
    options: BTreeMap<String, f64>,
}

impl ParamGroup {
    /// Create an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of an option
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.options.insert(name.into(), value);
        self
    }

    /// Read an option
    pub fn get(&self, name: &str) -> Option<f64> {
        self.options.get(name).copied()
    }

    /// Write an option, inserting it if absent
    pub fn set(&mut self, name: &str, value: f64) {
        match self.options.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.options.insert(name.to_string(), value);
            }
        }
    }

    /// Whether the option exists
    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// Iterate over `(name, value)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.options.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Shared, non-owning handle onto an ordered list of parameter groups.
///
/// Cloning the handle is cheap and every clone sees the same groups. Borrows
/// never outlive a single method call, so there is no way to observe a
/// half-written broadcast from the outside.
#[derive(Debug, Clone, Default)]
pub struct ParamGroups {
    groups: Rc<RefCell<Vec<ParamGroup>>>,
}

impl ParamGroups {
    /// Wrap a list of groups
    pub fn new(groups: Vec<ParamGroup>) -> Self {
        Self { groups: Rc::new(RefCell::new(groups)) }
    }

    /// A target with one group holding one option
    pub fn single(name: &str, value: f64) -> Self {
        Self::new(vec![ParamGroup::new().with(name, value)])
    }

    /// `count` identical groups holding one option
    pub fn uniform(count: usize, name: &str, value: f64) -> Self {
        Self::new(vec![ParamGroup::new().with(name, value); count])
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.borrow().len()
    }

    /// Whether there are no groups
    pub fn is_empty(&self) -> bool {
        self.groups.borrow().is_empty()
    }

    /// Append a group
    pub fn push(&self, group: ParamGroup) {
        self.groups.borrow_mut().push(group);
    }

    /// Read option `name` of group `index`
    pub fn get(&self, index: usize, name: &str) -> Option<f64> {
        self.groups.borrow().get(index).and_then(|g| g.get(name))
    }

    /// Write `value` into option `name` of every group
    pub fn set_all(&self, name: &str, value: f64) {
        for group in self.groups.borrow_mut().iter_mut() {
            group.set(name, value);
        }
    }

    /// Current value of option `name` in each group that has it, in order
    pub fn values(&self, name: &str) -> Vec<f64> {
        self.groups.borrow().iter().filter_map(|g| g.get(name)).collect()
    }

    /// Copy of the current groups
    pub fn snapshot(&self) -> Vec<ParamGroup> {
        self.groups.borrow().clone()
    }

    /// Whether two handles point at the same groups
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.groups, &other.groups)
    }
}

impl From<Vec<ParamGroup>> for ParamGroups {
    fn from(groups: Vec<ParamGroup>) -> Self {
        Self::new(groups)
    }
}
