//! Parameter groups and per-parameter state storage.
//!
//! An optimizer owns an ordered list of [`ParamGroup`]s, each pairing a set of
//! parameter handles with the configuration that applies to them, and a
//! [`StateStore`] holding one state entry per parameter identity.

use crate::{
    parameter::{ParamId, Parameter},
    types::Scalar,
};
use std::collections::HashMap;

/// A set of parameters sharing one configuration.
#[derive(Debug, Clone)]
pub struct ParamGroup<T: Scalar, C> {
    params: Vec<Parameter<T>>,
    config: C,
}

impl<T: Scalar, C> ParamGroup<T, C> {
    /// Creates a group from parameter handles and their configuration.
    pub fn new(params: Vec<Parameter<T>>, config: C) -> Self {
        Self { params, config }
    }

    /// The parameters of this group, in insertion order.
    pub fn params(&self) -> &[Parameter<T>] {
        &self.params
    }

    /// The configuration of this group.
    pub fn config(&self) -> &C {
        &self.config
    }

    /// Consumes the group, returning its parameters.
    pub fn into_params(self) -> Vec<Parameter<T>> {
        self.params
    }

    /// Number of parameters in the group.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true if the group holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns true if a parameter with identity `id` belongs to the group.
    pub fn contains(&self, id: ParamId) -> bool {
        self.params.iter().any(|p| p.id() == id)
    }

    /// Fills every defined gradient in the group with zeros.
    pub fn zero_grad(&self) {
        for param in &self.params {
            param.zero_grad();
        }
    }
}

/// Optimizer state keyed by parameter identity.
#[derive(Debug, Clone)]
pub struct StateStore<S> {
    states: HashMap<ParamId, S>,
}

impl<S> Default for StateStore<S> {
    fn default() -> Self {
        Self {
            states: HashMap::new(),
        }
    }
}

impl<S> StateStore<S> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// State of `id`, if one was created.
    pub fn get(&self, id: ParamId) -> Option<&S> {
        self.states.get(&id)
    }

    /// Mutable state of `id`, if one was created.
    pub fn get_mut(&mut self, id: ParamId) -> Option<&mut S> {
        self.states.get_mut(&id)
    }

    /// Inserts or overwrites the state of `id`, returning the previous one.
    pub fn insert(&mut self, id: ParamId, state: S) -> Option<S> {
        self.states.insert(id, state)
    }

    /// Removes and returns the state of `id`.
    pub fn remove(&mut self, id: ParamId) -> Option<S> {
        self.states.remove(&id)
    }

    /// Returns true if `id` has a state.
    pub fn contains(&self, id: ParamId) -> bool {
        self.states.contains_key(&id)
    }

    /// Number of stored states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if no state is stored.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Drops every stored state.
    pub fn clear(&mut self) {
        self.states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DVector;

    #[test]
    fn test_group_membership() {
        let a = Parameter::<f64>::scalar(1.0);
        let b = Parameter::<f64>::scalar(2.0);
        let outsider = Parameter::<f64>::scalar(3.0);
        let group = ParamGroup::new(vec![a.clone(), b.clone()], "config");

        assert_eq!(group.len(), 2);
        assert!(group.contains(a.id()));
        assert!(group.contains(b.id()));
        assert!(!group.contains(outsider.id()));
        assert_eq!(*group.config(), "config");
    }

    #[test]
    fn test_group_zero_grad() {
        let a = Parameter::<f64>::from_slice(&[1.0, 2.0]);
        let b = Parameter::<f64>::scalar(1.0);
        a.set_grad(DVector::from_vec(vec![3.0, 4.0])).unwrap();

        let group = ParamGroup::new(vec![a.clone(), b.clone()], ());
        group.zero_grad();

        assert_eq!(a.grad(), Some(DVector::zeros(2)));
        assert!(b.grad().is_none());
    }

    #[test]
    fn test_state_store() {
        let a = Parameter::<f64>::scalar(1.0);
        let mut store = StateStore::new();
        assert!(store.is_empty());

        assert!(store.insert(a.id(), 1usize).is_none());
        assert_eq!(store.insert(a.id(), 2), Some(1));
        *store.get_mut(a.id()).unwrap() += 1;

        assert_eq!(store.get(a.id()), Some(&3));
        assert_eq!(store.len(), 1);
        assert_eq!(store.remove(a.id()), Some(3));
        assert!(!store.contains(a.id()));
    }
}
