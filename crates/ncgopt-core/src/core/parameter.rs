//! Shared parameter tensors with gradient slots.
//!
//! A [`Parameter`] is a cheap-to-clone handle onto storage shared between the
//! caller's model and the optimizer. Clones alias the same storage: the
//! evaluation closure writes gradients through its clone, the optimizer
//! updates values through its own. The optimizer only ever mutates the
//! contents of the value buffer; it never replaces or resizes it.
//!
//! Locks are held only for the duration of a single accessor call, so a
//! closure may freely read and write parameters while the optimizer is
//! running a step.

use crate::{
    error::{OptimizerError, OptimizerResult},
    types::{DVector, Scalar},
};
use parking_lot::RwLock;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static NEXT_PARAM_ID: AtomicUsize = AtomicUsize::new(0);

/// Identity of a parameter tensor.
///
/// Every call to [`Parameter::new`] yields a fresh identifier; clones of a
/// handle share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParamId(usize);

impl ParamId {
    fn next() -> Self {
        Self(NEXT_PARAM_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identifier.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
struct ParameterData<T: Scalar> {
    value: DVector<T>,
    grad: Option<DVector<T>>,
}

/// A real-valued parameter tensor with an optional gradient.
#[derive(Clone)]
pub struct Parameter<T: Scalar> {
    id: ParamId,
    data: Arc<RwLock<ParameterData<T>>>,
}

impl<T: Scalar> Parameter<T> {
    /// Creates a new parameter with no gradient.
    pub fn new(value: DVector<T>) -> Self {
        Self {
            id: ParamId::next(),
            data: Arc::new(RwLock::new(ParameterData { value, grad: None })),
        }
    }

    /// Creates a new parameter from a slice of values.
    pub fn from_slice(values: &[T]) -> Self {
        Self::new(DVector::from_column_slice(values))
    }

    /// Creates a one-element parameter.
    pub fn scalar(value: T) -> Self {
        Self::new(DVector::from_element(1, value))
    }

    /// Returns the identity of this parameter.
    pub fn id(&self) -> ParamId {
        self.id
    }

    /// Number of elements in the tensor.
    pub fn len(&self) -> usize {
        self.data.read().value.len()
    }

    /// Returns true if the tensor has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of the current value.
    pub fn value(&self) -> DVector<T> {
        self.data.read().value.clone()
    }

    /// Runs `f` with a borrow of the current value.
    ///
    /// `f` must not access this parameter again, the read lock is held.
    pub fn with_value<R>(&self, f: impl FnOnce(&DVector<T>) -> R) -> R {
        f(&self.data.read().value)
    }

    /// Returns element `i` of the value, if in bounds.
    pub fn get(&self, i: usize) -> Option<T> {
        self.data.read().value.get(i).copied()
    }

    /// Overwrites the value element-wise with `src`.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `src` has a different length.
    pub fn copy_from(&self, src: &DVector<T>) -> OptimizerResult<()> {
        let mut data = self.data.write();
        if data.value.len() != src.len() {
            return Err(OptimizerError::dimension_mismatch(data.value.len(), src.len()));
        }
        data.value.copy_from(src);
        Ok(())
    }

    /// In-place update `value ← value + alpha × direction`.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `direction` has a different length.
    pub fn add_scaled(&self, alpha: T, direction: &DVector<T>) -> OptimizerResult<()> {
        let mut data = self.data.write();
        if data.value.len() != direction.len() {
            return Err(OptimizerError::dimension_mismatch(
                data.value.len(),
                direction.len(),
            ));
        }
        data.value.axpy(alpha, direction, T::one());
        Ok(())
    }

    /// Returns a copy of the gradient, if defined.
    pub fn grad(&self) -> Option<DVector<T>> {
        self.data.read().grad.clone()
    }

    /// Returns true if a gradient is defined.
    pub fn has_grad(&self) -> bool {
        self.data.read().grad.is_some()
    }

    /// Sets the gradient.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `grad` does not match the value length.
    pub fn set_grad(&self, grad: DVector<T>) -> OptimizerResult<()> {
        let mut data = self.data.write();
        if data.value.len() != grad.len() {
            return Err(OptimizerError::dimension_mismatch(data.value.len(), grad.len()));
        }
        data.grad = Some(grad);
        Ok(())
    }

    /// Replaces the gradient slot, including clearing it with `None`.
    pub fn replace_grad(&self, grad: Option<DVector<T>>) -> Option<DVector<T>> {
        std::mem::replace(&mut self.data.write().grad, grad)
    }

    /// Fills the gradient with zeros, keeping it defined.
    pub fn zero_grad(&self) {
        if let Some(grad) = self.data.write().grad.as_mut() {
            grad.fill(T::zero());
        }
    }

    /// Undefines the gradient.
    pub fn clear_grad(&self) {
        self.data.write().grad = None;
    }

    /// Returns true if both handles alias the same storage.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl<T: Scalar> fmt::Debug for Parameter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.read();
        f.debug_struct("Parameter")
            .field("id", &self.id)
            .field("value", &data.value.as_slice())
            .field("has_grad", &data.grad.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_storage() {
        let p = Parameter::<f64>::from_slice(&[1.0, 2.0]);
        let alias = p.clone();
        alias.copy_from(&DVector::from_vec(vec![5.0, 6.0])).unwrap();

        assert_eq!(p.value(), DVector::from_vec(vec![5.0, 6.0]));
        assert_eq!(p.id(), alias.id());
        assert!(p.shares_storage_with(&alias));
    }

    #[test]
    fn test_fresh_ids() {
        let a = Parameter::<f64>::scalar(1.0);
        let b = Parameter::<f64>::scalar(1.0);
        assert_ne!(a.id(), b.id());
        assert!(!a.shares_storage_with(&b));
    }

    #[test]
    fn test_add_scaled_in_place() {
        let p = Parameter::<f64>::from_slice(&[1.0, 1.0]);
        p.add_scaled(0.5, &DVector::from_vec(vec![2.0, -4.0])).unwrap();
        assert_eq!(p.value(), DVector::from_vec(vec![2.0, -1.0]));

        let err = p.add_scaled(1.0, &DVector::from_vec(vec![1.0])).unwrap_err();
        assert!(matches!(err, OptimizerError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_gradient_slot() {
        let p = Parameter::<f64>::from_slice(&[1.0, 2.0, 3.0]);
        assert!(!p.has_grad());

        p.set_grad(DVector::from_vec(vec![1.0, 1.0, 1.0])).unwrap();
        assert!(p.has_grad());

        p.zero_grad();
        assert_eq!(p.grad(), Some(DVector::zeros(3)));

        let previous = p.replace_grad(None);
        assert_eq!(previous, Some(DVector::zeros(3)));
        assert!(p.grad().is_none());

        assert!(p.set_grad(DVector::zeros(2)).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_param_id_serializes_as_index() {
        let p = Parameter::<f64>::scalar(1.0);
        let json = serde_json::to_string(&p.id()).unwrap();
        assert_eq!(json, p.id().index().to_string());

        let id: ParamId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, p.id());
    }
}
