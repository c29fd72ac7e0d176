//! Typed views over record slices
//!
//! A view pairs a record slice with a field accessor, so the toolkit works on
//! any record shape that exposes a run of `f64` components.

use contracts::ContractError;

/// Field accessor: returns the components of one field of a record
pub type Field<T> = fn(&T) -> &[f64];

/// Scalar accessor, used for the abscissa
pub type Scalar<T> = fn(&T) -> f64;

/// One field across a record slice
pub struct FieldView<'a, T> {
    records: &'a [T],
    field: Field<T>,
    arity: usize,
}

// Derives would require `T: Clone`
impl<T> Clone for FieldView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldView<'_, T> {}

impl<T> std::fmt::Debug for FieldView<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldView")
            .field("len", &self.records.len())
            .field("arity", &self.arity)
            .finish()
    }
}

impl<'a, T> FieldView<'a, T> {
    /// # Errors
    /// - `records` is empty
    /// - The field has no components
    pub fn new(records: &'a [T], field: Field<T>) -> Result<Self, ContractError> {
        let Some(first) = records.first() else {
            return Err(ContractError::invalid_argument("records", "view over an empty slice"));
        };
        let arity = field(first).len();
        if arity == 0 {
            return Err(ContractError::invalid_argument("field", "field has no components"));
        }
        Ok(Self {
            records,
            field,
            arity,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn records(&self) -> &'a [T] {
        self.records
    }

    /// Raw components of element `i`
    pub fn components(&self, i: usize) -> &'a [f64] {
        (self.field)(&self.records[i])
    }

    /// Scalar value of element `i`: the Euclidean norm for multi-component
    /// fields, the signed value otherwise
    pub fn value(&self, i: usize) -> f64 {
        let c = self.components(i);
        if self.arity > 1 {
            c.iter().map(|v| v * v).sum::<f64>().sqrt()
        } else {
            c[0]
        }
    }

    /// All scalar values
    pub fn values(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.value(i)).collect()
    }
}

/// A value field paired with a scalar abscissa
pub struct XyView<'a, T> {
    x: Scalar<T>,
    y: FieldView<'a, T>,
}

impl<T> Clone for XyView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for XyView<'_, T> {}

impl<'a, T> XyView<'a, T> {
    pub fn new(x: Scalar<T>, y: FieldView<'a, T>) -> Self {
        Self { x, y }
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn x(&self, i: usize) -> f64 {
        (self.x)(&self.y.records()[i])
    }

    pub fn y(&self, i: usize) -> f64 {
        self.y.value(i)
    }
}
