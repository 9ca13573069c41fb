//! Shape-checked n-dimensional array of `f64`.
//!
//! [`NdArray`] stores a shape vector and a row-major flat buffer. Only
//! elementwise operations are provided; combining two arrays requires
//! identical shapes and never broadcasts.
//!
//! JSON mapping: a bare number is a rank-0 array, nested JSON arrays are
//! higher ranks. Ragged nesting is rejected on decode.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{FafError, FafResult};

#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl NdArray {
    /// Build an array from a shape and a row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`FafError::InvalidInput`] if `data.len()` is not the
    /// product of `shape`.
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> FafResult<Self> {
        let expected = element_count(&shape)?;
        if expected != data.len() {
            return Err(FafError::InvalidInput(format!(
                "shape {shape:?} needs {expected} elements, got {}",
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    /// Rank-0 array holding a single value.
    pub fn scalar(value: f64) -> Self {
        Self {
            shape: Vec::new(),
            data: vec![value],
        }
    }

    /// One-dimensional array.
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Array of the given shape filled by calling `f` once per element, in
    /// row-major order.
    pub fn from_fn(shape: &[usize], mut f: impl FnMut() -> f64) -> FafResult<Self> {
        let n = element_count(shape)?;
        let data = (0..n).map(|_| f()).collect();
        Ok(Self {
            shape: shape.to_vec(),
            data,
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat row-major view of the elements.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Apply `f` to every element, keeping the shape.
    pub fn map(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self {
            shape: self.shape.clone(),
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combine two arrays of identical shape elementwise.
    ///
    /// # Errors
    ///
    /// Returns [`FafError::ShapeMismatch`] when the shapes differ.
    pub fn zip_with(&self, other: &Self, mut f: impl FnMut(f64, f64) -> f64) -> FafResult<Self> {
        self.check_same_shape(other)?;
        Ok(Self {
            shape: self.shape.clone(),
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&l, &r)| f(l, r))
                .collect(),
        })
    }

    fn check_same_shape(&self, other: &Self) -> FafResult<()> {
        if self.shape != other.shape {
            return Err(FafError::ShapeMismatch {
                left: self.shape.clone(),
                right: other.shape.clone(),
            });
        }
        Ok(())
    }

    /// Decode a JSON number or rectangular nested array of numbers.
    ///
    /// # Errors
    ///
    /// Returns [`FafError::InvalidInput`] for ragged arrays and for any
    /// leaf that is not a JSON number.
    pub fn from_json(value: &Value) -> FafResult<Self> {
        let shape = infer_shape(value);
        let mut data = Vec::new();
        flatten_into(value, &shape, 0, &mut data)?;
        Ok(Self { shape, data })
    }

    /// Encode back into nested JSON arrays of the same shape.
    ///
    /// Non-finite values have no JSON representation and become `null`.
    pub fn to_json(&self) -> Value {
        build_json(&self.shape, &self.data)
    }
}

fn element_count(shape: &[usize]) -> FafResult<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| FafError::InvalidInput(format!("shape {shape:?} is too large")))
}

/// Follow the first element at each level. Raggedness is caught later
/// by `flatten_into`.
fn infer_shape(value: &Value) -> Vec<usize> {
    let mut shape = Vec::new();
    let mut cur = value;
    while let Value::Array(items) = cur {
        shape.push(items.len());
        match items.first() {
            Some(first) => cur = first,
            None => break,
        }
    }
    shape
}

fn flatten_into(value: &Value, shape: &[usize], depth: usize, out: &mut Vec<f64>) -> FafResult<()> {
    if depth == shape.len() {
        return match value {
            Value::Number(n) => {
                let v = n.as_f64().ok_or_else(|| {
                    FafError::InvalidInput(format!("number {n} is not representable as f64"))
                })?;
                out.push(v);
                Ok(())
            }
            Value::Array(_) => Err(FafError::InvalidInput(format!(
                "ragged array: unexpected nesting at depth {depth}"
            ))),
            other => Err(FafError::InvalidInput(format!(
                "array elements must be numbers, found {}",
                json_type_name(other)
            ))),
        };
    }

    match value {
        Value::Array(items) if items.len() == shape[depth] => {
            for item in items {
                flatten_into(item, shape, depth + 1, out)?;
            }
            Ok(())
        }
        Value::Array(items) => Err(FafError::InvalidInput(format!(
            "ragged array: expected {} elements at depth {depth}, found {}",
            shape[depth],
            items.len()
        ))),
        other => Err(FafError::InvalidInput(format!(
            "ragged array: expected an array at depth {depth}, found {}",
            json_type_name(other)
        ))),
    }
}

fn build_json(shape: &[usize], data: &[f64]) -> Value {
    match shape.split_first() {
        None => data.first().copied().map_or(Value::Null, Value::from),
        Some((&len, rest)) => {
            let stride: usize = rest.iter().product();
            Value::Array(
                (0..len)
                    .map(|i| build_json(rest, &data[i * stride..(i + 1) * stride]))
                    .collect(),
            )
        }
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Serialize for NdArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NdArray {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        NdArray::from_json(&value).map_err(D::Error::custom)
    }
}
