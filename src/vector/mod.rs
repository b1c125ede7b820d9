//! C1: the typed column layer every other component operates on.
//!
//! `Vector` is a closed, dispatch-by-match enum rather than a trait object:
//! kernels (comparison, hashing, take, aggregation) match on variant and
//! delegate into a per-representation impl (`PrimitiveVector<T>`,
//! `VarWidthVector`, ...). This keeps every kernel monomorphic and avoids
//! vtable dispatch in the hot per-row loops, at the cost of one match arm
//! per operation per variant — the same tradeoff the teacher's comparison
//! and aggregation dispatch made per-`DataType` in its query executor.

pub mod arrow_vector;
pub mod bool_mask;
pub mod builder;
pub mod compare;
pub mod fixed_binary;
pub mod hash;
pub mod list_vector;
pub mod primitive;
pub mod scalar;
pub mod temporal;
pub mod varwidth;

pub use bool_mask::BoolMask;
pub use compare::CompareOp;
pub use scalar::Scalar;

use std::sync::Arc;

use arrow::array::{Array, ArrayRef};
use arrow::datatypes::{
    DataType, Date32Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
    UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};

use crate::bitmap::Bitmap;
use crate::error::{Error, Result};
use arrow_vector::ArrowVector;
use fixed_binary::FixedBinaryVector;
use list_vector::ListVector;
use primitive::PrimitiveVector;
use varwidth::VarWidthVector;

/// Boolean column: bit-packed values plus an independent bit-packed validity
/// mask, distinct from `BoolMask` (which is the dense byte-per-row output of
/// a predicate, never itself a stored column).
#[derive(Clone, Debug)]
pub struct BoolVector {
    pub values: Bitmap,
    pub validity: Option<Bitmap>,
}

impl BoolVector {
    pub fn from_options(values: impl IntoIterator<Item = Option<bool>>) -> Self {
        let pairs: Vec<Option<bool>> = values.into_iter().collect();
        let values = Bitmap::from_bools(pairs.iter().map(|v| v.unwrap_or(false)));
        let null_count = pairs.iter().filter(|v| v.is_none()).count();
        let validity = (null_count > 0)
            .then(|| Bitmap::from_bools(pairs.iter().map(Option::is_some)));
        Self { values, validity }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_valid(&self, i: usize) -> bool {
        self.validity.as_ref().map_or(true, |v| v.get(i))
    }
}

/// The closed set of column representations this engine operates over
/// (spec §3.1/§4.1).
#[derive(Clone, Debug)]
pub enum Vector {
    Int8(PrimitiveVector<i8>),
    Int16(PrimitiveVector<i16>),
    Int32(PrimitiveVector<i32>),
    Int64(PrimitiveVector<i64>),
    UInt8(PrimitiveVector<u8>),
    UInt16(PrimitiveVector<u16>),
    UInt32(PrimitiveVector<u32>),
    UInt64(PrimitiveVector<u64>),
    Float32(PrimitiveVector<f32>),
    Float64(PrimitiveVector<f64>),
    Bool(BoolVector),
    /// Days since the Unix epoch.
    Date32(PrimitiveVector<i32>),
    /// Microseconds since the Unix epoch.
    Timestamp64(PrimitiveVector<i64>),
    /// Seconds since midnight.
    Time32(PrimitiveVector<i32>),
    /// Microseconds since midnight.
    Time64(PrimitiveVector<i64>),
    /// Microsecond-resolution interval/duration.
    Interval(PrimitiveVector<i64>),
    String(VarWidthVector),
    Binary(VarWidthVector),
    FixedSizeBinary(FixedBinaryVector),
    List(ListVector),
    /// Fallback for column types with no native representation above.
    Arrow(ArrowVector),
}

macro_rules! dispatch {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            Vector::Int8($v) => $body,
            Vector::Int16($v) => $body,
            Vector::Int32($v) => $body,
            Vector::Int64($v) => $body,
            Vector::UInt8($v) => $body,
            Vector::UInt16($v) => $body,
            Vector::UInt32($v) => $body,
            Vector::UInt64($v) => $body,
            Vector::Float32($v) => $body,
            Vector::Float64($v) => $body,
            Vector::Date32($v) => $body,
            Vector::Timestamp64($v) => $body,
            Vector::Time32($v) => $body,
            Vector::Time64($v) => $body,
            Vector::Interval($v) => $body,
            _ => unreachable!("dispatch! macro only covers PrimitiveVector variants"),
        }
    };
}

impl Vector {
    pub fn length(&self) -> usize {
        match self {
            Vector::Bool(v) => v.len(),
            Vector::String(v) | Vector::Binary(v) => v.len(),
            Vector::FixedSizeBinary(v) => v.len(),
            Vector::List(v) => v.len(),
            Vector::Arrow(v) => v.len(),
            _ => dispatch!(self, v => v.len()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    pub fn null_count(&self) -> usize {
        match self {
            Vector::Bool(v) => v.validity.as_ref().map_or(0, Bitmap::null_count),
            Vector::String(v) | Vector::Binary(v) => v.null_count(),
            Vector::FixedSizeBinary(v) => v.validity.as_ref().map_or(0, Bitmap::null_count),
            Vector::List(v) => v.validity.as_ref().map_or(0, Bitmap::null_count),
            Vector::Arrow(v) => v.null_count(),
            _ => dispatch!(self, v => v.null_count as usize),
        }
    }

    pub fn is_valid(&self, i: usize) -> bool {
        match self {
            Vector::Bool(v) => v.is_valid(i),
            Vector::String(v) | Vector::Binary(v) => v.is_valid(i),
            Vector::FixedSizeBinary(v) => v.is_valid(i),
            Vector::List(v) => v.is_valid(i),
            Vector::Arrow(v) => v.is_valid(i),
            _ => dispatch!(self, v => v.is_valid(i)),
        }
    }

    /// Byte-per-row NULL mask over the whole vector (used by `IS NULL`).
    pub fn is_null_mask(&self) -> BoolMask {
        BoolMask::from_bools((0..self.length()).map(|i| !self.is_valid(i)))
    }

    pub fn slice(&self, offset: usize, length: usize) -> Vector {
        match self {
            Vector::Int8(v) => Vector::Int8(v.slice(offset, length)),
            Vector::Int16(v) => Vector::Int16(v.slice(offset, length)),
            Vector::Int32(v) => Vector::Int32(v.slice(offset, length)),
            Vector::Int64(v) => Vector::Int64(v.slice(offset, length)),
            Vector::UInt8(v) => Vector::UInt8(v.slice(offset, length)),
            Vector::UInt16(v) => Vector::UInt16(v.slice(offset, length)),
            Vector::UInt32(v) => Vector::UInt32(v.slice(offset, length)),
            Vector::UInt64(v) => Vector::UInt64(v.slice(offset, length)),
            Vector::Float32(v) => Vector::Float32(v.slice(offset, length)),
            Vector::Float64(v) => Vector::Float64(v.slice(offset, length)),
            Vector::Date32(v) => Vector::Date32(v.slice(offset, length)),
            Vector::Timestamp64(v) => Vector::Timestamp64(v.slice(offset, length)),
            Vector::Time32(v) => Vector::Time32(v.slice(offset, length)),
            Vector::Time64(v) => Vector::Time64(v.slice(offset, length)),
            Vector::Interval(v) => Vector::Interval(v.slice(offset, length)),
            Vector::String(v) => Vector::String(v.slice(offset, length)),
            Vector::Binary(v) => Vector::Binary(v.slice(offset, length)),
            Vector::FixedSizeBinary(v) => {
                let indices: Vec<i32> = (offset..offset + length).map(|i| i as i32).collect();
                Vector::FixedSizeBinary(v.take(&indices))
            }
            Vector::List(v) => {
                let indices: Vec<i32> = (offset..offset + length).map(|i| i as i32).collect();
                Vector::List(v.take(&indices))
            }
            Vector::Bool(v) => {
                let values = v.values.slice(offset, length);
                let validity = v.validity.as_ref().map(|vv| vv.slice(offset, length));
                Vector::Bool(BoolVector { values, validity })
            }
            Vector::Arrow(v) => Vector::Arrow(v.slice(offset, length)),
        }
    }

    /// Concatenate another vector of the same variant onto the end of this
    /// one. Used by `List::take` to assemble unnested child slices.
    pub fn concat(&self, other: &Vector) -> Vector {
        fn cat<T: primitive::Numeric>(a: &PrimitiveVector<T>, b: &PrimitiveVector<T>) -> PrimitiveVector<T> {
            let mut data = a.data.to_vec();
            data.extend_from_slice(&b.data);
            let mut valid = (0..a.len()).map(|i| a.is_valid(i)).collect::<Vec<_>>();
            valid.extend((0..b.len()).map(|i| b.is_valid(i)));
            let null_count = valid.iter().filter(|v| !**v).count() as u32;
            let validity = (null_count > 0).then(|| Bitmap::from_bools(valid.into_iter()));
            PrimitiveVector {
                data: Arc::from(data.into_boxed_slice()),
                validity,
                null_count,
            }
        }
        match (self, other) {
            (Vector::Int8(a), Vector::Int8(b)) => Vector::Int8(cat(a, b)),
            (Vector::Int16(a), Vector::Int16(b)) => Vector::Int16(cat(a, b)),
            (Vector::Int32(a), Vector::Int32(b)) => Vector::Int32(cat(a, b)),
            (Vector::Int64(a), Vector::Int64(b)) => Vector::Int64(cat(a, b)),
            (Vector::UInt8(a), Vector::UInt8(b)) => Vector::UInt8(cat(a, b)),
            (Vector::UInt16(a), Vector::UInt16(b)) => Vector::UInt16(cat(a, b)),
            (Vector::UInt32(a), Vector::UInt32(b)) => Vector::UInt32(cat(a, b)),
            (Vector::UInt64(a), Vector::UInt64(b)) => Vector::UInt64(cat(a, b)),
            (Vector::Float32(a), Vector::Float32(b)) => Vector::Float32(cat(a, b)),
            (Vector::Float64(a), Vector::Float64(b)) => Vector::Float64(cat(a, b)),
            (Vector::String(a), Vector::String(b)) => {
                let values: Vec<Option<Vec<u8>>> = (0..a.len())
                    .map(|i| a.is_valid(i).then(|| a.value(i).to_vec()))
                    .chain((0..b.len()).map(|i| b.is_valid(i).then(|| b.value(i).to_vec())))
                    .collect();
                Vector::String(VarWidthVector::from_options(values))
            }
            (a, _) if a.is_empty() => other.clone(),
            (a, b) if b.is_empty() => a.clone(),
            _ => panic!("Vector::concat variant mismatch"),
        }
    }

    pub fn take(&self, indices: &[i32]) -> Vector {
        match self {
            Vector::Int8(v) => Vector::Int8(v.take(indices)),
            Vector::Int16(v) => Vector::Int16(v.take(indices)),
            Vector::Int32(v) => Vector::Int32(v.take(indices)),
            Vector::Int64(v) => Vector::Int64(v.take(indices)),
            Vector::UInt8(v) => Vector::UInt8(v.take(indices)),
            Vector::UInt16(v) => Vector::UInt16(v.take(indices)),
            Vector::UInt32(v) => Vector::UInt32(v.take(indices)),
            Vector::UInt64(v) => Vector::UInt64(v.take(indices)),
            Vector::Float32(v) => Vector::Float32(v.take(indices)),
            Vector::Float64(v) => Vector::Float64(v.take(indices)),
            Vector::Date32(v) => Vector::Date32(v.take(indices)),
            Vector::Timestamp64(v) => Vector::Timestamp64(v.take(indices)),
            Vector::Time32(v) => Vector::Time32(v.take(indices)),
            Vector::Time64(v) => Vector::Time64(v.take(indices)),
            Vector::Interval(v) => Vector::Interval(v.take(indices)),
            Vector::String(v) => Vector::String(v.take(indices)),
            Vector::Binary(v) => Vector::Binary(v.take(indices)),
            Vector::FixedSizeBinary(v) => Vector::FixedSizeBinary(v.take(indices)),
            Vector::List(v) => Vector::List(v.take(indices)),
            Vector::Bool(v) => {
                let options: Vec<Option<bool>> = indices
                    .iter()
                    .map(|&idx| {
                        if idx < 0 || idx as usize >= v.len() || !v.is_valid(idx as usize) {
                            None
                        } else {
                            Some(v.values.get(idx as usize))
                        }
                    })
                    .collect();
                Vector::Bool(BoolVector::from_options(options))
            }
            Vector::Arrow(v) => Vector::Arrow(v.take(indices).expect("arrow take")),
        }
    }

    /// Mix this column's per-row hash into `out` (spec §4.1's composable
    /// multi-column row hash — callers invoke this once per key column on
    /// the same buffer).
    pub fn hash_into(&self, out: &mut [u64], offset: usize) {
        match self {
            Vector::String(v) | Vector::Binary(v) => v.hash_into(out, offset),
            Vector::FixedSizeBinary(v) => v.hash_into(out, offset),
            Vector::List(v) => v.hash_into(out, offset),
            Vector::Bool(v) => {
                for i in 0..v.len() {
                    let h = if v.is_valid(i) {
                        hash::hash_bytes(&[v.values.get(i) as u8])
                    } else {
                        hash::NULL_HASH
                    };
                    out[offset + i] = hash::mix(out[offset + i], h);
                }
            }
            Vector::Arrow(_) => {
                // Arrow fallback columns are not used as join/group keys in
                // this engine; callers route key columns through the native
                // representations above.
            }
            _ => dispatch!(self, v => v.hash_into(out, offset)),
        }
    }

    pub fn cmp_scalar(&self, scalar: &Scalar, op: CompareOp) -> Result<BoolMask> {
        match self {
            Vector::String(v) | Vector::Binary(v) => v.cmp_scalar(scalar, op),
            Vector::FixedSizeBinary(v) => v.cmp_scalar(scalar, op),
            Vector::Bool(v) => {
                let Some(rhs) = scalar.as_bool() else {
                    return Ok(BoolMask::new_false(v.len()));
                };
                let bytes = (0..v.len())
                    .map(|i| v.is_valid(i) && op.apply(v.values.get(i), rhs))
                    .collect::<Vec<_>>();
                Ok(BoolMask::from_bools(bytes))
            }
            Vector::List(_) => Err(Error::UnsupportedOperation(
                "comparison is not defined over List columns".into(),
            )),
            Vector::Arrow(_) => Err(Error::UnsupportedOperation(
                "scalar comparison against Arrow-fallback columns is not supported".into(),
            )),
            _ => dispatch!(self, v => v.cmp_scalar(scalar, op)),
        }
    }

    pub fn cmp_vector(&self, other: &Vector, op: CompareOp) -> Result<BoolMask> {
        match (self, other) {
            (Vector::String(a) | Vector::Binary(a), Vector::String(b) | Vector::Binary(b)) => {
                a.cmp_vector(b, op)
            }
            (Vector::FixedSizeBinary(a), Vector::FixedSizeBinary(b)) => a.cmp_vector(b, op),
            (Vector::Arrow(a), Vector::Arrow(b)) => a.cmp_vector(b, op),
            (Vector::Int8(a), Vector::Int8(b)) => a.cmp_vector(b, op),
            (Vector::Int16(a), Vector::Int16(b)) => a.cmp_vector(b, op),
            (Vector::Int32(a), Vector::Int32(b)) => a.cmp_vector(b, op),
            (Vector::Int64(a), Vector::Int64(b)) => a.cmp_vector(b, op),
            (Vector::UInt8(a), Vector::UInt8(b)) => a.cmp_vector(b, op),
            (Vector::UInt16(a), Vector::UInt16(b)) => a.cmp_vector(b, op),
            (Vector::UInt32(a), Vector::UInt32(b)) => a.cmp_vector(b, op),
            (Vector::UInt64(a), Vector::UInt64(b)) => a.cmp_vector(b, op),
            (Vector::Float32(a), Vector::Float32(b)) => a.cmp_vector(b, op),
            (Vector::Float64(a), Vector::Float64(b)) => a.cmp_vector(b, op),
            (Vector::Date32(a), Vector::Date32(b)) => a.cmp_vector(b, op),
            (Vector::Timestamp64(a), Vector::Timestamp64(b)) => a.cmp_vector(b, op),
            _ => Err(Error::TypeMismatch(format!(
                "cannot compare {self:?} against {other:?}"
            ))),
        }
    }

    pub fn data_type_name(&self) -> &'static str {
        match self {
            Vector::Int8(_) => "Int8",
            Vector::Int16(_) => "Int16",
            Vector::Int32(_) => "Int32",
            Vector::Int64(_) => "Int64",
            Vector::UInt8(_) => "UInt8",
            Vector::UInt16(_) => "UInt16",
            Vector::UInt32(_) => "UInt32",
            Vector::UInt64(_) => "UInt64",
            Vector::Float32(_) => "Float32",
            Vector::Float64(_) => "Float64",
            Vector::Bool(_) => "Bool",
            Vector::Date32(_) => "Date32",
            Vector::Timestamp64(_) => "Timestamp64",
            Vector::Time32(_) => "Time32",
            Vector::Time64(_) => "Time64",
            Vector::Interval(_) => "Interval",
            Vector::String(_) => "String",
            Vector::Binary(_) => "Binary",
            Vector::FixedSizeBinary(_) => "FixedSizeBinary",
            Vector::List(_) => "List",
            Vector::Arrow(_) => "Arrow",
        }
    }

    /// Materialize row `row` as a standalone `Scalar`, for the handful of
    /// call sites (`ORDER BY`, `TOP-K`) that compare rows one at a time
    /// rather than through a vectorized kernel. `List`/`Arrow` rows have no
    /// `Scalar` representation and compare as `Scalar::Null`.
    pub fn scalar_at(&self, row: usize) -> Scalar {
        if !self.is_valid(row) {
            return Scalar::Null;
        }
        match self {
            Vector::String(v) | Vector::Binary(v) => Scalar::Bytes(v.value(row).to_vec()),
            Vector::Bool(v) => Scalar::Bool(v.values.get(row)),
            Vector::Float32(v) => Scalar::Float64(v.data[row] as f64),
            Vector::Float64(v) => Scalar::Float64(v.data[row]),
            Vector::Int8(v) => Scalar::Int64(v.data[row] as i64),
            Vector::Int16(v) => Scalar::Int64(v.data[row] as i64),
            Vector::Int32(v) => Scalar::Int64(v.data[row] as i64),
            Vector::Int64(v) => Scalar::Int64(v.data[row]),
            Vector::UInt8(v) => Scalar::Int64(v.data[row] as i64),
            Vector::UInt16(v) => Scalar::Int64(v.data[row] as i64),
            Vector::UInt32(v) => Scalar::Int64(v.data[row] as i64),
            Vector::UInt64(v) => Scalar::Int64(v.data[row] as i64),
            Vector::Date32(v) | Vector::Time32(v) => Scalar::Int64(v.data[row] as i64),
            Vector::Timestamp64(v) | Vector::Time64(v) | Vector::Interval(v) => {
                Scalar::Int64(v.data[row])
            }
            Vector::FixedSizeBinary(v) => Scalar::Bytes(v.value(row).to_vec()),
            Vector::List(_) | Vector::Arrow(_) => Scalar::Null,
        }
    }

    /// Build a native `Vector` from an Arrow array, choosing a native
    /// representation when one exists and falling back to `Vector::Arrow`
    /// otherwise.
    pub fn from_arrow(array: &ArrayRef) -> Result<Vector> {
        use arrow::array::*;
        Ok(match array.data_type() {
            DataType::Int8 => Vector::Int8(primitive_from_arrow::<Int8Type, i8>(array)),
            DataType::Int16 => Vector::Int16(primitive_from_arrow::<Int16Type, i16>(array)),
            DataType::Int32 => Vector::Int32(primitive_from_arrow::<Int32Type, i32>(array)),
            DataType::Int64 => Vector::Int64(primitive_from_arrow::<Int64Type, i64>(array)),
            DataType::UInt8 => Vector::UInt8(primitive_from_arrow::<UInt8Type, u8>(array)),
            DataType::UInt16 => Vector::UInt16(primitive_from_arrow::<UInt16Type, u16>(array)),
            DataType::UInt32 => Vector::UInt32(primitive_from_arrow::<UInt32Type, u32>(array)),
            DataType::UInt64 => Vector::UInt64(primitive_from_arrow::<UInt64Type, u64>(array)),
            DataType::Float32 => Vector::Float32(primitive_from_arrow::<Float32Type, f32>(array)),
            DataType::Float64 => Vector::Float64(primitive_from_arrow::<Float64Type, f64>(array)),
            DataType::Boolean => {
                let a = array.as_any().downcast_ref::<BooleanArray>().unwrap();
                let values = Bitmap::from_bools((0..a.len()).map(|i| a.value(i)));
                let validity = (a.null_count() > 0)
                    .then(|| Bitmap::from_bools((0..a.len()).map(|i| a.is_valid(i))));
                Vector::Bool(BoolVector { values, validity })
            }
            DataType::Date32 => Vector::Date32(primitive_from_arrow::<Date32Type, i32>(array)),
            DataType::Utf8 => {
                let a = array.as_any().downcast_ref::<StringArray>().unwrap();
                Vector::String(VarWidthVector::from_options(
                    (0..a.len()).map(|i| a.is_valid(i).then(|| a.value(i).as_bytes().to_vec())),
                ))
            }
            DataType::Binary => {
                let a = array.as_any().downcast_ref::<BinaryArray>().unwrap();
                Vector::Binary(VarWidthVector::from_options(
                    (0..a.len()).map(|i| a.is_valid(i).then(|| a.value(i).to_vec())),
                ))
            }
            _ => Vector::Arrow(ArrowVector::new(array.clone())),
        })
    }

    /// Round-trip back to an Arrow array for handoff across this crate's
    /// only external boundary.
    pub fn to_arrow(&self) -> Result<ArrayRef> {
        use arrow::array::*;
        Ok(match self {
            Vector::Int8(v) => Arc::new(Int8Array::from_iter((0..v.len()).map(|i| v.is_valid(i).then(|| v.data[i])))),
            Vector::Int16(v) => Arc::new(Int16Array::from_iter((0..v.len()).map(|i| v.is_valid(i).then(|| v.data[i])))),
            Vector::Int32(v) => Arc::new(Int32Array::from_iter((0..v.len()).map(|i| v.is_valid(i).then(|| v.data[i])))),
            Vector::Int64(v) | Vector::Timestamp64(v) | Vector::Time64(v) | Vector::Interval(v) => {
                Arc::new(Int64Array::from_iter((0..v.len()).map(|i| v.is_valid(i).then(|| v.data[i]))))
            }
            Vector::UInt8(v) => Arc::new(UInt8Array::from_iter((0..v.len()).map(|i| v.is_valid(i).then(|| v.data[i])))),
            Vector::UInt16(v) => Arc::new(UInt16Array::from_iter((0..v.len()).map(|i| v.is_valid(i).then(|| v.data[i])))),
            Vector::UInt32(v) => Arc::new(UInt32Array::from_iter((0..v.len()).map(|i| v.is_valid(i).then(|| v.data[i])))),
            Vector::UInt64(v) => Arc::new(UInt64Array::from_iter((0..v.len()).map(|i| v.is_valid(i).then(|| v.data[i])))),
            Vector::Float32(v) => Arc::new(Float32Array::from_iter((0..v.len()).map(|i| v.is_valid(i).then(|| v.data[i])))),
            Vector::Float64(v) => Arc::new(Float64Array::from_iter((0..v.len()).map(|i| v.is_valid(i).then(|| v.data[i])))),
            Vector::Date32(v) | Vector::Time32(v) => {
                Arc::new(Date32Array::from_iter((0..v.len()).map(|i| v.is_valid(i).then(|| v.data[i]))))
            }
            Vector::Bool(v) => Arc::new(BooleanArray::from_iter(
                (0..v.len()).map(|i| v.is_valid(i).then(|| v.values.get(i))),
            )),
            Vector::String(v) => Arc::new(StringArray::from_iter((0..v.len()).map(|i| {
                v.is_valid(i).then(|| String::from_utf8_lossy(v.value(i)).into_owned())
            }))),
            Vector::Binary(v) => Arc::new(BinaryArray::from_iter(
                (0..v.len()).map(|i| v.is_valid(i).then(|| v.value(i))),
            )),
            Vector::FixedSizeBinary(v) => {
                let width = i32::try_from(v.width).map_err(|_| {
                    Error::CapacityExceeded("FixedSizeBinary width exceeds i32::MAX".into())
                })?;
                Arc::new(
                    FixedSizeBinaryArray::try_from_sparse_iter_with_size(
                        (0..v.len()).map(|i| v.is_valid(i).then(|| v.value(i))),
                        width,
                    )
                    .map_err(Error::from)?,
                )
            }
            Vector::List(_) => {
                return Err(Error::UnsupportedOperation(
                    "List -> Arrow conversion is not implemented".into(),
                ))
            }
            Vector::Arrow(v) => v.array.clone(),
        })
    }
}

fn primitive_from_arrow<AT, T>(array: &ArrayRef) -> PrimitiveVector<T>
where
    AT: arrow::datatypes::ArrowPrimitiveType<Native = T>,
    T: primitive::Numeric + arrow::datatypes::ArrowNativeType,
{
    let a = array
        .as_any()
        .downcast_ref::<arrow::array::PrimitiveArray<AT>>()
        .expect("arrow datatype/native type mismatch in primitive_from_arrow");
    let data: Vec<T> = a.values().to_vec();
    let validity =
        (a.null_count() > 0).then(|| Bitmap::from_bools((0..a.len()).map(|i| a.is_valid(i))));
    let null_count = validity.as_ref().map_or(0, Bitmap::null_count) as u32;
    PrimitiveVector {
        data: Arc::from(data.into_boxed_slice()),
        validity,
        null_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_and_take_agree_on_contiguous_range() {
        let v = Vector::Int32(PrimitiveVector::from_values(vec![1, 2, 3, 4, 5]));
        let sliced = v.slice(1, 3);
        let taken = v.take(&[1, 2, 3]);
        assert_eq!(sliced.length(), taken.length());
        for i in 0..3 {
            assert_eq!(sliced.is_valid(i), taken.is_valid(i));
        }
    }

    #[test]
    fn is_null_mask_matches_validity() {
        let v = Vector::Int64(PrimitiveVector::from_options([Some(1), None, Some(3)]));
        let mask = v.is_null_mask();
        assert_eq!(mask.as_bytes(), &[0, 1, 0]);
    }

    #[test]
    fn bool_take_out_of_range_is_null() {
        let v = Vector::Bool(BoolVector::from_options([Some(true), Some(false)]));
        let taken = v.take(&[0, -1, 99, 1]);
        assert!(taken.is_valid(0));
        assert!(!taken.is_valid(1));
        assert!(!taken.is_valid(2));
        assert!(taken.is_valid(3));
    }

    #[test]
    fn cross_type_comparison_is_a_type_error() {
        let a = Vector::Int32(PrimitiveVector::from_values(vec![1]));
        let b = Vector::String(VarWidthVector::from_options([Some("1")]));
        assert!(a.cmp_vector(&b, CompareOp::Equals).is_err());
    }
}
