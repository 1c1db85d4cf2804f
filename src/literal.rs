use std::sync::Arc;

use super::{
    error::Error,
    num::{DataType, Scalar},
    proto::TensorProto,
};

/// A validated host-side tensor: element type, shape, and payload whose size
/// is known to match.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    dtype: DataType,
    shape: Vec<usize>,
    data: Arc<[u8]>,
}

impl Literal {
    /// Create a literal from a typed host slice.
    pub fn of<T: Scalar>(shape: impl Into<Vec<usize>>, data: &[T]) -> Self {
        let dtype = T::DATA_TYPE;
        let shape = shape.into();
        let data = bytemuck::cast_slice(data).to_vec().into();
        Self { dtype, shape, data }
    }

    /// Validate a tensor proto into a literal.
    /// The payload must hold exactly `shape.product()` elements.
    pub fn from_proto(proto: &TensorProto) -> Result<Self, Error> {
        // the shape comes off the wire, so the size must not wrap
        let size = proto
            .shape
            .iter()
            .try_fold(proto.dtype.size(), |size, &dim| size.checked_mul(dim))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "failed to convert value proto to literal: shape {:?} of {} overflows",
                    proto.shape, proto.dtype
                ))
            })?;
        if proto.contents.len() != size {
            return Err(Error::InvalidArgument(format!(
                "failed to convert value proto to literal: shape {:?} of {} expects {} bytes, found {}",
                proto.shape,
                proto.dtype,
                size,
                proto.contents.len()
            )));
        }
        let dtype = proto.dtype;
        let shape = proto.shape.clone();
        let data = proto.contents.clone().into();
        Ok(Self { dtype, shape, data })
    }

    /// Serialize the literal back into a tensor proto, checking that the
    /// recorded element type matches the one the caller expects.
    pub fn to_proto(&self, dtype: DataType) -> Result<TensorProto, Error> {
        if self.dtype != dtype {
            return Err(Error::Internal(format!(
                "failed to convert literal to tensor: literal type {} mismatches recorded type {dtype}",
                self.dtype
            )));
        }
        Ok(TensorProto {
            dtype: self.dtype,
            shape: self.shape.clone(),
            contents: self.data.to_vec(),
        })
    }

    #[inline]
    pub fn data_type(&self) -> DataType {
        self.dtype
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Read the payload back as a typed slice.
    pub fn as_slice<T: Scalar>(&self) -> Result<&[T], Error> {
        if self.dtype != T::DATA_TYPE {
            return Err(Error::Internal(format!(
                "literal type {} mismatches {}",
                self.dtype,
                T::DATA_TYPE
            )));
        }
        Ok(bytemuck::cast_slice(&self.data))
    }
}

#[cfg(test)]
mod tests {
    use super::Literal;
    use crate::{
        error::Error,
        num::DataType,
        proto::{TensorProto, ValueKind, ValueProto},
    };

    #[test]
    fn test_proto_round_trip() -> Result<(), Error> {
        let literal = Literal::of([2, 2], &[1i64, 2, 3, 4]);
        let proto = literal.to_proto(DataType::I64)?;
        let back = Literal::from_proto(&proto)?;
        assert_eq!(literal, back);
        assert_eq!(back.as_slice::<i64>()?, &[1, 2, 3, 4]);
        Ok(())
    }

    #[test]
    fn test_size_mismatch() {
        let proto = TensorProto {
            dtype: DataType::F32,
            shape: vec![3],
            contents: vec![0; 8],
        };
        assert!(matches!(
            Literal::from_proto(&proto),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_shape_overflow() {
        let proto = TensorProto {
            dtype: DataType::F32,
            shape: vec![usize::MAX / 2 + 1, 4],
            contents: vec![],
        };
        assert!(matches!(
            Literal::from_proto(&proto),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let Some(ValueKind::Tensor(proto)) = ValueProto::tensor([1], &[0u32]).kind else {
            unreachable!()
        };
        let literal = Literal::from_proto(&proto).expect("valid proto");
        assert!(matches!(
            literal.to_proto(DataType::I32),
            Err(Error::Internal(_))
        ));
        assert!(matches!(literal.as_slice::<f32>(), Err(Error::Internal(_))));
    }
}
