use serde::{Deserialize, Serialize};

use super::num::{DataType, Scalar};

/// Serialized tensor: an element type, a shape, and the raw little-endian
/// payload bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorProto {
    pub dtype: DataType,
    pub shape: Vec<usize>,
    pub contents: Vec<u8>,
}

/// Serialized struct: an ordered (possibly empty) list of nested values.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructProto {
    pub element: Vec<ValueProto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueKind {
    Tensor(TensorProto),
    Struct(StructProto),
}

/// The wire representation of a value handed to and produced by the executor.
///
/// A proto without a `kind` models a payload this executor does not recognize;
/// embedding one fails with [`Error::Unimplemented`](super::Error).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueProto {
    pub kind: Option<ValueKind>,
}

impl ValueProto {
    /// Build a tensor proto from a typed host slice.
    pub fn tensor<T: Scalar>(shape: impl Into<Vec<usize>>, data: &[T]) -> Self {
        let dtype = T::DATA_TYPE;
        let shape = shape.into();
        let contents = bytemuck::cast_slice(data).to_vec();
        let kind = Some(ValueKind::Tensor(TensorProto {
            dtype,
            shape,
            contents,
        }));
        Self { kind }
    }

    /// Build a struct proto from an ordered list of children.
    pub fn structure(element: impl Into<Vec<ValueProto>>) -> Self {
        let element = element.into();
        let kind = Some(ValueKind::Struct(StructProto { element }));
        Self { kind }
    }
}

#[cfg(test)]
mod tests {
    use super::ValueProto;

    #[test]
    fn test_serde_round_trip() -> Result<(), serde_json::Error> {
        let proto = ValueProto::structure([
            ValueProto::tensor([2], &[1.0f32, 2.0]),
            ValueProto::structure([ValueProto::tensor([], &[7i32])]),
            ValueProto::default(),
        ]);
        let json = serde_json::to_string(&proto)?;
        let back: ValueProto = serde_json::from_str(&json)?;
        assert_eq!(proto, back);
        Ok(())
    }
}
