use std::sync::Arc;

use super::{client::GlobalData, num::DataType};

/// One tensor allocation embedded in the service, together with the element
/// type needed to materialize it back into a host proto.
///
/// Constructed only by a successful host-to-service transfer. Owning the
/// inner [`GlobalData`] makes this non-copyable; sharing goes through
/// [`Value::Tensor`]'s reference count instead, so the same allocation can
/// appear under multiple parents without another transfer.
#[derive(Debug)]
pub struct ServiceTensor {
    data: GlobalData,
    dtype: DataType,
}

impl ServiceTensor {
    pub fn new(data: GlobalData, dtype: DataType) -> Self {
        Self { data, dtype }
    }

    #[inline]
    pub fn data(&self) -> &GlobalData {
        &self.data
    }

    #[inline]
    pub fn data_type(&self) -> DataType {
        self.dtype
    }
}

/// A value embedded in the executor: a tensor leaf or an ordered composite.
///
/// Immutable after construction and acyclic by construction (values are only
/// ever built by recursive descent over an input proto). Cloning shares the
/// underlying allocations.
#[derive(Debug, Clone)]
pub enum Value {
    Tensor(Arc<ServiceTensor>),
    Struct(Arc<[Value]>),
}
