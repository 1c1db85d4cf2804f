use bytemuck::{Pod, Zeroable};
use derive_more::Display;
use half::f16;
use serde::{Deserialize, Serialize};

/// Element type of a tensor payload, both on the host and in the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum DataType {
    F32,
    F16,
    I32,
    I64,
    U8,
    U32,
}

impl DataType {
    /// Returns the byte width of one element of this data type.
    pub const fn size(self) -> usize {
        match self {
            DataType::F32 => 4,
            DataType::F16 => 2,
            DataType::I32 => 4,
            DataType::I64 => 8,
            DataType::U8 => 1,
            DataType::U32 => 4,
        }
    }
}

pub trait Scalar: Sized + Zeroable + Pod + Send + Sync {
    const DATA_TYPE: DataType;
}

impl Scalar for f32 {
    const DATA_TYPE: DataType = DataType::F32;
}

impl Scalar for f16 {
    const DATA_TYPE: DataType = DataType::F16;
}

impl Scalar for i32 {
    const DATA_TYPE: DataType = DataType::I32;
}

impl Scalar for i64 {
    const DATA_TYPE: DataType = DataType::I64;
}

impl Scalar for u8 {
    const DATA_TYPE: DataType = DataType::U8;
}

impl Scalar for u32 {
    const DATA_TYPE: DataType = DataType::U32;
}
