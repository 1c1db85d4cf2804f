//! `ferry` is a value-execution broker: it embeds structured tensor data into
//! a remote accelerated-computation service, tracks composite values as trees
//! of opaque allocation handles, and asynchronously materializes results back
//! into a host-visible serialized form.
//!
//! ## Key Components
//! 1. **Wire Format**:
//!    - [`ValueProto`] carries either a tensor payload or an ordered struct of
//!      nested values; anything else is rejected at embedding time.
//!    - [`Literal`] is the validated host-side tensor sitting between the wire
//!      format and the service.
//!
//! 2. **Service Client**:
//!    - [`Client`] talks to a spawned service loop over channels; transfers
//!      yield exclusively-owned [`GlobalData`] allocation handles that release
//!      their remote storage on drop.
//!    - Platforms are resolved by name through a process-global registry
//!      ([`get_client`], [`register_platform`]).
//!
//! 3. **Execution Model**:
//!    - [`Executor`] schedules embeddings as [`ValueFuture`]s — one-shot,
//!      multi-reader futures resolving exactly once for every waiter.
//!    - Materialization walks the [`Value`] tree synchronously and fans tensor
//!      leaves out into a [`ParallelTasks`] bag joined exactly once.

pub mod client;
pub mod error;
pub mod executor;
pub mod future;
pub mod literal;
pub mod num;
pub mod platform;
pub mod proto;
pub mod tasks;
pub mod value;

pub use client::{Client, GlobalData, get_client, register_platform};
pub use error::Error;
pub use executor::{Executor, create_executor};
pub use future::ValueFuture;
pub use literal::Literal;
pub use num::{DataType, Scalar};
pub use proto::{StructProto, TensorProto, ValueKind, ValueProto};
pub use tasks::ParallelTasks;
pub use value::{ServiceTensor, Value};
