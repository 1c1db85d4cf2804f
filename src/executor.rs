use std::sync::{Arc, OnceLock};

use futures::FutureExt;

use super::{
    client::{self, Client},
    error::Error,
    future::ValueFuture,
    literal::Literal,
    platform::BoxFuture,
    proto::{StructProto, TensorProto, ValueKind, ValueProto},
    tasks::ParallelTasks,
    value::{ServiceTensor, Value},
};

/// The value-lifecycle façade over one service client.
///
/// Embeds host protos into the service as [`Value`] trees, tracks them
/// through [`ValueFuture`]s, and materializes them back into protos.
#[derive(Debug, Clone)]
pub struct Executor {
    client: Client,
}

/// Resolve the named platform and construct an executor over it.
pub fn create_executor(platform_name: &str) -> Result<Executor, Error> {
    let client = client::get_client(platform_name)?;
    Ok(Executor { client })
}

impl Executor {
    /// Schedule the embedding of a value proto into the service. Never
    /// blocks; the returned future resolves exactly once with the embedded
    /// value or the first encountered error.
    pub fn create_executor_value(&self, proto: &ValueProto) -> ValueFuture {
        let client = self.client.clone();
        let proto = proto.clone();
        ValueFuture::spawn(async move { embed_value(&client, &proto).await })
    }

    /// Apply a function value to an optional argument value.
    pub fn create_call(
        &self,
        function: ValueFuture,
        argument: Option<ValueFuture>,
    ) -> Result<ValueFuture, Error> {
        let _ = (function, argument);
        Err(Error::Unimplemented("create_call is not implemented yet".into()))
    }

    /// Compose already-embedded values into a struct, preserving order.
    pub fn create_struct(&self, members: Vec<ValueFuture>) -> Result<ValueFuture, Error> {
        let _ = members;
        Err(Error::Unimplemented("create_struct is not implemented yet".into()))
    }

    /// Select the child at `index` out of an embedded struct, sharing its
    /// allocations.
    pub fn create_selection(&self, value: ValueFuture, index: u32) -> Result<ValueFuture, Error> {
        let _ = (value, index);
        Err(Error::Unimplemented(
            "create_selection is not implemented yet".into(),
        ))
    }

    /// Wait for the value and serialize it into `proto`.
    ///
    /// Struct nodes are walked here in index order, allocating one output
    /// slot per tensor leaf; each leaf's service-to-host transfer and
    /// serialization runs as its own task, joined exactly once before the
    /// slots are assembled. On failure `proto` is left untouched.
    pub async fn materialize(&self, value: ValueFuture, proto: &mut ValueProto) -> Result<(), Error> {
        let value = value.wait().await?;
        let mut tasks = ParallelTasks::new();
        let slot = self.materialize_value(&value, &mut tasks);
        tasks.wait_all().await?;
        *proto = assemble(&slot)?;
        Ok(())
    }

    fn materialize_value(&self, value: &Value, tasks: &mut ParallelTasks) -> OutSlot {
        match value {
            Value::Tensor(tensor) => {
                let slot = Arc::new(OnceLock::new());
                let client = self.client.clone();
                let tensor = tensor.clone();
                let out = slot.clone();
                tasks.add_task(async move {
                    let literal = client
                        .transfer_from_service(tensor.data())
                        .await
                        .map_err(|err| {
                            Error::Internal(format!(
                                "failed to transfer tensor from the service: {err}"
                            ))
                        })?;
                    let proto = literal.to_proto(tensor.data_type())?;
                    _ = out.set(proto);
                    Ok(())
                });
                OutSlot::Tensor(slot)
            }
            Value::Struct(elements) => {
                let slots = elements
                    .iter()
                    .map(|element| self.materialize_value(element, tasks))
                    .collect();
                OutSlot::Struct(slots)
            }
        }
    }
}

/// Output skeleton mirroring the value tree. Tensor slots are populated by
/// leaf tasks and outlive them through the shared reference count.
enum OutSlot {
    Tensor(Arc<OnceLock<TensorProto>>),
    Struct(Vec<OutSlot>),
}

fn assemble(slot: &OutSlot) -> Result<ValueProto, Error> {
    match slot {
        OutSlot::Tensor(slot) => match slot.get() {
            Some(tensor) => Ok(ValueProto {
                kind: Some(ValueKind::Tensor(tensor.clone())),
            }),
            None => Err(Error::Internal("materialized tensor slot left empty".into())),
        },
        OutSlot::Struct(slots) => {
            let element = slots.iter().map(assemble).collect::<Result<Vec<_>, _>>()?;
            Ok(ValueProto {
                kind: Some(ValueKind::Struct(StructProto { element })),
            })
        }
    }
}

fn embed_value<'a>(client: &'a Client, proto: &'a ValueProto) -> BoxFuture<'a, Result<Value, Error>> {
    async move {
        match &proto.kind {
            Some(ValueKind::Tensor(tensor)) => embed_tensor(client, tensor).await,
            Some(ValueKind::Struct(structure)) => {
                // fail fast: the first failing child aborts the whole struct
                let mut elements = Vec::with_capacity(structure.element.len());
                for element in &structure.element {
                    elements.push(embed_value(client, element).await?);
                }
                Ok(Value::Struct(elements.into()))
            }
            None => Err(Error::Unimplemented(
                "cannot embed a value proto that is neither a tensor nor a struct".into(),
            )),
        }
    }
    .boxed()
}

async fn embed_tensor(client: &Client, proto: &TensorProto) -> Result<Value, Error> {
    let literal = Literal::from_proto(proto)?;
    let dtype = literal.data_type();
    let data = client.transfer_to_service(literal).await.map_err(|err| {
        Error::Internal(format!("failed to transfer literal to the service: {err}"))
    })?;
    Ok(Value::Tensor(Arc::new(ServiceTensor::new(data, dtype))))
}
