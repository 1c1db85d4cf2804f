use std::sync::{Mutex, OnceLock};

use derive_more::{Deref, Display};
use rustc_hash::FxHashMap as HashMap;
use thiserror::Error;

use super::{error::Error, literal::Literal, platform};

/// Identifier of one data allocation held by the service.
#[derive(Debug, Default, Display, Clone, Copy, PartialEq, Eq, Hash, Deref)]
pub struct AllocId(uid::Id<AllocId>);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("allocation {0} not found in the service")]
    Allocation(AllocId),
    #[error("service connection closed")]
    Closed,
}

#[derive(Debug)]
enum ClientEvent {
    Transfer {
        literal: Literal,
        sender: flume::Sender<Result<AllocId, ClientError>>,
    },
    Fetch {
        id: AllocId,
        sender: flume::Sender<Result<Literal, ClientError>>,
    },
    Release {
        id: AllocId,
    },
}

/// Exclusive owner of one allocation of data in the service.
///
/// Values computed in the service are operated on handle-to-handle, so
/// holding a `GlobalData` is what keeps the remote storage alive. Dropping
/// the last owner releases the allocation.
#[derive(Debug)]
pub struct GlobalData {
    id: AllocId,
    sender: flume::Sender<ClientEvent>,
}

impl GlobalData {
    #[inline]
    pub fn id(&self) -> AllocId {
        self.id
    }
}

impl Drop for GlobalData {
    fn drop(&mut self) {
        _ = self.sender.send(ClientEvent::Release { id: self.id })
    }
}

/// Handle to a running service loop. Cheap to clone; all clones talk to the
/// same store.
#[derive(Debug, Clone)]
pub struct Client {
    sender: flume::Sender<ClientEvent>,
}

impl Client {
    /// Start a service loop backed by an in-process store.
    pub fn host() -> Self {
        let (sender, receiver) = flume::unbounded();
        platform::spawn(serve(receiver));
        Self { sender }
    }

    /// Transfer a host literal into the service, yielding ownership of the
    /// resulting allocation.
    pub async fn transfer_to_service(&self, literal: Literal) -> Result<GlobalData, ClientError> {
        let (sender, receiver) = flume::bounded(0);
        _ = self.sender.send(ClientEvent::Transfer { literal, sender });
        let id = receiver.recv_async().await.map_err(|_| ClientError::Closed)??;
        let sender = self.sender.clone();
        Ok(GlobalData { id, sender })
    }

    /// Transfer an allocation's contents back into a host literal.
    pub async fn transfer_from_service(&self, data: &GlobalData) -> Result<Literal, ClientError> {
        let (sender, receiver) = flume::bounded(0);
        let id = data.id;
        _ = self.sender.send(ClientEvent::Fetch { id, sender });
        receiver.recv_async().await.map_err(|_| ClientError::Closed)?
    }
}

async fn serve(receiver: flume::Receiver<ClientEvent>) {
    let mut store: HashMap<AllocId, Literal> = HashMap::default();

    while let Ok(event) = receiver.recv_async().await {
        match event {
            ClientEvent::Transfer { literal, sender } => {
                let id = AllocId(uid::Id::new());
                store.insert(id, literal);
                _ = sender.send_async(Ok(id)).await
            }
            ClientEvent::Fetch { id, sender } => {
                let literal = store.get(&id).cloned().ok_or(ClientError::Allocation(id));
                _ = sender.send_async(literal).await
            }
            ClientEvent::Release { id } => {
                if store.remove(&id).is_none() {
                    log::warn!("release of unknown allocation {id}");
                }
            }
        }
    }
}

type Registry = Mutex<HashMap<String, fn() -> Client>>;

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut platforms: HashMap<String, fn() -> Client> = HashMap::default();
        platforms.insert("host".into(), Client::host);
        Mutex::new(platforms)
    })
}

/// Register a platform's client constructor under the given name.
pub fn register_platform(name: impl Into<String>, factory: fn() -> Client) {
    let mut platforms = registry().lock().expect("failed to lock registry");
    platforms.insert(name.into(), factory);
}

/// Look up the named platform and construct a client for it.
///
/// Each call constructs a fresh client, so the service loop lives on the
/// runtime of the caller that bootstrapped it.
pub fn get_client(platform_name: &str) -> Result<Client, Error> {
    let platforms = registry().lock().expect("failed to lock registry");
    match platforms.get(platform_name) {
        Some(factory) => Ok(factory()),
        None => Err(Error::Internal(format!(
            "failed to find platform {platform_name} in the client registry; \
             you may be missing a registration for it"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{Client, ClientError, ClientEvent, get_client};
    use crate::{error::Error, literal::Literal};

    #[tokio::test]
    async fn test_transfer_round_trip() -> Result<(), ClientError> {
        let client = Client::host();
        let literal = Literal::of([4], &[1.0f32, 2.0, 3.0, 4.0]);
        let data = client.transfer_to_service(literal.clone()).await?;
        let back = client.transfer_from_service(&data).await?;
        assert_eq!(literal, back);
        Ok(())
    }

    #[tokio::test]
    async fn test_release_on_drop() -> Result<(), ClientError> {
        let client = Client::host();
        let data = client.transfer_to_service(Literal::of([1], &[7i32])).await?;
        let id = data.id();

        // the drop sends the release ahead of the fetch on the same channel
        drop(data);
        let (sender, receiver) = flume::bounded(0);
        _ = client.sender.send(ClientEvent::Fetch { id, sender });
        let fetched = receiver.recv_async().await.map_err(|_| ClientError::Closed)?;
        assert!(matches!(fetched, Err(ClientError::Allocation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_registered_platform() -> Result<(), Error> {
        super::register_platform("phony", Client::host);
        let client = get_client("phony")?;
        let literal = Literal::of([1], &[1u8]);
        let data = client
            .transfer_to_service(literal.clone())
            .await
            .map_err(|err| Error::Internal(err.to_string()))?;
        let back = client
            .transfer_from_service(&data)
            .await
            .map_err(|err| Error::Internal(err.to_string()))?;
        assert_eq!(literal, back);
        Ok(())
    }

    #[test]
    fn test_unknown_platform() {
        let err = get_client("bogus").expect_err("platform must be unknown");
        match err {
            Error::Internal(message) => assert!(message.contains("bogus")),
            err => panic!("expected internal error, found {err}"),
        }
    }
}
