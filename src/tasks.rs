use super::{error::Error, platform};

/// A bag of independent fallible tasks joined exactly once.
///
/// Tasks are spawned as they are added and run concurrently with no ordering
/// guarantee between them. [`ParallelTasks::wait_all`] consumes the bag, so
/// no task can be added once the join has begun. Tasks own whatever state
/// they write into; the bag never hands out references across the join.
#[derive(Debug, Default)]
pub struct ParallelTasks {
    handles: Vec<tokio::task::JoinHandle<Result<(), Error>>>,
}

impl ParallelTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a fallible unit of work into the bag.
    pub fn add_task<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = Result<(), Error>> + Send + 'static,
    {
        self.handles.push(platform::spawn(task));
    }

    /// Wait for every task in the bag to finish, failed ones included.
    /// Returns `Ok` iff all tasks succeeded, otherwise the first collected
    /// error.
    pub async fn wait_all(self) -> Result<(), Error> {
        let results = futures::future::join_all(self.handles).await;
        let mut failure = None;
        for result in results {
            let result = match result {
                Ok(result) => result,
                Err(err) => Err(Error::Internal(format!("task aborted: {err}"))),
            };
            if let Err(err) = result {
                failure.get_or_insert(err);
            }
        }
        match failure {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }
}
