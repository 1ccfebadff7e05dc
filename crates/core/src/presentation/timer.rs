use tokio::task::JoinSet;

/// The periodic tasks of one animation.
///
/// Every task is aborted by [`TimerSet::cancel_all`] or, at the latest,
/// when the set is dropped. No tick can outlive the owner.
#[derive(Debug, Default)]
pub struct TimerSet {
    tasks: JoinSet<()>,
}

impl TimerSet {
    /// Creates an empty set.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a timer task on the current runtime.
    #[inline]
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(task);
    }

    /// Returns the number of tasks that have not been reaped yet.
    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if no task is tracked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Aborts every task in the set.
    #[inline]
    pub fn cancel_all(&mut self) {
        self.tasks.abort_all();
    }
}
