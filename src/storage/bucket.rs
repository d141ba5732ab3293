//! Named partitions of the key-value store.

/// A named partition ("bucket") of the key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// `lock-key -> ProjectLock` for the current holder of each lock key.
    RunLocks,
    /// `lock-key -> [ProjectLock]` for requests waiting on each lock key.
    Queue,
    /// `pull-key -> PullStatus`.
    Pulls,
    /// `command/lock -> CommandLock`.
    GlobalLocks,
}

impl Bucket {
    /// The persisted bucket name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::RunLocks => "runLocks",
            Bucket::Queue => "queue",
            Bucket::Pulls => "pulls",
            Bucket::GlobalLocks => "globalLocks",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
