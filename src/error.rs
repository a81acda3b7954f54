/// Errors that can occur in the dispatch chain.
///
/// - `OverloadedChain`: Too many listeners attached to the chain.
/// - `ListenerNotFound`: Tried to access a listener id that is not attached.
/// - `CycleDetected`: A link would close the chain into a cycle, or a
///   traversal visited more nodes than the chain holds.
/// - `Other`: Any other error (boxed).
#[derive(Debug)]
pub enum ChainError {
    /// Attaching a listener:
    /// - Trying to attach more than `max_listeners` to the chain.
    OverloadedChain,

    /// Linking/detaching/dispatching:
    /// - Trying to access a specific `ListenerId` that cannot be found.
    ListenerNotFound,

    /// Linking/dispatching:
    /// - Trying to create a link that would make the chain cyclic, or a
    ///   traversal that failed to terminate within the chain's length.
    CycleDetected,

    /// Any other possible errors during chain handling
    #[cfg(not(feature = "threaded"))]
    Other(&'static str, u16),

    /// Any other possible errors during chain handling
    #[cfg(feature = "threaded")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}
impl PartialEq for ChainError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ChainError::OverloadedChain, ChainError::OverloadedChain)
            | (ChainError::ListenerNotFound, ChainError::ListenerNotFound)
            | (ChainError::CycleDetected, ChainError::CycleDetected) => true,
            #[cfg(not(feature = "threaded"))]
            (ChainError::Other(a1, a2), ChainError::Other(b1, b2)) => a1 == b1 && a2 == b2,
            #[cfg(feature = "threaded")]
            (ChainError::Other(a), ChainError::Other(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
impl Eq for ChainError {}

impl core::fmt::Display for ChainError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ChainError::OverloadedChain => write!(f, "Too many listeners on the chain"),
            ChainError::ListenerNotFound => write!(f, "Listener not found"),
            ChainError::CycleDetected => write!(f, "Chain link would not terminate"),
            #[cfg(not(feature = "threaded"))]
            ChainError::Other(msg, code) => write!(f, "Error: {} (code {})", msg, code),
            #[cfg(feature = "threaded")]
            ChainError::Other(e) => write!(f, "Error: {}", e),
        }
    }
}

#[cfg(feature = "threaded")]
impl std::error::Error for ChainError {}
