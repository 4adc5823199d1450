use facet::Facet;

/// Errors surfaced by tree mutation, backend dispatch and parsing.
///
/// Every variant is a programmer error reported immediately; nothing here is
/// transient or worth retrying.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum DomError {
    /// splice index {index} is out of range for {len} siblings
    InvalidIndex { index: usize, len: usize },

    /// operation `{operation}` is not implemented by the {backend} backend
    Unsupported { operation: String, backend: String },

    /// node cannot hold children
    NotAContainer,

    /// cannot insert a node into its own subtree
    Cycle,

    /// nodes belong to different backends
    BackendMismatch,

    /// no live tree backend is attached
    NoLiveBackend,

    /// invalid selector `{selector}`
    InvalidSelector { selector: String },

    /// failed to read markup: {message}
    Io { message: String },
}

impl DomError {
    pub(crate) fn unsupported(operation: &str, backend: &str) -> Self {
        DomError::Unsupported {
            operation: operation.to_owned(),
            backend: backend.to_owned(),
        }
    }
}
