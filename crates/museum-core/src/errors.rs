use crate::model::EntityKind;
use thiserror::Error;

/// Result type alias using MuseumError
pub type Result<T> = std::result::Result<T, MuseumError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on without
/// parsing messages. The driver recovers `NotFound` and `NoResult`; every
/// other kind is fatal to the demonstration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Lookup
    NotFound,
    NoResult,
    NonUniqueResult,

    // Unit of work
    IdentityConflict,
    TransactionFailure,
    /// A mutating operation was attempted in the wrong transaction state
    TransactionState,
    /// An entity handle does not belong to this persistence context
    NotManaged,

    // Query language
    QueryMalformed,

    // Integration/IO
    InvalidInput,
    Config,
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::NoResult => "ERR_NO_RESULT",
            ExErrorKind::NonUniqueResult => "ERR_NON_UNIQUE_RESULT",
            ExErrorKind::IdentityConflict => "ERR_IDENTITY_CONFLICT",
            ExErrorKind::TransactionFailure => "ERR_TRANSACTION_FAILURE",
            ExErrorKind::TransactionState => "ERR_TRANSACTION_STATE",
            ExErrorKind::NotManaged => "ERR_NOT_MANAGED",
            ExErrorKind::QueryMalformed => "ERR_QUERY_MALFORMED",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether the demonstration driver handles this kind locally
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ExErrorKind::NotFound | ExErrorKind::NoResult)
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus enough context
/// (operation, entity, message) to print a useful diagnostic.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_kind: Option<EntityKind>,
    entity_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_kind: None,
            entity_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity kind context
    pub fn with_entity_kind(mut self, kind: EntityKind) -> Self {
        self.entity_kind = Some(kind);
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity kind context, if any
    pub fn entity_kind(&self) -> Option<EntityKind> {
        self.entity_kind
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        match (&self.entity_kind, &self.entity_id) {
            (Some(kind), Some(id)) => write!(f, " ({} {})", kind, id)?,
            (None, Some(id)) => write!(f, " (entity_id: {})", id)?,
            (Some(kind), None) => write!(f, " ({})", kind)?,
            (None, None) => {}
        }
        if let Some(source) = &self.source {
            write!(f, "; caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for the model, query language, and unit of work
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MuseumError {
    // ===== Lookup =====
    /// A mandatory reference points at a row that does not exist
    #[error("{kind} with ID {id} not found")]
    NotFound { kind: EntityKind, id: i32 },

    /// A single-result query matched no rows
    #[error("No result for query: {query}")]
    NoResult { query: String },

    /// A single-result query matched more than one row
    #[error("Query returned {count} results where one was expected: {query}")]
    NonUniqueResult { query: String, count: usize },

    // ===== Unit of work =====
    /// Staging an entity whose identity is already taken
    #[error("{kind} with ID {id} already exists")]
    IdentityConflict { kind: EntityKind, id: i32 },

    /// Flushing the unit of work failed; the transaction was rolled back
    #[error("Transaction failed and was rolled back: {reason}")]
    TransactionFailure { reason: String },

    /// A mutating operation was attempted with no active transaction
    #[error("Operation '{op}' requires an active transaction")]
    TransactionRequired { op: String },

    /// `begin` was called while a transaction was already active
    #[error("A transaction is already active")]
    TransactionAlreadyActive,

    /// `commit` or `rollback` was called with no active transaction
    #[error("No transaction is active")]
    NoActiveTransaction,

    /// The entity is not tracked by this persistence context
    #[error("{kind} with ID {id} is not managed by this context")]
    NotManaged { kind: EntityKind, id: i32 },

    /// A managed instance was still mutably borrowed when the context read it
    #[error("{kind} with ID {id} is borrowed elsewhere")]
    EntityBorrowed { kind: EntityKind, id: i32 },

    // ===== Query language =====
    /// Query text failed to parse or type-check
    #[error("Malformed query '{query}': {reason}")]
    QueryMalformed { query: String, reason: String },

    /// A positional parameter referenced by the query was never bound
    #[error("Parameter ?{index} is not bound")]
    UnboundParameter { index: usize },

    /// `set_parameter` named a position the query does not use
    #[error("Query has no parameter ?{index}")]
    UnknownParameter { index: usize },

    /// A bound value does not match the attribute it is compared with
    #[error("Parameter ?{index} expects {expected}, got {actual}")]
    ParameterType {
        index: usize,
        expected: String,
        actual: String,
    },

    /// The query selects a different entity than the requested result type
    #[error("Query selects {actual} but {expected} was requested")]
    WrongResultType {
        expected: EntityKind,
        actual: EntityKind,
    },

    /// The FROM clause names an entity that is not registered
    #[error("Unknown entity: {name}")]
    UnknownEntity { name: String },

    // ===== Row mapping =====
    /// A database row could not be mapped back onto an entity
    #[error("Row for {kind} could not be mapped: {reason}")]
    CorruptRow { kind: EntityKind, reason: String },
}

impl From<MuseumError> for ExError {
    fn from(err: MuseumError) -> Self {
        let message = err.to_string();
        match err {
            MuseumError::NotFound { kind, id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_kind(kind)
                .with_entity_id(id)
                .with_message(message),
            MuseumError::NoResult { .. } => {
                ExError::new(ExErrorKind::NoResult).with_message(message)
            }
            MuseumError::NonUniqueResult { .. } => {
                ExError::new(ExErrorKind::NonUniqueResult).with_message(message)
            }
            MuseumError::IdentityConflict { kind, id } => {
                ExError::new(ExErrorKind::IdentityConflict)
                    .with_entity_kind(kind)
                    .with_entity_id(id)
                    .with_message(message)
            }
            MuseumError::TransactionFailure { .. } => {
                ExError::new(ExErrorKind::TransactionFailure).with_message(message)
            }
            MuseumError::TransactionRequired { ref op } => {
                ExError::new(ExErrorKind::TransactionState)
                    .with_op(op.clone())
                    .with_message(message)
            }
            MuseumError::TransactionAlreadyActive | MuseumError::NoActiveTransaction => {
                ExError::new(ExErrorKind::TransactionState).with_message(message)
            }
            MuseumError::NotManaged { kind, id } => ExError::new(ExErrorKind::NotManaged)
                .with_entity_kind(kind)
                .with_entity_id(id)
                .with_message(message),
            MuseumError::EntityBorrowed { kind, id } => ExError::new(ExErrorKind::Internal)
                .with_entity_kind(kind)
                .with_entity_id(id)
                .with_message(message),
            MuseumError::QueryMalformed { .. }
            | MuseumError::UnboundParameter { .. }
            | MuseumError::UnknownParameter { .. }
            | MuseumError::ParameterType { .. }
            | MuseumError::WrongResultType { .. }
            | MuseumError::UnknownEntity { .. } => {
                ExError::new(ExErrorKind::QueryMalformed).with_message(message)
            }
            MuseumError::CorruptRow { kind, .. } => ExError::new(ExErrorKind::Serialization)
                .with_entity_kind(kind)
                .with_message(message),
        }
    }
}
