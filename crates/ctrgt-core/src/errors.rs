use thiserror::Error;

/// Result type alias using the canonical error facility
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every core operation fails with exactly one of these kinds. Each kind maps
/// to a stable code that an outer request layer can translate into its own
/// status codes without matching on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    /// Malformed or missing input, or a storage CHECK/NOT NULL rejection
    Validation,
    /// A uniqueness constraint was violated (duplicate username, reused id)
    Conflict,
    /// An identifier-scoped write matched zero rows
    NotFound,
    /// Credential mismatch on login
    Auth,
    /// Underlying storage failure, including mid-transaction failures
    Persistence,
    /// JSON conversion failed at the boundary
    Serialization,
    /// Filesystem access failed (backup files)
    Io,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Validation => "ERR_VALIDATION",
            ExErrorKind::Conflict => "ERR_CONFLICT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Auth => "ERR_AUTH",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification plus optional addressing context (operation,
/// collection, record id) and the error it wraps, if any.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    collection: Option<String>,
    record_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            collection: None,
            record_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the collection the operation addressed
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Add the record identifier the operation addressed
    pub fn with_record_id(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Wrap an underlying error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the wrapped error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Kind of the innermost wrapped error (or this error's kind)
    pub fn root_kind(&self) -> ExErrorKind {
        match &self.source {
            Some(inner) => inner.root_kind(),
            None => self.kind,
        }
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
        if let Some(collection) = &self.collection {
            write!(f, " (collection: {})", collection)?;
        }
        if let Some(record_id) = &self.record_id {
            write!(f, " (id: {})", record_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Input validation failures detected before storage is touched
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("Unknown collection: {name}")]
    UnknownCollection { name: String },

    #[error("Unknown field '{field}' for collection {collection}")]
    UnknownField { collection: String, field: String },

    #[error("Missing required field '{field}'")]
    MissingField { field: String },

    #[error("Quantity must be a positive integer, got {value}")]
    InvalidQuantity { value: String },

    #[error("Unsupported value for field '{field}': only strings, numbers, booleans and null are stored")]
    UnsupportedValue { field: String },

    #[error("Collection {collection} does not allow {op}")]
    OperationNotExposed { collection: String, op: String },

    #[error("Update for collection {collection} carries no fields")]
    EmptyUpdate { collection: String },

    #[error("Record identifier cannot be changed")]
    ImmutableId,

    #[error("Field '{field}' of {collection} is only set through registration")]
    CredentialField { collection: String, field: String },

    #[error("Field '{field}' must not start or end with whitespace")]
    UntrimmedValue { field: String },
}

impl From<RecordError> for ExError {
    fn from(err: RecordError) -> Self {
        let base = ExError::new(ExErrorKind::Validation).with_message(err.to_string());
        match err {
            RecordError::UnknownCollection { .. } => base.with_op("lookup_collection"),
            RecordError::UnknownField { collection, .. }
            | RecordError::OperationNotExposed { collection, .. }
            | RecordError::CredentialField { collection, .. }
            | RecordError::EmptyUpdate { collection } => base.with_collection(collection),
            RecordError::MissingField { .. }
            | RecordError::InvalidQuantity { .. }
            | RecordError::UnsupportedValue { .. }
            | RecordError::UntrimmedValue { .. }
            | RecordError::ImmutableId => base,
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}

impl From<std::io::Error> for ExError {
    fn from(err: std::io::Error) -> Self {
        ExError::new(ExErrorKind::Io).with_message(err.to_string())
    }
}

/// Build the single error returned for every failed login
pub fn invalid_credentials() -> ExError {
    ExError::new(ExErrorKind::Auth)
        .with_op("authenticate")
        .with_message("invalid credentials")
}
