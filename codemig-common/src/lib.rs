//! Shared protocol types for codemig.
//!
//! Both the server and the client speak in terms of the types defined here:
//! the closed [`Kind`] set, the [`CodeArtifact`] a server produces per request,
//! the JSON wire messages, and the validation rules for `n`.

pub mod artifact;
pub mod kind;
pub mod messages;
pub mod program;
pub mod request;

pub use artifact::CodeArtifact;
pub use kind::{Kind, UnknownKind};
pub use messages::{CodeQuery, CodeResponse, ErrorBody, HealthResponse, CLIENT_VERSION_PARAM};
pub use program::{GUARD_MESSAGE, MAX_N};
pub use request::{parse_n, validate_n, ExecutionRequest, ValidationError};
