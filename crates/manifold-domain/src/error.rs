//! Error handling types

use serde::Serialize;
use thiserror::Error;

use crate::definition::DefinitionKind;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Manifold resolution engine
///
/// Every variant is unrecoverable for the in-flight `get` or `compile`
/// call; the engine never retries or swallows any of them.
#[derive(Error, Debug)]
pub enum Error {
    /// No definition exists for the requested id, locally or via delegate
    #[error("service not found: {id}")]
    NotFound {
        /// The id that could not be resolved anywhere in the chain
        id: String,
    },

    /// An id was re-entered while already resolving
    #[error("circular dependency detected: {}", .chain.join(" -> "))]
    CircularDependency {
        /// Ordered ids from resolution start through the repeated id
        chain: Vec<String>,
    },

    /// Autowiring could not produce an argument for a constructor parameter
    #[error(
        "unresolvable parameter `{parameter}` (position {position}) of `{class}`: {reason}"
    )]
    UnresolvableParameter {
        /// The declaring class
        class: String,
        /// The parameter name
        parameter: String,
        /// Zero-based position in the constructor parameter list
        position: usize,
        /// Why every resolution step failed
        reason: String,
    },

    /// An autowire definition targets a class with no registered shape
    #[error("no constructor shape registered for class `{class}`")]
    ShapeNotFound {
        /// The autowire target class
        class: String,
    },

    /// A typed accessor requested a different type than the stored instance
    #[error("service `{id}` is not of the requested type `{expected}`")]
    TypeMismatch {
        /// The resolved service id
        id: String,
        /// The requested Rust type name
        expected: String,
    },

    /// Internal system error
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },

    /// Compilation found definitions it cannot statically support
    ///
    /// Batched by design: the compiler scans the entire table and reports
    /// every offender at once instead of failing per id.
    #[error("compilation rejected {} definition(s)", .rejected.len())]
    CompileUnsupported {
        /// Every offending definition with its kind and reason
        rejected: Vec<RejectedDefinition>,
    },
}

/// One definition the compiler could not statically support
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RejectedDefinition {
    /// The offending service id
    pub id: String,
    /// Which definition variant the id maps to
    pub kind: DefinitionKind,
    /// Human-readable explanation of the rejection
    pub reason: String,
}

impl std::fmt::Display for RejectedDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.id, self.kind, self.reason)
    }
}

impl Error {
    /// Create a not found error
    pub fn not_found<S: Into<String>>(id: S) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a circular dependency error from the traversal chain
    pub fn circular_dependency(chain: Vec<String>) -> Self {
        Self::CircularDependency { chain }
    }

    /// Create an unresolvable parameter error
    pub fn unresolvable_parameter<C, P, R>(class: C, parameter: P, position: usize, reason: R) -> Self
    where
        C: Into<String>,
        P: Into<String>,
        R: Into<String>,
    {
        Self::UnresolvableParameter {
            class: class.into(),
            parameter: parameter.into(),
            position,
            reason: reason.into(),
        }
    }

    /// Create a shape not found error
    pub fn shape_not_found<S: Into<String>>(class: S) -> Self {
        Self::ShapeNotFound {
            class: class.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch<S: Into<String>>(id: S, expected: &str) -> Self {
        Self::TypeMismatch {
            id: id.into(),
            expected: expected.to_string(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a batch compile rejection error
    pub fn compile_unsupported(rejected: Vec<RejectedDefinition>) -> Self {
        Self::CompileUnsupported { rejected }
    }

    /// The rejection list for compile errors, empty for every other variant
    pub fn rejections(&self) -> &[RejectedDefinition] {
        match self {
            Self::CompileUnsupported { rejected } => rejected,
            _ => &[],
        }
    }
}
