//! Manifold compiled container
//!
//! Transforms a frozen definition table into a static dispatch artifact: a
//! lookup table from id to explicit construction plans, for exactly the
//! definition subset the compiler statically supports. Anything else is
//! collected into one consolidated rejection report; compilation never
//! fails on the first offender.
//!
//! ## Pipeline
//!
//! ```text
//! HashMap<String, Definition>        Compiler::compile()
//! ───────────────────────────        ───────────────────
//! value / factory / autowire    →    support scan (whole table)
//! tagged / alias                →    fixpoint over members and targets
//!                                         ↓
//!                  rejected?  →  Error::CompileUnsupported (batch)
//!                  accepted   →  CompiledContainer { ServicePlan per id }
//! ```
//!
//! The artifact is a derived, cached view of the definition table, stamped
//! with a content fingerprint; it must be regenerated whenever the table
//! changes ([`CompiledContainer::is_stale`]).

pub mod artifact;
pub mod compiler;
pub mod fingerprint;
pub mod plan;

pub use artifact::CompiledContainer;
pub use compiler::Compiler;
pub use fingerprint::{fingerprint, Fingerprint};
pub use plan::{ArgPlan, ServicePlan};
