//! Well-known service ids

/// Service id under which the parameter bag is registered.
///
/// The autowirer resolves configuration-key injection hints by fetching
/// this id from the active container and downcasting to [`crate::ParamBag`].
pub const PARAM_BAG_ID: &str = "manifold.params";
