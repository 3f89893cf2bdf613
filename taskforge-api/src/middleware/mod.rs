/// Tower middleware for the API server
///
/// Bearer-token authentication lives in [`crate::app`] as a thin
/// `from_fn` wrapper over the shared auth module; what remains here is
/// middleware with real Service plumbing.

pub mod security;
