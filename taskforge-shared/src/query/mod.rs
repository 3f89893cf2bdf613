/// Task list query types
///
/// Typed filtering, sorting, and pagination for task lists. The HTTP layer
/// parses raw query strings into these types; the repository layer turns
/// them into SQL.
///
/// # Modules
///
/// - [`filter`]: [`filter::TaskFilter`] and [`filter::TaskSort`] with
///   reference in-memory semantics
/// - [`page`]: clamped [`page::PageRequest`] and the [`page::Page`] result
///   with its counters (total, last page, from/to)

pub mod filter;
pub mod page;
