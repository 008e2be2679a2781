//! Match kind definitions.

/// MatchKind describes how a canonical domain pattern matches hostnames.
///
/// The variant order is the tie-break used when sorting a
/// [`DomainSet`](crate::DomainSet): `ExactHost < SubtreeSuffix <
/// WildcardPattern < Opaque`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchKind {
    /// Matches one hostname only
    ExactHost,
    /// Matches the hostname and all of its subdomains
    SubtreeSuffix,
    /// Matches per an embedded `*` glob
    WildcardPattern,
    /// Pass-through from a plain domain list, not interpreted
    Opaque,
}
