pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Usage errors reported back to callers.
///
/// Degraded-mode conditions (overflow, clock regression) are *not* errors:
/// they flow through [`ReportSink`] and generation still returns a value.
///
/// [`ReportSink`]: crate::ReportSink
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested kind is outside the configured `1..=kind_count` range.
    /// No record is touched.
    #[error("kind {kind} out of range (expected 1..={kind_count})")]
    KindOutOfRange { kind: usize, kind_count: usize },
}
