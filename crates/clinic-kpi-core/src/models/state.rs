//! Shared behaviour for record state/status selections.

/// A closed set of states stored as lowercase text.
pub trait RecordState: Copy + Sized {
    /// Storage representation.
    fn as_str(&self) -> &'static str;

    /// Parse from the storage representation.
    fn parse(s: &str) -> Option<Self>;
}
