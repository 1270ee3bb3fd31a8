use crate::Result;

/// Line-oriented storage medium behind every store.
///
/// Each record is one line of text. Implementations must treat
/// `append_line` and `replace_all` as single indivisible writes: a reader
/// sees either the old contents or the new ones, never a mixture.
pub trait RecordStore: Send + Sync {
    /// Human-readable location, used in log output.
    fn location(&self) -> String;

    /// Reads every line currently stored, in order. A missing medium reads
    /// as empty.
    fn read_lines(&self) -> Result<Vec<String>>;

    /// Appends one record after all existing ones.
    fn append_line(&self, line: &str) -> Result<()>;

    /// Replaces the whole contents with `lines`.
    fn replace_all(&self, lines: &[String]) -> Result<()>;
}
