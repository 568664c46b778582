/// Position of a record inside the loaded dataset.
/// Example: `0`, `41`
pub type RecordIndex = usize;
/// Name of a field inside a record.
/// Examples: `source`, `title`, `bias_text`
pub type FieldName = String;
/// Tag mixed into the master seed to derive a component generator.
/// Examples: `multi`, `singleton`, `groupless`
pub type SeedTag = &'static str;
