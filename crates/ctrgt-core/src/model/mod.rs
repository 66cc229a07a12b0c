pub mod record;
pub mod value;

pub use record::Record;
pub use value::FieldValue;

use std::collections::BTreeMap;

/// Full export of every collection, keyed by storage name
pub type Snapshot = BTreeMap<String, Vec<Record>>;
