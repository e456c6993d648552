//! Compound records and datastore dump loading for cryosearch.
//!
//! The catalog is a collection of cryoprotectant compound documents. This
//! crate owns their shape ([`CompoundRecord`]) and turns a dump of the
//! collection into validated records; it knows nothing about searching them.

mod error;
pub mod load;
pub mod model;
pub mod test_data;

pub use error::{DataError, Result};
pub use load::{is_valid_hash, load_records, parse_records, validate_records};
pub use model::{CellInfo, CompoundRecord, GrasInfo, Reference};
pub use test_data::{DumpLayout, sample_records, write_sample_dump};

/// Where the server looks for the datastore dump when none is configured.
pub const DATA_PATH_DEFAULT: &str = "./cryosearch_data/compounds.json";
