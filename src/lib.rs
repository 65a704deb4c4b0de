//! Quick in-memory filtering for record datasets.
//!
//! Load an array of records once, then narrow the working result set with
//! substring, exact and range filters, sort it, and chunk it into pages.
//!
//! ```
//! use syft_filter::{DatasetFilter, Record, Value};
//!
//! let mut filter = DatasetFilter::from_records(vec![
//!     Record::from([("id", Value::from(1)), ("name", Value::from("Apple"))]),
//!     Record::from([("id", Value::from(2)), ("name", Value::from("apple pie"))]),
//!     Record::from([("id", Value::from(3)), ("name", Value::from("Banana"))]),
//! ]);
//!
//! filter.contains_filter("name", "apple", false)?;
//! assert_eq!(filter.len(), 2);
//!
//! filter.reset()?;
//! filter.exact_filter("name", "apple")?;
//! assert_eq!(filter.len(), 1);
//! # Ok::<(), syft_filter::FilterError>(())
//! ```

pub mod data;
pub mod error;
pub mod state;

pub use data::fetch::{Fetch, FetchConfig, HttpFetcher};
pub use data::filter::{match_string, Bounds, SearchTerms, DEFAULT_PAGE_SIZE};
pub use data::loader::{load_file, parse_json};
pub use data::model::{Record, Value};
pub use error::{FilterError, LoadError, Result};
pub use state::{DataInput, DatasetFilter};
