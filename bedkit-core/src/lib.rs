//! Core data model for bedkit.
//!
//! A BED file is loaded into a [`RegionSet`](models::RegionSet): an ordered table of
//! [`Region`](models::Region) records that share one column schema (3 to 12 columns of the
//! canonical BED layout). Coordinates are zero-based and half-open. Cells whose start or end
//! can not be parsed are kept as missing markers instead of failing the whole load.
//!
//! ```
//! use bedkit_core::models::RegionSet;
//!
//! let rs = RegionSet::from_bed_str("chr1\t10\t20\tpeak1\nchr1\t15\tNA\tpeak2\n").unwrap();
//! assert_eq!(rs.len(), 2);
//! assert_eq!(rs.schema.width(), 4);
//! assert_eq!(rs.regions[1].end, None);
//! ```

pub mod consts;
pub mod errors;
pub mod models;
pub mod utils;

pub use errors::RegionSetError;
