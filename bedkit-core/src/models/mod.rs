pub mod region;
pub mod region_set;
pub mod schema;

// re-export for cleaner imports
pub use self::region::Region;
pub use self::region_set::{LoadOptions, RegionSet};
pub use self::schema::BedSchema;
