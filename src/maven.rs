pub mod coordinates;
pub mod paths;
pub mod metadata_xml;
pub mod snapshot;
