pub mod integrity;
pub mod stats;
