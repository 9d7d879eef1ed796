pub mod fit;
pub mod scan;
pub mod volume;
