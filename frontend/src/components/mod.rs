pub mod plans;
pub mod references;
