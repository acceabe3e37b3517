pub mod fixed;
pub mod google;
pub mod unconfigured;
