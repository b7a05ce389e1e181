pub mod application;
pub mod review;
