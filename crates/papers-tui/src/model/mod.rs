pub mod course;
pub mod home;
pub mod palette;
pub mod upload;
