pub mod camera;
pub mod capture_guide;
pub mod handlers;
pub mod header;
pub mod landing;
pub mod report;
pub mod status;
pub mod utils;
