pub mod landing;
pub mod metrics_handler;
