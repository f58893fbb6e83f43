pub mod image;
pub mod message;
pub mod quota;
pub mod stats;

pub use image::ImageService;
pub use message::MessageService;
pub use quota::QuotaGuard;
pub use stats::StatsService;
