pub mod category_service;
pub mod moderation_service;
pub mod stats_service;
pub mod storage;
pub mod visibility;
