//! Staging Adapter - 上传样本暂存实现

mod file_staging;

pub use file_staging::FileSampleStaging;
