use crate::config::StorageConfig;
use crate::error::{AppError, Result};
use crate::models::StorageStats;

const MIB: f64 = 1024.0 * 1024.0;

/// Upload limits. Stateless: every decision is a function of the current count and the configured limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaGuard {
    pub max_file_size: u64,
    pub max_files: u64,
}

impl QuotaGuard {
    pub fn new(max_file_size: u64, max_files: u64) -> Self {
        Self {
            max_file_size,
            max_files,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.max_file_size, config.max_files)
    }

    /// Maximum file size in MiB, for messages and statistics
    pub fn max_file_size_mb(&self) -> f64 {
        round_to(self.max_file_size as f64 / MIB, 2)
    }

    pub fn check_file_size(&self, size: u64) -> Result<()> {
        if size > self.max_file_size {
            return Err(AppError::PayloadTooLarge(format!(
                "File too large. Maximum size is {}MB",
                self.max_file_size_mb()
            )));
        }
        Ok(())
    }

    pub fn check_capacity(&self, count: u64) -> Result<()> {
        if count >= self.max_files {
            return Err(self.capacity_error());
        }
        Ok(())
    }

    pub fn capacity_error(&self) -> AppError {
        AppError::InsufficientStorage(format!(
            "Storage limit reached. Maximum {} images allowed. Please delete some images before uploading more.",
            self.max_files
        ))
    }

    pub fn stats(&self, used: u64) -> StorageStats {
        let percent_used = if self.max_files == 0 {
            100.0
        } else {
            round_to(used as f64 / self.max_files as f64 * 100.0, 1)
        };

        StorageStats {
            used,
            total: self.max_files,
            percent_used,
            remaining: self.max_files.saturating_sub(used),
        }
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_limit_is_inclusive() {
        let guard = QuotaGuard::new(100, 10);
        assert!(guard.check_file_size(100).is_ok());
        assert!(matches!(
            guard.check_file_size(101),
            Err(AppError::PayloadTooLarge(_))
        ));
    }

    #[test]
    fn capacity_rejects_at_the_limit() {
        let guard = QuotaGuard::new(100, 200);
        assert!(guard.check_capacity(199).is_ok());
        assert!(matches!(
            guard.check_capacity(200),
            Err(AppError::InsufficientStorage(_))
        ));
    }

    #[test]
    fn stats_round_percent_to_one_decimal() {
        let guard = QuotaGuard::new(100, 3);
        let stats = guard.stats(1);
        assert_eq!(stats.percent_used, 33.3);
        assert_eq!(stats.remaining, 2);
        assert_eq!(stats.total, 3);

        let over = guard.stats(5);
        assert_eq!(over.remaining, 0);
    }

    #[test]
    fn default_limits_report_ten_megabytes() {
        let guard = QuotaGuard::from_config(&StorageConfig::default());
        assert_eq!(guard.max_file_size_mb(), 10.0);
        assert_eq!(guard.stats(1).remaining, 199);
        assert_eq!(guard.stats(1).percent_used, 0.5);
    }
}
