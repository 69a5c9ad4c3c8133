use std::time::Instant;
use indicatif::{ProgressBar, ProgressStyle};
use regex::RegexSet;
use crate::error::{ConversionError, Result};

pub fn setup_logging(log_level: &str) -> Result<()> {
    let log_level_filter = match log_level {
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };
    // 互動模式可能在 CLI 之後再次設定，已初始化時沿用既有 logger
    if env_logger::Builder::new()
        .filter_level(log_level_filter)
        .try_init()
        .is_err()
    {
        log::debug!("logger 已初始化，略過重新設定");
    }
    Ok(())
}

pub struct ProgressManager {
    pb: ProgressBar,
    no_progress: bool,
    start: Instant,
}

impl ProgressManager {
    pub fn new(total: u64, no_progress: bool) -> Self {
        let pb = if no_progress {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(total);
            let style = ProgressStyle::default_bar()
                .template("{msg} [{bar:40}] {pos}/{len} ETA: {eta_precise}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-");
            pb.set_style(style);
            pb
        };
        ProgressManager {
            pb,
            no_progress,
            start: Instant::now(),
        }
    }

    /// 完成一個檔案後呼叫，可由多個執行緒同時呼叫
    pub fn advance(&self, action: &str) {
        if self.no_progress {
            return;
        }
        self.pb.inc(1);
        let count = self.pb.position();
        let elapsed = self.start.elapsed().as_secs_f64();
        let speed = if elapsed > 0.0 { count as f64 / elapsed } else { 0.0 };
        self.pb.set_message(format!("{}：{} 檔案，速度：{:.1} 檔案/秒", action, count, speed));
    }

    pub fn finish(&self, converted: usize, failed: usize, skipped: usize) {
        if self.no_progress {
            return;
        }
        self.pb.finish_with_message(format!(
            "完成，成功 {} 個，失敗 {} 個，跳過 {} 個",
            converted, failed, skipped
        ));
    }
}

pub fn format_file_size(size: u64) -> String {
    if size < 1024 * 1024 {
        format!("{:.2} KB", size as f64 / 1024.0)
    } else {
        format!("{:.2} MB", size as f64 / (1024.0 * 1024.0))
    }
}

/// 將 `*` 萬用字元模式轉為正規表示式，其餘字元皆視為字面值
pub fn pattern_to_regex(pattern: &str) -> String {
    regex::escape(pattern).replace("\\*", ".*")
}

pub fn create_regex_sets(include: &[String], exclude: &[String]) -> Result<(RegexSet, RegexSet)> {
    let include_patterns: Vec<_> = include.iter().map(|p| pattern_to_regex(p)).collect();
    let exclude_patterns: Vec<_> = exclude.iter().map(|p| pattern_to_regex(p)).collect();

    let include_set = RegexSet::new(&include_patterns)
        .map_err(|e| ConversionError::config(format!("無效的包含模式: {}", e)))?;
    let exclude_set = RegexSet::new(&exclude_patterns)
        .map_err(|e| ConversionError::config(format!("無效的排除模式: {}", e)))?;

    Ok((include_set, exclude_set))
}
