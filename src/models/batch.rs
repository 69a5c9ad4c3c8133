use std::path::PathBuf;
use crate::models::format::Format;

#[derive(Clone)]
pub struct FileCollectInput {
    pub input_path: PathBuf,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Option<Vec<String>>,
    pub max_size: Option<f64>,
}

#[derive(Debug)]
pub struct FileCollectOutput {
    pub files: Vec<PathBuf>,
    pub total_size: u64,
}

// 目錄批次轉換的輸入
#[derive(Debug, Clone)]
pub struct BatchInput {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub to: Format,
    pub include: Vec<String>,
    pub exclude: Option<Vec<String>>,
    pub max_size: Option<f64>,
    pub jobs: Option<usize>,
    pub no_progress: bool,
}

#[derive(Debug, Default)]
pub struct BatchOutput {
    pub converted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
    pub skipped: Vec<PathBuf>,
}
