use clap::Parser;
use std::path::{Path, PathBuf};
use crate::error::{ConversionError, Result};
use crate::models::format::Format;

#[derive(Parser, Clone, Debug)]
#[command(
    name = "file_converter",
    about = "在常見檔案格式之間轉換（文件、圖片、結構化資料、音訊、影片）",
    long_about = "依來源與目標的副檔名挑選轉換策略並執行，例如 docx -> pdf、png -> jpg、json -> xml、wav -> mp3。\n多張圖片可合併為單一 PDF。使用 --batch 轉換整個目錄，使用 --list 列出所有支援的組合，使用 --show-config 預覽實際配置。\n不帶任何參數執行時進入互動模式。"
)]
pub struct Cli {
    /// 來源檔案（批次模式下為來源目錄）
    pub inputs: Vec<PathBuf>,
    /// 目標檔案（批次模式下為輸出目錄）
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub from: Option<Format>,
    #[arg(long, value_enum)]
    pub to: Option<Format>,
    #[arg(long, default_value_t = false)]
    pub batch: bool,
    #[arg(long, default_value = "*", value_delimiter = ',')]
    pub include: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,
    /// 單一檔案大小上限（MB）
    #[arg(long)]
    pub max_size: Option<f64>,
    /// 批次模式的平行工作數，預設為 CPU 數量
    #[arg(long)]
    pub jobs: Option<usize>,
    /// 文件轉換外部程式的等待上限（秒）
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,
    #[arg(long, default_value_t = 44100)]
    pub sample_rate: u32,
    #[arg(long, default_value_t = 2)]
    pub channels: u16,
    /// RAW 音訊每個樣本的位元組數
    #[arg(long, default_value_t = 2)]
    pub sample_width: u16,
    #[arg(long, default_value_t = 75, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: u8,
    #[arg(long, default_value = "libreoffice")]
    pub office_bin: String,
    #[arg(long, default_value = "ffmpeg")]
    pub ffmpeg_bin: String,
    #[arg(long, default_value = "info", value_parser = ["error", "warn", "info", "debug"])]
    pub log_level: String,
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
    #[arg(long, default_value_t = false)]
    pub show_config: bool,
    /// 列出所有支援的轉換組合後結束
    #[arg(long, default_value_t = false)]
    pub list: bool,
}

pub fn validate_input_path(input: &Path) -> Result<&Path> {
    if !input.exists() {
        log::error!("輸入路徑不存在：{}", input.display());
        return Err(ConversionError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("輸入路徑 '{}' 不存在", input.display()),
        )));
    }
    Ok(input)
}

pub fn is_valid_pattern(pattern: &str) -> bool {
    let invalid_chars = ['/', '\\', ':', '?', '"', '<', '>', '|'];
    !pattern.is_empty() && !pattern.contains(&invalid_chars[..])
}

pub fn validate_file_patterns(include: &[String], exclude: &Option<Vec<String>>) -> Result<()> {
    for pattern in include {
        if !is_valid_pattern(pattern) {
            return Err(ConversionError::config(format!("無效的包含模式: {}", pattern)));
        }
    }
    if let Some(exclude_patterns) = exclude {
        for pattern in exclude_patterns {
            if !is_valid_pattern(pattern) {
                return Err(ConversionError::config(format!("無效的排除模式: {}", pattern)));
            }
        }
    }
    Ok(())
}
