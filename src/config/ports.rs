use std::path::PathBuf;
use crate::config::settings::ConverterSettings;
use crate::error::Result;
use crate::models::format::Format;

// 應用配置結構體，封裝所有參數
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub sources: Vec<PathBuf>,
    pub output: PathBuf,
    pub from: Option<Format>,
    pub to: Option<Format>,
    pub batch: bool,
    pub include: Vec<String>,
    pub exclude: Option<Vec<String>>,
    pub max_size: Option<f64>,
    pub jobs: Option<usize>,
    pub no_progress: bool,
    pub log_level: String,
    pub settings: ConverterSettings,
}

// 配置來源的 Port
pub trait ConfigPort {
    fn get_config(&self) -> Result<AppConfig>;
}

// 轉換執行的 Port，回傳輸出路徑
pub trait ConversionPort {
    fn execute(&self, config: AppConfig) -> Result<PathBuf>;
}
