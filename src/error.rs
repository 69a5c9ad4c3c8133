use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use crate::models::format::{Format, FormatPair};

pub type Result<T> = std::result::Result<T, ConversionError>;

// 轉換錯誤，所有策略與外層皆以此型別回報
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("設定錯誤：{0}")]
    Config(String),

    #[error("不支援的轉換組合：{0}")]
    UnsupportedPair(FormatPair),

    #[error("無法從 '{0}' 判斷檔案格式")]
    UnknownFormat(String),

    #[error("{strategy} 需要 {expected} 個來源檔案，實際為 {actual} 個")]
    SourceCount {
        strategy: &'static str,
        expected: &'static str,
        actual: usize,
    },

    #[error("無法啟動外部程式 '{program}'：{source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("外部程式 '{program}' 執行失敗：{stderr}")]
    Process { program: String, stderr: String },

    #[error("外部程式 '{program}' 未在 {timeout:?} 內結束")]
    Timeout { program: String, timeout: Duration },

    #[error("來源 '{path}' 內容無效：{reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("無效的 PCM 參數：{0}")]
    InvalidPcm(String),

    #[error("無法將轉換結果 '{expected}' 重新命名為 '{target}'：{source}")]
    Rename {
        expected: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("圖片處理錯誤：{0}")]
    Image(#[from] image::ImageError),

    #[error("XML 錯誤：{0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON 錯誤：{0}")]
    Json(#[from] serde_json::Error),

    #[error("WAV 錯誤：{0}")]
    Wav(#[from] hound::Error),

    #[error("音訊解碼錯誤：{0}")]
    Audio(#[from] symphonia::core::errors::Error),

    #[error("PDF 錯誤：{0}")]
    Pdf(#[from] lopdf::Error),

    #[error("壓縮檔錯誤：{0}")]
    Archive(#[from] zip::result::ZipError),
}

/// 錯誤分類，決定 CLI 的結束代碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Dispatch,
    Process,
    Timeout,
    Codec,
    Filesystem,
}

impl ConversionError {
    pub fn unsupported(from: Format, to: Format) -> Self {
        ConversionError::UnsupportedPair(FormatPair::new(from, to))
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ConversionError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ConversionError::Config(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ConversionError::Config(_) => ErrorCategory::Config,
            ConversionError::UnsupportedPair(_)
            | ConversionError::UnknownFormat(_)
            | ConversionError::SourceCount { .. } => ErrorCategory::Dispatch,
            ConversionError::Spawn { .. } | ConversionError::Process { .. } => ErrorCategory::Process,
            ConversionError::Timeout { .. } => ErrorCategory::Timeout,
            ConversionError::Io(_) | ConversionError::Rename { .. } => ErrorCategory::Filesystem,
            ConversionError::Image(image::ImageError::IoError(_)) => ErrorCategory::Filesystem,
            ConversionError::Json(e) if e.is_io() => ErrorCategory::Filesystem,
            ConversionError::Wav(hound::Error::IoError(_)) => ErrorCategory::Filesystem,
            ConversionError::Archive(zip::result::ZipError::Io(_)) => ErrorCategory::Filesystem,
            _ => ErrorCategory::Codec,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Config => 1,
            ErrorCategory::Dispatch => 3,
            ErrorCategory::Process => 4,
            ErrorCategory::Timeout => 5,
            ErrorCategory::Codec => 6,
            ErrorCategory::Filesystem => 7,
        }
    }
}

impl From<ConversionError> for io::Error {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::Io(e) => e,
            ConversionError::Timeout { .. } => io::Error::new(io::ErrorKind::TimedOut, err),
            ConversionError::Config(_) => io::Error::new(io::ErrorKind::InvalidInput, err),
            other => io::Error::new(io::ErrorKind::Other, other),
        }
    }
}
