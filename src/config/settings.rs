use std::ffi::OsString;
use std::time::Duration;
use crate::error::{ConversionError, Result};

pub const DEFAULT_PROCESS_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// 無標頭 RAW 音訊的 PCM 參數
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmParams {
    pub sample_rate: u32,
    pub channels: u16,
    /// 每個樣本的位元組數（1、2、3 或 4）
    pub sample_width: u16,
}

impl Default for PcmParams {
    fn default() -> Self {
        PcmParams {
            sample_rate: 44100,
            channels: 2,
            sample_width: 2,
        }
    }
}

impl PcmParams {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(ConversionError::InvalidPcm("取樣率必須大於 0".to_string()));
        }
        if self.channels == 0 {
            return Err(ConversionError::InvalidPcm("聲道數必須大於 0".to_string()));
        }
        if !(1..=4).contains(&self.sample_width) {
            return Err(ConversionError::InvalidPcm(format!(
                "不支援的樣本寬度 {} 位元組，僅支援 1 到 4",
                self.sample_width
            )));
        }
        Ok(())
    }

    /// 一個 frame（所有聲道各一個樣本）的位元組數
    pub fn frame_size(&self) -> usize {
        self.channels as usize * self.sample_width as usize
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.sample_width * 8
    }

    /// ffmpeg 對應的 RAW 輸入格式名稱
    pub fn ffmpeg_format(&self) -> Result<&'static str> {
        match self.sample_width {
            1 => Ok("u8"),
            2 => Ok("s16le"),
            3 => Ok("s24le"),
            4 => Ok("s32le"),
            other => Err(ConversionError::InvalidPcm(format!("不支援的樣本寬度 {} 位元組", other))),
        }
    }
}

/// 外部程式位置與固定前置參數
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTool {
    pub program: String,
    pub leading_args: Vec<String>,
}

impl ExternalTool {
    pub fn new(program: impl Into<String>) -> Self {
        ExternalTool {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// 前置參數加上本次呼叫的參數
    pub fn command_args(&self, args: Vec<OsString>) -> Vec<OsString> {
        self.leading_args
            .iter()
            .map(OsString::from)
            .chain(args)
            .collect()
    }
}

/// 策略共用的轉換設定
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterSettings {
    /// 文件轉換外部程式的等待上限
    pub process_timeout: Duration,
    pub pcm: PcmParams,
    pub jpeg_quality: u8,
    pub office: ExternalTool,
    pub ffmpeg: ExternalTool,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        ConverterSettings {
            process_timeout: DEFAULT_PROCESS_TIMEOUT,
            pcm: PcmParams::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            office: ExternalTool::new("libreoffice"),
            ffmpeg: ExternalTool::new("ffmpeg"),
        }
    }
}

impl ConverterSettings {
    pub fn validate(&self) -> Result<()> {
        self.pcm.validate()?;
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConversionError::config(format!(
                "JPEG 品質必須介於 1 到 100，實際為 {}",
                self.jpeg_quality
            )));
        }
        if self.process_timeout.is_zero() {
            return Err(ConversionError::config("外部程式等待時間必須大於 0"));
        }
        Ok(())
    }
}
