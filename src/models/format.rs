use std::fmt;
use std::path::Path;
use clap::ValueEnum;
use crate::error::{ConversionError, Result};

/// 支援的檔案格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Format {
    Docx,
    Pdf,
    Txt,
    Jpg,
    Png,
    Json,
    Xml,
    Mp3,
    Raw,
    Wav,
    Mp4,
}

impl Format {
    pub const ALL: [Format; 11] = [
        Format::Docx,
        Format::Pdf,
        Format::Txt,
        Format::Jpg,
        Format::Png,
        Format::Json,
        Format::Xml,
        Format::Mp3,
        Format::Raw,
        Format::Wav,
        Format::Mp4,
    ];

    /// 標準副檔名（不含點）
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Docx => "docx",
            Format::Pdf => "pdf",
            Format::Txt => "txt",
            Format::Jpg => "jpg",
            Format::Png => "png",
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Mp3 => "mp3",
            Format::Raw => "raw",
            Format::Wav => "wav",
            Format::Mp4 => "mp4",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Format> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "jpeg" => Some(Format::Jpg),
            "pcm" => Some(Format::Raw),
            "text" => Some(Format::Txt),
            other => Format::ALL.iter().copied().find(|f| f.extension() == other),
        }
    }

    /// 依路徑副檔名判斷格式
    pub fn from_path(path: &Path) -> Result<Format> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
            .ok_or_else(|| ConversionError::UnknownFormat(path.display().to_string()))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// 有序的格式組合（來源 -> 目標）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatPair {
    pub from: Format,
    pub to: Format,
}

impl FormatPair {
    pub const fn new(from: Format, to: Format) -> Self {
        FormatPair { from, to }
    }
}

impl fmt::Display for FormatPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_extension_lookup_is_case_insensitive() {
        assert_eq!(Format::from_extension("PNG"), Some(Format::Png));
        assert_eq!(Format::from_extension(".Json"), Some(Format::Json));
        assert_eq!(Format::from_extension("exe"), None);
    }

    #[test]
    fn test_extension_aliases() {
        assert_eq!(Format::from_extension("jpeg"), Some(Format::Jpg));
        assert_eq!(Format::from_extension("pcm"), Some(Format::Raw));
        assert_eq!(Format::from_extension("text"), Some(Format::Txt));
    }

    #[test]
    fn test_from_path_without_extension_fails() {
        let err = Format::from_path(&PathBuf::from("/tmp/README")).unwrap_err();
        assert!(matches!(err, ConversionError::UnknownFormat(_)));
    }

    #[test]
    fn test_every_format_round_trips_through_its_extension() {
        for format in Format::ALL {
            assert_eq!(Format::from_extension(format.extension()), Some(format));
        }
    }

    #[test]
    fn test_pair_display() {
        assert_eq!(FormatPair::new(Format::Wav, Format::Mp3).to_string(), "wav -> mp3");
    }
}
