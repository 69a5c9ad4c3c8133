use std::path::{Path, PathBuf};
use crate::error::{ConversionError, Result};
use crate::models::format::{Format, FormatPair};
use crate::strategy::registry::StrategyKind;

/// 單次轉換請求：來源檔案（依序）與目標路徑
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub sources: Vec<PathBuf>,
    pub target: PathBuf,
}

impl ConversionRequest {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        ConversionRequest {
            sources: vec![source.into()],
            target: target.into(),
        }
    }

    pub fn multi<I, P>(sources: I, target: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        ConversionRequest {
            sources: sources.into_iter().map(Into::into).collect(),
            target: target.into(),
        }
    }

    /// 取得唯一的來源檔案，供單一來源的策略使用
    pub fn single_source(&self, strategy: &'static str) -> Result<&Path> {
        match self.sources.as_slice() {
            [source] => Ok(source.as_path()),
            other => Err(ConversionError::SourceCount {
                strategy,
                expected: "1",
                actual: other.len(),
            }),
        }
    }
}

// Facade 的輸入：單檔（或多張圖片）轉換
#[derive(Debug, Clone)]
pub struct ConversionInput {
    pub sources: Vec<PathBuf>,
    pub target: PathBuf,
    pub from: Option<Format>,
    pub to: Option<Format>,
}

#[derive(Debug)]
pub struct ConversionOutput {
    pub output_path: PathBuf,
    pub pair: FormatPair,
    pub strategy: StrategyKind,
    pub output_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_source_accepts_exactly_one() {
        let request = ConversionRequest::new("a.json", "a.xml");
        assert_eq!(request.single_source("JsonToXml").unwrap(), Path::new("a.json"));
    }

    #[test]
    fn test_single_source_rejects_many() {
        let request = ConversionRequest::multi(["a.png", "b.png"], "out.jpg");
        let err = request.single_source("PngToJpg").unwrap_err();
        assert!(matches!(err, ConversionError::SourceCount { actual: 2, .. }));
    }
}
