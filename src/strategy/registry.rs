use std::fmt;
use log::debug;
use crate::config::settings::ConverterSettings;
use crate::error::{ConversionError, Result};
use crate::models::conversion::ConversionRequest;
use crate::models::format::{Format, FormatPair};
use crate::strategy::audio::{
    Mp3ToRawStrategy, Mp3ToWavStrategy, RawToMp3Strategy, RawToWavStrategy, WavToMp3Strategy,
    WavToRawStrategy,
};
use crate::strategy::data::{JsonToXmlStrategy, XmlToJsonStrategy};
use crate::strategy::document::{DocxToPdfStrategy, DocxToTxtStrategy};
use crate::strategy::raster::{ImagesToPdfStrategy, JpgToPngStrategy, PngToJpgStrategy};
use crate::strategy::traits::i_strategy::ConversionStrategy;
use crate::strategy::video::Mp4ToMp3Strategy;

/// 所有可用的轉換策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    DocxToPdf,
    DocxToTxt,
    JpgToPng,
    PngToJpg,
    JsonToXml,
    XmlToJson,
    Mp3ToRaw,
    Mp3ToWav,
    RawToMp3,
    RawToWav,
    WavToMp3,
    WavToRaw,
    Mp4ToMp3,
    ImagesToPdf,
}

/// 格式組合與策略的對照表，依宣告順序列出
static STRATEGY_TABLE: &[(FormatPair, StrategyKind)] = &[
    (FormatPair::new(Format::Docx, Format::Pdf), StrategyKind::DocxToPdf),
    (FormatPair::new(Format::Docx, Format::Txt), StrategyKind::DocxToTxt),
    (FormatPair::new(Format::Jpg, Format::Png), StrategyKind::JpgToPng),
    (FormatPair::new(Format::Png, Format::Jpg), StrategyKind::PngToJpg),
    (FormatPair::new(Format::Json, Format::Xml), StrategyKind::JsonToXml),
    (FormatPair::new(Format::Xml, Format::Json), StrategyKind::XmlToJson),
    (FormatPair::new(Format::Mp3, Format::Raw), StrategyKind::Mp3ToRaw),
    (FormatPair::new(Format::Mp3, Format::Wav), StrategyKind::Mp3ToWav),
    (FormatPair::new(Format::Raw, Format::Mp3), StrategyKind::RawToMp3),
    (FormatPair::new(Format::Raw, Format::Wav), StrategyKind::RawToWav),
    (FormatPair::new(Format::Wav, Format::Mp3), StrategyKind::WavToMp3),
    (FormatPair::new(Format::Wav, Format::Raw), StrategyKind::WavToRaw),
    (FormatPair::new(Format::Mp4, Format::Mp3), StrategyKind::Mp4ToMp3),
    (FormatPair::new(Format::Jpg, Format::Pdf), StrategyKind::ImagesToPdf),
    (FormatPair::new(Format::Png, Format::Pdf), StrategyKind::ImagesToPdf),
];

impl StrategyKind {
    pub const ALL: [StrategyKind; 14] = [
        StrategyKind::DocxToPdf,
        StrategyKind::DocxToTxt,
        StrategyKind::JpgToPng,
        StrategyKind::PngToJpg,
        StrategyKind::JsonToXml,
        StrategyKind::XmlToJson,
        StrategyKind::Mp3ToRaw,
        StrategyKind::Mp3ToWav,
        StrategyKind::RawToMp3,
        StrategyKind::RawToWav,
        StrategyKind::WavToMp3,
        StrategyKind::WavToRaw,
        StrategyKind::Mp4ToMp3,
        StrategyKind::ImagesToPdf,
    ];

    pub fn lookup(pair: FormatPair) -> Option<StrategyKind> {
        STRATEGY_TABLE
            .iter()
            .find(|(candidate, _)| *candidate == pair)
            .map(|(_, kind)| *kind)
    }

    /// 策略的代表格式組合（ImagesToPdf 以 jpg -> pdf 表示）
    pub fn pair(&self) -> FormatPair {
        match self {
            StrategyKind::DocxToPdf => FormatPair::new(Format::Docx, Format::Pdf),
            StrategyKind::DocxToTxt => FormatPair::new(Format::Docx, Format::Txt),
            StrategyKind::JpgToPng => FormatPair::new(Format::Jpg, Format::Png),
            StrategyKind::PngToJpg => FormatPair::new(Format::Png, Format::Jpg),
            StrategyKind::JsonToXml => FormatPair::new(Format::Json, Format::Xml),
            StrategyKind::XmlToJson => FormatPair::new(Format::Xml, Format::Json),
            StrategyKind::Mp3ToRaw => FormatPair::new(Format::Mp3, Format::Raw),
            StrategyKind::Mp3ToWav => FormatPair::new(Format::Mp3, Format::Wav),
            StrategyKind::RawToMp3 => FormatPair::new(Format::Raw, Format::Mp3),
            StrategyKind::RawToWav => FormatPair::new(Format::Raw, Format::Wav),
            StrategyKind::WavToMp3 => FormatPair::new(Format::Wav, Format::Mp3),
            StrategyKind::WavToRaw => FormatPair::new(Format::Wav, Format::Raw),
            StrategyKind::Mp4ToMp3 => FormatPair::new(Format::Mp4, Format::Mp3),
            StrategyKind::ImagesToPdf => FormatPair::new(Format::Jpg, Format::Pdf),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::DocxToPdf => "DocxToPdf",
            StrategyKind::DocxToTxt => "DocxToTxt",
            StrategyKind::JpgToPng => "JpgToPng",
            StrategyKind::PngToJpg => "PngToJpg",
            StrategyKind::JsonToXml => "JsonToXml",
            StrategyKind::XmlToJson => "XmlToJson",
            StrategyKind::Mp3ToRaw => "Mp3ToRaw",
            StrategyKind::Mp3ToWav => "Mp3ToWav",
            StrategyKind::RawToMp3 => "RawToMp3",
            StrategyKind::RawToWav => "RawToWav",
            StrategyKind::WavToMp3 => "WavToMp3",
            StrategyKind::WavToRaw => "WavToRaw",
            StrategyKind::Mp4ToMp3 => "Mp4ToMp3",
            StrategyKind::ImagesToPdf => "ImagesToPdf",
        }
    }

    /// 依設定建立策略實例
    pub fn build(&self, settings: &ConverterSettings) -> Box<dyn ConversionStrategy> {
        match self {
            StrategyKind::DocxToPdf => Box::new(DocxToPdfStrategy::new(
                settings.office.clone(),
                settings.process_timeout,
            )),
            StrategyKind::DocxToTxt => Box::new(DocxToTxtStrategy),
            StrategyKind::JpgToPng => Box::new(JpgToPngStrategy),
            StrategyKind::PngToJpg => Box::new(PngToJpgStrategy::new(settings.jpeg_quality)),
            StrategyKind::JsonToXml => Box::new(JsonToXmlStrategy),
            StrategyKind::XmlToJson => Box::new(XmlToJsonStrategy),
            StrategyKind::Mp3ToRaw => Box::new(Mp3ToRawStrategy),
            StrategyKind::Mp3ToWav => Box::new(Mp3ToWavStrategy),
            StrategyKind::RawToMp3 => Box::new(RawToMp3Strategy::new(
                settings.ffmpeg.clone(),
                settings.pcm,
            )),
            StrategyKind::RawToWav => Box::new(RawToWavStrategy::new(settings.pcm)),
            StrategyKind::WavToMp3 => Box::new(WavToMp3Strategy::new(settings.ffmpeg.clone())),
            StrategyKind::WavToRaw => Box::new(WavToRawStrategy),
            StrategyKind::Mp4ToMp3 => Box::new(Mp4ToMp3Strategy::new(settings.ffmpeg.clone())),
            StrategyKind::ImagesToPdf => Box::new(ImagesToPdfStrategy::new(settings.jpeg_quality)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 依格式組合挑選策略並執行轉換
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    settings: ConverterSettings,
}

impl StrategyRegistry {
    pub fn new(settings: ConverterSettings) -> Self {
        StrategyRegistry { settings }
    }

    pub fn resolve(&self, pair: FormatPair) -> Result<Box<dyn ConversionStrategy>> {
        StrategyKind::lookup(pair)
            .map(|kind| kind.build(&self.settings))
            .ok_or(ConversionError::UnsupportedPair(pair))
    }

    /// 推斷格式組合：來源取第一個檔案的副檔名，目標取目標路徑的副檔名，
    /// 有指定時以指定值為準
    pub fn infer_pair(
        &self,
        request: &ConversionRequest,
        from_override: Option<Format>,
        to_override: Option<Format>,
    ) -> Result<FormatPair> {
        let from = match from_override {
            Some(format) => format,
            None => match request.sources.first() {
                Some(source) => Format::from_path(source)?,
                None => {
                    return Err(ConversionError::SourceCount {
                        strategy: "registry",
                        expected: "至少 1",
                        actual: 0,
                    })
                }
            },
        };
        let to = match to_override {
            Some(format) => format,
            None => Format::from_path(&request.target)?,
        };
        Ok(FormatPair::new(from, to))
    }

    /// 以副檔名推斷格式後執行轉換，回傳使用的策略
    pub fn convert(&self, request: &ConversionRequest) -> Result<StrategyKind> {
        let pair = self.infer_pair(request, None, None)?;
        self.convert_pair(request, pair)
    }

    pub fn convert_pair(&self, request: &ConversionRequest, pair: FormatPair) -> Result<StrategyKind> {
        let kind = StrategyKind::lookup(pair).ok_or(ConversionError::UnsupportedPair(pair))?;
        let strategy = kind.build(&self.settings);
        debug!("使用策略 {} 處理 {}", strategy.name(), pair);
        strategy.convert(request)?;
        Ok(kind)
    }

    pub fn supported_pairs(&self) -> Vec<(FormatPair, StrategyKind)> {
        STRATEGY_TABLE.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_every_kind_round_trips_through_lookup() {
        for kind in StrategyKind::ALL {
            assert_eq!(StrategyKind::lookup(kind.pair()), Some(kind), "{}", kind);
        }
    }

    #[test]
    fn test_png_to_pdf_uses_images_to_pdf() {
        let pair = FormatPair::new(Format::Png, Format::Pdf);
        assert_eq!(StrategyKind::lookup(pair), Some(StrategyKind::ImagesToPdf));
    }

    #[test]
    fn test_table_covers_all_kinds() {
        let registry = StrategyRegistry::default();
        let pairs = registry.supported_pairs();
        assert_eq!(pairs.len(), 15);
        for kind in StrategyKind::ALL {
            assert!(pairs.iter().any(|(_, k)| *k == kind));
        }
    }

    #[test]
    fn test_unsupported_pair() {
        let registry = StrategyRegistry::default();
        let pair = FormatPair::new(Format::Pdf, Format::Docx);
        match registry.resolve(pair) {
            Err(ConversionError::UnsupportedPair(p)) => assert_eq!(p, pair),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("pdf -> docx should not resolve"),
        }
    }

    #[test]
    fn test_built_strategy_names_match_kind() {
        let settings = ConverterSettings::default();
        for kind in StrategyKind::ALL {
            assert_eq!(kind.build(&settings).name(), kind.name());
        }
    }

    #[test]
    fn test_infer_pair_from_extensions_and_overrides() {
        let registry = StrategyRegistry::default();
        let request = ConversionRequest::new("in/Photo.JPEG", "out/photo.png");
        let pair = registry.infer_pair(&request, None, None).unwrap();
        assert_eq!(pair, FormatPair::new(Format::Jpg, Format::Png));

        let request = ConversionRequest::new("in/data", "out/data.bin");
        let pair = registry
            .infer_pair(&request, Some(Format::Json), Some(Format::Xml))
            .unwrap();
        assert_eq!(pair, FormatPair::new(Format::Json, Format::Xml));
    }

    #[test]
    fn test_infer_pair_unknown_extension() {
        let registry = StrategyRegistry::default();
        let request = ConversionRequest {
            sources: vec![PathBuf::from("in/file.xyz")],
            target: PathBuf::from("out/file.json"),
        };
        assert!(matches!(
            registry.infer_pair(&request, None, None),
            Err(ConversionError::UnknownFormat(_))
        ));
    }
}
