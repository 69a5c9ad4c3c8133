use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use crate::error::{ConversionError, Result};
use crate::models::conversion::ConversionRequest;
use crate::strategy::traits::i_strategy::ConversionStrategy;

pub struct JpgToPngStrategy;

impl ConversionStrategy for JpgToPngStrategy {
    fn name(&self) -> &'static str {
        "JpgToPng"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<()> {
        let source = request.single_source(self.name())?;
        let image = image::open(source)?;
        image.save_with_format(&request.target, ImageFormat::Png)?;
        Ok(())
    }
}

/// PNG 轉 JPG，先移除 alpha 通道
pub struct PngToJpgStrategy {
    quality: u8,
}

impl PngToJpgStrategy {
    pub fn new(quality: u8) -> Self {
        PngToJpgStrategy { quality }
    }
}

impl ConversionStrategy for PngToJpgStrategy {
    fn name(&self) -> &'static str {
        "PngToJpg"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<()> {
        let source = request.single_source(self.name())?;
        let rgb = image::open(source)?.to_rgb8();
        let mut writer = BufWriter::new(File::create(&request.target)?);
        JpegEncoder::new_with_quality(&mut writer, self.quality).encode_image(&rgb)?;
        Ok(())
    }
}

/// 多張圖片依序合併為 PDF，每張一頁
pub struct ImagesToPdfStrategy {
    quality: u8,
}

impl ImagesToPdfStrategy {
    pub fn new(quality: u8) -> Self {
        ImagesToPdfStrategy { quality }
    }
}

impl ConversionStrategy for ImagesToPdfStrategy {
    fn name(&self) -> &'static str {
        "ImagesToPdf"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<()> {
        if request.sources.is_empty() {
            return Err(ConversionError::SourceCount {
                strategy: self.name(),
                expected: "至少 1",
                actual: 0,
            });
        }

        let mut pages = Vec::with_capacity(request.sources.len());
        for source in &request.sources {
            pages.push(self.load_page(source)?);
        }

        let mut document = build_pdf(&pages)?;
        document.save(&request.target)?;
        debug!("輸出 {} 頁 PDF：{}", pages.len(), request.target.display());
        Ok(())
    }
}

/// 已編碼為 JPEG 的頁面影像
pub struct PdfPage {
    pub width: u32,
    pub height: u32,
    pub jpeg: Vec<u8>,
}

impl ImagesToPdfStrategy {
    fn load_page(&self, source: &Path) -> Result<PdfPage> {
        let rgb: RgbImage = image::open(source)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(Cursor::new(&mut jpeg), self.quality)
            .encode_image(&rgb)?;
        Ok(PdfPage { width, height, jpeg })
    }
}

/// 建立 PDF 物件結構，頁面尺寸以 72 dpi 對應像素大小
pub fn build_pdf(pages: &[PdfPage]) -> Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

    for page in pages {
        let width = page.width as i64;
        let height = page.height as i64;

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            page.jpeg.clone(),
        ));

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![width.into(), 0.into(), 0.into(), height.into(), 0.into(), 0.into()],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let media_box: Vec<Object> = vec![0.into(), 0.into(), width.into(), height.into()];
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => image_id,
                },
            },
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    Ok(doc)
}
