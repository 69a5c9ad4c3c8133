use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;
use crate::config::settings::ExternalTool;
use crate::error::{ConversionError, Result};
use crate::models::conversion::ConversionRequest;
use crate::service::process::run_tool;
use crate::strategy::traits::i_strategy::ConversionStrategy;

const DOCUMENT_PART: &str = "word/document.xml";

/// 透過外部 office 程式將 DOCX 轉為 PDF
pub struct DocxToPdfStrategy {
    office: ExternalTool,
    timeout: Duration,
}

impl DocxToPdfStrategy {
    pub fn new(office: ExternalTool, timeout: Duration) -> Self {
        DocxToPdfStrategy { office, timeout }
    }
}

/// 目標所在目錄；目標沒有上層目錄時使用目前目錄
pub fn output_dir(target: &Path) -> PathBuf {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// office 程式實際輸出的檔名：來源主檔名加上 .pdf，位於輸出目錄
pub fn converter_output_path(source: &Path, out_dir: &Path) -> PathBuf {
    let stem = source.file_stem().unwrap_or(source.as_os_str());
    let mut name = stem.to_os_string();
    name.push(".pdf");
    out_dir.join(name)
}

impl ConversionStrategy for DocxToPdfStrategy {
    fn name(&self) -> &'static str {
        "DocxToPdf"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<()> {
        let source = request.single_source(self.name())?;
        let out_dir = output_dir(&request.target);
        let args = vec![
            OsString::from("--convert-to"),
            OsString::from("pdf"),
            OsString::from("--outdir"),
            out_dir.clone().into_os_string(),
            source.as_os_str().to_os_string(),
        ];

        let output = run_tool(&self.office, args, Some(self.timeout))?;
        // 只要 stderr 有內容即視為失敗，不論結束代碼
        if output.has_stderr() {
            return Err(ConversionError::Process {
                program: self.office.program.clone(),
                stderr: output.stderr_text(),
            });
        }
        output.ensure_success(&self.office.program)?;

        let produced = converter_output_path(source, &out_dir);
        if produced != request.target {
            debug!("重新命名 {} -> {}", produced.display(), request.target.display());
            fs::rename(&produced, &request.target).map_err(|source| ConversionError::Rename {
                expected: produced.clone(),
                target: request.target.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

/// 讀取 DOCX 本文並輸出純文字
pub struct DocxToTxtStrategy;

impl ConversionStrategy for DocxToTxtStrategy {
    fn name(&self) -> &'static str {
        "DocxToTxt"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<()> {
        let source = request.single_source(self.name())?;
        let paragraphs = extract_paragraphs(source)?;
        let mut text = paragraphs.join("\n\n");
        if !text.is_empty() {
            text.push('\n');
        }
        fs::write(&request.target, text)?;
        Ok(())
    }
}

/// 取出 DOCX 內所有非空段落的文字
pub fn extract_paragraphs(source: &Path) -> Result<Vec<String>> {
    let mut archive = zip::ZipArchive::new(BufReader::new(File::open(source)?))?;
    let mut xml = String::new();
    match archive.by_name(DOCUMENT_PART) {
        Ok(mut part) => {
            part.read_to_string(&mut xml)?;
        }
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(ConversionError::malformed(source, format!("缺少 {}", DOCUMENT_PART)));
        }
        Err(e) => return Err(e.into()),
    }
    paragraphs_from_document_xml(&xml)
}

pub fn paragraphs_from_document_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    let paragraph = std::mem::take(&mut current);
                    if !paragraph.trim().is_empty() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Event::Text(text) if in_text => current.push_str(&text.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(paragraphs)
}
