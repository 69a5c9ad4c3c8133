#![allow(dead_code)]

use std::f32::consts::PI;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// ffmpeg 可用且支援 libmp3lame 時才執行 MP3 相關測試
pub fn ffmpeg_with_mp3() -> bool {
    match Command::new("ffmpeg").args(["-hide_banner", "-encoders"]).output() {
        Ok(output) => String::from_utf8_lossy(&output.stdout).contains("libmp3lame"),
        Err(_) => false,
    }
}

/// 寫出一段 16 位元正弦波 WAV
pub fn write_sine_wav(path: &Path, sample_rate: u32, channels: u16, seconds: f32) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    let frames = (sample_rate as f32 * seconds) as u32;
    for n in 0..frames {
        let t = n as f32 / sample_rate as f32;
        let sample = ((2.0 * PI * 440.0 * t).sin() * i16::MAX as f32 * 0.5) as i16;
        for _ in 0..channels {
            writer.write_sample(sample).unwrap();
        }
    }
    writer.finalize().unwrap();
}

pub fn wav_duration(path: &Path) -> f64 {
    let reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    reader.duration() as f64 / spec.sample_rate as f64
}

/// 建立只含 `word/document.xml` 的最小 DOCX
pub fn write_docx(path: &Path, paragraphs: &[&str]) {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );

    let mut zip = ZipWriter::new(File::create(path).unwrap());
    zip.start_file("word/document.xml", SimpleFileOptions::default()).unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap();
}
