use std::ffi::OsString;
use std::path::Path;
use log::debug;
use crate::config::settings::{ExternalTool, PcmParams};
use crate::error::Result;
use crate::models::conversion::ConversionRequest;
use crate::service::pcm::{decode_compressed, raw_to_wav, wav_to_raw, write_raw_i16, write_wav_i16};
use crate::service::process::run_tool;
use crate::strategy::traits::i_strategy::ConversionStrategy;

/// ffmpeg 共用參數：覆寫目標、只輸出錯誤
pub fn ffmpeg_prelude() -> Vec<OsString> {
    ["-y", "-hide_banner", "-loglevel", "error"]
        .iter()
        .map(OsString::from)
        .collect()
}

/// ffmpeg 輸出 MP3 的參數（捨棄影像串流）
pub fn ffmpeg_mp3_output(target: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-vn", "-codec:a", "libmp3lame", "-f", "mp3"]
        .iter()
        .map(OsString::from)
        .collect();
    args.push(target.as_os_str().to_os_string());
    args
}

/// 以 ffmpeg 將輸入編碼為 MP3，`input_args` 描述輸入格式與來源
pub fn encode_mp3(ffmpeg: &ExternalTool, input_args: Vec<OsString>, target: &Path) -> Result<()> {
    let mut args = ffmpeg_prelude();
    args.extend(input_args);
    args.extend(ffmpeg_mp3_output(target));
    run_tool(ffmpeg, args, None)?.ensure_success(&ffmpeg.program)?;
    Ok(())
}

pub struct Mp3ToRawStrategy;

impl ConversionStrategy for Mp3ToRawStrategy {
    fn name(&self) -> &'static str {
        "Mp3ToRaw"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<()> {
        let source = request.single_source(self.name())?;
        let audio = decode_compressed(source)?;
        write_raw_i16(&request.target, &audio.samples)
    }
}

pub struct Mp3ToWavStrategy;

impl ConversionStrategy for Mp3ToWavStrategy {
    fn name(&self) -> &'static str {
        "Mp3ToWav"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<()> {
        let source = request.single_source(self.name())?;
        let audio = decode_compressed(source)?;
        write_wav_i16(&request.target, &audio)
    }
}

pub struct RawToMp3Strategy {
    ffmpeg: ExternalTool,
    pcm: PcmParams,
}

impl RawToMp3Strategy {
    pub fn new(ffmpeg: ExternalTool, pcm: PcmParams) -> Self {
        RawToMp3Strategy { ffmpeg, pcm }
    }
}

impl ConversionStrategy for RawToMp3Strategy {
    fn name(&self) -> &'static str {
        "RawToMp3"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<()> {
        let source = request.single_source(self.name())?;
        self.pcm.validate()?;
        let input_args = vec![
            OsString::from("-f"),
            OsString::from(self.pcm.ffmpeg_format()?),
            OsString::from("-ar"),
            OsString::from(self.pcm.sample_rate.to_string()),
            OsString::from("-ac"),
            OsString::from(self.pcm.channels.to_string()),
            OsString::from("-i"),
            source.as_os_str().to_os_string(),
        ];
        encode_mp3(&self.ffmpeg, input_args, &request.target)
    }
}

pub struct RawToWavStrategy {
    pcm: PcmParams,
}

impl RawToWavStrategy {
    pub fn new(pcm: PcmParams) -> Self {
        RawToWavStrategy { pcm }
    }
}

impl ConversionStrategy for RawToWavStrategy {
    fn name(&self) -> &'static str {
        "RawToWav"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<()> {
        let source = request.single_source(self.name())?;
        raw_to_wav(source, &request.target, &self.pcm)
    }
}

pub struct WavToMp3Strategy {
    ffmpeg: ExternalTool,
}

impl WavToMp3Strategy {
    pub fn new(ffmpeg: ExternalTool) -> Self {
        WavToMp3Strategy { ffmpeg }
    }
}

impl ConversionStrategy for WavToMp3Strategy {
    fn name(&self) -> &'static str {
        "WavToMp3"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<()> {
        let source = request.single_source(self.name())?;
        let input_args = vec![OsString::from("-i"), source.as_os_str().to_os_string()];
        encode_mp3(&self.ffmpeg, input_args, &request.target)
    }
}

pub struct WavToRawStrategy;

impl ConversionStrategy for WavToRawStrategy {
    fn name(&self) -> &'static str {
        "WavToRaw"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<()> {
        let source = request.single_source(self.name())?;
        let spec = wav_to_raw(source, &request.target)?;
        debug!(
            "WAV 參數：{} Hz，{} 聲道，{} 位元",
            spec.sample_rate, spec.channels, spec.bits_per_sample
        );
        Ok(())
    }
}
