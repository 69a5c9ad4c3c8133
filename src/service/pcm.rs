//! PCM 樣本處理：MP3 解碼（symphonia）、WAV 讀寫（hound）與 RAW 位元組轉換

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use log::debug;
use symphonia::core::audio::{SampleBuffer, SignalSpec};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use crate::config::settings::PcmParams;
use crate::error::{ConversionError, Result};

/// 交錯排列的 16 位元樣本與其串流參數
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl DecodedAudio {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frames() as f64 / self.sample_rate as f64
        }
    }
}

/// 以 symphonia 解碼 MP3（或其他已啟用的格式）為 16 位元 PCM
pub fn decode_compressed(input: &Path) -> Result<DecodedAudio> {
    let file = File::open(input)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = input.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| ConversionError::malformed(input, "找不到音訊軌"))?;
    let track_id = track.id;
    let track_rate = track.codec_params.sample_rate;
    let track_channels = track.codec_params.channels.map(|c| c.count() as u16);
    let mut decoder = symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut stream_spec: Option<SignalSpec> = None;
    let mut samples: Vec<i16> = Vec::new();
    let mut buffer: Option<SampleBuffer<i16>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // 單一損毀封包可略過，與一般播放器行為相同
            Err(SymphoniaError::DecodeError(reason)) => {
                debug!("略過無法解碼的封包：{}", reason);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        check_stream_spec(&mut stream_spec, spec, input)?;

        let buf = buffer.get_or_insert_with(|| SampleBuffer::<i16>::new(decoded.capacity() as u64, spec));
        if buf.capacity() < decoded.capacity() * spec.channels.count() {
            *buf = SampleBuffer::<i16>::new(decoded.capacity() as u64, spec);
        }
        buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(buf.samples());
    }

    let (sample_rate, channels) = match stream_spec {
        Some(spec) => (spec.rate, spec.channels.count() as u16),
        None => (track_rate.unwrap_or(0), track_channels.unwrap_or(0)),
    };
    if sample_rate == 0 || channels == 0 {
        return Err(ConversionError::malformed(input, "無法判斷取樣率或聲道數"));
    }

    debug!("解碼 {}：{} Hz，{} 聲道，{} 個樣本", input.display(), sample_rate, channels, samples.len());
    Ok(DecodedAudio { sample_rate, channels, samples })
}

/// 串流中途改變取樣率或聲道數時，WAV 標頭無法描述全部樣本
fn check_stream_spec(first: &mut Option<SignalSpec>, spec: SignalSpec, input: &Path) -> Result<()> {
    match first {
        None => {
            *first = Some(spec);
            Ok(())
        }
        Some(expected) if *expected == spec => Ok(()),
        Some(expected) => Err(ConversionError::malformed(
            input,
            format!(
                "串流參數改變：{} Hz/{} 聲道 -> {} Hz/{} 聲道",
                expected.rate,
                expected.channels.count(),
                spec.rate,
                spec.channels.count()
            ),
        )),
    }
}

/// 寫出 16 位元 PCM WAV
pub fn write_wav_i16(output: &Path, audio: &DecodedAudio) -> Result<()> {
    let spec = hound::WavSpec {
        channels: audio.channels,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(output, spec)?;
    for &sample in &audio.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// 寫出無標頭的 16 位元小端序 PCM
pub fn write_raw_i16(output: &Path, samples: &[i16]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(output)?);
    for sample in samples {
        writer.write_all(&sample.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// 依 PCM 參數將 RAW 位元組封裝為 WAV
pub fn raw_to_wav(input: &Path, output: &Path, pcm: &PcmParams) -> Result<()> {
    pcm.validate()?;
    let data = fs::read(input)?;
    let frame_size = pcm.frame_size();
    if data.len() % frame_size != 0 {
        return Err(ConversionError::malformed(
            input,
            format!("資料長度 {} 位元組不是 frame 大小 {} 的倍數", data.len(), frame_size),
        ));
    }

    let spec = hound::WavSpec {
        channels: pcm.channels,
        sample_rate: pcm.sample_rate,
        bits_per_sample: pcm.bits_per_sample(),
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(output, spec)?;
    let width = pcm.sample_width as usize;
    for chunk in data.chunks_exact(width) {
        match width {
            // 8 位元 RAW 為無號數，hound 以有號數寫入後自行偏移
            1 => writer.write_sample((chunk[0] as i16 - 128) as i8)?,
            2 => writer.write_sample(i16::from_le_bytes([chunk[0], chunk[1]]))?,
            3 => writer.write_sample(sign_extend_24(chunk))?,
            _ => writer.write_sample(i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))?,
        }
    }
    writer.finalize()?;
    Ok(())
}

/// 讀取 WAV 並以原始樣本寬度輸出無標頭 PCM
pub fn wav_to_raw(input: &Path, output: &Path) -> Result<hound::WavSpec> {
    let mut reader = hound::WavReader::open(input)?;
    let spec = reader.spec();
    let mut writer = BufWriter::new(File::create(output)?);

    match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Float, _) => {
            for sample in reader.samples::<f32>() {
                writer.write_all(&sample?.to_le_bytes())?;
            }
        }
        (hound::SampleFormat::Int, 8) => {
            for sample in reader.samples::<i8>() {
                writer.write_all(&[(sample? as i16 + 128) as u8])?;
            }
        }
        (hound::SampleFormat::Int, 16) => {
            for sample in reader.samples::<i16>() {
                writer.write_all(&sample?.to_le_bytes())?;
            }
        }
        (hound::SampleFormat::Int, 24) => {
            for sample in reader.samples::<i32>() {
                writer.write_all(&sample?.to_le_bytes()[..3])?;
            }
        }
        (hound::SampleFormat::Int, 32) => {
            for sample in reader.samples::<i32>() {
                writer.write_all(&sample?.to_le_bytes())?;
            }
        }
        (_, bits) => {
            return Err(ConversionError::malformed(input, format!("不支援的樣本位元數 {}", bits)));
        }
    }
    writer.flush()?;
    Ok(spec)
}

fn sign_extend_24(bytes: &[u8]) -> i32 {
    let value = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0]);
    (value << 8) >> 8
}

#[cfg(test)]
mod tests {
    use super::*;
    use symphonia::core::audio::Channels;
    use tempfile::TempDir;

    #[test]
    fn test_sign_extend_24() {
        assert_eq!(sign_extend_24(&[0xff, 0xff, 0xff]), -1);
        assert_eq!(sign_extend_24(&[0x01, 0x00, 0x00]), 1);
        assert_eq!(sign_extend_24(&[0x00, 0x00, 0x80]), -8_388_608);
    }

    #[test]
    fn test_raw_with_partial_frame_is_rejected() {
        let dir = TempDir::new().unwrap();
        let raw = dir.path().join("odd.raw");
        fs::write(&raw, [0u8; 7]).unwrap();
        let err = raw_to_wav(&raw, &dir.path().join("odd.wav"), &PcmParams::default()).unwrap_err();
        assert!(matches!(err, ConversionError::Malformed { .. }));
    }

    #[test]
    fn test_eight_bit_raw_survives_wav_round_trip() {
        let dir = TempDir::new().unwrap();
        let raw = dir.path().join("u8.raw");
        let bytes: Vec<u8> = vec![0, 64, 128, 200, 255, 1];
        fs::write(&raw, &bytes).unwrap();

        let pcm = PcmParams { sample_rate: 8000, channels: 1, sample_width: 1 };
        let wav = dir.path().join("u8.wav");
        raw_to_wav(&raw, &wav, &pcm).unwrap();

        let back = dir.path().join("back.raw");
        let spec = wav_to_raw(&wav, &back).unwrap();
        assert_eq!(spec.bits_per_sample, 8);
        assert_eq!(fs::read(&back).unwrap(), bytes);
    }

    #[test]
    fn test_stream_spec_change_is_rejected() {
        let stereo = Channels::FRONT_LEFT | Channels::FRONT_RIGHT;
        let mut first = None;
        let input = Path::new("song.mp3");
        check_stream_spec(&mut first, SignalSpec::new(44100, stereo), input).unwrap();
        check_stream_spec(&mut first, SignalSpec::new(44100, stereo), input).unwrap();

        let err = check_stream_spec(&mut first, SignalSpec::new(48000, stereo), input).unwrap_err();
        assert!(matches!(err, ConversionError::Malformed { .. }));
        let err = check_stream_spec(&mut first, SignalSpec::new(44100, Channels::FRONT_LEFT), input).unwrap_err();
        assert!(matches!(err, ConversionError::Malformed { .. }));
    }

    #[test]
    fn test_decoded_audio_duration() {
        let audio = DecodedAudio { sample_rate: 4, channels: 2, samples: vec![0; 16] };
        assert_eq!(audio.frames(), 8);
        assert!((audio.duration_secs() - 2.0).abs() < f64::EPSILON);
    }
}
