mod common;

use std::fs;
use std::path::{Path, PathBuf};
use file_converter::config::settings::{ConverterSettings, PcmParams};
use file_converter::{ConversionError, ConversionRequest, StrategyKind, StrategyRegistry};
use tempfile::TempDir;

use common::{ffmpeg_with_mp3, wav_duration, write_sine_wav};

#[test]
fn test_raw_to_wav_default_header() {
    let temp = TempDir::new().unwrap();
    let raw = temp.path().join("tone.raw");
    fs::write(&raw, vec![0u8; 44100 * 4]).unwrap();
    let wav = temp.path().join("tone.wav");

    let kind = StrategyRegistry::default()
        .convert(&ConversionRequest::new(&raw, &wav))
        .unwrap();
    assert_eq!(kind, StrategyKind::RawToWav);

    let spec = hound::WavReader::open(&wav).unwrap().spec();
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.bits_per_sample, 16);
    assert!((wav_duration(&wav) - 1.0).abs() < 1e-9);
}

#[test]
fn test_raw_with_custom_parameters() {
    let temp = TempDir::new().unwrap();
    let raw = temp.path().join("mono.pcm");
    fs::write(&raw, vec![0u8; 8000 * 3]).unwrap();
    let wav = temp.path().join("mono.wav");

    let settings = ConverterSettings {
        pcm: PcmParams { sample_rate: 8000, channels: 1, sample_width: 3 },
        ..ConverterSettings::default()
    };
    StrategyRegistry::new(settings)
        .convert(&ConversionRequest::new(&raw, &wav))
        .unwrap();

    let spec = hound::WavReader::open(&wav).unwrap().spec();
    assert_eq!((spec.sample_rate, spec.channels, spec.bits_per_sample), (8000, 1, 24));
    assert!((wav_duration(&wav) - 1.0).abs() < 1e-9);
}

#[test]
fn test_raw_length_must_match_frame_size() {
    let temp = TempDir::new().unwrap();
    let raw = temp.path().join("odd.raw");
    fs::write(&raw, vec![0u8; 1001]).unwrap();

    let err = StrategyRegistry::default()
        .convert(&ConversionRequest::new(&raw, temp.path().join("odd.wav")))
        .unwrap_err();
    assert!(matches!(err, ConversionError::Malformed { .. }));
    assert_eq!(err.exit_code(), 6);
}

#[test]
fn test_wav_raw_wav_preserves_duration() {
    let temp = TempDir::new().unwrap();
    let wav = temp.path().join("sine.wav");
    write_sine_wav(&wav, 44100, 2, 0.75);
    let raw = temp.path().join("sine.raw");
    let back = temp.path().join("back.wav");

    let registry = StrategyRegistry::default();
    registry.convert(&ConversionRequest::new(&wav, &raw)).unwrap();
    assert_eq!(fs::metadata(&raw).unwrap().len(), (44100.0 * 0.75) as u64 * 4);
    registry.convert(&ConversionRequest::new(&raw, &back)).unwrap();

    assert!((wav_duration(&wav) - wav_duration(&back)).abs() < 1e-6);
    let original: Vec<i16> = hound::WavReader::open(&wav).unwrap().samples::<i16>().map(|s| s.unwrap()).collect();
    let restored: Vec<i16> = hound::WavReader::open(&back).unwrap().samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(original, restored);
}

#[test]
fn test_missing_ffmpeg_is_spawn_error() {
    let temp = TempDir::new().unwrap();
    let wav = temp.path().join("sine.wav");
    write_sine_wav(&wav, 8000, 1, 0.1);

    let mut settings = ConverterSettings::default();
    settings.ffmpeg.program = "no-such-ffmpeg-binary".to_string();
    let err = StrategyRegistry::new(settings)
        .convert(&ConversionRequest::new(&wav, temp.path().join("sine.mp3")))
        .unwrap_err();
    assert!(matches!(err, ConversionError::Spawn { .. }));
    assert_eq!(err.exit_code(), 4);
}

/// 39 個 MPEG-1 Layer III frame（44.1 kHz、立體聲、靜音）
fn mp3_fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/silence_44k_stereo.mp3")
}

#[test]
fn test_mp3_fixture_decodes_to_wav_and_raw() {
    let temp = TempDir::new().unwrap();
    let mp3 = mp3_fixture();
    let wav = temp.path().join("decoded.wav");
    let raw = temp.path().join("decoded.raw");

    let registry = StrategyRegistry::default();
    assert_eq!(registry.convert(&ConversionRequest::new(&mp3, &wav)).unwrap(), StrategyKind::Mp3ToWav);
    assert_eq!(registry.convert(&ConversionRequest::new(&mp3, &raw)).unwrap(), StrategyKind::Mp3ToRaw);

    let reader = hound::WavReader::open(&wav).unwrap();
    let spec = reader.spec();
    assert_eq!((spec.sample_rate, spec.channels, spec.bits_per_sample), (44100, 2, 16));
    let duration = wav_duration(&wav);
    assert!(duration > 0.9 && duration < 1.1, "duration {duration}");
    assert_eq!(fs::metadata(&raw).unwrap().len() / 4, reader.duration() as u64);

    let wav_samples: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
    let raw_samples: Vec<i16> = fs::read(&raw)
        .unwrap()
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect();
    assert_eq!(raw_samples, wav_samples);
}

#[test]
fn test_truncated_mp3_is_codec_error() {
    let temp = TempDir::new().unwrap();
    let mp3 = temp.path().join("broken.mp3");
    fs::write(&mp3, b"not an mp3 stream").unwrap();

    let err = StrategyRegistry::default()
        .convert(&ConversionRequest::new(&mp3, temp.path().join("broken.wav")))
        .unwrap_err();
    assert_eq!(err.exit_code(), 6);
}

#[test]
fn test_wav_and_raw_encode_to_mp3() {
    if !ffmpeg_with_mp3() {
        eprintln!("略過：找不到支援 libmp3lame 的 ffmpeg");
        return;
    }
    let temp = TempDir::new().unwrap();
    let wav = temp.path().join("sine.wav");
    write_sine_wav(&wav, 44100, 2, 1.0);
    let raw = temp.path().join("sine.raw");
    let from_wav = temp.path().join("from_wav.mp3");
    let from_raw = temp.path().join("from_raw.mp3");
    let decoded = temp.path().join("decoded.wav");

    let registry = StrategyRegistry::default();
    registry.convert(&ConversionRequest::new(&wav, &raw)).unwrap();
    assert_eq!(registry.convert(&ConversionRequest::new(&wav, &from_wav)).unwrap(), StrategyKind::WavToMp3);
    assert_eq!(registry.convert(&ConversionRequest::new(&raw, &from_raw)).unwrap(), StrategyKind::RawToMp3);

    // 編碼器會補上前後的靜音 frame
    registry.convert(&ConversionRequest::new(&from_wav, &decoded)).unwrap();
    assert!((wav_duration(&decoded) - 1.0).abs() < 0.15);
    assert!(fs::metadata(&from_raw).unwrap().len() > 0);
}

#[test]
fn test_mp4_audio_extraction() {
    if !ffmpeg_with_mp3() {
        eprintln!("略過：找不到支援 libmp3lame 的 ffmpeg");
        return;
    }
    let temp = TempDir::new().unwrap();
    let mp4 = temp.path().join("clip.mp4");
    let status = std::process::Command::new("ffmpeg")
        .args(["-y", "-hide_banner", "-loglevel", "error", "-f", "lavfi", "-i", "sine=frequency=440:duration=1"])
        .arg(&mp4)
        .status()
        .unwrap();
    if !status.success() {
        eprintln!("略過：ffmpeg 無法產生 MP4 測試檔");
        return;
    }
    let mp3 = temp.path().join("clip.mp3");
    let wav = temp.path().join("clip.wav");

    let registry = StrategyRegistry::default();
    assert_eq!(registry.convert(&ConversionRequest::new(&mp4, &mp3)).unwrap(), StrategyKind::Mp4ToMp3);
    registry.convert(&ConversionRequest::new(&mp3, &wav)).unwrap();
    assert!((wav_duration(&wav) - 1.0).abs() < 0.15);
}
