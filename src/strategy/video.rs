use std::ffi::OsString;
use crate::config::settings::ExternalTool;
use crate::error::Result;
use crate::models::conversion::ConversionRequest;
use crate::strategy::audio::encode_mp3;
use crate::strategy::traits::i_strategy::ConversionStrategy;

/// 擷取 MP4 的音訊串流並輸出 MP3
pub struct Mp4ToMp3Strategy {
    ffmpeg: ExternalTool,
}

impl Mp4ToMp3Strategy {
    pub fn new(ffmpeg: ExternalTool) -> Self {
        Mp4ToMp3Strategy { ffmpeg }
    }
}

impl ConversionStrategy for Mp4ToMp3Strategy {
    fn name(&self) -> &'static str {
        "Mp4ToMp3"
    }

    fn convert(&self, request: &ConversionRequest) -> Result<()> {
        let source = request.single_source(self.name())?;
        let input_args = vec![OsString::from("-i"), source.as_os_str().to_os_string()];
        encode_mp3(&self.ffmpeg, input_args, &request.target)
    }
}
