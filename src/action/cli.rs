use std::path::PathBuf;
use std::time::Duration;
use clap::Parser;
use crate::action::interactive::process_interactive_mode;
use crate::config::config::{validate_file_patterns, validate_input_path, Cli};
use crate::config::ports::{AppConfig, ConfigPort, ConversionPort};
use crate::config::settings::{ConverterSettings, ExternalTool, PcmParams};
use crate::error::{ConversionError, Result};
use crate::service::config_service::ConfigService;
use crate::service::conversion_service::ConversionAdapter;
use crate::strategy::registry::StrategyRegistry;
use crate::utils::utils::setup_logging;

/// 依參數選擇模式；沒有任何參數時進入互動模式。`--list` 時回傳 None
pub fn process_args(args: Vec<String>) -> Result<Option<PathBuf>> {
    if args.len() == 1 {
        process_interactive_mode().map(Some)
    } else {
        process_cli_mode(args)
    }
}

pub fn process_cli_mode(args: Vec<String>) -> Result<Option<PathBuf>> {
    let cli = Cli::parse_from(args);
    setup_logging(&cli.log_level)?;

    if cli.list {
        print!("{}", supported_pairs_listing());
        return Ok(None);
    }

    let config_service = ConfigService::new(Box::new(CliConfigAdapter::new(cli.clone())));
    let config = config_service.get_config()?;

    if cli.show_config {
        println!("實際使用的配置：{:#?}", config);
    }

    let conversion_port: Box<dyn ConversionPort> = Box::new(ConversionAdapter);
    conversion_port.execute(config).map(Some)
}

/// 每行一個支援的組合，例如 `docx -> pdf  (DocxToPdf)`
pub fn supported_pairs_listing() -> String {
    StrategyRegistry::default()
        .supported_pairs()
        .iter()
        .map(|(pair, kind)| format!("{:<14} ({})\n", pair.to_string(), kind))
        .collect()
}

// CLI 配置適配器
pub struct CliConfigAdapter {
    cli: Cli,
}

impl CliConfigAdapter {
    pub fn new(cli: Cli) -> Self {
        CliConfigAdapter { cli }
    }

    fn settings(&self) -> ConverterSettings {
        ConverterSettings {
            process_timeout: Duration::from_secs(self.cli.timeout),
            pcm: PcmParams {
                sample_rate: self.cli.sample_rate,
                channels: self.cli.channels,
                sample_width: self.cli.sample_width,
            },
            jpeg_quality: self.cli.jpeg_quality,
            office: ExternalTool::new(self.cli.office_bin.clone()),
            ffmpeg: ExternalTool::new(self.cli.ffmpeg_bin.clone()),
        }
    }
}

impl ConfigPort for CliConfigAdapter {
    fn get_config(&self) -> Result<AppConfig> {
        if self.cli.inputs.is_empty() {
            return Err(ConversionError::config("請指定至少一個輸入路徑"));
        }
        let output = self
            .cli
            .output
            .clone()
            .ok_or_else(|| ConversionError::config("請以 -o/--output 指定輸出路徑"))?;

        // 驗證輸入路徑
        for input in &self.cli.inputs {
            validate_input_path(input)?;
        }
        // 驗證檔案模式
        validate_file_patterns(&self.cli.include, &self.cli.exclude)?;

        if !self.cli.batch && (self.cli.max_size.is_some() || self.cli.jobs.is_some()) {
            log::warn!("--max-size 與 --jobs 只在批次模式下生效");
        }

        Ok(AppConfig {
            sources: self.cli.inputs.clone(),
            output,
            from: self.cli.from,
            to: self.cli.to,
            batch: self.cli.batch,
            include: self.cli.include.clone(),
            exclude: self.cli.exclude.clone(),
            max_size: self.cli.max_size,
            jobs: self.cli.jobs,
            no_progress: self.cli.no_progress,
            log_level: self.cli.log_level.clone(),
            settings: self.settings(),
        })
    }
}
