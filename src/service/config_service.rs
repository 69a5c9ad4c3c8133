use std::path::PathBuf;
use crate::config::ports::{AppConfig, ConfigPort};
use crate::config::settings::ConverterSettings;
use crate::error::Result;

// 配置服務，負責選擇適當的配置適配器
pub struct ConfigService {
    config_port: Box<dyn ConfigPort>,
}

impl ConfigService {
    pub fn new(config_port: Box<dyn ConfigPort>) -> Self {
        ConfigService { config_port }
    }

    pub fn get_config(&self) -> Result<AppConfig> {
        let config = self.config_port.get_config()?;
        config.settings.validate()?;
        Ok(config)
    }
}

// 預設配置適配器：單檔轉換，格式由副檔名推斷
pub struct DefaultConfigAdapter {
    sources: Vec<PathBuf>,
    output: PathBuf,
}

impl DefaultConfigAdapter {
    pub fn new(sources: Vec<PathBuf>, output: PathBuf) -> Self {
        DefaultConfigAdapter { sources, output }
    }
}

impl ConfigPort for DefaultConfigAdapter {
    fn get_config(&self) -> Result<AppConfig> {
        Ok(AppConfig {
            sources: self.sources.clone(),
            output: self.output.clone(),
            from: None,
            to: None,
            batch: false,
            include: vec!["*".to_string()],
            exclude: None,
            max_size: None,
            jobs: None,
            no_progress: false,
            log_level: "info".to_string(),
            settings: ConverterSettings::default(),
        })
    }
}
