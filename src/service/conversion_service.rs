use std::path::PathBuf;
use log::warn;
use crate::config::ports::{AppConfig, ConversionPort};
use crate::error::{ConversionError, Result};
use crate::facade::conversion_facade::ConversionFacade;
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::batch::BatchInput;
use crate::models::conversion::ConversionInput;
use crate::service::file::FileService;
use crate::strategy::registry::StrategyRegistry;

// 轉換執行適配器，依配置呼叫 Facade
pub struct ConversionAdapter;

impl ConversionAdapter {
    fn build_facade(config: &AppConfig) -> ConversionFacade {
        ConversionFacade::new(
            StrategyRegistry::new(config.settings.clone()),
            Box::new(FileService::new()),
        )
    }
}

/// 由配置產生批次輸入；批次模式需要單一來源目錄與 --to
pub fn batch_input(config: &AppConfig) -> Result<BatchInput> {
    let input_dir = match config.sources.as_slice() {
        [dir] => dir.clone(),
        other => {
            return Err(ConversionError::config(format!(
                "批次模式需要一個來源目錄，實際為 {} 個",
                other.len()
            )))
        }
    };
    let to = config
        .to
        .ok_or_else(|| ConversionError::config("批次模式需要指定 --to"))?;
    if config.from.is_some() {
        warn!("批次模式依副檔名判斷來源格式，忽略 --from");
    }
    Ok(BatchInput {
        input_dir,
        output_dir: config.output.clone(),
        to,
        include: config.include.clone(),
        exclude: config.exclude.clone(),
        max_size: config.max_size,
        jobs: config.jobs,
        no_progress: config.no_progress,
    })
}

impl ConversionPort for ConversionAdapter {
    fn execute(&self, config: AppConfig) -> Result<PathBuf> {
        let facade = Self::build_facade(&config);
        if config.batch {
            let output = facade.execute_batch(batch_input(&config)?)?;
            for (path, reason) in &output.failed {
                println!("失敗：{}（{}）", path.display(), reason);
            }
            println!(
                "成功 {} 個，失敗 {} 個，跳過 {} 個",
                output.converted.len(),
                output.failed.len(),
                output.skipped.len()
            );
            Ok(config.output)
        } else {
            let output = facade.execute_conversion(ConversionInput {
                sources: config.sources,
                target: config.output,
                from: config.from,
                to: config.to,
            })?;
            Ok(output.output_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ports::ConfigPort;
    use crate::models::format::Format;
    use crate::service::config_service::DefaultConfigAdapter;

    fn config(sources: &[&str]) -> AppConfig {
        DefaultConfigAdapter::new(
            sources.iter().map(PathBuf::from).collect(),
            PathBuf::from("out"),
        )
        .get_config()
        .unwrap()
    }

    #[test]
    fn test_batch_requires_target_format() {
        let mut config = config(&["in"]);
        config.batch = true;
        assert!(matches!(batch_input(&config), Err(ConversionError::Config(_))));

        config.to = Some(Format::Wav);
        let input = batch_input(&config).unwrap();
        assert_eq!(input.input_dir, PathBuf::from("in"));
        assert_eq!(input.to, Format::Wav);
    }

    #[test]
    fn test_batch_rejects_multiple_sources() {
        let mut config = config(&["a", "b"]);
        config.to = Some(Format::Wav);
        assert!(batch_input(&config).is_err());
    }
}
