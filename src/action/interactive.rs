use dialoguer::{Confirm, Input, Select};
use std::fmt::Display;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::config::validate_file_patterns;
use crate::config::ports::{AppConfig, ConfigPort, ConversionPort};
use crate::config::settings::ConverterSettings;
use crate::error::{ConversionError, Result};
use crate::models::format::Format;
use crate::service::config_service::{ConfigService, DefaultConfigAdapter};
use crate::service::conversion_service::ConversionAdapter;
use crate::utils::utils::setup_logging;

const LOG_LEVELS: [&str; 4] = ["info", "warn", "error", "debug"];

fn prompt_error(context: &str, e: impl Display) -> ConversionError {
    ConversionError::Io(io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, e)))
}

pub fn process_interactive_mode() -> Result<PathBuf> {
    println!("=== 歡迎使用互動模式 ===");
    let use_default_config = get_default_config_option()?;
    let sources = get_input_paths()?;
    let output = get_output_path()?;

    let config_port: Box<dyn ConfigPort> = if use_default_config {
        setup_logging("info")?;
        println!("使用預設配置：依副檔名判斷格式，單檔轉換");
        Box::new(DefaultConfigAdapter::new(sources, output))
    } else {
        Box::new(InteractiveConfigAdapter::new(sources, output))
    };

    let config = ConfigService::new(config_port).get_config()?;
    println!("實際使用的配置：{:#?}", config);
    ConversionAdapter.execute(config)
}

pub fn get_default_config_option() -> Result<bool> {
    Confirm::new()
        .with_prompt("是否使用預設配置？（依副檔名判斷格式，僅需指定輸入和輸出路徑）")
        .default(true)
        .interact()
        .map_err(|e| prompt_error("預設配置選擇失敗", e))
}

/// 以逗號分隔多個輸入；多張圖片可合併為一個 PDF
pub fn get_input_paths() -> Result<Vec<PathBuf>> {
    let raw: String = Input::new()
        .with_prompt("請輸入檔案或目錄路徑，多個以逗號分隔（例如：./a.png,./b.png）")
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            match split_list(input).iter().find(|p| !Path::new(p.as_str()).exists()) {
                Some(missing) => Err(format!("路徑 '{}' 不存在", missing)),
                None if split_list(input).is_empty() => Err("請至少輸入一個路徑".to_string()),
                None => Ok(()),
            }
        })
        .interact_text()
        .map_err(|e| prompt_error("輸入路徑失敗", e))?;
    Ok(split_list(&raw).into_iter().map(PathBuf::from).collect())
}

pub fn get_output_path() -> Result<PathBuf> {
    let output: String = Input::new()
        .with_prompt("輸入目標檔案（批次模式下為輸出目錄，例如：./out.pdf）")
        .interact_text()
        .map_err(|e| prompt_error("輸出路徑輸入失敗", e))?;
    Ok(PathBuf::from(output.trim()))
}

pub fn get_batch_option() -> Result<bool> {
    Confirm::new()
        .with_prompt("是否批次轉換整個目錄？")
        .default(false)
        .interact()
        .map_err(|e| prompt_error("批次模式選擇失敗", e))
}

/// 選擇格式；`allow_infer` 時第一個選項為依副檔名判斷
pub fn get_format(prompt: &str, allow_infer: bool) -> Result<Option<Format>> {
    let mut items: Vec<String> = Vec::new();
    if allow_infer {
        items.push("依副檔名判斷".to_string());
    }
    items.extend(Format::ALL.iter().map(|f| f.to_string()));

    let index = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()
        .map_err(|e| prompt_error("格式選擇失敗", e))?;

    Ok(match (allow_infer, index) {
        (true, 0) => None,
        (true, i) => Format::ALL.get(i - 1).copied(),
        (false, i) => Format::ALL.get(i).copied(),
    })
}

pub fn get_file_patterns() -> Result<(Vec<String>, Option<Vec<String>>)> {
    let include: String = Input::new()
        .with_prompt("輸入包含模式（例如：*.wav,*.raw，預設為 *）")
        .default("*".to_string())
        .interact_text()
        .map_err(|e| prompt_error("包含模式輸入失敗", e))?;

    let exclude: String = Input::new()
        .with_prompt("輸入排除模式（例如：draft*，預設為空）")
        .default("".to_string())
        .allow_empty(true)
        .interact_text()
        .map_err(|e| prompt_error("排除模式輸入失敗", e))?;

    let include = split_list(&include);
    let exclude = split_list(&exclude);
    Ok((
        if include.is_empty() { vec!["*".to_string()] } else { include },
        if exclude.is_empty() { None } else { Some(exclude) },
    ))
}

pub fn get_log_level_option() -> Result<String> {
    let index = Select::new()
        .with_prompt("選擇日誌等級")
        .items(&LOG_LEVELS)
        .default(0)
        .interact()
        .map_err(|e| prompt_error("日誌等級選擇失敗", e))?;
    Ok(LOG_LEVELS[index].to_string())
}

pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// 交互配置適配器
pub struct InteractiveConfigAdapter {
    sources: Vec<PathBuf>,
    output: PathBuf,
}

impl InteractiveConfigAdapter {
    pub fn new(sources: Vec<PathBuf>, output: PathBuf) -> Self {
        InteractiveConfigAdapter { sources, output }
    }
}

impl ConfigPort for InteractiveConfigAdapter {
    fn get_config(&self) -> Result<AppConfig> {
        let batch = get_batch_option()?;
        let (from, to, include, exclude) = if batch {
            let to = get_format("選擇目標格式", false)?;
            let (include, exclude) = get_file_patterns()?;
            validate_file_patterns(&include, &exclude)?;
            (None, to, include, exclude)
        } else {
            let from = get_format("選擇來源格式", true)?;
            let to = get_format("選擇目標格式", true)?;
            (from, to, vec!["*".to_string()], None)
        };
        let log_level = get_log_level_option()?;

        setup_logging(&log_level)?;

        Ok(AppConfig {
            sources: self.sources.clone(),
            output: self.output.clone(),
            from,
            to,
            batch,
            include,
            exclude,
            max_size: None,
            jobs: None,
            no_progress: false,
            log_level,
            settings: ConverterSettings::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_drops_empty() {
        assert_eq!(split_list(" a.png, ,b.png,"), vec!["a.png".to_string(), "b.png".to_string()]);
        assert!(split_list("").is_empty());
    }
}
