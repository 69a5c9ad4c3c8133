use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use log::{error, info, warn};
use pathdiff::diff_paths;
use rayon::prelude::*;
use crate::error::{ConversionError, Result};
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::batch::{BatchInput, BatchOutput, FileCollectInput};
use crate::models::conversion::{ConversionInput, ConversionOutput, ConversionRequest};
use crate::models::format::{Format, FormatPair};
use crate::service::traits::i_service::FileServiceTrait;
use crate::strategy::registry::{StrategyKind, StrategyRegistry};
use crate::utils::utils::{format_file_size, ProgressManager};

pub struct ConversionFacade {
    registry: StrategyRegistry,
    file_service: Box<dyn FileServiceTrait>,
}

impl ConversionFacade {
    pub fn new(registry: StrategyRegistry, file_service: Box<dyn FileServiceTrait>) -> Self {
        ConversionFacade {
            registry,
            file_service,
        }
    }
}

/// 建立目標所在的目錄
fn ensure_parent_dir(target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// 批次模式的輸出路徑：保留相對目錄結構，副檔名換成目標格式
pub fn mirrored_target(file: &Path, input_dir: &Path, output_dir: &Path, to: Format) -> PathBuf {
    let relative = diff_paths(file, input_dir)
        .or_else(|| file.file_name().map(PathBuf::from))
        .unwrap_or_else(|| file.to_path_buf());
    output_dir.join(relative).with_extension(to.extension())
}

impl ConversionFacadeTrait for ConversionFacade {
    fn execute_conversion(&self, input: ConversionInput) -> Result<ConversionOutput> {
        let request = ConversionRequest::multi(input.sources, input.target);
        let pair = self.registry.infer_pair(&request, input.from, input.to)?;

        ensure_parent_dir(&request.target)?;
        info!(
            "開始轉換（{}），來源 {} 個，輸出：{}",
            pair,
            request.sources.len(),
            request.target.display()
        );
        let strategy = self.registry.convert_pair(&request, pair)?;

        let output_size = fs::metadata(&request.target)?.len();
        info!("轉換完成，策略 {}，輸出大小 {}", strategy, format_file_size(output_size));
        Ok(ConversionOutput {
            output_path: request.target,
            pair,
            strategy,
            output_size,
        })
    }

    fn execute_batch(&self, input: BatchInput) -> Result<BatchOutput> {
        if !input.input_dir.is_dir() {
            return Err(ConversionError::config(format!(
                "批次模式的輸入必須是目錄：{}",
                input.input_dir.display()
            )));
        }

        let collected = self.file_service.collect_files(FileCollectInput {
            input_path: input.input_dir.clone(),
            include_patterns: input.include.clone(),
            exclude_patterns: input.exclude.clone(),
            max_size: input.max_size,
        })?;
        info!(
            "開始批次轉換，輸入目錄：{}，輸出目錄：{}，共 {} 個檔案（{}）",
            input.input_dir.display(),
            input.output_dir.display(),
            collected.files.len(),
            format_file_size(collected.total_size)
        );

        let mut output = BatchOutput::default();
        let mut planned: Vec<(PathBuf, PathBuf, FormatPair)> = Vec::new();
        // 輸出路徑 -> 最先佔用的來源
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
        for file in collected.files {
            let pair = match Format::from_path(&file) {
                Ok(from) => FormatPair::new(from, input.to),
                Err(_) => {
                    warn!("無法判斷格式，跳過：{}", file.display());
                    output.skipped.push(file);
                    continue;
                }
            };
            if StrategyKind::lookup(pair).is_none() {
                warn!("不支援 {}，跳過：{}", pair, file.display());
                output.skipped.push(file);
                continue;
            }
            let target = mirrored_target(&file, &input.input_dir, &input.output_dir, input.to);
            if let Some(first) = claimed.get(&target) {
                let reason = format!("輸出路徑 {} 已由 {} 使用", target.display(), first.display());
                warn!("{}，不轉換：{}", reason, file.display());
                output.failed.push((file, reason));
                continue;
            }
            claimed.insert(target.clone(), file.clone());
            planned.push((file, target, pair));
        }

        if planned.is_empty() {
            warn!("無符合條件的檔案可處理");
            return Ok(output);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(input.jobs.unwrap_or(0))
            .build()
            .map_err(|e| ConversionError::config(format!("無法建立執行緒池: {}", e)))?;
        let progress = ProgressManager::new(planned.len() as u64, input.no_progress);

        let results: Vec<(PathBuf, PathBuf, Result<StrategyKind>)> = pool.install(|| {
            planned
                .into_par_iter()
                .map(|(source, target, pair)| {
                    let request = ConversionRequest::new(source.clone(), target.clone());
                    let result = ensure_parent_dir(&target)
                        .and_then(|_| self.registry.convert_pair(&request, pair));
                    progress.advance("轉換中");
                    (source, target, result)
                })
                .collect()
        });

        for (source, target, result) in results {
            match result {
                Ok(_) => output.converted.push(target),
                Err(e) => {
                    error!("轉換失敗：{}：{}", source.display(), e);
                    output.failed.push((source, e.to_string()));
                }
            }
        }
        progress.finish(output.converted.len(), output.failed.len(), output.skipped.len());
        info!(
            "批次轉換結束，成功 {} 個，失敗 {} 個，跳過 {} 個",
            output.converted.len(),
            output.failed.len(),
            output.skipped.len()
        );
        Ok(output)
    }
}
