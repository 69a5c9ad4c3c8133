use std::fs;
use std::path::Path;
use log::{debug, warn};
use regex::RegexSet;
use walkdir::WalkDir;
use crate::error::Result;
use crate::models::batch::{FileCollectInput, FileCollectOutput};
use crate::service::traits::i_service::FileServiceTrait;
use crate::utils::utils::create_regex_sets;

const BYTES_PER_MB: f64 = 1_048_576.0;

pub struct FileService;

impl FileService {
    pub fn new() -> Self {
        FileService
    }
}

impl Default for FileService {
    fn default() -> Self {
        FileService::new()
    }
}

/// 檢查檔名是否符合包含／排除模式與大小限制
pub fn is_file_valid(
    path: &Path,
    include_set: &RegexSet,
    exclude_set: &RegexSet,
    max_size: Option<f64>,
) -> Result<bool> {
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return Ok(false),
    };
    if !include_set.is_match(&name) || exclude_set.is_match(&name) {
        return Ok(false);
    }
    if let Some(max) = max_size {
        let file_size = fs::metadata(path)?.len() as f64 / BYTES_PER_MB;
        if file_size > max {
            warn!("檔案 {} 超過大小限制（{:.2} MB > {} MB），跳過", path.display(), file_size, max);
            return Ok(false);
        }
    }
    Ok(true)
}

impl FileServiceTrait for FileService {
    fn collect_files(&self, input: FileCollectInput) -> Result<FileCollectOutput> {
        let exclude = input.exclude_patterns.unwrap_or_default();
        let (include_set, exclude_set) = create_regex_sets(&input.include_patterns, &exclude)?;

        let mut files = Vec::new();
        let mut total_size = 0u64;
        for entry in WalkDir::new(&input.input_path).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("無法讀取目錄項目：{}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if is_file_valid(path, &include_set, &exclude_set, input.max_size)? {
                total_size += entry.metadata().map(|m| m.len()).unwrap_or(0);
                files.push(path.to_path_buf());
            }
        }

        debug!("收集到 {} 個檔案，共 {} 位元組", files.len(), total_size);
        Ok(FileCollectOutput { files, total_size })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn collect(root: &Path, include: &[&str], exclude: Option<&[&str]>, max_size: Option<f64>) -> FileCollectOutput {
        FileService::new()
            .collect_files(FileCollectInput {
                input_path: root.to_path_buf(),
                include_patterns: include.iter().map(|s| s.to_string()).collect(),
                exclude_patterns: exclude.map(|e| e.iter().map(|s| s.to_string()).collect()),
                max_size,
            })
            .unwrap()
    }

    #[test]
    fn test_collects_recursively_with_filters() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join("a.json"), "{}").unwrap();
        fs::write(nested.join("b.json"), "[]").unwrap();
        fs::write(nested.join("skip.json"), "[]").unwrap();
        fs::write(nested.join("c.txt"), "x").unwrap();

        let output = collect(temp.path(), &["*.json"], Some(&["skip*"]), None);
        let names: Vec<PathBuf> = output
            .files
            .iter()
            .map(|p| p.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(names, vec![PathBuf::from("a.json"), PathBuf::from("nested/b.json")]);
        assert_eq!(output.total_size, 4);
    }

    #[test]
    fn test_max_size_skips_large_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("small.raw"), vec![0u8; 16]).unwrap();
        fs::write(temp.path().join("large.raw"), vec![0u8; 2 * 1024 * 1024]).unwrap();

        let output = collect(temp.path(), &["*"], None, Some(1.0));
        assert_eq!(output.files, vec![temp.path().join("small.raw")]);
    }
}
