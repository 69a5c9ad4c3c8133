use crate::error::Result;
use crate::models::batch::{FileCollectInput, FileCollectOutput};

// File 服務接口，負責批次模式的檔案收集
pub trait FileServiceTrait: Send + Sync {
    /// 收集符合條件的檔案
    /// # 參數
    /// - input: 檔案收集的輸入參數
    /// # 回傳
    /// - 成功時返回收集的檔案列表和總大小，失敗時返回轉換錯誤
    fn collect_files(&self, input: FileCollectInput) -> Result<FileCollectOutput>;
}
