use crate::error::Result;
use crate::models::batch::{BatchInput, BatchOutput};
use crate::models::conversion::{ConversionInput, ConversionOutput};

// Facade 接口，負責協調檔案轉換流程
pub trait ConversionFacadeTrait: Send + Sync {
    /// 執行單次轉換（單一檔案，或多張圖片合併為 PDF）
    /// # 參數
    /// - input: 來源、目標與可選的格式指定
    /// # 回傳
    /// - 成功時返回輸出路徑、使用的策略與輸出大小，失敗時返回轉換錯誤
    fn execute_conversion(&self, input: ConversionInput) -> Result<ConversionOutput>;

    /// 轉換整個目錄，個別檔案失敗不會中斷批次
    /// # 參數
    /// - input: 來源目錄、輸出目錄、目標格式與篩選條件
    /// # 回傳
    /// - 成功、失敗與跳過的檔案清單；只有整體設定錯誤時才返回錯誤
    fn execute_batch(&self, input: BatchInput) -> Result<BatchOutput>;
}
