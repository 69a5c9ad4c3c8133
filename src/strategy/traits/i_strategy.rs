use crate::error::Result;
use crate::models::conversion::ConversionRequest;

// 轉換策略接口，每個實作綁定一組有序的格式組合
pub trait ConversionStrategy: Send + Sync {
    /// 策略名稱，用於日誌與錯誤訊息
    fn name(&self) -> &'static str;

    /// 將來源轉換為目標格式並寫入 `request.target`
    /// # 參數
    /// - request: 來源檔案（依序）與目標路徑
    /// # 回傳
    /// - 成功時目標檔案已寫入；失敗時目標檔案可能不完整，由呼叫端負責清理
    fn convert(&self, request: &ConversionRequest) -> Result<()>;
}
