use file_converter::action::cli::process_args;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    match process_args(args) {
        Ok(Some(output)) => {
            log::info!("程式執行完成，輸出：{}", output.display());
            println!("轉換完成！輸出檔案位於：{}", output.display());
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("轉換失敗：{}", e);
            eprintln!("錯誤：{}", e);
            std::process::exit(e.exit_code());
        }
    }
}
