use std::ffi::OsString;
use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use log::debug;
use crate::config::settings::ExternalTool;
use crate::error::{ConversionError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 外部程式執行結果
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }

    pub fn has_stderr(&self) -> bool {
        !self.stderr.is_empty()
    }

    /// 結束代碼非 0 時回報錯誤，附上 stderr
    pub fn ensure_success(self, program: &str) -> Result<ProcessOutput> {
        if self.status.success() {
            return Ok(self);
        }
        let stderr = self.stderr_text();
        Err(ConversionError::Process {
            program: program.to_string(),
            stderr: if stderr.is_empty() {
                format!("結束代碼 {:?}", self.status.code())
            } else {
                stderr
            },
        })
    }
}

/// 執行外部程式並擷取輸出，可選擇等待上限
///
/// 逾時時會終止子程序並回傳 `ConversionError::Timeout`。等待上限同時涵蓋
/// 子程序結束後讀取管線的時間：孫程序若仍持有 stdout/stderr，逾時後放棄讀取。
pub fn run_tool(tool: &ExternalTool, args: Vec<OsString>, timeout: Option<Duration>) -> Result<ProcessOutput> {
    let args = tool.command_args(args);
    debug!("執行外部程式：{} {:?}", tool.program, args);

    let mut child = Command::new(&tool.program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ConversionError::Spawn {
            program: tool.program.clone(),
            source,
        })?;

    let stdout_reader = drain(child.stdout.take());
    let stderr_reader = drain(child.stderr.take());

    let start = Instant::now();
    let status = match timeout {
        Some(limit) => wait_with_timeout(&mut child, start, limit, &tool.program)?,
        None => child.wait()?,
    };

    let deadline = timeout.map(|limit| (start, limit));
    Ok(ProcessOutput {
        status,
        stdout: collect(stdout_reader, deadline, &tool.program)?,
        stderr: collect(stderr_reader, deadline, &tool.program)?,
    })
}

fn wait_with_timeout(child: &mut Child, start: Instant, timeout: Duration, program: &str) -> Result<ExitStatus> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ConversionError::Timeout {
                program: program.to_string(),
                timeout,
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

// 以獨立執行緒讀取管線，避免子程序因緩衝區滿而卡住
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<io::Result<Vec<u8>>>> {
    pipe.map(|mut reader| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            reader.read_to_end(&mut buffer)?;
            Ok(buffer)
        })
    })
}

fn collect(
    handle: Option<JoinHandle<io::Result<Vec<u8>>>>,
    deadline: Option<(Instant, Duration)>,
    program: &str,
) -> Result<Vec<u8>> {
    match handle {
        Some(handle) => {
            if let Some((start, timeout)) = deadline {
                while !handle.is_finished() {
                    if start.elapsed() >= timeout {
                        // 讀取執行緒留在背景，待管線關閉後自行結束
                        return Err(ConversionError::Timeout {
                            program: program.to_string(),
                            timeout,
                        });
                    }
                    thread::sleep(POLL_INTERVAL);
                }
            }
            handle
                .join()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "讀取外部程式輸出的執行緒異常結束"))?
                .map_err(ConversionError::from)
        }
        None => Ok(Vec::new()),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> (ExternalTool, Vec<OsString>) {
        (ExternalTool::new("sh"), vec![OsString::from("-c"), OsString::from(script)])
    }

    #[test]
    fn test_captures_stdout_and_stderr() {
        let (tool, args) = sh("echo out; echo err 1>&2");
        let output = run_tool(&tool, args, Some(Duration::from_secs(5))).unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "out");
        assert_eq!(output.stderr_text(), "err");
        assert!(output.has_stderr());
    }

    #[test]
    fn test_timeout_kills_slow_process() {
        let (tool, args) = sh("sleep 5");
        let start = Instant::now();
        let err = run_tool(&tool, args, Some(Duration::from_millis(200))).unwrap_err();
        assert!(matches!(err, ConversionError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_timeout_covers_pipes_held_by_grandchild() {
        let (tool, args) = sh("sleep 5 & echo started");
        let start = Instant::now();
        let err = run_tool(&tool, args, Some(Duration::from_millis(300))).unwrap_err();
        assert!(matches!(err, ConversionError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_whitespace_only_stderr_counts() {
        let (tool, args) = sh("printf '\\n' 1>&2");
        let output = run_tool(&tool, args, Some(Duration::from_secs(5))).unwrap();
        assert!(output.has_stderr());
        assert_eq!(output.stderr_text(), "");
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let tool = ExternalTool::new("definitely-not-a-real-converter-binary");
        let err = run_tool(&tool, Vec::new(), None).unwrap_err();
        assert!(matches!(err, ConversionError::Spawn { .. }));
    }

    #[test]
    fn test_ensure_success_reports_exit_code() {
        let (tool, args) = sh("exit 3");
        let output = run_tool(&tool, args, None).unwrap();
        let err = output.ensure_success("sh").unwrap_err();
        match err {
            ConversionError::Process { stderr, .. } => assert!(stderr.contains('3')),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
