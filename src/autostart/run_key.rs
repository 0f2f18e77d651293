use super::AutoStart;
use crate::constants::{AUTOSTART_RUN_VALUE, MINIMIZED_FLAG};
use crate::error::AutoStartError;
use log::info;
use std::path::PathBuf;
use std::process::{Command, Output};

const RUN_KEY: &str = r"HKCU\Software\Microsoft\Windows\CurrentVersion\Run";

/// Windows `HKCU\...\Run` value, managed through `reg.exe`
#[derive(Debug, Clone)]
pub struct RunKeyAutoStart {
    exe: PathBuf,
}

impl RunKeyAutoStart {
    pub fn new(exe: impl Into<PathBuf>) -> Self {
        Self { exe: exe.into() }
    }

    /// Data stored in the Run value: quoted exe path plus the minimized flag
    pub fn command_line(&self) -> String {
        format!("\"{}\" {}", self.exe.display(), MINIMIZED_FLAG)
    }

    fn reg(args: &[&str]) -> Result<Output, AutoStartError> {
        Command::new("reg")
            .args(args)
            .output()
            .map_err(|e| AutoStartError::Command {
                command: format!("reg {}", args.join(" ")),
                message: e.to_string(),
            })
    }

    fn check(args: &[&str], output: Output) -> Result<(), AutoStartError> {
        if output.status.success() {
            Ok(())
        } else {
            Err(AutoStartError::Command {
                command: format!("reg {}", args.join(" ")),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl AutoStart for RunKeyAutoStart {
    fn enable(&self) -> Result<(), AutoStartError> {
        let data = self.command_line();
        let args = [
            "add",
            RUN_KEY,
            "/v",
            AUTOSTART_RUN_VALUE,
            "/t",
            "REG_SZ",
            "/d",
            data.as_str(),
            "/f",
        ];
        Self::check(&args, Self::reg(&args)?)?;
        info!("Auto-start enabled: {}\\{}", RUN_KEY, AUTOSTART_RUN_VALUE);
        Ok(())
    }

    fn disable(&self) -> Result<(), AutoStartError> {
        if !self.is_enabled() {
            return Ok(());
        }
        let args = ["delete", RUN_KEY, "/v", AUTOSTART_RUN_VALUE, "/f"];
        Self::check(&args, Self::reg(&args)?)?;
        info!("Auto-start disabled: {}\\{}", RUN_KEY, AUTOSTART_RUN_VALUE);
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        Self::reg(&["query", RUN_KEY, "/v", AUTOSTART_RUN_VALUE])
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn location(&self) -> String {
        format!("{}\\{}", RUN_KEY, AUTOSTART_RUN_VALUE)
    }
}
