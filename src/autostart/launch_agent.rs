use super::AutoStart;
use crate::constants::{AUTOSTART_LAUNCH_AGENT_LABEL, MINIMIZED_FLAG};
use crate::error::AutoStartError;
use log::info;
use std::fs;
use std::path::PathBuf;

/// macOS LaunchAgent (`~/Library/LaunchAgents/<label>.plist`)
///
/// launchd picks the plist up at next login; nothing is loaded into the
/// current session.
#[derive(Debug, Clone)]
pub struct LaunchAgentAutoStart {
    agents_dir: PathBuf,
    exe: PathBuf,
}

impl LaunchAgentAutoStart {
    pub fn new(agents_dir: impl Into<PathBuf>, exe: impl Into<PathBuf>) -> Self {
        Self {
            agents_dir: agents_dir.into(),
            exe: exe.into(),
        }
    }

    pub fn for_user(exe: PathBuf) -> Result<Self, AutoStartError> {
        let home = dirs::home_dir().ok_or_else(|| AutoStartError::Command {
            command: "dirs::home_dir".to_string(),
            message: "no home directory".to_string(),
        })?;
        Ok(Self::new(home.join("Library").join("LaunchAgents"), exe))
    }

    pub fn plist_path(&self) -> PathBuf {
        self.agents_dir
            .join(format!("{}.plist", AUTOSTART_LAUNCH_AGENT_LABEL))
    }

    pub fn render(&self) -> String {
        let exe = xml_escape(&self.exe.display().to_string());
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>{label}</string>
    <key>ProgramArguments</key>
    <array>
        <string>{exe}</string>
        <string>{flag}</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
    <key>ProcessType</key>
    <string>Interactive</string>
</dict>
</plist>
"#,
            label = AUTOSTART_LAUNCH_AGENT_LABEL,
            exe = exe,
            flag = MINIMIZED_FLAG
        )
    }
}

fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl AutoStart for LaunchAgentAutoStart {
    fn enable(&self) -> Result<(), AutoStartError> {
        fs::create_dir_all(&self.agents_dir).map_err(|source| AutoStartError::Io {
            path: self.agents_dir.clone(),
            source,
        })?;
        let path = self.plist_path();
        fs::write(&path, self.render()).map_err(|source| AutoStartError::Io {
            path: path.clone(),
            source,
        })?;
        info!("Auto-start enabled: {}", path.display());
        Ok(())
    }

    fn disable(&self) -> Result<(), AutoStartError> {
        let path = self.plist_path();
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(&path).map_err(|source| AutoStartError::Io {
            path: path.clone(),
            source,
        })?;
        info!("Auto-start disabled: removed {}", path.display());
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.plist_path().is_file()
    }

    fn location(&self) -> String {
        self.plist_path().display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("/Apps/A&B <x>.app"), "/Apps/A&amp;B &lt;x&gt;.app");
    }
}
