use super::AutoStart;
use crate::constants::{AUTOSTART_DESKTOP_FILE, MINIMIZED_FLAG};
use crate::error::AutoStartError;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// XDG autostart entry (`~/.config/autostart/anti-screensaver.desktop`)
#[derive(Debug, Clone)]
pub struct DesktopEntryAutoStart {
    autostart_dir: PathBuf,
    exe: PathBuf,
}

impl DesktopEntryAutoStart {
    pub fn new(autostart_dir: impl Into<PathBuf>, exe: impl Into<PathBuf>) -> Self {
        Self {
            autostart_dir: autostart_dir.into(),
            exe: exe.into(),
        }
    }

    pub fn for_user(exe: PathBuf) -> Result<Self, AutoStartError> {
        let config = dirs::config_dir().ok_or_else(|| AutoStartError::Command {
            command: "dirs::config_dir".to_string(),
            message: "no user configuration directory".to_string(),
        })?;
        Ok(Self::new(config.join("autostart"), exe))
    }

    pub fn entry_path(&self) -> PathBuf {
        self.autostart_dir.join(AUTOSTART_DESKTOP_FILE)
    }

    pub fn render(&self) -> String {
        format!(
            "[Desktop Entry]\n\
             Type=Application\n\
             Name=Anti-Screensaver\n\
             Comment=Keep the screen awake with imperceptible mouse nudges\n\
             Exec={} {}\n\
             Terminal=false\n\
             X-GNOME-Autostart-enabled=true\n",
            quote_exec_arg(&self.exe.display().to_string()),
            MINIMIZED_FLAG
        )
    }

    fn io_err(path: &Path, source: std::io::Error) -> AutoStartError {
        AutoStartError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Quote one `Exec` argument per the Desktop Entry rules
///
/// Inside the quotes `"`, `` ` ``, `$` and `\` take a backslash. The value is
/// then string-escaped, which doubles every backslash again, and `%` is
/// doubled so it is not read as a field code.
pub fn quote_exec_arg(arg: &str) -> String {
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        match c {
            '\\' => quoted.push_str("\\\\\\\\"),
            '"' | '`' | '$' => {
                quoted.push_str("\\\\");
                quoted.push(c);
            }
            '%' => quoted.push_str("%%"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

impl AutoStart for DesktopEntryAutoStart {
    fn enable(&self) -> Result<(), AutoStartError> {
        fs::create_dir_all(&self.autostart_dir)
            .map_err(|e| Self::io_err(&self.autostart_dir, e))?;
        let path = self.entry_path();
        fs::write(&path, self.render()).map_err(|e| Self::io_err(&path, e))?;
        info!("Auto-start enabled: {}", path.display());
        Ok(())
    }

    fn disable(&self) -> Result<(), AutoStartError> {
        let path = self.entry_path();
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(&path).map_err(|e| Self::io_err(&path, e))?;
        info!("Auto-start disabled: removed {}", path.display());
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.entry_path().is_file()
    }

    fn location(&self) -> String {
        self.entry_path().display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path_is_only_quoted() {
        assert_eq!(
            quote_exec_arg("/opt/Anti Screensaver/bin/anti-screensaver"),
            "\"/opt/Anti Screensaver/bin/anti-screensaver\""
        );
    }

    #[test]
    fn test_reserved_characters_escaped() {
        assert_eq!(quote_exec_arg(r#"/tmp/a"b"#), r#""/tmp/a\\"b""#);
        assert_eq!(quote_exec_arg("/tmp/$HOME`id`"), r#""/tmp/\\$HOME\\`id\\`""#);
        assert_eq!(quote_exec_arg(r"/tmp/back\slash"), r#""/tmp/back\\\\slash""#);
        assert_eq!(quote_exec_arg("/tmp/100%"), r#""/tmp/100%%""#);
    }

    #[test]
    fn test_render_uses_escaped_exec() {
        let entry = DesktopEntryAutoStart::new("/tmp/autostart", "/home/u/bin/$weird\"name");
        let exec = entry
            .render()
            .lines()
            .find(|line| line.starts_with("Exec="))
            .map(str::to_string);
        assert_eq!(
            exec.as_deref(),
            Some(r#"Exec="/home/u/bin/\\$weird\\"name" --minimized"#)
        );
    }
}
