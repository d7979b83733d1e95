//! launchd plumbing

use super::{CommandOutput, CommandRunner};
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

/// Runs `launchctl`
pub struct Launchctl;

#[async_trait]
impl CommandRunner for Launchctl {
    async fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::new("launchctl").args(args).output().await?;
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Agent definition: run `executable` at load and restart it if it dies
pub fn plist(label: &str, executable: &Path) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple Computer//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>Label</key>
	<string>{label}</string>
	<key>ProgramArguments</key>
	<array>
		<string>{program}</string>
	</array>
	<key>RunAtLoad</key>
	<true/>
	<key>KeepAlive</key>
	<true/>
	<key>StandardOutPath</key>
	<string>/usr/local/var/log/{label}.log</string>
	<key>StandardErrorPath</key>
	<string>/usr/local/var/log/{label}.err</string>
</dict>
</plist>
"#,
        label = escape(label),
        program = escape(&executable.to_string_lossy()),
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
