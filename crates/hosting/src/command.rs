use crate::backend::ImageHost;
use crate::HostError;
use mdimg_config::UploadSettings;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Uploads through an external executable: `<tool> <command> <image path>`.
/// Exit status zero plus a non-empty stdout is taken as the hosted URL.
pub struct CommandHost {
    tool: String,
    command: String,
    timeout: Option<Duration>,
}

impl CommandHost {
    pub fn new(tool: String, command: String, timeout_secs: u64) -> Self {
        let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));
        Self { tool, command, timeout }
    }

    pub fn from_settings(settings: &UploadSettings) -> Self {
        Self::new(settings.tool.clone(), settings.command.clone(), settings.timeout_secs)
    }

    fn build_command(&self, image_path: &Path) -> Command {
        let mut command = Command::new(&self.tool);
        if !self.command.is_empty() {
            command.arg(&self.command);
        }
        command
            .arg(image_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait::async_trait]
impl ImageHost for CommandHost {
    async fn upload(&self, image_path: &Path) -> Result<String, HostError> {
        let mut command = self.build_command(image_path);
        tracing::debug!("Running upload tool: {:?}", command);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| HostError::Timeout(limit.as_secs()))?,
            None => command.output().await,
        }
        .map_err(|source| HostError::SpawnError {
            tool: self.tool.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(HostError::ToolFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if url.is_empty() {
            return Err(HostError::EmptyOutput(self.tool.clone()));
        }

        tracing::info!("Uploaded {} -> {}", image_path.display(), url);
        Ok(url)
    }

    fn name(&self) -> &str {
        &self.tool
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    fn write_tool(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake-uploader.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_stdout_is_the_url() {
        let dir = tempfile::tempdir().unwrap();
        let tool = write_tool(
            dir.path(),
            r#"[ "$1" = "upload" ] || exit 2
echo "  https://img.host/$(basename "$2")  ""#,
        );
        let host = CommandHost::new(tool.display().to_string(), "upload".into(), 10);

        let url = host.upload(Path::new("/notes/my image.png")).await.unwrap();

        assert_eq!(url, "https://img.host/my image.png");
    }

    #[tokio::test]
    async fn test_non_zero_exit_fails() {
        let dir = tempfile::tempdir().unwrap();
        let tool = write_tool(dir.path(), "echo 'quota exceeded' >&2\nexit 3");
        let host = CommandHost::new(tool.display().to_string(), "upload".into(), 10);

        let err = host.upload(Path::new("/notes/x.png")).await.unwrap_err();

        match err {
            HostError::ToolFailed { stderr, .. } => assert_eq!(stderr, "quota exceeded"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_output_fails() {
        let dir = tempfile::tempdir().unwrap();
        let tool = write_tool(dir.path(), "exit 0");
        let host = CommandHost::new(tool.display().to_string(), "upload".into(), 10);

        assert!(matches!(
            host.upload(Path::new("/notes/x.png")).await,
            Err(HostError::EmptyOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let tool = write_tool(dir.path(), "sleep 5\necho https://late");
        let host = CommandHost::new(tool.display().to_string(), "upload".into(), 1);

        assert!(matches!(
            host.upload(Path::new("/notes/x.png")).await,
            Err(HostError::Timeout(1))
        ));
    }

    #[tokio::test]
    async fn test_missing_tool_fails_to_spawn() {
        let host = CommandHost::new("/definitely/not/a/tool".into(), "upload".into(), 0);

        assert!(matches!(
            host.upload(Path::new("/notes/x.png")).await,
            Err(HostError::SpawnError { .. })
        ));
    }
}
