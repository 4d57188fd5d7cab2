//! External compiler invocation over stdio.

use std::process::Stdio;
use std::time::Duration;

use covenant_types::ResolveError;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::config::CompilerConfig;

/// Run the external compiler once, feeding `source` on stdin.
///
/// stdout is returned verbatim as the artifact on success; a non-zero exit is
/// a build failure carrying the captured stderr verbatim. The whole
/// interaction runs under `budget`; on expiry the process is forcibly
/// terminated and the call fails with a timeout error.
pub(crate) async fn run_compiler(config: CompilerConfig, source: String, budget: Duration) -> Result<Vec<u8>, ResolveError> {
    debug!("invoking compiler `{}` with {:?}", config.program, config.args);

    let mut command = Command::new(&config.program);
    command
        .args(&config.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        // Dropping the child on timeout must take the process down with it.
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .map_err(|err| ResolveError::build_failed(format!("failed to spawn compiler `{}`: {err}", config.program)))?;

    let interaction = async move {
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(source.as_bytes()).await {
                Ok(()) => {}
                // A compiler that exits before consuming its input closes
                // the pipe; its diagnostics are on stderr, so keep
                // collecting output instead of failing here.
                Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => {}
                Err(err) => return Err(ResolveError::build_failed(format!("failed to feed compiler stdin: {err}"))),
            }
            // Closing stdin signals end of input to the compiler.
        }
        child
            .wait_with_output()
            .await
            .map_err(|err| ResolveError::build_failed(format!("failed to collect compiler output: {err}")))
    };

    let output = match timeout(budget, interaction).await {
        Ok(result) => result?,
        Err(_) => return Err(ResolveError::build_timeout(budget)),
    };

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(ResolveError::build_failed(String::from_utf8_lossy(&output.stderr).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(script: &str) -> CompilerConfig {
        CompilerConfig {
            program: "/bin/sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
        }
    }

    #[tokio::test]
    async fn test_stdout_is_the_artifact() {
        let artifact = run_compiler(shell("cat"), "contract source".to_string(), Duration::from_secs(5)).await.unwrap();
        assert_eq!(artifact, b"contract source");
    }

    #[tokio::test]
    async fn test_nonzero_exit_carries_stderr() {
        let err = run_compiler(shell("echo 'line 3: unknown symbol' >&2; exit 1"), String::new(), Duration::from_secs(5))
            .await
            .unwrap_err();
        match err {
            ResolveError::BuildFailed { stderr } => assert!(stderr.contains("line 3: unknown symbol")),
            other => panic!("expected BuildFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stderr_survives_when_compiler_ignores_stdin() {
        // A compiler that fails before consuming its input closes the stdin
        // pipe mid-write; its diagnostics must still come back verbatim.
        let source = "x".repeat(1024 * 1024);
        let err = run_compiler(shell("exec 0<&-; echo 'line 3: unknown symbol' >&2; exit 1"), source, Duration::from_secs(5))
            .await
            .unwrap_err();
        match err {
            ResolveError::BuildFailed { stderr } => assert!(stderr.contains("line 3: unknown symbol")),
            other => panic!("expected BuildFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_the_process() {
        let err = run_compiler(shell("sleep 30"), String::new(), Duration::from_millis(200)).await.unwrap_err();
        assert!(matches!(err, ResolveError::BuildTimeout { .. }));
    }

    #[tokio::test]
    async fn test_missing_program_is_a_build_failure() {
        let config = CompilerConfig {
            program: "/nonexistent/compiler".to_string(),
            args: Vec::new(),
        };
        let err = run_compiler(config, String::new(), Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, ResolveError::BuildFailed { .. }));
    }
}
