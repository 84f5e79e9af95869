pub mod process;

pub use process::*;

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use fogros_models::{CommandSpec, ProvisionError};

    #[tokio::test]
    async fn test_captures_stdout_and_status() {
        let runner = ProcessRunner::new();
        let out = runner
            .run(CommandSpec::new("sh").args(["-c", "printf Active"]))
            .await
            .unwrap();
        assert!(out.is_success());
        assert_eq!(out.stdout, "Active");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_output_not_error() {
        let runner = ProcessRunner::new();
        let out = runner
            .run(CommandSpec::new("sh").args(["-c", "echo denied >&2; exit 3"]))
            .await
            .unwrap();
        assert_eq!(out.status_code, Some(3));
        assert_eq!(out.failure_reason(), "denied");
    }

    #[tokio::test]
    async fn test_runs_in_current_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Dockerfile"), "FROM scratch\n").unwrap();
        let out = ProcessRunner::new()
            .run(
                CommandSpec::new("sh")
                    .args(["-c", "cat Dockerfile"])
                    .current_dir(dir.path()),
            )
            .await
            .unwrap();
        assert_eq!(out.stdout, "FROM scratch\n");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let err = ProcessRunner::new()
            .run(CommandSpec::new("definitely-not-a-real-tool-fogros"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisionError::CommandSpawn { ref program, .. }
            if program == "definitely-not-a-real-tool-fogros"));
    }
}
