use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// CLIの回帰テスト - 実際のCLIプロセスを起動して動作を検証
#[cfg(unix)]
mod cli_regression_tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::process::Stdio;
    use std::thread;
    use std::time::{Duration, Instant};

    fn write_asset(root: &Path, relative: &str, guid: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        fs::write(root.join(format!("{}.meta", relative)), format!("guid: {}\n", guid)).unwrap();
    }

    fn create_test_project() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_asset(root, "Assets/Textures/A.png", "aaaa", "png");
        write_asset(root, "Assets/Prefabs/B.prefab", "bbbb", "guid: aaaa");
        fs::write(
            root.join("settings.json"),
            r#"{ "exclude_extensions": [], "exclude_files": [] }"#,
        )
        .unwrap();

        write_script(
            &root.join("fake-git.sh"),
            "#!/bin/sh\nfor arg; do token=\"$arg\"; done\n[ \"$token\" = aaaa ] && printf 'Prefabs/B.prefab\\0' && exit 0\nexit 1\n",
        );
        temp_dir
    }

    fn write_script(path: &Path, body: &str) {
        fs::write(path, body).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn refview_command(project: &Path, args: &[&str]) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_refview"));
        command
            .args(args)
            .arg("--directory")
            .arg(project)
            .arg("--backend")
            .arg("git-grep")
            .arg("--executable")
            .arg(project.join("fake-git.sh"))
            .arg("--settings")
            .arg(project.join("settings.json"))
            .current_dir(project)
            .env("NO_COLOR", "1");
        command
    }

    fn run_refview(project: &Path, args: &[&str]) -> std::process::Output {
        refview_command(project, args)
            .output()
            .expect("Failed to execute refview")
    }

    #[test]
    fn test_text_output() {
        let project = create_test_project();
        let output = run_refview(project.path(), &["Assets/Textures/A.png", "--expand"]);
        assert!(output.status.success());

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("【Find References In Project - Result】 (git-grep)"));
        assert!(stdout.contains("▼ A Assets/Textures/A.png (1)"));
        assert!(stdout.contains("    B Assets/Prefabs/B.prefab"));
    }

    #[test]
    fn test_json_output() {
        let project = create_test_project();
        let output = run_refview(project.path(), &["Assets/Prefabs/B.prefab", "--json"]);
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["completion"], "completed");
        assert_eq!(json["assets"][0]["target"]["path"], "Assets/Prefabs/B.prefab");
        assert_eq!(json["assets"][0]["references"]["state"], "empty");
    }

    #[test]
    fn test_empty_selection_fails() {
        let project = create_test_project();
        let output = run_refview(project.path(), &["Assets/Missing.png"]);
        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("Nothing to search"));
    }

    #[test]
    fn test_interrupt_returns_partial_result() {
        let project = create_test_project();
        let root = project.path();
        write_asset(root, "Assets/Textures/D.png", "dddd", "png");

        // 最初の対象の検索中に印を残し、少し待ってから結果を返す
        let marker = root.join("first-target-started");
        write_script(
            &root.join("fake-git.sh"),
            &format!(
                "#!/bin/sh\nfor arg; do token=\"$arg\"; done\n\
                 [ \"$token\" = aaaa ] || exit 1\n\
                 touch '{}'\nsleep 1\nprintf 'Prefabs/B.prefab\\0'\n",
                marker.display()
            ),
        );

        let child = refview_command(root, &["Assets/Textures"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to execute refview");

        let deadline = Instant::now() + Duration::from_secs(10);
        while !marker.exists() {
            assert!(Instant::now() < deadline, "first search never started");
            thread::sleep(Duration::from_millis(20));
        }
        let status = Command::new("kill")
            .args(["-INT", &child.id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let output = child.wait_with_output().unwrap();
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("▶ A Assets/Textures/A.png (1)"));
        assert!(!stdout.contains("Assets/Textures/D.png"));
        assert!(stdout.contains("Search cancelled after 1 assets"));
    }

    #[test]
    fn test_missing_data_dir_fails() {
        let project = create_test_project();
        let output = run_refview(project.path(), &["Assets/Textures/A.png", "--data-dir", "Content"]);
        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("has no 'Content' directory"));
    }

    #[test]
    fn test_broken_settings_fail() {
        let project = create_test_project();
        fs::write(project.path().join("settings.json"), "{ not json").unwrap();
        let output = run_refview(project.path(), &["Assets/Textures/A.png"]);
        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid exclude settings"));
    }
}

#[test]
fn test_backends_listing() {
    let output = Command::new(env!("CARGO_BIN_EXE_refview"))
        .arg("--backends")
        .output()
        .expect("Failed to execute refview");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["spotlight", "grep", "git-grep", "findstr", "git-grep-win"] {
        assert!(stdout.contains(name));
    }
}
