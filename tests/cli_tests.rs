//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Binary isolated from the user's config and preference files
fn taskbell_bin(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("taskbell").expect("binary should build");
    cmd.env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("TASKBELL_SERVER_URL")
        .env_remove("TASKBELL_COOKIE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_output() {
    let home = TempDir::new().unwrap();
    taskbell_bin(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("notifications"))
        .stdout(predicate::str::contains("--server"))
        .stdout(predicate::str::contains("--interval"))
        .stdout(predicate::str::contains("--no-sound"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("task"));
}

#[test]
fn version_output() {
    let home = TempDir::new().unwrap();
    taskbell_bin(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("taskbell"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_help() {
    let home = TempDir::new().unwrap();
    taskbell_bin(&home)
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("path"));
}

#[test]
fn invalid_interval_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    taskbell_bin(&home)
        .args(["--interval", "soon", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid interval"));
}

#[test]
fn task_id_must_be_numeric() {
    let home = TempDir::new().unwrap();
    taskbell_bin(&home)
        .args(["task", "complete", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}

#[cfg(target_os = "linux")]
mod with_xdg_dirs {
    use super::*;

    #[test]
    fn config_path_follows_xdg_config_home() {
        let home = TempDir::new().unwrap();
        taskbell_bin(&home)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("taskbell"))
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_set_then_get() {
        let home = TempDir::new().unwrap();
        taskbell_bin(&home)
            .args(["config", "set", "poll_interval", "1m"])
            .assert()
            .success();

        taskbell_bin(&home)
            .args(["config", "get", "poll_interval"])
            .assert()
            .success()
            .stdout("1m\n");
    }

    #[test]
    fn config_set_rejects_bad_values() {
        let home = TempDir::new().unwrap();
        taskbell_bin(&home)
            .args(["config", "set", "poll_interval", "often"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("poll_interval"));

        taskbell_bin(&home)
            .args(["config", "set", "api_key", "x"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Unknown key"));
    }

    #[test]
    fn config_get_masks_cookie() {
        let home = TempDir::new().unwrap();
        taskbell_bin(&home)
            .args(["config", "set", "cookie", "sessionid=abc; csrftoken=secret123"])
            .assert()
            .success();

        taskbell_bin(&home)
            .args(["config", "get", "cookie"])
            .assert()
            .success()
            .stdout(predicate::str::contains("secret123").not());
    }

    #[test]
    fn config_init_twice_fails() {
        let home = TempDir::new().unwrap();
        taskbell_bin(&home).args(["config", "init"]).assert().success();
        taskbell_bin(&home)
            .args(["config", "init"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn prefs_set_get_and_list() {
        let home = TempDir::new().unwrap();
        taskbell_bin(&home)
            .args(["prefs", "get", "sound_notifications"])
            .assert()
            .success()
            .stdout("(not set)\n");

        taskbell_bin(&home)
            .args(["prefs", "set", "sound_notifications", "off"])
            .assert()
            .success();

        taskbell_bin(&home)
            .args(["prefs", "get", "sound_notifications"])
            .assert()
            .success()
            .stdout("false\n");

        taskbell_bin(&home)
            .args(["prefs", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("sound_notifications"));
    }

    #[test]
    fn prefs_reject_unknown_keys_and_values() {
        let home = TempDir::new().unwrap();
        taskbell_bin(&home)
            .args(["prefs", "set", "theme", "dark"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Unknown preference"));

        taskbell_bin(&home)
            .args(["prefs", "set", "notification_permission", "always"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("notification_permission"));
    }

    #[test]
    fn task_delete_without_csrf_cookie_fails_before_request() {
        let home = TempDir::new().unwrap();
        taskbell_bin(&home)
            .args(["--server", "http://127.0.0.1:9", "task", "delete", "7", "--yes"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Failed to delete the task"));
    }

    #[tokio::test]
    async fn list_prints_unread_notifications() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/notifications/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"notifications": [{"id": "5", "title": "Due", "message": "Task X due", "notification_type": "due_soon"}]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let home = TempDir::new().unwrap();
        let uri = server.uri();
        let assert = tokio::task::spawn_blocking(move || {
            taskbell_bin(&home)
                .env("NO_COLOR", "1")
                .args(["list", "--server", &uri])
                .assert()
        })
        .await
        .unwrap();

        assert
            .success()
            .stdout(predicate::str::contains("#5 [due_soon] Due: Task X due"))
            .stderr(predicate::str::contains("1 unread"));
    }

    #[tokio::test]
    async fn list_reports_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/notifications/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let home = TempDir::new().unwrap();
        let uri = server.uri();
        let assert = tokio::task::spawn_blocking(move || {
            taskbell_bin(&home).args(["list", "--server", &uri]).assert()
        })
        .await
        .unwrap();

        assert
            .code(1)
            .stderr(predicate::str::contains("500"));
    }
}
