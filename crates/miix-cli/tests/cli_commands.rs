use assert_cmd::Command;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const PROD: &str = "https://mixer.com/api/v1";
const DEV: &str = "https://dev.mixer.com/api/v1";

fn base_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("miix"));
    cmd.env("HOME", home)
        .env_remove("MIIX_PROFILE")
        .env_remove("MIIX_API")
        .env_remove("MIIX_CLIENT_ID");
    cmd
}

fn host_entry(host: &str, access: &str, expires_at: &str, username: &str) -> String {
    format!(
        r#"  {host}:
    tokens:
      accessToken: {access}
      refreshToken: {access}-refresh
      expiresAt: "{expires_at}"
      scopes:
        - interactive:manage:self
        - interactive:play
        - channel:teststream:view:self
    userdata:
      id: 7
      username: {username}
      channel: 8
"#
    )
}

fn write_profile(home: &Path, entries: &[String]) {
    let mut contents = String::from("hosts:\n");
    for entry in entries {
        contents.push_str(entry);
    }
    fs::write(home.join(".miixrc"), contents).expect("write profile");
}

#[test]
fn status_without_profile_is_not_authenticated() {
    let home = tempdir().expect("tempdir");

    base_cmd(home.path())
        .args(["--api", PROD, "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not authenticated with"));
}

#[test]
fn token_prints_stored_access_token() {
    let home = tempdir().expect("tempdir");
    write_profile(
        home.path(),
        &[host_entry(PROD, "prod-access", "2999-01-01T00:00:00Z", "connor")],
    );

    base_cmd(home.path())
        .args(["--api", PROD, "token"])
        .assert()
        .success()
        .stdout(predicate::str::diff("prod-access\n"));

    base_cmd(home.path())
        .args(["--api", PROD, "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Authenticated with https://mixer.com/api/v1"));
}

#[test]
fn whoami_prints_stored_user() {
    let home = tempdir().expect("tempdir");
    write_profile(
        home.path(),
        &[host_entry(PROD, "prod-access", "2999-01-01T00:00:00Z", "connor")],
    );

    base_cmd(home.path())
        .args(["--api", PROD, "whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"username\": \"connor\""))
        .stdout(predicate::str::contains("\"channel\": 8"));
}

#[test]
fn hosts_are_independent() {
    let home = tempdir().expect("tempdir");
    write_profile(
        home.path(),
        &[
            host_entry(PROD, "prod-access", "2999-01-01T00:00:00Z", "connor"),
            host_entry(DEV, "dev-access", "2999-01-01T00:00:00Z", "tester"),
        ],
    );

    base_cmd(home.path())
        .args(["--api", DEV, "token"])
        .assert()
        .success()
        .stdout(predicate::str::diff("dev-access\n"));

    base_cmd(home.path())
        .args(["--api", PROD, "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));

    let contents = fs::read_to_string(home.path().join(".miixrc")).expect("read profile");
    assert!(!contents.contains("prod-access"));
    assert!(contents.contains("dev-access"));

    base_cmd(home.path())
        .args(["--api", DEV, "token"])
        .assert()
        .success()
        .stdout(predicate::str::diff("dev-access\n"));
}

#[test]
fn token_without_credentials_asks_for_login() {
    let home = tempdir().expect("tempdir");

    base_cmd(home.path())
        .args(["--api", PROD, "token"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("miix login"));
}

#[test]
fn malformed_profile_is_reported() {
    let home = tempdir().expect("tempdir");
    fs::write(home.path().join(".miixrc"), "hosts: [oops").expect("write profile");

    base_cmd(home.path())
        .args(["--api", PROD, "token"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error parsing profile"));
}

#[test]
fn profile_flag_overrides_home() {
    let home = tempdir().expect("tempdir");
    let other = tempdir().expect("tempdir");
    write_profile(
        other.path(),
        &[host_entry(PROD, "elsewhere", "2999-01-01T00:00:00Z", "connor")],
    );
    let profile = other.path().join(".miixrc");

    base_cmd(home.path())
        .args(["--api", PROD, "--profile"])
        .arg(&profile)
        .arg("token")
        .assert()
        .success()
        .stdout(predicate::str::diff("elsewhere\n"));
}

#[test]
fn login_command_runs_short_code_flow() {
    let home = tempdir().expect("tempdir");
    let mut server = Server::new();

    server
        .mock("POST", "/oauth/shortcode")
        .match_body(Matcher::PartialJson(json!({"client_id": "test-client"})))
        .with_status(200)
        .with_body(json!({"code": "XYZ789", "handle": "handle-9", "expires_in": 120}).to_string())
        .create();
    server
        .mock("GET", "/oauth/shortcode/check/handle-9")
        .with_status(200)
        .with_body(json!({"code": "auth-code"}).to_string())
        .create();
    server
        .mock("POST", "/oauth/token")
        .with_status(200)
        .with_body(
            json!({
                "access_token": "granted",
                "refresh_token": "granted-refresh",
                "expires_in": 3600
            })
            .to_string(),
        )
        .create();
    server
        .mock("GET", "/users/current")
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer granted")
        .with_status(200)
        .with_body(json!({"id": 3, "username": "connor", "channel": {"id": 4}}).to_string())
        .create();

    base_cmd(home.path())
        .args(["--api", &server.url(), "--client-id", "test-client", "login"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Code: XYZ789"))
        .stdout(predicate::str::contains("Logged in as connor"));

    let contents = fs::read_to_string(home.path().join(".miixrc")).expect("read profile");
    assert!(contents.contains("granted-refresh"));

    base_cmd(home.path())
        .args(["--api", &server.url(), "login"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already logged in as connor"));
}
