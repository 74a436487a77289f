//! Integration tests for qtdl

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;

    fn qtdl() -> Command {
        cargo_bin_cmd!("qtdl")
    }

    #[test]
    fn help_displays() {
        qtdl()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Qt SDK archives"));
    }

    #[test]
    fn version_displays() {
        qtdl()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("qtdl"));
    }

    #[test]
    fn help_names_toolchains_in_discovered_form() {
        // discovery strips the `_<arch>` suffix, so the help must offer the
        // stripped spelling
        qtdl()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("win64_msvc2019"))
            .stdout(predicate::str::contains("win64_msvc2019_64").not());
    }

    #[test]
    fn rejects_unknown_format() {
        qtdl().args(["--format", "yaml"]).assert().failure();
    }

    #[test]
    fn rejects_unknown_flag() {
        qtdl().arg("--no-such-flag").assert().failure();
    }

    #[test]
    fn invalid_config_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "remote = \"not a table\"").unwrap();

        qtdl()
            .arg("--config")
            .arg(&path)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn unreachable_repository_is_a_fetch_error() {
        // Port 9 (discard) is closed on any sane machine; the connection is
        // refused without touching the network.
        qtdl()
            .args(["--base-url", "http://127.0.0.1:9/online/qtsdkrepository"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"));
    }
}
