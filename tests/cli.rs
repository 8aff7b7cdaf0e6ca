use assert_cmd::Command;
use predicates::prelude::*;

fn ytsum(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ytsum").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    ytsum(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("summarize"))
        .stdout(predicate::str::contains("providers"));
}

#[test]
fn test_providers_lists_all_services() {
    let dir = tempfile::tempdir().unwrap();
    ytsum(&dir)
        .arg("providers")
        .assert()
        .success()
        .stdout(predicate::str::contains("OpenAI"))
        .stdout(predicate::str::contains("Anthropic"))
        .stdout(predicate::str::contains("xAI Grok"))
        .stdout(predicate::str::contains("Hugging Face"))
        .stdout(predicate::str::contains("HF_TOKEN"));
}

#[test]
fn test_unknown_provider_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    ytsum(&dir)
        .args(["summarize", "https://youtu.be/dQw4w9WgXcQ", "--provider", "bard"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported AI service: bard"));
}

#[test]
fn test_config_saves_to_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.yaml"), "ai:\n  provider: openai\n").unwrap();

    ytsum(&dir)
        .args(["config", "--provider", "anthropic", "--prompt", "Key points only"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings saved"));

    let saved = std::fs::read_to_string(dir.path().join("config.yaml")).unwrap();
    assert!(saved.contains("anthropic"));
    assert!(saved.contains("Key points only"));
}
