use assert_cmd::Command;
use predicates::prelude::*;

fn sqsw() -> Command {
    Command::cargo_bin("sqsw").unwrap()
}

#[test]
fn command_does_not_exist() {
    sqsw()
        .arg("something")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: unrecognized subcommand"));
}

#[test]
fn send_requires_a_queue() {
    sqsw()
        .args(["send", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--queue-url"));
}

#[test]
fn send_rejects_both_url_and_name() {
    sqsw()
        .args([
            "send",
            "--dry-run",
            "--queue-name",
            "demo",
            "--queue-url",
            "http://localhost:4566/000000000000/demo",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn dry_run_prints_batches() {
    sqsw()
        .args(["send", "--dry-run", "--queue-name", "demo", "--batch-size", "2"])
        .write_stdin("{\"a\":1}\n\n{\"a\":2}\n{\"a\":3}\n{\"a\":4}\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""address":"memory://queues/demo""#)
                .and(predicate::str::contains(r#""MessageBody":"{\"a\":1}""#))
                .and(predicate::str::contains(r#""MessageBody":"{\"a\":2}""#))
                // dropped by the full-buffer flush
                .and(predicate::str::contains(r#""MessageBody":"{\"a\":3}""#).not())
                .and(predicate::str::contains(r#""MessageBody":"{\"a\":4}""#)),
        );
}

#[test]
fn dry_run_passes_entries_and_text_through() {
    sqsw()
        .args([
            "send",
            "--dry-run",
            "--queue-url",
            "http://localhost:4566/000000000000/demo.fifo",
            "--input-type",
            "text",
            "--group-id",
            "g1",
        ])
        .write_stdin("hello world\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""MessageBody":"hello world""#)
                .and(predicate::str::contains(r#""MessageGroupId":"g1""#))
                .and(predicate::str::contains(
                    r#""address":"http://localhost:4566/000000000000/demo.fifo""#,
                )),
        );
}

#[test]
fn invalid_json_aborts_when_asked() {
    sqsw()
        .args(["send", "--dry-run", "--queue-name", "demo", "--abort-on-error"])
        .write_stdin("{\"a\":1}\nnot json\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line is not valid JSON"));
}

#[test]
fn invalid_json_is_skipped_by_default() {
    sqsw()
        .args(["send", "--dry-run", "--queue-name", "demo"])
        .write_stdin("not json\n{\"a\":1}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""MessageBody":"{\"a\":1}""#));
}

#[test]
fn zero_batch_size_is_rejected() {
    sqsw()
        .args(["send", "--dry-run", "--queue-name", "demo", "--batch-size", "0"])
        .write_stdin("{\"a\":1}\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("batch size must be at least 1"));
}
