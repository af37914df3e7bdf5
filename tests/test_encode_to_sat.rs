use assert_cmd::Command;
use assert_fs::{prelude::FileWriteStr, NamedTempFile};
use predicates::prelude::predicate;

#[test]
fn test_encode_to_stdout() -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("positives.txt")?;
    file.write_str("a,b\n")?;
    let mut cmd = Command::cargo_bin("koala")?;
    cmd.arg("encode-to-sat")
        .arg("--logging-level")
        .arg("off")
        .arg("-p")
        .arg(file.path())
        .arg("-k")
        .arg("1");
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("p cnf "));
    file.close()?;
    Ok(())
}

#[test]
fn test_encode_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("positives.txt")?;
    file.write_str("a,b\nb\n")?;
    let out = NamedTempFile::new("instance.cnf")?;
    let mut cmd = Command::cargo_bin("koala")?;
    cmd.arg("encode-to-sat")
        .arg("--logging-level")
        .arg("off")
        .arg("-p")
        .arg(file.path())
        .arg("-k")
        .arg("2")
        .arg("-o")
        .arg(out.path());
    cmd.assert().success().stdout(predicate::eq(""));
    let content = std::fs::read_to_string(out.path())?;
    assert!(content.starts_with("p cnf "));
    assert!(content.lines().skip(1).all(|l| l.ends_with(" 0") || l == "0"));
    Ok(())
}
