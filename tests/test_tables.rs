use assert_cmd::Command;
use assert_fs::{prelude::FileWriteStr, NamedTempFile};
use predicates::prelude::{predicate, PredicateBooleanExt};

#[test]
fn test_tables() -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("positives.txt")?;
    file.write_str("a,b,c\na,b,c\nb\n")?;
    let mut cmd = Command::cargo_bin("koala")?;
    cmd.arg("tables")
        .arg("--logging-level")
        .arg("off")
        .arg("-p")
        .arg(file.path())
        .arg("-k")
        .arg("2");
    cmd.assert().success().stdout(
        predicate::str::starts_with(
            "table src->first: 3 occurrence(s), 2 distinct entry(ies)\n  a: 2\n  b: 1\n",
        )
        .and(predicate::str::contains(
            "table first-triple: 2 occurrence(s), 1 distinct entry(ies)\n  a b c: 2\n",
        ))
        .and(predicate::str::contains("  src b: 1\n"))
        .and(predicate::str::contains("  b c: 2\n")),
    );
    Ok(())
}

#[test]
fn test_check() -> Result<(), Box<dyn std::error::Error>> {
    let pos = NamedTempFile::new("positives.txt")?;
    pos.write_str("a,b\nb\n")?;
    let neg = NamedTempFile::new("negatives.txt")?;
    neg.write_str("c\n")?;
    let mut cmd = Command::cargo_bin("koala")?;
    cmd.arg("check")
        .arg("--logging-level")
        .arg("off")
        .arg("-p")
        .arg(pos.path())
        .arg("-n")
        .arg(neg.path());
    cmd.assert().success().stdout(predicate::eq(
        "2 positive sample(s), 1 negative sample(s), 3 symbol(s)\n",
    ));
    Ok(())
}
