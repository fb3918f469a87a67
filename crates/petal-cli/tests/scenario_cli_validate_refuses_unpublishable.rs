use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;

const DUPLICATE_IDS: &str = r#"
fields:
  - id: city
    label: City
    sourcePaths: [shipping_address.city]
  - id: city
    label: City again
    sourcePaths: [billing_address.city]
"#;

const CLEAN: &str = r#"
fields:
  - id: city
    label: City
    sourcePaths: [shipping_address.city]
"#;

/// `petal validate --strict` must exit non-zero on a set the publish gate refuses.
#[allow(deprecated)]
#[test]
fn strict_validate_refuses_duplicate_ids() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("fields.yaml");
    fs::write(&path, DUPLICATE_IDS)?;
    let path_s = path.to_string_lossy().to_string();

    // Without --strict the report is printed and the command succeeds.
    let mut cmd = assert_cmd::Command::cargo_bin("petal")?;
    cmd.args(["validate", "--fields", &path_s]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"publishable\": false"))
        .stdout(predicate::str::contains("DUPLICATE_ID"));

    let mut cmd2 = assert_cmd::Command::cargo_bin("petal")?;
    cmd2.args(["validate", "--fields", &path_s, "--strict"]);
    cmd2.assert()
        .failure()
        .stderr(predicate::str::contains("FIELDSET_INVALID"));

    Ok(())
}

#[allow(deprecated)]
#[test]
fn strict_validate_accepts_clean_set() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("fields.yaml");
    fs::write(&path, CLEAN)?;

    let mut cmd = assert_cmd::Command::cargo_bin("petal")?;
    cmd.args(["validate", "--strict", "--fields"]).arg(&path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"publishable\": true"));

    Ok(())
}

/// Same layers, same hash; layer order matters.
#[allow(deprecated)]
#[test]
fn config_hash_is_stable_across_invocations() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let base = dir.path().join("base.yaml");
    let overlay = dir.path().join("overlay.yaml");
    fs::write(&base, CLEAN)?;
    fs::write(
        &overlay,
        "fields:\n  - id: city\n    label: Town\n    sourcePaths: [shipping_address.city]\n",
    )?;

    let hash_of = |paths: &[&std::path::Path]| -> anyhow::Result<String> {
        let mut cmd = assert_cmd::Command::cargo_bin("petal")?;
        cmd.arg("config-hash").args(paths);
        let out = cmd.output()?;
        assert!(out.status.success());
        let stdout = String::from_utf8(out.stdout)?;
        let line = stdout
            .lines()
            .find_map(|l| l.strip_prefix("config_hash="))
            .ok_or_else(|| anyhow::anyhow!("no config_hash line in: {stdout}"))?;
        Ok(line.to_string())
    };

    let a = hash_of(&[&base, &overlay])?;
    let b = hash_of(&[&base, &overlay])?;
    let c = hash_of(&[&overlay, &base])?;
    assert_eq!(a.len(), 64);
    assert_eq!(a, b);
    assert_ne!(a, c);

    Ok(())
}

#[allow(deprecated)]
#[test]
fn unparseable_layer_reports_parse_code() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "fields: [unclosed")?;

    let mut cmd = assert_cmd::Command::cargo_bin("petal")?;
    cmd.arg("config-hash").arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("FIELDSET_PARSE"));

    Ok(())
}
