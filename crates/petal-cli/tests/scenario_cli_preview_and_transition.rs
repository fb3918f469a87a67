use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

const FIELDS: &str = r##"
fields:
  - id: orderNumber
    label: "Order #"
    category: Order
    sourcePaths: [name]
    transformation: { type: extract, pattern: "#(\\d+)" }
  - id: deliveryCity
    label: City
    category: Delivery
    sourcePaths: [billing_address.city, shipping_address.city]
  - id: recipientName
    label: Recipient
    category: Delivery
"##;

fn write_json(dir: &Path, name: &str, v: &Value) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(v)?)?;
    Ok(path)
}

fn stdout_json(out: std::process::Output) -> anyhow::Result<Value> {
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    Ok(serde_json::from_slice(&out.stdout)?)
}

fn field<'a>(report: &'a Value, id: &str) -> &'a Value {
    report["fields"]
        .as_array()
        .and_then(|fs| fs.iter().find(|f| f["fieldId"] == id))
        .unwrap_or_else(|| panic!("field {id} missing from {report}"))
}

/// `petal preview` resolves from the payload only; local values never leak in.
#[allow(deprecated)]
#[test]
fn preview_prints_report_resolved_from_payload() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let fields = dir.path().join("fields.yaml");
    fs::write(&fields, FIELDS)?;
    let order = write_json(
        dir.path(),
        "order.json",
        &json!({
            "id": "o-1042",
            "recipientName": "Local Only",
            "upstream": {
                "name": "#1042",
                "shipping_address": { "city": "Porto" }
            }
        }),
    )?;

    let mut cmd = assert_cmd::Command::cargo_bin("petal")?;
    cmd.arg("preview")
        .arg("--fields")
        .arg(&fields)
        .arg("--order")
        .arg(&order);
    let report = stdout_json(cmd.output()?)?;

    assert_eq!(report["orderId"], "o-1042");
    assert_eq!(report["hasUpstream"], true);
    assert_eq!(field(&report, "orderNumber")["display"], "1042");
    assert_eq!(field(&report, "deliveryCity")["matchedPath"], "shipping_address.city");
    assert_eq!(field(&report, "deliveryCity")["display"], "Porto");
    assert_ne!(field(&report, "recipientName")["display"], "Local Only");

    Ok(())
}

#[allow(deprecated)]
#[test]
fn preview_refuses_misaligned_legacy_labels() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let order = write_json(
        dir.path(),
        "order.json",
        &json!({
            "id": "o-9",
            "product": {
                "labelNames": ["Hard", "Bouquet"],
                "labelCategories": ["difficulty"]
            }
        }),
    )?;

    // No --fields: the embedded defaults are used.
    let mut cmd = assert_cmd::Command::cargo_bin("petal")?;
    cmd.arg("preview").arg("--order").arg(&order);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("LABEL_BAG_MISALIGNED"));

    Ok(())
}

#[allow(deprecated)]
#[test]
fn transition_claims_order_for_acting_user() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let order = write_json(
        dir.path(),
        "order.json",
        &json!({ "id": "o-3", "status": "unassigned" }),
    )?;

    let mut cmd = assert_cmd::Command::cargo_bin("petal")?;
    cmd.arg("transition")
        .arg("--order")
        .arg(&order)
        .args(["--status", "assigned", "--user", "U42"]);
    let update = stdout_json(cmd.output()?)?;

    assert_eq!(
        update,
        json!({ "orderId": "o-3", "patch": { "status": "assigned", "assignedTo": "U42" } })
    );
    Ok(())
}

/// `--user` claims even an order someone else already holds.
#[allow(deprecated)]
#[test]
fn transition_acting_user_takes_over_assigned_order() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let order = write_json(
        dir.path(),
        "order.json",
        &json!({ "id": "o-6", "status": "assigned", "assignedTo": "U7" }),
    )?;

    let mut cmd = assert_cmd::Command::cargo_bin("petal")?;
    cmd.arg("transition")
        .arg("--order")
        .arg(&order)
        .args(["--status", "assigned", "--user", "U42"]);
    let update = stdout_json(cmd.output()?)?;

    assert_eq!(
        update["patch"],
        json!({ "status": "assigned", "assignedTo": "U42" })
    );
    Ok(())
}

#[allow(deprecated)]
#[test]
fn transition_blank_assignee_unassigns() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let order = write_json(
        dir.path(),
        "order.json",
        &json!({ "id": "o-4", "status": "completed", "assignedTo": "U7" }),
    )?;

    let mut cmd = assert_cmd::Command::cargo_bin("petal")?;
    cmd.arg("transition")
        .arg("--order")
        .arg(&order)
        .args(["--assign", ""]);
    let update = stdout_json(cmd.output()?)?;

    assert_eq!(
        update["patch"],
        json!({ "status": "unassigned", "assignedTo": null })
    );
    Ok(())
}

#[allow(deprecated)]
#[test]
fn transition_requires_exactly_one_action() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let order = write_json(dir.path(), "order.json", &json!({ "id": "o-5" }))?;

    let mut none = assert_cmd::Command::cargo_bin("petal")?;
    none.arg("transition").arg("--order").arg(&order);
    none.assert().failure();

    let mut two = assert_cmd::Command::cargo_bin("petal")?;
    two.arg("transition")
        .arg("--order")
        .arg(&order)
        .args(["--unassign", "--notes", "x"]);
    two.assert().failure();

    let mut bad_status = assert_cmd::Command::cargo_bin("petal")?;
    bad_status
        .arg("transition")
        .arg("--order")
        .arg(&order)
        .args(["--status", "shipped"]);
    bad_status
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --status 'shipped'"));

    Ok(())
}

/// An operator overlay previews the same field ids, in the same order, as the
/// daemon serves for that overlay: defaults first, overlay on top.
#[allow(deprecated)]
#[test]
fn preview_layers_overlay_over_defaults_like_the_daemon() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let shop = dir.path().join("shop.yaml");
    fs::write(
        &shop,
        "fields:\n  - id: giftNote\n    label: Gift note\n    sourcePaths: [note]\n",
    )?;
    let order = write_json(dir.path(), "order.json", &json!({ "id": "o-7" }))?;

    let mut cmd = assert_cmd::Command::cargo_bin("petal")?;
    cmd.arg("preview")
        .arg("--fields")
        .arg(&shop)
        .arg("--order")
        .arg(&order);
    let report = stdout_json(cmd.output()?)?;

    let previewed: Vec<String> = report["fields"]
        .as_array()
        .map(|fs| {
            fs.iter()
                .filter_map(|f| f["fieldId"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    let shop_s = shop.to_string_lossy().to_string();
    let served = petal_config::load_with_defaults(&[shop_s.as_str()])?;
    let served_ids: Vec<String> = served.fields.iter().map(|f| f.id.clone()).collect();

    assert!(served_ids.len() > 1);
    assert_eq!(previewed, served_ids);
    assert_eq!(previewed.last().map(String::as_str), Some("giftNote"));

    // config-hash agrees with the hash the daemon reports for the same layers.
    let mut hash = assert_cmd::Command::cargo_bin("petal")?;
    hash.arg("config-hash").arg(&shop);
    hash.assert().success().stdout(predicate::str::contains(format!(
        "config_hash={}",
        served.config_hash
    )));

    Ok(())
}
