use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_gradeviewd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn gradeviewd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or(json!({}))
}

fn positions(result: &serde_json::Value) -> Vec<u64> {
    result
        .get("items")
        .and_then(|v| v.as_array())
        .expect("items")
        .iter()
        .map(|i| i.get("id").and_then(|v| v.as_u64()).expect("id"))
        .collect()
}

#[test]
fn demo_relocation_and_bounded_history() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let listed = request_ok(&mut stdin, &mut reader, "1", "demo.list", json!({}));
    assert_eq!(positions(&listed), vec![1, 2, 3, 4, 5]);

    let moved = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "demo.relocate",
        json!({ "itemId": 2 }),
    );
    assert_eq!(moved.get("moved").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(moved.get("oldPosition").and_then(|v| v.as_u64()), Some(2));
    let new_pos = moved.get("newPosition").and_then(|v| v.as_u64()).expect("newPosition");
    let ids = positions(&moved);
    assert_eq!(ids[(new_pos - 1) as usize], 2);
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![1, 2, 3, 4, 5]);

    let missing = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "demo.relocate",
        json!({ "itemId": 99 }),
    );
    assert_eq!(missing.get("moved").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(positions(&missing), ids);

    for i in 0..6 {
        let r = request_ok(
            &mut stdin,
            &mut reader,
            &format!("r{i}"),
            "demo.relocateRandom",
            json!({}),
        );
        assert_eq!(r.get("moved").and_then(|v| v.as_bool()), Some(true));
    }

    let history = request_ok(&mut stdin, &mut reader, "4", "demo.history", json!({}));
    let entries = history.get("history").and_then(|v| v.as_array()).expect("history");
    assert_eq!(entries.len(), 5);
    assert_eq!(history.get("count").and_then(|v| v.as_u64()), Some(5));
    for e in entries {
        assert!(e.get("label").and_then(|v| v.as_str()).is_some());
        assert!(e.get("time").and_then(|v| v.as_str()).is_some());
    }

    let reset = request_ok(&mut stdin, &mut reader, "5", "demo.reset", json!({}));
    assert_eq!(positions(&reset), vec![1, 2, 3, 4, 5]);
    let cleared = request_ok(&mut stdin, &mut reader, "6", "demo.history", json!({}));
    assert_eq!(
        cleared.get("history").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(0)
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn random_pick_returns_a_loaded_record() {
    let workspace = temp_dir("gradeviewd-random");
    let data = workspace.join("data.json");
    std::fs::write(
        &data,
        r#"[
            {"student":{"id":1,"firstname":"Ana","lastname":"X"},"course":"Math","grade":15,"date":"2024-01-01"},
            {"student":{"id":2,"firstname":"Ben","lastname":"Y"},"course":"Art","grade":11,"date":"2024-01-02"}
        ]"#,
    )
    .expect("write dataset");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let before = request(&mut stdin, &mut reader, "1", "random.pick", json!({}));
    assert_eq!(
        before.pointer("/error/code").and_then(|v| v.as_str()),
        Some("no_dataset")
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "dataset.load",
        json!({ "primary": data.to_string_lossy() }),
    );

    for i in 0..10 {
        let picked = request_ok(
            &mut stdin,
            &mut reader,
            &format!("p{i}"),
            "random.pick",
            json!({}),
        );
        assert_eq!(picked.get("total").and_then(|v| v.as_u64()), Some(2));
        let course = picked
            .pointer("/item/course")
            .and_then(|v| v.as_str())
            .expect("item course");
        assert!(course == "Math" || course == "Art");
    }

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}
