use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn reserve_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("reserve addr");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    addr.to_string()
}

fn wait_for_http(addr: &str) {
    for _ in 0..80 {
        if TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    panic!("http server not ready on {addr}");
}

fn send_http(addr: &str, method: &str, path: &str, body: &str) -> String {
    let mut stream = TcpStream::connect(addr).expect("connect http");
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(request.as_bytes()).expect("write request");
    stream.flush().expect("flush");
    let mut buf = String::new();
    stream.read_to_string(&mut buf).expect("read response");
    buf
}

fn send_raw(addr: &str, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).expect("connect http");
    stream.write_all(raw.as_bytes()).expect("write request");
    stream.flush().expect("flush");
    let mut buf = String::new();
    stream.read_to_string(&mut buf).expect("read response");
    buf
}

fn response_body(response: &str) -> &str {
    response.split("\r\n\r\n").nth(1).unwrap_or("")
}

fn spawn_rigfitd(addr: &str, envs: &[(&str, &str)]) -> Child {
    let mut command = Command::new(env!("CARGO_BIN_EXE_rigfitd"));
    command
        .env("RIGFITD_ADDR", addr)
        .env("RIGFIT_LOG", "warn")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    for (key, value) in envs {
        command.env(key, value);
    }
    let child = command.spawn().expect("spawn rigfitd");
    wait_for_http(addr);
    child
}

fn stop(mut child: Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[test]
fn http_health_and_recommend_work() {
    let addr = reserve_addr();
    let child = spawn_rigfitd(&addr, &[]);

    let health = send_http(&addr, "GET", "/health", "");
    assert!(health.starts_with("HTTP/1.1 200"));
    assert!(response_body(&health).contains("\"status\":\"ok\""));

    let recommend = send_http(
        &addr,
        "POST",
        "/recommend",
        r#"{"budget":3000,"performance":10,"resolution":3}"#,
    );
    assert!(recommend.starts_with("HTTP/1.1 200"), "{recommend}");
    let json: serde_json::Value =
        serde_json::from_str(response_body(&recommend)).expect("recommend json");
    assert_eq!(json["allocations"]["GPU"], 1350.0);
    assert_eq!(json["preference"]["budget_score"], 100.0);
    for key in ["GPU", "CPU", "Motherboard"] {
        assert!(json[key]["name"].is_string(), "missing {key}");
    }
    let gpus = json["rankings"]["gpus"].as_array().expect("gpu rankings");
    let scores: Vec<f64> = gpus
        .iter()
        .filter_map(|r| r["final_score"].as_f64())
        .collect();
    assert_eq!(scores.len(), gpus.len());
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    stop(child);
}

#[test]
fn http_rejects_bad_input_and_tracks_metrics() {
    let addr = reserve_addr();
    let child = spawn_rigfitd(&addr, &[]);

    let low = send_http(&addr, "POST", "/recommend", r#"{"budget":100}"#);
    assert!(low.starts_with("HTTP/1.1 400"));
    assert!(response_body(&low).contains("Budget out of range (500-3000)."));

    let garbled = send_http(&addr, "POST", "/recommend", "not json");
    assert!(garbled.starts_with("HTTP/1.1 400"));

    let missing = send_http(&addr, "GET", "/nowhere", "");
    assert!(missing.starts_with("HTTP/1.1 404"));

    let summary = send_http(&addr, "GET", "/metrics/summary", "");
    assert!(summary.starts_with("HTTP/1.1 200"));
    let json: serde_json::Value =
        serde_json::from_str(response_body(&summary)).expect("summary json");
    assert_eq!(json["rejected_total"], 2);
    assert_eq!(json["not_found_total"], 1);

    stop(child);
}

#[test]
fn http_serves_catalog_from_file() {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let path = std::env::temp_dir().join(format!("rigfit-http-catalog-{now}.json"));
    let catalog = r#"{
        "gpus": [{"name":"Card A","price":400,"cores":6000,"memory_gb":12}],
        "cpus": [{"name":"Chip A","price":250,"single_thread":3800,"multi_thread":30000,"socket":"AM5","memory":["DDR5"]}],
        "motherboards": [{"name":"Board A","price":180,"chipset":"B650","socket":"AM5","memory":"DDR5"}]
    }"#;
    std::fs::write(&path, catalog).expect("write catalog");
    let addr = reserve_addr();
    let child = spawn_rigfitd(&addr, &[("RIGFIT_CATALOG", path.to_str().expect("utf8 path"))]);

    let listing = send_http(&addr, "GET", "/catalog", "");
    assert!(listing.starts_with("HTTP/1.1 200"));
    assert!(response_body(&listing).contains("\"Card A\""));

    let recommend = send_http(&addr, "POST", "/recommend", "{}");
    let json: serde_json::Value =
        serde_json::from_str(response_body(&recommend)).expect("recommend json");
    assert_eq!(json["GPU"]["name"], "Card A");
    assert_eq!(json["Motherboard"]["name"], "Board A");

    stop(child);
    let _ = std::fs::remove_file(path);
}

#[test]
fn http_survives_oversized_and_idle_clients() {
    let addr = reserve_addr();
    let child = spawn_rigfitd(&addr, &[("RIGFITD_READ_TIMEOUT_MS", "200")]);

    let huge = send_raw(
        &addr,
        "POST /recommend HTTP/1.1\r\nContent-Length: 18446744073709551615\r\nConnection: close\r\n\r\n",
    );
    assert!(huge.starts_with("HTTP/1.1 413"), "{huge}");

    let idle = TcpStream::connect(&addr).expect("connect idle client");
    let health = send_http(&addr, "GET", "/health", "");
    assert!(health.starts_with("HTTP/1.1 200"), "{health}");
    drop(idle);

    let recommend = send_http(&addr, "POST", "/recommend", "{}");
    assert!(recommend.starts_with("HTTP/1.1 200"));

    stop(child);
}
