use onboard_assistant::agent::{
    send_turn, send_turn_bounded, wait_for_idle, AgentApiClient, AgentError, FunctionCall,
    FunctionHandler, FunctionId, FunctionRegistry,
};
use serde_json::Value;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: String,
    path: String,
    auth_header: String,
    body: String,
}

fn read_request(stream: &std::net::TcpStream) -> RecordedRequest {
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .expect("read request line");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let path = parts.next().unwrap_or("/").to_string();

    let mut auth_header = String::new();
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("read header");
        if line == "\r\n" || line.is_empty() {
            break;
        }
        let lower = line.to_ascii_lowercase();
        if lower.starts_with("authorization:") {
            auth_header = line
                .split_once(':')
                .map(|(_, v)| v.trim().to_string())
                .unwrap_or_default();
        }
        if lower.starts_with("content-length:") {
            content_length = line
                .split_once(':')
                .map(|(_, v)| v.trim().parse::<usize>().unwrap_or(0))
                .unwrap_or(0);
        }
    }

    let mut body = vec![0_u8; content_length];
    if content_length > 0 {
        reader.read_exact(&mut body).expect("read body");
    }
    RecordedRequest {
        method,
        path,
        auth_header,
        body: String::from_utf8_lossy(&body).to_string(),
    }
}

fn write_response(stream: &mut std::net::TcpStream, body: &str) {
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream
        .write_all(response.as_bytes())
        .expect("write response");
}

struct MockRuntimeServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl MockRuntimeServer {
    fn start<F>(expected_requests: usize, response_delay: Duration, responder: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let requests_for_thread = Arc::clone(&requests);

        let handle = thread::spawn(move || {
            for _ in 0..expected_requests {
                let (mut stream, _) = listener.accept().expect("accept");
                let request = read_request(&stream);
                let body = responder(&request.method, &request.path);
                requests_for_thread
                    .lock()
                    .expect("lock requests")
                    .push(request);
                if !response_delay.is_zero() {
                    thread::sleep(response_delay);
                }
                write_response(&mut stream, &body);
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
            handle: Some(handle),
        }
    }

    fn finish(mut self) -> Vec<RecordedRequest> {
        if let Some(handle) = self.handle.take() {
            handle.join().expect("join mock server");
        }
        self.requests.lock().expect("lock requests").clone()
    }
}

/// Serves forever on a detached thread; for tests that must outpace the
/// server rather than drain a fixed request count.
fn spawn_endless_runtime<F>(responder: F) -> String
where
    F: Fn(&str, &str) -> String + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
    let addr = listener.local_addr().expect("local addr");
    thread::spawn(move || loop {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let request = read_request(&stream);
        write_response(&mut stream, &responder(&request.method, &request.path));
    });
    format!("http://{}", addr)
}

fn requires_action_run() -> String {
    r#"{
        "id": "run-1",
        "status": "requires_action",
        "required_action": {
            "type": "submit_tool_outputs",
            "submit_tool_outputs": {
                "tool_calls": [{
                    "id": "call-1",
                    "function": {
                        "name": "submit_onboarding_data",
                        "arguments": "{\"tenantId\":\"org-1\"}"
                    }
                }]
            }
        }
    }"#
    .to_string()
}

#[derive(Default)]
struct RecordingHandler {
    calls: Vec<FunctionCall>,
}

impl FunctionHandler for RecordingHandler {
    fn handle(&mut self, _id: FunctionId, call: &FunctionCall) -> String {
        self.calls.push(call.clone());
        r#"{"success":true,"message":"stored"}"#.to_string()
    }
}

#[test]
fn agent_api_module_send_turn_resumes_tool_calls_and_reads_the_reply() {
    let server = MockRuntimeServer::start(4, Duration::ZERO, |method, path| {
        if path.contains("/submit_tool_outputs") {
            r#"{"id":"run-1","status":"completed"}"#.to_string()
        } else if path.contains("/runs") {
            requires_action_run()
        } else if method == "POST" {
            r#"{"id":"msg-1"}"#.to_string()
        } else {
            r#"{"data":[{"id":"m1","role":"assistant","content":[{"type":"text","text":{"value":"All set!"}}]}]}"#
                .to_string()
        }
    });

    let client = AgentApiClient::new(&server.base_url, "service-token");
    let registry = FunctionRegistry::with_defaults();
    let mut handler = RecordingHandler::default();

    let reply = send_turn(
        &client,
        &registry,
        &mut handler,
        "thread-1",
        "agent-9",
        "user",
        "yes, submit it",
    )
    .expect("turn");
    assert_eq!(reply, "All set!");

    assert_eq!(handler.calls.len(), 1);
    assert_eq!(handler.calls[0].name, "submit_onboarding_data");
    assert_eq!(handler.calls[0].args["tenantId"], "org-1");

    let requests = server.finish();
    assert_eq!(requests.len(), 4);
    assert!(requests
        .iter()
        .all(|r| r.auth_header == "Bearer service-token"));
    assert_eq!(requests[0].method, "POST");
    assert!(requests[0].path.contains("/threads/thread-1/messages"));
    assert!(requests[0].path.contains("api-version=v1"));

    let submitted: Value = serde_json::from_str(&requests[2].body).expect("outputs body");
    assert_eq!(submitted["tool_outputs"][0]["tool_call_id"], "call-1");
    assert_eq!(
        submitted["tool_outputs"][0]["output"],
        r#"{"success":true,"message":"stored"}"#
    );
}

#[test]
fn agent_api_module_endless_tool_call_rounds_hit_the_run_ceiling() {
    // Every tool-output submission is answered with another requires_action
    // run asking for the same call again.
    let base_url = spawn_endless_runtime(|method, path| {
        if path.contains("/runs") {
            requires_action_run()
        } else if method == "POST" {
            r#"{"id":"msg-1"}"#.to_string()
        } else {
            r#"{"data":[]}"#.to_string()
        }
    });

    let client = AgentApiClient::new(&base_url, "service-token");
    let registry = FunctionRegistry::with_defaults();
    let mut handler = RecordingHandler::default();

    let started = Instant::now();
    let err = send_turn_bounded(
        &client,
        &registry,
        &mut handler,
        "thread-1",
        "agent-9",
        "user",
        "yes",
        1,
    )
    .expect_err("ceiling");
    assert!(matches!(
        err,
        AgentError::RunTimeout { timeout_seconds: 1 }
    ));
    // The ceiling fired; the loop did not spin past it.
    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(!handler.calls.is_empty());
}

#[test]
fn agent_api_module_wait_for_idle_returns_true_once_runs_settle() {
    let server = MockRuntimeServer::start(1, Duration::ZERO, |_, _| {
        r#"{"data":[{"id":"run-1","status":"completed"}]}"#.to_string()
    });
    let client = AgentApiClient::new(&server.base_url, "service-token");

    assert!(wait_for_idle(&client, "thread-1", 5));
    server.finish();
}

#[test]
fn agent_api_module_wait_for_idle_deadline_survives_slow_responses() {
    // One active-run response delayed past the whole budget; the deadline
    // must end the wait without another poll sleep on top.
    let server = MockRuntimeServer::start(1, Duration::from_secs(2), |_, _| {
        r#"{"data":[{"id":"run-1","status":"in_progress"}]}"#.to_string()
    });
    let client = AgentApiClient::new(&server.base_url, "service-token");

    let started = Instant::now();
    assert!(!wait_for_idle(&client, "thread-1", 1));
    assert!(started.elapsed() < Duration::from_millis(2900));
    server.finish();
}
