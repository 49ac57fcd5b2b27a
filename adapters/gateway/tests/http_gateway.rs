use adaptive_defence_core::{
    BoardSnapshot, CellCoord, Outcome, PlanRequest, Reward, TowerSnapshot, TowerId, TowerView,
    WaveTier,
};
use adaptive_defence_gateway::{AttackAdvisor, GatewayConfig, GatewayError, HttpGateway};
use serde_json::{json, Value};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};

struct CapturedRequest {
    request_line: String,
    body: Value,
}

/// Serves exactly one canned response and hands back what the client sent.
async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let address = listener.local_addr().expect("stub address");
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut buffer = Vec::new();
        let mut chunk = [0_u8; 1024];
        let header_end = loop {
            let read = stream.read(&mut chunk).await.expect("read request");
            assert!(read > 0, "client closed before sending headers");
            buffer.extend_from_slice(&chunk[..read]);
            if let Some(position) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
                break position + 4;
            }
        };
        let headers = String::from_utf8_lossy(&buffer[..header_end]).to_string();
        let content_length = headers
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        while buffer.len() < header_end + content_length {
            let read = stream.read(&mut chunk).await.expect("read body");
            assert!(read > 0, "client closed before sending body");
            buffer.extend_from_slice(&chunk[..read]);
        }
        let raw_body = &buffer[header_end..header_end + content_length];
        let captured_body = if raw_body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(raw_body).expect("json body")
        };

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        stream.shutdown().await.expect("shutdown");

        CapturedRequest {
            request_line: headers.lines().next().unwrap_or_default().to_owned(),
            body: captured_body,
        }
    });
    (format!("http://{address}"), handle)
}

fn gateway(base_url: String) -> HttpGateway {
    HttpGateway::new(&GatewayConfig {
        base_url,
        request_timeout_ms: 2_000,
    })
    .expect("client builds")
}

fn plan_request() -> PlanRequest {
    PlanRequest {
        towers: vec![CellCoord::new(2, 3), CellCoord::new(5, 1)],
        round: 4,
    }
}

#[tokio::test]
async fn plan_request_posts_towers_and_round() {
    let (base_url, served) = serve_once("200 OK", r#"{"attack_row": 3, "wave_type": 1}"#).await;

    let plan = gateway(base_url)
        .request_plan(&plan_request())
        .await
        .expect("plan");

    assert_eq!(plan.spawn_row(), 3);
    assert_eq!(plan.tier(), WaveTier::Normal);
    let captured = served.await.expect("stub task");
    assert_eq!(captured.request_line, "POST /ai/next_wave HTTP/1.1");
    assert_eq!(captured.body, json!({ "towers": [[2, 3], [5, 1]], "round": 4 }));
}

#[tokio::test]
async fn out_of_range_plan_is_rejected() {
    let (base_url, served) = serve_once("200 OK", r#"{"attack_row": 9, "wave_type": 0}"#).await;

    let error = gateway(base_url)
        .request_plan(&plan_request())
        .await
        .expect_err("plan must be rejected");

    assert!(matches!(
        error,
        GatewayError::InvalidPlan {
            attack_row: 9,
            wave_type: 0
        }
    ));
    let _ = served.await.expect("stub task");
}

#[tokio::test]
async fn unreadable_plan_is_malformed() {
    let (base_url, served) = serve_once("200 OK", r#"{"attack_row": "north"}"#).await;

    let error = gateway(base_url)
        .request_plan(&plan_request())
        .await
        .expect_err("plan must be rejected");

    assert!(matches!(error, GatewayError::Malformed(_)));
    let _ = served.await.expect("stub task");
}

#[tokio::test]
async fn server_error_status_is_reported() {
    let (base_url, served) =
        serve_once("500 Internal Server Error", r#"{"error": "boom"}"#).await;

    let error = gateway(base_url)
        .request_plan(&plan_request())
        .await
        .expect_err("status must fail");

    assert!(matches!(error, GatewayError::Status { status: 500 }));
    let _ = served.await.expect("stub task");
}

#[tokio::test]
async fn feedback_uses_protocol_shape_and_returns_message() {
    let (base_url, served) = serve_once(
        "200 OK",
        r#"{"message": "Your defense is weak at row 4!"}"#,
    )
    .await;
    let towers = TowerView::from_snapshots(vec![TowerSnapshot {
        id: TowerId::new(0),
        cell: CellCoord::new(0, 0),
    }]);
    let board = BoardSnapshot::capture(&towers);
    let outcome = Outcome {
        reward: Reward::BaseBreached,
        state: board.clone(),
        action_index: 13,
        next_state: board,
        done: true,
        attack_row: 4,
    };

    let message = gateway(base_url)
        .report_outcome(&outcome)
        .await
        .expect("feedback");

    assert_eq!(message, "Your defense is weak at row 4!");
    let captured = served.await.expect("stub task");
    assert_eq!(captured.request_line, "POST /ai/feedback HTTP/1.1");
    assert_eq!(captured.body["reward"], json!(1));
    assert_eq!(captured.body["action_idx"], json!(13));
    assert_eq!(captured.body["attack_row"], json!(4));
    assert_eq!(captured.body["done"], json!(true));
    assert_eq!(captured.body["state"][0], json!(1));
    assert_eq!(captured.body["state"][60], json!(3));
    assert_eq!(captured.body["state"], captured.body["next_state"]);
}

#[tokio::test]
async fn training_trigger_posts_to_train_endpoint() {
    let (base_url, served) = serve_once("200 OK", r#"{"status": "ok"}"#).await;

    gateway(base_url).request_training();

    let captured = served.await.expect("stub task");
    assert_eq!(captured.request_line, "POST /ai/train HTTP/1.1");
}

#[tokio::test]
async fn unreachable_service_is_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let address = listener.local_addr().expect("address");
    drop(listener);

    let error = gateway(format!("http://{address}"))
        .request_plan(&plan_request())
        .await
        .expect_err("nothing listens");

    assert!(matches!(error, GatewayError::Unavailable(_)));
}
