use attendance_tracker::remote::RemoteClient;
use wiremock::matchers::{body_json, method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_get_records_accepts_script_field_names() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("action", "getRecords"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "records": [
                {
                    "id": "evt-1",
                    "eventId": "evt-1",
                    "date": "2026/10/17",
                    "title": "Support",
                    "checkinTime": "09:00",
                    "checkoutTime": "17:30"
                },
                {
                    "id": "evt-2",
                    "eventId": "evt-2",
                    "date": "2026/10/18",
                    "title": "Support",
                    "checkinTime": "09:15",
                    "checkoutTime": null
                }
            ]
        })))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let records = tokio::task::spawn_blocking(move || RemoteClient::new(&uri).get_records())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(records.len(), 2);
    let first = records[0].clone().into_record().unwrap();
    assert_eq!(first.working_hours, 8.5);
    assert!(records[1].clock_out_time.is_none());
}

#[tokio::test]
async fn test_get_records_without_success_flag() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("action", "getRecords"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "records": [{
                "id": "evt-9",
                "date": "2026/10/18",
                "title": "Support",
                "clockInTime": "13:00",
                "clockOutTime": "15:00"
            }]
        })))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let records = tokio::task::spawn_blocking(move || RemoteClient::new(&uri).get_records())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "evt-9");
    assert_eq!(records[0].clone().into_record().unwrap().working_hours, 2.0);
}

#[tokio::test]
async fn test_get_records_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let result = tokio::task::spawn_blocking(move || RemoteClient::new(&uri).get_records())
        .await
        .unwrap();

    assert!(result.is_err());
}

#[tokio::test]
async fn test_get_records_script_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "message": "calendar not found"
        })))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let err = tokio::task::spawn_blocking(move || RemoteClient::new(&uri).get_records())
        .await
        .unwrap()
        .unwrap_err();

    assert!(err.to_string().contains("calendar not found"));
}

#[tokio::test]
async fn test_check_in_posts_action() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_json(serde_json::json!({
            "action": "checkIn",
            "title": "Inventory"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "record": {
                "id": "evt-9",
                "eventId": "evt-9",
                "date": "2026/10/18",
                "title": "Inventory",
                "checkinTime": "09:00",
                "checkoutTime": null
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let record = tokio::task::spawn_blocking(move || RemoteClient::new(&uri).check_in("Inventory"))
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    assert_eq!(record.event_id.as_deref(), Some("evt-9"));
}

#[tokio::test]
async fn test_check_out_reports_script_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_json(serde_json::json!({
            "action": "checkOut",
            "title": "Inventory",
            "checkoutTime": "18:00",
            "eventId": "evt-9"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(body_json(serde_json::json!({
            "action": "checkOut",
            "title": "Inventory",
            "checkoutTime": "18:00",
            "eventId": "gone"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "message": "no matching check-in"
        })))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let (ok, missing) = tokio::task::spawn_blocking(move || {
        let client = RemoteClient::new(&uri);
        (
            client.check_out("Inventory", "18:00", "evt-9").unwrap(),
            client.check_out("Inventory", "18:00", "gone").unwrap(),
        )
    })
    .await
    .unwrap();

    assert!(ok);
    assert!(!missing);
}
