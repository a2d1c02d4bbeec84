use base64::{engine::general_purpose::STANDARD, Engine};
use flowlog_hec::core::TransformedEvent;
use flowlog_hec::{
    BatchEngine, FirehoseRequest, FlowLogError, FlowLogPipeline, RecordResult, TransformerConfig,
};
use std::io::Write;
use tempfile::NamedTempFile;

const FIXTURE: &str = include_str!("fixtures/firehose_event.json");

fn engine(config: &TransformerConfig) -> BatchEngine<FlowLogPipeline> {
    BatchEngine::new(FlowLogPipeline::new(config), config).unwrap()
}

fn decode_event(data: &str) -> TransformedEvent {
    let payload = STANDARD.decode(data).unwrap();
    assert_eq!(payload.last(), Some(&b'\n'));
    serde_json::from_slice(&payload).unwrap()
}

#[test]
fn test_fixture_batch_end_to_end() {
    let config = TransformerConfig::default();
    let request = FirehoseRequest::from_slice(FIXTURE.as_bytes()).unwrap();
    let ids: Vec<String> = request.records.iter().map(|r| r.record_id.clone()).collect();

    let response = engine(&config).handle(request).unwrap();

    let response_ids: Vec<&str> = response
        .records
        .iter()
        .map(|r| r.record_id.as_str())
        .collect();
    assert_eq!(response_ids, ids);

    let results: Vec<RecordResult> = response.records.iter().map(|r| r.result).collect();
    assert_eq!(
        results,
        vec![
            RecordResult::Ok,
            RecordResult::Ok,
            RecordResult::Dropped,
            RecordResult::ProcessingFailed,
            RecordResult::Ok,
        ]
    );

    let first = decode_event(response.records[0].data.as_deref().unwrap());
    assert_eq!(first.time, 1643160732);
    assert_eq!(first.sourcetype, "aws:cloudwatchlogs:vpcflow");
    assert_eq!(first.event["src_ip"], "10.30.2.238");
    assert_eq!(first.event["dest_ip"], "10.30.1.217");
    assert_eq!(first.event["src_port"], 8089);
    assert_eq!(first.event["dest_port"], 39016);
    assert_eq!(first.event["bytes"], 10527);
    assert_eq!(first.event["start_time"], "2022-01-26T01:32:12Z");
}

#[test]
fn test_response_wire_format() {
    let config = TransformerConfig::default();
    let request = FirehoseRequest::from_slice(FIXTURE.as_bytes()).unwrap();
    let response = engine(&config).handle(request).unwrap();

    let wire = serde_json::to_value(&response).unwrap();
    let records = wire["records"].as_array().unwrap();

    assert_eq!(records[0]["result"], "Ok");
    assert!(records[0]["data"].is_string());

    // Dropped / ProcessingFailed 不帶 data，也不洩漏內部 cause
    for record in &records[2..4] {
        let keys: Vec<&String> = record.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2, "unexpected keys in {}", record);
        assert!(record.get("data").is_none());
        assert!(record.get("cause").is_none());
    }
    assert_eq!(records[2]["result"], "Dropped");
    assert_eq!(records[3]["result"], "ProcessingFailed");
}

#[test]
fn test_configuration_flows_into_payload() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"
[destination]
source = "firehose:vpc-prod"
sourcetype = "aws:vpcflow"
index = "network"

[fields]
src_addr = "src"
dst_addr = "dest"
"#,
    )
    .unwrap();

    let config = TransformerConfig::from_file(file.path()).unwrap();
    let request = FirehoseRequest::from_slice(FIXTURE.as_bytes()).unwrap();
    let response = engine(&config).handle(request).unwrap();

    let event = decode_event(response.records[1].data.as_deref().unwrap());
    assert_eq!(event.source, "firehose:vpc-prod");
    assert_eq!(event.sourcetype, "aws:vpcflow");
    assert_eq!(event.index.as_deref(), Some("network"));
    assert_eq!(event.event["src"], "52.94.228.178");
    assert_eq!(event.event["dest"], "10.30.2.238");
    assert!(!event.event.contains_key("src_ip"));
}

#[test]
fn test_malformed_batches_fail_the_invocation() {
    let cases: [&[u8]; 4] = [
        b"not json",
        br#"{"records": "nope"}"#,
        br#"[{"recordId": "a", "data": ""}]"#,
        br#"{"records": [{"recordId": 7, "data": ""}]}"#,
    ];

    for body in cases {
        match FirehoseRequest::from_slice(body) {
            Err(FlowLogError::BatchStructureError { .. }) => {}
            other => panic!(
                "expected batch structure error for {}, got {:?}",
                String::from_utf8_lossy(body),
                other
            ),
        }
    }
}

#[test]
fn test_duplicate_record_ids_are_processed_per_record() {
    let mut request = FirehoseRequest::from_slice(FIXTURE.as_bytes()).unwrap();
    for record in &mut request.records {
        record.record_id = "dup".to_string();
    }

    let response = engine(&TransformerConfig::default()).handle(request).unwrap();

    assert_eq!(response.records.len(), 5);
    assert!(response.records.iter().all(|r| r.record_id == "dup"));
    assert_eq!(response.records[0].result, RecordResult::Ok);
    assert_eq!(response.records[2].result, RecordResult::Dropped);
    assert_eq!(response.records[3].result, RecordResult::ProcessingFailed);
}
