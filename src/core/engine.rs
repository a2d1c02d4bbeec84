use crate::core::{
    ConfigProvider, Decoded, FirehoseRequest, FirehoseResponse, InputRecord, OutputRecord,
    Pipeline, RecordResult,
};
use crate::utils::error::{Result, TransformError};
use base64::{engine::general_purpose::STANDARD, Engine};
use rayon::prelude::*;
use std::time::{Duration, Instant};

// `{"records":[` + `]}`
const RESPONSE_FRAMING: usize = 14;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub ok: usize,
    pub dropped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_records(records: &[OutputRecord]) -> Self {
        records.iter().fold(
            Self {
                total: records.len(),
                ..Self::default()
            },
            |mut summary, record| {
                match record.result {
                    RecordResult::Ok => summary.ok += 1,
                    RecordResult::Dropped => summary.dropped += 1,
                    RecordResult::ProcessingFailed => summary.failed += 1,
                }
                summary
            },
        )
    }
}

pub struct BatchEngine<P: Pipeline> {
    pipeline: P,
    pool: rayon::ThreadPool,
    max_response_bytes: usize,
    timeout: Duration,
}

impl<P: Pipeline> BatchEngine<P> {
    pub fn new<C: ConfigProvider>(pipeline: P, config: &C) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads())
            .thread_name(|index| format!("flowlog-worker-{}", index))
            .build()?;

        tracing::debug!(
            "Worker pool ready with {} threads",
            pool.current_num_threads()
        );

        Ok(Self {
            pipeline,
            pool,
            max_response_bytes: config.max_response_bytes(),
            timeout: Duration::from_millis(config.timeout_ms()),
        })
    }

    pub fn handle(&self, request: FirehoseRequest) -> Result<FirehoseResponse> {
        tracing::info!(
            invocation_id = request.invocation_id.as_deref().unwrap_or("-"),
            delivery_stream = request.delivery_stream_arn.as_deref().unwrap_or("-"),
            "Processing batch of {} records",
            request.records.len()
        );

        let started = Instant::now();
        let records = self.process(&request.records)?;
        let elapsed = started.elapsed();

        let summary = BatchSummary::from_records(&records);
        tracing::info!(
            "✅ Batch complete: {} total, {} ok, {} dropped, {} failed in {:?}",
            summary.total,
            summary.ok,
            summary.dropped,
            summary.failed,
            elapsed
        );
        if elapsed > self.timeout {
            tracing::warn!(
                "⚠️ Batch took {:?}, longer than the configured {:?} ceiling",
                elapsed,
                self.timeout
            );
        }

        Ok(FirehoseResponse { records })
    }

    /// 平行處理每筆記錄，輸出順序與輸入一致
    pub fn process(&self, records: &[InputRecord]) -> Result<Vec<OutputRecord>> {
        let outputs: Vec<OutputRecord> = self.pool.install(|| {
            records
                .par_iter()
                .map(|record| self.process_record(record))
                .collect()
        });

        self.enforce_response_limit(outputs)
    }

    pub fn process_record(&self, record: &InputRecord) -> OutputRecord {
        let fields = match self.pipeline.decode(record) {
            Ok(Decoded::Flow(fields)) => fields,
            Ok(Decoded::Skip(reason)) => {
                tracing::debug!(record_id = %record.record_id, "Dropped: {}", reason.describe());
                return OutputRecord::dropped(&record.record_id, reason.describe());
            }
            Err(e) => {
                tracing::warn!(record_id = %record.record_id, "Decode failed: {}", e);
                return OutputRecord::failed(&record.record_id, e.to_string());
            }
        };

        match self.pipeline.transform(&fields) {
            Ok(payload) => OutputRecord::ok(&record.record_id, STANDARD.encode(payload)),
            Err(e) => {
                tracing::warn!(record_id = %record.record_id, "Transform failed: {}", e);
                OutputRecord::failed(&record.record_id, e.to_string())
            }
        }
    }

    // 以序列化後的 JSON 長度計算回應大小。每筆記錄先以不帶 data 的形式計入，
    // 再依輸入順序加上 Ok 記錄多出的 data，超過上限者改為 ProcessingFailed
    fn enforce_response_limit(&self, mut records: Vec<OutputRecord>) -> Result<Vec<OutputRecord>> {
        let floors = records
            .iter()
            .map(|record| match record.result {
                RecordResult::Ok => wire_size(&OutputRecord::failed(&record.record_id, "")),
                _ => wire_size(record),
            })
            .collect::<Result<Vec<usize>>>()?;

        let mut projected =
            RESPONSE_FRAMING + records.len().saturating_sub(1) + floors.iter().sum::<usize>();
        if projected > self.max_response_bytes {
            tracing::warn!(
                "⚠️ Record ids alone need {} bytes, above the {} byte response limit",
                projected,
                self.max_response_bytes
            );
        }

        for (record, floor) in records.iter_mut().zip(floors) {
            if record.result != RecordResult::Ok {
                continue;
            }

            let next = projected - floor + wire_size(record)?;
            if next > self.max_response_bytes {
                let cause = TransformError::ResponseTooLarge {
                    projected: next,
                    limit: self.max_response_bytes,
                };
                tracing::warn!(record_id = %record.record_id, "{}", cause);
                *record = OutputRecord::failed(&record.record_id, cause.to_string());
            } else {
                projected = next;
            }
        }

        Ok(records)
    }
}

fn wire_size(record: &OutputRecord) -> Result<usize> {
    Ok(serde_json::to_vec(record)?.len())
}
