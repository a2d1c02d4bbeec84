#[cfg(feature = "lambda")]
use flowlog_hec::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use flowlog_hec::{BatchEngine, FirehoseRequest, FirehoseResponse, FlowLogPipeline, TransformerConfig};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

#[cfg(feature = "lambda")]
async fn function_handler(
    engine: &BatchEngine<FlowLogPipeline>,
    event: LambdaEvent<serde_json::Value>,
) -> Result<FirehoseResponse, Error> {
    tracing::info!(request_id = %event.context.request_id, "Received Firehose transformation event");

    // 批次本身格式錯誤時整個 invocation 失敗，由 Firehose 決定重試
    let request = FirehoseRequest::from_value(event.payload).map_err(|e| {
        tracing::error!("❌ Rejecting malformed batch: {}", e);
        Box::new(e) as Error
    })?;

    let response = tokio::task::block_in_place(|| engine.handle(request))
        .map_err(|e| Box::new(e) as Error)?;

    Ok(response)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = TransformerConfig::from_env()?;
    config.validate()?;
    logger::init_lambda_logger(&config.logging.level);

    tracing::info!(
        source = %config.destination.source,
        sourcetype = %config.destination.sourcetype,
        log_level = %config.logging.level,
        "Flow log transformer configured"
    );

    let pipeline = FlowLogPipeline::new(&config);
    let engine = BatchEngine::new(pipeline, &config)?;
    let engine = &engine;

    run(service_fn(move |event: LambdaEvent<serde_json::Value>| async move {
        function_handler(engine, event).await
    }))
    .await
}
