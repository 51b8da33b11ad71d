use aws_config::BehaviorVersion;
use himaya::adapters::secrets::load_api_key;
use himaya::core::{GatewayEvent, InvocationContext, ResponseEnvelope};
use himaya::utils::{logger, validation::Validate};
use himaya::{
    BreachTable, HibpClient, LambdaConfig, LocalStorage, PaymentHookHandler, S3Storage, Settings,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;
use tracing::Instrument;

async fn function_handler(
    handler: &PaymentHookHandler<HibpClient>,
    event: LambdaEvent<GatewayEvent>,
) -> Result<ResponseEnvelope, Error> {
    let context = InvocationContext::from(&event.context);
    let span = logger::invocation_span("payment_hook", &context.aws_request_id);

    Ok(handler.handle(event.payload, context).instrument(span).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let settings = Settings::load()?;
    settings.validate()?;
    let lambda_config = LambdaConfig::from_env()?;
    lambda_config.validate()?;

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;

    // 外洩資料表在程序生命週期內只載入一次
    let table = match &lambda_config.breach_table_bucket {
        Some(bucket) => {
            let storage = S3Storage::new(aws_sdk_s3::Client::new(&aws_config), bucket.clone());
            BreachTable::load(&storage, &lambda_config.breach_table_key).await?
        }
        None => BreachTable::load(&LocalStorage::new(String::new()), &settings.breach_table.path).await?,
    };

    let mut client = HibpClient::new(&settings.breach_api)?;
    if let Some(secret_id) = &lambda_config.api_key_secret_id {
        let secrets = aws_sdk_secretsmanager::Client::new(&aws_config);
        client = client.with_api_key(load_api_key(&secrets, secret_id).await?);
    } else if let Ok(key) = std::env::var("HIBP_API_KEY") {
        client = client.with_api_key(key.into());
    } else if settings.breach_api.api_key.is_none() {
        tracing::warn!("⚠️ No breach API key configured; lookups will be rejected upstream");
    }

    let handler = PaymentHookHandler::new(client, Arc::new(table));

    run(service_fn(|event| function_handler(&handler, event))).await
}
