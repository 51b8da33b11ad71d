use aws_config::BehaviorVersion;
use aws_sdk_sesv2::config::Region;
use himaya::adapters::ses::SesNotifier;
use himaya::core::{GatewayEvent, InvocationContext, ResponseEnvelope};
use himaya::utils::{logger, validation::Validate};
use himaya::{LambdaConfig, RegisterOrderHandler, Settings};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::Instrument;

async fn function_handler(
    handler: &RegisterOrderHandler<SesNotifier>,
    event: LambdaEvent<GatewayEvent>,
) -> Result<ResponseEnvelope, Error> {
    let context = InvocationContext::from(&event.context);
    let span = logger::invocation_span("register_order", &context.aws_request_id);

    Ok(handler.handle(event.payload, context).instrument(span).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let settings = Settings::load()?;
    settings.validate()?;
    let lambda_config = LambdaConfig::from_env()?;
    lambda_config.validate()?;

    // SES 使用 REGION 指定的區域
    let aws_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(lambda_config.region.clone()))
        .load()
        .await;
    let notifier = SesNotifier::new(
        aws_sdk_sesv2::Client::new(&aws_config),
        settings.notification.clone(),
    );

    let handler = RegisterOrderHandler::new(settings.pricing, notifier);

    run(service_fn(|event| function_handler(&handler, event))).await
}
