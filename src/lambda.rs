use coffee_architect::proxy::{EnvCredentials, ProxyEvent, ProxyHandler, ProxyResponse};
use coffee_architect::utils::{logger, validation::Validate};
use coffee_architect::ProxyConfig;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

async fn function_handler<C>(
    handler: &ProxyHandler<C>,
    event: LambdaEvent<ProxyEvent>,
) -> Result<ProxyResponse, Error>
where
    C: coffee_architect::domain::ports::CredentialProvider,
{
    tracing::info!(
        request_id = %event.context.request_id,
        "Proxying {} request",
        event.payload.http_method
    );
    Ok(handler.handle(&event.payload).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // OPENAI_* and ALLOWED_ORIGIN come from the function environment
    let config = ProxyConfig::from_env();
    config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let credentials = EnvCredentials::new(config.api_key_env.clone());
    let handler = ProxyHandler::new(config, credentials)
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    tracing::info!("AI proxy function ready");
    let handler = &handler;
    run(service_fn(move |event: LambdaEvent<ProxyEvent>| async move {
        function_handler(handler, event).await
    }))
    .await
}
