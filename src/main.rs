use std::sync::Arc;

use healthsync::api::{self, ApiContext};
use healthsync::calendar::{CalendarProvider, GoogleCalendarClient, StubCalendar};
use healthsync::config::{self, AppConfig};
use healthsync::gateway::{ExtractionGateway, GeminiClient};
use healthsync::store::JsonFileRepository;

#[tokio::main]
async fn main() {
    healthsync::init_tracing();

    let config = AppConfig::from_env();
    tracing::info!(
        version = config::APP_VERSION,
        record_path = %config.record_path.display(),
        "HealthSync starting"
    );

    let repository = Arc::new(JsonFileRepository::new(&config.record_path));

    let client = Arc::new(GeminiClient::new(
        &config.gemini_base_url,
        &config.gemini_model,
        &config.gemini_api_key,
    ));
    let gateway = Arc::new(ExtractionGateway::new(client));

    // Provider selection happens once here, from configuration, never per
    // request.
    let calendar: Arc<dyn CalendarProvider> = match &config.calendar_token {
        Some(token) => {
            tracing::info!("Calendar provider: Google Calendar");
            Arc::new(GoogleCalendarClient::new(&config.calendar_base_url, token))
        }
        None => {
            tracing::info!("Calendar provider: in-memory stub (no credentials configured)");
            Arc::new(StubCalendar::new())
        }
    };

    let ctx = ApiContext::new(repository, gateway, calendar, config.auth.clone());

    if let Err(e) = api::server::serve(config.bind_addr, ctx).await {
        tracing::error!(error = %e, "Server terminated");
        std::process::exit(1);
    }
}
