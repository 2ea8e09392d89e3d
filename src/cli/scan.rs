use std::path::Path;
use crate::api::models::ScanResponse;
use crate::api::validation::validate_scan_request;
use crate::cli::commands::ScanArgs;
use crate::config::load_config;
use crate::errors::GatewayError;
use crate::models::ScanId;
use crate::scan::ScanOrchestrator;

/// One-shot scan outside the HTTP server. Prints the same envelope the API returns.
pub async fn handle_scan(args: ScanArgs) -> Result<(), GatewayError> {
    let body = super::read_request_file(&args.request).await?;
    let request = validate_scan_request(&body)?;
    let config = load_config(args.config.as_deref().map(Path::new)).await?;
    let orchestrator = ScanOrchestrator::from_config(&config).await?;

    let scan_id = ScanId::new();
    let outcome = orchestrator.run(&scan_id, &request).await;

    let response = match &outcome {
        Ok(report) => ScanResponse::completed(scan_id, request.name.clone(), report.clone()),
        Err(e) => ScanResponse::failed(scan_id, request.name.clone(), e),
    };
    println!("{}", serde_json::to_string_pretty(&response)?);

    outcome.map(|_| ())
}
