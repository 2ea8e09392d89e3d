use crate::api::validation::validate_scan_request;
use crate::cli::commands::ValidateArgs;
use crate::errors::GatewayError;

pub async fn handle_validate(args: ValidateArgs) -> Result<(), GatewayError> {
    let body = super::read_request_file(&args.request).await?;
    let request = validate_scan_request(&body)?;
    println!(
        "Scan request is valid: {} ({} {})",
        request.name, request.method, request.uri
    );
    Ok(())
}
