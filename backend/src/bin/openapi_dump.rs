//! Print the OpenAPI document as JSON.

use std::io::Write;
use std::process::ExitCode;

use explorer::ApiDoc;
use utoipa::OpenApi;

fn main() -> ExitCode {
    let json = match ApiDoc::openapi().to_pretty_json() {
        Ok(json) => json,
        Err(err) => {
            let _ = writeln!(std::io::stderr(), "failed to render OpenAPI document: {err}");
            return ExitCode::FAILURE;
        }
    };
    match writeln!(std::io::stdout(), "{json}") {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
