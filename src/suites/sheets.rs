//! Google Sheets checks backing the student import feature.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::harness::{Check, CheckOutcome, Harness, CheckError};
use crate::infra::google_api::{ApiFailure, ApiReply};
use crate::infra::sheets::{SheetsClient, Spreadsheet, ValueRange};

pub const SUITE_TITLE: &str = "Google Sheets API Testing";

/// Range the student manager imports from.
pub const CLASS_DATA_RANGE: &str = "Class Data!A:H";
pub const PERMISSIONS_RANGE: &str = "Sheet1!A1:Z1000";
pub const INVALID_SHEET_ID: &str = "invalid_sheet_id_12345";
pub const INVALID_SHEET_RANGE: &str = "Sheet1!A:H";

pub fn sheets_suite(client: Arc<SheetsClient>) -> Harness {
    Harness::new(SUITE_TITLE)
        .with_separator_width(60)
        .with_success_message("Google Sheets API is properly configured.")
        .with_check(ApiKeyValidityCheck {
            client: Arc::clone(&client),
        })
        .with_check(DataAccessCheck {
            client: Arc::clone(&client),
        })
        .with_check(PermissionsCheck {
            client: Arc::clone(&client),
        })
        .with_check(InvalidSheetCheck { client })
        .with_success_notes(&[
            "The API key is working correctly",
            "Users can now import student data from Google Sheets",
            "Error handling will provide clear guidance to users",
        ])
        .with_failure_hints(&[
            "Enable Google Sheets API in Google Cloud Console",
            "Ensure the API key has proper permissions",
            "Check if the API key is restricted to specific domains",
        ])
}

// =============================================================================
// API KEY VALIDITY
// =============================================================================

pub struct ApiKeyValidityCheck {
    client: Arc<SheetsClient>,
}

#[async_trait]
impl Check for ApiKeyValidityCheck {
    fn name(&self) -> &str {
        "API Key Validity"
    }

    async fn run(&self) -> Result<CheckOutcome, CheckError> {
        let reply = self.client.get_spreadsheet(self.client.sheet_id()).await?;
        Ok(judge_key_validity(reply))
    }
}

fn judge_key_validity(reply: ApiReply<Spreadsheet>) -> CheckOutcome {
    match reply {
        ApiReply::Success(sheet) => CheckOutcome::passed(format!(
            "📊 Test sheet title: {}",
            sheet.properties.title.as_deref().unwrap_or("Unknown")
        )),
        ApiReply::Failure(failure) if failure.status == 403 => {
            tracing::error!("API key error: {}", failure.message_or_unknown());
            CheckOutcome::unexpected_status(403, failure.message_or_unknown())
        }
        ApiReply::Failure(failure) => {
            tracing::error!("Unexpected response: {}", failure.status);
            CheckOutcome::unexpected_status(failure.status, failure.body)
        }
    }
}

// =============================================================================
// DATA ACCESS
// =============================================================================

pub struct DataAccessCheck {
    client: Arc<SheetsClient>,
}

#[async_trait]
impl Check for DataAccessCheck {
    fn name(&self) -> &str {
        "Sheets Data Access"
    }

    async fn run(&self) -> Result<CheckOutcome, CheckError> {
        let reply = self
            .client
            .get_values(self.client.sheet_id(), CLASS_DATA_RANGE)
            .await?;
        Ok(judge_data_access(reply))
    }
}

fn judge_data_access(reply: ApiReply<ValueRange>) -> CheckOutcome {
    match reply {
        ApiReply::Success(range) if range.row_count() > 0 => {
            let headers = range
                .header()
                .map(|h| format!("{:?}", h))
                .unwrap_or_else(|| "No headers".to_string());
            let sample = range
                .first_data_row()
                .map(|r| format!("{:?}", r))
                .unwrap_or_else(|| "No data rows".to_string());

            tracing::info!(
                "Sheets resolved {} to {}",
                CLASS_DATA_RANGE,
                range.range.as_deref().unwrap_or("an unnamed range")
            );

            CheckOutcome::passed(format!(
                "Successfully retrieved {} rows of data\n   📋 Headers: {}\n   📊 Sample data: {}",
                range.row_count(),
                headers,
                sample
            ))
        }
        ApiReply::Success(_) => CheckOutcome::content_mismatch("no data found in the sheet"),
        ApiReply::Failure(failure) => {
            tracing::error!("Data access failed: {}", failure.message_or_unknown());
            CheckOutcome::unexpected_status(failure.status, failure.message_or_unknown())
        }
    }
}

// =============================================================================
// API PERMISSIONS
// =============================================================================

/// Why a 403 came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionProblem {
    ApiDisabled,
    QuotaExceeded,
    Other(String),
}

impl PermissionProblem {
    pub fn classify(message: &str) -> Self {
        if message.contains("API has not been used") {
            PermissionProblem::ApiDisabled
        } else if message.to_lowercase().contains("quota") {
            PermissionProblem::QuotaExceeded
        } else {
            PermissionProblem::Other(message.to_string())
        }
    }

    pub fn describe(&self) -> String {
        match self {
            PermissionProblem::ApiDisabled => {
                "Google Sheets API is not enabled for this project (enable it in Google Cloud Console)"
                    .to_string()
            }
            PermissionProblem::QuotaExceeded => "API quota exceeded".to_string(),
            PermissionProblem::Other(message) => format!("Permission error: {}", message),
        }
    }
}

pub struct PermissionsCheck {
    client: Arc<SheetsClient>,
}

#[async_trait]
impl Check for PermissionsCheck {
    fn name(&self) -> &str {
        "API Permissions"
    }

    async fn run(&self) -> Result<CheckOutcome, CheckError> {
        let reply = self
            .client
            .get_values(self.client.sheet_id(), PERMISSIONS_RANGE)
            .await?;
        Ok(judge_permissions(reply))
    }
}

fn judge_permissions(reply: ApiReply<ValueRange>) -> CheckOutcome {
    match reply {
        ApiReply::Success(_) => CheckOutcome::passed("API has proper read permissions"),
        ApiReply::Failure(failure) if failure.status == 403 => {
            let problem = PermissionProblem::classify(failure.message().unwrap_or(""));
            tracing::error!("{}", problem.describe());
            CheckOutcome::unexpected_status(403, problem.describe())
        }
        ApiReply::Failure(ApiFailure { status, body, .. }) => {
            tracing::error!("Unexpected response: {}", status);
            CheckOutcome::unexpected_status(status, body)
        }
    }
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

/// Asking for a sheet that does not exist must produce a clean 400 or 404.
pub struct InvalidSheetCheck {
    client: Arc<SheetsClient>,
}

#[async_trait]
impl Check for InvalidSheetCheck {
    fn name(&self) -> &str {
        "Error Handling"
    }

    async fn run(&self) -> Result<CheckOutcome, CheckError> {
        let reply = self
            .client
            .get_values(INVALID_SHEET_ID, INVALID_SHEET_RANGE)
            .await;

        // A 400/404 body may not be a ValueRange-shaped error; only the
        // status matters here.
        Ok(match reply {
            Ok(reply) => judge_invalid_sheet(reply),
            Err(CheckError::Decode(msg)) => {
                CheckOutcome::content_mismatch(format!("invalid sheet id returned 200: {}", msg))
            }
            Err(other) => return Err(other),
        })
    }
}

fn judge_invalid_sheet(reply: ApiReply<ValueRange>) -> CheckOutcome {
    match reply {
        ApiReply::Failure(failure) if failure.status == 400 => {
            CheckOutcome::passed("Properly handles invalid sheet ID")
        }
        ApiReply::Failure(failure) if failure.status == 404 => {
            CheckOutcome::passed("Properly handles non-existent sheet")
        }
        ApiReply::Failure(failure) => {
            tracing::warn!("Unexpected response for invalid sheet: {}", failure.status);
            CheckOutcome::unexpected_status(failure.status, failure.body)
        }
        ApiReply::Success(_) => {
            tracing::warn!("Unexpected response for invalid sheet: 200");
            CheckOutcome::unexpected_status(200, "invalid sheet id was accepted")
        }
    }
}
