use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for a repository scan.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub access_token: String,
    pub repo_name: String,
}

#[derive(Debug, Serialize)]
pub struct ScanOutcome {
    pub status: String,
    pub data: Value,
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub message: String,
    pub response: ScanOutcome,
}

#[derive(Debug, Serialize)]
pub struct ScanErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scan_response_shape() {
        let response = ScanResponse {
            message: "Scan completed successfully".into(),
            response: ScanOutcome {
                status: "completed".into(),
                data: json!({"score": 5}),
            },
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["response"]["status"], "completed");
        assert_eq!(value["response"]["data"]["score"], 5);
    }
}
