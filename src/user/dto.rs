use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Optional profile fields submitted on completion.
#[derive(Debug, Deserialize)]
pub struct CompleteProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub student: bool,
    #[serde(default)]
    pub fresher: bool,
    #[serde(default)]
    pub yoe: i32,
    pub college: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompleteProfileResponse {
    pub message: String,
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_default_to_false() {
        let body: CompleteProfileRequest =
            serde_json::from_str(r#"{"first_name": "Ada"}"#).unwrap();
        assert_eq!(body.first_name.as_deref(), Some("Ada"));
        assert!(!body.student);
        assert!(!body.fresher);
        assert_eq!(body.yoe, 0);
        assert!(body.college.is_none());
    }
}
