use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::booking::ValidationError;

macro_rules! string_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(ValidationError::Invalid(format!(
                        concat!("Unknown ", stringify!($name), ": {}"),
                        other
                    ))),
                }
            }
        }
    };
}

// ============================================================================
// Comments
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    Pending,
    Approved,
    Rejected,
}

string_enum!(CommentStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub tour_id: Option<String>,
    pub author_name: String,
    pub author_email: String,
    pub body: String,
    pub status: CommentStatus,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Editor,
    Customer,
}

string_enum!(UserRole {
    Admin => "admin",
    Editor => "editor",
    Customer => "customer",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_locked: bool,
    pub password_reset_required: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Gallery
// ============================================================================

pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Stored image; `data` holds the raw bytes and is never serialized directly.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryImage {
    pub id: Uuid,
    pub title: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

impl GalleryImage {
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Gallery image as sent to the client: bytes re-encoded as base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImageView {
    pub id: Uuid,
    pub title: String,
    pub content_type: String,
    pub data: String,
    pub size_bytes: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGalleryImage {
    pub title: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl NewGalleryImage {
    pub fn validate(&self, max_bytes: usize) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Invalid("Image title is required".to_string()));
        }
        if !ALLOWED_IMAGE_TYPES.contains(&self.content_type.as_str()) {
            return Err(ValidationError::Invalid(format!(
                "Unsupported image type: {}",
                self.content_type
            )));
        }
        if self.data.is_empty() {
            return Err(ValidationError::Invalid("Image data is empty".to_string()));
        }
        if self.data.len() > max_bytes {
            return Err(ValidationError::Invalid(format!(
                "Image exceeds {} bytes",
                max_bytes
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Email campaigns
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Scheduled,
    Sent,
}

string_enum!(CampaignStatus {
    Draft => "draft",
    Scheduled => "scheduled",
    Sent => "sent",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailCampaign {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub status: CampaignStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update body for campaigns. Delivery happens elsewhere, so `sent`
/// cannot be set from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDraft {
    pub name: String,
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub status: Option<CampaignStatus>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl CampaignDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() || self.subject.trim().is_empty() {
            return Err(ValidationError::Invalid("Campaign name and subject are required".to_string()));
        }
        match self.status() {
            CampaignStatus::Sent => Err(ValidationError::Invalid(
                "Campaigns are marked sent by the mailer".to_string(),
            )),
            CampaignStatus::Scheduled if self.scheduled_at.is_none() => Err(ValidationError::Invalid(
                "Scheduled campaigns need a send time".to_string(),
            )),
            _ => Ok(()),
        }
    }

    pub fn status(&self) -> CampaignStatus {
        self.status.unwrap_or(CampaignStatus::Draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_enums_parse_case_insensitively() {
        assert_eq!("Approved".parse::<CommentStatus>().unwrap(), CommentStatus::Approved);
        assert_eq!("ADMIN".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(CampaignStatus::Scheduled.to_string(), "scheduled");
        let err = "spam".parse::<CommentStatus>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown CommentStatus: spam");
    }

    #[test]
    fn test_image_validation() {
        let mut image = NewGalleryImage {
            title: "Sunset".to_string(),
            content_type: "image/png".to_string(),
            data: vec![0u8; 16],
        };
        assert!(image.validate(1024).is_ok());
        assert!(image.validate(8).is_err());

        image.content_type = "application/pdf".to_string();
        assert!(image.validate(1024).is_err());
    }

    #[test]
    fn test_campaign_validation() {
        let mut draft = CampaignDraft {
            name: "Spring".to_string(),
            subject: "Gorilla season".to_string(),
            body: String::new(),
            status: Some(CampaignStatus::Scheduled),
            scheduled_at: None,
        };
        assert!(draft.validate().is_err());

        draft.scheduled_at = Some(Utc::now());
        assert!(draft.validate().is_ok());

        draft.status = Some(CampaignStatus::Sent);
        assert!(draft.validate().is_err());
    }
}
