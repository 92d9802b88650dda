//! Wire shapes shared by the HTTP API and the client form.
//!
//! Field names are camelCase on the wire except `image_url`, which keeps its
//! historical spelling.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::OperatingDays;

/// Provider profile as read by the form and returned by profile actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProfile {
    pub id: Uuid,
    pub user_id: String,
    #[serde(rename = "image_url", default)]
    pub image_url: Option<String>,
    pub company_name: String,
    pub type_of_provider: String,
    pub phone_number: String,
    pub experience_years: u32,
    pub hourly_rate: u32,
    pub bio: String,
    pub operating_days: OperatingDays,
    pub start_time: String,
    pub end_time: String,
    /// Ids of the services offered, in list order.
    #[serde(default)]
    pub services_offered: Vec<Uuid>,
}

/// A service document with its provider left as a reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub id: Uuid,
    pub provider_id: Uuid,
    #[serde(rename = "image_url")]
    pub image_url: String,
    pub service_name: String,
    pub type_of_service: String,
    pub description: String,
    /// Minutes.
    pub duration: u32,
    pub price: f64,
}

/// A service with its provider reference populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDetail {
    #[serde(flatten)]
    pub service: ServiceRecord,
    pub provider: ProviderProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceInput {
    pub user_id: String,
    #[serde(rename = "image_url")]
    pub image_url: String,
    pub service_name: String,
    pub type_of_service: String,
    pub description: String,
    pub duration: u32,
    pub price: f64,
    pub path: String,
}

/// Partial update of a service; `image_url` is only written when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceInput {
    /// Taken from the URL when the body omits it.
    #[serde(default)]
    pub service_id: Uuid,
    #[serde(rename = "image_url", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub service_name: String,
    pub type_of_service: String,
    pub description: String,
    pub duration: u32,
    pub price: f64,
    pub path: String,
}

/// Payload submitted by the profile form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[serde(default)]
    pub user_id: String,
    #[serde(rename = "image_url", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub company_name: String,
    pub type_of_provider: String,
    pub phone_number: String,
    pub experience_years: u32,
    pub hourly_rate: u32,
    pub bio: String,
    pub operating_days: OperatingDays,
    pub start_time: String,
    pub end_time: String,
    pub path: String,
}

/// Provider registration data; registration itself lives outside this system,
/// this shape is used for seeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProvider {
    pub user_id: String,
    pub company_name: String,
    pub type_of_provider: String,
    pub phone_number: String,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default)]
    pub hourly_rate: u32,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub operating_days: OperatingDays,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Weekday;

    #[test]
    fn update_service_without_image_omits_field() {
        let input = UpdateServiceInput {
            service_id: Uuid::nil(),
            image_url: None,
            service_name: "Deep clean".into(),
            type_of_service: "Cleaning".into(),
            description: "Whole house".into(),
            duration: 120,
            price: 50.0,
            path: "/services".into(),
        };
        let v = serde_json::to_value(&input).unwrap();
        assert!(v.get("image_url").is_none());
        assert_eq!(v["serviceName"], "Deep clean");
    }

    #[test]
    fn profile_payload_uses_form_field_names() {
        let json = serde_json::json!({
            "userId": "user_1",
            "image_url": "https://cdn.example.com/a.png",
            "companyName": "Acme",
            "typeOfProvider": "Plumbing",
            "phoneNumber": "+63 912 345 6789",
            "experienceYears": 4,
            "hourlyRate": 300,
            "bio": "We fix pipes",
            "operatingDays": ["Monday", "Wednesday"],
            "startTime": "08:00",
            "endTime": "17:00",
            "path": "/profile"
        });
        let input: UpdateProfileInput = serde_json::from_value(json).unwrap();
        assert_eq!(input.image_url.as_deref(), Some("https://cdn.example.com/a.png"));
        assert!(input.operating_days.contains(Weekday::Wednesday));
        assert_eq!(input.hourly_rate, 300);
    }

    #[test]
    fn service_detail_flattens_service_fields() {
        let provider_id = Uuid::new_v4();
        let detail = ServiceDetail {
            service: ServiceRecord {
                id: Uuid::new_v4(),
                provider_id,
                image_url: "u".into(),
                service_name: "Tune-up".into(),
                type_of_service: "Auto".into(),
                description: "d".into(),
                duration: 30,
                price: 10.0,
            },
            provider: ProviderProfile {
                id: provider_id,
                user_id: "user_2".into(),
                image_url: None,
                company_name: "Garage".into(),
                type_of_provider: "Auto".into(),
                phone_number: "1234567".into(),
                experience_years: 1,
                hourly_rate: 2,
                bio: "b".into(),
                operating_days: OperatingDays::new(),
                start_time: "09:00".into(),
                end_time: "18:00".into(),
                services_offered: vec![],
            },
        };
        let v = serde_json::to_value(&detail).unwrap();
        assert_eq!(v["serviceName"], "Tune-up");
        assert_eq!(v["provider"]["companyName"], "Garage");
        let back: ServiceDetail = serde_json::from_value(v).unwrap();
        assert_eq!(back, detail);
    }
}
