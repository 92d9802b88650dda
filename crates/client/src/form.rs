//! Provider profile form.
//!
//! Holds what the user typed, validates it with the shared field rules before
//! any network call, uploads a pending image and submits the profile update.

use std::collections::BTreeMap;
use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{info, instrument, warn};

use common::media::{is_image_mime, MediaUploader};
use common::types::{MediaFile, OperatingDays, ProviderProfile, UpdateProfileInput, Weekday};
use common::validation::{self, FieldResult};
use common::ActionOutcome;

use crate::gateway::ProfileGateway;

/// A file picked in the image input, not yet uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Inline `data:` URL used as the preview until the upload lands.
    pub fn preview_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }

    fn to_media_file(&self) -> MediaFile {
        MediaFile { name: self.name.clone(), mime_type: self.mime_type.clone(), data: STANDARD.encode(&self.bytes) }
    }
}

/// Raw text of every input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFields {
    pub image_url: String,
    pub company_name: String,
    pub type_of_provider: String,
    pub phone_number: String,
    pub experience_years: String,
    pub hourly_rate: String,
    pub bio: String,
    pub start_time: String,
    pub end_time: String,
}

/// Field name to message. Never sent to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn get(&self, field: &str) -> Option<&str> { self.0.get(field).map(String::as_str) }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn len(&self) -> usize { self.0.len() }

    fn check<T>(&mut self, field: &'static str, res: FieldResult<T>) -> Option<T> {
        match res {
            Ok(v) => Some(v),
            Err(msg) => {
                self.0.insert(field, msg);
                None
            }
        }
    }
}

impl std::error::Error for ValidationErrors {}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k} {v}")).collect();
        f.write_str(&parts.join("; "))
    }
}

/// Validated, typed form values.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileValues {
    /// A durable URL; previews and empty input are `None`.
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
}

impl ProfileValues {
    pub fn into_input(self, user_id: &str, path: &str) -> UpdateProfileInput {
        UpdateProfileInput {
            user_id: user_id.to_string(),
            image_url: self.image_url,
            company_name: self.company_name,
            type_of_provider: self.type_of_provider,
            phone_number: self.phone_number,
            experience_years: self.experience_years,
            hourly_rate: self.hourly_rate,
            bio: self.bio,
            operating_days: self.operating_days,
            start_time: self.start_time,
            end_time: self.end_time,
            path: path.to_string(),
        }
    }
}

/// Result of a submit, shown to the user as a toast.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// A submit is already in flight.
    Busy,
    Invalid(ValidationErrors),
    UploadFailed(String),
    Updated,
    /// The server refused the update, e.g. "company already exists".
    Rejected(String),
    Failed(String),
}

impl Notification {
    pub fn title(&self) -> &'static str {
        match self {
            Notification::Updated => "Profile Updated!",
            Notification::Busy => "Please wait...",
            Notification::Invalid(_) => "Please check the form",
            Notification::UploadFailed(_) => "Image upload failed",
            Notification::Rejected(_) | Notification::Failed(_) => "Something went wrong...",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Notification::Updated => "You have successfully updated your profile.".into(),
            Notification::Busy => "Your profile is still being saved.".into(),
            Notification::Invalid(errors) => errors.to_string(),
            Notification::UploadFailed(msg) => msg.clone(),
            Notification::Rejected(msg) => capitalize(msg),
            Notification::Failed(msg) => format!("Error: {msg}"),
        }
    }

    pub fn is_error(&self) -> bool { !matches!(self, Notification::Updated) }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Clears the loading flag when dropped, including when a submit future is
/// cancelled mid-flight.
struct LoadingGuard<'a>(&'a mut bool);

impl<'a> LoadingGuard<'a> {
    fn set(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) { *self.0 = false; }
}

fn validate_fields(fields: &ProfileFields, days: &OperatingDays) -> Result<ProfileValues, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.check("company_name", validation::company_name(&fields.company_name));
    errors.check("type_of_provider", validation::type_of_provider(&fields.type_of_provider));
    errors.check("phone_number", validation::phone_number(&fields.phone_number));
    errors.check("bio", validation::bio(&fields.bio));
    errors.check("start_time", validation::time_of_day(&fields.start_time));
    errors.check("end_time", validation::time_of_day(&fields.end_time));
    errors.check("image_url", validation::image_url(&fields.image_url));
    let experience_years = errors.check("experience_years", validation::non_negative_int(&fields.experience_years));
    let hourly_rate = errors.check("hourly_rate", validation::non_negative_int(&fields.hourly_rate));

    let (Some(experience_years), Some(hourly_rate)) = (experience_years, hourly_rate) else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    let image = fields.image_url.trim();
    let image_url = (!image.is_empty() && !image.starts_with("data:")).then(|| image.to_string());
    Ok(ProfileValues {
        image_url,
        company_name: fields.company_name.trim().to_string(),
        type_of_provider: fields.type_of_provider.trim().to_string(),
        phone_number: fields.phone_number.trim().to_string(),
        experience_years,
        hourly_rate,
        bio: fields.bio.trim().to_string(),
        operating_days: days.clone(),
        start_time: fields.start_time.trim().to_string(),
        end_time: fields.end_time.trim().to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct ProfileForm {
    user_id: String,
    path: String,
    pub fields: ProfileFields,
    operating_days: OperatingDays,
    pending_file: Option<SelectedFile>,
    is_loading: bool,
}

impl ProfileForm {
    /// Seed the form from the stored profile.
    pub fn from_profile(user_id: &str, path: &str, profile: &ProviderProfile) -> Self {
        let fields = ProfileFields {
            image_url: profile.image_url.clone().unwrap_or_default(),
            company_name: profile.company_name.clone(),
            type_of_provider: profile.type_of_provider.clone(),
            phone_number: profile.phone_number.clone(),
            experience_years: profile.experience_years.to_string(),
            hourly_rate: profile.hourly_rate.to_string(),
            bio: profile.bio.clone(),
            start_time: profile.start_time.clone(),
            end_time: profile.end_time.clone(),
        };
        Self {
            user_id: user_id.to_string(),
            path: path.to_string(),
            fields,
            operating_days: profile.operating_days.clone(),
            pending_file: None,
            is_loading: false,
        }
    }

    pub fn is_loading(&self) -> bool { self.is_loading }

    pub fn operating_days(&self) -> &OperatingDays { &self.operating_days }

    pub fn pending_file(&self) -> Option<&SelectedFile> { self.pending_file.as_ref() }

    /// Check or uncheck exactly `day`.
    pub fn toggle_day(&mut self, day: Weekday, checked: bool) {
        self.operating_days.set(day, checked);
    }

    /// Stage an image for upload and show its preview. Anything that is not
    /// an image is ignored.
    pub fn select_image(&mut self, file: SelectedFile) -> bool {
        if !is_image_mime(&file.mime_type) {
            return false;
        }
        self.fields.image_url = file.preview_url();
        self.pending_file = Some(file);
        true
    }

    pub fn validate(&self) -> Result<ProfileValues, ValidationErrors> {
        validate_fields(&self.fields, &self.operating_days)
    }

    /// Validate, upload a pending image, then send the update.
    #[instrument(skip_all, fields(user_id = %self.user_id))]
    pub async fn submit(&mut self, uploader: &dyn MediaUploader, gateway: &dyn ProfileGateway) -> Notification {
        if self.is_loading {
            return Notification::Busy;
        }
        let _loading = LoadingGuard::set(&mut self.is_loading);

        let mut values = match validate_fields(&self.fields, &self.operating_days) {
            Ok(v) => v,
            Err(errors) => return Notification::Invalid(errors),
        };

        if let Some(file) = self.pending_file.take() {
            let uploaded = uploader.start_upload(vec![file.to_media_file()]).await;
            match uploaded.map(|mut list| (!list.is_empty()).then(|| list.swap_remove(0))) {
                Ok(Some(media)) => {
                    info!(url = %media.url, "profile_image_uploaded");
                    self.fields.image_url = media.url.clone();
                    values.image_url = Some(media.url);
                }
                Ok(None) => {
                    self.pending_file = Some(file);
                    return Notification::UploadFailed("upload returned no file".into());
                }
                Err(e) => {
                    warn!(error = %e, "profile_image_upload_failed");
                    self.pending_file = Some(file);
                    return Notification::UploadFailed(e.to_string());
                }
            }
        }

        let input = values.into_input(&self.user_id, &self.path);
        match gateway.update_profile(input).await {
            Ok(ActionOutcome::Ok(_)) => Notification::Updated,
            Ok(ActionOutcome::Conflict(msg)) | Ok(ActionOutcome::NotFound(msg)) => Notification::Rejected(msg),
            Err(e) => {
                warn!(error = %e, "profile_update_failed");
                Notification::Failed(e.to_string())
            }
        }
    }
}
