use serde::{Deserialize, Serialize};

mod weekday;
mod outcome;
mod payloads;
mod media;

pub use weekday::{OperatingDays, Weekday, ParseWeekdayError};
pub use outcome::ActionOutcome;
pub use payloads::{
    CreateServiceInput, NewProvider, ProviderProfile, ServiceDetail, ServiceRecord,
    UpdateProfileInput, UpdateServiceInput,
};
pub use media::{MediaFile, UploadedMedia};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}
