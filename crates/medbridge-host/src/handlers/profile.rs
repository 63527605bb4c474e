use medbridge_message::{Ack, UserProfile};

use crate::error::Result;
use crate::services::Storage;

pub async fn save(storage: &Storage, profile: &UserProfile) -> Result<Ack> {
    storage.save_profile(profile).await?;
    Ok(Ack::OK)
}

pub async fn load(storage: &Storage) -> Result<Option<UserProfile>> {
    storage.profile().await
}
