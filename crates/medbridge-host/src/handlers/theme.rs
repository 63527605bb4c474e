use medbridge_message::Theme;

use crate::error::Result;
use crate::services::Storage;

pub async fn set(storage: &Storage, theme: Theme) -> Result<()> {
    storage.set_theme(theme).await
}
