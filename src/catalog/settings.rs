//! Site-wide settings: contact details, socials, WhatsApp and Telegram.
//!
//! Stored as a single document. Reads before the first save return the
//! defaults below.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::error::CatalogError;
use crate::records::{Document, RecordStore};

const SETTINGS_ID: &str = "site";

const DEFAULT_MAP_URL: &str = "https://www.google.com/maps/embed?pb=!1m18!1m12!1m3!1d3664.116655933491!2d88.24726507604896!3d23.93801257854322!2m3!1f0!2f0!3f0!3m2!1i1024!2i768!4f13.1!3m3!1m2!1s0x39f9adc1e6b7b0a1%3A0x1c3c5a0a5c5a0a0a!2sBeldanga!5e0!3m2!1sen!2sin!4v1625561234567!5m2!1sen!2sin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Socials {
    pub facebook: String,
    pub instagram: String,
    pub twitter: String,
}

impl Default for Socials {
    fn default() -> Self {
        Self {
            facebook: "#".to_string(),
            instagram: "#".to_string(),
            twitter: "#".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Whatsapp {
    /// Country code followed by the number, digits only.
    pub number: String,
    pub message: String,
}

impl Default for Whatsapp {
    fn default() -> Self {
        Self {
            number: "918158926581".to_string(),
            message: "Hi, I'm interested in bulk hair orders.".to_string(),
        }
    }
}

/// Order alert settings. Only stored here; nothing in this service sends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Telegram {
    pub enabled: bool,
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteSettings {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub socials: Socials,
    pub whatsapp: Whatsapp,
    pub telegram: Telegram,
    pub map_url: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            id: SETTINGS_ID.to_string(),
            email: "support@jonyhair.com".to_string(),
            phone: "+91 81589 26581".to_string(),
            address: "Beldanga, Murshidabad, West Bengal, India - 742133".to_string(),
            socials: Socials::default(),
            whatsapp: Whatsapp::default(),
            telegram: Telegram::default(),
            map_url: DEFAULT_MAP_URL.to_string(),
            updated_at: None,
        }
    }
}

impl Document for SiteSettings {
    const COLLECTION: &'static str = "settings";

    fn id(&self) -> &str {
        &self.id
    }
}

impl SiteSettings {
    /// Copy safe to send to anonymous clients: the bot token is blanked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut public = self.clone();
        public.telegram.bot_token.clear();
        public
    }

    /// Builds a `https://wa.me/<number>?text=...` chat link.
    ///
    /// With a product name the message asks about that product, otherwise
    /// the configured default message is used.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] if the configured number has no
    /// digits.
    pub fn whatsapp_link(&self, product_name: Option<&str>) -> Result<Url, CatalogError> {
        let digits: String = self
            .whatsapp
            .number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        if digits.is_empty() {
            return Err(CatalogError::invalid("WhatsApp number is not configured"));
        }

        let text = match product_name.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => format!("Hi, I'm interested in {name}."),
            None => self.whatsapp.message.clone(),
        };

        Url::parse_with_params(&format!("https://wa.me/{digits}"), &[("text", text)])
            .map_err(|err| CatalogError::invalid(format!("Invalid WhatsApp link: {err}")))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SocialsUpdate {
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WhatsappUpdate {
    pub number: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramUpdate {
    pub enabled: Option<bool>,
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
}

/// Partial settings update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub socials: Option<SocialsUpdate>,
    pub whatsapp: Option<WhatsappUpdate>,
    pub telegram: Option<TelegramUpdate>,
    pub map_url: Option<String>,
}

fn set<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

impl SettingsUpdate {
    fn apply(self, settings: &mut SiteSettings) {
        set(&mut settings.email, self.email);
        set(&mut settings.phone, self.phone);
        set(&mut settings.address, self.address);
        set(&mut settings.map_url, self.map_url);

        if let Some(socials) = self.socials {
            set(&mut settings.socials.facebook, socials.facebook);
            set(&mut settings.socials.instagram, socials.instagram);
            set(&mut settings.socials.twitter, socials.twitter);
        }
        if let Some(whatsapp) = self.whatsapp {
            set(&mut settings.whatsapp.number, whatsapp.number);
            set(&mut settings.whatsapp.message, whatsapp.message);
        }
        if let Some(telegram) = self.telegram {
            set(&mut settings.telegram.enabled, telegram.enabled);
            set(&mut settings.telegram.bot_token, telegram.bot_token);
            set(&mut settings.telegram.chat_id, telegram.chat_id);
        }
    }
}

/// Access to the settings singleton.
#[derive(Clone)]
pub struct SettingsStore {
    store: RecordStore,
}

impl SettingsStore {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Saved settings, or the defaults if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] if the read fails.
    pub async fn get(&self) -> Result<SiteSettings, CatalogError> {
        Ok(self
            .store
            .find::<SiteSettings>(SETTINGS_ID)
            .await?
            .unwrap_or_default())
    }

    /// Applies a partial update and saves the result.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] for an email without `@` or a
    /// WhatsApp number without digits, and [`CatalogError::Store`] if the
    /// write fails.
    pub async fn update(&self, update: SettingsUpdate) -> Result<SiteSettings, CatalogError> {
        let mut settings = self.get().await?;
        update.apply(&mut settings);

        if !settings.email.is_empty() && !settings.email.contains('@') {
            return Err(CatalogError::invalid("email must be an email address"));
        }
        settings.whatsapp_link(None)?;
        if settings.telegram.enabled
            && (settings.telegram.bot_token.is_empty() || settings.telegram.chat_id.is_empty())
        {
            return Err(CatalogError::invalid(
                "Telegram alerts need both a bot token and a chat id",
            ));
        }

        settings.id = SETTINGS_ID.to_string();
        settings.updated_at = Some(Utc::now());
        self.store.insert(&settings).await?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SettingsStore {
        SettingsStore::new(RecordStore::memory())
    }

    #[tokio::test]
    async fn test_defaults_before_first_save() {
        let settings = store().get().await.unwrap();
        assert_eq!(settings.whatsapp.number, "918158926581");
        assert_eq!(settings.socials.facebook, "#");
        assert!(!settings.telegram.enabled);
        assert!(settings.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let store = store();
        let updated = store
            .update(SettingsUpdate {
                phone: Some("+91 00000 00000".to_string()),
                whatsapp: Some(WhatsappUpdate {
                    message: Some("Hello".to_string()),
                    number: None,
                }),
                ..SettingsUpdate::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.phone, "+91 00000 00000");
        assert_eq!(updated.whatsapp.message, "Hello");
        assert_eq!(updated.whatsapp.number, "918158926581");
        assert_eq!(updated.email, "support@jonyhair.com");

        let reloaded = store.get().await.unwrap();
        assert_eq!(reloaded, updated);
    }

    #[tokio::test]
    async fn test_telegram_requires_credentials() {
        let err = store()
            .update(SettingsUpdate {
                telegram: Some(TelegramUpdate {
                    enabled: Some(true),
                    ..TelegramUpdate::default()
                }),
                ..SettingsUpdate::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_whatsapp_number_needs_digits() {
        let store = store();
        for number in ["", "n/a"] {
            let err = store
                .update(SettingsUpdate {
                    whatsapp: Some(WhatsappUpdate {
                        number: Some(number.to_string()),
                        ..WhatsappUpdate::default()
                    }),
                    ..SettingsUpdate::default()
                })
                .await
                .unwrap_err();
            assert!(matches!(err, CatalogError::Invalid(_)), "{number:?}");
        }
        assert_eq!(store.get().await.unwrap().whatsapp.number, "918158926581");
    }

    #[test]
    fn test_redacted_hides_bot_token() {
        let mut settings = SiteSettings::default();
        settings.telegram.bot_token = "123:abc".to_string();
        let public = settings.redacted();
        assert!(public.telegram.bot_token.is_empty());

        let json = serde_json::to_value(&public).unwrap();
        assert_eq!(json["telegram"]["botToken"], "");
        assert_eq!(json["mapUrl"], DEFAULT_MAP_URL);
    }

    #[test]
    fn test_whatsapp_link() {
        let mut settings = SiteSettings::default();
        settings.whatsapp.number = "+91 81589-26581".to_string();

        let link = settings.whatsapp_link(Some("Raw Wavy Bundle")).unwrap();
        assert_eq!(link.host_str(), Some("wa.me"));
        assert_eq!(link.path(), "/918158926581");
        let text = link
            .query_pairs()
            .find(|(k, _)| k == "text")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(text, "Hi, I'm interested in Raw Wavy Bundle.");

        let fallback = settings.whatsapp_link(None).unwrap();
        assert!(fallback.query().unwrap().contains("bulk"));
    }

    #[test]
    fn test_whatsapp_link_without_number() {
        let mut settings = SiteSettings::default();
        settings.whatsapp.number = "n/a".to_string();
        assert!(settings.whatsapp_link(None).is_err());
    }
}
