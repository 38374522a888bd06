//! Site configuration form
//!
//! The form always produces the complete `_config.yml`; keys it does not
//! know about are not carried over from the existing file.

use serde_yaml::{Mapping, Value};
use site_config::SiteConfig;
use site_store::{Document, DocumentStore};

use crate::Result;
use crate::dashboard::{Dashboard, non_empty};

/// Theme whose extra settings block the form writes
pub const THEME1: &str = "theme1";

/// Generator settings the dashboard always writes
const FIXED_SETTINGS: [(&str, FixedValue); 3] = [
    ("markdown", FixedValue::Str("kramdown")),
    ("paginate", FixedValue::Int(10)),
    ("paginate_path", FixedValue::Str("/posts/page:num/")),
];

#[derive(Clone, Copy)]
enum FixedValue {
    Str(&'static str),
    Int(u64),
}

impl From<FixedValue> for Value {
    fn from(value: FixedValue) -> Self {
        match value {
            FixedValue::Str(s) => Value::from(s),
            FixedValue::Int(n) => Value::from(n),
        }
    }
}

/// Footer switches of the `theme1` block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeFooter {
    pub newsletter_enabled: bool,
    pub newsletter_action: String,
    pub show_wave: bool,
    pub show_social: bool,
}

/// Settings block written when `theme1` is active
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeSettings {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub hero_overlay: f64,
    pub font_heading: String,
    pub font_body: String,
    pub footer: ThemeFooter,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            primary_color: "#6366f1".to_string(),
            secondary_color: "#10b981".to_string(),
            accent_color: "#f59e0b".to_string(),
            hero_overlay: 0.6,
            font_heading: "Ubuntu".to_string(),
            font_body: "Roboto".to_string(),
            footer: ThemeFooter::default(),
        }
    }
}

impl ThemeSettings {
    fn to_mapping(&self) -> Mapping {
        let mut footer = Mapping::new();
        footer.insert("newsletter_enabled".into(), self.footer.newsletter_enabled.into());
        footer.insert(
            "newsletter_action".into(),
            self.footer.newsletter_action.as_str().into(),
        );
        footer.insert("show_wave".into(), self.footer.show_wave.into());
        footer.insert("show_social".into(), self.footer.show_social.into());

        let mut theme = Mapping::new();
        theme.insert("primary_color".into(), self.primary_color.as_str().into());
        theme.insert("secondary_color".into(), self.secondary_color.as_str().into());
        theme.insert("accent_color".into(), self.accent_color.as_str().into());
        theme.insert("hero_overlay".into(), self.hero_overlay.into());
        theme.insert("font_heading".into(), self.font_heading.as_str().into());
        theme.insert("font_body".into(), self.font_body.as_str().into());
        theme.insert("footer".into(), Value::Mapping(footer));
        theme
    }
}

/// Submitted site settings form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteConfigForm {
    pub title: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub baseurl: Option<String>,
    pub url: Option<String>,
    pub author: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// `default` when absent
    pub active_theme: Option<String>,
    pub twitter_username: Option<String>,
    pub github_username: Option<String>,
    pub facebook_username: Option<String>,
    pub instagram_username: Option<String>,
    pub linkedin_username: Option<String>,
    pub google_analytics: Option<String>,
    pub theme: ThemeSettings,
}

impl SiteConfigForm {
    /// Prefill a form from the loaded configuration
    pub fn from_config(config: &SiteConfig) -> Self {
        let text = |key: &str| config.get_str(key).map(str::to_string);
        Self {
            title: text("title"),
            email: text("email"),
            description: text("description"),
            baseurl: text("baseurl"),
            url: text("url"),
            author: text("author"),
            phone: text("phone"),
            address: text("address"),
            active_theme: text("active_theme"),
            twitter_username: text("twitter_username"),
            github_username: text("github_username"),
            facebook_username: text("facebook_username"),
            instagram_username: text("instagram_username"),
            linkedin_username: text("linkedin_username"),
            google_analytics: text("google_analytics"),
            theme: config
                .settings
                .get(THEME1)
                .and_then(Value::as_mapping)
                .map(theme_from_mapping)
                .unwrap_or_default(),
        }
    }

    pub fn active_theme(&self) -> &str {
        non_empty(self.active_theme.as_deref()).unwrap_or("default")
    }

    /// The complete `_config.yml` mapping.
    ///
    /// Blank text fields are left out; `active_theme` is always written and
    /// the `theme1` block only when that theme is active.
    pub fn to_mapping(&self) -> Mapping {
        let text_fields = [
            ("title", &self.title),
            ("email", &self.email),
            ("description", &self.description),
            ("baseurl", &self.baseurl),
            ("url", &self.url),
            ("author", &self.author),
            ("phone", &self.phone),
            ("address", &self.address),
        ];
        let social_fields = [
            ("twitter_username", &self.twitter_username),
            ("github_username", &self.github_username),
            ("facebook_username", &self.facebook_username),
            ("instagram_username", &self.instagram_username),
            ("linkedin_username", &self.linkedin_username),
            ("google_analytics", &self.google_analytics),
        ];

        let mut mapping = Mapping::new();
        for (key, value) in text_fields {
            put_text(&mut mapping, key, value);
        }
        mapping.insert("active_theme".into(), self.active_theme().into());
        for (key, value) in social_fields {
            put_text(&mut mapping, key, value);
        }
        for (key, value) in FIXED_SETTINGS {
            mapping.insert(key.into(), value.into());
        }
        if self.active_theme() == THEME1 {
            mapping.insert(THEME1.into(), Value::Mapping(self.theme.to_mapping()));
        }
        mapping
    }
}

fn put_text(mapping: &mut Mapping, key: &str, value: &Option<String>) {
    if let Some(value) = non_empty(value.as_deref()) {
        mapping.insert(key.into(), value.into());
    }
}

fn theme_from_mapping(mapping: &Mapping) -> ThemeSettings {
    let defaults = ThemeSettings::default();
    let text = |key: &str, default: String| {
        mapping
            .get(key)
            .and_then(Value::as_str)
            .map_or(default, str::to_string)
    };
    let footer = mapping.get("footer").and_then(Value::as_mapping);
    let flag = |key: &str| {
        footer
            .and_then(|f| f.get(key))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    };

    ThemeSettings {
        primary_color: text("primary_color", defaults.primary_color),
        secondary_color: text("secondary_color", defaults.secondary_color),
        accent_color: text("accent_color", defaults.accent_color),
        hero_overlay: mapping
            .get("hero_overlay")
            .and_then(Value::as_f64)
            .unwrap_or(defaults.hero_overlay),
        font_heading: text("font_heading", defaults.font_heading),
        font_body: text("font_body", defaults.font_body),
        footer: ThemeFooter {
            newsletter_enabled: flag("newsletter_enabled"),
            newsletter_action: footer
                .and_then(|f| f.get("newsletter_action"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            show_wave: flag("show_wave"),
            show_social: flag("show_social"),
        },
    }
}

impl<S: DocumentStore> Dashboard<S> {
    /// Current `_config.yml`, empty when absent
    pub fn site_config(&self) -> SiteConfig {
        self.site_config_manager().load()
    }

    /// Write `_config.yml` from the settings form
    pub fn update_site_config(&self, form: &SiteConfigForm) -> Result<Document> {
        let manager = self.site_config_manager();
        let current = manager.load();
        let saved = manager.save(&form.to_mapping(), current.source.as_ref())?;
        Ok(saved)
    }
}
