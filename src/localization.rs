use anyhow::{Context, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use unic_langid::LanguageIdentifier;

/// Languages shipped under `locales/`
pub const SUPPORTED_LANGUAGES: [&str; 2] = ["en", "fr"];

/// Language used when the sender's language is unknown or unsupported
pub const DEFAULT_LANGUAGE: &str = "en";

/// Localization manager for reply templates
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl std::fmt::Debug for LocalizationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalizationManager")
            .field("languages", &self.bundles.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl LocalizationManager {
    /// Create a manager from the crate's `locales/` directory
    pub fn new() -> Result<Self> {
        Self::from_dir(default_locales_dir())
    }

    /// Create a manager from `<dir>/<lang>/main.ftl` resources
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let mut bundles = HashMap::new();

        for locale_str in SUPPORTED_LANGUAGES {
            let locale: LanguageIdentifier = locale_str.parse()?;
            let bundle = Self::create_bundle(dir.as_ref(), &locale)?;
            bundles.insert(locale_str.to_string(), bundle);
        }

        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(
        dir: &Path,
        locale: &LanguageIdentifier,
    ) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Replies are plain chat text; no bidi isolation marks around arguments
        bundle.set_use_isolating(false);

        let resource_path = dir.join(locale.to_string()).join("main.ftl");
        let content = fs::read_to_string(&resource_path)
            .with_context(|| format!("Failed to read {}", resource_path.display()))?;
        let resource = FluentResource::try_new(content).map_err(|(_, errors)| {
            anyhow::anyhow!("Invalid Fluent resource {}: {:?}", resource_path.display(), errors)
        })?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow::anyhow!("Duplicate Fluent messages: {:?}", errors))?;

        Ok(bundle)
    }

    /// Get a localized message in a specific language
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let bundle = match self
            .bundles
            .get(language)
            .or_else(|| self.bundles.get(DEFAULT_LANGUAGE))
        {
            Some(bundle) => bundle,
            None => return format!("Missing translation: {}", key),
        };

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let fluent_args = args.map(|args| {
            FluentArgs::from_iter(args.iter().map(|(k, v)| (*k, FluentValue::from(*v))))
        });

        let mut errors = vec![];
        bundle
            .format_pattern(pattern, fluent_args.as_ref(), &mut errors)
            .into_owned()
    }

    /// Get a localized message with arguments in a specific language
    pub fn get_message_with_args_in_language(
        &self,
        key: &str,
        language: &str,
        args: &[(&str, &str)],
    ) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message_in_language(key, language, Some(&args_map))
    }

    /// Check if a language is supported
    pub fn is_language_supported(&self, language: &str) -> bool {
        self.bundles.contains_key(language)
    }

    /// Pick the bundle language for a Telegram language code
    pub fn detect_language(&self, language_code: Option<&str>) -> String {
        if let Some(code) = language_code {
            // "fr-FR" -> "fr"
            let lang = code.split('-').next().unwrap_or(DEFAULT_LANGUAGE);
            if self.is_language_supported(lang) {
                return lang.to_string();
            }
        }

        DEFAULT_LANGUAGE.to_string()
    }
}

fn default_locales_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LOCALES_DIR") {
        return PathBuf::from(dir);
    }
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .unwrap_or_else(|_| env!("CARGO_MANIFEST_DIR").to_string());
    Path::new(&manifest_dir).join("locales")
}

/// Create a shared localization manager
pub fn create_localization_manager() -> Result<Arc<LocalizationManager>> {
    Ok(Arc::new(LocalizationManager::new()?))
}

/// Get a localized message in the user's language
pub fn t_lang(localization: &LocalizationManager, key: &str, language_code: Option<&str>) -> String {
    let language = localization.detect_language(language_code);
    localization.get_message_in_language(key, &language, None)
}

/// Get a localized message with arguments in the user's language
pub fn t_args_lang(
    localization: &LocalizationManager,
    key: &str,
    args: &[(&str, &str)],
    language_code: Option<&str>,
) -> String {
    let language = localization.detect_language(language_code);
    localization.get_message_with_args_in_language(key, &language, args)
}
