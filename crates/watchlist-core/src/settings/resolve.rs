//! Layer built-in defaults, the two profile stores and command-line overrides.

use super::{Settings, SettingsError};
use crate::profile_store::{ProfileStores, Store};

/// Items `store` contributes for profile `name`: its `globals` proxy keys, then
/// the profile's own items.
fn store_items(store: &Store, name: &str) -> Vec<(String, String)> {
    let mut items: Vec<(String, String)> = store
        .globals()
        .into_iter()
        .filter(|(key, _)| {
            let low = key.to_lowercase();
            low == "proxyhost" || low == "proxyport"
        })
        .collect();
    items.extend(store.profile_items(name));
    items
}

/// Apply `items` on top of `base`. Every scalar key present in `items` replaces
/// the base value. Custom fields and additional columns found in `items`
/// replace the base mappings as a whole; absent ones keep the base mappings.
fn layer<K, V>(base: Settings, items: &[(K, V)]) -> Result<Settings, SettingsError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut layered = Settings {
        custom_fields: Vec::new(),
        add_cols: Vec::new(),
        ..base.clone()
    };
    for (key, value) in items {
        layered.apply(key.as_ref(), value.as_ref())?;
    }
    if layered.custom_fields.is_empty() {
        layered.custom_fields = base.custom_fields;
    }
    if layered.add_cols.is_empty() {
        layered.add_cols = base.add_cols;
    }
    Ok(layered)
}

/// Built-in defaults, then the store's `globals` proxy keys, then profile `name`.
/// A store without that profile still contributes its globals.
pub fn profile_overlay(store: &Store, name: &str) -> Result<Settings, SettingsError> {
    layer(Settings::default(), &store_items(store, name))
}

/// Merge both stores for profile `name`.
///
/// Every key the local store sets (in `globals` or the profile) wins over the
/// default store; keys it does not mention keep their default-store value.
/// An empty resolved URL becomes `name` itself.
pub fn saved_profile(stores: &ProfileStores, name: &str) -> Result<Settings, SettingsError> {
    let shipped = profile_overlay(&stores.default, name)?;
    let mut settings = layer(shipped, &store_items(&stores.local, name))?;

    if settings.url.is_empty() {
        settings.url = name.to_string();
    }

    Ok(settings)
}

/// Resolve the settings for `identifier` (a profile name or a literal URL) and
/// apply `key=value` overrides on top.
///
/// Overrides replace scalars unconditionally. Custom fields or additional
/// columns given as overrides replace the resolved mapping as a whole.
pub fn resolve(
    stores: &ProfileStores,
    identifier: &str,
    overrides: &[String],
) -> Result<Settings, SettingsError> {
    let settings = saved_profile(stores, identifier)?;
    tracing::debug!(
        identifier,
        saved = stores.is_saved_profile(identifier),
        "resolved stored settings"
    );

    let pairs = overrides
        .iter()
        .map(|arg| {
            arg.split_once('=')
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| SettingsError::MalformedArgument(arg.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    layer(settings, &pairs)
}
