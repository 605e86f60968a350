/// Country code used to parameterize catalog searches, queried once at
/// startup.
pub trait CountryCodeProvider {
    fn get(&self) -> String;
}

/// Derives the country from the process locale, `US` when undetectable.
pub struct LocaleCountry;

impl CountryCodeProvider for LocaleCountry {
    fn get(&self) -> String {
        for var in ["LC_ALL", "LC_MESSAGES", "LANG"] {
            if let Ok(value) = std::env::var(var) {
                if let Some(code) = country_from_locale(&value) {
                    return code;
                }
            }
        }
        "US".to_string()
    }
}

/// Extract the territory from a POSIX locale string, e.g. "en_US.UTF-8" ->
/// "US". Locales without a territory ("C", "POSIX") yield `None`.
fn country_from_locale(locale: &str) -> Option<String> {
    let territory = locale.split('_').nth(1)?;
    let code: String = territory
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if code.len() == 2 {
        Some(code.to_ascii_uppercase())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_territory_from_common_locales() {
        assert_eq!(country_from_locale("en_US.UTF-8"), Some("US".to_string()));
        assert_eq!(country_from_locale("el_GR@euro"), Some("GR".to_string()));
        assert_eq!(country_from_locale("de_DE"), Some("DE".to_string()));
    }

    #[test]
    fn territoryless_locales_yield_none() {
        assert_eq!(country_from_locale("C"), None);
        assert_eq!(country_from_locale("POSIX"), None);
        assert_eq!(country_from_locale(""), None);
    }
}
