//! Dispatcher: classifies one incoming text into the action the bot takes.
//!
//! Routing is stateless. Every text is matched against the full label set and
//! catalog, so a city button resolves to that city no matter which keyboard
//! the user saw last.

use crate::catalog::Catalog;
use crate::labels::LabelSet;
use crate::text_processing::split_prefix;

/// What to do with an incoming text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// "other cities" was tapped
    ShowProvinces,
    /// "back" was tapped
    ShowMain,
    /// "ad" was tapped
    ShowAds,
    /// Send the list image of a city
    CityList(String),
    /// Show the city keyboard of a province
    ProvinceCities(String),
    /// Send an ad
    Ad(String),
    /// Nothing matched
    Invalid,
}

/// Classify already normalized text.
///
/// Order: sentinels, then prefixed identifiers, then bare city or province names.
/// Prefixed identifiers are not checked here; delivery rejects unknown ones.
pub fn route(text: &str, labels: &LabelSet, catalog: &Catalog) -> Route {
    if text == labels.other_cities {
        return Route::ShowProvinces;
    }
    if text == labels.back {
        return Route::ShowMain;
    }
    if text == labels.ad {
        return Route::ShowAds;
    }

    let Some((prefix, entity)) = split_prefix(text) else {
        return Route::Invalid;
    };

    if prefix == labels.city_prefix {
        Route::CityList(entity)
    } else if prefix == labels.province_prefix {
        Route::ProvinceCities(entity)
    } else if prefix == labels.ad_prefix {
        Route::Ad(entity)
    } else if catalog.has_city(text) {
        Route::CityList(text.to_string())
    } else if catalog.has_province(text) {
        Route::ProvinceCities(text.to_string())
    } else {
        Route::Invalid
    }
}
