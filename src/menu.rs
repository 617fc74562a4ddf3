//! Menu Builder: the four reply keyboards, precomputed once from the catalog.
//!
//! A [`Menu`] is only the ordered list of button texts; turning it into a
//! Telegram keyboard is the transport's job (see `bot::transport`).

use std::collections::HashMap;

use crate::catalog::Catalog;
use crate::labels::LabelSet;

/// Ordered button texts of one reply keyboard
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Menu {
    pub choices: Vec<String>,
}

impl Menu {
    pub fn new(choices: Vec<String>) -> Self {
        Self { choices }
    }

    pub fn contains(&self, choice: &str) -> bool {
        self.choices.iter().any(|c| c == choice)
    }
}

/// Every keyboard the bot can show
#[derive(Debug, Clone, Default)]
pub struct Menus {
    /// Promoted cities, then "other cities", then "ad"
    pub main: Menu,
    /// Provinces ascending, then "back"
    pub provinces: Menu,
    /// Per province: its cities ascending, then "other cities"
    pub province_cities: HashMap<String, Menu>,
    /// Ads in scan order, then "back"
    pub ads: Menu,
}

impl Menus {
    pub fn build(catalog: &Catalog, labels: &LabelSet, promoted_cities: &[String]) -> Self {
        let main = Menu::new(
            catalog
                .promoted(promoted_cities)
                .iter()
                .map(|city| labels.city_label(city))
                .chain([labels.other_cities.clone(), labels.ad.clone()])
                .collect(),
        );

        let provinces = Menu::new(
            catalog
                .provinces()
                .map(|(province, _)| labels.province_label(province))
                .chain([labels.back.clone()])
                .collect(),
        );

        let province_cities = catalog
            .provinces()
            .map(|(province, cities)| {
                let menu = Menu::new(
                    cities
                        .iter()
                        .map(|city| labels.city_label(city))
                        .chain([labels.other_cities.clone()])
                        .collect(),
                );
                (province.to_string(), menu)
            })
            .collect();

        let ads = Menu::new(
            catalog
                .ads()
                .iter()
                .map(|ad| labels.ad_label(&ad.name))
                .chain([labels.back.clone()])
                .collect(),
        );

        Self {
            main,
            provinces,
            province_cities,
            ads,
        }
    }

    pub fn for_province(&self, province: &str) -> Option<&Menu> {
        self.province_cities.get(province)
    }
}
