//! Fixed catalog data: request categories and the city list.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Filter label meaning "any category".
pub const ALL_CATEGORIES: &str = "Все";

/// City label meaning "anywhere". Requests without a city always match it.
pub const ALL_CITIES: &str = "Россия, все города";

/// Cities offered by the city picker. Free text is accepted as well.
pub const CITIES: &[&str] = &[
    ALL_CITIES,
    "Москва",
    "Санкт-Петербург",
    "Новосибирск",
    "Екатеринбург",
    "Казань",
    "Нижний Новгород",
    "Челябинск",
    "Самара",
    "Омск",
    "Ростов-на-Дону",
    "Уфа",
    "Красноярск",
    "Воронеж",
    "Пермь",
    "Волгоград",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Electronics,
    Design,
    Furniture,
    Education,
    Auto,
    ClothingAndAccessories,
    HobbiesAndLeisure,
    Animals,
    SpareParts,
    KidsGoods,
    RealEstate,
    BeautyAndHealth,
    Other,
}

impl Category {
    /// Display order used by the category picker.
    pub const ALL: [Category; 13] = [
        Category::Electronics,
        Category::Design,
        Category::Furniture,
        Category::Education,
        Category::Auto,
        Category::ClothingAndAccessories,
        Category::HobbiesAndLeisure,
        Category::Animals,
        Category::SpareParts,
        Category::KidsGoods,
        Category::RealEstate,
        Category::BeautyAndHealth,
        Category::Other,
    ];

    /// Label stored in the `category` column.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Electronics => "Электроника",
            Category::Design => "Дизайн",
            Category::Furniture => "Мебель",
            Category::Education => "Образование",
            Category::Auto => "Авто",
            Category::ClothingAndAccessories => "Одежда и аксессуары",
            Category::HobbiesAndLeisure => "Хобби и отдых",
            Category::Animals => "Животные",
            Category::SpareParts => "Запчасти",
            Category::KidsGoods => "Детские товары",
            Category::RealEstate => "Недвижимость",
            Category::BeautyAndHealth => "Красота и здоровье",
            Category::Other => "Другое",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label() == wanted)
            .ok_or_else(|| ValidationError::UnknownCategory(wanted.to_string()))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// Rows written before the list was settled may carry labels that no longer
// exist; they read back as `Other` instead of failing the whole listing.
impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(label.parse().unwrap_or(Category::Other))
    }
}
