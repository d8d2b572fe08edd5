//! Product wire shape and canonical normalization.
//!
//! The product API has drifted across app versions: image locations arrive as
//! `frontImagePath` or `frontImageUrl`, size lists as `availableSizes` or
//! `sizeOptions`, ids as strings or numbers, and prices as numbers or
//! currency strings. [`RawProduct`] tolerates every known variant;
//! [`Product`] is the single canonical shape the stores operate on. The
//! conversion happens once, at the ingestion boundary.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// Product object as emitted by `GET /api/Product`.
///
/// Field-name tolerance lives here and nowhere else. Do not hand this type to
/// the stores; convert it with [`Product::from`] first.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    pub price: Price,

    #[serde(default, alias = "frontImagePath", alias = "frontImageUrl")]
    pub front_image: Option<String>,

    #[serde(default, alias = "backImagePath", alias = "backImageUrl")]
    pub back_image: Option<String>,

    #[serde(default, alias = "category", deserialize_with = "optional_opaque_id")]
    pub category_id: Option<String>,

    #[serde(default, alias = "availableSizes", alias = "sizeOptions")]
    pub sizes: Vec<String>,

    #[serde(default)]
    pub is_favorite: bool,

    #[serde(default)]
    pub is_new: bool,

    #[serde(default, alias = "isBestseller")]
    pub is_best_seller: bool,

    /// Preselected quantity carried by reorder flows; absent on catalogue
    /// responses.
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Canonical product shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Opaque image locations, front variant first.
    pub image_refs: Vec<String>,
    pub category: Option<CategoryId>,
    pub sizes: Vec<String>,
    pub is_favorite: bool,
    pub is_new: bool,
    pub is_best_seller: bool,
    /// Preselected quantity for reorder flows; the cart defaults to one.
    pub quantity: Option<u32>,
}

impl From<RawProduct> for Product {
    fn from(raw: RawProduct) -> Self {
        let image_refs = raw
            .front_image
            .into_iter()
            .chain(raw.back_image)
            .filter(|path| !path.trim().is_empty())
            .collect();

        Self {
            id: ProductId::new(raw.id),
            name: raw.name,
            price: raw.price,
            image_refs,
            category: raw.category_id.map(CategoryId::new),
            sizes: raw.sizes,
            is_favorite: raw.is_favorite,
            is_new: raw.is_new,
            is_best_seller: raw.is_best_seller,
            quantity: raw.quantity,
        }
    }
}

/// Accept an id emitted as either a JSON string or a number.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

fn optional_opaque_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}
