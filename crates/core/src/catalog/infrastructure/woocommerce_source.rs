use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::catalog::domain::catalog_entry::FrameCatalogEntry;
use crate::catalog::domain::catalog_source::{CatalogError, CatalogSource};
use crate::classification::domain::face_shape::FrameStyle;
use crate::compositing::domain::frame_asset::FrameMeasurements;
use crate::shared::constants::{CATALOG_PAGE_SIZE, WOOCOMMERCE_PRODUCTS_PATH};

/// REST API consumer key and secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WooCommerceCredentials {
    pub key: String,
    pub secret: String,
}

impl WooCommerceCredentials {
    /// `None` unless both halves are non-empty.
    pub fn from_parts(key: Option<String>, secret: Option<String>) -> Option<Self> {
        match (key, secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some(Self { key, secret })
            }
            _ => None,
        }
    }
}

/// Lists in-stock products from a WooCommerce store's REST API.
pub struct WooCommerceCatalogSource {
    client: reqwest::blocking::Client,
    base_url: String,
    credentials: Option<WooCommerceCredentials>,
    page_size: usize,
}

impl WooCommerceCatalogSource {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Option<WooCommerceCredentials>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            credentials,
            page_size: CATALOG_PAGE_SIZE,
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn products_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            WOOCOMMERCE_PRODUCTS_PATH
        )
    }
}

impl CatalogSource for WooCommerceCatalogSource {
    fn list_available_frames(
        &self,
        max_count: usize,
    ) -> Result<Vec<FrameCatalogEntry>, CatalogError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(CatalogError::MissingCredentials)?;
        let url = self.products_url();
        let request_error = |source| CatalogError::Request {
            url: url.clone(),
            source,
        };

        log::info!("Fetching catalog from {url}");
        let response = self
            .client
            .get(&url)
            .basic_auth(&credentials.key, Some(&credentials.secret))
            .query(&[("per_page", self.page_size)])
            .send()
            .map_err(request_error)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(CatalogError::Status {
                url: url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(request_error)?;
        parse_products(&body, max_count)
    }

    fn cache_key(&self) -> String {
        format!("{}?per_page={}", self.products_url(), self.page_size)
    }
}

#[derive(Deserialize)]
struct WcProduct {
    name: String,
    #[serde(default)]
    permalink: String,
    #[serde(default, deserialize_with = "price_as_string")]
    price: String,
    #[serde(default)]
    images: Vec<WcImage>,
    #[serde(default)]
    in_stock: Option<bool>,
    #[serde(default)]
    stock_status: Option<String>,
    #[serde(default)]
    attributes: Vec<WcAttribute>,
}

#[derive(Deserialize)]
struct WcImage {
    #[serde(default)]
    src: String,
}

#[derive(Deserialize)]
struct WcAttribute {
    name: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    option: Option<String>,
}

impl WcAttribute {
    fn value(&self) -> Option<&str> {
        self.option
            .as_deref()
            .or_else(|| self.options.first().map(String::as_str))
    }
}

impl WcProduct {
    /// The legacy `in_stock` flag wins when present.
    fn is_in_stock(&self) -> bool {
        self.in_stock
            .unwrap_or_else(|| self.stock_status.as_deref() == Some("instock"))
    }

    fn into_entry(self) -> FrameCatalogEntry {
        let mut style = FrameStyle::default();
        let mut measurements = FrameMeasurements::default();

        for attribute in &self.attributes {
            let Some(value) = attribute.value() else {
                continue;
            };
            match attribute.name.trim().to_lowercase().as_str() {
                "lens_width" | "glasbreedte" => {
                    if let Some(mm) = parse_millimeters(value) {
                        measurements.lens_width = mm;
                    }
                }
                "bridge" | "brugbreedte" => {
                    if let Some(mm) = parse_millimeters(value) {
                        measurements.bridge = Some(mm);
                    }
                }
                "temple" | "veerlengte" => {
                    if let Some(mm) = parse_millimeters(value) {
                        measurements.temple = Some(mm);
                    }
                }
                "style" | "vorm" => match value.parse() {
                    Ok(parsed) => style = parsed,
                    Err(e) => log::debug!("Ignoring style on '{}': {e}", self.name),
                },
                _ => {}
            }
        }

        let image_url = self
            .images
            .into_iter()
            .next()
            .map(|image| image.src)
            .unwrap_or_default();

        FrameCatalogEntry::new(self.name, image_url, self.price, self.permalink, style)
            .with_measurements(measurements)
    }
}

/// Maps a WooCommerce product list to catalog entries, keeping in-stock
/// products in store order, at most `max_count` of them.
pub fn parse_products(body: &str, max_count: usize) -> Result<Vec<FrameCatalogEntry>, CatalogError> {
    let products: Vec<WcProduct> = serde_json::from_str(body).map_err(CatalogError::Payload)?;
    Ok(products
        .into_iter()
        .filter(WcProduct::is_in_stock)
        .take(max_count)
        .map(WcProduct::into_entry)
        .collect())
}

fn price_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Price>::deserialize(deserializer)? {
        Some(Price::Text(text)) => text,
        Some(Price::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

/// Leading number of an attribute value such as `"52"`, `"52 mm"` or
/// `"52,5mm"`. Only positive finite values are accepted.
fn parse_millimeters(value: &str) -> Option<f64> {
    let number: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    number
        .parse::<f64>()
        .ok()
        .filter(|mm| mm.is_finite() && *mm > 0.0)
}
