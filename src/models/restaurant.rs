use serde::{Deserialize, Serialize};

use crate::providers::yelp::Business;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Restaurant {
    pub name: Option<String>,
    pub url: Option<String>,
    pub rating: Option<f64>,
    pub price: Option<String>,
    pub image_url: Option<String>,
}

impl From<&Business> for Restaurant {
    fn from(business: &Business) -> Self {
        Self {
            name: business.name.clone(),
            url: business.url.clone(),
            rating: business.rating,
            price: business.price.clone(),
            image_url: business.image_url.clone(),
        }
    }
}
