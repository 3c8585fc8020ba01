use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Form body of a prediction request. Everything arrives as text and
/// is only parsed when the artifact encodes it; presence is the sole
/// check done at the HTTP layer.
#[derive(Debug, Deserialize)]
pub struct QuoteForm {
    pub carmodel: String,
    pub year: String,
    pub transmission: String,
    pub mileage: String,
    pub fueltype: String,
    pub tax: String,
    pub mpg: String,
    pub enginesize: String,
}

impl QuoteForm {
    /// Re-key the form fields to the artifact's training column names.
    pub fn into_feature_row(self) -> HashMap<String, String> {
        let mut row = HashMap::with_capacity(8);
        row.insert("model".to_string(), self.carmodel);
        row.insert("year".to_string(), self.year);
        row.insert("transmission".to_string(), self.transmission);
        row.insert("mileage".to_string(), self.mileage);
        row.insert("fuelType".to_string(), self.fueltype);
        row.insert("tax".to_string(), self.tax);
        row.insert("mpg".to_string(), self.mpg);
        row.insert("engineSize".to_string(), self.enginesize);
        row
    }
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub brand: String,
    pub price: i64,
}

#[derive(Debug, Serialize)]
pub struct FormField {
    pub name: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels: Option<Vec<String>>,
}

/// What a GET of the form route returns: enough for a client to render
/// the brand's input form.
#[derive(Debug, Serialize)]
pub struct FormDescriptor {
    pub brand: String,
    pub display_name: String,
    pub fields: Vec<FormField>,
}
