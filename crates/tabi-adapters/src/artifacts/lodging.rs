//! Esquema `lodging_options`: opciones de alojamiento por ciudad.

use serde::{Deserialize, Serialize};
use tabi_core::{ArtifactSpec, FieldViolation};
use tabi_domain::{FxMeta, Money};

use super::{check_iso_date, check_non_empty};

/// Tipos de alojamiento soportados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LodgingType {
    Hotel,
    Ryokan,
    Guesthouse,
    Hostel,
    Aparthotel,
    Minshuku,
    Capsule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccommodationOption {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LodgingType,
    pub price_per_night: Money,
    pub total_estimate: Money,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    pub link: String,
    /// Fecha de publicación/consulta de la fuente (YYYY-MM-DD).
    pub source_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityAccommodations {
    pub city: String,
    pub accommodations: Vec<AccommodationOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LodgingOptionsByCity {
    pub cities: Vec<CityAccommodations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fx: Option<FxMeta>,
}

impl ArtifactSpec for LodgingOptionsByCity {
    fn validate(&self) -> Result<(), FieldViolation> {
        if self.cities.is_empty() {
            return Err(FieldViolation::new("cities", "se requiere al menos una ciudad"));
        }
        for (ci, c) in self.cities.iter().enumerate() {
            check_non_empty(&format!("cities[{ci}].city"), &c.city)?;
            if c.accommodations.len() < 2 {
                return Err(FieldViolation::new(format!("cities[{ci}].accommodations"),
                                               "se requieren al menos dos opciones por ciudad"));
            }
            for (ai, a) in c.accommodations.iter().enumerate() {
                let at = |f: &str| format!("cities[{ci}].accommodations[{ai}].{f}");
                check_non_empty(&at("name"), &a.name)?;
                a.price_per_night
                 .check()
                 .map_err(|e| FieldViolation::new(at("price_per_night"), e.to_string()))?;
                a.total_estimate
                 .check()
                 .map_err(|e| FieldViolation::new(at("total_estimate"), e.to_string()))?;
                if !(a.link.starts_with("http://") || a.link.starts_with("https://")) {
                    return Err(FieldViolation::new(at("link"), format!("url inválida: {:?}", a.link)));
                }
                check_iso_date(&at("source_date"), &a.source_date)?;
            }
        }
        if let Some(fx) = &self.fx {
            fx.check().map_err(|e| FieldViolation::new("fx", e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(name: &str) -> AccommodationOption {
        AccommodationOption { name: name.into(),
                              kind: LodgingType::Ryokan,
                              price_per_night: Money::with_rate(120.0, 165.0),
                              total_estimate: Money::with_rate(360.0, 165.0),
                              pros: vec!["onsen".into()],
                              cons: vec![],
                              link: "https://www.japanican.com".into(),
                              source_date: "2026-04-01".into() }
    }

    fn sample() -> LodgingOptionsByCity {
        LodgingOptionsByCity { cities: vec![CityAccommodations { city: "Kyoto".into(),
                                                                 accommodations: vec![option("Ryokan Sakura"),
                                                                                      option("Hotel Kamo")] }],
                               fx: Some(FxMeta::eur_jpy(165.0, "2026-04-01")) }
    }

    #[test]
    fn valid_lodging_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn single_option_per_city_is_rejected() {
        let mut l = sample();
        l.cities[0].accommodations.truncate(1);
        assert_eq!(l.validate().unwrap_err().field, "cities[0].accommodations");
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut l = sample();
        l.cities[0].accommodations[0].price_per_night = Money::eur(-5.0);
        assert_eq!(l.validate().unwrap_err().field,
                   "cities[0].accommodations[0].price_per_night");
    }

    #[test]
    fn lodging_type_serializes_lowercase() {
        assert_eq!(serde_json::to_value(LodgingType::Ryokan).unwrap(), "ryokan");
    }
}
