//! Esquema `dining_plan`: entradas de comida con fuente datada.

use serde::{Deserialize, Serialize};
use tabi_core::{ArtifactSpec, FieldViolation};
use tabi_domain::SourceRef;

use super::{check_iso_date, check_money, check_non_empty};

/// Tipos de comida del día.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    PetitDejeuner,
    Dejeuner,
    Diner,
}

/// Fourchette de precios en EUR TTC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRange {
    pub eur_min: f64,
    pub eur_max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealEntry {
    pub day: String,
    pub meal_type: MealType,
    pub restaurant: String,
    pub cuisine: String,
    pub price_range: PriceRange,
    pub dish_recommendation: String,
    pub address: String,
    pub reservation_needed: bool,
    pub source: SourceRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningPlan {
    pub meals: Vec<MealEntry>,
}

impl ArtifactSpec for DiningPlan {
    fn validate(&self) -> Result<(), FieldViolation> {
        if self.meals.len() < 3 {
            return Err(FieldViolation::new("meals", "se requieren al menos tres entradas de comida"));
        }
        for (i, m) in self.meals.iter().enumerate() {
            let at = |f: &str| format!("meals[{i}].{f}");
            check_iso_date(&at("day"), &m.day)?;
            check_non_empty(&at("restaurant"), &m.restaurant)?;
            check_money(&at("price_range.eur_min"), m.price_range.eur_min)?;
            check_money(&at("price_range.eur_max"), m.price_range.eur_max)?;
            if m.price_range.eur_min > m.price_range.eur_max {
                return Err(FieldViolation::new(at("price_range"),
                                               format!("eur_min > eur_max: {} > {}",
                                                       m.price_range.eur_min, m.price_range.eur_max)));
            }
            m.source
             .check()
             .map_err(|e| FieldViolation::new(at("source"), e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(meal_type: MealType) -> MealEntry {
        MealEntry { day: "2026-04-02".into(),
                    meal_type,
                    restaurant: "Ippudo".into(),
                    cuisine: "ramen".into(),
                    price_range: PriceRange { eur_min: 8.0, eur_max: 14.0 },
                    dish_recommendation: "Shiromaru Motoaji".into(),
                    address: "1-3-13 Nishishinjuku, Tokyo".into(),
                    reservation_needed: false,
                    source: SourceRef::new("https://www.ippudo.com", "2026-04-01") }
    }

    fn sample() -> DiningPlan {
        DiningPlan { meals: vec![meal(MealType::PetitDejeuner), meal(MealType::Dejeuner), meal(MealType::Diner)] }
    }

    #[test]
    fn valid_dining_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn fewer_than_three_meals_rejected() {
        let mut d = sample();
        d.meals.truncate(2);
        assert_eq!(d.validate().unwrap_err().field, "meals");
    }

    #[test]
    fn inverted_price_range_rejected() {
        let mut d = sample();
        d.meals[0].price_range = PriceRange { eur_min: 20.0, eur_max: 10.0 };
        assert_eq!(d.validate().unwrap_err().field, "meals[0].price_range");
    }

    #[test]
    fn meal_type_serializes_snake_case() {
        assert_eq!(serde_json::to_value(MealType::PetitDejeuner).unwrap(), "petit_dejeuner");
    }
}
