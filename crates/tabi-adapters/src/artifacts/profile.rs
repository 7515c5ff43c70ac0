//! Esquema `trip_profile`: resumen del perfil del viajero.

use serde::{Deserialize, Serialize};
use tabi_core::{ArtifactSpec, FieldViolation};

use super::check_non_empty;

/// Perfil consolidado del viaje, primera etapa del pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripProfile {
    pub nom_voyageur: String,
    pub destination_principale: String,
    pub duree_voyage: String,
    pub budget_estime: String,
    pub type_voyage: String,
    pub resume_complet: String,
}

impl ArtifactSpec for TripProfile {
    fn validate(&self) -> Result<(), FieldViolation> {
        check_non_empty("nom_voyageur", &self.nom_voyageur)?;
        check_non_empty("destination_principale", &self.destination_principale)?;
        check_non_empty("duree_voyage", &self.duree_voyage)?;
        check_non_empty("budget_estime", &self.budget_estime)?;
        check_non_empty("type_voyage", &self.type_voyage)?;
        check_non_empty("resume_complet", &self.resume_complet)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TripProfile {
        TripProfile { nom_voyageur: "Yuna".into(),
                      destination_principale: "Tokyo, Kyoto".into(),
                      duree_voyage: "5 jours".into(),
                      budget_estime: "2000 EUR".into(),
                      type_voyage: "découverte".into(),
                      resume_complet: "Voyage équilibré entre Tokyo et Kyoto.".into() }
    }

    #[test]
    fn valid_profile_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn empty_field_is_rejected() {
        let mut p = sample();
        p.resume_complet = "  ".into();
        let v = p.validate().unwrap_err();
        assert_eq!(v.field, "resume_complet");
    }
}
