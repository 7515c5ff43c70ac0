//! End-to-end sobre el driver: de `inputs` JSON crudo al documento final.

use serde_json::json;
use tabi_persistence::ResultsLog;
use tabiflow::driver::run_once_with_log;
use tabiflow::DriverError;

#[test]
fn kyoto_weekend_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let results = ResultsLog::new(dir.path().join("resultats.json"));
    let inputs = json!({
        "firstName": "Yuna",
        "pace": "equilibre",
        "departureDate": "2026-10-03",
        "duration": "2",
        "citiesToInclude": ["Kyoto"],
        "budget": "5000",
        "services": ["restaurants", "lodging"],
        "interests": ["temples", "gastronomie"]
    });

    let doc = run_once_with_log(&inputs, &results).unwrap();

    assert_eq!(doc["meta"]["first_name"], "Yuna");
    assert_eq!(doc["itinerary"].as_array().unwrap().len(), 1);
    let city = &doc["itinerary"][0];
    assert_eq!(city["city"], "Kyoto");
    let days = city["days"].as_array().unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0]["date"], "2026-10-03");
    // Rythme equilibre: tres actividades por día.
    assert_eq!(days[0]["activities"].as_array().unwrap().len(), 3);
    // Servicios pedidos: transporte/alojamiento/comidas presentes el primer día.
    assert!(!days[0]["transport"].as_array().unwrap().is_empty());
    assert!(days[0]["lodging"].is_object());
    assert!(!days[0]["dining"].as_array().unwrap().is_empty());

    assert_eq!(doc["compliance"]["exclusions_respected"], true);
    assert!(doc["budget_overview"]["total_eur"].as_f64().unwrap() > 0.0);
    assert!(!doc["bibliography"].as_array().unwrap().is_empty());

    // El run quedó en la bitácora.
    assert_eq!(results.read_all().unwrap().len(), 1);
}

#[test]
fn run_without_services_skips_gated_sections() {
    let dir = tempfile::tempdir().unwrap();
    let results = ResultsLog::new(dir.path().join("resultats.json"));
    let inputs = json!({
        "duration": 3,
        "departureDate": "2026-10-03",
        "citiesToInclude": ["Tokyo", "Kyoto"],
        "budget": 2500
    });

    let doc = run_once_with_log(&inputs, &results).unwrap();

    let cities: Vec<&str> = doc["itinerary"].as_array().unwrap()
        .iter().map(|c| c["city"].as_str().unwrap()).collect();
    assert_eq!(cities, vec!["Tokyo", "Kyoto"]);
    for city in doc["itinerary"].as_array().unwrap() {
        for day in city["days"].as_array().unwrap() {
            assert!(day["transport"].as_array().unwrap().is_empty());
            assert!(day["lodging"].is_null());
            assert!(day["dining"].as_array().unwrap().is_empty());
            assert!(!day["activities"].as_array().unwrap().is_empty());
        }
    }
    // El presupuesto sigue presente (sólo actividades).
    assert!(doc["budget_overview"]["total_eur"].as_f64().unwrap() > 0.0);
}

#[test]
fn excluded_city_never_appears() {
    let dir = tempfile::tempdir().unwrap();
    let results = ResultsLog::new(dir.path().join("resultats.json"));
    let inputs = json!({
        "duration": 2,
        "citiesToInclude": ["Tokyo", "Kyoto"],
        "citiesToExclude": ["kyoto"],
        "budget": 1500
    });

    let doc = run_once_with_log(&inputs, &results).unwrap();
    for city in doc["itinerary"].as_array().unwrap() {
        assert_ne!(city["city"].as_str().unwrap().to_lowercase(), "kyoto");
    }
}

#[test]
fn non_object_inputs_never_reach_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let results = ResultsLog::new(dir.path().join("resultats.json"));

    let err = run_once_with_log(&json!([1, 2, 3]), &results).unwrap_err();
    assert!(matches!(err, DriverError::Input(_)));
    assert!(results.read_all().unwrap().is_empty());
}
