//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable (`CONFIG`).

use once_cell::sync::Lazy;
use std::env;

/// Configuración global de la aplicación.
pub struct AppConfig {
    /// Configuración del server HTTP.
    pub server: ServerConfig,
    /// Configuración de la bitácora de resultados.
    pub results: ResultsConfig,
    /// Configuración del registro de jobs asíncronos.
    pub jobs: JobsConfig,
}

pub struct ServerConfig {
    /// Dirección de escucha (host:puerto).
    pub bind_addr: String,
}

pub struct ResultsConfig {
    /// Ruta del archivo JSON con el array de itinerarios generados.
    pub path: String,
}

pub struct JobsConfig {
    /// Máximo de jobs terminados retenidos en memoria.
    pub registry_capacity: usize,
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    let bind_addr = env::var("TABIFLOW_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let results_path = env::var("TABIFLOW_RESULTS_PATH").unwrap_or_else(|_| "resultats.json".to_string());
    let capacity = env::var("TABIFLOW_REGISTRY_CAPACITY").ok()
        .and_then(|v| v.parse().ok()).unwrap_or(64);
    AppConfig {
        server: ServerConfig { bind_addr },
        results: ResultsConfig { path: results_path },
        jobs: JobsConfig { registry_capacity: capacity },
    }
});
