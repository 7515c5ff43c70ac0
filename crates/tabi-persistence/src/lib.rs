//! tabi-persistence: bitácora de resultados en un archivo JSON.
//!
//! El archivo es un array JSON de documentos de itinerario; cada run
//! terminado agrega exactamente un elemento. Un archivo corrupto se resetea
//! (con warning) en lugar de frenar el server: la bitácora es un registro de
//! conveniencia, no la fuente de verdad del run (esa son los eventos).

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("i/o sobre la bitácora: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialización de la bitácora: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("lock de la bitácora envenenado")]
    Poisoned,
}

/// Bitácora append-only de documentos finales.
///
/// El `Mutex` serializa los appends entre workers: leer-modificar-escribir
/// sobre el mismo archivo no es atómico sin él.
pub struct ResultsLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ResultsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(),
               lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Carga el contenido actual como array. Archivo ausente => array vacío;
    /// contenido ilegible => warning y array vacío; valor suelto no-array =>
    /// se envuelve en un array de un elemento.
    fn load_entries(&self) -> Vec<Value> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(_) => return Vec::new(),
        };
        if raw.trim().is_empty() {
            return Vec::new();
        }
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(other) => {
                log::warn!("bitácora {} no era un array; se envuelve el valor existente", self.path.display());
                vec![other]
            }
            Err(e) => {
                log::warn!("bitácora {} ilegible ({e}); se resetea", self.path.display());
                Vec::new()
            }
        }
    }

    /// Agrega un documento al final de la bitácora (crea el archivo si no
    /// existe).
    pub fn append(&self, doc: &Value) -> Result<(), PersistenceError> {
        let _guard = self.lock.lock().map_err(|_| PersistenceError::Poisoned)?;
        let mut entries = self.load_entries();
        entries.push(doc.clone());
        let serialized = serde_json::to_string_pretty(&Value::Array(entries))?;
        let mut file = fs::File::create(&self.path)?;
        file.write_all(serialized.as_bytes())?;
        Ok(())
    }

    /// Devuelve todos los documentos registrados hasta ahora.
    pub fn read_all(&self) -> Result<Vec<Value>, PersistenceError> {
        let _guard = self.lock.lock().map_err(|_| PersistenceError::Poisoned)?;
        Ok(self.load_entries())
    }
}
