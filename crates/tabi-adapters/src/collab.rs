//! Colaboradores externos de las etapas.
//!
//! El núcleo del sistema sólo especifica la FORMA alrededor de estas
//! llamadas; la calidad del contenido queda fuera de alcance. Las
//! implementaciones provistas son mocks deterministas (sin red): devuelven
//! resultados fabricados pero con URL y fecha válidas, aptos para pasar la
//! validación de esquemas.

use tabi_domain::SourceRef;

/// Resultado de una búsqueda web.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub date: String,
}

impl SearchHit {
    pub fn as_source(&self) -> SourceRef {
        let mut s = SourceRef::new(self.url.clone(), self.date.clone());
        s.title = Some(self.title.clone());
        s
    }
}

/// Colaborador de razonamiento: redacta texto narrativo para una etapa a
/// partir de un brief. El error se reporta como string opaco; el engine lo
/// envuelve en `PipelineError::Collaborator`.
pub trait Reasoner: Send + Sync {
    fn compose(&self, stage: &str, brief: &str) -> Result<String, String>;
}

/// Colaborador de búsqueda web con resultados datados.
pub trait SearchTool: Send + Sync {
    fn search(&self, query: &str, max_results: usize) -> Vec<SearchHit>;
}

/// Colaborador de scraping de una página concreta.
pub trait ScrapeTool: Send + Sync {
    fn scrape(&self, url: &str) -> Result<String, String>;
}

/// Reasoner determinista: produce una frase estable por etapa.
pub struct MockReasoner;

impl Reasoner for MockReasoner {
    fn compose(&self, stage: &str, brief: &str) -> Result<String, String> {
        Ok(format!("[{stage}] {brief}"))
    }
}

/// Búsqueda determinista: fabrica resultados con fuentes datadas estables,
/// al estilo del fallback sin red del proveedor real.
pub struct MockSearch {
    /// Fecha de consulta que llevan todos los resultados (YYYY-MM-DD).
    pub as_of: String,
}

impl MockSearch {
    pub fn new(as_of: impl Into<String>) -> Self {
        Self { as_of: as_of.into() }
    }
}

impl SearchTool for MockSearch {
    fn search(&self, query: &str, max_results: usize) -> Vec<SearchHit> {
        let slug: String = query.to_lowercase()
                                .chars()
                                .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
                                .collect();
        (0..max_results.max(1)).map(|i| SearchHit { title: format!("Résultat {} pour « {query} »", i + 1),
                                                    url: format!("https://www.japan.travel/{slug}/{}", i + 1),
                                                    date: self.as_of.clone() })
                               .collect()
    }
}

/// Scraper determinista.
pub struct MockScrape;

impl ScrapeTool for MockScrape {
    fn scrape(&self, url: &str) -> Result<String, String> {
        Ok(format!("Contenu extrait de {url}"))
    }
}
