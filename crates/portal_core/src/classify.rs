//! crates/portal_core/src/classify.rs
//!
//! Maps a URL path to the semantic module it belongs to.

use crate::domain::ModuleTag;

/// Ordered prefix table. First matching prefix wins, so each domain lists
/// both its plural list route and its singular detail route.
const PREFIX_TABLE: &[(&str, ModuleTag)] = &[
    ("/beneficios", ModuleTag::Benefits),
    ("/beneficio", ModuleTag::Benefits),
    ("/comercios", ModuleTag::Commerces),
    ("/comercio", ModuleTag::Commerces),
    ("/eventos", ModuleTag::Events),
    ("/evento", ModuleTag::Events),
    ("/sorteos", ModuleTag::Raffles),
    ("/sorteo", ModuleTag::Raffles),
    ("/cursos", ModuleTag::Courses),
    ("/curso", ModuleTag::Courses),
    ("/noticias", ModuleTag::News),
    ("/noticia", ModuleTag::News),
];

/// Classifies a pathname into its module. Total: unmatched input yields
/// `ModuleTag::General`, never an error.
pub fn classify(pathname: &str) -> ModuleTag {
    PREFIX_TABLE
        .iter()
        .find(|(prefix, _)| pathname.starts_with(prefix))
        .map(|(_, tag)| *tag)
        .unwrap_or(ModuleTag::General)
}
