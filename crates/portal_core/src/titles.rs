//! crates/portal_core/src/titles.rs
//!
//! Deterministic page-title and SEO-metadata generation from the current
//! navigation state. Identical snapshots always produce byte-identical
//! output, which keeps document-title updates idempotent and analytics
//! labels reproducible.

use crate::domain::{ContentMetadata, PageMeta, RouteSnapshot, UserType};

/// Fixed site identifier appended to every generated title.
const SITE_SUFFIX: &str = "APACG";

/// Canonical labels for the static routes, matched by exact pathname.
const STATIC_ROUTES: &[(&str, &str)] = &[
    ("/", "Inicio"),
    ("/beneficios", "Beneficios"),
    ("/comercios", "Comercios"),
    ("/eventos", "Eventos"),
    ("/sorteos", "Sorteos"),
    ("/cursos", "Cursos"),
    ("/noticias", "Noticias"),
    ("/login", "Iniciar Sesión"),
    ("/registro", "Registro"),
    ("/checkout", "Checkout"),
    ("/pago-membresia", "Pago de Membresía"),
    ("/inscripcion-alumnos", "Inscripción de Alumnos"),
    ("/pago-exitoso", "Pago Exitoso"),
    ("/confirmacion-pago", "Confirmación de Pago"),
    ("/perfil", "Mi Perfil"),
];

/// Detail-route prefixes and the generic noun for each domain.
const DETAIL_ROUTES: &[(&str, &str)] = &[
    ("/beneficio/", "Beneficio"),
    ("/comercio/", "Comercio"),
    ("/evento/", "Evento"),
    ("/sorteo/", "Sorteo"),
    ("/curso/", "Curso"),
    ("/noticia/", "Noticia"),
];

const BASE_KEYWORDS: &str = "APACG, asociación, socios, membresía";

/// Generates the display title and SEO description/keywords for a route.
/// Pure: never fails, unrecognized paths resolve to a deterministic
/// fallback title.
pub fn generate(snapshot: &RouteSnapshot) -> PageMeta {
    let base = static_label(snapshot);

    let title = if snapshot.user_type == UserType::Member {
        let label = base.unwrap_or_else(|| fallback_title(&snapshot.pathname));
        format!("{} - Miembro", label)
    } else if let Some(title) = detail_title(snapshot) {
        title
    } else {
        base.unwrap_or_else(|| fallback_title(&snapshot.pathname))
    };

    let (description, keywords) = describe(&snapshot.pathname, snapshot.metadata.as_ref());

    PageMeta {
        title: format!("{} - {}", title, SITE_SUFFIX),
        description,
        keywords,
    }
}

/// The static-route label with its query modifiers appended, or `None` when
/// the pathname is not a static route.
fn static_label(snapshot: &RouteSnapshot) -> Option<String> {
    let label = STATIC_ROUTES
        .iter()
        .find(|(path, _)| *path == snapshot.pathname)
        .map(|(_, label)| *label)?;

    let mut title = label.to_string();

    if let Some(term) = snapshot.query_param("search") {
        title.push_str(&format!(" - Búsqueda: \"{}\"", term));
    }

    let categories = split_categories(snapshot.query.get("categories").map(String::as_str));
    if !categories.is_empty() {
        title.push_str(&format!(" - Categorías: {}", categories.join(", ")));
    }

    if let Some(page) = snapshot.query_param("page") {
        if page != "1" {
            title.push_str(&format!(" - Página {}", page));
        }
    }

    Some(title)
}

/// Builds the per-domain detail title, or `None` when the pathname is not a
/// detail route or no content metadata is available.
fn detail_title(snapshot: &RouteSnapshot) -> Option<String> {
    let (prefix, noun) = DETAIL_ROUTES
        .iter()
        .find(|(prefix, _)| snapshot.pathname.starts_with(prefix))?;

    let metadata = snapshot.metadata.as_ref()?;

    let mut parts: Vec<&str> = Vec::new();
    if let Some(name) = metadata.display_name() {
        parts.push(name);
    }
    // Benefit pages also carry the commerce granting the discount.
    if *prefix == "/beneficio/" {
        if let Some(commerce) = metadata.commerce.as_deref().filter(|c| !c.trim().is_empty()) {
            parts.push(commerce);
        }
    }
    parts.push(noun);

    Some(parts.join(" - "))
}

/// Fallback title for unrecognized paths: segments with hyphens replaced by
/// spaces, each capitalized, joined with ` - `.
fn fallback_title(pathname: &str) -> String {
    if pathname.is_empty() || pathname == "*" {
        return "Página no encontrada".to_string();
    }

    let segments: Vec<String> = pathname
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| capitalize(&s.replace('-', " ")))
        .collect();

    if segments.is_empty() {
        "Página no encontrada".to_string()
    } else {
        segments.join(" - ")
    }
}

/// SEO description and keywords, keyed off substring match on the path.
fn describe(pathname: &str, metadata: Option<&ContentMetadata>) -> (String, String) {
    let subject = metadata.and_then(|m| {
        m.name
            .as_deref()
            .or(m.title.as_deref())
            .filter(|s| !s.trim().is_empty())
    });

    if pathname.contains("beneficio") {
        let description = match subject {
            Some(name) => format!(
                "Descubre {} y aprovecha los beneficios exclusivos para socios de APACG.",
                name
            ),
            None => "Beneficios y descuentos exclusivos para socios de APACG.".to_string(),
        };
        (
            description,
            format!("{}, beneficios, descuentos, comercios adheridos", BASE_KEYWORDS),
        )
    } else if pathname.contains("evento") {
        let description = match subject {
            Some(name) => format!("Participa de {} junto a la comunidad de APACG.", name),
            None => "Eventos y actividades para toda la comunidad de APACG.".to_string(),
        };
        (
            description,
            format!("{}, eventos, actividades, comunidad", BASE_KEYWORDS),
        )
    } else if pathname.contains("curso") {
        let description = match subject {
            Some(name) => format!("Inscríbete en {} y sigue aprendiendo con APACG.", name),
            None => "Cursos y talleres con descuentos para socios de APACG.".to_string(),
        };
        (
            description,
            format!("{}, cursos, talleres, capacitación", BASE_KEYWORDS),
        )
    } else if pathname.contains("sorteo") {
        let description = match subject {
            Some(name) => format!("Participa del sorteo {} exclusivo para socios de APACG.", name),
            None => "Sorteos y premios exclusivos para socios de APACG.".to_string(),
        };
        (
            description,
            format!("{}, sorteos, premios, participación", BASE_KEYWORDS),
        )
    } else {
        (
            "APACG: beneficios, eventos, cursos y sorteos exclusivos para socios.".to_string(),
            BASE_KEYWORDS.to_string(),
        )
    }
}

/// Splits a `categories` query value on commas, dropping blanks and
/// capitalizing each entry.
pub fn split_categories(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(capitalize)
            .collect()
    })
    .unwrap_or_default()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserType;

    fn snapshot(pathname: &str) -> RouteSnapshot {
        RouteSnapshot::new(pathname)
    }

    #[test]
    fn home_search_for_member() {
        let mut snap = snapshot("/");
        snap.query.insert("search".into(), "cafe".into());
        snap.user_type = UserType::Member;
        let meta = generate(&snap);
        assert_eq!(meta.title, "Inicio - Búsqueda: \"cafe\" - Miembro - APACG");
    }

    #[test]
    fn course_detail_uses_content_title() {
        let mut snap = snapshot("/curso/robotica");
        snap.metadata = Some(ContentMetadata {
            title: Some("Robótica Jr".into()),
            ..Default::default()
        });
        let meta = generate(&snap);
        assert_eq!(meta.title, "Robótica Jr - Curso - APACG");
    }

    #[test]
    fn benefit_detail_appends_commerce() {
        let mut snap = snapshot("/beneficio/2x1-cafe");
        snap.metadata = Some(ContentMetadata {
            title: Some("2x1 en café".into()),
            commerce: Some("Café Central".into()),
            ..Default::default()
        });
        let meta = generate(&snap);
        assert_eq!(meta.title, "2x1 en café - Café Central - Beneficio - APACG");
    }

    #[test]
    fn detail_without_metadata_falls_back_to_path_segments() {
        let snap = snapshot("/beneficio/descuento-libreria");
        let meta = generate(&snap);
        assert_eq!(meta.title, "Beneficio - Descuento libreria - APACG");
    }

    #[test]
    fn detail_metadata_falls_back_to_name_then_noun() {
        let mut snap = snapshot("/evento/feria");
        snap.metadata = Some(ContentMetadata {
            name: Some("Feria Anual".into()),
            ..Default::default()
        });
        assert_eq!(generate(&snap).title, "Feria Anual - Evento - APACG");

        snap.metadata = Some(ContentMetadata::default());
        assert_eq!(generate(&snap).title, "Evento - APACG");
    }

    #[test]
    fn modifiers_append_in_fixed_order() {
        let mut snap = snapshot("/beneficios");
        snap.query.insert("search".into(), "pizza".into());
        snap.query.insert("categories".into(), "gastronomia,salud".into());
        snap.query.insert("page".into(), "3".into());
        let meta = generate(&snap);
        assert_eq!(
            meta.title,
            "Beneficios - Búsqueda: \"pizza\" - Categorías: Gastronomia, Salud - Página 3 - APACG"
        );
    }

    #[test]
    fn page_one_adds_no_modifier() {
        let mut snap = snapshot("/cursos");
        snap.query.insert("page".into(), "1".into());
        assert_eq!(generate(&snap).title, "Cursos - APACG");
    }

    #[test]
    fn blank_categories_are_dropped() {
        assert_eq!(split_categories(Some("a,,b")), vec!["A", "B"]);
        assert!(split_categories(Some("")).is_empty());
        assert!(split_categories(None).is_empty());
    }

    #[test]
    fn unknown_path_builds_generic_title() {
        assert_eq!(
            generate(&snapshot("/mis-datos/editar")).title,
            "Mis datos - Editar - APACG"
        );
    }

    #[test]
    fn wildcard_and_empty_paths_yield_not_found() {
        assert_eq!(generate(&snapshot("*")).title, "Página no encontrada - APACG");
        assert_eq!(generate(&snapshot("")).title, "Página no encontrada - APACG");
    }

    #[test]
    fn description_interpolates_content_name() {
        let mut snap = snapshot("/curso/robotica");
        snap.metadata = Some(ContentMetadata {
            name: Some("Robótica Jr".into()),
            ..Default::default()
        });
        let meta = generate(&snap);
        assert!(meta.description.contains("Robótica Jr"));
        assert!(meta.keywords.starts_with(BASE_KEYWORDS));
        assert!(meta.keywords.contains("cursos"));
    }

    #[test]
    fn generation_is_deterministic() {
        let mut snap = snapshot("/beneficios");
        snap.query.insert("search".into(), "cafe".into());
        snap.query.insert("categories".into(), "a,b".into());
        let first = generate(&snap);
        let second = generate(&snap);
        assert_eq!(first, second);
    }
}
