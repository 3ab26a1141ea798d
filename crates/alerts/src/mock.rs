//! Static demo dataset: social-media incident reports from Santo Domingo,
//! classified into alerts by keyword rules, plus a seeded heatmap around the
//! metropolitan districts.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::model::{Alert, AlertId, AlertKind, AlertStatus, HeatmapPoint, Location, Severity};

const TAG_CURRENT: &str = "[suceso actual]";
const TAG_PREDICTIVE: &str = "[alerta predictiva]";
const TAG_HISTORICAL: &str = "[evento histórico]";

struct Report {
    post_id: &'static str,
    date: &'static str,
    author: &'static str,
    content: &'static str,
    lat: f64,
    lng: f64,
    tag: &'static str,
    summary: &'static str,
}

const REPORTS: &[Report] = &[
    Report {
        post_id: "1953815937972404231",
        date: "2025-02-02T18:15:00Z",
        author: "@CarmenO26657205",
        content: "Paso elevado entre Av. Winston Churchill y Av. John F. Kennedy severamente agrietado. Riesgo de falla estructural inminente. #InfraestructuraEnRiesgo #SantoDomingo",
        lat: 18.482447,
        lng: -69.945985,
        tag: TAG_CURRENT,
        summary: "Paso elevado con grietas severas en un nodo de rutas de autobús muy transitado.",
    },
    Report {
        post_id: "1910293459056947325",
        date: "2024-04-13T13:45:00Z",
        author: "@HazimNoelia",
        content: "El Puente Francisco del Rosario Sánchez (Puente de la 17) está en condición crítica, con deterioro visible que genera temores de colapso. ¡Acción urgente necesaria! #SantoDomingo #Colapso",
        lat: 18.5071711,
        lng: -69.8820031,
        tag: TAG_PREDICTIVE,
        summary: "Deterioro visible del Puente de la 17; se pide intervención urgente.",
    },
    Report {
        post_id: "1726016330627756325",
        date: "2023-11-18T15:30:00Z",
        author: "@ArosNews2",
        content: "Inundación severa en la Avenida Monumental cerca de Los Girasoles I. Motociclista luchando, autos arrastrados. ¡Caos! #Inundacion #SantoDomingo",
        lat: 18.52,
        lng: -69.92,
        tag: TAG_HISTORICAL,
        summary: "Inundación urbana severa durante lluvias intensas en la Avenida Monumental.",
    },
    Report {
        post_id: "1726009333199090154",
        date: "2023-11-18T15:02:15Z",
        author: "@kathernandez",
        content: "¡Caos por inundaciones en Santo Domingo! Calles bajo el agua, tráfico paralizado en múltiples avenidas. #Inundacion #SantoDomingo",
        lat: 18.4861,
        lng: -69.9312,
        tag: TAG_HISTORICAL,
        summary: "Inundaciones generalizadas con tráfico paralizado en varias avenidas.",
    },
    Report {
        post_id: "1726011359450521983",
        date: "2023-11-18T15:10:20Z",
        author: "@lasose2002",
        content: "¡Avenida Monumental completamente inundada! Imposible pasar cerca de Los Girasoles. #Inundacion #GranSantoDomingo",
        lat: 18.52,
        lng: -69.92,
        tag: TAG_HISTORICAL,
        summary: "Avenida Monumental intransitable por acumulación de agua.",
    },
    Report {
        post_id: "1726008717055856781",
        date: "2023-11-18T14:59:50Z",
        author: "@JuniorPeralta3",
        content: "¡Aguas inundando Santo Domingo Este! Calles como Avenida San Vicente de Paúl son un desastre. #Inundacion #SantoDomingo",
        lat: 18.5029,
        lng: -69.8547,
        tag: TAG_HISTORICAL,
        summary: "Calles anegadas en Santo Domingo Este, incluida la San Vicente de Paúl.",
    },
    Report {
        post_id: "1725998576965169474",
        date: "2023-11-18T14:19:30Z",
        author: "@LeonardoJaquez",
        content: "¡Santo Domingo bajo el agua! Inundaciones reportadas en múltiples sectores, tráfico detenido. #Inundacion #SDQ",
        lat: 18.4861,
        lng: -69.9312,
        tag: TAG_HISTORICAL,
        summary: "Inundaciones reportadas en múltiples sectores de la ciudad.",
    },
];

/// Heatmap anchors: (name, lat, lng).
pub const DISTRICTS: &[(&str, f64, f64)] = &[
    ("Distrito Nacional", 18.4861, -69.9312),
    ("Santo Domingo Norte", 18.5144, -69.8977),
    ("Santo Domingo Este", 18.4888, -69.8571),
    ("Santo Domingo Oeste", 18.4701, -70.0076),
    ("Los Alcarrizos", 18.4984, -70.0021),
    ("Pedro Brand", 18.5644, -70.0087),
];

pub fn classify_kind(content: &str) -> AlertKind {
    let c = content.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| c.contains(w));
    if has(&["inundación", "inundacion", "agua"]) {
        AlertKind::Flood
    } else if has(&["colapso", "puente", "estructura"]) {
        AlertKind::Collapse
    } else if has(&["incendio", "fuego"]) {
        AlertKind::Fire
    } else if has(&["sismo", "terremoto"]) {
        AlertKind::Earthquake
    } else {
        AlertKind::Incident
    }
}

/// Predictive reports rank high and historical ones medium regardless of wording.
pub fn classify_severity(content: &str, tag: &str) -> Severity {
    if tag == TAG_PREDICTIVE {
        return Severity::High;
    }
    if tag == TAG_HISTORICAL {
        return Severity::Medium;
    }
    let c = content.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| c.contains(w));
    if has(&["severa", "crítica", "caos", "urgente"]) {
        Severity::Critical
    } else if has(&["imposible", "paralizado", "desastre"]) {
        Severity::High
    } else {
        Severity::Medium
    }
}

pub fn classify_status(tag: &str) -> AlertStatus {
    match tag {
        TAG_PREDICTIVE => AlertStatus::Investigating,
        TAG_HISTORICAL => AlertStatus::Resolved,
        _ => AlertStatus::Active,
    }
}

/// Best-effort `(address, district)` from place names mentioned in the text.
pub fn extract_place(content: &str) -> (&'static str, &'static str) {
    let c = content.to_lowercase();
    if c.contains("avenida monumental") {
        ("Avenida Monumental", "Santo Domingo Norte")
    } else if c.contains("los girasoles") {
        ("Los Girasoles I", "Santo Domingo Norte")
    } else if c.contains("san vicente de paúl") {
        ("Avenida San Vicente de Paúl", "Santo Domingo Este")
    } else if c.contains("puente") && c.contains("17") {
        (
            "Puente Francisco del Rosario Sánchez (Puente de la 17)",
            "Distrito Nacional",
        )
    } else {
        ("Centro de Santo Domingo", "Distrito Nacional")
    }
}

fn to_alert(r: &Report) -> Option<Alert> {
    let timestamp = match DateTime::parse_from_rfc3339(r.date) {
        Ok(t) => t.with_timezone(&Utc),
        Err(err) => {
            warn!("skipping report {}: bad date {:?}: {err}", r.post_id, r.date);
            return None;
        }
    };
    let (address, district) = extract_place(r.content);
    Some(Alert {
        id: AlertId::new(r.post_id),
        kind: classify_kind(r.content),
        severity: classify_severity(r.content, r.tag),
        title: r.content.to_string(),
        description: r.summary.to_string(),
        location: Location {
            lat: r.lat,
            lng: r.lng,
            address: Some(address.to_string()),
            district: Some(district.to_string()),
        },
        timestamp,
        status: classify_status(r.tag),
        author: Some(r.author.to_string()),
        link: Some(format!(
            "https://x.com/{}/status/{}",
            r.author.trim_start_matches('@'),
            r.post_id
        )),
        tag: Some(r.tag.to_string()),
        affected_population: None,
        estimated_damage: None,
    })
}

/// Up to `count` alerts from the static reports, in report order.
pub fn mock_alerts(count: usize) -> Vec<Alert> {
    REPORTS.iter().take(count).filter_map(to_alert).collect()
}

/// `count` points scattered within ±0.05° of random districts, intensity in `[0.1, 1]`.
pub fn mock_heatmap(seed: u64, count: usize) -> Vec<HeatmapPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let Some(&(_, lat, lng)) = DISTRICTS.choose(&mut rng) else {
            break;
        };
        let lat = lat + (rng.random::<f64>() - 0.5) * 0.1;
        let lng = lng + (rng.random::<f64>() - 0.5) * 0.1;
        let intensity = rng.random_range(0.1..=1.0);
        out.push(HeatmapPoint::new(lat, lng, intensity));
    }
    out
}
