//! Language registry
//!
//! A process-wide, read-only table of the languages the toolkit knows about,
//! keyed by ISO 639-3 code. Records carry Glottolog metadata and are never
//! mutated after the table is first touched.

use crate::error::AnalysisError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

/// Whether a record describes a language or one of its dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Language,
    Dialect,
}

/// Glottolog's coarse dating of a language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Epoch {
    Ancient,
    Historical,
}

impl Epoch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Epoch::Ancient => "ancient",
            Epoch::Historical => "historical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub glottolog_id: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub family_id: &'static str,
    pub parent_id: &'static str,
    pub level: Level,
    pub epoch: Epoch,
    /// Whether the usual script separates words with spaces or punctuation,
    /// i.e. whether a generic tokenizer can do anything useful with it.
    pub word_delimited: bool,
}

/// Lazy-compiled ISO 639-3 shape check
static CODE_SYNTAX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]{3}$").unwrap());

#[allow(clippy::too_many_arguments)]
const fn record(
    code: &'static str,
    name: &'static str,
    glottolog_id: &'static str,
    latitude: f64,
    longitude: f64,
    family_id: &'static str,
    parent_id: &'static str,
    epoch: Epoch,
    word_delimited: bool,
) -> Language {
    Language {
        code,
        name,
        glottolog_id,
        latitude,
        longitude,
        family_id,
        parent_id,
        level: Level::Language,
        epoch,
        word_delimited,
    }
}

const LANGUAGES: &[Language] = &[
    record("akk", "Akkadian", "akka1240", 33.1, 44.1, "afro1255", "east2678", Epoch::Ancient, true),
    record("ang", "Old English (ca. 450-1100)", "olde1238", 51.06, -1.31, "indo1319", "angl1265", Epoch::Historical, true),
    record("arb", "Standard Arabic", "stan1318", 27.96, 43.85, "afro1255", "arab1395", Epoch::Historical, true),
    record("arc", "Official Aramaic (700-300 BCE)", "impe1235", 33.5, 36.3, "afro1255", "aram1259", Epoch::Ancient, true),
    record("axm", "Middle Armenian", "midd1364", 40.18, 44.51, "indo1319", "arme1241", Epoch::Historical, true),
    record("chu", "Church Slavic", "chur1257", 41.11, 20.80, "indo1319", "east2269", Epoch::Historical, true),
    record("egy", "Egyptian (Ancient)", "egyp1246", 25.7, 32.6, "afro1255", "egyp1245", Epoch::Ancient, false),
    record("enm", "Middle English", "midd1317", 51.51, -0.13, "indo1319", "merc1242", Epoch::Historical, true),
    record("frm", "Middle French", "midd1316", 48.86, 2.35, "indo1319", "oila1234", Epoch::Historical, true),
    record("fro", "Old French (842-ca. 1400)", "oldf1239", 48.86, 2.35, "indo1319", "oila1234", Epoch::Historical, true),
    record("gmh", "Middle High German", "midd1343", 50.0, 10.0, "indo1319", "midd1349", Epoch::Historical, true),
    record("gmy", "Mycenaean Greek", "myce1241", 37.73, 22.75, "indo1319", "east2798", Epoch::Ancient, false),
    record("goh", "Old High German (ca. 750-1050)", "oldh1241", 50.0, 10.0, "indo1319", "high1289", Epoch::Historical, true),
    record("got", "Gothic", "goth1244", 46.93, 29.97, "indo1319", "east2805", Epoch::Ancient, true),
    record("grc", "Ancient Greek", "anci1242", 39.82, 21.92, "indo1319", "east2798", Epoch::Ancient, true),
    record("hin", "Hindi", "hind1269", 25.0, 77.0, "indo1319", "hind1270", Epoch::Historical, true),
    record("lat", "Latin", "lati1261", 41.9026, 12.4502, "indo1319", "impe1234", Epoch::Ancient, true),
    record("lzh", "Literary Chinese", "lite1248", 34.26, 108.94, "sino1245", "clas1255", Epoch::Ancient, false),
    record("non", "Old Norse", "oldn1244", 63.42, 10.39, "indo1319", "west2805", Epoch::Historical, true),
    record("ojp", "Old Japanese", "japo1237", 34.69, 135.80, "japo1237", "japo1237", Epoch::Ancient, false),
    record("osx", "Old Saxon", "olds1250", 52.52, 8.0, "indo1319", "lowg1239", Epoch::Historical, true),
    record("pan", "Panjabi", "panj1256", 30.08, 75.25, "indo1319", "panj1255", Epoch::Historical, true),
    record("pli", "Pali", "pali1273", 24.5, 91.4, "indo1319", "indo1321", Epoch::Ancient, true),
    record("san", "Sanskrit", "sans1269", 20.0, 77.0, "indo1319", "indo1321", Epoch::Ancient, true),
    record("xcl", "Classical Armenian", "clas1256", 40.18, 44.51, "indo1319", "arme1241", Epoch::Ancient, true),
];

static REGISTRY: Lazy<HashMap<&'static str, &'static Language>> =
    Lazy::new(|| LANGUAGES.iter().map(|lang| (lang.code, lang)).collect());

/// Check that a code is shaped like an ISO 639-3 code.
pub fn is_valid_code(code: &str) -> bool {
    CODE_SYNTAX.is_match(code)
}

/// Look up a language by its ISO 639-3 code.
pub fn lookup(code: &str) -> Result<&'static Language, AnalysisError> {
    if !is_valid_code(code) {
        return Err(AnalysisError::UnknownLanguage {
            code: code.to_string(),
        });
    }
    REGISTRY
        .get(code)
        .copied()
        .ok_or_else(|| AnalysisError::UnknownLanguage {
            code: code.to_string(),
        })
}

/// All known languages, sorted by code.
pub fn all() -> Vec<&'static Language> {
    let mut languages: Vec<_> = REGISTRY.values().copied().collect();
    languages.sort_by(|a, b| a.code.cmp(b.code));
    languages
}
