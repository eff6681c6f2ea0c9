//! Registry search.
//!
//! Vaccine search goes through FTS5 first and falls back to a fuzzy
//! scan when the index yields nothing (typos never produce an empty
//! page). Client search is a name-prefix fetch re-ranked by the same
//! fuzzy blend.

use strsim::{jaro_winkler, normalized_levenshtein};

use crate::db::{Database, DbResult};
use crate::models::{Client, Vaccine};

/// Minimum blended similarity for a fuzzy hit.
const MIN_SCORE: f64 = 0.55;

/// How many prefix matches to fetch before re-ranking.
const PREFIX_FETCH_FACTOR: usize = 4;

/// Compute fuzzy string similarity using combined metrics.
fn fuzzy_score(query: &str, candidate: &str) -> f64 {
    let query = query.to_lowercase();
    let candidate = candidate.to_lowercase();

    // Jaro-Winkler favors shared prefixes, Levenshtein overall shape
    let jw = jaro_winkler(&query, &candidate);
    let lev = normalized_levenshtein(&query, &candidate);

    jw * 0.6 + lev * 0.4
}

/// Rank items by the best fuzzy score among their searchable fields,
/// dropping anything under [`MIN_SCORE`].
fn rank_by_score<T, F>(items: Vec<T>, query: &str, fields: F, limit: usize) -> Vec<T>
where
    F: Fn(&T) -> Vec<String>,
{
    let mut scored: Vec<(f64, T)> = items
        .into_iter()
        .map(|item| {
            let score = fields(&item)
                .iter()
                .map(|field| fuzzy_score(query, field))
                .fold(0.0, f64::max);
            (score, item)
        })
        .filter(|(score, _)| *score >= MIN_SCORE)
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(limit).map(|(_, item)| item).collect()
}

/// Search active vaccines by name or manufacturer.
pub fn search_vaccines(db: &Database, query: &str, limit: usize) -> DbResult<Vec<Vaccine>> {
    let hits = db.search_vaccines_fts(query, limit)?;
    if !hits.is_empty() {
        return Ok(hits);
    }

    // FTS found nothing; scan the (small) active catalog fuzzily
    let all = db.list_vaccines(true)?;
    Ok(rank_by_score(
        all,
        query,
        |v| vec![v.name.clone(), v.manufacturer.clone()],
        limit,
    ))
}

/// Search clients by name.
pub fn search_clients(db: &Database, query: &str, limit: usize) -> DbResult<Vec<Client>> {
    let prefix_hits = db.search_clients_by_name(query, limit * PREFIX_FETCH_FACTOR)?;

    if prefix_hits.is_empty() {
        let all = db.list_clients()?;
        return Ok(rank_by_score(all, query, |c| vec![c.name.clone()], limit));
    }

    let mut ranked = rank_by_score(prefix_hits.clone(), query, |c| vec![c.name.clone()], limit);
    if ranked.is_empty() {
        // Short queries score poorly against long names; keep the
        // prefix order instead of returning nothing
        ranked = prefix_hits.into_iter().take(limit).collect();
    }
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();

        db.insert_vaccine(&Vaccine::new("Tetravalent".into(), "BioPharm".into(), 2, 21))
            .unwrap();
        db.insert_vaccine(&Vaccine::new("Hepatitis B".into(), "Immunex".into(), 3, 30))
            .unwrap();
        db.insert_vaccine(&Vaccine::new("Influenza".into(), "BioPharm".into(), 1, 0))
            .unwrap();

        let birth = NaiveDate::from_ymd_opt(1990, 4, 12).unwrap();
        db.insert_client(&Client::new("1".into(), "Ana Souza".into(), birth))
            .unwrap();
        db.insert_client(&Client::new("2".into(), "Anabela Reis".into(), birth))
            .unwrap();
        db.insert_client(&Client::new("3".into(), "Bruno Costa".into(), birth))
            .unwrap();

        db
    }

    #[test]
    fn test_vaccine_search_via_fts() {
        let db = setup_db();

        let results = search_vaccines(&db, "hepatitis", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Hepatitis B");
    }

    #[test]
    fn test_vaccine_search_fuzzy_fallback_on_typo() {
        let db = setup_db();

        // "influensa" matches nothing in FTS but is one edit away
        let results = search_vaccines(&db, "influensa", 10).unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].name, "Influenza");
    }

    #[test]
    fn test_vaccine_search_no_match() {
        let db = setup_db();

        let results = search_vaccines(&db, "zzzzqqqq", 10).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_client_search_prefix() {
        let db = setup_db();

        let results = search_clients(&db, "Ana", 10).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_client_search_fuzzy_when_prefix_misses() {
        let db = setup_db();

        // No name starts with "Souza", but "Ana Souza" is close enough
        let results = search_clients(&db, "Ana Sousa", 10).unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].name, "Ana Souza");
    }

    #[test]
    fn test_fuzzy_score_ordering() {
        assert!(fuzzy_score("tetravalent", "tetravalent") > 0.99);
        assert!(fuzzy_score("tetravalent", "tetravalemt") > 0.85);
        assert!(fuzzy_score("tetravalent", "influenza") < 0.55);
    }
}
