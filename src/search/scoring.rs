//! Search relevance and ranking.
//!
//! The ranker works in two stages. Hard context filters first: a query that
//! names a kit type, a season or "retro" excludes every entry that
//! contradicts it, regardless of how well its text matches. Then a layered
//! additive score, so an entry can win on several independent signals (alias
//! match *and* token overlap) without any single heuristic dominating.

use crate::index::IndexEntry;
use crate::normalize::normalize;

use super::query::ParsedQuery;

/// Exact match of team, team_short or team_key against the full query.
const EXACT_TEAM: i32 = 200;
/// Exact match of an alias against the full query.
const EXACT_ALIAS: i32 = 180;
/// Exact match of the team query against team or team_short.
const EXACT_TEAM_QUERY: i32 = 160;
/// Team name starts with / contains the team query.
const TEAM_PREFIX: i32 = 80;
const TEAM_SUBSTRING: i32 = 60;
/// Short name contains the team query.
const SHORT_SUBSTRING: i32 = 55;
/// An alias starts with / contains the team query.
const ALIAS_PREFIX: i32 = 70;
const ALIAS_SUBSTRING: i32 = 50;
/// Per-token hits against the token set and the searchable text.
const TOKEN_HIT: i32 = 30;
const TEXT_HIT: i32 = 15;
/// Every query token landed somewhere and there was more than one.
const ALL_TOKENS_BONUS: i32 = 40;
/// Upstream auto-tagging confidence boosts.
const CONFIDENCE_BOOST: i32 = 10;

/// Rank the index against a query: descending score, ties in index order,
/// zero-scoring entries excluded.
///
/// The full ordered set is returned; truncation for display (the storefront
/// shows 60) is the consumer's concern, not a ranking contract.
pub fn rank(index: &[IndexEntry], query: &str) -> Vec<IndexEntry> {
    let parsed = ParsedQuery::parse(query);
    if parsed.raw.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(i32, &IndexEntry)> = index
        .iter()
        .filter(|entry| passes_context_filters(entry, &parsed))
        .filter_map(|entry| {
            let score = score_entry(entry, &parsed);
            (score > 0).then_some((score, entry))
        })
        .collect();

    // Stable sort: equal scores keep catalog order.
    scored.sort_by(|(a, _), (b, _)| b.cmp(a));

    tracing::debug!(
        "Ranked query '{}': {} of {} entries scored",
        parsed.raw,
        scored.len(),
        index.len()
    );

    scored.into_iter().map(|(_, entry)| entry.clone()).collect()
}

/// Hard excludes driven by contextual modifiers. Absence of a field is never
/// treated as a mismatch: only a *populated* kit type or season can
/// contradict the query.
fn passes_context_filters(entry: &IndexEntry, parsed: &ParsedQuery) -> bool {
    if let Some(requested) = parsed.kit_type
        && let Some(kit_type) = entry.kit_type
        && kit_type != requested
    {
        return false;
    }

    if parsed.retro && entry.category != "retro" {
        return false;
    }

    if let Some(year) = &parsed.season_year
        && let Some(season) = &entry.season
        && !season.contains(year.as_str())
    {
        return false;
    }

    true
}

/// Additive per-entry score. Signals are independent: an exact team match
/// does not suppress the prefix or token layers.
fn score_entry(entry: &IndexEntry, parsed: &ParsedQuery) -> i32 {
    let query = parsed.raw.as_str();
    let team_query = parsed.team_query.as_str();

    let team = normalize(&entry.team);
    let short = normalize(&entry.team_short);
    let aliases: Vec<String> = entry.aliases.iter().map(|a| normalize(a)).collect();

    let mut score = 0;

    if !team.is_empty() && team == query {
        score += EXACT_TEAM;
    }
    if !short.is_empty() && short == query {
        score += EXACT_TEAM;
    }
    if !entry.team_key.is_empty() && entry.team_key == query {
        score += EXACT_TEAM;
    }
    if aliases.iter().any(|a| a == query) {
        score += EXACT_ALIAS;
    }

    if !team_query.is_empty() {
        if team == team_query {
            score += EXACT_TEAM_QUERY;
        }
        if short == team_query {
            score += EXACT_TEAM_QUERY;
        }
        if !team.is_empty() {
            if team.starts_with(team_query) {
                score += TEAM_PREFIX;
            } else if team.contains(team_query) {
                score += TEAM_SUBSTRING;
            }
        }
        if !short.is_empty() && short.contains(team_query) {
            score += SHORT_SUBSTRING;
        }
        if aliases.iter().any(|a| a.starts_with(team_query)) {
            score += ALIAS_PREFIX;
        } else if aliases.iter().any(|a| a.contains(team_query)) {
            score += ALIAS_SUBSTRING;
        }
    }

    let mut counted_tokens = 0;
    let mut every_token_hit = true;
    for token in &parsed.tokens {
        if token.chars().count() < 2 {
            continue;
        }
        counted_tokens += 1;

        let mut hit = false;
        if entry.tokens.contains(token.as_str()) {
            score += TOKEN_HIT;
            hit = true;
        }
        if entry.searchable_text.contains(token.as_str()) {
            score += TEXT_HIT;
            hit = true;
        }
        if !hit {
            every_token_hit = false;
        }
    }
    if counted_tokens > 1 && every_token_hit {
        score += ALL_TOKENS_BONUS;
    }

    if entry.matched && entry.confidence > 0.85 {
        score += CONFIDENCE_BOOST;
        if entry.confidence > 0.95 {
            score += CONFIDENCE_BOOST;
        }
    }

    score
}
