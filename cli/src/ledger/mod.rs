//! Ledger Module
//!
//! This module holds the lien ledger for a single property title:
//!
//! - `Ledger`: appraisal value, new credit risk and the ordered lien list
//! - `Lien` / `LienDraft`: one registered encumbrance, with and without its id
//! - `Totals`: derived encumbrance, debt and coverage ratio
//!
//! Formatting helpers live in `format`, and the exported text report in
//! `summary`. Nothing here performs I/O; every operation completes in place.

pub mod format;
pub mod summary;

use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LienKind {
    Mortgage,
    FiduciaryAssignment,
}

impl LienKind {
    pub fn label(&self) -> &'static str {
        match self {
            LienKind::Mortgage => "Mortgage",
            LienKind::FiduciaryAssignment => "Fiduciary Assignment",
        }
    }

    pub fn toggle(self) -> LienKind {
        match self {
            LienKind::Mortgage => LienKind::FiduciaryAssignment,
            LienKind::FiduciaryAssignment => LienKind::Mortgage,
        }
    }
}

impl fmt::Display for LienKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A lien as entered by the user, before the ledger assigns it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct LienDraft {
    pub priority: String,
    pub kind: LienKind,
    /// `YYYY-MM-DD`, or empty when unset.
    pub issued_on: String,
    /// `YYYY-MM-DD`, or empty when unset.
    pub due_on: String,
    pub institution: String,
    pub amount: f64,
}

impl Default for LienDraft {
    fn default() -> Self {
        Self {
            priority: priority_label(1),
            kind: LienKind::FiduciaryAssignment,
            issued_on: String::new(),
            due_on: String::new(),
            institution: String::new(),
            amount: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lien {
    pub id: u64,
    pub priority: String,
    pub kind: LienKind,
    pub issued_on: String,
    pub due_on: String,
    pub institution: String,
    pub amount: f64,
}

impl Lien {
    pub fn from_draft(id: u64, draft: LienDraft) -> Self {
        Self {
            id,
            priority: draft.priority,
            kind: draft.kind,
            issued_on: draft.issued_on,
            due_on: draft.due_on,
            institution: draft.institution,
            amount: draft.amount,
        }
    }

    pub fn to_draft(&self) -> LienDraft {
        LienDraft {
            priority: self.priority.clone(),
            kind: self.kind,
            issued_on: self.issued_on.clone(),
            due_on: self.due_on.clone(),
            institution: self.institution.clone(),
            amount: self.amount,
        }
    }
}

/// Highest rank offered by the lien form.
pub const MAX_PRIORITY: u32 = 100;

/// English ordinal rank label, e.g. `priority_label(2) == "2nd priority"`.
pub fn priority_label(rank: u32) -> String {
    let suffix = match (rank % 10, rank % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{} priority", rank, suffix)
}

/// Parses the rank back out of a label produced by `priority_label`.
pub fn priority_rank(label: &str) -> Option<u32> {
    let digits: String = label.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Outcome of `Ledger::update_lien`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Replaced,
    Appended,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub total_encumbrance: f64,
    pub total_debt: f64,
    pub coverage_ratio: f64,
}

impl Totals {
    pub fn coverage_percent(&self) -> f64 {
        self.coverage_ratio * 100.0
    }

    pub fn band(&self) -> CoverageBand {
        CoverageBand::classify(self.coverage_percent())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageBand {
    Strong,
    Moderate,
    Weak,
}

impl CoverageBand {
    /// Thresholds apply to the percentage as displayed (two decimals).
    pub fn classify(percent: f64) -> CoverageBand {
        let shown = (percent * 100.0).round() / 100.0;
        if shown > 75.0 {
            CoverageBand::Strong
        } else if shown > 40.0 {
            CoverageBand::Moderate
        } else {
            CoverageBand::Weak
        }
    }
}

/// Hands out strictly increasing ids seeded from the wall clock.
///
/// Once an upserted id has pushed the sequence to `u64::MAX`, ids are taken
/// from the lowest value not `in_use` instead.
#[derive(Debug, Clone, Default)]
struct IdSource {
    last: u64,
}

impl IdSource {
    fn next(&mut self, in_use: impl Fn(u64) -> bool) -> u64 {
        let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
        match self.last.checked_add(1) {
            Some(bumped) => {
                self.last = now.max(bumped);
                self.last
            }
            None => (1..u64::MAX).find(|id| !in_use(*id)).unwrap_or(0),
        }
    }

    fn observe(&mut self, id: u64) {
        self.last = self.last.max(id);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub registration_id: String,
    pub appraisal_value: f64,
    pub new_risk_amount: f64,
    liens: Vec<Lien>,
    ids: IdSource,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The example title the tool opens with.
    pub fn seeded() -> Self {
        let mut ledger = Self {
            registration_id: "1234".to_string(),
            appraisal_value: 10_000_000.0,
            new_risk_amount: 2_000_000.0,
            ..Self::default()
        };
        ledger.update_lien(Lien {
            id: 1,
            priority: priority_label(1),
            kind: LienKind::Mortgage,
            issued_on: "2020-01-15".to_string(),
            due_on: "2026-12-11".to_string(),
            institution: "Bank X".to_string(),
            amount: 5_000_000.0,
        });
        ledger
    }

    pub fn liens(&self) -> &[Lien] {
        &self.liens
    }

    pub fn len(&self) -> usize {
        self.liens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.liens.is_empty()
    }

    pub fn lien(&self, id: u64) -> Option<&Lien> {
        self.liens.iter().find(|l| l.id == id)
    }

    pub fn position(&self, id: u64) -> Option<usize> {
        self.liens.iter().position(|l| l.id == id)
    }

    pub fn add_lien(&mut self, draft: LienDraft) -> u64 {
        let liens = &self.liens;
        let id = self.ids.next(|id| liens.iter().any(|l| l.id == id));
        debug!(id, institution = %draft.institution, amount = draft.amount, "lien added");
        self.liens.push(Lien::from_draft(id, draft));
        id
    }

    /// Replaces the lien carrying the same id, keeping its position.
    ///
    /// An id the ledger has never seen is appended instead of rejected.
    pub fn update_lien(&mut self, lien: Lien) -> Upsert {
        let id = lien.id;
        match self.position(id) {
            Some(index) => {
                self.liens[index] = lien;
                debug!(id, index, "lien replaced");
                Upsert::Replaced
            }
            None => {
                self.ids.observe(id);
                self.liens.push(lien);
                debug!(id, "lien appended by update");
                Upsert::Appended
            }
        }
    }

    pub fn remove_lien(&mut self, id: u64) -> Option<Lien> {
        let index = self.position(id)?;
        debug!(id, index, "lien removed");
        Some(self.liens.remove(index))
    }

    /// Wipes every field. This does not restore the seed.
    pub fn reset(&mut self) {
        self.registration_id.clear();
        self.appraisal_value = 0.0;
        self.new_risk_amount = 0.0;
        self.liens.clear();
        debug!("ledger reset");
    }

    pub fn totals(&self) -> Totals {
        let total_encumbrance: f64 = self.liens.iter().map(|l| l.amount).sum();
        let total_debt = total_encumbrance + self.new_risk_amount;
        let coverage_ratio = if self.appraisal_value == 0.0 || total_debt == 0.0 {
            0.0
        } else {
            let ratio = self.appraisal_value / total_debt;
            if ratio.is_finite() {
                ratio
            } else {
                0.0
            }
        };

        Totals {
            total_encumbrance,
            total_debt,
            coverage_ratio,
        }
    }

    pub fn summary_text(&self) -> String {
        summary::render(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(institution: &str, amount: f64) -> LienDraft {
        LienDraft {
            institution: institution.to_string(),
            amount,
            ..LienDraft::default()
        }
    }

    #[test]
    fn test_seeded_scenario_totals() {
        let ledger = Ledger::seeded();
        let totals = ledger.totals();
        assert_eq!(totals.total_encumbrance, 5_000_000.0);
        assert_eq!(totals.total_debt, 7_000_000.0);
        assert!((totals.coverage_ratio - 1.428_571_428_571_428_5).abs() < 1e-12);
        assert_eq!(format::format_percent(totals.coverage_ratio), "142,86");
    }

    #[test]
    fn test_coverage_zero_when_no_appraisal() {
        let mut ledger = Ledger::seeded();
        ledger.appraisal_value = 0.0;
        assert_eq!(ledger.totals().coverage_ratio, 0.0);
    }

    #[test]
    fn test_coverage_zero_when_no_debt() {
        let mut ledger = Ledger::new();
        ledger.appraisal_value = 500.0;
        assert_eq!(ledger.totals().total_debt, 0.0);
        assert_eq!(ledger.totals().coverage_ratio, 0.0);
    }

    #[test]
    fn test_coverage_is_exact_division() {
        let mut ledger = Ledger::new();
        ledger.appraisal_value = 300.0;
        ledger.new_risk_amount = 50.0;
        ledger.add_lien(draft("A", 70.0));
        assert_eq!(ledger.totals().coverage_ratio, 300.0 / 120.0);
    }

    #[test]
    fn test_add_lien_ids_distinct_in_same_instant() {
        let mut ledger = Ledger::new();
        let ids: Vec<u64> = (0..50).map(|i| ledger.add_lien(draft("B", i as f64))).collect();
        for pair in ids.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert_eq!(ledger.len(), 50);
    }

    #[test]
    fn test_add_lien_appends_in_order() {
        let mut ledger = Ledger::seeded();
        let id = ledger.add_lien(draft("Bank Y", 10.0));
        assert_eq!(ledger.liens().last().map(|l| l.id), Some(id));
        assert_eq!(ledger.liens()[0].institution, "Bank X");
        assert_eq!(ledger.totals().total_encumbrance, 5_000_010.0);
    }

    #[test]
    fn test_update_known_id_keeps_position() {
        let mut ledger = Ledger::seeded();
        let second = ledger.add_lien(draft("Bank Y", 10.0));
        ledger.add_lien(draft("Bank Z", 20.0));

        let mut edited = ledger.lien(second).cloned().unwrap();
        edited.amount = 99.0;
        edited.kind = LienKind::Mortgage;

        assert_eq!(ledger.update_lien(edited), Upsert::Replaced);
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.position(second), Some(1));
        assert_eq!(ledger.liens()[1].amount, 99.0);
        assert_eq!(ledger.totals().total_encumbrance, 5_000_000.0 + 99.0 + 20.0);
    }

    #[test]
    fn test_update_unknown_id_appends() {
        let mut ledger = Ledger::seeded();
        let stray = Lien::from_draft(u64::MAX - 1, draft("Ghost", 1.0));
        assert_eq!(ledger.update_lien(stray), Upsert::Appended);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.position(u64::MAX - 1), Some(1));

        // the id source moved past the appended id
        let next = ledger.add_lien(draft("After", 1.0));
        assert_eq!(next, u64::MAX);
    }

    #[test]
    fn test_add_lien_after_id_space_exhausted() {
        let mut ledger = Ledger::seeded();
        ledger.update_lien(Lien::from_draft(u64::MAX, draft("Edge", 1.0)));
        let a = ledger.add_lien(draft("A", 1.0));
        let b = ledger.add_lien(draft("B", 1.0));
        assert_eq!((a, b), (2, 3));

        let mut ids: Vec<u64> = ledger.liens().iter().map(|l| l.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ledger.len());
    }

    #[test]
    fn test_coverage_non_finite_is_zero() {
        let mut ledger = Ledger::seeded();
        ledger.appraisal_value = f64::INFINITY;
        assert_eq!(ledger.totals().coverage_ratio, 0.0);
        assert_eq!(ledger.totals().band(), CoverageBand::Weak);
    }

    #[test]
    fn test_remove_lien() {
        let mut ledger = Ledger::seeded();
        let id = ledger.add_lien(draft("Bank Y", 10.0));
        assert!(ledger.remove_lien(999).is_none());
        assert_eq!(ledger.len(), 2);

        let removed = ledger.remove_lien(id).unwrap();
        assert_eq!(removed.institution, "Bank Y");
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.liens()[0].id, 1);
        assert_eq!(ledger.totals().total_encumbrance, 5_000_000.0);
    }

    #[test]
    fn test_reset_wipes_everything() {
        let mut ledger = Ledger::seeded();
        ledger.reset();
        assert!(ledger.is_empty());
        assert_eq!(ledger.appraisal_value, 0.0);
        assert_eq!(ledger.new_risk_amount, 0.0);
        assert_eq!(ledger.registration_id, "");
        assert_eq!(ledger.totals().coverage_ratio, 0.0);
    }

    #[test]
    fn test_priority_labels() {
        assert_eq!(priority_label(1), "1st priority");
        assert_eq!(priority_label(2), "2nd priority");
        assert_eq!(priority_label(3), "3rd priority");
        assert_eq!(priority_label(4), "4th priority");
        assert_eq!(priority_label(11), "11th priority");
        assert_eq!(priority_label(12), "12th priority");
        assert_eq!(priority_label(22), "22nd priority");
        assert_eq!(priority_label(100), "100th priority");
        assert_eq!(priority_rank("42nd priority"), Some(42));
        assert_eq!(priority_rank("senior"), None);
    }

    #[test]
    fn test_coverage_band_thresholds() {
        assert_eq!(CoverageBand::classify(142.86), CoverageBand::Strong);
        assert_eq!(CoverageBand::classify(75.0), CoverageBand::Moderate);
        assert_eq!(CoverageBand::classify(75.004), CoverageBand::Moderate);
        assert_eq!(CoverageBand::classify(40.01), CoverageBand::Moderate);
        assert_eq!(CoverageBand::classify(40.0), CoverageBand::Weak);
        assert_eq!(CoverageBand::classify(0.0), CoverageBand::Weak);
    }
}
