//! Plain-text report of a ledger, as copied to the clipboard.

use super::format::{format_currency, format_date, format_percent};
use super::{Ledger, Lien};

pub fn render(ledger: &Ledger) -> String {
    let totals = ledger.totals();
    let header = [
        format!(
            "Active liens under registration: {}",
            ledger.registration_id
        ),
        format!(
            "Appraisal value: {}",
            format_currency(ledger.appraisal_value)
        ),
        format!(
            "Coverage over risk: {}%",
            format_percent(totals.coverage_ratio)
        ),
    ];

    let lines: Vec<String> = ledger.liens().iter().map(lien_line).collect();

    format!("{}\n{}", header.join("\n"), lines.join("\n"))
}

pub fn lien_line(lien: &Lien) -> String {
    format!(
        "{} - Kind: {}; {} - Issued on {}, Due on {}, Amount {};",
        lien.priority,
        lien.kind,
        lien.institution,
        format_date(&lien.issued_on),
        format_date(&lien.due_on),
        format_currency(lien.amount)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{LienDraft, LienKind};

    #[test]
    fn test_render_seeded() {
        let text = Ledger::seeded().summary_text();
        let expected = "Active liens under registration: 1234\n\
                        Appraisal value: R$ 10.000.000,00\n\
                        Coverage over risk: 142,86%\n\
                        1st priority - Kind: Mortgage; Bank X - Issued on 15/01/2020, Due on 11/12/2026, Amount R$ 5.000.000,00;";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_empty_ledger() {
        let text = Ledger::new().summary_text();
        assert_eq!(
            text,
            "Active liens under registration: \nAppraisal value: R$ 0,00\nCoverage over risk: 0,00%\n"
        );
    }

    #[test]
    fn test_lien_line_with_missing_dates() {
        let mut ledger = Ledger::new();
        ledger.add_lien(LienDraft {
            priority: "2nd priority".to_string(),
            kind: LienKind::FiduciaryAssignment,
            institution: "Bank Y".to_string(),
            amount: 1234.5,
            ..LienDraft::default()
        });
        let line = lien_line(&ledger.liens()[0]);
        assert_eq!(
            line,
            "2nd priority - Kind: Fiduciary Assignment; Bank Y - Issued on N/A, Due on N/A, Amount R$ 1.234,50;"
        );
    }

    #[test]
    fn test_render_keeps_collection_order() {
        let mut ledger = Ledger::seeded();
        ledger.add_lien(LienDraft {
            institution: "Second".to_string(),
            ..LienDraft::default()
        });
        let text = ledger.summary_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[3].contains("Bank X"));
        assert!(lines[4].contains("Second"));
    }
}
