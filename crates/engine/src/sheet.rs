//! Printable ledger sheet: credit and debit entries side by side with a
//! totals row.

use std::fmt;

use chrono::NaiveDate;

use crate::{Entry, Money, Projection};

const HEADERS: [&str; 4] = ["Account", "Credit + Jama", "Account", "Debit - Udhar"];
const TOTAL_LABEL: &str = "Total";

/// One printed line: the n-th credit next to the n-th debit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetRow {
    pub credit: Option<(String, Money)>,
    pub debit: Option<(String, Money)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerSheet {
    pub date: NaiveDate,
    pub rows: Vec<SheetRow>,
    pub credit_total: Money,
    pub debit_total: Money,
}

impl LedgerSheet {
    /// Pair up the visible columns of `projection`; zero rows are left out.
    pub fn new(projection: &Projection, date: NaiveDate) -> Self {
        let credit: Vec<&Entry> = projection.credit.iter().filter(|e| !e.amount.is_zero()).collect();
        let debit: Vec<&Entry> = projection.debit.iter().filter(|e| !e.amount.is_zero()).collect();

        let rows = (0..credit.len().max(debit.len()))
            .map(|idx| SheetRow {
                credit: credit.get(idx).map(|e| (e.account.clone(), e.amount)),
                debit: debit.get(idx).map(|e| (e.account.clone(), e.amount)),
            })
            .collect();

        Self {
            date,
            rows,
            credit_total: projection.credit_total(),
            debit_total: projection.debit_total(),
        }
    }

    /// Body rows followed by the totals row.
    fn lines(&self) -> Vec<[String; 4]> {
        let cells = |side: &Option<(String, Money)>, debit: bool| match side {
            Some((account, amount)) => (account.clone(), amount_cell(*amount, debit)),
            None => (String::new(), String::new()),
        };
        let mut lines: Vec<[String; 4]> = self
            .rows
            .iter()
            .map(|row| {
                let (credit_account, credit_amount) = cells(&row.credit, false);
                let (debit_account, debit_amount) = cells(&row.debit, true);
                [credit_account, credit_amount, debit_account, debit_amount]
            })
            .collect();
        lines.push([
            TOTAL_LABEL.to_string(),
            amount_cell(self.credit_total, false),
            TOTAL_LABEL.to_string(),
            amount_cell(self.debit_total, true),
        ]);
        lines
    }
}

fn amount_cell(amount: Money, debit: bool) -> String {
    if debit {
        format!("- {}", amount.grouped())
    } else {
        amount.grouped()
    }
}

impl fmt::Display for LedgerSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self.lines();
        let mut widths = HEADERS.map(|header| header.chars().count());
        for line in &lines {
            for (width, cell) in widths.iter_mut().zip(line) {
                *width = (*width).max(cell.chars().count());
            }
        }

        writeln!(f, "({})", self.date.format("%Y-%m-%d"))?;
        let header = HEADERS.map(str::to_string);
        for line in std::iter::once(&header).chain(&lines) {
            // Account names right-aligned, amounts left-aligned.
            writeln!(
                f,
                "{:>w0$} | {:<w1$} | {:>w2$} | {:<w3$}",
                line[0],
                line[1],
                line[2],
                line[3],
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
                w3 = widths[3],
            )?;
        }
        Ok(())
    }
}
