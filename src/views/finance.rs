//! Finance view: transaction listing and cash totals.

use super::{contains_ci, customers::find_customer, sort_newest_first, ViewFilter};
use crate::model::{Customer, FinancialTransaction, TransactionType};

/// Shown when a transaction has no customer or the reference does not resolve.
pub const OFFICE_ACCOUNT: &str = "Geral / Administrativo";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
  /// Matched against the description only
  pub search: String,
  pub kind: Option<TransactionType>,
}

impl ViewFilter<FinancialTransaction> for TransactionFilter {
  fn matches(&self, tx: &FinancialTransaction) -> bool {
    contains_ci(&tx.description, &self.search) && self.kind.map_or(true, |k| tx.kind == k)
  }
}

/// Matching transactions, latest due date first.
pub fn ledger<'a>(
  transactions: &'a [FinancialTransaction],
  filter: &TransactionFilter,
) -> Vec<&'a FinancialTransaction> {
  let mut matching = filter.apply(transactions);
  sort_newest_first(&mut matching, |t| t.due_date.as_str());
  matching
}

/// Cash position over every transaction, regardless of any filter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CashTotals {
  /// Paid income
  pub income: f64,
  /// Paid expenses
  pub expense: f64,
  /// Income not yet paid (pending or overdue)
  pub pending: f64,
}

impl CashTotals {
  pub fn balance(&self) -> f64 {
    self.income - self.expense
  }
}

pub fn cash_totals(transactions: &[FinancialTransaction]) -> CashTotals {
  transactions
    .iter()
    .fold(CashTotals::default(), |mut totals, tx| {
      match (tx.kind, tx.is_paid()) {
        (TransactionType::Income, true) => totals.income += tx.amount,
        (TransactionType::Income, false) => totals.pending += tx.amount,
        (TransactionType::Expense, true) => totals.expense += tx.amount,
        (TransactionType::Expense, false) => {}
      }
      totals
    })
}

/// Customer name for a transaction, or the office account label.
pub fn account_name<'a>(customers: &'a [Customer], tx: &FinancialTransaction) -> &'a str {
  tx.customer_id
    .as_deref()
    .and_then(|id| find_customer(customers, id))
    .map(|c| c.name.as_str())
    .unwrap_or(OFFICE_ACCOUNT)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{TransactionCategory, TransactionStatus};

  fn tx(
    id: &str,
    description: &str,
    amount: f64,
    kind: TransactionType,
    status: TransactionStatus,
    due: &str,
  ) -> FinancialTransaction {
    FinancialTransaction {
      id: id.to_string(),
      customer_id: None,
      description: description.to_string(),
      amount,
      kind,
      category: TransactionCategory::Other,
      status,
      due_date: due.to_string(),
      payment_date: None,
    }
  }

  fn sample() -> Vec<FinancialTransaction> {
    use TransactionStatus::*;
    use TransactionType::*;
    vec![
      tx("1", "Honorários Maria", 3000.0, Income, Paid, "2024-03-01"),
      tx("2", "Custas processuais", 450.0, Expense, Paid, "2024-05-01"),
      tx("3", "Parcela Benedito", 1200.0, Income, Pending, "2024-04-01"),
      tx("4", "Parcela atrasada", 800.0, Income, Overdue, "2024-02-01"),
      tx("5", "Anúncio", 300.0, Expense, Pending, "2024-06-01"),
    ]
  }

  #[test]
  fn test_totals_and_balance() {
    let totals = cash_totals(&sample());
    assert_eq!(totals.income, 3000.0);
    assert_eq!(totals.expense, 450.0);
    assert_eq!(totals.pending, 2000.0);
    assert_eq!(totals.balance(), 2550.0);
  }

  #[test]
  fn test_ledger_sorts_by_due_date_descending() {
    let txs = sample();
    let ids: Vec<_> = ledger(&txs, &TransactionFilter::default())
      .into_iter()
      .map(|t| t.id.as_str())
      .collect();
    assert_eq!(ids, vec!["5", "2", "3", "1", "4"]);
  }

  #[test]
  fn test_ledger_filters_by_description_and_kind() {
    let txs = sample();
    let filter = TransactionFilter {
      search: "parcela".to_string(),
      kind: Some(TransactionType::Income),
    };
    assert_eq!(ledger(&txs, &filter).len(), 2);

    let expenses = TransactionFilter {
      search: String::new(),
      kind: Some(TransactionType::Expense),
    };
    assert_eq!(ledger(&txs, &expenses).len(), 2);
  }

  #[test]
  fn test_account_name_fallback() {
    let mut t = sample().remove(0);
    assert_eq!(account_name(&[], &t), OFFICE_ACCOUNT);
    t.customer_id = Some("dangling".to_string());
    assert_eq!(account_name(&[], &t), OFFICE_ACCOUNT);
  }
}
