//! Plain-text rendering of views for the terminal.

use crate::ai::{InterviewSummary, ProcessAnalysis};
use crate::model::{parse_timestamp, CallRecord, Customer, FinancialTransaction, LegalProcess};
use crate::views::customers::CaseLoad;
use crate::views::dashboard::Dashboard;
use crate::views::finance::{account_name, CashTotals};
use crate::views::lawyers::LawyerStats;
use crate::views::processes::customer_name;
use std::collections::BTreeMap;

/// Truncate to `max_chars` characters, adding "..." if truncated.
pub fn truncate(s: &str, max_chars: usize) -> String {
  if s.chars().count() <= max_chars {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Brazilian currency format, e.g. `R$ 1.234,56`.
pub fn brl(amount: f64) -> String {
  let cents = (amount.abs() * 100.0).round() as u64;
  let (units, frac) = (cents / 100, cents % 100);

  let digits = units.to_string();
  let mut grouped = String::new();
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push('.');
    }
    grouped.push(ch);
  }

  let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
  format!("{}R$ {},{:02}", sign, grouped, frac)
}

/// `dd/mm/yyyy HH:MM` for timestamps, `dd/mm/yyyy` for bare dates; the raw
/// value when it does not parse.
pub fn display_date(value: &str) -> String {
  match parse_timestamp(value) {
    Some(ts) if value.trim().len() > 10 => ts.format("%d/%m/%Y %H:%M").to_string(),
    Some(ts) => ts.format("%d/%m/%Y").to_string(),
    None => value.to_string(),
  }
}

pub fn call_line(call: &CallRecord) -> String {
  let repeat = if call.is_first_time {
    "1ª ligação".to_string()
  } else {
    format!("{}ª ligação", call.call_count)
  };
  let mut line = format!(
    "{:<16} {:<8} {:<24} {:<22} {:<20} {}",
    display_date(&call.date_time),
    call.priority.label(),
    truncate(&call.caller_name, 24),
    truncate(&call.category, 22),
    truncate(&call.lawyer_name, 20),
    repeat,
  );
  if let Some(number) = &call.process_number {
    line.push_str(&format!("  [{}", number));
    if let Some(phase) = &call.process_phase {
      line.push_str(&format!(" · {}", phase));
    }
    line.push(']');
  }
  line.push_str(&format!("  ({})", call.id));
  line
}

pub fn call_list(calls: &[&CallRecord]) -> String {
  if calls.is_empty() {
    return "Nenhuma ligação encontrada.".to_string();
  }
  calls.iter().map(|c| call_line(c)).collect::<Vec<_>>().join("\n")
}

pub fn customer_list(customers: &[(&Customer, CaseLoad)]) -> String {
  if customers.is_empty() {
    return "Nenhum cliente encontrado.".to_string();
  }
  customers
    .iter()
    .map(|(c, load)| {
      format!(
        "{:<28} {:<20} {:<6} {:<28} ativos: {} arquivados: {}  ({})",
        truncate(&c.name, 28),
        c.document,
        c.status.label(),
        truncate(&c.email, 28),
        load.active,
        load.archived,
        c.id,
      )
    })
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn process_groups(
  groups: &BTreeMap<String, Vec<&LegalProcess>>,
  customers: &[Customer],
) -> String {
  if groups.is_empty() {
    return "Nenhum processo encontrado.".to_string();
  }
  let mut lines = Vec::new();
  for (specialty, processes) in groups {
    lines.push(format!("== {} ({}) ==", specialty, processes.len()));
    for p in processes {
      let fee = p.honorary_value.map(brl).unwrap_or_default();
      lines.push(format!(
        "  {:<28} {:<32} {:<24} {:<18} {}  ({})",
        p.process_number,
        truncate(&p.title, 32),
        truncate(customer_name(customers, p), 24),
        p.phase,
        fee,
        p.id,
      ));
    }
  }
  lines.join("\n")
}

pub fn ledger(
  transactions: &[&FinancialTransaction],
  customers: &[Customer],
  totals: &CashTotals,
) -> String {
  let mut lines = vec![
    format!("Receita realizada: {}", brl(totals.income)),
    format!("Despesas pagas:    {}", brl(totals.expense)),
    format!("A receber:         {}", brl(totals.pending)),
    format!("Saldo:             {}", brl(totals.balance())),
    String::new(),
  ];
  if transactions.is_empty() {
    lines.push("Nenhum lançamento encontrado.".to_string());
  }
  for tx in transactions {
    lines.push(format!(
      "{:<10} {:<7} {:<32} {:<22} {:>14} {:<8} {:<24}  ({})",
      display_date(&tx.due_date),
      tx.kind.label(),
      truncate(&tx.description, 32),
      tx.category.label(),
      brl(tx.amount),
      tx.status.label(),
      truncate(account_name(customers, tx), 24),
      tx.id,
    ));
  }
  lines.join("\n")
}

pub fn lawyer_table(stats: &[LawyerStats<'_>]) -> String {
  if stats.is_empty() {
    return "Nenhum advogado configurado.".to_string();
  }
  stats
    .iter()
    .map(|s| {
      let role = s.lawyer.role.map(|r| r.label()).unwrap_or("");
      format!(
        "{:<26} {:<10} {:<36} {:<16} ligações: {:>3} processos: {:>3} conversão: {:>3}%",
        truncate(&s.lawyer.name, 26),
        role,
        truncate(&s.lawyer.specialty, 36),
        s.lawyer.oab,
        s.calls,
        s.processes,
        s.conversion_rate,
      )
    })
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn dashboard(d: &Dashboard) -> String {
  let mut lines = vec![
    format!("Atendimentos:        {}", d.total_calls),
    format!("Primeiro contato:    {}", d.first_time_calls),
    format!("Taxa de novos:       {}%", d.conversion_rate),
    format!("Receita realizada:   {}", brl(d.revenue)),
    format!("A receber:           {}", brl(d.pending_income)),
    String::new(),
    "Ligações por advogado:".to_string(),
  ];
  lines.extend(
    d.calls_per_lawyer
      .iter()
      .map(|(name, n)| format!("  {:<30} {}", name, n)),
  );
  lines.push(String::new());
  lines.push("Principais assuntos:".to_string());
  lines.extend(
    d.top_categories
      .iter()
      .map(|(name, n)| format!("  {:<30} {}", name, n)),
  );
  lines.push(String::new());
  lines.push("Últimos 7 dias:".to_string());
  lines.extend(
    d.trend
      .iter()
      .map(|(day, n)| format!("  {} {:>3} {}", day.format("%d/%m"), n, "#".repeat(*n))),
  );
  lines.join("\n")
}

pub fn interview_summary(customer: &Customer, s: &InterviewSummary) -> String {
  let mut lines = vec![
    format!("Resumo da entrevista: {}", customer.name),
    String::new(),
    s.summary.clone(),
    String::new(),
    format!("Urgência: {}/10", s.urgency_score),
    "Direitos identificados:".to_string(),
  ];
  lines.extend(s.rights_found.iter().map(|r| format!("  - {}", r)));
  lines.push(String::new());
  lines.push(format!("Argumento de fechamento: {}", s.conversion_pitch));
  lines.join("\n")
}

pub fn process_analysis(process: &LegalProcess, a: &ProcessAnalysis) -> String {
  let mut lines = vec![
    format!("Análise: {} ({})", process.title, process.process_number),
    String::new(),
    a.situation_summary.clone(),
    String::new(),
    "Riscos:".to_string(),
  ];
  lines.extend(a.risks.iter().map(|r| format!("  - {}", r)));
  lines.push("Próximos passos:".to_string());
  lines.extend(a.suggestions.iter().map(|s| format!("  - {}", s)));
  lines.push("Opções estratégicas:".to_string());
  lines.extend(
    a.strategic_options
      .iter()
      .enumerate()
      .map(|(i, o)| format!("  {}. {}: {}", i + 1, o.label, o.description)),
  );
  lines.join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_counts_characters() {
    assert_eq!(truncate("Petição Inicial", 10), "Petição...");
    assert_eq!(truncate("ação", 4), "ação");
  }

  #[test]
  fn test_brl() {
    assert_eq!(brl(0.0), "R$ 0,00");
    assert_eq!(brl(1234.5), "R$ 1.234,50");
    assert_eq!(brl(22500.0), "R$ 22.500,00");
    assert_eq!(brl(1_000_000.019), "R$ 1.000.000,02");
    assert_eq!(brl(-450.0), "-R$ 450,00");
  }

  #[test]
  fn test_display_date() {
    assert_eq!(display_date("2024-05-03"), "03/05/2024");
    assert_eq!(display_date("2024-05-03T14:07:00+00:00"), "03/05/2024 14:07");
    assert_eq!(display_date("ontem"), "ontem");
  }
}
