//! Call log view.

use super::{any_field_matches, sort_newest_first, ViewFilter};
use crate::model::{CallRecord, Priority};

/// Search and priority filter for the call log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallFilter {
  pub search: String,
  /// `None` shows every priority
  pub priority: Option<Priority>,
}

impl ViewFilter<CallRecord> for CallFilter {
  fn matches(&self, call: &CallRecord) -> bool {
    let fields = [
      call.caller_name.as_str(),
      call.information.as_str(),
      call.lawyer_name.as_str(),
      call.process_number.as_deref().unwrap_or_default(),
    ];
    any_field_matches(fields, &self.search)
      && self.priority.map_or(true, |p| call.priority == p)
  }
}

/// Matching calls, newest first.
pub fn call_log<'a>(calls: &'a [CallRecord], filter: &CallFilter) -> Vec<&'a CallRecord> {
  let mut matching = filter.apply(calls);
  sort_newest_first(&mut matching, |c| c.date_time.as_str());
  matching
}
