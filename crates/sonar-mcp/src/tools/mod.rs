//! Tool implementations, one module per resource area.

pub mod analysis;
pub mod dependency_risks;
pub mod enterprises;
pub mod issues;
pub mod languages;
pub mod measures;
pub mod metrics;
pub mod portfolios;
pub mod projects;
pub mod quality_gates;
pub mod rules;
pub mod sources;
pub mod system;
pub mod webhooks;

use sonar_serverapi::Paging;
use std::fmt::Write;

/// Standard pagination banner appended below the result total.
pub(crate) fn append_pagination(out: &mut String, paging: &Paging, noun: &str) {
    let _ = writeln!(
        out,
        "This response is paginated and this is the page {} out of {} total pages. \
         There is a maximum of {} {} per page.",
        paging.page_index,
        paging.total_pages(),
        paging.page_size,
        noun
    );
}
