// templates/pages/history.rs
use crate::auth::CurrentUser;
use crate::domain::choices::{CITIES, FURNISHING, PROPERTY_TYPES};
use crate::domain::{HistoryQuery, Page, PredictionRecord, SortOrder};
use crate::templates::components::select;
use crate::templates::{desktop_layout, format_aed};
use maud::{html, Markup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Deleted,
    NotFound,
}

impl Notice {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "deleted" => Some(Notice::Deleted),
            "not_found" => Some(Notice::NotFound),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Notice::Deleted => "deleted",
            Notice::NotFound => "not_found",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::Deleted => "Prediction deleted successfully.",
            Notice::NotFound => "Prediction not found or does not belong to you.",
        }
    }
}

/// Query string for `q` at `page`, leaving out unset filters.
pub fn query_string(q: &HistoryQuery, page: u32) -> String {
    let mut s = url::form_urlencoded::Serializer::new(String::new());
    let filters = [
        ("city", &q.city),
        ("type", &q.property_type),
        ("furnishing", &q.furnishing),
        ("location", &q.location),
    ];
    for (key, value) in filters {
        if let Some(v) = value {
            s.append_pair(key, v);
        }
    }
    if q.sort != SortOrder::default() {
        s.append_pair("sort", q.sort.key());
    }
    s.append_pair("page", &page.to_string());
    if q.per_page() != HistoryQuery::default().per_page {
        s.append_pair("per_page", &q.per_page().to_string());
    }
    s.finish()
}

pub fn history_page(
    user: &CurrentUser,
    q: &HistoryQuery,
    page: &Page<PredictionRecord>,
    notice: Option<Notice>,
) -> Markup {
    desktop_layout(
        "History",
        Some(user),
        html! {
            main {
                h1 { "Your predictions" }

                @if let Some(n) = notice {
                    div class=(if n == Notice::NotFound { "notice warn" } else { "notice" }) { (n.message()) }
                }

                (filters(q))

                p {
                    (page.total) " prediction" @if page.total != 1 { "s" }
                    " · "
                    a href={ "/history/export?" (query_string(q, 1)) } { "Export to Excel" }
                }

                @if page.items.is_empty() {
                    p { "No predictions yet. " a href="/" { "Make one" } "." }
                } @else {
                    (records_table(&page.items))
                    (pager(q, page))
                }
            }
        },
    )
}

fn filters(q: &HistoryQuery) -> Markup {
    html! {
        form method="get" action="/history" class="card" {
            (select("city", &CITIES, q.city.as_deref().unwrap_or(""), Some("Any city")))
            (select("type", &PROPERTY_TYPES, q.property_type.as_deref().unwrap_or(""), Some("Any type")))
            (select("furnishing", &FURNISHING, q.furnishing.as_deref().unwrap_or(""), Some("Any furnishing")))
            input type="text" name="location" placeholder="Location contains…"
                value=(q.location.as_deref().unwrap_or(""));
            select name="sort" {
                @for sort in SortOrder::ALL {
                    option value=(sort.key()) selected[sort == q.sort] { (sort.label()) }
                }
            }
            button type="submit" { "Apply" }
        }
    }
}

fn records_table(records: &[PredictionRecord]) -> Markup {
    html! {
        table {
            thead {
                tr {
                    th { "Date (UTC)" }
                    th { "Type" }
                    th { "Location" }
                    th { "City" }
                    th { "Area (sqft)" }
                    th { "Beds" }
                    th { "Baths" }
                    th { "Furnishing" }
                    th { "Age (days)" }
                    th { "Predicted rent" }
                    th {}
                }
            }
            tbody {
                @for r in records {
                    tr {
                        td { (r.created_label()) }
                        td { (r.property_type) }
                        td { (r.location) }
                        td { (r.city) }
                        td { (r.area) }
                        td { (r.bedrooms) }
                        td { (r.bathrooms) }
                        td { (r.furnishing) }
                        td { (r.age_of_listing) }
                        td { (format_aed(r.predicted_rent)) }
                        td {
                            form method="post" action="/remove" {
                                input type="hidden" name="id" value=(r.id);
                                input type="hidden" name="source" value="history";
                                button type="submit" { "Delete" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn pager(q: &HistoryQuery, page: &Page<PredictionRecord>) -> Markup {
    html! {
        nav class="pager" {
            @if page.has_prev() {
                a href={ "/history?" (query_string(q, page.page - 1)) } { "← Previous" }
                " "
            }
            span { "Page " (page.page) " of " (page.pages()) }
            @if page.has_next() {
                " "
                a href={ "/history?" (query_string(q, page.page + 1)) } { "Next →" }
            }
        }
    }
}
