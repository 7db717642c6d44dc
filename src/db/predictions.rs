// src/db/predictions.rs
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

use crate::domain::{HistoryQuery, NewPrediction, Page, PredictionRecord};
use crate::errors::ServerError;

const COLUMNS: &str = "id, user_id, area, bedrooms, bathrooms, furnishing, age_of_listing,
     property_type, city, location, predicted_rent, created_at";

fn map_record(r: &Row<'_>) -> rusqlite::Result<PredictionRecord> {
    Ok(PredictionRecord {
        id: r.get(0)?,
        user_id: r.get(1)?,
        area: r.get(2)?,
        bedrooms: r.get(3)?,
        bathrooms: r.get(4)?,
        furnishing: r.get(5)?,
        age_of_listing: r.get(6)?,
        property_type: r.get(7)?,
        city: r.get(8)?,
        location: r.get(9)?,
        predicted_rent: r.get(10)?,
        created_at: r.get(11)?,
    })
}

pub fn insert_prediction(conn: &Connection, new: &NewPrediction) -> Result<i64, ServerError> {
    let l = &new.listing;
    conn.execute(
        "insert into predictions (user_id, area, bedrooms, bathrooms, furnishing, age_of_listing,
                                  property_type, city, location, predicted_rent, created_at)
         values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            new.user_id,
            l.area_sqft,
            l.bedrooms,
            l.bathrooms,
            l.furnishing,
            l.age_in_days,
            l.property_type,
            l.city,
            l.location,
            new.predicted_rent,
            new.created_at,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert prediction failed: {e}")))?;

    Ok(conn.last_insert_rowid())
}

/// `where` clause and bound values for a user's filtered history.
fn filter_clause(user_id: i64, q: &HistoryQuery) -> (String, Vec<Value>) {
    let mut sql = String::from("where user_id = ?");
    let mut values = vec![Value::Integer(user_id)];

    let exact = [
        ("city", &q.city),
        ("property_type", &q.property_type),
        ("furnishing", &q.furnishing),
    ];
    for (column, filter) in exact {
        if let Some(v) = filter.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            sql.push_str(&format!(" and {column} = ?"));
            values.push(Value::Text(v.to_string()));
        }
    }

    if let Some(loc) = q.location.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        sql.push_str(" and location like ? escape '\\'");
        values.push(Value::Text(format!("%{}%", escape_like(loc))));
    }

    (sql, values)
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// One page of a user's history, newest first unless `q.sort` says otherwise.
pub fn list_predictions(
    conn: &Connection,
    user_id: i64,
    q: &HistoryQuery,
) -> Result<Page<PredictionRecord>, ServerError> {
    let (filter, values) = filter_clause(user_id, q);

    let total: i64 = conn
        .query_row(
            &format!("select count(*) from predictions {filter}"),
            params_from_iter(values.iter()),
            |r| r.get(0),
        )
        .map_err(|e| ServerError::DbError(format!("count predictions failed: {e}")))?;

    let mut paged = values;
    paged.push(Value::Integer(i64::from(q.per_page())));
    paged.push(Value::Integer(q.offset()));

    let sql = format!(
        "select {COLUMNS} from predictions {filter} order by {} limit ? offset ?",
        q.sort.sql()
    );
    let items = query_records(conn, &sql, paged)?;

    Ok(Page {
        items,
        page: q.page(),
        per_page: q.per_page(),
        total: total.max(0) as u64,
    })
}

/// Every record matching the filters, in sort order. Paging is ignored.
pub fn list_all_predictions(
    conn: &Connection,
    user_id: i64,
    q: &HistoryQuery,
) -> Result<Vec<PredictionRecord>, ServerError> {
    let (filter, values) = filter_clause(user_id, q);
    let sql = format!(
        "select {COLUMNS} from predictions {filter} order by {}",
        q.sort.sql()
    );
    query_records(conn, &sql, values)
}

fn query_records(
    conn: &Connection,
    sql: &str,
    values: Vec<Value>,
) -> Result<Vec<PredictionRecord>, ServerError> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| ServerError::DbError(format!("prepare history query failed: {e}")))?;

    let rows = stmt
        .query_map(params_from_iter(values.iter()), map_record)
        .map_err(|e| ServerError::DbError(format!("history query failed: {e}")))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServerError::DbError(format!("read history row failed: {e}")))
}

/// Distinct locations the user has predicted for, most recently used first.
pub fn recent_locations(
    conn: &Connection,
    user_id: i64,
    limit: u32,
) -> Result<Vec<String>, ServerError> {
    let mut stmt = conn
        .prepare(
            "select location from predictions where user_id = ?
             group by location order by max(created_at) desc, max(id) desc limit ?",
        )
        .map_err(|e| ServerError::DbError(format!("prepare locations failed: {e}")))?;

    let rows = stmt
        .query_map(params![user_id, limit], |r| r.get::<_, String>(0))
        .map_err(|e| ServerError::DbError(format!("locations query failed: {e}")))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServerError::DbError(format!("read location failed: {e}")))
}

#[cfg(test)]
pub fn get_prediction_for_user(
    conn: &Connection,
    id: i64,
    user_id: i64,
) -> Result<Option<PredictionRecord>, ServerError> {
    use rusqlite::OptionalExtension;

    conn.query_row(
        &format!("select {COLUMNS} from predictions where id = ? and user_id = ?"),
        params![id, user_id],
        map_record,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select prediction failed: {e}")))
}

/// Deletes the record only if `user_id` owns it. Returns whether a row went away.
pub fn delete_prediction_for_user(
    conn: &Connection,
    id: i64,
    user_id: i64,
) -> Result<bool, ServerError> {
    let deleted = conn
        .execute(
            "delete from predictions where id = ? and user_id = ?",
            params![id, user_id],
        )
        .map_err(|e| ServerError::DbError(format!("delete prediction failed: {e}")))?;
    Ok(deleted == 1)
}
