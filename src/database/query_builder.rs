use chrono::{DateTime, Utc};
use sqlx::postgres::PgArguments;
use sqlx::Postgres;
use uuid::Uuid;

use crate::store::{Collection, RowQuery};

/// Positional parameter for a generated statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
}

/// SQL generated for one [`RowQuery`]: an optional row statement returning
/// one JSON object per row, plus an optional `COUNT(*)` and `SUM` over the
/// same filter. All three share `binds`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectSql {
    pub rows: Option<String>,
    pub count: Option<String>,
    pub sum: Option<String>,
    pub binds: Vec<Bind>,
}

impl SelectSql {
    pub fn build(query: &RowQuery) -> Self {
        let source = source_expr(query.collection);

        let mut binds = Vec::new();
        let mut conditions = Vec::new();
        if let Some(since) = query.since {
            binds.push(Bind::Timestamp(since));
            conditions.push(format!(
                "src.{} >= ${}",
                quote_identifier(query.collection.timestamp_column()),
                binds.len()
            ));
        }
        if let Some(owner) = query.owner {
            binds.push(Bind::Uuid(owner));
            conditions.push(format!(
                "src.{} = ${}",
                quote_identifier(query.collection.owner_column()),
                binds.len()
            ));
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        // The outer ORDER BY needs the order column in the projection.
        let mut columns = query.columns.clone();
        if let Some(order) = query.order {
            if !columns.is_empty() && !columns.contains(&order.column) {
                columns.push(order.column);
            }
        }
        let projection = if columns.is_empty() {
            "src.*".to_string()
        } else {
            columns
                .iter()
                .map(|c| format!("src.{}", quote_identifier(c)))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let (inner_order, outer_order) = match query.order {
            Some(order) => {
                let direction = if order.descending { "DESC" } else { "ASC" };
                let column = quote_identifier(order.column);
                (
                    format!(" ORDER BY src.{} {}", column, direction),
                    format!(" ORDER BY t.{} {}", column, direction),
                )
            }
            None => (String::new(), String::new()),
        };
        let limit = query.limit.map(|n| format!(" LIMIT {}", n)).unwrap_or_default();

        let rows = query.fetch_rows.then(|| {
            format!(
                "SELECT row_to_json(t) AS row FROM (SELECT {} FROM {} src{}{}{}) t{}",
                projection, source, where_clause, inner_order, limit, outer_order
            )
        });
        let count = query
            .exact_count
            .then(|| format!("SELECT COUNT(*) AS count FROM {} src{}", source, where_clause));
        let sum = query.sum_of.map(|field| {
            format!(
                "SELECT COALESCE(SUM(src.{}), 0)::numeric AS total FROM {} src{}",
                quote_identifier(field),
                source,
                where_clause
            )
        });

        Self { rows, count, sum, binds }
    }
}

/// FROM expression for a collection. Activity rows carry the actor's
/// display name from `profiles`.
fn source_expr(collection: Collection) -> String {
    match collection {
        Collection::Activity => format!(
            "(SELECT a.*, p.display_name AS actor_name FROM {} a LEFT JOIN profiles p ON p.id = a.user_id)",
            quote_identifier(collection.name())
        ),
        other => quote_identifier(other.name()),
    }
}

pub fn bind_all<'q>(
    mut q: sqlx::query::Query<'q, Postgres, PgArguments>,
    binds: &'q [Bind],
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    for b in binds {
        q = match b {
            Bind::Timestamp(ts) => q.bind(*ts),
            Bind::Uuid(id) => q.bind(*id),
        };
    }
    q
}

/// Quote SQL identifier to prevent injection
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
