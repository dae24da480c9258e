//! Delete policy for every foreign key in the data model.
//!
//! Deletes never rely on the storage engine's `ON DELETE` actions: the table
//! below is walked explicitly, inside the caller's transaction, so dependents
//! are nullified or removed before the row they reference.

use sqlx::SqliteConnection;
use tracing::debug;
use uuid::Uuid;

use super::DbResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Countries,
    Areas,
    Users,
    Events,
    Reservations,
    Tickets,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Countries => "countries",
            Table::Areas => "areas",
            Table::Users => "users",
            Table::Events => "events",
            Table::Reservations => "reservations",
            Table::Tickets => "tickets",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// Delete every dependent row, recursively.
    Cascade,
    /// Keep dependents and clear their reference.
    Nullify,
}

/// `child.column` references `parent.parent_key`.
#[derive(Debug, Clone, Copy)]
pub struct Relation {
    pub parent: Table,
    pub parent_key: &'static str,
    pub child: Table,
    pub column: &'static str,
    pub on_delete: OnDelete,
}

pub const RELATIONS: &[Relation] = &[
    Relation {
        parent: Table::Countries,
        parent_key: "country",
        child: Table::Areas,
        column: "country",
        on_delete: OnDelete::Cascade,
    },
    Relation {
        parent: Table::Countries,
        parent_key: "country",
        child: Table::Users,
        column: "nationality",
        on_delete: OnDelete::Nullify,
    },
    Relation {
        parent: Table::Areas,
        parent_key: "id",
        child: Table::Events,
        column: "area_id",
        on_delete: OnDelete::Nullify,
    },
    Relation {
        parent: Table::Users,
        parent_key: "id",
        child: Table::Events,
        column: "event_manager",
        on_delete: OnDelete::Nullify,
    },
    Relation {
        parent: Table::Users,
        parent_key: "id",
        child: Table::Reservations,
        column: "user_id",
        on_delete: OnDelete::Cascade,
    },
    Relation {
        parent: Table::Events,
        parent_key: "id",
        child: Table::Reservations,
        column: "event_id",
        on_delete: OnDelete::Cascade,
    },
    Relation {
        parent: Table::Reservations,
        parent_key: "id",
        child: Table::Tickets,
        column: "reservation_id",
        on_delete: OnDelete::Cascade,
    },
];

pub fn dependents(table: Table) -> impl Iterator<Item = &'static Relation> {
    RELATIONS.iter().filter(move |r| r.parent == table)
}

/// Value bound to the single placeholder of a delete plan.
#[derive(Debug, Clone)]
pub enum Key {
    Id(Uuid),
    Name(String),
}

/// Statements that delete the rows of `table` matching `predicate`, dependents
/// first. `predicate` holds exactly one `?`, and so does every statement.
pub fn plan_delete(table: Table, predicate: &str) -> Vec<String> {
    let mut plan = Vec::new();
    push_delete(table, predicate, &mut plan);
    plan
}

fn push_delete(table: Table, predicate: &str, plan: &mut Vec<String>) {
    for relation in dependents(table) {
        let selection = format!(
            "{} IN (SELECT {} FROM {} WHERE {})",
            relation.column,
            relation.parent_key,
            table.name(),
            predicate
        );
        match relation.on_delete {
            OnDelete::Nullify => plan.push(format!(
                "UPDATE {} SET {} = NULL WHERE {}",
                relation.child.name(),
                relation.column,
                selection
            )),
            OnDelete::Cascade => push_delete(relation.child, &selection, plan),
        }
    }
    plan.push(format!("DELETE FROM {} WHERE {}", table.name(), predicate));
}

/// Deletes the rows of `table` whose `column` equals `key`, enacting the
/// relation table on everything that references them.
///
/// Returns the number of `table` rows removed.
pub async fn delete_where(
    conn: &mut SqliteConnection,
    table: Table,
    column: &str,
    key: &Key,
) -> DbResult<u64> {
    let predicate = format!("{column} = ?");
    let mut removed = 0;

    for statement in plan_delete(table, &predicate) {
        let query = sqlx::query(&statement);
        let query = match key {
            Key::Id(id) => query.bind(*id),
            Key::Name(name) => query.bind(name.as_str()),
        };
        let result = query.execute(&mut *conn).await?;
        debug!(statement = %statement, rows = result.rows_affected(), "Delete policy step");
        removed = result.rows_affected();
    }

    Ok(removed)
}
