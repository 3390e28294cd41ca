//! Deferred batch writes
//!
//! [`BulkInsert`] collects pre-constructed entity instances and defers
//! execution until it is handed an active session, going through the raw
//! statement path rather than the typed per-row operations.

use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, EntityTrait, FromQueryResult, IdenStatic,
    Iterable, Value,
};
use tracing::debug;

use crate::error::StoreError;
use crate::statement;

/// Outcome of a bulk write.
#[derive(Debug)]
pub struct BulkApplied<E: EntityTrait> {
    pub rows_affected: u64,
    /// Stored rows with identity and server-default fields populated.
    /// Empty unless `return_defaults` was requested and the backend
    /// supports returning.
    pub returned: Vec<E::Model>,
}

impl<E: EntityTrait> BulkApplied<E> {
    fn empty() -> Self {
        Self {
            rows_affected: 0,
            returned: Vec::new(),
        }
    }
}

/// Batches entity writes into single backend calls.
pub struct BulkInsert<A: ActiveModelTrait> {
    entries: Vec<A>,
    return_defaults: bool,
    update_changed_only: bool,
    preserve_order: bool,
}

impl<A> BulkInsert<A>
where
    A: ActiveModelTrait + Send,
{
    pub fn new(entries: impl IntoIterator<Item = A>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            return_defaults: false,
            update_changed_only: true,
            preserve_order: true,
        }
    }

    /// Populate identity/server-default fields back into the result.
    pub fn return_defaults(mut self, on: bool) -> Self {
        self.return_defaults = on;
        self
    }

    /// Persist only explicitly `Set` fields (dirty tracking) instead of
    /// every present field.
    pub fn update_changed_only(mut self, on: bool) -> Self {
        self.update_changed_only = on;
        self
    }

    /// When true (default), the batch must share one column shape and is
    /// written as a single multi-row statement in input order. When false,
    /// entries are grouped by column shape, one statement per group.
    pub fn preserve_order(mut self, on: bool) -> Self {
        self.preserve_order = on;
        self
    }

    pub async fn execute<C>(self, conn: &C) -> Result<BulkApplied<A::Entity>, StoreError>
    where
        C: ConnectionTrait,
    {
        if self.entries.is_empty() {
            return Ok(BulkApplied::empty());
        }
        let backend = conn.get_database_backend();
        let returning = self.return_defaults && backend.support_returning();

        let mut groups: Vec<(Vec<String>, Vec<Vec<Value>>)> = Vec::new();
        for entry in &self.entries {
            let (columns, row) = present_values(entry, self.update_changed_only);
            if let Some((_, rows)) = groups.iter_mut().find(|(cols, _)| *cols == columns) {
                rows.push(row);
            } else {
                if self.preserve_order && !groups.is_empty() {
                    return Err(StoreError::Statement(
                        "ordered bulk insert requires a uniform column set across entries"
                            .to_owned(),
                    ));
                }
                groups.push((columns, vec![row]));
            }
        }

        let mut applied = BulkApplied::empty();
        for (columns, rows) in groups {
            let column_refs: Vec<&str> = columns.iter().map(String::as_str).collect();
            let stmt =
                statement::insert::<A::Entity>(backend, &column_refs, &rows, false, returning)?;
            if returning {
                let result_rows = conn.query_all(stmt).await.map_err(StoreError::from)?;
                applied.rows_affected += result_rows.len() as u64;
                for row in &result_rows {
                    applied.returned.push(
                        <A::Entity as EntityTrait>::Model::from_query_result(row, "")
                            .map_err(StoreError::from)?,
                    );
                }
            } else {
                let result = conn.execute(stmt).await.map_err(StoreError::from)?;
                applied.rows_affected += result.rows_affected();
            }
        }
        debug!(rows = applied.rows_affected, "bulk insert applied");
        Ok(applied)
    }
}

fn present_values<A: ActiveModelTrait>(
    entry: &A,
    changed_only: bool,
) -> (Vec<String>, Vec<Value>) {
    let mut columns = Vec::new();
    let mut row = Vec::new();
    for col in <A::Entity as EntityTrait>::Column::iter() {
        match entry.get(col) {
            ActiveValue::Set(value) => {
                columns.push(col.as_str().to_owned());
                row.push(value);
            }
            ActiveValue::Unchanged(value) if !changed_only => {
                columns.push(col.as_str().to_owned());
                row.push(value);
            }
            _ => {}
        }
    }
    (columns, row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue::Set;
    use sea_orm::IntoActiveModel;

    mod widgets {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
        #[sea_orm(table_name = "widgets")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i32,
            pub name: String,
            pub grams: i32,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    #[test]
    fn changed_only_skips_unchanged_fields() {
        let stored = widgets::Model {
            id: 1,
            name: "bolt".to_owned(),
            grams: 12,
        };
        let mut entry = stored.into_active_model();
        entry.name = Set("nut".to_owned());

        let (columns, row) = present_values(&entry, true);
        assert_eq!(columns, vec!["name".to_owned()]);
        assert_eq!(row, vec![Value::from("nut")]);

        let (all_columns, _) = present_values(&entry, false);
        assert_eq!(all_columns, vec!["id".to_owned(), "name".to_owned(), "grams".to_owned()]);
    }

    #[test]
    fn explicit_fields_only_for_fresh_entries() {
        let entry = widgets::ActiveModel {
            name: Set("bolt".to_owned()),
            grams: Set(12),
            ..Default::default()
        };
        let (columns, row) = present_values(&entry, true);
        assert_eq!(columns, vec!["name".to_owned(), "grams".to_owned()]);
        assert_eq!(row.len(), 2);
    }
}
