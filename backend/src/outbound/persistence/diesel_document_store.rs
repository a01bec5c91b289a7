//! PostgreSQL-backed document store.
//!
//! Every collection shares one `documents` table; each row holds the whole
//! document as `JSONB`. `seq` records insertion order so unsorted reads and
//! sort ties come back in the order documents were written.

use async_trait::async_trait;
use diesel::QueryableByName;
use diesel::pg::Pg;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_query;
use diesel::sql_types::{Array, BigInt, Jsonb, Text, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    DocumentFilter, DocumentStore, DocumentStoreError, FindOptions, SortOrder,
};
use crate::domain::{
    Collection, DeleteAck, Document, DocumentId, ID_FIELD, InsertAck, UpdateAck,
};

use super::diesel_helpers::{contains_pattern, json_path, map_diesel_error, map_pool_error};
use super::pool::DbPool;

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    seq BIGSERIAL PRIMARY KEY,
    collection TEXT NOT NULL,
    id UUID NOT NULL,
    body JSONB NOT NULL,
    UNIQUE (collection, id)
)
"#;

const CREATE_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS documents_collection_seq_idx ON documents (collection, seq)";

const INSERT_SQL: &str = "INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)";

type BoxedQuery = BoxedSqlQuery<'static, Pg, SqlQuery>;

/// A value bound to a statement placeholder.
#[derive(Debug, Clone, PartialEq)]
enum Bind {
    Text(String),
    Uuid(Uuid),
    Path(Vec<String>),
    Json(Value),
}

/// SQL text plus its positional binds, assembled per call.
#[derive(Debug, Default)]
struct Statement {
    sql: String,
    binds: Vec<Bind>,
}

impl Statement {
    fn push(&mut self, fragment: &str) -> &mut Self {
        self.sql.push_str(fragment);
        self
    }

    fn param(&mut self, bind: Bind) -> &mut Self {
        self.binds.push(bind);
        self.sql.push_str(&format!("${}", self.binds.len()));
        self
    }

    /// Append `collection = $n AND <filter>`.
    fn scope(&mut self, collection: Collection, filter: &DocumentFilter) -> &mut Self {
        self.push("collection = ")
            .param(Bind::Text(collection.name().to_owned()))
            .push(" AND ");
        match filter {
            DocumentFilter::All => self.push("TRUE"),
            DocumentFilter::ById(id) => self.push("id = ").param(Bind::Uuid(*id.as_uuid())),
            DocumentFilter::FieldEquals { path, value } => self
                .push("body #> ")
                .param(Bind::Path(json_path(path)))
                .push(" = ")
                .param(Bind::Json(value.clone())),
            DocumentFilter::NameContains { field, needle } => self
                .push("body #>> ")
                .param(Bind::Path(json_path(field)))
                .push(" ILIKE ")
                .param(Bind::Text(contains_pattern(needle))),
        }
    }

    fn order(&mut self, options: &FindOptions) -> &mut Self {
        self.push(" ORDER BY ");
        if let Some(sort) = &options.sort {
            self.push("body #> ").param(Bind::Path(json_path(&sort.field)));
            match sort.order {
                SortOrder::Ascending => self.push(" ASC NULLS FIRST, "),
                SortOrder::Descending => self.push(" DESC NULLS LAST, "),
            };
        }
        self.push("seq")
    }

    fn into_query(self) -> BoxedQuery {
        self.binds
            .into_iter()
            .fold(sql_query(self.sql).into_boxed(), |query, bind| match bind {
                Bind::Text(value) => query.bind::<Text, _>(value),
                Bind::Uuid(value) => query.bind::<SqlUuid, _>(value),
                Bind::Path(value) => query.bind::<Array<Text>, _>(value),
                Bind::Json(value) => query.bind::<Jsonb, _>(value),
            })
    }
}

fn select_statement(
    collection: Collection,
    filter: &DocumentFilter,
    options: &FindOptions,
    limit_one: bool,
) -> Statement {
    let mut statement = Statement::default();
    statement
        .push("SELECT body FROM documents WHERE ")
        .scope(collection, filter)
        .order(options);
    if limit_one {
        statement.push(" LIMIT 1");
    }
    statement
}

fn update_statement(collection: Collection, filter: &DocumentFilter, patch: Value) -> Statement {
    let mut statement = Statement::default();
    statement
        .push("WITH patch AS (SELECT ")
        .param(Bind::Json(patch))
        .push(" - '_id' AS fields), target AS (SELECT seq, body FROM documents WHERE ")
        .scope(collection, filter)
        .push(
            " ORDER BY seq LIMIT 1 FOR UPDATE), changed AS (\
             UPDATE documents d SET body = t.body || p.fields \
             FROM target t, patch p \
             WHERE d.seq = t.seq AND t.body IS DISTINCT FROM t.body || p.fields \
             RETURNING d.seq) \
             SELECT (SELECT COUNT(*) FROM target) AS matched, \
             (SELECT COUNT(*) FROM changed) AS modified",
        );
    statement
}

fn delete_statement(collection: Collection, filter: &DocumentFilter) -> Statement {
    let mut statement = Statement::default();
    statement
        .push("DELETE FROM documents WHERE seq = (SELECT seq FROM documents WHERE ")
        .scope(collection, filter)
        .push(" ORDER BY seq LIMIT 1)");
    statement
}

#[derive(QueryableByName)]
struct BodyRow {
    #[diesel(sql_type = Jsonb)]
    body: Value,
}

#[derive(QueryableByName)]
struct UpdateCountsRow {
    #[diesel(sql_type = BigInt)]
    matched: i64,
    #[diesel(sql_type = BigInt)]
    modified: i64,
}

fn into_document(row: BodyRow) -> Result<Document, DocumentStoreError> {
    match row.body {
        Value::Object(document) => Ok(document),
        other => Err(DocumentStoreError::query(format!(
            "stored document is not an object: {other}"
        ))),
    }
}

fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

/// Diesel-backed implementation of [`DocumentStore`].
#[derive(Clone)]
pub struct DieselDocumentStore {
    pool: DbPool,
}

impl DieselDocumentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create the `documents` table and its index when missing.
    ///
    /// # Errors
    /// Returns a connection or query error when the DDL cannot run.
    pub async fn ensure_schema(&self) -> Result<(), DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        for ddl in [CREATE_TABLE_SQL, CREATE_INDEX_SQL] {
            sql_query(ddl)
                .execute(&mut conn)
                .await
                .map_err(|err| map_diesel_error(err, "ensure schema"))?;
        }
        debug!("documents schema ready");
        Ok(())
    }

    async fn load_documents(&self, statement: Statement) -> Result<Vec<Document>, DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<BodyRow> = statement
            .into_query()
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "find"))?;
        rows.into_iter().map(into_document).collect()
    }
}

#[async_trait]
impl DocumentStore for DieselDocumentStore {
    async fn insert(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> Result<InsertAck, DocumentStoreError> {
        let id = DocumentId::generate();
        document.insert(ID_FIELD.to_owned(), Value::String(id.to_string()));

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        sql_query(INSERT_SQL)
            .bind::<Text, _>(collection.name())
            .bind::<SqlUuid, _>(*id.as_uuid())
            .bind::<Jsonb, _>(Value::Object(document))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "insert"))?;
        Ok(InsertAck::new(id))
    }

    async fn find(
        &self,
        collection: Collection,
        filter: DocumentFilter,
        options: FindOptions,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        self.load_documents(select_statement(collection, &filter, &options, false))
            .await
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: DocumentFilter,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let statement = select_statement(collection, &filter, &FindOptions::default(), true);
        Ok(self.load_documents(statement).await?.into_iter().next())
    }

    async fn update(
        &self,
        collection: Collection,
        filter: DocumentFilter,
        patch: Document,
    ) -> Result<UpdateAck, DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let counts: UpdateCountsRow = update_statement(collection, &filter, Value::Object(patch))
            .into_query()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "update"))?;
        Ok(UpdateAck::new(count(counts.matched), count(counts.modified)))
    }

    async fn delete(
        &self,
        collection: Collection,
        filter: DocumentFilter,
    ) -> Result<DeleteAck, DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = delete_statement(collection, &filter)
            .into_query()
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "delete"))?;
        Ok(DeleteAck::new(deleted as u64))
    }

    async fn ping(&self) -> Result<(), DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "ping"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::SortSpec;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn select_all_keeps_insertion_order() {
        let statement = select_statement(
            Collection::Listings,
            &DocumentFilter::All,
            &FindOptions::default(),
            false,
        );
        assert_eq!(
            statement.sql,
            "SELECT body FROM documents WHERE collection = $1 AND TRUE ORDER BY seq"
        );
        assert_eq!(statement.binds, [Bind::Text("listings".into())]);
    }

    #[rstest]
    #[case(SortOrder::Ascending, "ASC NULLS FIRST")]
    #[case(SortOrder::Descending, "DESC NULLS LAST")]
    fn search_binds_pattern_then_sort_path(#[case] order: SortOrder, #[case] direction: &str) {
        let options = FindOptions {
            sort: Some(SortSpec::new("expired_date", order)),
        };
        let statement = select_statement(
            Collection::Listings,
            &DocumentFilter::name_contains("food_name", "50%"),
            &options,
            false,
        );
        assert_eq!(
            statement.sql,
            format!(
                "SELECT body FROM documents WHERE collection = $1 AND body #>> $2 ILIKE $3 \
                 ORDER BY body #> $4 {direction}, seq"
            )
        );
        assert_eq!(
            statement.binds,
            [
                Bind::Text("listings".into()),
                Bind::Path(vec!["food_name".into()]),
                Bind::Text("%50\\%%".into()),
                Bind::Path(vec!["expired_date".into()]),
            ]
        );
    }

    #[rstest]
    fn field_equality_binds_nested_path_and_json_value() {
        let statement = select_statement(
            Collection::Requests,
            &DocumentFilter::field_equals("donor.donor_email", "a@x.io"),
            &FindOptions::default(),
            true,
        );
        assert!(statement.sql.ends_with("body #> $2 = $3 ORDER BY seq LIMIT 1"));
        assert_eq!(
            statement.binds[1..],
            [
                Bind::Path(vec!["donor".into(), "donor_email".into()]),
                Bind::Json(json!("a@x.io")),
            ]
        );
    }

    #[rstest]
    fn update_binds_patch_before_filter() {
        let id = DocumentId::generate();
        let statement = update_statement(
            Collection::Listings,
            &DocumentFilter::ById(id),
            json!({ "expired_date": "2025-01-01" }),
        );
        assert!(statement.sql.starts_with("WITH patch AS (SELECT $1 - '_id'"));
        assert!(statement.sql.contains("collection = $2 AND id = $3"));
        assert_eq!(statement.binds[2], Bind::Uuid(*id.as_uuid()));
    }

    #[rstest]
    fn delete_targets_a_single_row() {
        let id = DocumentId::generate();
        let statement = delete_statement(Collection::Listings, &DocumentFilter::ById(id));
        assert_eq!(
            statement.sql,
            "DELETE FROM documents WHERE seq = (SELECT seq FROM documents WHERE \
             collection = $1 AND id = $2 ORDER BY seq LIMIT 1)"
        );
    }

    #[rstest]
    fn non_object_rows_are_rejected() {
        let err = into_document(BodyRow { body: json!([1]) }).expect_err("array row");
        assert!(matches!(err, DocumentStoreError::Query { .. }));
    }
}
