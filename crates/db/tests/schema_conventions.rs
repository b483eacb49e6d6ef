use sqlx::PgPool;

/// All `id` columns must be bigint (entity tables) or smallint (lookup tables).
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_pks_are_correct_type(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (table, data_type) in &rows {
        assert!(
            data_type == "bigint" || data_type == "smallint",
            "Table {table}.id should be bigint or smallint, got {data_type}"
        );
    }
}

/// Every table must carry created_at and updated_at as timestamptz.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_tables_have_timestamps(pool: PgPool) {
    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT table_name
         FROM information_schema.tables
         WHERE table_schema = 'public'
           AND table_type = 'BASE TABLE'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (table,) in &tables {
        for col in ["created_at", "updated_at"] {
            let result: Option<(String,)> = sqlx::query_as(
                "SELECT data_type
                 FROM information_schema.columns
                 WHERE table_schema = 'public'
                   AND table_name = $1
                   AND column_name = $2",
            )
            .bind(table)
            .bind(col)
            .fetch_optional(&pool)
            .await
            .unwrap();

            let (data_type,) =
                result.unwrap_or_else(|| panic!("Table {table} is missing column {col}"));
            assert_eq!(
                data_type, "timestamp with time zone",
                "Table {table}.{col} should be timestamptz, got {data_type}"
            );
        }
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_no_varchar_columns(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, column_name
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND data_type = 'character varying'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name, column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(rows.is_empty(), "Found VARCHAR columns (should use TEXT): {rows:?}");
}

/// Every foreign key column must have a corresponding index.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_fks_have_indexes(pool: PgPool) {
    let fk_columns: Vec<(String, String)> = sqlx::query_as(
        "SELECT DISTINCT tc.table_name, kcu.column_name
         FROM information_schema.table_constraints tc
         JOIN information_schema.key_column_usage kcu
             ON tc.constraint_name = kcu.constraint_name
             AND tc.table_schema = kcu.table_schema
         WHERE tc.constraint_type = 'FOREIGN KEY'
           AND tc.table_schema = 'public'
         ORDER BY tc.table_name, kcu.column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (table, column) in &fk_columns {
        let has_index: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM pg_indexes
                WHERE schemaname = 'public'
                  AND tablename = $1
                  AND indexdef LIKE '%(' || $2 || ')%'
            )",
        )
        .bind(table)
        .bind(column)
        .fetch_one(&pool)
        .await
        .unwrap();

        assert!(has_index.0, "FK column {table}.{column} has no index");
    }
}

/// Every foreign key must spell out its ON DELETE / ON UPDATE behavior.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_fks_have_on_delete_and_on_update(pool: PgPool) {
    let fk_rules: Vec<(String, String, String, String)> = sqlx::query_as(
        "SELECT rc.constraint_name, tc.table_name, rc.delete_rule, rc.update_rule
         FROM information_schema.referential_constraints rc
         JOIN information_schema.table_constraints tc
             ON rc.constraint_name = tc.constraint_name
             AND rc.constraint_schema = tc.table_schema
         WHERE rc.constraint_schema = 'public'
         ORDER BY tc.table_name, rc.constraint_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!fk_rules.is_empty(), "Expected at least one FK constraint in the schema");

    for (constraint, table, delete_rule, update_rule) in &fk_rules {
        assert!(
            delete_rule != "NO ACTION" || update_rule != "NO ACTION",
            "FK {constraint} on {table} relies on the implicit NO ACTION rules"
        );
    }
}

/// Unique constraints follow the `uq_` naming so conflicts are attributable.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unique_constraints_are_prefixed(pool: PgPool) {
    let names: Vec<(String,)> = sqlx::query_as(
        "SELECT constraint_name
         FROM information_schema.table_constraints
         WHERE constraint_schema = 'public' AND constraint_type = 'UNIQUE'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (name,) in &names {
        assert!(name.starts_with("uq_"), "Unique constraint {name} lacks the uq_ prefix");
    }
}
