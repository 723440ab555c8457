//! Rendering metadata entities back into `CREATE` statements.
//!
//! Each entity renders to exactly one statement; keyspaces and tables can
//! additionally flatten their subtree in dependency order (keyspace, user
//! types, functions, aggregates, tables, then each table's indexes and
//! views), so the whole output replays cleanly against an empty cluster.
//!
//! Rendering is pure formatting over the snapshot: the same metadata always
//! renders to the same bytes. Statements are first laid out in their
//! readable form (`\n\t` line breaks) and the single-line form is derived
//! from it by collapsing that whitespace.

use std::collections::BTreeMap;

use itertools::Itertools;

use super::metadata::{
    Aggregate, Function, Index, Keyspace, MaterializedView, Table, TableOptions, UserType,
};

/// The two pure-formatting axes of DDL rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DdlOptions {
    /// Multi-line, tab-indented output instead of a single line.
    pub formatted: bool,
    /// Qualify entity names with their keyspace.
    pub with_keyspace: bool,
}

impl Default for DdlOptions {
    fn default() -> Self {
        Self {
            formatted: false,
            with_keyspace: true,
        }
    }
}

impl DdlOptions {
    fn prefix(&self, keyspace: &str) -> String {
        if self.with_keyspace {
            format!("{keyspace}.")
        } else {
            String::new()
        }
    }
}

/// Renders options maps the way the server's schema tables spell them:
/// single-quoted keys and values inside braces.
fn render_map(map: &BTreeMap<String, String>) -> String {
    format!(
        "{{{}}}",
        map.iter().map(|(k, v)| format!("'{k}': '{v}'")).join(", ")
    )
}

/// Floats keep a trailing `.0` when integral, as the server prints them.
fn render_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn collapse(query: String, formatted: bool, extra: &[(&str, &str)]) -> String {
    if formatted {
        return query;
    }
    let mut query = query.replace("\n\t", " ");
    for (from, to) in extra {
        query = query.replace(from, to);
    }
    query
}

impl UserType {
    /// The `CREATE TYPE` statement recreating this type.
    pub fn as_cql_query(&self, options: DdlOptions) -> String {
        let mut query = format!("CREATE TYPE {}{} (", options.prefix(&self.keyspace), self.name);
        for (name, typ) in &self.fields {
            query.push_str(&format!("\n\t{name} {typ},"));
        }
        query.pop();
        query.push_str("\n);");
        collapse(query, options.formatted, &[("( ", "("), ("\n);", ");")])
    }
}

impl Function {
    /// The `CREATE FUNCTION` statement recreating this function.
    pub fn as_cql_query(&self, options: DdlOptions) -> String {
        let args = self
            .argument_names
            .iter()
            .zip(&self.argument_types)
            .map(|(name, typ)| format!("{name} {typ}"))
            .join(", ");
        let mut query = format!(
            "CREATE FUNCTION {}{}({args})\n\t",
            options.prefix(&self.keyspace),
            self.name
        );
        if self.called_on_null_input {
            query.push_str("CALLED ON NULL INPUT\n\t");
        } else {
            query.push_str("RETURNS NULL ON NULL INPUT\n\t");
        }
        query.push_str(&format!("RETURNS {}\n\t", self.return_type));
        query.push_str(&format!(
            "LANGUAGE {}\n\tAS $${}$$;",
            self.language, self.body
        ));
        collapse(query, options.formatted, &[])
    }
}

impl Aggregate {
    /// The `CREATE AGGREGATE` statement recreating this aggregate.
    pub fn as_cql_query(&self, options: DdlOptions) -> String {
        let args = self.argument_types.iter().join(", ");
        let mut query = format!(
            "CREATE AGGREGATE {}{}({args})\n\t",
            options.prefix(&self.keyspace),
            self.name
        );
        query.push_str(&format!("SFUNC {}\n\t", self.state_func));
        query.push_str(&format!("STYPE {}\n\t", self.state_type));
        query.push_str(&format!("FINALFUNC {}\n\t", self.final_func));
        query.push_str(&format!("INITCOND {};", self.initcond));
        collapse(query, options.formatted, &[])
    }
}

impl Index {
    /// The `CREATE INDEX` statement recreating this index.
    pub fn as_cql_query(&self, options: DdlOptions) -> String {
        format!(
            "CREATE INDEX {} ON {}{} ({});",
            self.name,
            options.prefix(&self.keyspace),
            self.table,
            self.target
        )
    }
}

impl MaterializedView {
    /// The `CREATE MATERIALIZED VIEW` statement recreating this view.
    pub fn as_cql_query(&self, options: DdlOptions) -> String {
        let prefix = options.prefix(&self.keyspace);
        let mut query = format!("CREATE MATERIALIZED VIEW {prefix}{} AS\n\t", self.name);
        if self.include_all_columns {
            query.push_str("SELECT *\n\t");
        } else {
            let columns = self.columns.iter().map(|c| c.name.as_str()).join(", ");
            query.push_str(&format!("SELECT {columns}\n\t"));
        }
        query.push_str(&format!("FROM {prefix}{}\n\t", self.base_table_name));
        query.push_str(&format!("WHERE {}\n\t", self.where_clause));
        let pk = self
            .columns
            .iter()
            .filter(|c| {
                matches!(
                    c.kind,
                    super::metadata::ColumnKind::PartitionKey
                        | super::metadata::ColumnKind::Clustering
                )
            })
            .map(|c| c.name.as_str())
            .join(", ");
        query.push_str(&format!("PRIMARY KEY ({pk})\n\t"));
        let order = clustering_order_clause(&self.columns);
        query.push_str(&format!("WITH CLUSTERING ORDER BY ({order})\n\t"));
        query.push_str(&view_options_clauses(&self.options));
        collapse(query, options.formatted, &[])
    }
}

impl Table {
    /// The `CREATE TABLE` statement recreating this table, without its
    /// indexes and views.
    pub fn as_cql_query(&self, options: DdlOptions) -> String {
        let mut query = format!(
            "CREATE TABLE {}{} (\n\t",
            options.prefix(&self.keyspace),
            self.name
        );
        for column in &self.columns {
            query.push_str(&format!("{} {},\n\t", column.name, column.typ));
        }
        let pk = self.primary_key_columns().join(", ");
        query.push_str(&format!("PRIMARY KEY ({pk})\n"));
        let order = clustering_order_clause(&self.columns);
        if order.is_empty() {
            query.push_str(&format!(
                ") WITH bloom_filter_fp_chance = {}\n\t",
                render_float(self.options.bloom_filter_fp_chance)
            ));
        } else {
            query.push_str(&format!(") WITH CLUSTERING ORDER BY ({order})\n\t"));
            query.push_str(&format!(
                "AND bloom_filter_fp_chance = {}\n\t",
                render_float(self.options.bloom_filter_fp_chance)
            ));
        }
        let opts = &self.options;
        query.push_str(&format!("AND caching = {}\n\t", render_map(&opts.caching)));
        query.push_str(&format!("AND comment = '{}'\n\t", opts.comment));
        query.push_str(&format!(
            "AND compaction = {}\n\t",
            render_map(&opts.compaction)
        ));
        query.push_str(&format!(
            "AND compression = {}\n\t",
            render_map(&opts.compression)
        ));
        query.push_str(&format!(
            "AND crc_check_chance = {}\n\t",
            render_float(opts.crc_check_chance)
        ));
        query.push_str(&format!(
            "AND default_time_to_live = {}\n\t",
            opts.default_time_to_live
        ));
        query.push_str(&format!(
            "AND gc_grace_seconds = {}\n\t",
            opts.gc_grace_seconds
        ));
        query.push_str(&format!(
            "AND max_index_interval = {}\n\t",
            opts.max_index_interval
        ));
        query.push_str(&format!(
            "AND memtable_flush_period_in_ms = {}\n\t",
            opts.memtable_flush_period_in_ms
        ));
        query.push_str(&format!(
            "AND min_index_interval = {}\n\t",
            opts.min_index_interval
        ));
        query.push_str(&format!(
            "AND speculative_retry = '{}';",
            opts.speculative_retry
        ));
        collapse(query, options.formatted, &[("( ", "("), ("\n)", ")")])
    }

    /// The table statement followed by one statement per index and view.
    pub fn as_cql_queries(&self, options: DdlOptions) -> Vec<String> {
        let mut queries = vec![self.as_cql_query(options)];
        queries.extend(self.indexes.values().map(|index| index.as_cql_query(options)));
        queries.extend(self.views.values().map(|view| view.as_cql_query(options)));
        queries
    }
}

impl Keyspace {
    /// The `CREATE KEYSPACE` statement recreating this keyspace.
    pub fn as_cql_query(&self) -> String {
        format!(
            "CREATE KEYSPACE {} WITH replication = {} AND durable_writes = {};",
            self.name,
            render_map(&self.replication),
            self.durable_writes
        )
    }

    /// The whole keyspace flattened in dependency order: keyspace, user
    /// types, functions, aggregates, then each table with its indexes and
    /// views.
    pub fn as_cql_queries(&self, options: DdlOptions) -> Vec<String> {
        let mut queries = vec![self.as_cql_query()];
        queries.extend(self.user_types.values().map(|t| t.as_cql_query(options)));
        queries.extend(self.functions.values().map(|f| f.as_cql_query(options)));
        queries.extend(self.aggregates.values().map(|a| a.as_cql_query(options)));
        for table in self.tables.values() {
            queries.extend(table.as_cql_queries(options));
        }
        queries
    }
}

fn clustering_order_clause(columns: &[super::metadata::Column]) -> String {
    columns
        .iter()
        .filter_map(|c| {
            c.clustering_order
                .keyword()
                .map(|kw| format!("{} {kw}", c.name))
        })
        .join(", ")
}

/// Views carry the same storage options as tables minus the TTL.
fn view_options_clauses(opts: &TableOptions) -> String {
    let mut clauses = String::new();
    clauses.push_str(&format!(
        "AND bloom_filter_fp_chance = {}\n\t",
        render_float(opts.bloom_filter_fp_chance)
    ));
    clauses.push_str(&format!("AND caching = {}\n\t", render_map(&opts.caching)));
    clauses.push_str(&format!("AND comment = '{}'\n\t", opts.comment));
    clauses.push_str(&format!(
        "AND compaction = {}\n\t",
        render_map(&opts.compaction)
    ));
    clauses.push_str(&format!(
        "AND compression = {}\n\t",
        render_map(&opts.compression)
    ));
    clauses.push_str(&format!(
        "AND crc_check_chance = {}\n\t",
        render_float(opts.crc_check_chance)
    ));
    clauses.push_str(&format!(
        "AND gc_grace_seconds = {}\n\t",
        opts.gc_grace_seconds
    ));
    clauses.push_str(&format!(
        "AND max_index_interval = {}\n\t",
        opts.max_index_interval
    ));
    clauses.push_str(&format!(
        "AND memtable_flush_period_in_ms = {}\n\t",
        opts.memtable_flush_period_in_ms
    ));
    clauses.push_str(&format!(
        "AND min_index_interval = {}\n\t",
        opts.min_index_interval
    ));
    clauses.push_str(&format!(
        "AND speculative_retry = '{}';",
        opts.speculative_retry
    ));
    clauses
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::cluster::metadata::{Column, ColumnKind, ClusteringOrder};

    use super::*;

    const TABLE_OPTIONS_SINGLE_LINE: &str = "AND caching = {'keys': 'ALL', \
        'rows_per_partition': 'NONE'} AND comment = '' AND compaction = \
        {'class': 'SizeTieredCompactionStrategy'} AND compression = {} AND \
        crc_check_chance = 1.0 AND default_time_to_live = 0 AND \
        gc_grace_seconds = 864000 AND max_index_interval = 2048 AND \
        memtable_flush_period_in_ms = 0 AND min_index_interval = 128 AND \
        speculative_retry = '99.0PERCENTILE';";

    fn users_table() -> Table {
        Table {
            keyspace: "ks".into(),
            name: "users".into(),
            columns: vec![
                Column {
                    name: "id".into(),
                    typ: "uuid".into(),
                    kind: ColumnKind::PartitionKey,
                    clustering_order: ClusteringOrder::None,
                },
                Column {
                    name: "added".into(),
                    typ: "timestamp".into(),
                    kind: ColumnKind::Clustering,
                    clustering_order: ClusteringOrder::Asc,
                },
                Column {
                    name: "name".into(),
                    typ: "text".into(),
                    kind: ColumnKind::Regular,
                    clustering_order: ClusteringOrder::None,
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn table_renders_single_line() {
        let expected = format!(
            "CREATE TABLE ks.users (id uuid, added timestamp, name text, \
             PRIMARY KEY (id, added)) WITH CLUSTERING ORDER BY (added ASC) \
             AND bloom_filter_fp_chance = 0.01 {TABLE_OPTIONS_SINGLE_LINE}"
        );
        assert_eq!(
            users_table().as_cql_query(DdlOptions::default()),
            expected
        );
    }

    #[test]
    fn table_renders_formatted() {
        let query = users_table().as_cql_query(DdlOptions {
            formatted: true,
            with_keyspace: true,
        });
        let head = "CREATE TABLE ks.users (\n\tid uuid,\n\tadded timestamp,\n\tname text,\
             \n\tPRIMARY KEY (id, added)\n) WITH CLUSTERING ORDER BY (added ASC)\
             \n\tAND bloom_filter_fp_chance = 0.01\n\t";
        assert!(query.starts_with(head), "got: {query}");
        assert!(query.ends_with("AND speculative_retry = '99.0PERCENTILE';"));
    }

    #[test]
    fn table_without_keyspace_prefix() {
        let query = users_table().as_cql_query(DdlOptions {
            formatted: false,
            with_keyspace: false,
        });
        assert!(query.starts_with("CREATE TABLE users ("), "got: {query}");
    }

    #[test]
    fn user_type_renders_both_ways() {
        let udt = UserType {
            keyspace: "ks".into(),
            name: "address".into(),
            fields: vec![
                ("street".into(), "text".into()),
                ("number".into(), "int".into()),
            ],
        };
        assert_eq!(
            udt.as_cql_query(DdlOptions::default()),
            "CREATE TYPE ks.address (street text, number int);"
        );
        assert_eq!(
            udt.as_cql_query(DdlOptions {
                formatted: true,
                with_keyspace: true
            }),
            "CREATE TYPE ks.address (\n\tstreet text,\n\tnumber int\n);"
        );
    }

    #[test]
    fn function_and_aggregate_render() {
        let function = Function {
            keyspace: "ks".into(),
            name: "plus".into(),
            argument_names: vec!["i".into(), "j".into()],
            argument_types: vec!["int".into(), "int".into()],
            return_type: "int".into(),
            language: "java".into(),
            body: "return i + j;".into(),
            called_on_null_input: false,
        };
        assert_eq!(
            function.as_cql_query(DdlOptions::default()),
            "CREATE FUNCTION ks.plus(i int, j int) RETURNS NULL ON NULL INPUT \
             RETURNS int LANGUAGE java AS $$return i + j;$$;"
        );

        let aggregate = Aggregate {
            keyspace: "ks".into(),
            name: "average".into(),
            argument_types: vec!["int".into()],
            state_func: "avgState".into(),
            state_type: "tuple<int, bigint>".into(),
            final_func: "avgFinal".into(),
            initcond: "(0, 0)".into(),
            return_type: "double".into(),
        };
        assert_eq!(
            aggregate.as_cql_query(DdlOptions::default()),
            "CREATE AGGREGATE ks.average(int) SFUNC avgState STYPE \
             tuple<int, bigint> FINALFUNC avgFinal INITCOND (0, 0);"
        );
    }

    #[test]
    fn index_renders() {
        let index = Index {
            keyspace: "ks".into(),
            table: "users".into(),
            name: "users_by_name".into(),
            target: "name".into(),
        };
        assert_eq!(
            index.as_cql_query(DdlOptions::default()),
            "CREATE INDEX users_by_name ON ks.users (name);"
        );
    }

    #[test]
    fn view_renders_single_line() {
        let view = MaterializedView {
            keyspace: "ks".into(),
            name: "users_by_added".into(),
            base_table_name: "users".into(),
            include_all_columns: false,
            where_clause: "added IS NOT NULL AND id IS NOT NULL".into(),
            columns: vec![
                Column {
                    name: "added".into(),
                    typ: "timestamp".into(),
                    kind: ColumnKind::PartitionKey,
                    clustering_order: ClusteringOrder::None,
                },
                Column {
                    name: "id".into(),
                    typ: "uuid".into(),
                    kind: ColumnKind::Clustering,
                    clustering_order: ClusteringOrder::Asc,
                },
            ],
            options: TableOptions::default(),
        };
        let query = view.as_cql_query(DdlOptions::default());
        assert!(
            query.starts_with(
                "CREATE MATERIALIZED VIEW ks.users_by_added AS SELECT added, id \
                 FROM ks.users WHERE added IS NOT NULL AND id IS NOT NULL \
                 PRIMARY KEY (added, id) WITH CLUSTERING ORDER BY (id ASC) \
                 AND bloom_filter_fp_chance = 0.01"
            ),
            "got: {query}"
        );
        assert!(query.ends_with("AND speculative_retry = '99.0PERCENTILE';"));
        // Views carry no TTL clause.
        assert!(!query.contains("default_time_to_live"));
    }

    #[test]
    fn keyspace_dump_is_dependency_ordered_and_deterministic() {
        let mut keyspace = Keyspace {
            name: "ks".into(),
            replication: BTreeMap::from([
                ("class".to_owned(), "SimpleStrategy".to_owned()),
                ("replication_factor".to_owned(), "1".to_owned()),
            ]),
            durable_writes: true,
            ..Default::default()
        };
        keyspace.user_types.insert(
            "address".into(),
            UserType {
                keyspace: "ks".into(),
                name: "address".into(),
                fields: vec![("street".into(), "text".into())],
            },
        );
        keyspace.tables.insert("users".into(), users_table());

        let queries = keyspace.as_cql_queries(DdlOptions::default());
        assert_eq!(
            queries[0],
            "CREATE KEYSPACE ks WITH replication = {'class': 'SimpleStrategy', \
             'replication_factor': '1'} AND durable_writes = true;"
        );
        assert!(queries[1].starts_with("CREATE TYPE ks.address"));
        assert!(queries[2].starts_with("CREATE TABLE ks.users"));

        // Same metadata renders to the same bytes, run after run.
        assert_eq!(queries, keyspace.as_cql_queries(DdlOptions::default()));
    }

    #[test]
    fn map_rendering_is_order_independent() {
        let forward: BTreeMap<String, String> = [("a", "1"), ("b", "2")]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        let reverse: BTreeMap<String, String> = [("b", "2"), ("a", "1")]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        assert_eq!(render_map(&forward), render_map(&reverse));
        assert_eq!(render_map(&forward), "{'a': '1', 'b': '2'}");
    }

    #[test]
    fn floats_keep_trailing_zero_when_integral() {
        assert_eq!(render_float(1.0), "1.0");
        assert_eq!(render_float(0.01), "0.01");
        assert_eq!(render_float(0.5), "0.5");
    }
}
