//! Statement builders for the storage primitives.
//!
//! Identifiers only ever reach SQL through [`RelationRef::quoted`] and
//! [`quote_ident`]; catalog lookups use quoted string literals.

use sf_core::sql_utils::{quote_ident, quote_literal};
use sf_core::RelationRef;

/// `CREATE [OR REPLACE] TABLE <relation> AS <select>`
pub fn create_table_as(relation: &RelationRef, select: &str, replace: bool) -> String {
    let verb = if replace {
        "CREATE OR REPLACE TABLE"
    } else {
        "CREATE TABLE IF NOT EXISTS"
    };
    format!("{} {} AS {}", verb, relation.quoted(), strip_terminator(select))
}

/// Structural clone of `source` into `target` with zero rows
pub fn create_empty_like(target: &RelationRef, source: &RelationRef) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} AS SELECT * FROM {} WHERE 1 = 0",
        target.quoted(),
        source.quoted()
    )
}

/// Rename `relation` within its schema
pub fn rename_table(relation: &RelationRef, new_name: &str) -> String {
    format!(
        "ALTER TABLE {} RENAME TO {}",
        relation.quoted(),
        quote_ident(new_name)
    )
}

/// The three renames that exchange `left` and `right`, in execution order.
///
/// `left` is parked under its swap placeholder name while `right` takes its
/// place. They only amount to a swap when run inside one transaction.
pub fn swap_renames(left: &RelationRef, right: &RelationRef) -> Vec<String> {
    let parked = left.swap_placeholder();
    vec![
        rename_table(left, &parked.name),
        rename_table(right, &left.name),
        rename_table(&parked, &right.name),
    ]
}

/// `DROP TABLE IF EXISTS <relation>`
pub fn drop_table(relation: &RelationRef) -> String {
    format!("DROP TABLE IF EXISTS {}", relation.quoted())
}

/// Catalog lookup counting relations at this address.
///
/// DuckDB resolves names case-insensitively, so the lookup does too.
pub fn relation_exists(relation: &RelationRef) -> String {
    format!(
        "SELECT COUNT(*) FROM information_schema.tables \
         WHERE lower(table_catalog) = lower({}) \
         AND lower(table_schema) = lower({}) \
         AND lower(table_name) = lower({})",
        quote_literal(&relation.database),
        quote_literal(&relation.schema),
        quote_literal(&relation.name)
    )
}

/// `SELECT COUNT(*)` over the rows `sql` returns
pub fn count_rows(sql: &str) -> String {
    format!("SELECT COUNT(*) FROM ({})", strip_terminator(sql))
}

/// Drop trailing semicolons and whitespace so a query can be embedded.
pub fn strip_terminator(sql: &str) -> &str {
    sql.trim().trim_end_matches(|c: char| c == ';' || c.is_whitespace())
}

#[cfg(test)]
#[path = "sql_test.rs"]
mod tests;
