//! Schema-aware autocomplete support for the TUI.
//!
//! Analyzes the trailing token of the query text and generates table or
//! column candidates from the schema.
//!
//! Only the trailing whitespace-delimited token is ever looked at: the input
//! assumes the caret sits at the end of the text. Editing in the middle of
//! the text is not supported.

use crate::schema::Schema;
use crate::tui::text::trailing_token;

/// Maximum number of table candidates.
pub const MAX_TABLE_CANDIDATES: usize = 8;

/// Maximum number of column candidates.
pub const MAX_COLUMN_CANDIDATES: usize = 10;

/// Minimum length (in chars) of a bare token before tables are suggested.
const MIN_TABLE_PARTIAL: usize = 2;

/// What the trailing token looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorContext {
    /// Nothing worth completing.
    None,
    /// A table-name fragment (lower-cased).
    Table { partial: String },
    /// A `table.column` fragment whose table exists in the schema.
    Column { table: String, partial: String },
}

impl CursorContext {
    /// Returns the fragment being completed, or `""` for [`CursorContext::None`].
    pub fn partial(&self) -> &str {
        match self {
            Self::None => "",
            Self::Table { partial } | Self::Column { partial, .. } => partial,
        }
    }
}

/// Determines what the trailing token of `text` should complete to.
///
/// A dotted token whose prefix names a schema table completes columns of
/// that table. Otherwise any token of two or more characters completes
/// table names, dotted or not.
pub fn analyze(text: &str, schema: &Schema) -> CursorContext {
    let token = trailing_token(text);

    if let Some((table_part, column_part)) = token.split_once('.') {
        if let Some(table) = schema.table(table_part) {
            return CursorContext::Column {
                table: table.name.clone(),
                partial: column_part.to_string(),
            };
        }
    }

    if token.chars().count() >= MIN_TABLE_PARTIAL {
        CursorContext::Table {
            partial: token.to_lowercase(),
        }
    } else {
        CursorContext::None
    }
}

/// A proposed completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// A table name.
    Table { name: String },
    /// A column of `table`.
    Column {
        table: String,
        name: String,
        data_type: String,
        foreign_key: Option<String>,
    },
}

impl Candidate {
    /// The text this candidate completes to (table or column name).
    pub fn value(&self) -> &str {
        match self {
            Self::Table { name } | Self::Column { name, .. } => name,
        }
    }

    /// Short label for the candidate kind.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Table { .. } => "tbl",
            Self::Column { .. } => "col",
        }
    }

    /// Optional detail shown next to the candidate (type and FK target).
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Table { .. } => None,
            Self::Column {
                data_type,
                foreign_key: Some(target),
                ..
            } => Some(format!("{data_type} -> {target}")),
            Self::Column { data_type, .. } if !data_type.is_empty() => Some(data_type.clone()),
            Self::Column { .. } => None,
        }
    }
}

/// Caps on the number of generated candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_tables: usize,
    pub max_columns: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_tables: MAX_TABLE_CANDIDATES,
            max_columns: MAX_COLUMN_CANDIDATES,
        }
    }
}

/// Generates candidates for `context` using the default limits.
pub fn generate(context: &CursorContext, schema: &Schema) -> Vec<Candidate> {
    generate_with_limits(context, schema, Limits::default())
}

/// Generates candidates for `context`.
///
/// Matching is a case-insensitive substring test. Results keep schema
/// declaration order and are truncated, with no further ranking.
pub fn generate_with_limits(
    context: &CursorContext,
    schema: &Schema,
    limits: Limits,
) -> Vec<Candidate> {
    match context {
        CursorContext::None => Vec::new(),
        CursorContext::Table { partial } => {
            let needle = partial.to_lowercase();
            schema
                .tables
                .iter()
                .filter(|t| t.name.to_lowercase().contains(&needle))
                .take(limits.max_tables)
                .map(|t| Candidate::Table {
                    name: t.name.clone(),
                })
                .collect()
        }
        CursorContext::Column { table, partial } => {
            let Some(table) = schema.table(table) else {
                return Vec::new();
            };
            let needle = partial.to_lowercase();
            table
                .columns
                .iter()
                .filter(|c| c.name.to_lowercase().contains(&needle))
                .take(limits.max_columns)
                .map(|c| Candidate::Column {
                    table: table.name.clone(),
                    name: c.name.clone(),
                    data_type: c.data_type.clone(),
                    foreign_key: c.foreign_key.clone(),
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, Table};
    use pretty_assertions::assert_eq;

    fn reclamos_schema() -> Schema {
        Schema::with_tables(vec![Table::new("reclamos")
            .with_columns(vec![Column::new("estado", "text")])])
    }

    fn wide_schema(tables: usize, columns: usize) -> Schema {
        let cols = (0..columns)
            .map(|i| Column::new(format!("col_{i}"), "text"))
            .collect::<Vec<_>>();
        Schema::with_tables(
            (0..tables)
                .map(|i| Table::new(format!("tabla_{i}")).with_columns(cols.clone()))
                .collect(),
        )
    }

    fn values(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(Candidate::value).collect()
    }

    #[test]
    fn test_empty_text_is_none() {
        assert_eq!(analyze("", &reclamos_schema()), CursorContext::None);
    }

    #[test]
    fn test_short_trailing_token_is_none() {
        let schema = reclamos_schema();
        assert_eq!(analyze("r", &schema), CursorContext::None);
        assert_eq!(analyze("reclamos r", &schema), CursorContext::None);
        assert_eq!(analyze("reclamos ", &schema), CursorContext::None);
        assert_eq!(analyze("ñ", &schema), CursorContext::None);
    }

    #[test]
    fn test_table_fragment_is_lowercased() {
        assert_eq!(
            analyze("RecLam", &reclamos_schema()),
            CursorContext::Table {
                partial: "reclam".to_string()
            }
        );
    }

    #[test]
    fn test_dot_after_known_table_is_column() {
        let ctx = analyze("select reclamos.", &reclamos_schema());
        assert_eq!(
            ctx,
            CursorContext::Column {
                table: "reclamos".to_string(),
                partial: String::new()
            }
        );
    }

    #[test]
    fn test_dotted_table_prefix_ignores_case() {
        let ctx = analyze("RECLAMOS.Est", &reclamos_schema());
        assert_eq!(
            ctx,
            CursorContext::Column {
                table: "reclamos".to_string(),
                partial: "Est".to_string()
            }
        );
    }

    #[test]
    fn test_dot_after_unknown_table_falls_through() {
        let ctx = analyze("zona.nom", &reclamos_schema());
        assert_eq!(
            ctx,
            CursorContext::Table {
                partial: "zona.nom".to_string()
            }
        );
        assert!(generate(&ctx, &reclamos_schema()).is_empty());
    }

    #[test]
    fn test_only_first_dot_splits() {
        let ctx = analyze("reclamos.estado.x", &reclamos_schema());
        assert_eq!(ctx.partial(), "estado.x");
    }

    #[test]
    fn test_none_generates_nothing() {
        assert!(generate(&CursorContext::None, &reclamos_schema()).is_empty());
    }

    #[test]
    fn test_scenario_a_table_candidates() {
        let schema = reclamos_schema();
        let candidates = generate(&analyze("reclam", &schema), &schema);
        assert_eq!(values(&candidates), vec!["reclamos"]);
    }

    #[test]
    fn test_scenario_b_no_table_contains_partial() {
        let schema = reclamos_schema();
        let ctx = analyze("reclamos estad", &schema);
        assert_eq!(
            ctx,
            CursorContext::Table {
                partial: "estad".to_string()
            }
        );
        assert!(generate(&ctx, &schema).is_empty());
    }

    #[test]
    fn test_scenario_c_column_candidates() {
        let schema = reclamos_schema();
        let candidates = generate(&analyze("reclamos.est", &schema), &schema);
        assert_eq!(values(&candidates), vec!["estado"]);
        assert!(matches!(
            &candidates[0],
            Candidate::Column { table, data_type, .. } if table == "reclamos" && data_type == "text"
        ));
    }

    #[test]
    fn test_substring_match_keeps_schema_order() {
        let schema = Schema::with_tables(vec![
            Table::new("zonas_historial"),
            Table::new("reclamos"),
            Table::new("zona"),
        ]);
        let candidates = generate(&analyze("ZON", &schema), &schema);
        assert_eq!(values(&candidates), vec!["zonas_historial", "zona"]);
    }

    #[test]
    fn test_table_candidates_capped_at_eight() {
        let schema = wide_schema(20, 1);
        let candidates = generate(&analyze("tabla", &schema), &schema);
        assert_eq!(candidates.len(), MAX_TABLE_CANDIDATES);
        assert_eq!(candidates[7].value(), "tabla_7");
    }

    #[test]
    fn test_column_candidates_capped_at_ten() {
        let schema = wide_schema(1, 25);
        let candidates = generate(&analyze("tabla_0.", &schema), &schema);
        assert_eq!(candidates.len(), MAX_COLUMN_CANDIDATES);
        assert_eq!(candidates[0].value(), "col_0");
    }

    #[test]
    fn test_custom_limits() {
        let schema = wide_schema(5, 5);
        let limits = Limits {
            max_tables: 2,
            max_columns: 3,
        };
        let tables = generate_with_limits(&analyze("tabla", &schema), &schema, limits);
        let columns = generate_with_limits(&analyze("tabla_1.col", &schema), &schema, limits);
        assert_eq!(tables.len(), 2);
        assert_eq!(columns.len(), 3);
    }

    #[test]
    fn test_table_without_columns_yields_nothing() {
        let schema = Schema::with_tables(vec![Table::new("vacia")]);
        let candidates = generate(&analyze("vacia.", &schema), &schema);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_stale_column_context_after_schema_swap() {
        let ctx = analyze("reclamos.est", &reclamos_schema());
        assert!(generate(&ctx, &Schema::new()).is_empty());
    }

    #[test]
    fn test_candidate_detail() {
        let fk = Candidate::Column {
            table: "reclamos".to_string(),
            name: "zona_id".to_string(),
            data_type: "integer".to_string(),
            foreign_key: Some("zona".to_string()),
        };
        assert_eq!(fk.detail().as_deref(), Some("integer -> zona"));
        assert_eq!(fk.kind_label(), "col");

        let table = Candidate::Table {
            name: "zona".to_string(),
        };
        assert_eq!(table.detail(), None);
        assert_eq!(table.kind_label(), "tbl");
    }
}
